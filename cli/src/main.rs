//! unfield CLI - simple field inlining tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use unfield::{parse_document, FieldInstruction, JsonFormat, Unfield};

#[derive(Parser)]
#[command(name = "unfield")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Inline WordprocessingML simple fields into plain text runs", long_about = None)]
struct Cli {
    /// Input WordprocessingML part (e.g. an extracted word/document.xml)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace every simple field with a plain run
    Inline {
        /// Input WordprocessingML part
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Leave malformed paragraphs untouched instead of failing
        #[arg(long)]
        lenient: bool,

        /// Process paragraphs one at a time
        #[arg(long)]
        sequential: bool,

        /// Also copy strike, caps, kerning and other extended run properties
        #[arg(long)]
        extended: bool,
    },

    /// Show paragraphs and fields in a part
    Info {
        /// Input WordprocessingML part
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Dump the parsed part as JSON
    Json {
        /// Input WordprocessingML part
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

/// Flags of the `inline` command.
#[derive(Debug, Clone, Copy, Default)]
struct InlineFlags {
    lenient: bool,
    sequential: bool,
    extended: bool,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Inline {
            input,
            output,
            lenient,
            sequential,
            extended,
        }) => cmd_inline(
            &input,
            output.as_deref(),
            InlineFlags {
                lenient,
                sequential,
                extended,
            },
        ),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&input, output.as_deref(), compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: inline if input is provided
            if let Some(input) = cli.input {
                cmd_inline(&input, cli.output.as_deref(), InlineFlags::default())
            } else {
                println!("{}", "Usage: unfield <FILE> [OUTPUT]".yellow());
                println!("       unfield --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_inline(
    input: &Path,
    output: Option<&Path>,
    flags: InlineFlags,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut unfield = Unfield::new();
    if flags.lenient {
        unfield = unfield.lenient();
    }
    if flags.sequential {
        unfield = unfield.sequential();
    }
    if flags.extended {
        unfield = unfield.with_extended_formatting();
    }

    log::debug!("Inlining fields in {}", input.display());
    let result = unfield.open(input)?;
    let xml = result.to_xml()?;

    for failure in &result.report.failures {
        log::warn!("Skipped paragraph {}: {}", failure.index + 1, failure.message);
    }
    if !result.report.is_clean() {
        eprintln!(
            "{} {} paragraphs left unchanged",
            "Skipped".yellow(),
            result.report.failures.len()
        );
    }

    if let Some(path) = output {
        fs::write(path, &xml)?;
        println!(
            "{} {} fields in {} paragraphs",
            "Inlined".green(),
            result.report.fields_inlined(),
            result.report.paragraphs
        );
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", xml);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let xml = fs::read_to_string(input)?;
    let doc = parse_document(&xml)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Paragraphs".bold(), doc.paragraph_count());
    println!("{}: {}", "Fields".bold(), doc.field_count());
    println!("{}: {}", "Characters".bold(), doc.plain_text().chars().count());

    if doc.field_count() == 0 {
        return Ok(());
    }

    println!();
    println!("{}", "Fields".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (index, paragraph) in doc.paragraphs.iter().enumerate() {
        for field in paragraph.fields() {
            let instruction = FieldInstruction::parse(&field.instruction)
                .map(|i| i.to_string())
                .unwrap_or_else(|| field.instruction.trim().to_string());
            let runs = match field.runs.len() {
                1 => String::new(),
                n => format!(" {}", format!("({} runs)", n).red()),
            };
            println!(
                "  {} ¶{} {} → {}{}",
                "├─".dimmed(),
                index + 1,
                instruction.bold(),
                field.text(),
                runs
            );
        }
    }

    Ok(())
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let xml = fs::read_to_string(input)?;
    let doc = parse_document(&xml)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = unfield::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unfield".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("WordprocessingML simple field inlining tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unfield".dimmed());
    println!("License: MIT");
}
