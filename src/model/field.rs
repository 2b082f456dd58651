//! Field instruction parsing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A parsed field instruction such as ` DOCPROPERTY testprop1 \* MERGEFORMAT `.
///
/// Only the structure is parsed; field values are never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInstruction {
    /// Field type keyword, upper-cased (e.g. `DOCPROPERTY`)
    pub kind: String,

    /// First argument, unquoted (e.g. the property name)
    pub argument: Option<String>,

    /// Switches in order of appearance (e.g. `\* MERGEFORMAT`)
    pub switches: Vec<String>,
}

fn instruction_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\s*(?P<kind>[A-Za-z][A-Za-z0-9]*)(?:\s+(?:"(?P<quoted>[^"]*)"|(?P<bare>[^\\\s"]+)))?(?P<rest>.*)$"#)
            .unwrap()
    })
}

fn switch_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\\[*@#!a-zA-Z](?:\s+(?:"[^"]*"|[^\\\s"]+))?"#).unwrap())
}

impl FieldInstruction {
    /// Parse an instruction string. Returns `None` if it has no field keyword.
    pub fn parse(instruction: &str) -> Option<Self> {
        let caps = instruction_regex().captures(instruction)?;
        let kind = caps.name("kind")?.as_str().to_uppercase();
        let argument = caps
            .name("quoted")
            .or_else(|| caps.name("bare"))
            .map(|m| m.as_str().to_string());
        let switches = caps
            .name("rest")
            .map(|rest| {
                switch_regex()
                    .find_iter(rest.as_str())
                    .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            kind,
            argument,
            switches,
        })
    }

    /// Check if this is a `DOCPROPERTY` field.
    pub fn is_doc_property(&self) -> bool {
        self.kind == "DOCPROPERTY"
    }
}

impl std::fmt::Display for FieldInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(ref arg) = self.argument {
            write!(f, " {}", arg)?;
        }
        for switch in &self.switches {
            write!(f, " {}", switch)?;
        }
        Ok(())
    }
}
