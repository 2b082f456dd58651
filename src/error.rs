//! Error types for unfield library.

use std::io;
use thiserror::Error;

/// Result type alias for unfield operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while inlining fields.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A field wrapper does not hold exactly one run.
    #[error("Field `{field}` holds {runs} runs, expected exactly one (paragraph text: '{paragraph}')")]
    FieldCardinality {
        /// Instruction of the offending field
        field: String,
        /// Number of runs found inside the field
        runs: usize,
        /// Plain text of the paragraph
        paragraph: String,
    },

    /// A run expected in the paragraph's content sequence could not be located.
    #[error("Couldn't find expected run in paragraph (run text: '{run}', paragraph text: '{paragraph}')")]
    RunNotFound {
        /// Text of the missing run
        run: String,
        /// Plain text of the paragraph
        paragraph: String,
    },

    /// The WordprocessingML markup is malformed.
    #[error("Markup error: {0}")]
    Markup(String),

    /// Error during rendering (JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Markup(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::Markup(err.to_string())
    }
}
