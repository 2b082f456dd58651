//! Inlining options and configuration.

/// Options for inlining fields.
#[derive(Debug, Clone)]
pub struct InlineOptions {
    /// Error handling mode for multi-paragraph runs
    pub error_mode: ErrorMode,

    /// Whether to process paragraphs in parallel
    pub parallel: bool,

    /// Whether to copy the extended run properties (strike, caps, kerning, ...)
    pub extended_formatting: bool,
}

impl InlineOptions {
    /// Create new inline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip paragraphs that fail).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enable or disable copying of extended run properties.
    pub fn with_extended_formatting(mut self, extended: bool) -> Self {
        self.extended_formatting = extended;
        self
    }
}

impl Default for InlineOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            parallel: true,
            extended_formatting: false,
        }
    }
}

/// Error handling mode when inlining a whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first paragraph error
    #[default]
    Strict,
    /// Leave failing paragraphs untouched and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_options_builder() {
        let options = InlineOptions::new()
            .lenient()
            .sequential()
            .with_extended_formatting(true);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.parallel);
        assert!(options.extended_formatting);
    }

    #[test]
    fn test_default_options() {
        let options = InlineOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.parallel);
        assert!(!options.extended_formatting);
    }
}
