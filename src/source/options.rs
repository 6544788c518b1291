//! PDF source options.

/// Options for reading PDF documents.
#[derive(Debug, Clone, Default)]
pub struct PdfOptions {
    /// Error handling mode for individual pages
    pub error_mode: ErrorMode,
}

impl PdfOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first page that cannot be decoded.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Treat pages that cannot be decoded as empty.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

/// Error handling mode while decoding pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    Strict,
    /// Log the error and continue with an empty page
    #[default]
    Lenient,
}
