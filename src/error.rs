//! Error types for fichegen.

use std::io;
use thiserror::Error;

/// Result type alias for fichegen operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A layout precondition was violated (e.g. a column narrower than a
    /// single character). Indicates a caller bug, not user input.
    #[error("layout error: {0}")]
    Layout(String),

    /// The supplied annex is not a readable PDF. Recoverable: the caller
    /// should fall back to the unmerged primary document.
    #[error("annex is not a valid PDF: {0}")]
    AnnexParse(lopdf::Error),

    /// Structural failure while compositing the merged document.
    #[error("PDF merge error: {0}")]
    Merge(#[from] lopdf::Error),
}
