// src/error.rs
//! Error taxonomy for editing and export actions.
//!
//! Every variant is recovered at the action boundary. None of them leaves the
//! held document half-edited.

use thiserror::Error;

use crate::types::ListName;

/// A rejected edit. The document is left as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("{list} index {index} out of range (len {len})")]
    IndexOutOfRange {
        list: ListName,
        index: usize,
        len: usize,
    },

    #[error("Unknown field '{field}' for {scope}")]
    UnknownField { scope: String, field: String },

    #[error("Unknown list '{0}'. Use experience, education or skills")]
    UnknownList(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Resume preview is not available for export")]
    PreviewUnavailable,

    #[error("Failed to rasterize preview: {0}")]
    Rasterize(String),

    #[error("Failed to embed image into PDF: {0}")]
    Embed(String),

    #[error("Failed to save exported file: {0}")]
    Save(String),

    #[error("An export is already in progress")]
    InProgress,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("Clipboard write rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum RemoteOperationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Failed to store generated document: {0}")]
    Save(String),

    #[error("Operation already in progress")]
    InProgress,
}

impl From<reqwest::Error> for RemoteOperationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown template '{id}'. Available: modern, classic, minimalist, creative")]
    Unknown { id: String },
}
