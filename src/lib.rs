// src/lib.rs
//! Resume editing, preview and export.
//!
//! A [`session::ResumeSession`] owns the live document. Edits go through
//! [`editor::FormEditor`] or the suggestion applier and are published to every
//! subscriber. The export pipeline turns the rendered preview into a PDF,
//! requests other formats from the resume service, generates share links and
//! saves to the user's account.

pub mod cli;
pub mod core;
pub mod editor;
pub mod error;
pub mod export;
pub mod preview;
pub mod session;
pub mod store;
pub mod suggestions;
pub mod template_system;
pub mod types;
pub mod utils;

pub use error::{ClipboardError, EditError, ExportError, RemoteOperationError, TemplateError};
pub use session::ResumeSession;
pub use types::{default_document, ResumeDocument};
