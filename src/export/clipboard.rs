// src/export/clipboard.rs
use std::sync::Mutex;

use crate::error::ClipboardError;

pub trait Clipboard: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard. Can be built to reject every write.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    history: Mutex<Vec<String>>,
    reject_reason: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            history: Mutex::new(Vec::new()),
            reject_reason: Some(reason.into()),
        }
    }

    /// Every accepted write, oldest first
    pub fn history(&self) -> Vec<String> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn contents(&self) -> Option<String> {
        self.history().pop()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        if let Some(reason) = &self.reject_reason {
            return Err(ClipboardError::Rejected(reason.clone()));
        }
        let mut history = self
            .history
            .lock()
            .map_err(|_| ClipboardError::Rejected("clipboard lock poisoned".to_string()))?;
        history.push(text.to_string());
        Ok(())
    }
}
