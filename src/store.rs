// src/store.rs
//! Single owner of the live resume document.
//!
//! Edits replace the whole value and every subscriber sees the new document
//! as soon as `replace` returns. A replacement equal to the current value is
//! swallowed so subscribers are not woken for no-op edits.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

use crate::error::EditError;
use crate::types::ResumeDocument;

#[derive(Clone)]
pub struct DocumentStore {
    sender: Arc<watch::Sender<ResumeDocument>>,
    revision: Arc<AtomicU64>,
}

impl DocumentStore {
    pub fn new(initial: ResumeDocument) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Snapshot of the current document.
    pub fn current(&self) -> ResumeDocument {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResumeDocument> {
        self.sender.subscribe()
    }

    /// Number of replacements published so far
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Replace the document and publish it. Returns the now-current document.
    pub fn replace(&self, next: ResumeDocument) -> ResumeDocument {
        let changed = self.sender.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });

        if changed {
            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            trace!("Published resume revision {}", revision);
        }
        next
    }

    /// Run an edit against the current document and publish its result.
    /// A failed edit publishes nothing.
    pub fn update<F>(&self, edit: F) -> Result<ResumeDocument, EditError>
    where
        F: FnOnce(&ResumeDocument) -> Result<ResumeDocument, EditError>,
    {
        let next = edit(&self.current())?;
        Ok(self.replace(next))
    }
}
