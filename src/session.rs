// src/session.rs
//! The owner of one editing session: the live document, the selected
//! template, preview visibility and the export pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};
use tokio::sync::watch;

use crate::editor::FormEditor;
use crate::error::{ClipboardError, EditError, ExportError, RemoteOperationError, TemplateError};
use crate::export::{ExportArtifact, ExportPipeline, PreviewSurface};
use crate::preview::{render_preview, PreviewLayout};
use crate::store::DocumentStore;
use crate::suggestions::{apply_field_path, apply_suggestion, Suggestion};
use crate::template_system::{TemplateId, TemplateSelector};
use crate::types::response::{DocumentFormat, GeneratedDocument, SaveResumeResponse};
use crate::types::{default_document, ResumeDocument};

pub struct ResumeSession {
    store: DocumentStore,
    selector: RwLock<TemplateSelector>,
    preview_visible: AtomicBool,
    pipeline: ExportPipeline,
}

impl ResumeSession {
    /// Start from the blank default document.
    pub fn new(pipeline: ExportPipeline) -> Self {
        Self::with_document(default_document(), pipeline)
    }

    pub fn with_document(document: ResumeDocument, pipeline: ExportPipeline) -> Self {
        Self {
            store: DocumentStore::new(document.normalized()),
            selector: RwLock::new(TemplateSelector::default()),
            preview_visible: AtomicBool::new(true),
            pipeline,
        }
    }

    pub fn document(&self) -> ResumeDocument {
        self.store.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResumeDocument> {
        self.store.subscribe()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn editor(&self) -> FormEditor {
        FormEditor::new(self.store.clone())
    }

    pub fn apply_suggestion(&self, suggestion: &Suggestion) -> Result<ResumeDocument, EditError> {
        self.store.update(|doc| apply_suggestion(doc, suggestion))
    }

    /// Legacy string-path suggestions. Unknown paths leave the document as is.
    pub fn apply_field_path(&self, path: &str, value: &str) -> ResumeDocument {
        let next = apply_field_path(&self.store.current(), path, value);
        self.store.replace(next)
    }

    pub fn template(&self) -> TemplateId {
        self.selector
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .selected()
    }

    pub fn select_template(&self, template: TemplateId) {
        self.selector
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .select(template);
    }

    pub fn select_template_by_id(&self, id: &str) -> Result<TemplateId, TemplateError> {
        self.selector
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .select_by_id(id)
    }

    pub fn set_preview_visible(&self, visible: bool) {
        self.preview_visible.store(visible, Ordering::SeqCst);
    }

    pub fn is_preview_visible(&self) -> bool {
        self.preview_visible.load(Ordering::SeqCst)
    }

    pub fn preview(&self) -> PreviewLayout {
        render_preview(&self.store.current(), self.template())
    }

    pub async fn export_pdf(&self) -> Result<ExportArtifact, ExportError> {
        let document = self.store.current();
        self.pipeline.export_pdf(self, &document).await
    }

    pub fn share_link(&self) -> Result<String, ClipboardError> {
        self.pipeline.share_link()
    }

    pub async fn export_document(
        &self,
        format: DocumentFormat,
    ) -> Result<GeneratedDocument, RemoteOperationError> {
        let document = self.store.current();
        self.pipeline
            .export_document(&document, self.template(), format)
            .await
    }

    pub async fn save_to_account(&self) -> Result<SaveResumeResponse, RemoteOperationError> {
        let document = self.store.current();
        self.pipeline
            .save_to_account(&document, self.template())
            .await
    }

    pub fn is_exporting(&self) -> bool {
        self.pipeline.is_exporting()
    }

    pub fn is_saving(&self) -> bool {
        self.pipeline.is_saving()
    }
}

impl PreviewSurface for ResumeSession {
    fn capture(&self) -> Option<PreviewLayout> {
        self.is_preview_visible().then(|| self.preview())
    }
}
