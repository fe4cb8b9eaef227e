// src/export/pipeline.rs
//! The four export actions: PDF, alternate format, share link and remote save.
//!
//! Each action reports its start and outcome through the notifier and fails on
//! its own. The PDF export and the remote save each hold a busy flag for
//! their whole run, so a second call while one is running is rejected.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::config_manager::{AppConfig, DEFAULT_SHARE_BASE_URL};
use crate::core::ServiceClient;
use crate::error::{ClipboardError, ExportError, RemoteOperationError};
use crate::export::backend::{HttpBackend, ResumeBackend, SimulatedBackend};
use crate::export::clipboard::Clipboard;
use crate::export::in_flight::InFlight;
use crate::export::notifier::{Notification, Notifier, TracingNotifier};
use crate::export::pdf::{build_image_pdf, PdfOutput};
use crate::export::raster::Rasterizer;
use crate::export::share::{generate_token, share_url};
use crate::export::sink::{DirectorySink, DownloadSink};
use crate::preview::PreviewLayout;
use crate::template_system::TemplateId;
use crate::types::response::{
    CreateResumeRequest, DocumentFormat, GenerateDocumentRequest, GeneratedDocument,
    SaveResumeResponse,
};
use crate::types::ResumeDocument;
use crate::utils::{export_filename, remote_filename, FALLBACK_FILE_STEM};

/// Whatever currently shows the rendered resume.
pub trait PreviewSurface: Send + Sync {
    /// The layout on screen, or `None` when nothing is rendered.
    fn capture(&self) -> Option<PreviewLayout>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub filename: String,
    pub location: PathBuf,
    pub size_bytes: usize,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
}

pub struct ExportPipeline {
    notifier: Arc<dyn Notifier>,
    clipboard: Arc<dyn Clipboard>,
    sink: Arc<dyn DownloadSink>,
    backend: Arc<dyn ResumeBackend>,
    rasterizer: Rasterizer,
    share_base_url: String,
    exporting: InFlight,
    saving: InFlight,
}

impl ExportPipeline {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        clipboard: Arc<dyn Clipboard>,
        sink: Arc<dyn DownloadSink>,
        backend: Arc<dyn ResumeBackend>,
    ) -> Self {
        Self {
            notifier,
            clipboard,
            sink,
            backend,
            rasterizer: Rasterizer::default(),
            share_base_url: DEFAULT_SHARE_BASE_URL.to_string(),
            exporting: InFlight::new(),
            saving: InFlight::new(),
        }
    }

    /// Wire the pipeline from configuration: files go to the output directory,
    /// remote calls go over HTTP when an API url is set and to the simulator otherwise.
    pub fn from_config(config: &AppConfig, clipboard: Arc<dyn Clipboard>) -> anyhow::Result<Self> {
        let backend: Arc<dyn ResumeBackend> = match &config.api_url {
            Some(url) => {
                info!("Using remote resume service at {}", url);
                Arc::new(HttpBackend::new(ServiceClient::new(
                    url,
                    config.api_token.clone(),
                    config.api_timeout(),
                )?))
            }
            None => Arc::new(SimulatedBackend::new(config.simulated_delay())),
        };

        Ok(Self::new(
            Arc::new(TracingNotifier),
            clipboard,
            Arc::new(DirectorySink::new(config.output_dir.clone())),
            backend,
        )
        .with_share_base_url(&config.share_base_url))
    }

    pub fn with_rasterizer(mut self, rasterizer: Rasterizer) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn with_share_base_url(mut self, base_url: &str) -> Self {
        self.share_base_url = base_url.to_string();
        self
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.is_active()
    }

    pub fn is_saving(&self) -> bool {
        self.saving.is_active()
    }

    /// Rasterize the rendered preview into a one-page PDF and save it as
    /// `<name or Resume>.pdf`.
    pub async fn export_pdf(
        &self,
        surface: &dyn PreviewSurface,
        document: &ResumeDocument,
    ) -> Result<ExportArtifact, ExportError> {
        let Some(_busy) = self.exporting.try_begin() else {
            warn!("PDF export requested while another export is running");
            return Err(ExportError::InProgress);
        };

        self.notifier.notify(Notification::info(
            "Preparing PDF download",
            "Your resume will be downloaded in a few seconds.",
        ));

        match self.render_and_save(surface, document).await {
            Ok(artifact) => {
                info!(
                    "Exported {} ({} bytes) to {}",
                    artifact.filename,
                    artifact.size_bytes,
                    artifact.location.display()
                );
                self.notifier.notify(Notification::success(
                    "PDF Downloaded",
                    format!("Your resume has been saved as {}.", artifact.filename),
                ));
                Ok(artifact)
            }
            Err(e) => {
                error!("PDF export failed: {}", e);
                self.notifier
                    .notify(Notification::error("PDF export failed", e.to_string()));
                Err(e)
            }
        }
    }

    async fn render_and_save(
        &self,
        surface: &dyn PreviewSurface,
        document: &ResumeDocument,
    ) -> Result<ExportArtifact, ExportError> {
        let layout = surface.capture().ok_or(ExportError::PreviewUnavailable)?;

        let name = document.personal_info.name.trim();
        let title = if name.is_empty() {
            FALLBACK_FILE_STEM.to_string()
        } else {
            name.to_string()
        };
        let filename = export_filename(name, "pdf");

        let rasterizer = self.rasterizer;
        let pdf: PdfOutput = tokio::task::spawn_blocking(move || {
            let bitmap = rasterizer.rasterize(&layout)?;
            build_image_pdf(&bitmap, &title)
        })
        .await
        .map_err(|e| ExportError::Rasterize(format!("render task failed: {}", e)))??;

        let location = self
            .sink
            .save(&filename, &pdf.bytes)
            .await
            .map_err(|e| ExportError::Save(format!("{:#}", e)))?;

        Ok(ExportArtifact {
            filename,
            location,
            size_bytes: pdf.bytes.len(),
            page_width_pt: pdf.width_pt,
            page_height_pt: pdf.height_pt,
        })
    }

    /// Generate a share link and put it on the clipboard.
    pub fn share_link(&self) -> Result<String, ClipboardError> {
        let url = share_url(&self.share_base_url, &generate_token());

        match self.clipboard.write_text(&url) {
            Ok(()) => {
                info!("Share link generated: {}", url);
                self.notifier.notify(Notification::success(
                    "Share link generated",
                    "A shareable link has been copied to your clipboard.",
                ));
                Ok(url)
            }
            Err(e) => {
                warn!("Failed to copy share link: {}", e);
                self.notifier
                    .notify(Notification::error("Could not copy share link", e.to_string()));
                Err(e)
            }
        }
    }

    /// Ask the backend for the resume in another format. Returned bytes go to the sink.
    pub async fn export_document(
        &self,
        document: &ResumeDocument,
        template: TemplateId,
        format: DocumentFormat,
    ) -> Result<GeneratedDocument, RemoteOperationError> {
        let label = format.label();
        self.notifier.notify(Notification::info(
            format!("Preparing {} download", label),
            "Your resume will be downloaded in a few seconds.",
        ));

        let request = GenerateDocumentRequest {
            format,
            resume: document.clone(),
            template: Some(template),
        };

        let result = match self.backend.generate_document(&request).await {
            Ok(generated) => self.store_generated(generated, format).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(generated) => {
                self.notifier.notify(Notification::success(
                    format!("{} Downloaded", label),
                    "Your resume has been downloaded successfully.",
                ));
                Ok(generated)
            }
            Err(e) => {
                error!("{} export failed: {}", label, e);
                self.notifier.notify(Notification::error(
                    format!("{} export failed", label),
                    e.to_string(),
                ));
                Err(e)
            }
        }
    }

    async fn store_generated(
        &self,
        mut generated: GeneratedDocument,
        format: DocumentFormat,
    ) -> Result<GeneratedDocument, RemoteOperationError> {
        let filename = remote_filename(&generated.filename, format.extension());
        if filename != generated.filename {
            warn!("Renamed server file {:?} to {:?}", generated.filename, filename);
            generated.filename = filename;
        }

        if let Some(content) = &generated.content {
            let location = self
                .sink
                .save(&generated.filename, content)
                .await
                .map_err(|e| RemoteOperationError::Save(format!("{:#}", e)))?;
            info!("Stored {} at {}", generated.filename, location.display());
        } else if let Some(url) = &generated.download_url {
            info!("{} is available at {}", generated.filename, url);
        }
        Ok(generated)
    }

    /// Send the whole document to the user's account.
    pub async fn save_to_account(
        &self,
        document: &ResumeDocument,
        template: TemplateId,
    ) -> Result<SaveResumeResponse, RemoteOperationError> {
        let Some(_busy) = self.saving.try_begin() else {
            warn!("Save requested while another save is running");
            return Err(RemoteOperationError::InProgress);
        };

        for issue in document.validate() {
            warn!("Saving resume with issue: {}", issue);
        }

        self.notifier.notify(Notification::info(
            "Saving resume",
            "Your resume is being saved to your account.",
        ));

        let request = CreateResumeRequest::from_document(document, Some(template));
        match self.backend.save_resume(&request).await {
            Ok(response) => {
                info!("Saved '{}' (id: {:?})", request.name, response.id);
                let description = response
                    .message
                    .clone()
                    .unwrap_or_else(|| "Your resume has been saved to your account.".to_string());
                self.notifier
                    .notify(Notification::success("Resume saved", description));
                Ok(response)
            }
            Err(e) => {
                error!("Failed to save resume: {}", e);
                self.notifier
                    .notify(Notification::error("Save failed", e.to_string()));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::clipboard::MemoryClipboard;
    use crate::export::notifier::{MemoryNotifier, NotificationKind};
    use crate::export::sink::MemorySink;
    use crate::preview::render_preview;
    use crate::types::default_document;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Rendered(Option<PreviewLayout>);

    impl PreviewSurface for Rendered {
        fn capture(&self) -> Option<PreviewLayout> {
            self.0.clone()
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ResumeBackend for FailingBackend {
        async fn save_resume(
            &self,
            _request: &CreateResumeRequest,
        ) -> Result<SaveResumeResponse, RemoteOperationError> {
            Err(RemoteOperationError::Server {
                status: 503,
                message: "maintenance".to_string(),
            })
        }

        async fn generate_document(
            &self,
            _request: &GenerateDocumentRequest,
        ) -> Result<GeneratedDocument, RemoteOperationError> {
            Ok(GeneratedDocument {
                filename: "Jane Doe.docx".to_string(),
                download_url: None,
                content: Some(b"PK".to_vec()),
            })
        }
    }

    /// Names its files with whatever path the test hands it.
    struct NamingBackend(&'static str);

    #[async_trait]
    impl ResumeBackend for NamingBackend {
        async fn save_resume(
            &self,
            _request: &CreateResumeRequest,
        ) -> Result<SaveResumeResponse, RemoteOperationError> {
            Ok(SaveResumeResponse {
                id: None,
                message: None,
            })
        }

        async fn generate_document(
            &self,
            _request: &GenerateDocumentRequest,
        ) -> Result<GeneratedDocument, RemoteOperationError> {
            Ok(GeneratedDocument {
                filename: self.0.to_string(),
                download_url: None,
                content: Some(b"PK".to_vec()),
            })
        }
    }

    fn pipeline(
        backend: Arc<dyn ResumeBackend>,
    ) -> (ExportPipeline, Arc<MemoryNotifier>, Arc<MemorySink>) {
        let notifier = Arc::new(MemoryNotifier::new());
        let sink = Arc::new(MemorySink::new());
        let pipeline = ExportPipeline::new(
            notifier.clone(),
            Arc::new(MemoryClipboard::new()),
            sink.clone(),
            backend,
        );
        (pipeline, notifier, sink)
    }

    #[tokio::test]
    async fn test_blank_name_falls_back_to_resume() {
        let (pipeline, _, sink) = pipeline(Arc::new(SimulatedBackend::new(Duration::ZERO)));
        let doc = default_document();
        let surface = Rendered(Some(render_preview(&doc, TemplateId::Classic)));

        let artifact = pipeline.export_pdf(&surface, &doc).await.unwrap();
        assert_eq!(artifact.filename, "Resume.pdf");
        assert!((artifact.page_width_pt - 595.2756).abs() < 1e-3);
        assert!(artifact.page_height_pt > artifact.page_width_pt);

        let files = sink.files();
        assert_eq!(files.len(), 1);
        assert!(files[0].1.starts_with(b"%PDF-1.7"));
    }

    #[tokio::test]
    async fn test_rasterize_failure_is_reported() {
        let (pipeline, notifier, sink) =
            pipeline(Arc::new(SimulatedBackend::new(Duration::ZERO)));
        let pipeline = pipeline.with_rasterizer(Rasterizer {
            scale: 0,
            surface_width: 794,
        });
        let doc = default_document();
        let surface = Rendered(Some(render_preview(&doc, TemplateId::Modern)));

        let result = pipeline.export_pdf(&surface, &doc).await;
        assert!(matches!(result, Err(ExportError::Rasterize(_))));
        assert_eq!(notifier.count(NotificationKind::Error), 1);
        assert_eq!(notifier.count(NotificationKind::Success), 0);
        assert!(sink.files().is_empty());
        assert!(!pipeline.is_exporting());
    }

    #[tokio::test]
    async fn test_save_failure_clears_busy_flag() {
        let (pipeline, notifier, _) = pipeline(Arc::new(FailingBackend));

        let result = pipeline
            .save_to_account(&default_document(), TemplateId::Modern)
            .await;
        assert!(matches!(
            result,
            Err(RemoteOperationError::Server { status: 503, .. })
        ));
        assert!(!pipeline.is_saving());

        let last = notifier.notifications().pop().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.title, "Save failed");
    }

    #[tokio::test]
    async fn test_generated_content_goes_to_sink() {
        let (pipeline, notifier, sink) = pipeline(Arc::new(FailingBackend));

        let generated = pipeline
            .export_document(&default_document(), TemplateId::Modern, DocumentFormat::Docx)
            .await
            .unwrap();
        assert_eq!(generated.filename, "Jane Doe.docx");
        assert_eq!(sink.files(), vec![("Jane Doe.docx".to_string(), b"PK".to_vec())]);

        let titles: Vec<String> = notifier
            .notifications()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["Preparing DOCX download", "DOCX Downloaded"]);
    }

    #[tokio::test]
    async fn test_server_filename_cannot_leave_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("out");
        let pipeline = ExportPipeline::new(
            Arc::new(MemoryNotifier::new()),
            Arc::new(MemoryClipboard::new()),
            Arc::new(DirectorySink::new(out.clone())),
            Arc::new(NamingBackend("../escaped.docx")),
        );

        let generated = pipeline
            .export_document(&default_document(), TemplateId::Modern, DocumentFormat::Docx)
            .await
            .unwrap();

        assert_eq!(generated.filename, "escaped.docx");
        assert!(out.join("escaped.docx").exists());
        assert!(!tmp.path().join("escaped.docx").exists());
    }
}
