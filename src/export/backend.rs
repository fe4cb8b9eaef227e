// src/export/backend.rs
//! Remote persistence and document generation

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::core::service_client::{ServiceClient, EXPORT_ENDPOINT, RESUMES_ENDPOINT};
use crate::error::RemoteOperationError;
use crate::types::response::{
    CreateResumeRequest, GenerateDocumentRequest, GeneratedDocument, SaveResumeResponse,
};

#[async_trait]
pub trait ResumeBackend: Send + Sync {
    async fn save_resume(
        &self,
        request: &CreateResumeRequest,
    ) -> Result<SaveResumeResponse, RemoteOperationError>;

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GeneratedDocument, RemoteOperationError>;
}

/// Stand-in for a server that does not exist yet. Waits, then succeeds.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl ResumeBackend for SimulatedBackend {
    async fn save_resume(
        &self,
        request: &CreateResumeRequest,
    ) -> Result<SaveResumeResponse, RemoteOperationError> {
        tokio::time::sleep(self.delay).await;
        info!("Simulated save of '{}'", request.name);
        Ok(SaveResumeResponse {
            id: None,
            message: Some("Resume saved".to_string()),
        })
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GeneratedDocument, RemoteOperationError> {
        tokio::time::sleep(self.delay).await;
        let filename = crate::utils::export_filename(
            &request.resume.personal_info.name,
            request.format.extension(),
        );
        info!("Simulated {} generation for {}", request.format.label(), filename);
        Ok(GeneratedDocument {
            filename,
            download_url: None,
            content: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ServiceClient,
}

impl HttpBackend {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeBackend for HttpBackend {
    async fn save_resume(
        &self,
        request: &CreateResumeRequest,
    ) -> Result<SaveResumeResponse, RemoteOperationError> {
        self.client.post_json(RESUMES_ENDPOINT, request).await
    }

    async fn generate_document(
        &self,
        request: &GenerateDocumentRequest,
    ) -> Result<GeneratedDocument, RemoteOperationError> {
        let (content_type, body) = self.client.post_for_bytes(EXPORT_ENDPOINT, request).await?;

        // The service either answers with a JSON descriptor or streams the file itself.
        if content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
        {
            return serde_json::from_slice(&body)
                .map_err(|e| RemoteOperationError::Decode(e.to_string()));
        }

        Ok(GeneratedDocument {
            filename: crate::utils::export_filename(
                &request.resume.personal_info.name,
                request.format.extension(),
            ),
            download_url: None,
            content: Some(body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_system::TemplateId;
    use crate::types::response::DocumentFormat;
    use crate::types::default_document;

    #[tokio::test]
    async fn test_simulated_backend_succeeds() {
        let backend = SimulatedBackend::new(Duration::ZERO);
        let mut doc = default_document();
        doc.personal_info.name = "Jane Doe".to_string();

        let saved = backend
            .save_resume(&CreateResumeRequest::from_document(&doc, Some(TemplateId::Classic)))
            .await
            .unwrap();
        assert!(saved.message.is_some());

        let generated = backend
            .generate_document(&GenerateDocumentRequest {
                format: DocumentFormat::Docx,
                resume: doc,
                template: Some(TemplateId::Modern),
            })
            .await
            .unwrap();
        assert_eq!(generated.filename, "Jane Doe.docx");
        assert!(generated.content.is_none());
    }
}
