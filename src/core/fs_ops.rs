// src/core/fs_ops.rs
//! File system helpers shared by the exporters and the CLI document store

use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::types::ResumeDocument;

pub struct FsOps;

/// On-disk encodings for a resume document, picked by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFileKind {
    Json,
    Toml,
}

impl DocumentFileKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        match FsOps::get_extension(path).as_deref() {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some(other) => anyhow::bail!(
                "Unsupported document extension: {}. Allowed: [\"json\", \"toml\"]",
                other
            ),
            None => anyhow::bail!("Document path has no extension: {}", path.display()),
        }
    }
}

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            info!("Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        Self::write_bytes_safe(path, content.as_bytes()).await
    }

    /// Write bytes, creating the parent directory first
    pub async fn write_bytes_safe(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir_exists(parent).await?;
            }
        }

        fs::write(path, bytes)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        info!("Written file: {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    pub fn get_extension(path: &Path) -> Option<String> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Load a resume document and repair any broken invariant.
    pub async fn load_document(path: &Path) -> Result<ResumeDocument> {
        let kind = DocumentFileKind::from_path(path)?;
        let content = Self::read_file_safe(path).await?;

        let document: ResumeDocument = match kind {
            DocumentFileKind::Json => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON document: {}", path.display()))?,
            DocumentFileKind::Toml => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML document: {}", path.display()))?,
        };
        Ok(document.normalized())
    }

    pub async fn save_document(path: &Path, document: &ResumeDocument) -> Result<()> {
        let content = match DocumentFileKind::from_path(path)? {
            DocumentFileKind::Json => {
                serde_json::to_string_pretty(document).context("Failed to serialize document")?
            }
            DocumentFileKind::Toml => {
                toml::to_string_pretty(document).context("Failed to serialize document")?
            }
        };
        Self::write_file_safe(path, &content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_document;

    #[test]
    fn test_document_kind_from_path() {
        assert_eq!(
            DocumentFileKind::from_path(Path::new("cv.JSON")).unwrap(),
            DocumentFileKind::Json
        );
        assert_eq!(
            DocumentFileKind::from_path(Path::new("cv.toml")).unwrap(),
            DocumentFileKind::Toml
        );
        assert!(DocumentFileKind::from_path(Path::new("cv.yaml")).is_err());
        assert!(DocumentFileKind::from_path(Path::new("cv")).is_err());
    }

    #[tokio::test]
    async fn test_document_survives_json_and_toml() {
        let tmp = tempfile::tempdir().unwrap();
        let mut doc = default_document();
        doc.personal_info.name = "Jane Doe".to_string();
        doc.skills[0].name = "Rust".to_string();

        for file in ["nested/resume.json", "resume.toml"] {
            let path = tmp.path().join(file);
            FsOps::save_document(&path, &doc).await.unwrap();
            let loaded = FsOps::load_document(&path).await.unwrap();
            assert_eq!(loaded, doc);
        }
    }

    #[tokio::test]
    async fn test_load_repairs_empty_lists() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("resume.json");
        tokio::fs::write(&path, r#"{"personalInfo":{"name":"Jane"},"skills":[]}"#)
            .await
            .unwrap();

        let loaded = FsOps::load_document(&path).await.unwrap();
        assert_eq!(loaded.skills.len(), 1);
        assert_eq!(loaded.experience.len(), 1);
        assert!(loaded.validate().is_empty());
    }
}
