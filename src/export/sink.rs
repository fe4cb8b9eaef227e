// src/export/sink.rs
//! Where exported files land

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use crate::core::FsOps;

#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Store `bytes` under `filename` and return where they went.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Writes files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let mut components = Path::new(filename).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            anyhow::bail!("Refusing to write {:?} outside {}", filename, self.dir.display());
        }
        let path = self.dir.join(filename);
        FsOps::write_bytes_safe(&path, bytes).await?;
        Ok(path)
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> Vec<(String, Vec<u8>)> {
        self.files.lock().map(|f| f.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.files
            .lock()
            .map_err(|_| anyhow::anyhow!("memory sink lock poisoned"))?
            .push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_sink_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("out"));

        let path = sink.save("Jane Doe.pdf", b"%PDF").await.unwrap();
        assert_eq!(path, tmp.path().join("out").join("Jane Doe.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn test_directory_sink_rejects_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("out"));

        for name in ["../escaped.pdf", "/tmp/abs.pdf", "nested/file.pdf", "..", ""] {
            assert!(sink.save(name, b"x").await.is_err(), "{}", name);
        }
        assert!(!tmp.path().join("escaped.pdf").exists());
        assert!(!tmp.path().join("out").join("nested").exists());
    }
}
