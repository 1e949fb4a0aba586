//! Local filesystem storage implementation.
//!
//! All writes go through a temp file and a rename, so an interrupted run
//! never leaves a truncated list or document behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{DocumentStore, StoredDocument};

/// File extension of persisted raw documents.
pub const DOCUMENT_EXTENSION: &str = "html";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    documents_dir: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self::with_documents_dir(root_dir, "orders")
    }

    /// Create a LocalStorage with a custom documents sub-directory.
    pub fn with_documents_dir(root_dir: impl Into<PathBuf>, documents_dir: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            documents_dir: documents_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Directory holding raw documents.
    pub fn documents_path(&self) -> PathBuf {
        self.root_dir.join(&self.documents_dir)
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    fn list_key(name: &str) -> String {
        format!("{name}.json")
    }

    fn document_key(&self, order_id: &str) -> Result<String> {
        if order_id.is_empty()
            || order_id.contains(['/', '\\'])
            || order_id.starts_with('.')
        {
            return Err(AppError::validation(format!(
                "order id {order_id:?} cannot be used as a file name"
            )));
        }
        Ok(format!(
            "{}/{}.{}",
            self.documents_dir, order_id, DOCUMENT_EXTENSION
        ))
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        // Unique per write: two URLs may map to the same order id.
        let tmp = path.with_extension(format!("{:016x}.tmp", fastrand::u64(..)));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(path)
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await?;
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DocumentStore for LocalStorage {
    async fn write_url_list(&self, name: &str, urls: &[String]) -> Result<()> {
        let key = Self::list_key(name);
        log::debug!("Writing {} URLs to {}", urls.len(), key);
        self.write_json(&key, urls).await
    }

    async fn read_url_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        self.read_json(&Self::list_key(name)).await
    }

    async fn write_document(&self, order_id: &str, body: &str) -> Result<StoredDocument> {
        let key = self.document_key(order_id)?;
        let path = self.write_bytes(&key, body.as_bytes()).await?;
        let sha256 = hex::encode(Sha256::digest(body.as_bytes()));

        Ok(StoredDocument {
            order_id: order_id.to_string(),
            path,
            sha256,
            bytes: body.len(),
        })
    }

    async fn list_documents(&self) -> Result<Vec<PathBuf>> {
        let dir = self.documents_path();
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No documents directory at {}", dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut documents = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_document = path
                .extension()
                .is_some_and(|ext| ext == DOCUMENT_EXTENSION);
            if is_document && entry.file_type().await?.is_file() {
                documents.push(path);
            }
        }
        documents.sort();
        Ok(documents)
    }
}
