//! Uploaded and generated file content.
//!
//! Files are kept in a per-session [`ContentStore`] and referenced from
//! messages through opaque [`ContentHandle`]s.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ChatResult;

/// Maximum number of preview lines kept for a file
pub const MAX_PREVIEW_LINES: usize = 5;

/// Opaque reference to stored file content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHandle(String);

impl ContentHandle {
    /// Allocate a fresh handle
    pub fn generate() -> Self {
        Self(format!("blob:pilot/{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentHandle {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A file selected by the user
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared MIME type, if the picker reported one
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes: bytes.into(),
        }
    }

    /// Set the declared MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Read a file from disk, guessing the MIME type from its extension
    pub async fn from_path(path: impl AsRef<Path>) -> ChatResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let mut file = Self::new(name, bytes);
        file.mime_type = mime_for_extension(&file.name).map(str::to_string);
        Ok(file)
    }

    /// Whether a text preview is produced for this file (CSV or JSON)
    pub fn is_previewable(&self) -> bool {
        // Parameters such as "; charset=utf-8" don't change the type
        let essence = self
            .mime_type
            .as_deref()
            .and_then(|m| m.split(';').next())
            .map(|m| m.trim().to_ascii_lowercase());
        let by_mime = matches!(essence.as_deref(), Some("text/csv") | Some("application/json"));
        by_mime || mime_for_extension(&self.name).is_some()
    }

    /// First `limit` line-split segments of the decoded text (capped at five)
    pub fn preview_lines(&self, limit: usize) -> Vec<String> {
        preview_lines(&String::from_utf8_lossy(&self.bytes), limit)
    }
}

/// MIME type for the previewable extensions
fn mime_for_extension(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// Split `text` on newlines and keep the first `limit` segments (at most five)
pub fn preview_lines(text: &str, limit: usize) -> Vec<String> {
    text.split('\n')
        .take(limit.min(MAX_PREVIEW_LINES))
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

#[derive(Debug, Clone)]
struct StoredContent {
    name: String,
    mime_type: Option<String>,
    bytes: Arc<[u8]>,
}

/// Content addressed by handle
#[derive(Debug, Default)]
pub struct ContentStore {
    entries: HashMap<ContentHandle, StoredContent>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bytes and return a new handle for them
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        mime_type: Option<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> ContentHandle {
        let handle = ContentHandle::generate();
        self.entries.insert(
            handle.clone(),
            StoredContent {
                name: name.into(),
                mime_type,
                bytes: bytes.into(),
            },
        );
        handle
    }

    /// Resolve a handle to its bytes
    pub fn resolve(&self, handle: &ContentHandle) -> Option<Arc<[u8]>> {
        self.entries.get(handle).map(|c| Arc::clone(&c.bytes))
    }

    /// File name stored with a handle
    pub fn name(&self, handle: &ContentHandle) -> Option<&str> {
        self.entries.get(handle).map(|c| c.name.as_str())
    }

    /// MIME type stored with a handle
    pub fn mime_type(&self, handle: &ContentHandle) -> Option<&str> {
        self.entries.get(handle).and_then(|c| c.mime_type.as_deref())
    }

    /// Drop the content behind a handle. Returns false if it was unknown.
    pub fn release(&mut self, handle: &ContentHandle) -> bool {
        self.entries.remove(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
