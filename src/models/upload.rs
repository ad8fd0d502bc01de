use std::path::Path;

use crate::error::{AppError, Result};

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Reads `path` and guesses its content type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| AppError::InvalidFile {
                reason: format!("{} is not a file", path.display()),
            })?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Extension used for the stored object, falling back to the content subtype.
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| !ext.is_empty())
            .or_else(|| {
                self.content_type
                    .split_once('/')
                    .map(|(_, sub)| sub.split(['+', ';']).next().unwrap_or(sub).to_string())
            })
            .unwrap_or_else(|| "bin".to_string())
    }
}

/// Content after an image reference was inserted, with the new cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub content: String,
    pub cursor: usize,
}
