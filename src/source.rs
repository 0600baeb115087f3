use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];
pub const INLINE_SOURCE_NAME: &str = "Pasted text";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unsupported file format: {0} (only .txt and .md files are supported)")]
    UnsupportedFormat(PathBuf),
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("the text is empty")]
    Empty,
}

/// Text handed to the generator, with the name its drill set is titled after.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceText {
    pub name: String,
    pub content: String,
}

impl SourceText {
    pub fn from_file(path: &Path) -> Result<Self, SourceError> {
        if !is_supported(path) {
            return Err(SourceError::UnsupportedFormat(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| INLINE_SOURCE_NAME.to_string());
        Ok(Self { name, content })
    }

    pub fn inline(text: &str) -> Result<Self, SourceError> {
        if text.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(Self {
            name: INLINE_SOURCE_NAME.to_string(),
            content: text.to_string(),
        })
    }
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}
