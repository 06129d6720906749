use crate::core::models::*;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::Path;

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    /// Whether `path` is a file or a directory, following symlinks
    async fn entry_kind(&self, path: &Path) -> Result<EntryKind>;
    /// Immediate children of a directory, ordered by name
    async fn list_directory(&self, path: &Path) -> Result<Vec<SourceEntry>>;
    async fn read_file(&self, path: &Path) -> Result<String>;
    /// Replace `path` with `content`, creating parent directories
    async fn write_file(&self, path: &Path, content: &str) -> Result<()>;
    /// Byte-for-byte copy, creating parent directories
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
    async fn exists(&self, path: &Path) -> bool;
}

/// JavaScript minification interface
#[async_trait]
pub trait JsProcessor: Send + Sync {
    async fn minify_script(&self, content: &str, path: &Path) -> Result<String>;
}

/// CSS minification interface
#[async_trait]
pub trait CssProcessor: Send + Sync {
    async fn process_css(&self, content: &str, path: &Path) -> Result<String>;
}
