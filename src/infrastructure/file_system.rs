use crate::core::{interfaces::FileSystemService, models::*};
use crate::utils::{EzminError, Result};
use std::fs::{File, Permissions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

pub struct TokioFileSystemService;

impl TokioFileSystemService {
    async fn ensure_parent(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_directory(parent).await?;
            }
        }
        Ok(())
    }

    /// Stage new contents next to `path` and rename them over it.
    ///
    /// The staging file gets an unpredictable name in the same directory, so
    /// concurrent writers never share it and readers only see whole files.
    async fn replace<F>(path: &Path, fill: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> io::Result<Option<Permissions>> + Send + 'static,
    {
        let path = path.to_path_buf();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        tokio::task::spawn_blocking(move || -> io::Result<()> {
            let mut staging = NamedTempFile::new_in(&parent)?;
            if let Some(permissions) = fill(staging.as_file_mut())? {
                staging.as_file().set_permissions(permissions)?;
            }
            staging.as_file().sync_all()?;
            staging.persist(&path).map_err(|e| e.error)?;
            Ok(())
        })
        .await
        .map_err(|e| EzminError::Io(io::Error::new(io::ErrorKind::Other, e)))??;

        Ok(())
    }
}

/// Mode for freshly written files; `NamedTempFile` creates them owner-only.
#[cfg(unix)]
fn published_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn published_permissions() -> Option<Permissions> {
    None
}

#[async_trait::async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn entry_kind(&self, path: &Path) -> Result<EntryKind> {
        let metadata = fs::metadata(path).await?;
        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<SourceEntry>> {
        let mut entries = fs::read_dir(path).await?;
        let mut children = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            children.push(SourceEntry { path, name });
        }

        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        self.ensure_parent(path).await?;

        let content = content.to_owned();
        Self::replace(path, move |file| {
            file.write_all(content.as_bytes())?;
            Ok(published_permissions())
        })
        .await
    }

    async fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        self.ensure_parent(to).await?;

        let from = from.to_path_buf();
        Self::replace(to, move |file| {
            let mut source = File::open(&from)?;
            io::copy(&mut source, file)?;
            Ok(Some(source.metadata()?.permissions()))
        })
        .await
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        Ok(fs::create_dir_all(path).await?)
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }
}
