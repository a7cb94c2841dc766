use std::io;
use std::path::PathBuf;
use tokio::fs;

/// Filesystem-backed photo object store.
///
/// Objects live at `{root}/{key}`; keys look like
/// `events/{event_id}/{photo_id}-{filename}` and are built exclusively from
/// UUIDs plus sanitized filenames, so they cannot escape the root.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub async fn new(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        tracing::info!("Photo storage directory: {}", root.display());
        Ok(Self { root })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Store an object, creating parent directories as needed.
    pub async fn put(&self, key: &str, data: &[u8]) -> io::Result<()> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await
    }

    /// Read an object's bytes.
    pub async fn read(&self, key: &str) -> io::Result<Vec<u8>> {
        fs::read(self.object_path(key)).await
    }

    /// Delete an object. A missing object is treated as already deleted.
    pub async fn delete(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Object {} already gone", key);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Best-effort delete for cascade paths: failures are logged and skipped
    /// so the surrounding row deletion still goes through.
    pub async fn delete_quietly(&self, key: &str) {
        if let Err(e) = self.delete(key).await {
            tracing::error!("Failed to delete object {}: {}", key, e);
        }
    }
}
