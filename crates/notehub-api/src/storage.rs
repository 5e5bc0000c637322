use anyhow::{Result, bail};
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, warn};

/// On-disk blob storage for uploaded files.
///
/// Each upload is stored flat at `{dir}/{unix_millis}-{original_name}`; the
/// generated name is what note records reference and what the static
/// `/uploads` route serves.
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub async fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).await?;
        info!("Upload storage directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// Path to a stored blob.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Write a blob under a collision-resistant generated name and return
    /// that name. Original names that could escape the directory are
    /// rejected.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        let original = original_name.trim();
        if original.is_empty() {
            bail!("empty file name");
        }
        if original.contains('/') || original.contains('\\') || original.contains("..") {
            bail!("invalid file name: {}", original);
        }

        let name = format!("{}-{}", chrono::Utc::now().timestamp_millis(), original);
        fs::write(self.path(&name), bytes).await?;
        Ok(name)
    }

    /// Delete a stored blob. A file that is already gone is not an error.
    pub async fn delete(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Blob {} already gone", name);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn temp_storage() -> Storage {
        let dir = std::env::temp_dir().join(format!("notehub-storage-{}", Uuid::new_v4()));
        Storage::new(dir).await.unwrap()
    }

    #[tokio::test]
    async fn store_prefixes_and_round_trips() {
        let storage = temp_storage().await;

        let name = storage.store("syllabus.pdf", b"content").await.unwrap();
        assert!(name.ends_with("-syllabus.pdf"));

        let read = fs::read(storage.path(&name)).await.unwrap();
        assert_eq!(read, b"content");

        fs::remove_dir_all(storage.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let storage = temp_storage().await;

        assert!(storage.store("../evil.sh", b"x").await.is_err());
        assert!(storage.store("a/b.pdf", b"x").await.is_err());
        assert!(storage.store("", b"x").await.is_err());

        fs::remove_dir_all(storage.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let storage = temp_storage().await;

        let name = storage.store("doc.txt", b"x").await.unwrap();
        storage.delete(&name).await.unwrap();
        storage.delete(&name).await.unwrap();

        fs::remove_dir_all(storage.dir()).await.unwrap();
    }
}
