use crate::domain::ports::{checked_key, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Resolves `path` under the base directory; keys that would leave it are rejected.
    pub fn full_path(&self, path: &str) -> Result<PathBuf> {
        Ok(Path::new(&self.base_path).join(checked_key(path)?))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let data = tokio::fs::read(self.full_path(path)?).await?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8], content_type: &str) -> Result<()> {
        let full_path = self.full_path(path)?;

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::debug!(
            "Writing {} ({} bytes, {}) to {}",
            path,
            data.len(),
            content_type,
            full_path.display()
        );
        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    fn uri(&self, path: &str) -> String {
        format!("file://{}/{}", self.base_path.trim_end_matches('/'), path)
    }
}
