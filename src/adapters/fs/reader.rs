use crate::domain::ports::DocumentProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// File system document provider. Relative paths resolve against `root`.
pub struct FileDocumentProvider {
    root: PathBuf,
}

impl FileDocumentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl DocumentProvider for FileDocumentProvider {
    async fn open(&self, path: &Path) -> Result<String> {
        let full_path = self.resolve(path);
        tokio::fs::read_to_string(&full_path)
            .await
            .with_context(|| format!("Failed to read source file: {}", full_path.display()))
    }
}
