//! Host capabilities the domain calls into. Implemented by adapters (and by
//! in-memory mocks in tests).

use crate::domain::anchor::{Location, Position};
use crate::domain::launch::LaunchConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Document text provider port
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Full current text of the document at `path`.
    async fn open(&self, path: &Path) -> Result<String>;
}

/// "Implementations of the symbol at this position" port (language server)
#[async_trait]
pub trait ImplementationProvider: Send + Sync {
    async fn implementations(&self, document: &Path, position: Position) -> Result<Vec<Location>>;
}

/// One entry in a single-choice picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub description: String,
    pub detail: String,
}

/// Interactive single-choice picker port
#[async_trait]
pub trait Picker: Send + Sync {
    /// Index of the chosen item, or `None` when the user dismissed the picker.
    async fn pick(&self, items: Vec<PickItem>) -> Result<Option<usize>>;
}

/// Transient user notices. Informational and error notices are styled
/// differently by the host.
pub trait Notifier: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Open a document and reveal a range as the active selection.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn reveal(&self, location: &Location) -> Result<()>;
}

/// Debugger launch port
#[async_trait]
pub trait DebugLauncher: Send + Sync {
    async fn launch(&self, config: &LaunchConfig) -> Result<()>;
}
