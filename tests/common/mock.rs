//! In-memory host ports that record how they were called.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use impls_lens::domain::anchor::{Location, Position};
use impls_lens::domain::launch::LaunchConfig;
use impls_lens::domain::ports::{
    DebugLauncher, DocumentProvider, ImplementationProvider, Navigator, Notifier, PickItem,
    Picker,
};

/// Documents served from a map.
#[derive(Default)]
pub struct MockDocuments {
    files: HashMap<PathBuf, String>,
}

impl MockDocuments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.files
            .insert(path.as_ref().to_path_buf(), content.into());
        self
    }
}

#[async_trait]
impl DocumentProvider for MockDocuments {
    async fn open(&self, path: &Path) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("File not found: {}", path.display()))
    }
}

/// Returns fixed locations (or a fixed error) and records queries.
pub struct MockImplementations {
    result: std::result::Result<Vec<Location>, String>,
    pub queries: Mutex<Vec<(PathBuf, Position)>>,
    /// When set, the query never resolves.
    hang: bool,
}

impl MockImplementations {
    pub fn returning(locations: Vec<Location>) -> Self {
        Self {
            result: Ok(locations),
            queries: Mutex::new(Vec::new()),
            hang: false,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            queries: Mutex::new(Vec::new()),
            hang: false,
        }
    }

    pub fn hanging() -> Self {
        Self {
            result: Ok(Vec::new()),
            queries: Mutex::new(Vec::new()),
            hang: true,
        }
    }
}

#[async_trait]
impl ImplementationProvider for MockImplementations {
    async fn implementations(&self, document: &Path, position: Position) -> Result<Vec<Location>> {
        self.queries
            .lock()
            .unwrap()
            .push((document.to_path_buf(), position));
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.result.clone().map_err(|e| anyhow!(e))
    }
}

/// Answers with a fixed choice and records every item list it was shown.
pub struct MockPicker {
    choice: Option<usize>,
    pub shown: Mutex<Vec<Vec<PickItem>>>,
}

impl MockPicker {
    pub fn choosing(index: usize) -> Self {
        Self {
            choice: Some(index),
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn dismissing() -> Self {
        Self {
            choice: None,
            shown: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.shown.lock().unwrap().len()
    }
}

#[async_trait]
impl Picker for MockPicker {
    async fn pick(&self, items: Vec<PickItem>) -> Result<Option<usize>> {
        self.shown.lock().unwrap().push(items);
        Ok(self.choice)
    }
}

#[derive(Default)]
pub struct MockNavigator {
    pub revealed: Mutex<Vec<Location>>,
    pub fail: bool,
}

impl MockNavigator {
    pub fn failing() -> Self {
        Self {
            revealed: Mutex::new(Vec::new()),
            fail: true,
        }
    }
}

#[async_trait]
impl Navigator for MockNavigator {
    async fn reveal(&self, location: &Location) -> Result<()> {
        if self.fail {
            return Err(anyhow!("editor refused to open {}", location.path.display()));
        }
        self.revealed.lock().unwrap().push(location.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockNotifier {
    pub infos: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl MockNotifier {
    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn info(&self, message: &str) {
        self.infos.lock().unwrap().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}

#[derive(Default)]
pub struct MockLauncher {
    pub launched: Mutex<Vec<LaunchConfig>>,
    pub fail: bool,
}

#[async_trait]
impl DebugLauncher for MockLauncher {
    async fn launch(&self, config: &LaunchConfig) -> Result<()> {
        if self.fail {
            return Err(anyhow!("debug adapter unavailable"));
        }
        self.launched.lock().unwrap().push(config.clone());
        Ok(())
    }
}
