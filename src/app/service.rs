use crate::app::dto::*;
use crate::config::LensConfig;
use crate::domain::anchor::MethodAnchor;
use crate::domain::cancel::CancellationToken;
use crate::domain::launch::{LaunchPlan, plan_launch};
use crate::domain::orchestrator::NavigationOrchestrator;
use crate::domain::ports::{
    DebugLauncher, DocumentProvider, ImplementationProvider, Navigator, Notifier, Picker,
};
use crate::domain::scanner::InterfaceScanner;
use anyhow::{Context as _, Result, anyhow};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tokio::task::spawn_blocking;
use tracing::{debug, error, info};

/// Entry point shared by the CLI and both servers.
#[derive(Clone)]
pub struct LensService {
    inner: Arc<RwLock<ServiceData>>,
}

struct ServiceData {
    workspace_root: PathBuf,
    config: LensConfig,
    scanner: InterfaceScanner,
    documents: Arc<dyn DocumentProvider>,
}

impl LensService {
    pub fn new(
        workspace_root: PathBuf,
        config: LensConfig,
        documents: Arc<dyn DocumentProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ServiceData {
                workspace_root,
                config,
                scanner: InterfaceScanner::new(),
                documents,
            })),
        }
    }

    /// Re-read `impls-lens.toml` from the workspace root.
    pub fn reload_config(&self) -> Result<HealthResponse> {
        let root = self.workspace_root();
        let config = LensConfig::load(&root)?;
        self.inner.write().unwrap().config = config;
        info!(root = %root.display(), "configuration reloaded");
        Ok(self.health())
    }

    pub fn health(&self) -> HealthResponse {
        let data = self.inner.read().unwrap();
        HealthResponse {
            workspace_root: data.workspace_root.to_string_lossy().to_string(),
            command_id: data.config.command_id.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn workspace_root(&self) -> PathBuf {
        self.inner.read().unwrap().workspace_root.clone()
    }

    pub fn config(&self) -> LensConfig {
        self.inner.read().unwrap().config.clone()
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root().join(path)
        }
    }

    /// Lenses for a snapshot of `text`.
    pub fn lenses_for_text(&self, document: &Path, text: &str) -> ScanResponse {
        let anchors = self.inner.read().unwrap().scanner.scan(text);
        self.to_response(document, anchors)
    }

    /// Cancellable variant for hosts that rescan on every edit. `None` means
    /// the result went stale and nothing should be shown.
    pub fn lenses_for_text_with_cancel(
        &self,
        document: &Path,
        text: &str,
        cancel: &CancellationToken,
    ) -> Option<ScanResponse> {
        let anchors = self
            .inner
            .read()
            .unwrap()
            .scanner
            .scan_with_cancel(text, cancel)?;
        Some(self.to_response(document, anchors))
    }

    /// Scan the request text, or the file on disk when no text is given.
    pub async fn scan(&self, req: ScanRequest) -> Result<ScanResponse> {
        let path = self.resolve(Path::new(&req.path));
        let text = match req.text {
            Some(text) => text,
            None => {
                let documents = self.inner.read().unwrap().documents.clone();
                documents.open(&path).await?
            }
        };
        Ok(self.lenses_for_text(&path, &text))
    }

    fn to_response(&self, document: &Path, anchors: Vec<MethodAnchor>) -> ScanResponse {
        let data = self.inner.read().unwrap();
        let document_str = document.to_string_lossy().to_string();
        debug!(document = %document_str, lenses = anchors.len(), "built lenses");
        let lenses = anchors
            .into_iter()
            .map(|anchor| CodeLensDto {
                title: data.config.lens_title.clone(),
                command: data.config.command_id.clone(),
                range: anchor.range.into(),
                arguments: LensArguments {
                    document: document_str.clone(),
                    range: anchor.range.into(),
                    method_name: anchor.name,
                },
            })
            .collect();
        ScanResponse {
            document: document_str,
            lenses,
        }
    }

    /// Orchestrator wired to this service's documents, workspace and mock
    /// markers.
    pub fn orchestrator(
        &self,
        implementations: Arc<dyn ImplementationProvider>,
        picker: Arc<dyn Picker>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> NavigationOrchestrator {
        let data = self.inner.read().unwrap();
        NavigationOrchestrator::new(
            implementations,
            data.documents.clone(),
            picker,
            navigator,
            notifier,
            data.workspace_root.clone(),
        )
        .with_mock_markers(data.config.mock_markers.clone())
    }

    /// Find entry + env files and build the launch configuration.
    pub async fn plan_launch(&self, req: LaunchPlanRequest) -> Result<LaunchPlan> {
        let root = match req.workspace_root {
            Some(root) => self.resolve(Path::new(&root)),
            None => self.workspace_root(),
        };
        let options = self.config().launch_options();
        spawn_blocking(move || plan_launch(&root, &options))
            .await
            .map_err(|e| anyhow!("task join error: {e}"))?
    }

    /// Plan and hand off to `launcher`. Failures are reported through
    /// `notifier` as well as returned.
    pub async fn launch_debug(
        &self,
        req: LaunchPlanRequest,
        launcher: &dyn DebugLauncher,
        notifier: &dyn Notifier,
    ) -> Result<LaunchPlan> {
        let result = async {
            let plan = self
                .plan_launch(req)
                .await
                .context("Failed to prepare debug launch")?;
            if !plan.rewritten_keys.is_empty() {
                info!(keys = ?plan.rewritten_keys, "rewrote host values for container access");
            }
            launcher
                .launch(&plan.config)
                .await
                .context("Failed to start debug session")?;
            Ok::<_, anyhow::Error>(plan)
        }
        .await;

        match result {
            Ok(plan) => {
                notifier.info(&format!(
                    "Debug session started for {}",
                    plan.entry_file.display()
                ));
                Ok(plan)
            }
            Err(e) => {
                let message = format!("{e:#}");
                error!("{message}");
                notifier.error(&message);
                Err(e)
            }
        }
    }
}
