//! "Show implementations" flow behind every impls lens.
//!
//! query → classify/rank → pick → reveal. Every failure is reported through the
//! [`Notifier`] and turned into [`NavigationOutcome::Failed`]; nothing escapes
//! to the caller.

use crate::domain::anchor::{Location, Range};
use crate::domain::cancel::CancellationToken;
use crate::domain::candidate::{
    Classification, ImplementationCandidate, preview_line, rank_candidates,
    relative_display_path,
};
use crate::domain::ports::{DocumentProvider, ImplementationProvider, Navigator, Notifier, PickItem, Picker};
use anyhow::{Context as _, Result, bail};
use futures::future::try_join_all;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// How one invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The query returned nothing; an info notice was shown.
    NoResults,
    /// The user closed the picker without choosing.
    Dismissed,
    /// The external cancellation signal fired.
    Cancelled,
    Navigated(Location),
    /// An error notice with this message was shown.
    Failed(String),
}

pub struct NavigationOrchestrator {
    implementations: Arc<dyn ImplementationProvider>,
    documents: Arc<dyn DocumentProvider>,
    picker: Arc<dyn Picker>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    workspace_root: PathBuf,
    mock_markers: Vec<String>,
}

impl NavigationOrchestrator {
    pub fn new(
        implementations: Arc<dyn ImplementationProvider>,
        documents: Arc<dyn DocumentProvider>,
        picker: Arc<dyn Picker>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        workspace_root: PathBuf,
    ) -> Self {
        Self {
            implementations,
            documents,
            picker,
            navigator,
            notifier,
            workspace_root,
            mock_markers: vec![crate::domain::candidate::DEFAULT_MOCK_MARKER.to_string()],
        }
    }

    pub fn with_mock_markers(mut self, markers: Vec<String>) -> Self {
        self.mock_markers = markers;
        self
    }

    pub async fn show_implementations(
        &self,
        document: &Path,
        range: Range,
        method_name: &str,
        cancel: &CancellationToken,
    ) -> NavigationOutcome {
        info!(
            method = method_name,
            document = %document.display(),
            line = range.start.line,
            "looking up implementations"
        );
        match self.run(document, range, method_name, cancel).await {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = format!("Failed to show implementations of {method_name}: {e:#}");
                error!("{message}");
                self.notifier.error(&message);
                NavigationOutcome::Failed(message)
            }
        }
    }

    async fn run(
        &self,
        document: &Path,
        range: Range,
        method_name: &str,
        cancel: &CancellationToken,
    ) -> Result<NavigationOutcome> {
        let query = self.implementations.implementations(document, range.start);
        let Some(locations) = until_cancelled(cancel, query).await else {
            return Ok(NavigationOutcome::Cancelled);
        };
        let locations = locations.context("implementation query failed")?;

        if locations.is_empty() {
            self.notifier
                .info(&format!("No implementations found for {method_name}"));
            return Ok(NavigationOutcome::NoResults);
        }
        debug!(count = locations.len(), "implementation locations received");

        let Some(candidates) = until_cancelled(cancel, self.build_candidates(locations)).await
        else {
            return Ok(NavigationOutcome::Cancelled);
        };
        let candidates = candidates?;

        let items = candidates.iter().map(pick_item).collect();
        let Some(choice) = until_cancelled(cancel, self.picker.pick(items)).await else {
            return Ok(NavigationOutcome::Cancelled);
        };
        let Some(index) = choice.context("picker failed")? else {
            debug!(method = method_name, "picker dismissed");
            return Ok(NavigationOutcome::Dismissed);
        };
        let Some(selected) = candidates.get(index) else {
            bail!("picker returned index {index} for {} items", candidates.len());
        };

        self.navigator
            .reveal(&selected.location)
            .await
            .with_context(|| format!("failed to open {}", selected.location.path.display()))?;
        info!(target_path = %selected.location.path.display(), "navigated to implementation");
        Ok(NavigationOutcome::Navigated(selected.location.clone()))
    }

    /// Open every target concurrently and build ranked candidates. Output order
    /// follows the query order before ranking.
    async fn build_candidates(
        &self,
        locations: Vec<Location>,
    ) -> Result<Vec<ImplementationCandidate>> {
        let mut candidates = try_join_all(locations.into_iter().map(|location| async move {
            let text = self
                .documents
                .open(&location.path)
                .await
                .with_context(|| format!("failed to open {}", location.path.display()))?;
            let classification = Classification::of_path(&location.path, &self.mock_markers);
            Ok::<_, anyhow::Error>(ImplementationCandidate {
                preview: preview_line(&text, &location.range),
                relative_path: relative_display_path(&location.path, &self.workspace_root),
                classification,
                location,
            })
        }))
        .await?;

        rank_candidates(&mut candidates);
        Ok(candidates)
    }
}

fn pick_item(candidate: &ImplementationCandidate) -> PickItem {
    PickItem {
        label: candidate.label(),
        description: match candidate.classification {
            Classification::Mock => candidate.classification.as_str().to_string(),
            Classification::Real => String::new(),
        },
        detail: candidate.relative_path.clone(),
    }
}

/// `None` if `cancel` fires first.
async fn until_cancelled<F: Future>(cancel: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        out = fut => Some(out),
    }
}
