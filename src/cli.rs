use crate::adapters::delve::DelveLauncher;
use crate::adapters::gopls::GoplsImplementationProvider;
use crate::adapters::terminal::{PrintNavigator, TerminalNotifier, TerminalPicker};
use crate::app::dto::{LaunchPlanRequest, LaunchPlanResponse, ScanRequest};
use crate::app::service::LensService;
use crate::domain::anchor::{Position, Range};
use crate::domain::cancel::CancellationToken;
use crate::domain::orchestrator::NavigationOutcome;
use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;

/// Print the lenses for a file as JSON.
pub async fn scan_file(service: &LensService, file: &Path) -> Result<()> {
    let res = service
        .scan(ScanRequest {
            path: file.to_string_lossy().to_string(),
            text: None,
        })
        .await?;
    println!("{}", serde_json::to_string_pretty(&res)?);
    Ok(())
}

/// Run the "show implementations" flow for the method at `line`/`column`
/// (both 1-based). Without `method_name` the lens under the cursor is used.
pub async fn show_implementations(
    service: &LensService,
    file: &Path,
    line: u32,
    column: u32,
    method_name: Option<String>,
    cancel: &CancellationToken,
) -> Result<NavigationOutcome> {
    let path = service.resolve(file);
    let position = Position::new(line.saturating_sub(1), column.saturating_sub(1));

    let (range, name) = match method_name {
        Some(name) => {
            let end = position.character + name.encode_utf16().count() as u32;
            (Range::on_line(position.line, position.character, end), name)
        }
        None => {
            let scan = service
                .scan(ScanRequest {
                    path: path.to_string_lossy().to_string(),
                    text: None,
                })
                .await?;
            let lens = scan
                .lenses
                .into_iter()
                .find(|l| {
                    l.range.start_line == position.line
                        && (l.range.start_character..=l.range.end_character)
                            .contains(&position.character)
                })
                .ok_or_else(|| {
                    anyhow!(
                        "no interface method at {}:{}:{}",
                        path.display(),
                        line,
                        column
                    )
                })?;
            let range = Range::on_line(
                lens.range.start_line,
                lens.range.start_character,
                lens.range.end_character,
            );
            (range, lens.arguments.method_name)
        }
    };

    let config = service.config();
    let orchestrator = service.orchestrator(
        Arc::new(GoplsImplementationProvider::new(
            config.gopls_path,
            service.workspace_root(),
        )),
        Arc::new(TerminalPicker::stdin()),
        Arc::new(PrintNavigator),
        Arc::new(TerminalNotifier),
    );
    Ok(orchestrator
        .show_implementations(&path, range, &name, cancel)
        .await)
}

pub async fn print_launch_plan(service: &LensService, root: Option<&Path>) -> Result<()> {
    let plan = service
        .plan_launch(LaunchPlanRequest {
            workspace_root: root.map(|r| r.to_string_lossy().to_string()),
        })
        .await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&LaunchPlanResponse::from(plan))?
    );
    Ok(())
}

pub async fn debug(service: &LensService, root: Option<&Path>) -> Result<()> {
    let config = service.config();
    let launcher = DelveLauncher::new(config.dlv_path, config.dlv_listen);
    service
        .launch_debug(
            LaunchPlanRequest {
                workspace_root: root.map(|r| r.to_string_lossy().to_string()),
            },
            &launcher,
            &TerminalNotifier,
        )
        .await?;
    Ok(())
}
