//! `gopls implementation` as the implementation provider.

use crate::domain::anchor::{Location, Position, Range, utf16_column};
use crate::domain::ports::ImplementationProvider;
use anyhow::{Context as _, Result, bail};
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tokio::process::Command;
use tracing::{debug, warn};

/// `path:line:col`, optionally followed by `-col` or `-line:col`.
fn span_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+):(\d+):(\d+)(?:-(?:(\d+):)?(\d+))?$").expect("gopls span regex")
    })
}

pub struct GoplsImplementationProvider {
    gopls_path: String,
    workspace_root: PathBuf,
}

impl GoplsImplementationProvider {
    pub fn new(gopls_path: impl Into<String>, workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            gopls_path: gopls_path.into(),
            workspace_root: workspace_root.into(),
        }
    }
}

#[async_trait]
impl ImplementationProvider for GoplsImplementationProvider {
    async fn implementations(&self, document: &Path, position: Position) -> Result<Vec<Location>> {
        let line_text = tokio::fs::read_to_string(document)
            .await
            .with_context(|| format!("Failed to read source file: {}", document.display()))?
            .lines()
            .nth(position.line as usize)
            .map(str::to_string)
            .unwrap_or_default();
        let byte_column = utf16_to_byte_column(&line_text, position.character);
        // gopls positions are 1-based, columns in bytes.
        let target = format!(
            "{}:{}:{}",
            document.display(),
            position.line + 1,
            byte_column + 1
        );
        debug!(gopls = %self.gopls_path, %target, "running gopls implementation");

        let output = Command::new(&self.gopls_path)
            .arg("implementation")
            .arg(&target)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .with_context(|| format!("Failed to run {}", self.gopls_path))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("gopls implementation failed ({}): {}", output.status, stderr.trim());
        }
        let mut locations = parse_implementation_output(&String::from_utf8_lossy(&output.stdout));
        to_utf16_columns(&mut locations).await;
        Ok(locations)
    }
}

/// Rewrite byte columns from gopls into UTF-16 columns using each target
/// file's text. Files that cannot be read keep their byte columns.
async fn to_utf16_columns(locations: &mut [Location]) {
    let mut texts: HashMap<PathBuf, Option<String>> = HashMap::new();
    for location in locations.iter_mut() {
        if !texts.contains_key(&location.path) {
            let text = tokio::fs::read_to_string(&location.path).await;
            if let Err(e) = &text {
                warn!(path = %location.path.display(), error = %e, "keeping byte columns");
            }
            texts.insert(location.path.clone(), text.ok());
        }
        if let Some(Some(text)) = texts.get(&location.path) {
            convert_range_columns(&mut location.range, text);
        }
    }
}

fn convert_range_columns(range: &mut Range, text: &str) {
    for position in [&mut range.start, &mut range.end] {
        if let Some(line) = text.lines().nth(position.line as usize) {
            position.character = utf16_column(line, position.character as usize);
        }
    }
}

/// Parse `gopls implementation` output, one span per line. Unparseable lines
/// are skipped. Columns are still gopls byte offsets at this point.
pub fn parse_implementation_output(stdout: &str) -> Vec<Location> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|line| {
            let parsed = parse_span(line);
            if parsed.is_none() {
                warn!(line, "unrecognised gopls output line");
            }
            parsed
        })
        .collect()
}

fn parse_span(line: &str) -> Option<Location> {
    let caps = span_regex().captures(line)?;
    let number = |i: usize| -> Option<u32> { caps.get(i)?.as_str().parse().ok() };

    let path = caps.get(1)?.as_str();
    let start_line = number(2)?.saturating_sub(1);
    let start_col = number(3)?.saturating_sub(1);
    let end_line = number(4).map_or(start_line, |l| l.saturating_sub(1));
    let end_col = number(5).map_or(start_col, |c| c.saturating_sub(1));

    Some(Location::new(
        path,
        Range::new(
            Position::new(start_line, start_col),
            Position::new(end_line, end_col),
        ),
    ))
}

fn utf16_to_byte_column(line: &str, utf16_column: u32) -> usize {
    let mut units = 0u32;
    for (byte, ch) in line.char_indices() {
        if units >= utf16_column {
            return byte;
        }
        units += ch.len_utf16() as u32;
    }
    line.len()
}
