use crate::domain::anchor::Range;
use crate::domain::launch::{LaunchConfig, LaunchPlan};
use rmcp::schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct HealthResponse {
    pub workspace_root: String,
    pub command_id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RangeDto {
    /// 0-based line.
    pub start_line: u32,
    /// 0-based UTF-16 column.
    pub start_character: u32,
    /// 0-based line.
    pub end_line: u32,
    /// 0-based UTF-16 column, exclusive.
    pub end_character: u32,
    pub start_line_1based: u32,
}

impl From<Range> for RangeDto {
    fn from(range: Range) -> Self {
        Self {
            start_line: range.start.line,
            start_character: range.start.character,
            end_line: range.end.line,
            end_character: range.end.character,
            start_line_1based: range.start.line + 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanRequest {
    /// Document path; relative paths resolve against the workspace root.
    pub path: String,
    /// Current (possibly unsaved) text. Read from disk when absent.
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanResponse {
    pub document: String,
    pub lenses: Vec<CodeLensDto>,
}

/// One activatable marker per interface method.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CodeLensDto {
    pub title: String,
    pub command: String,
    pub range: RangeDto,
    pub arguments: LensArguments,
}

/// Parameters handed back to the "show implementations" action.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LensArguments {
    pub document: String,
    pub range: RangeDto,
    pub method_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct LaunchPlanRequest {
    /// Defaults to the service's workspace root.
    pub workspace_root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LaunchPlanResponse {
    pub entry_file: String,
    pub env_file: Option<String>,
    pub rewritten_keys: Vec<String>,
    pub config: LaunchConfigDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LaunchConfigDto {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub request: String,
    pub mode: String,
    pub program: String,
    pub env: BTreeMap<String, String>,
}

impl From<LaunchConfig> for LaunchConfigDto {
    fn from(config: LaunchConfig) -> Self {
        Self {
            name: config.name,
            kind: config.kind,
            request: config.request,
            mode: config.mode,
            program: config.program.to_string_lossy().to_string(),
            env: config.env,
        }
    }
}

impl From<LaunchPlan> for LaunchPlanResponse {
    fn from(plan: LaunchPlan) -> Self {
        Self {
            entry_file: plan.entry_file.to_string_lossy().to_string(),
            env_file: plan.env_file.map(|p| p.to_string_lossy().to_string()),
            rewritten_keys: plan.rewritten_keys,
            config: plan.config.into(),
        }
    }
}
