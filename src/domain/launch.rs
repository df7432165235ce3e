//! Container-aware debug launch: locate the `main` package, read the adjacent
//! `.env` file, point loopback host values at the bind host and hand the result
//! to a [`DebugLauncher`](crate::domain::ports::DebugLauncher).

use anyhow::{Context as _, Result, anyhow};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};
use walkdir::WalkDir;

pub type EnvMap = BTreeMap<String, String>;

const SKIPPED_DIRS: &[&str] = &["vendor", "node_modules", "testdata"];
const LOOPBACK_HOSTS: &[&str] = &["localhost", "127.0.0.1", "::1", "[::1]"];

fn package_main_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*package\s+main\b").expect("package main regex"))
}

fn func_main_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^func\s+main\s*\(\s*\)").expect("func main regex"))
}

/// Debug session description handed to the launcher. Field names follow the
/// editor's launch-configuration schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub request: String,
    pub mode: String,
    /// Package directory containing the entry file.
    pub program: PathBuf,
    pub env: EnvMap,
}

/// Which values get rewritten, and to what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRules {
    /// Keys whose upper-cased name contains one of these are host-like.
    pub host_key_markers: Vec<String>,
    pub bind_host: String,
}

impl Default for RewriteRules {
    fn default() -> Self {
        Self {
            host_key_markers: ["HOST", "ADDR", "BIND", "LISTEN"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bind_host: "0.0.0.0".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub session_name: String,
    pub env_file_names: Vec<String>,
    pub rules: RewriteRules,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            session_name: "Debug (container env)".to_string(),
            env_file_names: vec![".env".to_string()],
            rules: RewriteRules::default(),
        }
    }
}

/// Everything discovered while preparing a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchPlan {
    pub entry_file: PathBuf,
    pub env_file: Option<PathBuf>,
    /// Keys whose values were rewritten, sorted.
    pub rewritten_keys: Vec<String>,
    pub config: LaunchConfig,
}

/// First `package main` file with a `func main()` under `root`, preferring
/// shallower files, then lexical order.
pub fn find_entry_file(root: &Path) -> Result<PathBuf> {
    let mut go_files: Vec<(usize, PathBuf)> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            name.ends_with(".go") && !name.ends_with("_test.go")
        })
        .map(|e| (e.depth(), e.into_path()))
        .collect();
    go_files.sort();

    for (_, path) in go_files {
        let Ok(text) = std::fs::read_to_string(&path) else {
            debug!(path = %path.display(), "skipping unreadable go file");
            continue;
        };
        if package_main_regex().is_match(&text) && func_main_regex().is_match(&text) {
            info!(entry = %path.display(), "found program entry file");
            return Ok(path);
        }
    }
    Err(anyhow!(
        "no Go file with `package main` and `func main()` found under {}",
        root.display()
    ))
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Look for an env file next to the entry file, then in each parent up to and
/// including `root`.
pub fn find_env_file(entry_dir: &Path, root: &Path, names: &[String]) -> Option<PathBuf> {
    let mut dir = Some(entry_dir);
    while let Some(current) = dir {
        for name in names {
            let candidate = current.join(name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        if current == root || !current.starts_with(root) {
            break;
        }
        dir = current.parent();
    }
    None
}

/// Parse `KEY=VALUE` lines. Blank lines, `#` comments and lines without `=`
/// are ignored; `export ` prefixes and matching surrounding quotes are
/// stripped. Later assignments win.
pub fn parse_env(text: &str) -> EnvMap {
    let mut env = EnvMap::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        env.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    env
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Rewrite loopback hosts in host-like keys to `rules.bind_host`. Returns the
/// rewritten keys.
pub fn rewrite_for_container(env: &mut EnvMap, rules: &RewriteRules) -> Vec<String> {
    let mut rewritten = Vec::new();
    for (key, value) in env.iter_mut() {
        let upper = key.to_uppercase();
        if !rules
            .host_key_markers
            .iter()
            .any(|m| upper.contains(&m.to_uppercase()))
        {
            continue;
        }
        if let Some(new_value) = rewrite_host_value(value, &rules.bind_host) {
            debug!(key = %key, from = %value, to = %new_value, "rewrote host value");
            *value = new_value;
            rewritten.push(key.clone());
        }
    }
    rewritten
}

/// `localhost:8080` → `0.0.0.0:8080`, `http://127.0.0.1/api` →
/// `http://0.0.0.0/api`. `None` when the host is not a loopback name.
pub fn rewrite_host_value(value: &str, bind_host: &str) -> Option<String> {
    if LOOPBACK_HOSTS.contains(&value) {
        return Some(bind_host.to_string());
    }

    let (scheme, rest) = match value.find("://") {
        Some(idx) => value.split_at(idx + 3),
        None => ("", value),
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, path) = rest.split_at(authority_end);
    let (userinfo, hostport) = match authority.rfind('@') {
        Some(idx) => authority.split_at(idx + 1),
        None => ("", authority),
    };

    let host_end = if hostport.starts_with('[') {
        hostport.find(']').map(|i| i + 1)?
    } else {
        hostport.find(':').unwrap_or(hostport.len())
    };
    let (host, port) = hostport.split_at(host_end);
    if !LOOPBACK_HOSTS.contains(&host.to_lowercase().as_str()) {
        return None;
    }

    Some(format!("{scheme}{userinfo}{bind_host}{port}{path}"))
}

/// Find entry + env file under `root`, rewrite host values and build the
/// launch configuration. Blocking filesystem work.
pub fn plan_launch(root: &Path, options: &LaunchOptions) -> Result<LaunchPlan> {
    let entry_file = find_entry_file(root)?;
    let entry_dir = entry_file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());

    let env_file = find_env_file(&entry_dir, root, &options.env_file_names);
    let mut env = match &env_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read env file: {}", path.display()))?;
            parse_env(&text)
        }
        None => {
            info!(dir = %entry_dir.display(), "no env file found; launching without injected variables");
            EnvMap::new()
        }
    };
    let rewritten_keys = rewrite_for_container(&mut env, &options.rules);

    Ok(LaunchPlan {
        config: LaunchConfig {
            name: options.session_name.clone(),
            kind: "go".to_string(),
            request: "launch".to_string(),
            mode: "debug".to_string(),
            program: entry_dir,
            env,
        },
        entry_file,
        env_file,
        rewritten_keys,
    })
}
