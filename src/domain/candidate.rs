use crate::domain::anchor::{Location, Range};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default substring marking test doubles.
pub const DEFAULT_MOCK_MARKER: &str = "mock";

/// Whether an implementation lives in a test double or in real code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Real,
    Mock,
}

impl Classification {
    /// Classify by absolute path: mock when the lower-cased path contains any
    /// of `markers` (markers are compared lower-cased too).
    pub fn of_path(path: &Path, markers: &[String]) -> Self {
        let lowered = path.to_string_lossy().to_lowercase();
        if markers
            .iter()
            .any(|m| !m.is_empty() && lowered.contains(&m.to_lowercase()))
        {
            Classification::Mock
        } else {
            Classification::Real
        }
    }

    /// Ranking key: real implementations first.
    pub fn sort_key(self) -> u8 {
        match self {
            Classification::Real => 0,
            Classification::Mock => 1,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Classification::Real => "$(symbol-method)",
            Classification::Mock => "$(beaker)",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Real => "real",
            Classification::Mock => "mock",
        }
    }
}

/// One implementation offered to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationCandidate {
    pub location: Location,
    /// First non-blank line of the implementation, trimmed.
    pub preview: String,
    /// Path relative to the workspace root, or the full path when outside it.
    pub relative_path: String,
    pub classification: Classification,
}

impl ImplementationCandidate {
    pub fn label(&self) -> String {
        format!("{} {}", self.classification.icon(), self.preview)
    }
}

/// Stable sort: every real candidate before every mock one, input order
/// kept within each class.
pub fn rank_candidates(candidates: &mut [ImplementationCandidate]) {
    candidates.sort_by_key(|c| c.classification.sort_key());
}

/// First non-blank line within `range` (inclusive of the end line), trimmed.
/// Falls back to the first non-blank line at or after the start when the range
/// itself is blank, and to an empty string past the end of the text.
pub fn preview_line(text: &str, range: &Range) -> String {
    let start = range.start.line as usize;
    let end = (range.end.line as usize).max(start);
    let in_range = text
        .lines()
        .skip(start)
        .take(end - start + 1)
        .map(str::trim)
        .find(|l| !l.is_empty());

    in_range
        .or_else(|| text.lines().skip(start).map(str::trim).find(|l| !l.is_empty()))
        .unwrap_or_default()
        .to_string()
}

/// Display path relative to `root`; falls back to the full path.
pub fn relative_display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn markers() -> Vec<String> {
        vec![DEFAULT_MOCK_MARKER.to_string()]
    }

    fn candidate(path: &str, classification: Classification) -> ImplementationCandidate {
        ImplementationCandidate {
            location: Location::new(PathBuf::from(path), Range::on_line(0, 0, 1)),
            preview: path.to_string(),
            relative_path: path.to_string(),
            classification,
        }
    }

    #[test]
    fn test_classification_case_insensitive() {
        let m = markers();
        assert_eq!(
            Classification::of_path(Path::new("/repo/internal/MockStore.go"), &m),
            Classification::Mock
        );
        assert_eq!(
            Classification::of_path(Path::new("/repo/mocks/store.go"), &m),
            Classification::Mock
        );
        assert_eq!(
            Classification::of_path(Path::new("/repo/internal/store.go"), &m),
            Classification::Real
        );
    }

    #[test]
    fn test_classification_ignores_empty_marker() {
        let m = vec![String::new()];
        assert_eq!(
            Classification::of_path(Path::new("/repo/a.go"), &m),
            Classification::Real
        );
    }

    #[test]
    fn test_rank_is_stable() {
        let mut list = vec![
            candidate("m1", Classification::Mock),
            candidate("r1", Classification::Real),
            candidate("m2", Classification::Mock),
            candidate("r2", Classification::Real),
        ];
        rank_candidates(&mut list);
        let order: Vec<&str> = list.iter().map(|c| c.preview.as_str()).collect();
        assert_eq!(order, vec!["r1", "r2", "m1", "m2"]);
    }

    #[test]
    fn test_preview_first_non_blank_in_range() {
        let text = "package x\n\n\n   func (s *S) Get() int {\n\treturn 1\n}\n";
        let range = Range::new(
            crate::domain::anchor::Position::new(1, 0),
            crate::domain::anchor::Position::new(5, 1),
        );
        assert_eq!(preview_line(text, &range), "func (s *S) Get() int {");
    }

    #[test]
    fn test_preview_out_of_bounds_is_empty() {
        assert_eq!(preview_line("a\nb", &Range::on_line(10, 0, 1)), "");
    }

    #[test]
    fn test_relative_display_path() {
        assert_eq!(
            relative_display_path(Path::new("/repo/pkg/a.go"), Path::new("/repo")),
            "pkg/a.go"
        );
        assert_eq!(
            relative_display_path(Path::new("/elsewhere/a.go"), Path::new("/repo")),
            "/elsewhere/a.go"
        );
    }

    #[test]
    fn test_label_uses_icon() {
        let c = candidate("x", Classification::Mock);
        assert_eq!(c.label(), "$(beaker) x");
    }
}
