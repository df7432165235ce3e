//! Line-oriented interface scanner.
//!
//! Finds `type X interface {` blocks and emits one [`MethodAnchor`] per method
//! signature inside them. This is deliberately not a parser: block boundaries
//! come from counting raw `{` / `}` characters, so braces inside strings or
//! comments in an interface body are counted as well.

use crate::domain::anchor::{MethodAnchor, Range, utf16_column};
use crate::domain::cancel::CancellationToken;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

fn interface_decl_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*type\s+(\w+)\s+interface\s*\{\s*$").expect("interface decl regex")
    })
}

/// A line that can begin a method signature: an identifier, optionally
/// followed by the opening of its parameter list.
fn signature_start_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\w+\s*(?:\(.*)?$").expect("signature start regex"))
}

fn method_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\w+)\s*\(").expect("method name regex"))
}

/// Open interface block while scanning.
#[derive(Debug)]
struct InterfaceBlock<'a> {
    name: &'a str,
    start_line: usize,
    depth: i64,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InterfaceScanner;

impl InterfaceScanner {
    pub fn new() -> Self {
        Self
    }

    /// Scan the whole document. Never fails; unrecognised content simply
    /// produces no anchors.
    pub fn scan(&self, text: &str) -> Vec<MethodAnchor> {
        self.scan_lines(text, |_| false).unwrap_or_default()
    }

    /// Like [`scan`](Self::scan) but abandons the pass when `cancel` fires.
    /// Returns `None` in that case; partial results are never returned.
    pub fn scan_with_cancel(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Option<Vec<MethodAnchor>> {
        self.scan_lines(text, |_| cancel.is_cancelled())
    }

    /// `is_stale` is polled with the current line index before every line,
    /// including continuation lines of a wrapped signature.
    fn scan_lines(
        &self,
        text: &str,
        mut is_stale: impl FnMut(usize) -> bool,
    ) -> Option<Vec<MethodAnchor>> {
        let lines: Vec<&str> = text.lines().collect();
        let mut anchors = Vec::new();
        let mut block: Option<InterfaceBlock> = None;
        let mut cursor = 0;

        while cursor < lines.len() {
            if is_stale(cursor) {
                debug!(line = cursor, "interface scan cancelled");
                return None;
            }

            let line = lines[cursor];

            let Some(current) = block.as_mut() else {
                if let Some(caps) = interface_decl_regex().captures(line) {
                    let name = caps.get(1).map_or("", |m| m.as_str());
                    block = Some(InterfaceBlock {
                        name,
                        start_line: cursor,
                        depth: 1,
                    });
                }
                cursor += 1;
                continue;
            };

            current.depth += brace_delta(line);
            if current.depth <= 0 {
                debug!(
                    interface = current.name,
                    start_line = current.start_line,
                    end_line = cursor,
                    "interface block closed"
                );
                block = None;
                cursor += 1;
                continue;
            }

            let head = strip_line_comment(line).trim();
            // Blank, comment-only, embedded interfaces and other non-method lines.
            if head.is_empty() || !signature_start_regex().is_match(head) {
                cursor += 1;
                continue;
            }

            let start_line = cursor;
            let mut signature = head.to_string();
            let mut shape = SignatureShape::default();
            shape.push(head);
            while !shape.is_complete() && current.depth > 0 && cursor + 1 < lines.len() {
                if is_stale(cursor + 1) {
                    debug!(line = cursor + 1, "interface scan cancelled inside signature");
                    return None;
                }
                cursor += 1;
                let next = lines[cursor];
                current.depth += brace_delta(next);
                let part = strip_line_comment(next).trim();
                if part.is_empty() {
                    continue;
                }
                shape.push(part);
                signature.push(' ');
                signature.push_str(part);
            }

            if let Some(anchor) = anchor_for(&signature, lines[start_line], start_line) {
                anchors.push(anchor);
            }

            // A continuation may have swallowed the block's closing brace.
            if current.depth <= 0 {
                block = None;
            }
            cursor += 1;
        }

        if let Some(open) = &block {
            debug!(
                interface = open.name,
                start_line = open.start_line,
                "interface block not closed before end of document"
            );
        }
        debug!(anchors = anchors.len(), lines = lines.len(), "interface scan complete");
        Some(anchors)
    }
}

/// Completeness of a `name(params) [results]` signature, fed one physical
/// line at a time with comments already stripped. Complete once the parameter
/// list has closed, every paren is balanced and the text does not end in a
/// comma.
#[derive(Debug, Default)]
struct SignatureShape {
    depth: i64,
    params_closed: bool,
    trailing_comma: bool,
}

impl SignatureShape {
    fn push(&mut self, part: &str) {
        for c in part.chars() {
            match c {
                '(' => self.depth += 1,
                ')' => {
                    self.depth = (self.depth - 1).max(0);
                    if self.depth == 0 {
                        self.params_closed = true;
                    }
                }
                _ => {}
            }
        }
        if let Some(last) = part.trim_end().chars().last() {
            self.trailing_comma = last == ',';
        }
    }

    fn is_complete(&self) -> bool {
        self.params_closed && self.depth == 0 && !self.trailing_comma
    }
}

/// Net `{` minus `}` on a line. Counts every brace, including ones inside
/// strings and comments.
fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

fn strip_line_comment(text: &str) -> &str {
    match text.find("//") {
        Some(idx) => &text[..idx],
        None => text,
    }
}

/// Extract the method name from a (possibly joined) signature and locate it on
/// the physical line where the signature started.
fn anchor_for(signature: &str, raw_line: &str, line_index: usize) -> Option<MethodAnchor> {
    let name = method_name_regex().captures(signature)?.get(1)?.as_str();
    let byte_start = raw_line.find(name)?;
    let start = utf16_column(raw_line, byte_start);
    let end = utf16_column(raw_line, byte_start + name.len());
    Some(MethodAnchor {
        name: name.to_string(),
        range: Range::on_line(line_index as u32, start, end),
    })
}
