//! Terminal stand-ins for the editor's picker, notices and navigation, used by
//! the `implslens` binary.

use crate::domain::anchor::Location;
use crate::domain::ports::{Navigator, Notifier, PickItem, Picker};
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Numbered list on stderr; the answer is read line by line from `input`.
/// An empty line, `q`, or end of input dismisses the picker.
pub struct TerminalPicker<R> {
    input: Mutex<R>,
}

impl TerminalPicker<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> TerminalPicker<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R> Picker for TerminalPicker<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn pick(&self, items: Vec<PickItem>) -> Result<Option<usize>> {
        for (i, item) in items.iter().enumerate() {
            if item.description.is_empty() {
                eprintln!("{:>3}. {}", i + 1, item.label);
            } else {
                eprintln!("{:>3}. {} ({})", i + 1, item.label, item.description);
            }
            eprintln!("       {}", item.detail);
        }

        let mut input = self.input.lock().await;
        loop {
            eprint!("Select implementation [1-{}, empty to cancel]: ", items.len());
            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .await
                .context("Failed to read selection")?;
            if read == 0 {
                return Ok(None);
            }
            match parse_selection(&line, items.len()) {
                Selection::Cancel => return Ok(None),
                Selection::Index(i) => return Ok(Some(i)),
                Selection::Invalid => eprintln!("Invalid selection: {}", line.trim()),
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Cancel,
    Index(usize),
    Invalid,
}

fn parse_selection(line: &str, count: usize) -> Selection {
    let answer = line.trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case("q") {
        return Selection::Cancel;
    }
    match answer.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Index(n - 1),
        _ => Selection::Invalid,
    }
}

/// Notices go to the log and to stderr.
#[derive(Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn info(&self, message: &str) {
        info!("{message}");
        eprintln!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
        eprintln!("error: {message}");
    }
}

/// "Navigates" by printing `path:line:column` (1-based) on stdout, which
/// editors and terminals can follow.
#[derive(Debug, Default)]
pub struct PrintNavigator;

#[async_trait]
impl Navigator for PrintNavigator {
    async fn reveal(&self, location: &Location) -> Result<()> {
        println!("{}", format_location(location));
        Ok(())
    }
}

pub fn format_location(location: &Location) -> String {
    format!(
        "{}:{}:{}",
        location.path.display(),
        location.range.start.line + 1,
        location.range.start.character + 1
    )
}
