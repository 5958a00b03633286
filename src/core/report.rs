//! Per-run statistics and the summary printed at the end of each tool

use std::collections::BTreeSet;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

#[derive(Debug, Default, Clone)]
pub struct RunReport {
    /// Folders visited
    pub folders: usize,
    /// Files looked at
    pub processed: usize,
    /// Files rewritten, moved or renamed
    pub changed: usize,
    /// Files left as they were
    pub unchanged: usize,
    /// Inputs that were not eligible
    pub skipped: usize,
    /// Files without a genre
    pub no_genre: usize,
    pub errors: usize,
    pub genres: BTreeSet<String>,
    pub created_folders: BTreeSet<String>,
    pub existing_folders: BTreeSet<String>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a per-file failure and log it
    pub fn record_error(&mut self, subject: &str, error: &str) {
        self.errors += 1;
        log::error!("{}: {}", subject, error);
    }

    /// Render the framed summary block
    ///
    /// `lines` are (label, value) pairs chosen by the tool; the name sets are
    /// listed below them when non-empty.
    pub fn render(&self, title: &str, lines: &[(&str, usize)]) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", title);
        for (label, value) in lines {
            let _ = writeln!(out, "   {}: {}", label, value);
        }

        for (heading, names) in [
            ("Genres found", &self.genres),
            ("Folders created", &self.created_folders),
            ("Existing folders used", &self.existing_folders),
        ] {
            if names.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "{}:", heading);
            for name in names {
                let _ = writeln!(out, "   - {}", name);
            }
        }

        let _ = write!(out, "{}", rule);
        out
    }

    pub fn print_summary(&self, title: &str, lines: &[(&str, usize)]) {
        println!("{}", self.render(title, lines));
        log::info!(
            "{}: processed={} changed={} errors={}",
            title,
            self.processed,
            self.changed,
            self.errors
        );
    }
}
