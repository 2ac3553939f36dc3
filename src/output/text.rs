//! Plain text report.
//!
//! Each group lists its files one per line in discovery order and is closed
//! by a `==========` rule:
//!
//! ```text
//! Duplicates:
//!
//! /photos/a.jpg
//! /backup/a.jpg
//! ==========
//! /music/song.mp3
//! /music/copy of song.mp3
//! ==========
//! ```

use std::io::{self, Write};

use yansi::{Paint, Style};

use crate::duplicates::{DuplicateGroup, ScanSummary};

/// Rule printed after every group.
pub const GROUP_SEPARATOR: &str = "==========";

/// Text report over a set of groups.
pub struct TextOutput<'a> {
    groups: &'a [DuplicateGroup],
    summary: Option<&'a ScanSummary>,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a plain report of `groups`.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self {
            groups,
            summary: None,
            color: false,
        }
    }

    /// Append a summary line built from `summary`.
    #[must_use]
    pub fn with_summary(mut self, summary: &'a ScanSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Style the header, rules and summary.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint(&self, text: &str, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        if self.groups.is_empty() {
            writeln!(writer, "{}", self.paint("No duplicates found.", Style::new().green()))?;
        } else {
            writeln!(writer, "{}", self.paint("Duplicates:", Style::new().bold()))?;
            writeln!(writer)?;
            for group in self.groups {
                for path in &group.files {
                    writeln!(writer, "{}", path.display())?;
                }
                writeln!(writer, "{}", self.paint(GROUP_SEPARATOR, Style::new().dim()))?;
            }
        }

        if let Some(summary) = self.summary {
            writeln!(writer)?;
            writeln!(writer, "{}", self.paint(&summary_line(summary), Style::new().cyan()))?;
            let skipped = summary.scan_errors.len() + summary.hash_errors.len();
            if skipped > 0 {
                let note = format!("{skipped} files or directories skipped due to errors");
                writeln!(writer, "{}", self.paint(&note, Style::new().yellow()))?;
            }
        }

        writer.flush()
    }

    /// Render the report into a string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut buffer = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.write_to(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

fn summary_line(summary: &ScanSummary) -> String {
    format!(
        "{} files compared, {} duplicate groups, {} redundant files, {} reclaimable ({:.1}%) in {:.2?}",
        summary.total_files,
        summary.duplicate_groups,
        summary.duplicate_files,
        summary.reclaimable_display(),
        summary.wasted_percentage(),
        summary.scan_duration
    )
}
