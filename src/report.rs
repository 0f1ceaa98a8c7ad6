//! Console rendering of scan results.
//!
//! All output goes to a caller-supplied [`Write`] so the interactive front end
//! and the tests share the same code. Byte counts on the listing and total
//! lines are always exact; human-readable sizes only appear in the optional
//! summary lines.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Condition, Paint, Painted};

use crate::actions::DeletionReport;
use crate::duplicates::{DuplicateCatalog, HashStats, SizeGroups, SortOrder};

/// Renders listings and summaries.
#[derive(Debug, Clone, Copy)]
pub struct Report {
    color: bool,
    summaries: bool,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            color: false,
            summaries: true,
        }
    }
}

impl Report {
    /// Create a renderer.
    ///
    /// # Arguments
    ///
    /// * `color` - Emit ANSI colours
    /// * `summaries` - Emit the human-readable summary lines
    #[must_use]
    pub fn new(color: bool, summaries: bool) -> Self {
        Self { color, summaries }
    }

    fn paint<'a, T: ?Sized>(&self, value: Painted<&'a T>) -> Painted<&'a T> {
        value.whenever(if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        })
    }

    /// Write every size bucket: a blank line, `{size} bytes`, then its paths.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn size_listing<W: Write>(
        &self,
        out: &mut W,
        groups: &SizeGroups,
        order: SortOrder,
    ) -> io::Result<()> {
        for (size, files) in groups.iter(order) {
            let header = format!("{size} bytes");
            writeln!(out, "\n{}", self.paint(header.as_str().bold()))?;
            for file in files {
                writeln!(out, "{}", file.path.display())?;
            }
        }
        Ok(())
    }

    /// Write the numbered catalog, grouped by size then digest.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn catalog_listing<W: Write>(
        &self,
        out: &mut W,
        catalog: &DuplicateCatalog,
    ) -> io::Result<()> {
        let mut current_size = None;
        for section in catalog.sections() {
            if current_size != Some(section.size) {
                current_size = Some(section.size);
                let header = format!("{} bytes", section.size);
                writeln!(out, "\n{}", self.paint(header.as_str().bold()))?;
            }

            let hash = section.hash_hex();
            writeln!(out, "Hash: {}", self.paint(hash.as_str().cyan()))?;
            for entry in section.entries {
                let number = format!("{}.", entry.number);
                writeln!(
                    out,
                    "{} {}",
                    self.paint(number.as_str().yellow()),
                    entry.path.display()
                )?;
            }
        }
        Ok(())
    }

    /// Write the outcome line for a run without duplicates.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn no_duplicates<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "No duplicates found.")
    }

    /// Summarise the hashing stage in human-readable units.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn hash_summary<W: Write>(&self, out: &mut W, stats: &HashStats) -> io::Result<()> {
        if !self.summaries {
            return Ok(());
        }

        let line = format!(
            "{} duplicate file(s) in {} group(s), {} reclaimable",
            stats.duplicate_files,
            stats.duplicate_groups,
            ByteSize::b(stats.wasted_space)
        );
        writeln!(out, "\n{}", self.paint(line.as_str().dim()))?;
        if stats.failed_files > 0 {
            let line = format!("{} file(s) could not be read", stats.failed_files);
            writeln!(out, "{}", self.paint(line.as_str().red()))?;
        }
        Ok(())
    }

    /// Write per-file failures and the freed-space total.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn deletion<W: Write>(&self, out: &mut W, report: &DeletionReport) -> io::Result<()> {
        for (number, error) in &report.failures {
            let line = format!("Failed to delete {number}: {error}");
            writeln!(out, "{}", self.paint(line.as_str().red()))?;
        }

        let total = format!("Total freed up space: {} bytes", report.bytes_freed);
        writeln!(out, "{}", self.paint(total.as_str().green()))?;

        if self.summaries && report.bytes_freed > 0 {
            let line = format!(
                "({} in {} file(s))",
                ByteSize::b(report.bytes_freed),
                report.success_count()
            );
            writeln!(out, "{}", self.paint(line.as_str().dim()))?;
        }
        Ok(())
    }
}
