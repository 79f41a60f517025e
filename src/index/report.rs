//! Index report types for the `index` subcommand.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::ImageIndex;

/// A printable snapshot of an [`ImageIndex`].
#[derive(Clone, Debug, Serialize)]
pub struct IndexReport {
    /// Directory the index was built from.
    pub root: PathBuf,
    /// Number of distinct basenames.
    pub basenames: usize,
    /// Number of indexed files.
    pub files: usize,
    /// Basenames with more than one candidate.
    pub ambiguous: usize,
    /// One entry per basename, in index order.
    pub entries: Vec<IndexEntry>,
}

/// One basename and its candidate files.
#[derive(Clone, Debug, Serialize)]
pub struct IndexEntry {
    pub basename: String,
    pub candidates: Vec<PathBuf>,
}

impl IndexEntry {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.len() > 1
    }
}

impl From<&ImageIndex> for IndexReport {
    fn from(index: &ImageIndex) -> Self {
        let entries: Vec<IndexEntry> = index
            .iter()
            .map(|(basename, candidates)| IndexEntry {
                basename: basename.to_string(),
                candidates: candidates.to_vec(),
            })
            .collect();

        IndexReport {
            root: index.root().to_path_buf(),
            basenames: entries.len(),
            files: index.file_count(),
            ambiguous: entries.iter().filter(|e| e.is_ambiguous()).count(),
            entries,
        }
    }
}

impl fmt::Display for IndexReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Image index: {}", self.root.display())?;
        writeln!(
            f,
            "  {} file(s), {} basename(s), {} ambiguous",
            self.files, self.basenames, self.ambiguous
        )?;

        if self.entries.is_empty() {
            return writeln!(f, "  (no images found)");
        }

        writeln!(f)?;
        for entry in &self.entries {
            let marker = if entry.is_ambiguous() { " (ambiguous)" } else { "" };
            writeln!(f, "  {}{}", entry.basename, marker)?;
            for (i, path) in entry.candidates.iter().enumerate() {
                let chosen = if i == 0 && entry.is_ambiguous() { "*" } else { " " };
                writeln!(f, "    {} {}", chosen, path.display())?;
            }
        }

        Ok(())
    }
}
