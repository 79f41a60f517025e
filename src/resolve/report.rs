//! Resolution diagnostics and the per-run report.
//!
//! Diagnostics never fail a run. They are collected so the CLI can print
//! them to stderr (or as JSON) once the document has been processed.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::ResolvedImage;

/// Everything that happened while resolving one document.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResolveReport {
    /// Images written and applied to nodes, in document order.
    pub resolved: Vec<ResolvedImage>,
    /// Diagnostics, in document order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolveReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        log::debug!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Number of references that had no matching file.
    pub fn unresolved_count(&self) -> usize {
        self.count(|kind| matches!(kind, DiagnosticKind::Unresolved))
    }

    /// Number of references resolved by picking the first of several files.
    pub fn ambiguous_count(&self) -> usize {
        self.count(|kind| matches!(kind, DiagnosticKind::Ambiguous { .. }))
    }

    fn count(&self, pred: impl Fn(&DiagnosticKind) -> bool) -> usize {
        self.diagnostics.iter().filter(|d| pred(&d.kind)).count()
    }
}

impl fmt::Display for ResolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        Ok(())
    }
}

/// A non-fatal observation about one image reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Basename the reference asked for.
    pub basename: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

/// What went sideways.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No indexed file carries the basename; the node was left unchanged.
    Unresolved,
    /// Several files carry the basename; `chosen` was used.
    Ambiguous {
        chosen: PathBuf,
        candidates: Vec<PathBuf>,
    },
    /// An earlier reference in this run wrote the same output file at a
    /// different size; the file now holds the later size.
    OutputConflict {
        output_path: String,
        previous: (u32, u32),
        current: (u32, u32),
    },
}

impl Diagnostic {
    pub fn unresolved(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            kind: DiagnosticKind::Unresolved,
        }
    }

    pub fn ambiguous(basename: impl Into<String>, candidates: &[PathBuf]) -> Self {
        Self {
            basename: basename.into(),
            kind: DiagnosticKind::Ambiguous {
                chosen: candidates.first().cloned().unwrap_or_default(),
                candidates: candidates.to_vec(),
            },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::Unresolved => {
                write!(f, "imgfind: no file for '{}'", self.basename)
            }
            DiagnosticKind::Ambiguous { chosen, candidates } => write!(
                f,
                "imgfind: using '{}' for '{}' ({} candidates)",
                chosen.display(),
                self.basename,
                candidates.len()
            ),
            DiagnosticKind::OutputConflict {
                output_path,
                previous,
                current,
            } => write!(
                f,
                "imgfind: '{}' rewritten at {}x{} (was {}x{}) for '{}'",
                output_path, current.0, current.1, previous.0, previous.1, self.basename
            ),
        }
    }
}
