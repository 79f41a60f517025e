//! Reference resolution.
//!
//! Turns `src="basename[:directive]"` on an image node into a scaled copy
//! of the matching indexed file plus updated `src`/`width`/`height`
//! attributes.
//!
//! # Outcomes per node
//!
//! - no source attribute: skipped
//! - basename not indexed: [`DiagnosticKind::Unresolved`], node untouched
//! - several candidates: first one used, [`DiagnosticKind::Ambiguous`]
//! - image cannot be read or decoded: error, the walk stops

mod reference;
mod report;

pub use reference::{resolve_dimensions, ImageReference, SizeDirective};
pub use report::{Diagnostic, DiagnosticKind, ResolveReport};

#[cfg(feature = "fuzzing")]
pub use reference::fuzz_parse_reference;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::document::Element;
use crate::error::ImgfindError;
use crate::index::ImageIndex;
use crate::scale::{RasterScaler, Scaler};

/// The attributes of a document node the resolver reads and writes.
pub trait ImageNode {
    /// The raw reference string, if the node has one.
    fn source(&self) -> Option<&str>;
    fn set_source(&mut self, source: &str);
    fn set_dimensions(&mut self, width: u32, height: u32);
}

/// The outcome of resolving one reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedImage {
    /// Indexed file the output was produced from.
    pub source_path: PathBuf,
    /// File name written into the output directory; also the node's new
    /// `src`.
    pub output_path: String,
    pub width: u32,
    pub height: u32,
}

/// Output file name for `basename` produced from `source`:
/// `basename_.ext`, keeping the source extension's case.
pub fn output_file_name(basename: &str, source: &Path) -> String {
    match source.extension() {
        Some(ext) => format!("{basename}_.{}", ext.to_string_lossy()),
        None => format!("{basename}_"),
    }
}

#[derive(Clone, Debug)]
struct Written {
    source: PathBuf,
    target: (u32, u32),
    size: (u32, u32),
}

/// Resolves image references for one run.
///
/// Holds the read-only index and configuration, the directory outputs are
/// written to, and a record of the files already written in this run.
pub struct Resolver<'a, S = RasterScaler> {
    index: &'a ImageIndex,
    config: &'a Config,
    output_dir: PathBuf,
    scaler: S,
    written: HashMap<String, Written>,
}

impl<'a> Resolver<'a, RasterScaler> {
    pub fn new(index: &'a ImageIndex, config: &'a Config, output_dir: impl Into<PathBuf>) -> Self {
        Resolver::with_scaler(index, config, output_dir, RasterScaler)
    }
}

impl<'a, S: Scaler> Resolver<'a, S> {
    pub fn with_scaler(
        index: &'a ImageIndex,
        config: &'a Config,
        output_dir: impl Into<PathBuf>,
        scaler: S,
    ) -> Self {
        Self {
            index,
            config,
            output_dir: output_dir.into(),
            scaler,
            written: HashMap::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Resolve a raw reference string without touching any node.
    ///
    /// Returns `Ok(None)` when the basename is not indexed; diagnostics go
    /// to `report`.
    pub fn resolve_reference(
        &mut self,
        raw: &str,
        report: &mut ResolveReport,
    ) -> Result<Option<ResolvedImage>, ImgfindError> {
        let index = self.index;
        let reference = ImageReference::parse(raw);

        let Some(candidates) = index.lookup(reference.basename) else {
            report.add(Diagnostic::unresolved(reference.basename));
            return Ok(None);
        };
        let Some(source) = candidates.first() else {
            report.add(Diagnostic::unresolved(reference.basename));
            return Ok(None);
        };
        if candidates.len() > 1 {
            report.add(Diagnostic::ambiguous(reference.basename, candidates));
        }

        let target = resolve_dimensions(
            reference.directive,
            self.config.default_width,
            self.config.default_height,
        );
        let output_path = output_file_name(reference.basename, source);

        let size = match self.written.get(&output_path).cloned() {
            Some(prev) if prev.source == *source && prev.target == target => {
                log::debug!("reusing {} for '{}'", output_path, raw);
                prev.size
            }
            prev => {
                let previous = prev.map(|prev| prev.size);
                let dest = self.output_dir.join(&output_path);
                let size = self.scaler.scale(source, &dest, target.0, target.1)?;

                if let Some(previous) = previous.filter(|previous| *previous != size) {
                    report.add(Diagnostic {
                        basename: reference.basename.to_string(),
                        kind: DiagnosticKind::OutputConflict {
                            output_path: output_path.clone(),
                            previous,
                            current: size,
                        },
                    });
                }

                self.written.insert(
                    output_path.clone(),
                    Written {
                        source: source.clone(),
                        target,
                        size,
                    },
                );
                size
            }
        };

        let resolved = ResolvedImage {
            source_path: source.clone(),
            output_path,
            width: size.0,
            height: size.1,
        };
        report.resolved.push(resolved.clone());
        Ok(Some(resolved))
    }

    /// Resolve one node and rewrite its attributes.
    ///
    /// Nodes without a source, and unresolved references, are left as they
    /// are.
    pub fn resolve_node<N: ImageNode + ?Sized>(
        &mut self,
        node: &mut N,
        report: &mut ResolveReport,
    ) -> Result<Option<ResolvedImage>, ImgfindError> {
        let Some(raw) = node.source().map(str::to_owned) else {
            return Ok(None);
        };

        let resolved = self.resolve_reference(&raw, report)?;
        if let Some(resolved) = &resolved {
            node.set_source(&resolved.output_path);
            node.set_dimensions(resolved.width, resolved.height);
        }
        Ok(resolved)
    }

    /// Walk `root` and resolve every image element in document order.
    ///
    /// Diagnostics go into `report` as they occur, so a walk stopped by a
    /// fatal error still leaves the diagnostics of the nodes before it.
    pub fn resolve_document(
        &mut self,
        root: &mut Element,
        report: &mut ResolveReport,
    ) -> Result<(), ImgfindError> {
        root.try_for_each_image_mut(|image| self.resolve_node(image, report).map(|_| ()))?;
        log::info!(
            "resolved {} image(s), {} unresolved, {} ambiguous",
            report.resolved.len(),
            report.unresolved_count(),
            report.ambiguous_count()
        );
        Ok(())
    }
}
