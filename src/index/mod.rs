//! Image index: basename → candidate files.
//!
//! The index is built once per run by walking an image directory and is
//! read-only afterwards. Candidates for a basename keep the order in which
//! the walk visited them; the walk sorts each directory's entries by file
//! name so the order is the same on every platform.

mod report;

pub use report::{IndexEntry, IndexReport};

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// File extensions (case-insensitive) accepted into the index.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Mapping from basename (file name without extension) to the image files
/// that carry it.
///
/// Invariant: a basename is only present when it has at least one
/// candidate.
#[derive(Clone, Debug, Default)]
pub struct ImageIndex {
    root: PathBuf,
    order: Vec<String>,
    candidates: HashMap<String, Vec<PathBuf>>,
}

impl ImageIndex {
    /// Walk `root` recursively and index every image file below it.
    ///
    /// Entries that cannot be read, and files with an extension outside
    /// [`IMAGE_EXTENSIONS`], are skipped. A missing root produces an empty
    /// index.
    pub fn build(root: &Path) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let mut index = ImageIndex {
            root: root.clone(),
            ..Default::default()
        };

        for entry in WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::debug!("skipping unreadable entry under {}: {err}", root.display());
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match image_basename(entry.path()).map(str::to_owned) {
                Some(basename) => index.insert(basename, entry.into_path()),
                None => log::trace!("not an image: {}", entry.path().display()),
            }
        }

        log::debug!(
            "indexed {} file(s) under {} basename(s) in {}",
            index.file_count(),
            index.len(),
            index.root.display()
        );
        index
    }

    /// Build an index from explicit `(basename, path)` pairs, in order.
    ///
    /// Useful when the host already knows where its images are.
    pub fn from_entries<I, S, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: Into<PathBuf>,
    {
        let mut index = ImageIndex::default();
        for (basename, path) in entries {
            index.insert(basename.into(), path.into());
        }
        index
    }

    fn insert(&mut self, basename: String, path: PathBuf) {
        match self.candidates.get_mut(&basename) {
            Some(paths) => paths.push(path),
            None => {
                self.order.push(basename.clone());
                self.candidates.insert(basename, vec![path]);
            }
        }
    }

    /// Candidates for `basename` in index order, or `None` when no file
    /// carries it.
    pub fn lookup(&self, basename: &str) -> Option<&[PathBuf]> {
        self.candidates.get(basename).map(Vec::as_slice)
    }

    /// The directory the index was built from (empty for
    /// [`ImageIndex::from_entries`]).
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct basenames.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of indexed files.
    pub fn file_count(&self) -> usize {
        self.candidates.values().map(Vec::len).sum()
    }

    /// Iterate over `(basename, candidates)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PathBuf])> + '_ {
        self.order.iter().filter_map(|basename| {
            self.candidates
                .get(basename)
                .map(|paths| (basename.as_str(), paths.as_slice()))
        })
    }

    /// Basenames with more than one candidate, in first-seen order.
    pub fn ambiguous(&self) -> impl Iterator<Item = (&str, &[PathBuf])> + '_ {
        self.iter().filter(|(_, paths)| paths.len() > 1)
    }
}

/// The index key for `path`, or `None` if it is not an indexable image.
fn image_basename(path: &Path) -> Option<&str> {
    let ext = path.extension().and_then(|ext| ext.to_str())?;
    if !IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
    {
        return None;
    }
    path.file_stem().and_then(|stem| stem.to_str())
}
