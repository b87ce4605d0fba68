//! Flat dependency sets accumulated during the include walk.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::latex::WILDCARD_KEY;
use crate::util::display_rel;

/// Everything a document needs, as paths relative to the project root.
///
/// This is the authoritative output of resolution; the [`DepNode`](super::DepNode)
/// tree only exists for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencySet {
    /// Text sources that have been expanded. Doubles as the cycle guard.
    pub sources: BTreeSet<PathBuf>,
    /// Bibliography databases, bibliography styles, and swept-in style files.
    /// These are copied but never scanned.
    pub support_files: BTreeSet<PathBuf>,
    /// Extension-completed graphics paths.
    pub graphics: BTreeSet<PathBuf>,
    /// Raw citation keys, possibly including [`WILDCARD_KEY`].
    pub citations: BTreeSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` as expanded. Returns `false` if it was already visited.
    pub fn mark_visited(&mut self, path: &Path) -> bool {
        self.sources.insert(path.to_path_buf())
    }

    pub fn is_visited(&self, path: &Path) -> bool {
        self.sources.contains(path)
    }

    /// Whether bibliography filtering should keep every entry: no keys were
    /// found, or `\nocite{*}` was used.
    pub fn cites_everything(&self) -> bool {
        self.citations.is_empty() || self.citations.contains(WILDCARD_KEY)
    }

    /// Whether any path in the set refers to `path`.
    pub fn contains_file(&self, path: &Path) -> bool {
        self.sources.contains(path) || self.support_files.contains(path)
    }

    /// Sources and support files, in path order.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.sources.iter().chain(self.support_files.iter())
    }

    /// Log the counts, and the full listings at debug level.
    pub fn log_summary(&self) {
        info!("Found {} necessary TeX files", self.sources.len());
        info!("Found {} graphics files", self.graphics.len());
        info!("Found {} citation keys", self.citations.len());

        debug!("TeX dependencies:");
        for path in self.files() {
            debug!("  {}", display_rel(path));
        }
        debug!("Graphics dependencies:");
        for path in &self.graphics {
            debug!("  {}", display_rel(path));
        }
        debug!("Citation keys:");
        for key in &self.citations {
            debug!("  {key}");
        }
    }
}
