//! Selective copying of a resolved project into a clean output tree.
//!
//! Everything here is best-effort. A file that cannot be cleaned is copied
//! verbatim instead, and a file that cannot be copied at all is logged and
//! recorded in the [`CopyReport`]; the run always continues.

mod bib;

pub use bib::{BibEntry, BibOutcome, filter_bibliography, parse_entries};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::{AUXILIARY_FILES, STYLE_EXTENSIONS};
use crate::error::Result;
use crate::latex::remove_comments;
use crate::resolve::DependencySet;
use crate::util::{display_rel, read_source, write_source};

/// What happened to each file during a copy run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Files written to the output tree (cleaned or verbatim).
    pub copied: Vec<PathBuf>,
    /// Dependencies named by the project that do not exist on disk.
    pub missing: Vec<PathBuf>,
    /// Files whose cleaning failed and were copied verbatim instead.
    pub fallbacks: Vec<PathBuf>,
    /// Files that could not be written at all.
    pub failed: Vec<PathBuf>,
}

/// Copies the resolved parts of `source` into `output`.
#[derive(Debug, Clone)]
pub struct Copier {
    source: PathBuf,
    output: PathBuf,
}

impl Copier {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }

    /// Copy every dependency, graphic, and auxiliary file.
    ///
    /// Style files found anywhere in the source tree are added to `deps`
    /// first, since packages loaded through `\usepackage` are not resolved.
    /// Only failing to create the output directory is an error.
    pub fn copy(&self, deps: &mut DependencySet) -> Result<CopyReport> {
        fs::create_dir_all(&self.output)?;
        info!("Copying and cleaning files to {}...", self.output.display());

        self.sweep_style_files(deps);

        let mut report = CopyReport::default();

        for rel in deps.files() {
            let src = self.source.join(rel);
            if !src.is_file() {
                warn!("Dependency not found: {}", display_rel(rel));
                report.missing.push(rel.clone());
                continue;
            }
            self.copy_cleaned(rel, deps, &mut report);
        }

        for rel in &deps.graphics {
            let src = self.source.join(rel);
            if !src.is_file() {
                warn!("Graphic not found: {}", display_rel(rel));
                report.missing.push(rel.clone());
                continue;
            }
            self.copy_verbatim(rel, &mut report);
        }

        for name in AUXILIARY_FILES {
            let rel = Path::new(name);
            if self.source.join(rel).is_file() {
                debug!("Copying auxiliary file: {name}");
                self.copy_verbatim(rel, &mut report);
            }
        }

        info!("Cleaning complete! Clean version saved to {}", self.output.display());
        Ok(report)
    }

    /// Add every `.sty`, `.cls` and `.bst` under the source root to `deps`.
    /// Returns how many were added.
    pub fn sweep_style_files(&self, deps: &mut DependencySet) -> usize {
        let output = self.output.canonicalize().ok();
        let mut added = 0;

        let walker = WalkDir::new(&self.source)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !entry.file_type().is_dir()
                    || output.is_none()
                    || entry.path().canonicalize().ok() != output
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable path during style sweep: {e}");
                    continue;
                }
            };
            let is_style = entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| STYLE_EXTENSIONS.contains(&ext));
            if !entry.file_type().is_file() || !is_style {
                continue;
            }

            let Ok(rel) = entry.path().strip_prefix(&self.source) else {
                continue;
            };
            if !deps.contains_file(rel) {
                debug!("Added style file: {}", display_rel(rel));
                deps.support_files.insert(rel.to_path_buf());
                added += 1;
            }
        }

        added
    }

    fn copy_cleaned(&self, rel: &Path, deps: &DependencySet, report: &mut CopyReport) {
        let outcome = match rel.extension().and_then(|e| e.to_str()) {
            Some("bib") => self.clean_bib(rel, deps),
            Some("tex") => self.clean_tex(rel),
            _ => return self.copy_verbatim(rel, report),
        };
        self.record_cleaned(rel, outcome, report);
    }

    /// Record a cleaning outcome, falling back to a verbatim copy on error.
    fn record_cleaned(&self, rel: &Path, outcome: Result<()>, report: &mut CopyReport) {
        match outcome {
            Ok(()) => {
                debug!("Copied: {}", display_rel(rel));
                report.copied.push(rel.to_path_buf());
            }
            Err(e) => {
                error!("Error cleaning {}: {e}", display_rel(rel));
                report.fallbacks.push(rel.to_path_buf());
                self.copy_verbatim(rel, report);
            }
        }
    }

    fn clean_tex(&self, rel: &Path) -> Result<()> {
        let source = read_source(&self.source.join(rel))?;
        let cleaned = remove_comments(&source.text);
        write_source(&self.output.join(rel), &cleaned, source.encoding)
    }

    fn clean_bib(&self, rel: &Path, deps: &DependencySet) -> Result<()> {
        let source = read_source(&self.source.join(rel))?;
        let (filtered, outcome) = filter_bibliography(&source.text, &deps.citations);
        let name = display_rel(rel);

        match outcome {
            BibOutcome::KeptAll => warn!("Keeping all entries in {name}"),
            BibOutcome::NoMatches => warn!("No matching entries found in {name}. Keeping all."),
            BibOutcome::Filtered { kept, total } => {
                info!("Filtered BIB file: {name} - Kept {kept} of {total} entries")
            }
        }

        write_source(&self.output.join(rel), &filtered, source.encoding)
    }

    fn copy_verbatim(&self, rel: &Path, report: &mut CopyReport) {
        let dest = self.output.join(rel);
        let result = dest
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::copy(self.source.join(rel), &dest));

        match result {
            Ok(_) => {
                debug!("Copied: {}", display_rel(rel));
                report.copied.push(rel.to_path_buf());
            }
            Err(e) => {
                error!("Error copying {}: {e}", display_rel(rel));
                report.failed.push(rel.to_path_buf());
            }
        }
    }
}
