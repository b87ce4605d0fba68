//! Main-document detection for projects where `--main_tex` was not given.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::comments::strip_for_scan;
use super::patterns::DOCUMENTCLASS_RE;
use crate::error::{Error, Result};
use crate::util::read_source;

/// Find the main `.tex` file of a project, relative to `source_dir`.
///
/// Candidates are `.tex` files that declare a `\documentclass` outside of
/// comments. With a single candidate it wins outright; otherwise `main.tex`
/// or `<dirname>.tex` (case-insensitive) is preferred, falling back to the
/// first candidate in path order.
pub fn find_main_tex(source_dir: &Path) -> Result<PathBuf> {
    info!("Trying to automatically find the main TeX file...");

    let mut candidates = Vec::new();
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("tex") {
            continue;
        }

        let source = match read_source(path) {
            Ok(source) => source,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable TeX file");
                continue;
            }
        };

        if DOCUMENTCLASS_RE.is_match(&strip_for_scan(&source.text)) {
            let rel = path.strip_prefix(source_dir).unwrap_or(path).to_path_buf();
            candidates.push(rel);
        }
    }

    match candidates.len() {
        0 => Err(Error::NoMainFile(source_dir.to_path_buf())),
        1 => {
            let main = candidates.swap_remove(0);
            info!("Found main TeX file: {}", main.display());
            Ok(main)
        }
        _ => Ok(pick_preferred(source_dir, candidates)),
    }
}

fn pick_preferred(source_dir: &Path, candidates: Vec<PathBuf>) -> PathBuf {
    let dir_name = source_dir
        .canonicalize()
        .ok()
        .as_deref()
        .unwrap_or(source_dir)
        .file_name()
        .map(|n| format!("{}.tex", n.to_string_lossy().to_lowercase()));

    let preferred = candidates.iter().find(|candidate| {
        let base = candidate
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        base == "main.tex" || dir_name.as_deref() == Some(base.as_str())
    });

    if let Some(main) = preferred {
        info!("Selected main TeX file: {}", main.display());
        return main.clone();
    }

    let listed: Vec<_> = candidates.iter().map(|c| c.display().to_string()).collect();
    warn!("Multiple potential main TeX files found: {}", listed.join(", "));
    warn!("Using the first one: {}", listed[0]);
    candidates.into_iter().next().unwrap_or_default()
}
