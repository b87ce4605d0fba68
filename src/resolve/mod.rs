//! Dependency resolution over a LaTeX project.
//!
//! Starting from the main document, the [`Resolver`] walks `\input`,
//! `\include` and `\subfile` directives depth-first and collects
//! bibliographies, bibliography styles, citation keys, and graphics along
//! the way. Resolution is best-effort: a reference that cannot be found on
//! disk is logged and skipped, never fatal.
//!
//! ## Path lookup
//!
//! A directive argument is looked up relative to the including file's
//! directory first and the project root second, since LaTeX resolves
//! `\input` against the directory it was started in. Paths that would
//! escape the project root are rejected.

mod deps;
mod tree;

pub use deps::DependencySet;
pub use tree::{DepNode, NodeKind};

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::config::GRAPHICS_EXTENSIONS;
use crate::latex::{scan_directives, strip_for_scan};
use crate::util::{display_rel, read_source};

/// The outcome of resolving a main document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Resolution {
    pub deps: DependencySet,
    /// `None` when the main document itself could not be read.
    pub tree: Option<DepNode>,
}

/// Walks the include graph of a project rooted at a fixed directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve everything `main` (relative to the root) transitively needs.
    ///
    /// The `.tex` suffix may be omitted.
    pub fn resolve(&self, main: impl AsRef<Path>) -> Resolution {
        let mut deps = DependencySet::new();
        let target = main.as_ref().to_string_lossy().into_owned();
        let tree = self.visit_source(&target, Path::new(""), 0, &mut deps);
        Resolution { deps, tree }
    }

    /// Expand one source file. Returns `None` for files that are missing,
    /// unreadable, or were already visited.
    fn visit_source(
        &self,
        target: &str,
        from_dir: &Path,
        depth: usize,
        deps: &mut DependencySet,
    ) -> Option<DepNode> {
        let Some(rel) = self.locate_source(target, from_dir) else {
            warn!("File not found: {target}");
            return None;
        };

        if !deps.mark_visited(&rel) {
            debug!("Already visited: {}", display_rel(&rel));
            return None;
        }
        debug!("Processing: {}", display_rel(&rel));

        let source = match read_source(&self.root.join(&rel)) {
            Ok(source) => source,
            Err(e) => {
                error!("Error processing {}: {e}", display_rel(&rel));
                return None;
            }
        };

        let found = scan_directives(&strip_for_scan(&source.text));
        let dir = rel.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut node = DepNode::source(rel.clone(), depth);

        for include in &found.includes {
            debug!("++ Found recursive input: {include}");
            if let Some(child) = self.visit_source(include, &dir, depth + 1, deps) {
                node.children.push(child);
            }
        }

        for bib in found.bibliographies.iter().chain(&found.styles) {
            match self.locate_support(bib, &dir) {
                Some(path) => {
                    debug!("Found bibliography file: {}", display_rel(&path));
                    deps.support_files.insert(path);
                }
                None => warn!("Ignoring bibliography outside the project: {bib}"),
            }
        }

        for key in found.citations {
            debug!("Found citation key: {key}");
            deps.citations.insert(key);
        }

        for graphic in &found.graphics {
            match self.locate_graphic(graphic, &dir) {
                Some(path) => {
                    debug!("{graphic} resolved to: {}", display_rel(&path));
                    deps.graphics.insert(path.clone());
                    node.children.push(DepNode::graphic(path, depth + 1));
                }
                None => warn!("Image not found: {graphic}"),
            }
        }

        Some(node)
    }

    /// Find a TeX source, trying `<target>.tex` before the bare name.
    fn locate_source(&self, target: &str, from_dir: &Path) -> Option<PathBuf> {
        let names: Vec<String> = if target.ends_with(".tex") {
            vec![target.to_string()]
        } else {
            vec![format!("{target}.tex"), target.to_string()]
        };
        self.first_existing(&names, &[from_dir, Path::new("")])
    }

    /// Find a graphic, trying the bare name then each known extension in order.
    ///
    /// Graphics paths are relative to the project root, as pdflatex sees them
    /// when run from there. The including directory is only a fallback.
    fn locate_graphic(&self, target: &str, from_dir: &Path) -> Option<PathBuf> {
        let names: Vec<String> = std::iter::once(target.to_string())
            .chain(GRAPHICS_EXTENSIONS.iter().map(|ext| format!("{target}{ext}")))
            .collect();
        self.first_existing(&names, &[Path::new(""), from_dir])
    }

    /// Locate a bibliography or style file. When it is not on disk the
    /// including-directory path is returned anyway, so the copier can report it.
    fn locate_support(&self, name: &str, from_dir: &Path) -> Option<PathBuf> {
        self.first_existing(&[name.to_string()], &[from_dir, Path::new("")])
            .or_else(|| normalize_rel(&from_dir.join(name)))
    }

    /// Try every name under each base in order. Bases are project-relative.
    fn first_existing(&self, names: &[String], bases: &[&Path]) -> Option<PathBuf> {
        bases
            .iter()
            .flat_map(|base| names.iter().map(move |name| base.join(name)))
            .filter_map(|candidate| normalize_rel(&candidate))
            .find(|rel| self.root.join(rel).is_file())
    }
}

/// Lexically normalize a project-relative path, folding `.` and `..`.
///
/// Returns `None` for absolute paths and paths that climb above the root.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use texprune::resolve::normalize_rel;
///
/// assert_eq!(normalize_rel(Path::new("sec/../figs/./a.png")), Some(PathBuf::from("figs/a.png")));
/// assert_eq!(normalize_rel(Path::new("../outside.tex")), None);
/// ```
pub fn normalize_rel(path: &Path) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}
