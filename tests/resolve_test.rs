//! Resolution tests against the `paper` fixture and throwaway projects.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use texprune::{NodeKind, Resolver, find_main_tex};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

// ============================================================================
// Fixture project
// ============================================================================

#[test]
fn test_fixture_sources() {
    let resolution = Resolver::new(fixture_path("paper")).resolve("main.tex");

    let sources: Vec<_> = resolution.deps.sources.iter().cloned().collect();
    assert_eq!(sources, paths(&["main.tex", "sections/intro.tex"]));
    assert!(
        !resolution.deps.is_visited(Path::new("sections/draft.tex")),
        "commented-out \\input must not be followed"
    );
}

#[test]
fn test_fixture_support_files_and_citations() {
    let resolution = Resolver::new(fixture_path("paper")).resolve("main");

    let support: Vec<_> = resolution.deps.support_files.iter().cloned().collect();
    assert_eq!(support, paths(&["plain.bst", "refs.bib"]));

    let keys: Vec<_> = resolution.deps.citations.iter().map(String::as_str).collect();
    assert_eq!(keys, vec!["key1"], "key2 only appears in comments and unreached files");
}

#[test]
fn test_fixture_graphics_prefer_pdf() {
    let resolution = Resolver::new(fixture_path("paper")).resolve("main.tex");

    let graphics: Vec<_> = resolution.deps.graphics.iter().cloned().collect();
    assert_eq!(graphics, paths(&["figures/plot.pdf"]));
}

#[test]
fn test_fixture_tree_shape() {
    let resolution = Resolver::new(fixture_path("paper")).resolve("main.tex");
    let tree = resolution.tree.expect("main document should resolve");

    assert_eq!(tree.kind, NodeKind::Source);
    assert_eq!(tree.node_count(), 3, "the back-edge to main.tex adds no node");

    let rendered = tree.to_string();
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, vec!["📄 main.tex", "├── 📄 intro.tex", "└── 🖼 plot.pdf"]);
}

#[test]
fn test_fixture_main_detection() {
    let main = find_main_tex(&fixture_path("paper")).unwrap();
    assert_eq!(main, PathBuf::from("main.tex"));
}

// ============================================================================
// Throwaway projects
// ============================================================================

#[test]
fn test_mutual_includes_terminate() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.tex", "\\input{b}\n");
    write(dir.path(), "b.tex", "\\input{a}\n\\include{b}\n");

    let resolution = Resolver::new(dir.path()).resolve("a.tex");
    assert_eq!(resolution.deps.sources.len(), 2);
    assert_eq!(resolution.tree.unwrap().node_count(), 2);
}

#[test]
fn test_shared_include_expanded_once() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.tex", "\\input{one}\n\\input{two}\n");
    write(dir.path(), "one.tex", "\\input{common}\n");
    write(dir.path(), "two.tex", "\\input{common}\n");
    write(dir.path(), "common.tex", "\\cite{shared}\n");

    let resolution = Resolver::new(dir.path()).resolve("main.tex");
    assert_eq!(resolution.deps.sources.len(), 4);

    let tree = resolution.tree.unwrap();
    let common_nodes = tree
        .walk()
        .into_iter()
        .filter(|node| node.path == Path::new("common.tex"))
        .count();
    assert_eq!(common_nodes, 1);
}

#[test]
fn test_subdirectory_include_resolves_relative_then_root() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.tex", "\\input{chapters/one}\n");
    write(dir.path(), "chapters/one.tex", "\\input{local}\n\\input{shared}\n\\includegraphics{logo}\n");
    write(dir.path(), "chapters/local.tex", "local\n");
    write(dir.path(), "shared.tex", "shared\n");
    write(dir.path(), "logo.png", "png");

    let resolution = Resolver::new(dir.path()).resolve("main.tex");
    let sources: Vec<_> = resolution.deps.sources.iter().cloned().collect();
    assert_eq!(
        sources,
        paths(&["chapters/local.tex", "chapters/one.tex", "main.tex", "shared.tex"])
    );
    assert!(resolution.deps.graphics.contains(Path::new("logo.png")));
}

#[test]
fn test_missing_graphic_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.tex", "\\includegraphics{nowhere}\n\\includegraphics{here}\n");
    write(dir.path(), "here.jpg", "jpg");

    let resolution = Resolver::new(dir.path()).resolve("main.tex");
    let graphics: Vec<_> = resolution.deps.graphics.iter().cloned().collect();
    assert_eq!(graphics, paths(&["here.jpg"]));
}

#[test]
fn test_nocite_star_recorded() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.tex", "\\nocite{*}\n\\bibliography{refs}\n");

    let resolution = Resolver::new(dir.path()).resolve("main.tex");
    assert!(resolution.deps.cites_everything());
}

#[test]
fn test_escape_from_root_is_ignored() {
    let outer = TempDir::new().unwrap();
    write(outer.path(), "secret.tex", "\\cite{leak}\n");
    write(outer.path(), "project/main.tex", "\\input{../secret}\n");

    let resolution = Resolver::new(outer.path().join("project")).resolve("main.tex");
    assert_eq!(resolution.deps.sources.len(), 1);
    assert!(resolution.deps.citations.is_empty());
}
