//! Copy tests: resolve a project, copy it, and inspect the output tree.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use texprune::{Copier, Resolver, clean_project};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn write(root: &Path, rel: &str, content: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
}

// ============================================================================
// Fixture project
// ============================================================================

#[test]
fn test_fixture_output_tree() {
    let out = TempDir::new().unwrap();
    let (_, report) = clean_project(&fixture_path("paper"), out.path(), Path::new("main.tex")).unwrap();

    for expected in [
        "main.tex",
        "sections/intro.tex",
        "refs.bib",
        "figures/plot.pdf",
        "custom.sty",
        "Makefile",
    ] {
        assert!(out.path().join(expected).is_file(), "{expected} should be copied");
    }

    for excluded in [
        "sections/draft.tex",
        "figures/plot.png",
        "figures/unused.png",
        "notes.txt",
    ] {
        assert!(!out.path().join(excluded).exists(), "{excluded} should not be copied");
    }

    assert_eq!(report.missing, vec![PathBuf::from("plain.bst")]);
    assert!(report.fallbacks.is_empty());
    assert!(report.failed.is_empty());
}

#[test]
fn test_fixture_tex_comments_removed() {
    let out = TempDir::new().unwrap();
    clean_project(&fixture_path("paper"), out.path(), Path::new("main.tex")).unwrap();

    let main = read(out.path(), "main.tex");
    assert!(main.starts_with("\\documentclass{article}\n\\usepackage{custom}\n\\begin{document}"));
    assert!(!main.contains("reviewer"));
    assert!(!main.contains("sections/draft"));
    assert!(main.contains("cleaning is 100\\% safe."));
    assert!(main.ends_with("\\end{document}\n"));

    let intro = read(out.path(), "sections/intro.tex");
    assert!(!intro.contains("key2"));
    assert!(intro.contains("\\citet[p.~3]{key1}"));
}

#[test]
fn test_fixture_bib_pruned() {
    let out = TempDir::new().unwrap();
    clean_project(&fixture_path("paper"), out.path(), Path::new("main.tex")).unwrap();

    let bib = read(out.path(), "refs.bib");
    assert!(bib.starts_with("@article{key1,"));
    assert!(!bib.contains("key2"));
    assert!(!bib.contains("Exported"));
    assert!(bib.ends_with("}\n"));
}

#[test]
fn test_fixture_style_files_verbatim() {
    let out = TempDir::new().unwrap();
    clean_project(&fixture_path("paper"), out.path(), Path::new("main.tex")).unwrap();

    assert_eq!(
        read(out.path(), "custom.sty"),
        read(&fixture_path("paper"), "custom.sty")
    );
    assert_eq!(
        fs::read(out.path().join("figures/plot.pdf")).unwrap(),
        fs::read(fixture_path("paper/figures/plot.pdf")).unwrap()
    );
}

// ============================================================================
// Throwaway projects
// ============================================================================

#[test]
fn test_two_file_project_keeps_cited_entry_only() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "main.tex", "\\documentclass{article}\n\\input{body}\n\\bibliography{refs}\n");
    write(src.path(), "body.tex", "\\cite{key1}\n\\includegraphics{used}\n");
    write(src.path(), "refs.bib", "@article{key1, title={One}}\n@article{key2, title={Two}}\n");
    write(src.path(), "used.png", "used");
    write(src.path(), "unused.png", "unused");

    clean_project(src.path(), out.path(), Path::new("main.tex")).unwrap();

    assert_eq!(read(out.path(), "refs.bib"), "@article{key1, title={One}}\n");
    assert!(out.path().join("used.png").is_file());
    assert!(!out.path().join("unused.png").exists());
}

#[test]
fn test_nocite_star_keeps_every_entry() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "main.tex", "\\nocite{*}\n\\bibliography{refs}\n");
    write(
        src.path(),
        "refs.bib",
        "% header\n@article{a, title={A}}\n@article{b, title={B}}\n",
    );

    clean_project(src.path(), out.path(), Path::new("main.tex")).unwrap();

    let bib = read(out.path(), "refs.bib");
    assert!(bib.contains("@article{a,"));
    assert!(bib.contains("@article{b,"));
    assert!(!bib.contains("header"));
}

#[test]
fn test_windows_1252_source_round_trips() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "main.tex", b"\\section{Caf\xe9} % note\nR\xe9sum\xe9\n".as_slice());

    clean_project(src.path(), out.path(), Path::new("main.tex")).unwrap();

    let bytes = fs::read(out.path().join("main.tex")).unwrap();
    assert_eq!(bytes, b"\\section{Caf\xe9} \nR\xe9sum\xe9\n".to_vec());
}

#[test]
fn test_output_inside_source_is_not_swept() {
    let src = TempDir::new().unwrap();
    write(src.path(), "main.tex", "\\usepackage{local}\n");
    write(src.path(), "local.sty", "\\ProvidesPackage{local}\n");
    let out = src.path().join("cleaned");

    for _ in 0..2 {
        let mut resolution = Resolver::new(src.path()).resolve("main.tex");
        let report = Copier::new(src.path(), &out).copy(&mut resolution.deps).unwrap();
        assert!(report.missing.is_empty());
        assert!(!resolution.deps.support_files.iter().any(|p| p.starts_with("cleaned")));
    }

    assert!(out.join("local.sty").is_file());
    assert!(!out.join("cleaned").exists());
}

#[test]
fn test_missing_bibliography_reported() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(src.path(), "main.tex", "\\cite{k}\n\\bibliography{gone}\n");

    let (_, report) = clean_project(src.path(), out.path(), Path::new("main.tex")).unwrap();
    assert_eq!(report.missing, vec![PathBuf::from("gone.bib")]);
    assert!(out.path().join("main.tex").is_file());
}
