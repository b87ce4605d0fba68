//! Text decoding helpers for LaTeX and BibTeX sources.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::Encoding;

use crate::error::Result;

/// A source file decoded to text, remembering the encoding it came from so
/// the cleaned copy can be written back byte-compatibly.
#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Decode bytes to a string.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. Falls back to Windows-1252 (common in older TeX sources, superset of ISO-8859-1)
///
/// Returns the decoded text together with the encoding that produced it.
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
///
/// # Examples
///
/// ```
/// use texprune::util::decode_text;
///
/// let (text, encoding) = decode_text("\\section{Intro}".as_bytes());
/// assert_eq!(text, "\\section{Intro}");
/// assert_eq!(encoding, encoding_rs::UTF_8);
/// ```
pub fn decode_text(bytes: &[u8]) -> (Cow<'_, str>, &'static Encoding) {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return (result, encoding_rs::UTF_8);
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    (result, encoding_rs::WINDOWS_1252)
}

/// Read and decode a text source from disk.
pub fn read_source(path: &Path) -> Result<SourceText> {
    let bytes = fs::read(path)?;
    let (text, encoding) = decode_text(&bytes);
    Ok(SourceText {
        text: text.into_owned(),
        encoding,
    })
}

/// Encode `text` with `encoding` and write it, creating parent directories.
pub fn write_source(path: &Path, text: &str, encoding: &'static Encoding) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let (bytes, _, _) = encoding.encode(text);
    fs::write(path, bytes)?;
    Ok(())
}

/// Render a relative path with forward slashes, the way LaTeX writes it.
pub fn display_rel(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
