//! Document loading and PDF text extraction.

use std::path::{Path, PathBuf};

use obligo_core::{Error, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// A source document: its filename and its (raw, later cleaned) text.
#[derive(Debug, Clone)]
pub struct Document {
    /// Filename including extension, e.g. `lease.txt`.
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Filename without its extension; names every derived output file.
    pub fn stem(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read a text file, replacing invalid UTF-8 instead of failing.
pub fn read_text_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Extract text from a PDF.
pub fn extract_pdf(path: &Path) -> Result<String> {
    // pdf-extract can panic on malformed PDFs
    let path_buf = path.to_path_buf();
    let result = std::panic::catch_unwind(move || pdf_extract::extract_text(&path_buf));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(Error::Extraction {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Err(Error::Extraction {
            path: path.display().to_string(),
            reason: "PDF parser panicked (malformed file)".into(),
        }),
    }
}

/// Load every `.txt` file in `dir` (non-recursive), sorted by filename.
///
/// Unreadable files are logged and skipped.
pub fn load_text_dir(dir: &Path) -> Result<Vec<Document>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    paths.sort();

    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => {
                warn!("Skipping file with non-UTF-8 name: {}", path.display());
                continue;
            }
        };
        match read_text_lossy(&path) {
            Ok(text) => {
                debug!("Loaded {} ({} chars)", name, text.len());
                docs.push(Document::new(name, text));
            }
            Err(e) => warn!("Skipping '{}': {}", path.display(), e),
        }
    }

    info!("Loaded {} documents from {}", docs.len(), dir.display());
    Ok(docs)
}

/// Convert every PDF under `pdf_dir` (recursively) to `text_dir/<stem>.txt`.
///
/// Existing text files with the same stem are replaced. PDFs that fail to
/// extract are logged and skipped. Returns the written paths.
pub fn pdf_dir_to_text(pdf_dir: &Path, text_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(text_dir)?;
    let mut written = Vec::new();

    let mut pdfs: Vec<PathBuf> = WalkDir::new(pdf_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_pdf(p))
        .collect();
    pdfs.sort();

    for pdf in pdfs {
        let Some(stem) = pdf.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = match extract_pdf(&pdf) {
            Ok(t) => t,
            Err(e) => {
                warn!("Skipping {}", e);
                continue;
            }
        };
        let out = text_dir.join(format!("{stem}.txt"));
        std::fs::write(&out, text)?;
        debug!("Extracted {} -> {}", pdf.display(), out.display());
        written.push(out);
    }

    info!("Extracted text from {} PDFs", written.len());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem() {
        assert_eq!(Document::new("lease.v2.txt", "").stem(), "lease.v2");
        assert_eq!(Document::new("README", "").stem(), "README");
    }

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("a/lease.pdf")));
        assert!(is_pdf(Path::new("LEASE.PDF")));
        assert!(!is_pdf(Path::new("lease.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_load_text_dir_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a.txt"), "first").unwrap();
        std::fs::write(dir.path().join("c.json"), "[]").unwrap();
        std::fs::write(dir.path().join("d.txt"), [0x66, 0xff, 0x6f]).unwrap();

        let docs = load_text_dir(dir.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt", "d.txt"]);
        assert_eq!(docs[0].text, "first");
        assert_eq!(docs[2].text, "f\u{FFFD}o");
    }

    #[test]
    fn test_malformed_pdf_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_dir = dir.path().join("pdf/nested");
        std::fs::create_dir_all(&pdf_dir).unwrap();
        std::fs::write(pdf_dir.join("broken.pdf"), b"not a pdf").unwrap();

        let written = pdf_dir_to_text(&dir.path().join("pdf"), &dir.path().join("text")).unwrap();
        assert!(written.is_empty());
        assert!(dir.path().join("text").is_dir());
    }
}
