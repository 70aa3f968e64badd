//! Export of reply text as a downloadable document.
//!
//! Every export is a one-shot side effect: a fresh single-page document is
//! rendered from the text and written under the requested file name. No
//! document state survives between calls.

pub mod pdf;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};
use crate::observability::{EXPORT_DOCUMENTS, EXPORT_ERRORS};

/// File name used when the caller does not supply one.
pub const DEFAULT_FILENAME: &str = "response.pdf";

/// Converts text into a document artifact.
pub trait Exporter: Send + Sync {
    /// Writes `text` as a single-page document named `filename`
    /// (default [`DEFAULT_FILENAME`]) and returns where it landed.
    fn export_as_document(&self, text: &str, filename: Option<&str>) -> Result<PathBuf>;
}

/// Writes PDF documents into a download directory.
#[derive(Debug, Clone)]
pub struct PdfExporter {
    dir: PathBuf,
}

impl PdfExporter {
    /// Creates an exporter writing into `dir`. The directory is created on
    /// first export if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the download directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Default for PdfExporter {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Exporter for PdfExporter {
    fn export_as_document(&self, text: &str, filename: Option<&str>) -> Result<PathBuf> {
        let path = self.dir.join(filename.unwrap_or(DEFAULT_FILENAME));
        let written = write_document(&path, text);
        match written {
            Ok(()) => {
                EXPORT_DOCUMENTS.click();
                Ok(path)
            }
            Err(err) => {
                EXPORT_ERRORS.click();
                Err(err)
            }
        }
    }
}

fn write_document(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|err| Error::io("failed to create download directory", err))?;
    }
    let tmp_path = staging_path(path);
    if let Err(err) = fs::write(&tmp_path, pdf::render(text)) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::io(format!("failed to write {}", path.display()), err));
    }
    fs::rename(&tmp_path, path).map_err(|err| {
        let _ = fs::remove_file(&tmp_path);
        Error::io(format!("failed to replace {}", path.display()), err)
    })
}

/// A sibling of `path` unique to this write, so concurrent exports to the
/// same name never share a partially written file.
fn staging_path(path: &Path) -> PathBuf {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let seq = NEXT.fetch_add(1, Ordering::Relaxed);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PdfExporter::new(dir.path());
        let path = exporter.export_as_document("Why did...", None).unwrap();
        assert_eq!(path, dir.path().join("response.pdf"));

        let bytes = fs::read(&path).unwrap();
        assert_eq!(pdf::extract_text(&bytes).as_deref(), Some("Why did..."));
    }

    #[test]
    fn named_export_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PdfExporter::new(dir.path().join("downloads"));
        let path = exporter
            .export_as_document("second", Some("joke.pdf"))
            .unwrap();
        assert_eq!(path, dir.path().join("downloads").join("joke.pdf"));
        assert!(path.exists());
    }

    #[test]
    fn concurrent_exports_leave_one_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = std::sync::Arc::new(PdfExporter::new(dir.path()));
        let texts: Vec<String> = (0..16).map(|i| format!("reply number {i}")).collect();
        let handles: Vec<_> = texts
            .iter()
            .cloned()
            .map(|text| {
                let exporter = std::sync::Arc::clone(&exporter);
                std::thread::spawn(move || exporter.export_as_document(&text, None).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let bytes = fs::read(dir.path().join("response.pdf")).unwrap();
        let text = pdf::extract_text(&bytes).unwrap();
        assert!(texts.contains(&text));
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("response.pdf")]);
    }

    #[test]
    fn each_export_is_independent() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = PdfExporter::new(dir.path());
        exporter.export_as_document("first", None).unwrap();
        let path = exporter.export_as_document("second", None).unwrap();
        let bytes = fs::read(path).unwrap();
        assert_eq!(pdf::extract_text(&bytes).as_deref(), Some("second"));
    }
}
