//! Document text extractor: turns an uploaded PDF or DOCX into plain text.
//!
//! Extraction is best-effort. Any decode failure is logged and produces an empty
//! string, which downstream code treats as "nothing extracted".

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const DOCX_BODY_PART: &str = "word/document.xml";

/// The two document formats a resume may be uploaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a declared MIME type to a supported kind. `None` means unsupported.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim() {
            PDF_MIME => Some(DocumentKind::Pdf),
            DOCX_MIME => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MIME,
            DocumentKind::Docx => DOCX_MIME,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

#[derive(Debug, Error)]
enum ExtractError {
    #[error("PDF decode failed: {0}")]
    Pdf(String),

    #[error("PDF decoder panicked")]
    PdfPanicked,

    #[error("DOCX container error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("DOCX markup error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Extracts plain text from the document at `path`.
/// Returns an empty string on any failure.
pub fn extract_text(path: &Path, kind: DocumentKind) -> String {
    let result = match kind {
        DocumentKind::Pdf => extract_pdf(path),
        DocumentKind::Docx => extract_docx(path),
    };

    match result {
        Ok(text) => {
            debug!(?kind, chars = text.len(), "Extracted document text");
            text
        }
        Err(e) => {
            warn!(?kind, path = %path.display(), "Text extraction failed: {e}");
            String::new()
        }
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed font tables
    std::panic::catch_unwind(|| pdf_extract::extract_text(path))
        .map_err(|_| ExtractError::PdfPanicked)?
        .map_err(|e| ExtractError::Pdf(format!("{e:?}")))
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = std::fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY_PART)?.read_to_string(&mut xml)?;
    docx_body_text(&xml)
}

/// Collects the readable text of a WordprocessingML body, discarding markup.
fn docx_body_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"r" => in_run = true,
                b"t" => in_text_run = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"r" => in_run = false,
                b"t" => in_text_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            // Tab stops in paragraph properties are also empty `tab` elements
            Event::Empty(e) if in_run => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text_run => text.push_str(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(r) if in_text_run => {
                if let Some(resolved) = resolve_entity(&String::from_utf8_lossy(&r)) {
                    text.push(resolved);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)
        }
    }
}

/// An uploaded document spooled to a temporary file.
///
/// The temp file is removed when this value is dropped, whether or not
/// extraction or storage succeeded.
pub struct UploadedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    file: NamedTempFile,
    size: usize,
}

impl UploadedDocument {
    pub fn create_in(dir: &Path, file_name: String, kind: DocumentKind) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("resume-upload-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(dir)?;
        Ok(Self {
            file_name,
            kind,
            file,
            size: 0,
        })
    }

    pub fn append(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.as_file_mut().write_all(chunk)?;
        self.size += chunk.len();
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs text extraction on the blocking pool.
    pub async fn extract_text(&self) -> String {
        let path: PathBuf = self.path().to_path_buf();
        let kind = self.kind;
        match tokio::task::spawn_blocking(move || extract_text(&path, kind)).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Extraction task failed: {e}");
                String::new()
            }
        }
    }
}
