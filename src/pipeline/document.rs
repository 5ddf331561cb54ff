//! PDF → DOCX worker: text extraction, one paragraph per page.
//!
//! pdfium opens the PDF and yields the text of each page in page order. Each
//! page becomes exactly one DOCX paragraph, so the output always has as many
//! paragraphs as the input has pages, including blank pages. Line breaks
//! inside a page are kept as in-paragraph breaks rather than new paragraphs.
//!
//! Layout, fonts and images are not carried over; only text is.

use super::atomic::write_atomically;
use super::{Converter, Format, PDF_TO_DOCX};
use crate::config::DocumentOptions;
use crate::error::{BatchError, FileError, FileErrorKind};
use docx_rs::{BreakType, Docx, Paragraph, Run};
use pdfium_render::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at an existing pdfium library file.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Extracts PDF text into DOCX documents.
///
/// Holds one pdfium binding for the whole batch.
pub struct DocumentConverter {
    pdfium: Pdfium,
    options: DocumentOptions,
}

impl DocumentConverter {
    /// Bind pdfium and build the worker.
    ///
    /// # Errors
    /// [`BatchError::PdfiumBindingFailed`] when no pdfium library can be
    /// loaded. This is a setup error: without pdfium no file could succeed.
    pub fn new(options: DocumentOptions) -> Result<Self, BatchError> {
        Ok(Self {
            pdfium: bind_pdfium()?,
            options,
        })
    }

    /// Text of every page, in page order.
    pub fn extract_pages(&self, input: &Path) -> Result<Vec<String>, FileError> {
        check_pdf_magic(input)?;

        let document = self
            .pdfium
            .load_pdf_from_file(input, self.options.password.as_deref())
            .map_err(|e| FileError::new(input, FileErrorKind::Extract, e))?;

        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);
        for (idx, page) in pages.iter().enumerate() {
            let text = page.text().map_err(|e| {
                FileError::new(input, FileErrorKind::Extract, format!("page {}: {}", idx + 1, e))
            })?;
            texts.push(text.all());
        }

        debug!("Extracted {} page(s) from {}", texts.len(), input.display());
        Ok(texts)
    }
}

impl Converter for DocumentConverter {
    fn format(&self) -> &'static Format {
        &PDF_TO_DOCX
    }

    fn convert(&self, input: &Path, output: &Path) -> Result<(), FileError> {
        let pages = self.extract_pages(input)?;
        write_docx(&pages, output)
    }
}

/// Bind to `$PDFIUM_LIB_PATH` when set, otherwise to the system library.
fn bind_pdfium() -> Result<Pdfium, BatchError> {
    let bindings = match std::env::var_os(PDFIUM_LIB_PATH_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            info!("Binding pdfium from {}", path.display());
            Pdfium::bind_to_library(&path).map_err(|e| {
                BatchError::PdfiumBindingFailed(format!("{}: {}", path.display(), e))
            })?
        }
        None => Pdfium::bind_to_system_library()
            .map_err(|e| BatchError::PdfiumBindingFailed(e.to_string()))?,
    };
    Ok(Pdfium::new(bindings))
}

/// Reject files that are not PDFs before pdfium sees them, so the error
/// names the real problem instead of a generic parse failure.
fn check_pdf_magic(input: &Path) -> Result<(), FileError> {
    let mut file =
        std::fs::File::open(input).map_err(|e| FileError::io(input, FileErrorKind::Read, e))?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(FileError::new(
            input,
            FileErrorKind::Extract,
            format!("not a PDF (first bytes: {magic:?})"),
        ));
    }
    Ok(())
}

/// Build a document with one paragraph per page, in order.
pub fn build_docx(pages: &[String]) -> Docx {
    pages
        .iter()
        .fold(Docx::new(), |docx, text| docx.add_paragraph(page_paragraph(text)))
}

fn page_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(xml_safe(line));
    }
    Paragraph::new().add_run(run)
}

/// Control characters other than tab are not allowed in WordprocessingML text.
fn xml_safe(line: &str) -> String {
    line.chars().filter(|&c| c == '\t' || !c.is_control()).collect()
}

/// Pack `pages` as a DOCX at `output` (write-then-rename).
pub fn write_docx(pages: &[String], output: &Path) -> Result<(), FileError> {
    write_atomically(output, |tmp| {
        build_docx(pages)
            .build()
            .pack(tmp)
            .map_err(|e| FileError::new(output, FileErrorKind::Encode, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::DocumentChild;

    fn read_back(path: &Path) -> docx_rs::Docx {
        let bytes = std::fs::read(path).unwrap();
        docx_rs::read_docx(&bytes).expect("output must be a readable DOCX")
    }

    fn paragraph_count(docx: &docx_rs::Docx) -> usize {
        docx.document
            .children
            .iter()
            .filter(|c| matches!(c, DocumentChild::Paragraph(_)))
            .count()
    }

    #[test]
    fn one_paragraph_per_page_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.docx");
        let pages = vec![
            "First page text".to_string(),
            String::new(),
            "Third page\nwith two lines".to_string(),
        ];

        write_docx(&pages, &out).unwrap();

        let docx = read_back(&out);
        assert_eq!(paragraph_count(&docx), 3);

        let json = docx.json();
        let first = json.find("First page text").expect("page 1 text");
        let third = json.find("Third page").expect("page 3 text");
        assert!(first < third, "page order must be preserved");
        assert!(json.contains("with two lines"));
    }

    #[test]
    fn zero_pages_gives_zero_paragraphs() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("empty.docx");

        write_docx(&[], &out).unwrap();

        assert_eq!(paragraph_count(&read_back(&out)), 0);
    }

    #[test]
    fn control_characters_are_dropped() {
        assert_eq!(xml_safe("a\u{0}b\u{7}c\td"), "abc\td");
    }

    #[test]
    fn non_pdf_input_is_rejected_before_pdfium() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fake.pdf");
        std::fs::write(&input, b"PK\x03\x04 zip, not pdf").unwrap();

        let err = check_pdf_magic(&input).unwrap_err();
        assert_eq!(err.kind, FileErrorKind::Extract);
        assert!(err.message.contains("not a PDF"), "got: {}", err.message);
    }

    #[test]
    fn short_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tiny.pdf");
        std::fs::write(&input, b"%P").unwrap();

        assert!(check_pdf_magic(&input).is_err());
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ok.pdf");
        std::fs::write(&input, b"%PDF-1.7\n").unwrap();

        assert!(check_pdf_magic(&input).is_ok());
    }
}
