use super::ExtractionService;
use crate::{Error, Result};
use async_trait::async_trait;
use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};
use std::io::{self, Cursor, Read};
use zip::ZipArchive;

const MAX_ZIP_ENTRIES: usize = 1_000;
const MAX_UNCOMPRESSED_BYTES: u64 = 64 * 1024 * 1024;

/// Raw-text extraction from OOXML word-processing documents.
///
/// Every body paragraph, including the paragraphs of table cells, becomes its
/// text followed by a blank line. Formatting, table layout, headers, footers
/// and drawings are not reproduced.
#[derive(Debug, Default, Clone)]
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_sync(bytes: &[u8]) -> Result<String> {
        check_archive(bytes)?;

        let docx = docx_rs::read_docx(bytes)
            .map_err(|e| Error::ContentExtraction(format!("Failed to parse DOCX: {}", e)))?;

        let mut out = String::new();
        for child in &docx.document.children {
            match child {
                DocumentChild::Paragraph(p) => push_paragraph(p, &mut out),
                DocumentChild::Table(t) => push_table(t, &mut out),
                _ => {}
            }
        }
        Ok(out)
    }
}

/// Rejects archives whose entries actually inflate past the ceiling. Sizes
/// declared in the zip headers are not trusted.
fn check_archive(bytes: &[u8]) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        Error::ContentExtraction(format!("Document is not a DOCX container: {}", e))
    })?;

    if archive.len() > MAX_ZIP_ENTRIES {
        return Err(Error::ContentExtraction(format!(
            "DOCX has too many entries ({} > {})",
            archive.len(),
            MAX_ZIP_ENTRIES
        )));
    }

    let mut total: u64 = 0;
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| Error::ContentExtraction(format!("Failed to read DOCX entry {}: {}", i, e)))?;

        let remaining = MAX_UNCOMPRESSED_BYTES - total;
        let inflated = io::copy(&mut entry.take(remaining + 1), &mut io::sink()).map_err(|e| {
            Error::ContentExtraction(format!("Failed to inflate DOCX entry {}: {}", i, e))
        })?;

        total += inflated;
        if total > MAX_UNCOMPRESSED_BYTES {
            return Err(Error::ContentExtraction(format!(
                "DOCX expands past {} bytes",
                MAX_UNCOMPRESSED_BYTES
            )));
        }
    }
    Ok(())
}

fn push_paragraph(p: &Paragraph, out: &mut String) {
    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => {
                for run_child in &r.children {
                    match run_child {
                        RunChild::Text(t) => out.push_str(&t.text),
                        RunChild::Tab(_) => out.push('\t'),
                        RunChild::Break(_) => out.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(h) => {
                for child in &h.children {
                    if let ParagraphChild::Run(r) = child {
                        for run_child in &r.children {
                            if let RunChild::Text(t) = run_child {
                                out.push_str(&t.text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
    out.push_str("\n\n");
}

fn push_table(t: &Table, out: &mut String) {
    for row in &t.rows {
        let TableChild::TableRow(r) = row;
        for cell in &r.cells {
            let TableRowChild::TableCell(c) = cell;
            for content in &c.children {
                if let TableCellContent::Paragraph(p) = content {
                    push_paragraph(p, out);
                }
            }
        }
    }
}

#[async_trait]
impl ExtractionService for DocxExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        tracing::debug!("Extracting text from DOCX ({} bytes)", bytes.len());

        let text = tokio::task::spawn_blocking({
            let bytes = bytes.to_vec();
            move || Self::extract_sync(&bytes)
        })
        .await
        .map_err(|e| Error::ContentExtraction(format!("DOCX extraction task failed: {}", e)))??;

        tracing::debug!("Extracted {} chars from DOCX", text.chars().count());
        Ok(text)
    }
}
