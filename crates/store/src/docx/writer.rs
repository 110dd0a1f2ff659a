//! DOCX Writer Infrastructure
//!
//! Creates ZIP archives with correct DOCX structure.

use crate::docx::error::DocxResult;
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Writes package parts into a ZIP archive
pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl DocxWriter<Cursor<Vec<u8>>> {
    /// Create a writer backed by an in-memory buffer
    pub fn in_memory() -> Self {
        Self::new(Cursor::new(Vec::new()))
    }

    /// Finish the archive and return its bytes
    pub fn into_bytes(self) -> DocxResult<Vec<u8>> {
        Ok(self.finish()?.into_inner())
    }
}

impl<W: Write + Seek> DocxWriter<W> {
    /// Create a new DOCX writer
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    /// Write an XML part, compressed
    pub fn write_file(&mut self, path: &str, content: &[u8]) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        self.zip.start_file(path, options)?;
        self.zip.write_all(content)?;

        Ok(())
    }

    /// Write binary data to the ZIP archive, stored without compression
    pub fn write_binary(&mut self, path: &str, data: &[u8]) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);

        self.zip.start_file(path, options)?;
        self.zip.write_all(data)?;

        Ok(())
    }

    /// Finish the ZIP archive
    pub fn finish(self) -> DocxResult<W> {
        Ok(self.zip.finish()?)
    }
}
