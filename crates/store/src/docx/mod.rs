//! DOCX Package Module
//!
//! Reads a Word package into a shared [`doc_model::DocumentTree`], lets
//! callers edit it in place, and writes it back.
//!
//! ## Structure
//!
//! A DOCX file is a ZIP archive containing XML files:
//! - `[Content_Types].xml` - Content type definitions
//! - `_rels/.rels` - Root relationships
//! - `word/document.xml` - Main document content
//! - `word/_rels/document.xml.rels` - Document relationships
//! - `word/header*.xml`, `word/footer*.xml` - Header and footer content
//! - `word/settings.xml` - Document settings (protection lives here)
//! - `docProps/custom.xml` - Custom document properties
//! - `word/media/` - Embedded images and media
//!
//! Only the parts the template engine edits are parsed into the tree; every
//! other part is carried through as raw bytes.

mod error;
mod reader;
mod content_types;
mod relationships;
mod parser;
mod document_writer;
mod writer;
mod package;
mod custom_properties;
pub mod template;

pub use error::{DocxError, DocxResult};
pub use reader::{DocxReader, XmlParser};
pub use content_types::ContentTypes;
pub use relationships::{Relationship, Relationships, TargetMode};
pub use parser::{ParsedPart, XmlPartParser};
pub use document_writer::{escape_xml, escape_xml_attr, DocumentWriter};
pub use writer::DocxWriter;
pub use package::{DocxPackage, PartKind};

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// Package relationships namespace
    pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    /// Content types namespace
    pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
    /// Custom properties namespace
    pub const CUSTOM_PROPERTIES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties";
    /// Variant types namespace
    pub const VT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const SETTINGS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
    pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
    pub const CUSTOM_PROPERTIES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/custom-properties";
    pub const DIGITAL_SIGNATURE_ORIGIN: &str = "http://schemas.openxmlformats.org/package/2006/relationships/digital-signature/origin";
    pub const DIGITAL_SIGNATURE: &str = "http://schemas.openxmlformats.org/package/2006/relationships/digital-signature/signature";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const SETTINGS: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const CUSTOM_PROPERTIES: &str = "application/vnd.openxmlformats-officedocument.custom-properties+xml";
    pub const XML: &str = "application/xml";
}
