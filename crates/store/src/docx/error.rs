//! Error types for package I/O

use thiserror::Error;

/// Errors raised while opening, editing or saving a Word package
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Malformed XML in a part or in package metadata
    #[error("malformed XML: {0}")]
    Xml(String),

    /// The archive is not a WordprocessingML package
    #[error("not a Word package: {0}")]
    NotAPackage(String),

    #[error("missing part: {0}")]
    MissingPart(String),

    #[error("duplicate relationship id {0}")]
    DuplicateRelationship(String),

    #[error(transparent)]
    Tree(#[from] doc_model::DocModelError),

    #[error("part is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::Error> for DocxError {
    fn from(err: quick_xml::Error) -> Self {
        DocxError::Xml(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocxError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DocxError::Xml(format!("attribute: {}", err))
    }
}

pub type DocxResult<T> = std::result::Result<T, DocxError>;
