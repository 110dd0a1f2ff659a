//! Template Engine - anchor-driven DOCX templating
//!
//! A template marks the places to fill with anchors:
//! - tags: `{name}` and `{/name}` paragraphs around block content
//! - placeholders: hidden `{{name}}` and `{{/name}}` runs around inline content
//! - fields: content controls found by their alias
//!
//! [`DocumentBuilder`] fills anchors through closures receiving an
//! [`InlineBuilder`] or a [`BlockBuilder`]. Every occurrence of a name is
//! filled, and a name with no occurrence is skipped silently.

mod anchor;
pub mod builder;
mod document;
mod document_builder;
mod error;
mod locator;
mod normalizer;
mod options;
mod permission;
mod replace;
mod visibility;

pub use anchor::{Anchor, AnchorKind, FieldAnchor, Marker};
pub use builder::{
    BlockBuilder, CellBuilder, Format, FormatExt, InlineBuilder, OrderedListBuilder, RowBuilder,
    TableBuilder,
};
pub use document::{DocxDocument, TextBlock};
pub use document_builder::DocumentBuilder;
pub use error::{Result, TemplateError};
pub use locator::{AnchorLocator, FieldInfo};
pub use normalizer::{looks_like_placeholder, RunNormalizer};
pub use options::TagVisibilityOptions;
pub use permission::{EditableState, PermissionRangeAllocator};
pub use visibility::VisibilityToggler;
