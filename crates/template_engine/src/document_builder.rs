//! Template filling facade
//!
//! ```ignore
//! let document = DocxDocument::open(&bytes)?;
//! let mut builder = DocumentBuilder::new(document, None)?;
//! builder
//!     .tag("MAIN", |b| {
//!         b.center().paragraph_text("Hello");
//!     })?
//!     .placeholder("TITLE", |b| { b.bold().text("Report"); }, false)?;
//! let output = builder.into_bytes()?;
//! ```
//!
//! A name that matches nothing leaves the document untouched and is not an
//! error.

use doc_model::{ContentControlKind, ValidationError};

use crate::builder::{BlockBuilder, InlineBuilder};
use crate::document::DocxDocument;
use crate::error::Result;
use crate::locator::AnchorLocator;
use crate::normalizer::RunNormalizer;
use crate::options::TagVisibilityOptions;

/// Fills the anchors of one document
///
/// The node arena only grows during a session. Block prototypes, captured
/// run and paragraph properties, and every subtree replaced by a fill stay
/// allocated, detached, until the builder is dropped. Memory therefore
/// tracks the total content generated, not the size of the final document;
/// fill very large templates in several sessions over reopened bytes.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: DocxDocument,
    /// Applied when the document is serialized
    theme: Option<TagVisibilityOptions>,
}

impl DocumentBuilder {
    /// Start a session. Fragmented hidden runs are merged first.
    pub fn new(mut document: DocxDocument, theme: Option<TagVisibilityOptions>) -> Result<Self> {
        let roots = document.content_roots();
        RunNormalizer::new().normalize(document.tree_mut(), &roots)?;
        Ok(Self { document, theme })
    }

    /// Start a session on .docx bytes
    pub fn open(bytes: &[u8], theme: Option<TagVisibilityOptions>) -> Result<Self> {
        Self::new(DocxDocument::open(bytes)?, theme)
    }

    pub fn document(&self) -> &DocxDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut DocxDocument {
        &mut self.document
    }

    pub fn theme(&self) -> Option<&TagVisibilityOptions> {
        self.theme.as_ref()
    }

    pub fn set_theme(&mut self, theme: Option<TagVisibilityOptions>) {
        self.theme = theme;
    }

    /// Fill every `{name}` / `{/name}` occurrence with the blocks built by
    /// `fill`. Existing content between the markers is replaced.
    pub fn tag<F>(&mut self, name: &str, fill: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut BlockBuilder<'_>),
    {
        let roots = self.document.content_roots();
        let anchors = AnchorLocator::new(&roots).tags(self.document.tree(), name);
        if anchors.is_empty() {
            return Ok(self);
        }
        let mut builder = BlockBuilder::for_tags(&mut self.document, anchors)?;
        fill(&mut builder);
        builder.finish();
        self.document.take_error()?;
        Ok(self)
    }

    /// Fill every `{{name}}` / `{{/name}}` occurrence. `fill` runs once per
    /// occurrence, starting from the opening marker's run formatting. The
    /// markers stay in place, hidden, when `preserve` is set.
    pub fn placeholder<F>(&mut self, name: &str, mut fill: F, preserve: bool) -> Result<&mut Self>
    where
        F: FnMut(&mut InlineBuilder<'_>),
    {
        let roots = self.document.content_roots();
        let anchors = AnchorLocator::new(&roots).placeholders(self.document.tree_mut(), name)?;
        for anchor in &anchors {
            anchor.clear(self.document.tree_mut())?;
        }

        for anchor in &anchors {
            let tree = self.document.tree_mut();
            let base = tree
                .run_properties(anchor.opening)
                .map(|rpr| tree.clone_subtree(rpr))
                .transpose()?;

            let mut inline = InlineBuilder::new(&mut self.document, base);
            fill(&mut inline);
            let content = inline.finish();
            self.document.take_error()?;

            let tree = self.document.tree_mut();
            for node in content {
                tree.insert_before(anchor.closing, node)?;
            }
            if !preserve {
                anchor.remove(tree)?;
            }
        }
        Ok(self)
    }

    /// Fill every block content control aliased `name`
    pub fn block_field<F>(&mut self, name: &str, fill: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut BlockBuilder<'_>),
    {
        let roots = self.document.content_roots();
        let fields = AnchorLocator::new(&roots).field_anchors(
            self.document.tree_mut(),
            name,
            ContentControlKind::Block,
        )?;
        if fields.is_empty() {
            return Ok(self);
        }
        let mut builder = BlockBuilder::for_fields(&mut self.document, fields)?;
        fill(&mut builder);
        builder.finish();
        self.document.take_error()?;
        Ok(self)
    }

    /// Fill every inline content control aliased `name`. `fill` runs once
    /// per field, starting from the field's own run formatting.
    pub fn inline_field<F>(&mut self, name: &str, mut fill: F) -> Result<&mut Self>
    where
        F: FnMut(&mut InlineBuilder<'_>),
    {
        let roots = self.document.content_roots();
        let fields = AnchorLocator::new(&roots).field_anchors(
            self.document.tree_mut(),
            name,
            ContentControlKind::Inline,
        )?;

        for field in &fields {
            self.document.tree_mut().remove_children(field.content)?;
            let mut inline = InlineBuilder::new(&mut self.document, field.run_properties);
            fill(&mut inline);
            let content = inline.finish();
            self.document.take_error()?;
            self.document.tree_mut().append_children(field.content, &content)?;
        }
        Ok(self)
    }

    /// Show or hide the content of every `name` tag now
    pub fn set_tag_visibility(&mut self, name: &str, visible: bool) -> Result<&mut Self> {
        self.document.set_tag_visibility(name, visible)?;
        Ok(self)
    }

    /// Whether every content part is structurally valid
    pub fn validate(&self) -> bool {
        let errors = self.validation_errors();
        for error in &errors {
            tracing::debug!(%error, "validation error");
        }
        errors.is_empty()
    }

    pub fn validation_errors(&self) -> Vec<ValidationError> {
        self.document.validate()
    }

    /// End the session and hand back the document, theme not applied
    pub fn into_document(self) -> DocxDocument {
        self.document
    }

    /// Apply the theme and serialize the package
    pub fn into_bytes(mut self) -> Result<Vec<u8>> {
        if let Some(theme) = &self.theme {
            self.document.apply_visibility(theme)?;
        }
        self.document.to_bytes()
    }
}
