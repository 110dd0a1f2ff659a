//! Template document session
//!
//! [`DocxDocument`] owns an open package for the lifetime of one templating
//! session, along with the session's permission id allocator.

use doc_model::{DocumentTree, InlineImage, NodeId, NodeType, ProtectionType, ValidationError};
use serde::{Deserialize, Serialize};
use store::DocxPackage;

use crate::anchor::AnchorKind;
use crate::error::{Result, TemplateError};
use crate::locator::{AnchorLocator, FieldInfo};
use crate::options::TagVisibilityOptions;
use crate::permission::PermissionRangeAllocator;
use crate::visibility::VisibilityToggler;

/// A piece of paragraph text for the single-tag replacement API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Block text; a lone `"\t"` becomes a tab
    pub text: String,
    /// Wrap the block in an editable range
    pub editable: bool,
}

impl TextBlock {
    /// An editable block
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            editable: true,
        }
    }

    /// A block outside any editable range
    pub fn fixed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            editable: false,
        }
    }
}

/// An open template
#[derive(Debug)]
pub struct DocxDocument {
    package: DocxPackage,
    permissions: PermissionRangeAllocator,
    /// First structural error raised inside a fluent builder
    pending_error: Option<TemplateError>,
}

impl DocxDocument {
    /// Open a template from .docx bytes
    pub fn open(bytes: &[u8]) -> Result<Self> {
        Ok(Self::from_package(DocxPackage::open(bytes)?))
    }

    /// A blank document
    pub fn new() -> Result<Self> {
        Ok(Self::from_package(DocxPackage::blank()?))
    }

    pub fn from_package(package: DocxPackage) -> Self {
        Self {
            package,
            permissions: PermissionRangeAllocator::new(),
            pending_error: None,
        }
    }

    pub fn package(&self) -> &DocxPackage {
        &self.package
    }

    pub fn package_mut(&mut self) -> &mut DocxPackage {
        &mut self.package
    }

    pub fn tree(&self) -> &DocumentTree {
        self.package.tree()
    }

    pub(crate) fn tree_mut(&mut self) -> &mut DocumentTree {
        self.package.tree_mut()
    }

    /// Main document, then headers, then footers
    pub fn content_roots(&self) -> Vec<NodeId> {
        self.package.content_roots()
    }

    pub(crate) fn main_root(&self) -> Result<NodeId> {
        Ok(self.package.main_root()?)
    }

    // =========================================================================
    // Session state used by builders
    // =========================================================================

    pub(crate) fn allocate_permission_id(&mut self) -> u32 {
        let roots = self.package.content_roots();
        self.permissions.allocate_id(self.package.tree(), &roots)
    }

    /// Keep the first error of a fluent call; the facade reports it later
    pub(crate) fn record<T, E: Into<TemplateError>>(&mut self, result: std::result::Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                let error = error.into();
                tracing::warn!(%error, "builder operation failed");
                if self.pending_error.is_none() {
                    self.pending_error = Some(error);
                }
                None
            }
        }
    }

    pub(crate) fn take_error(&mut self) -> Result<()> {
        match self.pending_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Store an image part and build a detached run showing it
    pub(crate) fn create_image_run(&mut self, data: &[u8], content_type: &str) -> Result<NodeId> {
        let relationship_id = self.package.add_image_part(content_type, data)?;
        let drawing_id = self
            .content_roots()
            .into_iter()
            .map(|root| self.tree().max_drawing_id(root))
            .max()
            .unwrap_or(0)
            + 1;
        let image = InlineImage {
            relationship_id,
            drawing_id,
            name: format!("Picture {}", drawing_id),
            extent: Default::default(),
        };
        Ok(self.tree_mut().create_image_run(&image)?)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Every content control in the document
    pub fn fields(&self) -> Vec<FieldInfo> {
        let roots = self.content_roots();
        AnchorLocator::new(&roots).fields(self.tree())
    }

    /// Whether a field matches `name` (alias) and/or `tag`
    pub fn contains_field(&self, name: Option<&str>, tag: Option<&str>) -> bool {
        self.fields().iter().any(|field| field.matches(name, tag))
    }

    // =========================================================================
    // Body appends
    // =========================================================================

    fn body(&self) -> Result<NodeId> {
        Ok(self.package.body()?)
    }

    /// Append a node to the body, keeping a trailing `w:sectPr` last
    pub(crate) fn append_to_body(&mut self, node: NodeId) -> Result<()> {
        let body = self.body()?;
        let tree = self.tree_mut();
        let trailing_section = tree
            .children(body)
            .last()
            .copied()
            .filter(|&last| tree.is(last, NodeType::SectionProperties));
        match trailing_section {
            Some(section) => tree.insert_before(section, node)?,
            None => tree.append_child(body, node)?,
        }
        Ok(())
    }

    /// Append a paragraph with `text`. A hidden paragraph has its mark and
    /// its run vanished.
    pub fn append_paragraph(&mut self, text: &str, visible: bool) -> Result<NodeId> {
        let tree = self.tree_mut();
        let paragraph = tree.create_paragraph()?;
        let run = tree.create_text_run(text, None)?;
        if !visible {
            tree.set_run_hidden(run, true)?;
            let mark = tree.ensure_mark_run_properties(paragraph)?;
            tree.set_vanish(mark, true)?;
        }
        tree.append_child(paragraph, run)?;
        self.append_to_body(paragraph)?;
        Ok(paragraph)
    }

    /// Append a paragraph built from text blocks
    pub fn append_blocks(&mut self, blocks: &[TextBlock]) -> Result<NodeId> {
        let paragraph = self.blocks_paragraph(blocks)?;
        self.append_to_body(paragraph)?;
        Ok(paragraph)
    }

    /// Append an empty `{name}` / `{/name}` tag
    pub fn append_tag(&mut self, name: &str) -> Result<()> {
        let (opening, closing) = AnchorKind::Tag.create_markers(self.tree_mut(), name)?;
        self.append_to_body(opening)?;
        self.append_to_body(closing)
    }

    /// Append a `{{name}}` paragraph
    pub fn append_placeholder_tag(&mut self, name: &str, visible: bool) -> Result<NodeId> {
        self.append_paragraph(&AnchorKind::Placeholder.opening(name), visible)
    }

    /// Build a detached paragraph from text blocks. Editable blocks are
    /// wrapped in their own permission range.
    pub(crate) fn blocks_paragraph(&mut self, blocks: &[TextBlock]) -> Result<NodeId> {
        let paragraph = self.tree_mut().create_paragraph()?;
        for block in blocks {
            let id = block.editable.then(|| self.allocate_permission_id());
            let tree = self.tree_mut();
            let run = if block.text == "\t" {
                tree.create_tab_run(None)?
            } else {
                tree.create_text_run(&block.text, None)?
            };
            match id {
                Some(id) => {
                    let start = PermissionRangeAllocator::start(tree, id);
                    let end = PermissionRangeAllocator::end(tree, id);
                    tree.append_children(paragraph, &[start, run, end])?;
                }
                None => tree.append_child(paragraph, run)?,
            }
        }
        Ok(paragraph)
    }

    // =========================================================================
    // Protection, properties, signatures
    // =========================================================================

    /// Make the document read-only
    pub fn protect(&mut self) -> Result<()> {
        Ok(self.package.set_protection(ProtectionType::ReadOnly)?)
    }

    /// Lift the edit restriction
    pub fn unprotect(&mut self) -> Result<()> {
        Ok(self.package.set_protection(ProtectionType::None)?)
    }

    pub fn protection(&self) -> Option<ProtectionType> {
        self.package.protection()
    }

    pub fn set_custom_property(&mut self, name: &str, value: &str) -> Result<()> {
        Ok(self.package.set_custom_property(name, value)?)
    }

    pub fn custom_property(&self, name: &str) -> Option<String> {
        self.package.custom_property(name)
    }

    pub fn has_signatures(&self) -> bool {
        self.package.has_signatures()
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Show or hide the content of every `name` tag
    pub fn set_tag_visibility(&mut self, name: &str, visible: bool) -> Result<usize> {
        let roots = self.content_roots();
        Ok(VisibilityToggler::new(&roots).set_visibility(self.tree_mut(), name, visible)?)
    }

    /// Show the visible tag, then hide each hidden tag
    pub fn apply_visibility(&mut self, options: &TagVisibilityOptions) -> Result<()> {
        let roots = self.content_roots();
        Ok(VisibilityToggler::new(&roots).apply(self.tree_mut(), options)?)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Structural problems in every content part
    pub fn validate(&self) -> Vec<ValidationError> {
        self.package.validate()
    }

    /// Serialize the package
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.package.to_bytes()?)
    }
}
