//! Block content builder
//!
//! Each call builds its content once, then splices a deep copy into every
//! target occurrence before returning. Without targets the builder is inert:
//! every call returns immediately and nothing is built.

use std::collections::HashMap;

use doc_model::{Alignment, DocumentTree, NodeId, NodeType, ParagraphFormatting, TableBorderStyle};

use super::format::Format;
use super::inline::InlineBuilder;
use super::list::OrderedListBuilder;
use super::table::TableBuilder;
use crate::anchor::{Anchor, AnchorKind, FieldAnchor};
use crate::document::DocxDocument;
use crate::error::Result;
use crate::permission::PermissionRangeAllocator;

/// Where generated blocks go
#[derive(Debug)]
enum BlockTarget {
    /// Before the closing marker of each tag occurrence
    Tags(Vec<Anchor>),
    /// At the end of each field's content
    Fields(Vec<FieldAnchor>),
}

impl BlockTarget {
    fn len(&self) -> usize {
        match self {
            BlockTarget::Tags(anchors) => anchors.len(),
            BlockTarget::Fields(fields) => fields.len(),
        }
    }

    /// Attach `node` to occurrence `index`
    fn insert(&self, tree: &mut DocumentTree, index: usize, node: NodeId) -> Result<()> {
        match self {
            BlockTarget::Tags(anchors) => tree.insert_before(anchors[index].closing, node)?,
            BlockTarget::Fields(fields) => {
                let field = &fields[index];
                restyle(tree, field, node)?;
                tree.append_child(field.content, node)?;
            }
        }
        Ok(())
    }
}

/// Give a cloned top-level paragraph the field's captured formatting. Runs
/// without their own properties take the captured run properties.
fn restyle(tree: &mut DocumentTree, field: &FieldAnchor, node: NodeId) -> Result<()> {
    if !tree.is(node, NodeType::Paragraph) {
        return Ok(());
    }
    if let Some(ppr) = field.paragraph_properties {
        let copy = tree.clone_subtree(ppr)?;
        tree.replace_paragraph_properties(node, copy)?;
    }
    if let Some(rpr) = field.run_properties {
        for run in tree.children_of_type(node, NodeType::Run) {
            if tree.run_properties(run).is_none() {
                let copy = tree.clone_subtree(rpr)?;
                tree.prepend_child(run, copy)?;
            }
        }
    }
    Ok(())
}

/// Builds block content for tags and block fields
pub struct BlockBuilder<'d> {
    doc: &'d mut DocxDocument,
    targets: BlockTarget,
    /// Alignment and indent consumed by the next paragraph
    pending: ParagraphFormatting,
    /// Consumed by the next table
    borderless: bool,
    /// One open range id per target occurrence
    editable: Option<Vec<u32>>,
}

impl<'d> BlockBuilder<'d> {
    /// Target tag occurrences; whatever sits between their markers is removed
    pub(crate) fn for_tags(doc: &'d mut DocxDocument, anchors: Vec<Anchor>) -> Result<Self> {
        for anchor in &anchors {
            anchor.clear(doc.tree_mut())?;
        }
        Ok(Self::with_target(doc, BlockTarget::Tags(anchors)))
    }

    /// Target block fields; their content is removed
    pub(crate) fn for_fields(doc: &'d mut DocxDocument, fields: Vec<FieldAnchor>) -> Result<Self> {
        for field in &fields {
            doc.tree_mut().remove_children(field.content)?;
        }
        Ok(Self::with_target(doc, BlockTarget::Fields(fields)))
    }

    fn with_target(doc: &'d mut DocxDocument, targets: BlockTarget) -> Self {
        Self {
            doc,
            targets,
            pending: ParagraphFormatting::default(),
            borderless: false,
            editable: None,
        }
    }

    /// Whether calls on this builder do anything
    pub fn is_inert(&self) -> bool {
        self.targets.len() == 0
    }

    /// Splice a copy of each prototype into every occurrence
    fn append(&mut self, prototypes: &[NodeId]) -> &mut Self {
        let result = self.try_append(prototypes);
        self.doc.record(result);
        self
    }

    fn try_append(&mut self, prototypes: &[NodeId]) -> Result<()> {
        for index in 0..self.targets.len() {
            let mut renumbered = HashMap::new();
            for &prototype in prototypes {
                let copy = self.doc.tree_mut().clone_subtree(prototype)?;
                if index > 0 {
                    self.renumber_permissions(copy, &mut renumbered)?;
                }
                self.targets.insert(self.doc.tree_mut(), index, copy)?;
            }
        }
        Ok(())
    }

    /// Give every editable range inside `copy` a fresh id. Start and end
    /// markers sharing an id keep sharing the replacement.
    fn renumber_permissions(&mut self, copy: NodeId, renumbered: &mut HashMap<String, u32>) -> Result<()> {
        let tree = self.doc.tree();
        let mut markers = vec![copy];
        markers.extend(tree.descendants(copy));
        markers.retain(|&node| {
            tree.is(node, NodeType::PermissionStart) || tree.is(node, NodeType::PermissionEnd)
        });

        for marker in markers {
            let Some(old) = self.doc.tree().attribute(marker, "id").map(str::to_string) else {
                continue;
            };
            let id = match renumbered.get(&old) {
                Some(&id) => id,
                None => {
                    let id = self.doc.allocate_permission_id();
                    renumbered.insert(old, id);
                    id
                }
            };
            self.doc.tree_mut().set_attribute(marker, "w:id", id.to_string())?;
        }
        Ok(())
    }

    /// Record a builder error
    fn fail(&mut self, result: Result<()>) -> &mut Self {
        self.doc.record(result);
        self
    }

    // =========================================================================
    // Editable ranges
    // =========================================================================

    /// Open an editable range in every occurrence; no-op while one is open
    pub fn editable_start(&mut self) -> &mut Self {
        if self.is_inert() || self.editable.is_some() {
            return self;
        }
        let ids: Vec<u32> = (0..self.targets.len())
            .map(|_| self.doc.allocate_permission_id())
            .collect();
        let result = self.insert_each(&ids, PermissionRangeAllocator::start);
        self.editable = Some(ids);
        self.fail(result)
    }

    /// Close the open editable range; no-op when none is open
    pub fn editable_end(&mut self) -> &mut Self {
        let Some(ids) = self.editable.take() else {
            return self;
        };
        let result = self.insert_each(&ids, PermissionRangeAllocator::end);
        self.fail(result)
    }

    /// Insert a distinct marker per occurrence
    fn insert_each(&mut self, ids: &[u32], marker: fn(&mut DocumentTree, u32) -> NodeId) -> Result<()> {
        let tree = self.doc.tree_mut();
        for (index, &id) in ids.iter().enumerate() {
            let node = marker(tree, id);
            self.targets.insert(tree, index, node)?;
        }
        Ok(())
    }

    // =========================================================================
    // Paragraph formatting for the next paragraph
    // =========================================================================

    pub fn left(&mut self) -> &mut Self {
        self.pending.alignment = Some(Alignment::Left);
        self
    }

    pub fn center(&mut self) -> &mut Self {
        self.pending.alignment = Some(Alignment::Center);
        self
    }

    pub fn right(&mut self) -> &mut Self {
        self.pending.alignment = Some(Alignment::Right);
        self
    }

    /// Justified
    pub fn both(&mut self) -> &mut Self {
        self.pending.alignment = Some(Alignment::Justify);
        self
    }

    /// Start the next paragraph with a tab
    pub fn indent(&mut self) -> &mut Self {
        self.pending.indent = true;
        self
    }

    /// Draw the next table without borders
    pub fn border_none(&mut self) -> &mut Self {
        self.borderless = true;
        self
    }

    // =========================================================================
    // Paragraphs
    // =========================================================================

    pub fn empty_line(&mut self) -> &mut Self {
        self.empty_lines(1)
    }

    pub fn empty_lines(&mut self, count: usize) -> &mut Self {
        if self.is_inert() {
            return self;
        }
        let result: doc_model::Result<Vec<NodeId>> =
            (0..count).map(|_| self.doc.tree_mut().create_paragraph()).collect();
        match self.doc.record(result) {
            Some(paragraphs) => self.append(&paragraphs),
            None => self,
        }
    }

    /// A paragraph of plain lines separated by breaks
    pub fn paragraph(&mut self, lines: &[&str]) -> &mut Self {
        self.paragraph_with(|inline| {
            inline.add_text_lines(lines);
        })
    }

    /// A paragraph holding `text`
    pub fn paragraph_text(&mut self, text: &str) -> &mut Self {
        self.paragraph_with(|inline| {
            inline.text(text);
        })
    }

    /// A paragraph built from formatting combinators
    pub fn paragraph_format(&mut self, format: impl Into<Format>) -> &mut Self {
        let format = format.into();
        self.paragraph_with(|inline| {
            inline.format(format);
        })
    }

    /// A paragraph whose runs are built by `fill`
    pub fn paragraph_with<F>(&mut self, fill: F) -> &mut Self
    where
        F: FnOnce(&mut InlineBuilder<'_>),
    {
        if self.is_inert() {
            return self;
        }
        let formatting = std::mem::take(&mut self.pending);
        let result = self.new_paragraph(formatting);
        let paragraph = match self.doc.record(result) {
            Some(paragraph) => paragraph,
            None => return self,
        };

        let mut inline = InlineBuilder::new(&mut *self.doc, None);
        fill(&mut inline);
        let runs = inline.finish();

        let result = self.doc.tree_mut().append_children(paragraph, &runs);
        if self.doc.record(result).is_none() {
            return self;
        }
        self.append(&[paragraph])
    }

    fn new_paragraph(&mut self, formatting: ParagraphFormatting) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let paragraph = tree.create_paragraph()?;
        tree.apply_paragraph_formatting(paragraph, formatting)?;
        Ok(paragraph)
    }

    // =========================================================================
    // Lists and tables
    // =========================================================================

    /// A numbered list with its own numbering instance
    pub fn ordered_list<F>(&mut self, fill: F) -> &mut Self
    where
        F: FnOnce(&mut OrderedListBuilder<'_>),
    {
        if self.is_inert() {
            return self;
        }
        let result = self.next_numbering_id();
        let num_id = match self.doc.record(result) {
            Some(id) => id,
            None => return self,
        };
        let mut list = OrderedListBuilder::new(&mut *self.doc, num_id);
        fill(&mut list);
        let items = list.finish();
        self.append(&items)
    }

    /// One past the largest `w:numId` value in the main document
    fn next_numbering_id(&self) -> Result<u32> {
        let root = self.doc.main_root()?;
        let tree = self.doc.tree();
        let max = tree
            .descendants_named(root, "numId")
            .into_iter()
            .filter_map(|id| tree.attribute(id, "val"))
            .filter_map(|value| value.parse::<u32>().ok())
            .max();
        Ok(max.map_or(1, |max| max + 1))
    }

    /// A table: `header` declares the columns, `rows` adds the body rows
    pub fn table<H, R>(&mut self, header: H, rows: R) -> &mut Self
    where
        H: FnOnce(&mut TableBuilder<'_>),
        R: FnOnce(&mut TableBuilder<'_>),
    {
        if self.is_inert() {
            return self;
        }
        let borders = if std::mem::take(&mut self.borderless) {
            TableBorderStyle::None
        } else {
            TableBorderStyle::Thick
        };
        let mut table = TableBuilder::new(&mut *self.doc);
        header(&mut table);
        rows(&mut table);
        let built = table.finish(borders);
        match self.doc.record(built) {
            Some(node) => self.append(&[node]),
            None => self,
        }
    }

    // =========================================================================
    // Nested tags
    // =========================================================================

    /// Insert a `{name}` / `{/name}` pair into every occurrence and fill it
    pub fn append_tag<F>(&mut self, name: &str, fill: F) -> &mut Self
    where
        F: FnOnce(&mut BlockBuilder<'_>),
    {
        if self.is_inert() {
            return self;
        }
        let mut anchors = Vec::with_capacity(self.targets.len());
        for index in 0..self.targets.len() {
            let result = self.insert_markers(index, name);
            match self.doc.record(result) {
                Some(anchor) => anchors.push(anchor),
                None => return self,
            }
        }

        let mut child = BlockBuilder::with_target(&mut *self.doc, BlockTarget::Tags(anchors));
        fill(&mut child);
        child.finish();
        self
    }

    fn insert_markers(&mut self, index: usize, name: &str) -> Result<Anchor> {
        let tree = self.doc.tree_mut();
        let (opening, closing) = AnchorKind::Tag.create_markers(tree, name)?;
        self.targets.insert(tree, index, opening)?;
        self.targets.insert(tree, index, closing)?;
        Ok(Anchor {
            kind: AnchorKind::Tag,
            name: name.to_string(),
            opening,
            closing,
        })
    }

    /// Close any range left open
    pub(crate) fn finish(mut self) {
        self.editable_end();
    }
}
