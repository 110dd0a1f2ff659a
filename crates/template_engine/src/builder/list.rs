//! Ordered list builder

use doc_model::NodeId;

use super::inline::InlineBuilder;
use crate::document::DocxDocument;
use crate::error::Result;

/// Builds the items of one numbered list. Every item is a level 0
/// paragraph of the same numbering instance.
pub struct OrderedListBuilder<'d> {
    doc: &'d mut DocxDocument,
    num_id: u32,
    items: Vec<NodeId>,
}

impl<'d> OrderedListBuilder<'d> {
    pub(crate) fn new(doc: &'d mut DocxDocument, num_id: u32) -> Self {
        Self {
            doc,
            num_id,
            items: Vec::new(),
        }
    }

    /// An item of plain lines separated by breaks
    pub fn item(&mut self, lines: &[&str]) -> &mut Self {
        self.item_with(|inline| {
            inline.add_text_lines(lines);
        })
    }

    /// An item holding `text`
    pub fn item_text(&mut self, text: &str) -> &mut Self {
        self.item_with(|inline| {
            inline.text(text);
        })
    }

    /// An item whose runs are built by `fill`
    pub fn item_with<F>(&mut self, fill: F) -> &mut Self
    where
        F: FnOnce(&mut InlineBuilder<'_>),
    {
        let mut inline = InlineBuilder::new(&mut *self.doc, None);
        fill(&mut inline);
        let runs = inline.finish();
        let result = self.build_item(&runs);
        if let Some(item) = self.doc.record(result) {
            self.items.push(item);
        }
        self
    }

    fn build_item(&mut self, runs: &[NodeId]) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let paragraph = tree.create_paragraph()?;
        tree.set_numbering(paragraph, self.num_id, 0)?;
        tree.append_children(paragraph, runs)?;
        Ok(paragraph)
    }

    pub(crate) fn finish(self) -> Vec<NodeId> {
        self.items
    }
}
