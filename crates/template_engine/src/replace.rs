//! Single-tag replacement
//!
//! Simple templating for documents that carry each tag once in the main
//! document. Unlike the builder API these helpers report whether anything
//! was replaced.

use std::collections::BTreeMap;

use doc_model::{NodeId, NodeType};

use crate::anchor::{Anchor, AnchorKind};
use crate::document::{DocxDocument, TextBlock};
use crate::error::Result;
use crate::locator::AnchorLocator;

impl DocxDocument {
    /// Replace `{{name}}` inside main document text. Returns the number of
    /// text nodes changed.
    pub fn replace_placeholder_text(&mut self, name: &str, value: &str) -> Result<usize> {
        let marker = AnchorKind::Placeholder.opening(name);
        let root = self.main_root()?;
        let tree = self.tree_mut();
        let targets: Vec<(NodeId, String)> = tree
            .descendants(root)
            .into_iter()
            .filter_map(|id| {
                let text = tree.get(id)?.text()?;
                text.contains(&marker).then(|| (id, text.replace(&marker, value)))
            })
            .collect();
        for (id, text) in &targets {
            tree.set_text(*id, text.as_str())?;
        }
        tracing::debug!(name, replaced = targets.len(), "replaced placeholder text");
        Ok(targets.len())
    }

    /// Replace a single `{{name}}` or the content of a single `{name}` pair
    /// with `value`
    pub fn replace(&mut self, name: &str, value: &str) -> Result<bool> {
        if let Some(text) = self.unique_placeholder_text(name)? {
            let marker = AnchorKind::Placeholder.opening(name);
            let tree = self.tree_mut();
            let replaced = tree.inner_text(text).replace(&marker, value);
            tree.set_text_element(text, &replaced)?;
            return Ok(true);
        }
        let Some(anchor) = self.unique_tag(name)? else {
            return Ok(false);
        };
        let tree = self.tree_mut();
        anchor.clear(tree)?;
        let paragraph = tree.create_text_paragraph(value)?;
        tree.insert_before(anchor.closing, paragraph)?;
        Ok(true)
    }

    /// Apply [`DocxDocument::replace`] to every entry. Returns the names
    /// that were not found.
    pub fn replace_all(&mut self, values: &BTreeMap<String, String>) -> Result<Vec<String>> {
        let mut missing = Vec::new();
        for (name, value) in values {
            if !self.replace(name, value)? {
                missing.push(name.clone());
            }
        }
        Ok(missing)
    }

    /// Replace the content of a single `{name}` pair with a paragraph built
    /// from `blocks`
    pub fn replace_with_blocks(&mut self, name: &str, blocks: &[TextBlock]) -> Result<bool> {
        if self.unique_tag(name)?.is_none() {
            return Ok(false);
        }
        self.clean_content(name)?;
        self.insert_tag_content(name, blocks)
    }

    /// Remove everything between a single `{name}` pair
    pub fn clean_content(&mut self, name: &str) -> Result<usize> {
        match self.unique_tag(name)? {
            Some(anchor) => Ok(anchor.clear(self.tree_mut())?),
            None => Ok(0),
        }
    }

    /// Insert a paragraph built from `blocks` before `{/name}`
    pub fn insert_tag_content(&mut self, name: &str, blocks: &[TextBlock]) -> Result<bool> {
        let Some(anchor) = self.unique_tag(name)? else {
            return Ok(false);
        };
        let paragraph = self.blocks_paragraph(blocks)?;
        self.tree_mut().insert_before(anchor.closing, paragraph)?;
        Ok(true)
    }

    /// The only `w:t` in the main document containing `{{name}}`
    fn unique_placeholder_text(&self, name: &str) -> Result<Option<NodeId>> {
        let marker = AnchorKind::Placeholder.opening(name);
        let root = self.main_root()?;
        let tree = self.tree();
        let matches: Vec<NodeId> = tree
            .descendants_of_type(root, NodeType::Text)
            .into_iter()
            .filter(|&t| tree.inner_text(t).contains(&marker))
            .collect();
        Ok(match matches.as_slice() {
            [only] => Some(*only),
            _ => None,
        })
    }

    /// The only `{name}` pair in the main document
    fn unique_tag(&self, name: &str) -> Result<Option<Anchor>> {
        let roots = [self.main_root()?];
        let mut anchors = AnchorLocator::new(&roots).tags(self.tree(), name);
        Ok(if anchors.len() == 1 { anchors.pop() } else { None })
    }
}
