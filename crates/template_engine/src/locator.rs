//! Anchor lookup
//!
//! Every content root (main document, headers, footers) is scanned on its
//! own. Opening and closing markers are paired by position within a root;
//! surplus openings or closings are dropped.

use doc_model::{ContentControlKind, DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

use crate::anchor::{Anchor, AnchorKind, FieldAnchor};

/// Metadata of a content control found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub element: NodeId,
    /// `w:alias` value
    pub name: Option<String>,
    /// `w:tag` value
    pub tag: Option<String>,
    pub kind: ContentControlKind,
}

impl FieldInfo {
    /// Match on name, tag, or both; with neither every field matches
    pub fn matches(&self, name: Option<&str>, tag: Option<&str>) -> bool {
        let name_matches = name.map_or(true, |n| self.name.as_deref() == Some(n));
        let tag_matches = tag.map_or(true, |t| self.tag.as_deref() == Some(t));
        name_matches && tag_matches
    }
}

/// Finds anchors across a set of content roots
#[derive(Debug, Clone, Copy)]
pub struct AnchorLocator<'a> {
    roots: &'a [NodeId],
}

impl<'a> AnchorLocator<'a> {
    pub fn new(roots: &'a [NodeId]) -> Self {
        Self { roots }
    }

    /// All `kind` anchors named `name`, in root order then document order
    pub fn locate(&self, tree: &DocumentTree, kind: AnchorKind, name: &str) -> Vec<Anchor> {
        let opening_text = kind.opening(name);
        let closing_text = kind.closing(name);
        let mut anchors = Vec::new();

        for &root in self.roots {
            let candidates = tree.descendants_of_type(root, kind.element_type());
            let openings: Vec<NodeId> = candidates
                .iter()
                .copied()
                .filter(|&node| tree.inner_text(node) == opening_text)
                .collect();
            if openings.is_empty() {
                continue;
            }
            let closings: Vec<NodeId> = candidates
                .iter()
                .copied()
                .filter(|&node| tree.inner_text(node) == closing_text)
                .collect();
            if openings.len() != closings.len() {
                tracing::warn!(
                    anchor = %opening_text,
                    openings = openings.len(),
                    closings = closings.len(),
                    "unbalanced anchor markers, pairing the first {}",
                    openings.len().min(closings.len())
                );
            }
            anchors.extend(openings.into_iter().zip(closings).map(|(opening, closing)| Anchor {
                kind,
                name: name.to_string(),
                opening,
                closing,
            }));
        }

        tracing::debug!(kind = ?kind, name, count = anchors.len(), "located anchors");
        anchors
    }

    /// Tag occurrences named `name`
    pub fn tags(&self, tree: &DocumentTree, name: &str) -> Vec<Anchor> {
        self.locate(tree, AnchorKind::Tag, name)
    }

    /// Placeholder occurrences named `name`. Both markers of every returned
    /// occurrence are forced hidden.
    pub fn placeholders(&self, tree: &mut DocumentTree, name: &str) -> Result<Vec<Anchor>> {
        let anchors = self.locate(tree, AnchorKind::Placeholder, name);
        for anchor in &anchors {
            tree.set_run_hidden(anchor.opening, true)?;
            tree.set_run_hidden(anchor.closing, true)?;
        }
        Ok(anchors)
    }

    /// Every content control under the roots
    pub fn fields(&self, tree: &DocumentTree) -> Vec<FieldInfo> {
        self.roots
            .iter()
            .flat_map(|&root| tree.descendants_of_type(root, NodeType::ContentControl))
            .map(|element| FieldInfo {
                element,
                name: tree.content_control_alias(element).map(str::to_string),
                tag: tree.content_control_tag(element).map(str::to_string),
                kind: tree.content_control_kind(element),
            })
            .collect()
    }

    /// `kind` content controls whose alias is `name`. Formatting found inside
    /// each control is copied out before the caller clears it.
    pub fn field_anchors(
        &self,
        tree: &mut DocumentTree,
        name: &str,
        kind: ContentControlKind,
    ) -> Result<Vec<FieldAnchor>> {
        let matching: Vec<(NodeId, NodeId)> = self
            .fields(tree)
            .into_iter()
            .filter(|field| field.kind == kind && field.name.as_deref() == Some(name))
            .filter_map(|field| {
                tree.content_control_content(field.element)
                    .map(|content| (field.element, content))
            })
            .collect();

        let mut anchors = Vec::with_capacity(matching.len());
        for (element, content) in matching {
            let paragraph_properties = tree
                .descendants_of_type(element, NodeType::ParagraphProperties)
                .first()
                .copied();
            let run_properties = tree
                .descendants_of_type(element, NodeType::RunProperties)
                .first()
                .copied();
            anchors.push(FieldAnchor {
                name: name.to_string(),
                element,
                content,
                kind,
                paragraph_properties: paragraph_properties
                    .map(|ppr| tree.clone_subtree(ppr))
                    .transpose()?,
                run_properties: run_properties
                    .map(|rpr| tree.clone_subtree(rpr))
                    .transpose()?,
            });
        }

        tracing::debug!(name, kind = ?kind, count = anchors.len(), "located fields");
        Ok(anchors)
    }
}
