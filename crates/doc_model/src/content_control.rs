//! Content controls (`w:sdt`)

use crate::{DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

/// Where a content control sits in the content model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentControlKind {
    /// Holds paragraphs and tables
    Block,
    /// Holds runs inside a paragraph
    Inline,
    /// Wraps table rows or cells
    Row,
}

impl DocumentTree {
    /// `w:sdtPr` of a content control
    pub fn content_control_properties(&self, sdt: NodeId) -> Option<NodeId> {
        self.first_child_of_type(sdt, NodeType::ContentControlProperties)
    }

    /// `w:sdtContent` of a content control
    pub fn content_control_content(&self, sdt: NodeId) -> Option<NodeId> {
        self.first_child_of_type(sdt, NodeType::ContentControlContent)
    }

    fn content_control_value(&self, sdt: NodeId, local: &str) -> Option<&str> {
        let properties = self.content_control_properties(sdt)?;
        let element = self.first_child_named(properties, local)?;
        self.attribute(element, "val")
    }

    /// `w:sdtPr/w:alias/@w:val`
    pub fn content_control_alias(&self, sdt: NodeId) -> Option<&str> {
        self.content_control_value(sdt, "alias")
    }

    /// `w:sdtPr/w:tag/@w:val`
    pub fn content_control_tag(&self, sdt: NodeId) -> Option<&str> {
        self.content_control_value(sdt, "tag")
    }

    /// Classify a content control by its container
    pub fn content_control_kind(&self, sdt: NodeId) -> ContentControlKind {
        for ancestor in self.ancestors(sdt) {
            match self.node_type(ancestor) {
                Some(NodeType::Paragraph) => return ContentControlKind::Inline,
                Some(NodeType::TableRow) | Some(NodeType::Table)
                    if self.parent(sdt) == Some(ancestor) =>
                {
                    return ContentControlKind::Row
                }
                _ => {}
            }
        }
        ContentControlKind::Block
    }

    /// Create a detached content control with alias and tag metadata
    pub fn create_content_control(&mut self, alias: Option<&str>, tag: Option<&str>) -> Result<NodeId> {
        let sdt = self.create_typed(NodeType::ContentControl)?;
        let properties = self.create_typed(NodeType::ContentControlProperties)?;
        if let Some(alias) = alias {
            let element = self.create_element_with_attributes("w:alias", &[("w:val", alias)]);
            self.append_child(properties, element)?;
        }
        if let Some(tag) = tag {
            let element = self.create_element_with_attributes("w:tag", &[("w:val", tag)]);
            self.append_child(properties, element)?;
        }
        let content = self.create_typed(NodeType::ContentControlContent)?;
        self.append_children(sdt, &[properties, content])?;
        Ok(sdt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_lookup() {
        let mut tree = DocumentTree::new();
        let sdt = tree.create_content_control(Some("Name"), Some("name-tag")).unwrap();
        assert_eq!(tree.content_control_alias(sdt), Some("Name"));
        assert_eq!(tree.content_control_tag(sdt), Some("name-tag"));
        assert!(tree.content_control_content(sdt).is_some());
    }

    #[test]
    fn test_missing_alias() {
        let mut tree = DocumentTree::new();
        let sdt = tree.create_content_control(None, Some("only-tag")).unwrap();
        assert_eq!(tree.content_control_alias(sdt), None);
    }

    #[test]
    fn test_kind_by_container() {
        let mut tree = DocumentTree::new();
        let body = tree.create_element("w:body");
        let block = tree.create_content_control(Some("b"), None).unwrap();
        tree.append_child(body, block).unwrap();

        let paragraph = tree.create_paragraph().unwrap();
        let inline = tree.create_content_control(Some("i"), None).unwrap();
        tree.append_child(paragraph, inline).unwrap();
        tree.append_child(body, paragraph).unwrap();

        let table = tree.create_table(crate::TableBorderStyle::Thick).unwrap();
        let row = tree.create_content_control(Some("r"), None).unwrap();
        tree.append_child(table, row).unwrap();
        tree.append_child(body, table).unwrap();

        assert_eq!(tree.content_control_kind(block), ContentControlKind::Block);
        assert_eq!(tree.content_control_kind(inline), ContentControlKind::Inline);
        assert_eq!(tree.content_control_kind(row), ContentControlKind::Row);
    }

    #[test]
    fn test_block_control_inside_cell_is_block() {
        let mut tree = DocumentTree::new();
        let cell = tree.create_table_cell(None).unwrap();
        let sdt = tree.create_content_control(Some("c"), None).unwrap();
        tree.append_child(cell, sdt).unwrap();
        assert_eq!(tree.content_control_kind(sdt), ContentControlKind::Block);
    }
}
