//! Structural validation of WordprocessingML content
//!
//! This is not an XSD validator. It checks the content-model rules that the
//! engine's edits can break: property containers in first position, schema
//! order inside `w:pPr`/`w:rPr`/`w:tblPr`, required attributes, and which
//! containers may hold paragraphs, runs, rows and cells. Elements the
//! validator does not know are accepted as they are.

use crate::{property_order, DocumentTree, NodeContent, NodeId, NodeType};
use serde::{Deserialize, Serialize};

/// A single structural problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub node: NodeId,
    /// Qualified name of the offending element
    pub element: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.element, self.node, self.message)
    }
}

/// (element, property container that must come first)
const LEADING_PROPERTIES: &[(NodeType, NodeType)] = &[
    (NodeType::Paragraph, NodeType::ParagraphProperties),
    (NodeType::Run, NodeType::RunProperties),
    (NodeType::Table, NodeType::TableProperties),
    (NodeType::TableCell, NodeType::TableCellProperties),
    (NodeType::ContentControl, NodeType::ContentControlProperties),
];

/// (element local name, required attribute local name)
const REQUIRED_ATTRIBUTES: &[(&str, &str)] = &[
    ("permStart", "id"),
    ("permEnd", "id"),
    ("numId", "val"),
    ("ilvl", "val"),
    ("jc", "val"),
    ("alias", "val"),
    ("tag", "val"),
];

/// Elements whose direct text content is character data
const TEXT_BEARING: &[&str] = &["t", "instrText", "delText", "delInstrText"];

/// Validate every element under `root`, `root` included
pub fn validate(tree: &DocumentTree, root: NodeId) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_node(tree, root, &mut errors);
    for id in tree.descendants(root) {
        check_node(tree, id, &mut errors);
    }
    errors
}

fn error(tree: &DocumentTree, node: NodeId, message: impl Into<String>) -> ValidationError {
    ValidationError {
        node,
        element: tree.name(node).unwrap_or("#text").to_string(),
        message: message.into(),
    }
}

fn check_node(tree: &DocumentTree, id: NodeId, errors: &mut Vec<ValidationError>) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match node.content() {
        NodeContent::Element { .. } => {}
        NodeContent::Text(text) => {
            let parent_local = tree.parent(id).and_then(|p| tree.local_name(p));
            let in_text_element = parent_local.is_some_and(|p| TEXT_BEARING.contains(&p));
            if !in_text_element && !text.trim().is_empty() && tree.parent(id).is_some_and(|p| is_word_element(tree, p)) {
                errors.push(error(tree, id, "character data outside a text element"));
            }
            return;
        }
        NodeContent::Comment(_) => return,
    }

    let Some(local) = node.local_name() else {
        return;
    };
    let node_type = NodeType::from_local_name(local);

    check_leading_properties(tree, id, node_type, errors);
    check_property_order(tree, id, local, errors);
    check_required_attributes(tree, id, local, errors);
    check_placement(tree, id, node_type, errors);
}

/// Only `w:`-prefixed content follows the WordprocessingML content model
fn is_word_element(tree: &DocumentTree, id: NodeId) -> bool {
    tree.name(id).is_some_and(|n| n.starts_with("w:"))
}

fn check_leading_properties(
    tree: &DocumentTree,
    id: NodeId,
    node_type: NodeType,
    errors: &mut Vec<ValidationError>,
) {
    let Some((_, properties)) = LEADING_PROPERTIES.iter().find(|(owner, _)| *owner == node_type) else {
        return;
    };
    let children = tree.children(id);
    let positions: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, c)| tree.is(**c, *properties))
        .map(|(i, _)| i)
        .collect();
    if positions.len() > 1 {
        errors.push(error(tree, id, format!("more than one {:?}", properties)));
    }
    if positions.first().is_some_and(|p| *p != 0) {
        errors.push(error(tree, id, format!("{:?} must be the first child", properties)));
    }
}

fn check_property_order(tree: &DocumentTree, id: NodeId, local: &str, errors: &mut Vec<ValidationError>) {
    let Some(order) = property_order(local) else {
        return;
    };
    let mut last_rank = 0;
    for child in tree.children(id) {
        let Some(child_local) = tree.local_name(*child) else {
            continue;
        };
        let Some(rank) = order.iter().position(|n| *n == child_local) else {
            continue;
        };
        if rank < last_rank {
            errors.push(error(
                tree,
                *child,
                format!("out of schema order inside {}", local),
            ));
        }
        last_rank = last_rank.max(rank);
    }
}

fn check_required_attributes(tree: &DocumentTree, id: NodeId, local: &str, errors: &mut Vec<ValidationError>) {
    if !is_word_element(tree, id) {
        return;
    }
    for (element, attribute) in REQUIRED_ATTRIBUTES {
        if *element == local && tree.attribute(id, attribute).is_none() {
            errors.push(error(tree, id, format!("missing required attribute {}", attribute)));
        }
    }
}

fn check_placement(tree: &DocumentTree, id: NodeId, node_type: NodeType, errors: &mut Vec<ValidationError>) {
    let Some(parent) = tree.parent(id) else {
        return;
    };
    let parent_type = tree.node_type(parent).unwrap_or(NodeType::Other);
    let block_container = matches!(
        parent_type,
        NodeType::Body | NodeType::TableCell | NodeType::Header | NodeType::Footer
    );

    match node_type {
        NodeType::Paragraph | NodeType::Table => {
            if matches!(parent_type, NodeType::Run | NodeType::Paragraph | NodeType::TableRow) {
                errors.push(error(tree, id, "block content inside inline content"));
            }
        }
        NodeType::Run => {
            if block_container || matches!(parent_type, NodeType::Table | NodeType::TableRow) {
                errors.push(error(tree, id, "run outside a paragraph"));
            }
        }
        NodeType::TableRow => {
            if !matches!(parent_type, NodeType::Table | NodeType::ContentControlContent | NodeType::Other) {
                errors.push(error(tree, id, "table row outside a table"));
            }
        }
        NodeType::TableCell => {
            if !matches!(parent_type, NodeType::TableRow | NodeType::ContentControlContent | NodeType::Other) {
                errors.push(error(tree, id, "table cell outside a row"));
            }
        }
        NodeType::Text | NodeType::Break | NodeType::Tab => {
            if block_container || parent_type == NodeType::Paragraph {
                errors.push(error(tree, id, "run content outside a run"));
            }
        }
        _ => {}
    }
}
