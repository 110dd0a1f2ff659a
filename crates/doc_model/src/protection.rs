//! Document Protection Module
//!
//! Editable ranges (`w:permStart` / `w:permEnd`) and the document-level
//! editing restriction stored in the settings part.

use crate::{DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

/// Type of document protection (`w:documentProtection/@w:edit`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtectionType {
    /// No protection applied
    #[default]
    None,
    /// Document is read-only outside editable ranges
    ReadOnly,
    /// Only form fields / content controls can be edited
    FormFieldsOnly,
    /// Only comments can be added
    CommentsOnly,
    /// All changes are tracked
    TrackedChangesOnly,
}

impl ProtectionType {
    /// Get the OOXML attribute value for this protection type
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            ProtectionType::None => "none",
            ProtectionType::ReadOnly => "readOnly",
            ProtectionType::FormFieldsOnly => "forms",
            ProtectionType::CommentsOnly => "comments",
            ProtectionType::TrackedChangesOnly => "trackedChanges",
        }
    }

    /// Parse from OOXML attribute value
    pub fn from_ooxml(value: &str) -> Self {
        match value {
            "readOnly" => ProtectionType::ReadOnly,
            "forms" => ProtectionType::FormFieldsOnly,
            "comments" => ProtectionType::CommentsOnly,
            "trackedChanges" => ProtectionType::TrackedChangesOnly,
            _ => ProtectionType::None,
        }
    }
}

/// Who may edit a permission range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorGroup {
    #[default]
    Everyone,
    Editors,
    Owners,
    Current,
}

impl EditorGroup {
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            EditorGroup::Everyone => "everyone",
            EditorGroup::Editors => "editors",
            EditorGroup::Owners => "owners",
            EditorGroup::Current => "current",
        }
    }
}

/// `w:settings` children that follow `w:documentProtection` in schema order
const AFTER_PROTECTION: &[&str] = &[
    "autoFormatOverride",
    "styleLockTheme",
    "styleLockQFSet",
    "defaultTabStop",
    "autoHyphenation",
    "consecutiveHyphenLimit",
    "hyphenationZone",
    "doNotHyphenateCaps",
    "evenAndOddHeaders",
    "drawingGridHorizontalSpacing",
    "drawingGridVerticalSpacing",
    "displayHorizontalDrawingGridEvery",
    "displayVerticalDrawingGridEvery",
    "characterSpacingControl",
    "updateFields",
    "hdrShapeDefaults",
    "footnotePr",
    "endnotePr",
    "compat",
    "docVars",
    "rsids",
    "mathPr",
    "themeFontLang",
    "clrSchemeMapping",
    "shapeDefaults",
    "decimalSymbol",
    "listSeparator",
];

impl DocumentTree {
    /// Create a detached `w:permStart`
    pub fn create_permission_start(&mut self, id: u32, group: EditorGroup) -> NodeId {
        let id = id.to_string();
        self.create_element_with_attributes(
            "w:permStart",
            &[("w:id", id.as_str()), ("w:edGrp", group.ooxml_value())],
        )
    }

    /// Create a detached `w:permEnd`
    pub fn create_permission_end(&mut self, id: u32) -> NodeId {
        let id = id.to_string();
        self.create_element_with_attributes("w:permEnd", &[("w:id", id.as_str())])
    }

    /// Numeric ids of every `w:permStart` under `root`; unparsable ids are skipped
    pub fn permission_start_ids(&self, root: NodeId) -> Vec<u32> {
        self.descendants_of_type(root, NodeType::PermissionStart)
            .into_iter()
            .filter_map(|id| self.attribute(id, "id"))
            .filter_map(|value| value.parse().ok())
            .collect()
    }

    /// `w:documentProtection` inside a settings root
    pub fn document_protection(&self, settings: NodeId) -> Option<NodeId> {
        self.first_child_of_type(settings, NodeType::DocumentProtection)
    }

    /// Current edit restriction declared by a settings root
    pub fn protection_type(&self, settings: NodeId) -> ProtectionType {
        self.document_protection(settings)
            .and_then(|p| self.attribute(p, "edit"))
            .map(ProtectionType::from_ooxml)
            .unwrap_or_default()
    }

    /// Set the edit restriction, adding an enforced `w:documentProtection` when missing
    pub fn set_protection_type(&mut self, settings: NodeId, protection: ProtectionType) -> Result<()> {
        let element = match self.document_protection(settings) {
            Some(existing) => existing,
            None => {
                let created = self.create_element_with_attributes("w:documentProtection", &[("w:enforcement", "1")]);
                let successor = self
                    .children(settings)
                    .iter()
                    .copied()
                    .find(|&child| self.local_name(child).is_some_and(|l| AFTER_PROTECTION.contains(&l)));
                match successor {
                    Some(next) => self.insert_before(next, created)?,
                    None => self.append_child(settings, created)?,
                }
                created
            }
        };
        self.set_attribute(element, "w:edit", protection.ooxml_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_markers() {
        let mut tree = DocumentTree::new();
        let start = tree.create_permission_start(7, EditorGroup::Everyone);
        let end = tree.create_permission_end(7);
        assert_eq!(tree.attribute(start, "id"), Some("7"));
        assert_eq!(tree.attribute(start, "edGrp"), Some("everyone"));
        assert_eq!(tree.attribute(end, "id"), Some("7"));
    }

    #[test]
    fn test_permission_start_ids() {
        let mut tree = DocumentTree::new();
        let body = tree.create_element("w:body");
        for id in [1, 3, 5] {
            let start = tree.create_permission_start(id, EditorGroup::Everyone);
            tree.append_child(body, start).unwrap();
        }
        let broken = tree.create_element_with_attributes("w:permStart", &[("w:id", "x")]);
        tree.append_child(body, broken).unwrap();
        assert_eq!(tree.permission_start_ids(body), vec![1, 3, 5]);
    }

    #[test]
    fn test_protection_round_trip() {
        let mut tree = DocumentTree::new();
        let settings = tree.create_element("w:settings");
        assert_eq!(tree.protection_type(settings), ProtectionType::None);

        tree.set_protection_type(settings, ProtectionType::ReadOnly).unwrap();
        assert_eq!(tree.protection_type(settings), ProtectionType::ReadOnly);

        tree.set_protection_type(settings, ProtectionType::None).unwrap();
        let protection = tree.document_protection(settings).unwrap();
        assert_eq!(tree.attribute(protection, "edit"), Some("none"));
        assert_eq!(tree.children_of_type(settings, NodeType::DocumentProtection).len(), 1);
    }

    #[test]
    fn test_protection_precedes_later_settings() {
        let mut tree = DocumentTree::new();
        let settings = tree.create_element("w:settings");
        let zoom = tree.create_element("w:zoom");
        let tab_stop = tree.create_element("w:defaultTabStop");
        tree.append_children(settings, &[zoom, tab_stop]).unwrap();

        tree.set_protection_type(settings, ProtectionType::ReadOnly).unwrap();
        let names: Vec<&str> = tree
            .children(settings)
            .iter()
            .filter_map(|&c| tree.local_name(c))
            .collect();
        assert_eq!(names, vec!["zoom", "documentProtection", "defaultTabStop"]);
    }
}
