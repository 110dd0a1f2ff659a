//! Custom document properties (`docProps/custom.xml`)

use crate::docx::error::DocxResult;
use crate::docx::package::{DocxPackage, PartKind};
use crate::docx::relationships::TargetMode;
use crate::docx::{content_type_values, namespaces, relationship_types};
use doc_model::NodeId;

const CUSTOM_PART: &str = "docProps/custom.xml";

/// Format id Word uses for user-defined properties
pub const USER_DEFINED_FMTID: &str = "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}";

/// Property ids 0 and 1 are reserved
const FIRST_PID: u32 = 2;

impl DocxPackage {
    fn property_element(&self, name: &str) -> Option<NodeId> {
        let root = self.custom_properties_root()?;
        let tree = self.tree();
        tree.children(root)
            .iter()
            .copied()
            .find(|&child| tree.local_name(child) == Some("property") && tree.attribute(child, "name") == Some(name))
    }

    /// Value of a custom property, if present
    pub fn custom_property(&self, name: &str) -> Option<String> {
        self.property_element(name)
            .map(|property| self.tree().inner_text(property))
    }

    /// Names of all custom properties in document order
    pub fn custom_property_names(&self) -> Vec<String> {
        let Some(root) = self.custom_properties_root() else {
            return Vec::new();
        };
        let tree = self.tree();
        tree.children(root)
            .iter()
            .filter_map(|&child| tree.attribute(child, "name"))
            .map(str::to_string)
            .collect()
    }

    /// Set a custom string property, creating the properties part on first use
    pub fn set_custom_property(&mut self, name: &str, value: &str) -> DocxResult<()> {
        let root = match self.custom_properties_root() {
            Some(root) => root,
            None => self.create_custom_properties_part()?,
        };

        let property = match self.property_element(name) {
            Some(property) => {
                self.tree_mut().remove_children(property)?;
                property
            }
            None => {
                let pid = self.next_property_id(root).to_string();
                let element = qualified(self.tree().name(root).unwrap_or_default(), "property");
                let property = self.tree_mut().create_element_with_attributes(
                    element,
                    &[("fmtid", USER_DEFINED_FMTID), ("pid", pid.as_str()), ("name", name)],
                );
                self.tree_mut().append_child(root, property)?;
                property
            }
        };

        let tree = self.tree_mut();
        let string_value = tree.create_element("vt:lpwstr");
        let text = tree.create_text(value);
        tree.append_child(string_value, text)?;
        tree.append_child(property, string_value)?;
        tracing::debug!(name, "set custom property");
        Ok(())
    }

    fn next_property_id(&self, root: NodeId) -> u32 {
        let tree = self.tree();
        tree.children(root)
            .iter()
            .filter_map(|&child| tree.attribute(child, "pid"))
            .filter_map(|pid| pid.parse::<u32>().ok())
            .max()
            .map_or(FIRST_PID, |max| (max + 1).max(FIRST_PID))
    }

    fn create_custom_properties_part(&mut self) -> DocxResult<NodeId> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>{}<Properties xmlns="{}" xmlns:vt="{}"/>"#,
            "\r\n",
            namespaces::CUSTOM_PROPERTIES,
            namespaces::VT
        );
        let root = self.add_parsed_part(
            CUSTOM_PART,
            PartKind::CustomProperties,
            xml.as_bytes(),
            content_type_values::CUSTOM_PROPERTIES,
        )?;
        self.root_relationships_mut().add(
            relationship_types::CUSTOM_PROPERTIES,
            CUSTOM_PART,
            TargetMode::Internal,
        );
        tracing::debug!("created custom properties part");
        Ok(root)
    }
}

/// `local` with the prefix of `sibling_name`, if it has one
fn qualified(sibling_name: &str, local: &str) -> String {
    match sibling_name.split_once(':') {
        Some((prefix, _)) => format!("{}:{}", prefix, local),
        None => local.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut package = DocxPackage::blank().unwrap();
        assert_eq!(package.custom_property("client"), None);

        package.set_custom_property("client", "Acme").unwrap();
        package.set_custom_property("project", "Bridge").unwrap();
        assert_eq!(package.custom_property("client").as_deref(), Some("Acme"));
        assert_eq!(package.custom_property_names(), vec!["client", "project"]);

        let xml = package.part_xml(CUSTOM_PART).unwrap();
        assert!(xml.contains(r#"pid="2" name="client""#));
        assert!(xml.contains(r#"pid="3" name="project""#));
    }

    #[test]
    fn test_overwrite_keeps_pid() {
        let mut package = DocxPackage::blank().unwrap();
        package.set_custom_property("client", "Acme").unwrap();
        package.set_custom_property("client", "Globex").unwrap();

        assert_eq!(package.custom_property("client").as_deref(), Some("Globex"));
        assert_eq!(package.custom_property_names().len(), 1);
        assert!(package.part_xml(CUSTOM_PART).unwrap().contains(r#"pid="2""#));
    }

    #[test]
    fn test_survives_round_trip() {
        let mut package = DocxPackage::blank().unwrap();
        package.set_custom_property("client", "A & B").unwrap();
        let bytes = package.to_bytes().unwrap();

        let reopened = DocxPackage::open(&bytes).unwrap();
        assert_eq!(reopened.custom_property("client").as_deref(), Some("A & B"));
        assert_eq!(
            reopened.content_types().get_content_type(CUSTOM_PART),
            Some(content_type_values::CUSTOM_PROPERTIES)
        );
    }

    #[test]
    fn test_qualified() {
        assert_eq!(qualified("op:Properties", "property"), "op:property");
        assert_eq!(qualified("Properties", "property"), "property");
    }
}
