//! Minimal package contents for new documents

use crate::docx::content_type_values;
use crate::docx::content_types::ContentTypes;
use crate::docx::relationships::{Relationships, TargetMode};
use crate::docx::{namespaces, relationship_types};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Main document XML around the given body content. A section properties
/// element closes the body.
pub fn document_xml(body_content: &str) -> String {
    format!(
        concat!(
            "{decl}\r\n",
            r#"<w:document xmlns:w="{w}" xmlns:r="{r}">"#,
            "<w:body>{body}",
            r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#,
            "</w:sectPr></w:body></w:document>"
        ),
        decl = DECLARATION,
        w = namespaces::W,
        r = namespaces::R,
        body = body_content
    )
}

fn settings_xml() -> String {
    format!(
        r#"{}{}<w:settings xmlns:w="{}"><w:defaultTabStop w:val="708"/><w:compat/></w:settings>"#,
        DECLARATION,
        "\r\n",
        namespaces::W
    )
}

/// Parts of a minimal package holding `document_xml` as its main document,
/// in archive order
pub fn minimal_parts(document_xml: &str) -> Vec<(String, Vec<u8>)> {
    let mut content_types = ContentTypes::new();
    content_types.add_override("/word/document.xml", content_type_values::DOCUMENT);
    content_types.add_override("/word/settings.xml", content_type_values::SETTINGS);

    let mut root_rels = Relationships::new();
    root_rels.add(relationship_types::DOCUMENT, "word/document.xml", TargetMode::Internal);

    let mut document_rels = Relationships::new();
    document_rels.add(relationship_types::SETTINGS, "settings.xml", TargetMode::Internal);

    vec![
        ("[Content_Types].xml".to_string(), content_types.to_xml().into_bytes()),
        ("_rels/.rels".to_string(), root_rels.to_xml().into_bytes()),
        ("word/document.xml".to_string(), document_xml.as_bytes().to_vec()),
        ("word/_rels/document.xml.rels".to_string(), document_rels.to_xml().into_bytes()),
        ("word/settings.xml".to_string(), settings_xml().into_bytes()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_xml_wraps_body() {
        let xml = document_xml("<w:p/>");
        assert!(xml.starts_with(DECLARATION));
        assert!(xml.contains("<w:body><w:p/><w:sectPr>"));
    }

    #[test]
    fn test_minimal_parts_names() {
        let names: Vec<String> = minimal_parts(&document_xml(""))
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names[0], "[Content_Types].xml");
        assert!(names.contains(&"word/settings.xml".to_string()));
    }
}
