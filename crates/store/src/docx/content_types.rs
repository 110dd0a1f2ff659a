//! [Content_Types].xml parsing and generation
//!
//! This file defines the content types for all parts in the DOCX package.

use crate::docx::document_writer::escape_xml_attr;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::namespaces;
use crate::docx::reader::XmlParser;
use quick_xml::events::Event;

/// Represents the content types in a DOCX package.
///
/// Entries keep their source order so that writing an unchanged package
/// reproduces the same part.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    /// Default content types by extension (e.g., "xml" -> "application/xml")
    pub defaults: Vec<(String, String)>,
    /// Override content types by part name (e.g., "/word/document.xml" -> "...")
    pub overrides: Vec<(String, String)>,
}

fn normalize_part_name(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

impl ContentTypes {
    /// Create a new ContentTypes with default DOCX settings
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", crate::docx::content_type_values::RELATIONSHIPS);
        ct.add_default("xml", crate::docx::content_type_values::XML);
        ct
    }

    /// Parse [Content_Types].xml from its content
    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut result = Self::default();
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                    let name = e.name();
                    if XmlParser::matches_element(name.as_ref(), "Default") {
                        if let (Some(ext), Some(ct)) = (
                            XmlParser::get_attribute(e, b"Extension"),
                            XmlParser::get_attribute(e, b"ContentType"),
                        ) {
                            result.defaults.push((ext, ct));
                        }
                    } else if XmlParser::matches_element(name.as_ref(), "Override") {
                        if let (Some(part), Some(ct)) = (
                            XmlParser::get_attribute(e, b"PartName"),
                            XmlParser::get_attribute(e, b"ContentType"),
                        ) {
                            result.overrides.push((part, ct));
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::from(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Get the content type for a given path
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let normalized_path = normalize_part_name(path);
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| p.eq_ignore_ascii_case(&normalized_path)) {
            return Some(ct);
        }

        let ext = path.rsplit_once('.').map(|(_, ext)| ext)?;
        self.defaults
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, ct)| ct.as_str())
    }

    /// Whether a default exists for the extension
    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults.iter().any(|(e, _)| e.eq_ignore_ascii_case(extension))
    }

    /// Add a default for an extension unless one already exists
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        if !self.has_default(extension) {
            self.defaults.push((extension.to_string(), content_type.to_string()));
        }
    }

    /// Add or replace an override for a specific part
    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        let normalized = normalize_part_name(part_name);
        match self.overrides.iter_mut().find(|(p, _)| *p == normalized) {
            Some(existing) => existing.1 = content_type.to_string(),
            None => self.overrides.push((normalized, content_type.to_string())),
        }
    }

    /// Generate XML content for [Content_Types].xml
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, namespaces::CT));

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml_attr(ext),
                escape_xml_attr(ct)
            ));
        }

        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml_attr(part),
                escape_xml_attr(ct)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

/// Map an image MIME type to the file extension used for its part
pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpeg"),
        "image/gif" => Some("gif"),
        "image/bmp" => Some("bmp"),
        "image/tiff" => Some("tiff"),
        "image/x-icon" => Some("ico"),
        "image/x-emf" => Some("emf"),
        "image/x-wmf" => Some("wmf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

    #[test]
    fn test_parse_content_types() {
        let ct = ContentTypes::parse(SAMPLE).unwrap();
        assert_eq!(ct.defaults.len(), 2);
        assert_eq!(ct.overrides.len(), 1);
        assert!(ct.get_content_type("word/document.xml").unwrap().contains("document.main"));
        assert_eq!(ct.get_content_type("word/styles.xml"), Some("application/xml"));
        assert_eq!(ct.get_content_type("word/media/image1.png"), None);
    }

    #[test]
    fn test_order_preserved_in_output() {
        let ct = ContentTypes::parse(SAMPLE).unwrap();
        let xml = ct.to_xml();
        let rels = xml.find(r#"Extension="rels""#).unwrap();
        let xml_ext = xml.find(r#"Extension="xml""#).unwrap();
        assert!(rels < xml_ext);
        assert_eq!(ContentTypes::parse(&xml).unwrap().defaults, ct.defaults);
    }

    #[test]
    fn test_add_default_once() {
        let mut ct = ContentTypes::new();
        ct.add_default("png", "image/png");
        ct.add_default("PNG", "image/png");
        assert_eq!(ct.defaults.len(), 3);
    }

    #[test]
    fn test_add_override_replaces() {
        let mut ct = ContentTypes::new();
        ct.add_override("docProps/custom.xml", "a");
        ct.add_override("/docProps/custom.xml", "b");
        assert_eq!(ct.overrides, vec![("/docProps/custom.xml".to_string(), "b".to_string())]);
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/jpeg"), Some("jpeg"));
        assert_eq!(image_extension("application/pdf"), None);
    }
}
