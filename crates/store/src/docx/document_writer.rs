//! XML part writer
//!
//! Serializes a subtree of the node tree back to XML text.

use doc_model::{DocumentTree, NodeContent, NodeId};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Writer for XML parts held in the node tree
#[derive(Debug, Default)]
pub struct DocumentWriter {
    xml: String,
}

impl DocumentWriter {
    /// Create a new document writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a part root, optionally preceded by the standard declaration
    pub fn write(mut self, tree: &DocumentTree, root: NodeId, with_declaration: bool) -> String {
        if with_declaration {
            self.xml.push_str(DECLARATION);
            self.xml.push_str("\r\n");
        }
        self.write_node(tree, root);
        self.xml
    }

    /// Serialize a single subtree without a declaration
    pub fn write_fragment(tree: &DocumentTree, node: NodeId) -> String {
        Self::new().write(tree, node, false)
    }

    fn write_node(&mut self, tree: &DocumentTree, id: NodeId) {
        let Some(node) = tree.get(id) else {
            return;
        };
        match node.content() {
            NodeContent::Element { name, attributes } => {
                self.xml.push('<');
                self.xml.push_str(name);
                for attribute in attributes {
                    self.xml.push(' ');
                    self.xml.push_str(&attribute.name);
                    self.xml.push_str("=\"");
                    self.xml.push_str(&escape_xml_attr(&attribute.value));
                    self.xml.push('"');
                }
                if node.children().is_empty() {
                    self.xml.push_str("/>");
                    return;
                }
                self.xml.push('>');
                for child in node.children() {
                    self.write_node(tree, *child);
                }
                self.xml.push_str("</");
                self.xml.push_str(name);
                self.xml.push('>');
            }
            NodeContent::Text(text) => self.xml.push_str(&escape_xml(text)),
            NodeContent::Comment(text) => {
                self.xml.push_str("<!--");
                self.xml.push_str(text);
                self.xml.push_str("-->");
            }
        }
    }
}

/// Escape XML text content
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape XML attribute value
pub fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::parser::XmlPartParser;

    #[test]
    fn test_write_elements_and_text() {
        let mut tree = DocumentTree::new();
        let p = tree.create_element("w:p");
        let run = tree.create_text_run("a < b & \"c\"", None).unwrap();
        tree.append_child(p, run).unwrap();
        let empty = tree.create_element("w:r");
        tree.append_child(p, empty).unwrap();

        let xml = DocumentWriter::write_fragment(&tree, p);
        assert_eq!(
            xml,
            r#"<w:p><w:r><w:t xml:space="preserve">a &lt; b &amp; "c"</w:t></w:r><w:r/></w:p>"#
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let mut tree = DocumentTree::new();
        let alias = tree.create_element_with_attributes("w:alias", &[("w:val", "say \"hi\" & <bye>")]);
        assert_eq!(
            DocumentWriter::write_fragment(&tree, alias),
            r#"<w:alias w:val="say &quot;hi&quot; &amp; &lt;bye&gt;"/>"#
        );
    }

    #[test]
    fn test_parse_write_is_stable() {
        let source = concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\r\n",
            r#"<w:document xmlns:w="urn:w"><w:body><w:p><w:pPr><w:jc w:val="center"/></w:pPr>"#,
            r#"<w:r><w:t xml:space="preserve"> x </w:t></w:r></w:p><!-- c --></w:body></w:document>"#
        );
        let mut tree = DocumentTree::new();
        let parsed = XmlPartParser::parse(&mut tree, source.as_bytes()).unwrap();
        let written = DocumentWriter::new().write(&tree, parsed.root, parsed.has_declaration);
        assert_eq!(written, source);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn run_text_survives_write_and_parse(text in "[ -~\u{e0}\u{e9}\u{20ac}]{0,24}") {
                let mut tree = DocumentTree::new();
                let p = tree.create_element("w:p");
                let run = tree.create_text_run(&text, None).unwrap();
                tree.append_child(p, run).unwrap();
                let xml = DocumentWriter::write_fragment(&tree, p);

                let mut reparsed = DocumentTree::new();
                let parsed = XmlPartParser::parse(&mut reparsed, xml.as_bytes()).unwrap();
                prop_assert_eq!(reparsed.inner_text(parsed.root), text);
            }
        }
    }
}
