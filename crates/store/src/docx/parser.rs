//! XML part parsing into the shared node tree
//!
//! Every element, attribute and comment is kept as written. Whitespace-only
//! text is kept only where it is character data (`w:t` and friends); the
//! indentation between elements is dropped.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::{strip_bom, XmlParser};
use doc_model::{local_name, DocumentTree, NodeId};
use quick_xml::events::{BytesStart, Event};

/// Elements whose whitespace-only content is significant
const SPACE_SIGNIFICANT: &[&str] = &["t", "instrText", "delText", "delInstrText"];

/// Result of parsing one XML part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPart {
    /// Root element of the part
    pub root: NodeId,
    /// Whether the source carried an XML declaration
    pub has_declaration: bool,
}

/// Parser for XML parts of a package
pub struct XmlPartParser;

impl XmlPartParser {
    /// Parse `content` and attach it to `tree` as a new detached root
    pub fn parse(tree: &mut DocumentTree, content: &[u8]) -> DocxResult<ParsedPart> {
        let mut reader = XmlParser::preserving(strip_bom(content));
        let mut buf = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut has_declaration = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Decl(_) => has_declaration = true,
                Event::Start(ref e) => {
                    let element = Self::create_element(tree, e)?;
                    Self::attach(tree, &stack, &mut root, element)?;
                    stack.push(element);
                }
                Event::Empty(ref e) => {
                    let element = Self::create_element(tree, e)?;
                    Self::attach(tree, &stack, &mut root, element)?;
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Text(ref e) => {
                    let Some(parent) = stack.last().copied() else {
                        continue;
                    };
                    let text = e.unescape()?;
                    if text.is_empty() {
                        continue;
                    }
                    let keep_whitespace = tree
                        .local_name(parent)
                        .is_some_and(|name| SPACE_SIGNIFICANT.contains(&name));
                    if text.trim().is_empty() && !keep_whitespace {
                        continue;
                    }
                    let node = tree.create_text(text.into_owned());
                    tree.append_child(parent, node)?;
                }
                Event::CData(ref e) => {
                    if let Some(parent) = stack.last().copied() {
                        let node = tree.create_text(String::from_utf8_lossy(e).into_owned());
                        tree.append_child(parent, node)?;
                    }
                }
                Event::Comment(ref e) => {
                    if let Some(parent) = stack.last().copied() {
                        let node = tree.create_comment(String::from_utf8_lossy(e).into_owned());
                        tree.append_child(parent, node)?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(DocxError::Xml("unexpected end of document".to_string()));
        }
        let root = root.ok_or_else(|| DocxError::Xml("document has no root element".to_string()))?;
        Ok(ParsedPart { root, has_declaration })
    }

    fn create_element(tree: &mut DocumentTree, e: &BytesStart) -> DocxResult<NodeId> {
        let name = String::from_utf8(e.name().as_ref().to_vec())?;
        let element = tree.create_element(name);
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = attr.unescape_value()?;
            tree.set_attribute(element, &key, value.into_owned())?;
        }
        Ok(element)
    }

    fn attach(
        tree: &mut DocumentTree,
        stack: &[NodeId],
        root: &mut Option<NodeId>,
        element: NodeId,
    ) -> DocxResult<()> {
        match stack.last() {
            Some(parent) => tree.append_child(*parent, element)?,
            None if root.is_none() => *root = Some(element),
            None => {
                return Err(DocxError::Xml(format!(
                    "second root element {}",
                    tree.name(element).map(local_name).unwrap_or_default()
                )))
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::NodeType;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p>
      <w:r><w:t xml:space="preserve"> </w:t></w:r>
      <w:r><w:t>A &amp; B</w:t></w:r>
    </w:p>
    <!-- note -->
  </w:body>
</w:document>"#;

    #[test]
    fn test_parse_structure() {
        let mut tree = DocumentTree::new();
        let parsed = XmlPartParser::parse(&mut tree, DOC.as_bytes()).unwrap();

        assert!(parsed.has_declaration);
        assert_eq!(tree.name(parsed.root), Some("w:document"));
        let paragraphs = tree.descendants_of_type(parsed.root, NodeType::Paragraph);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(tree.inner_text(paragraphs[0]), " A & B");
        assert_eq!(tree.children(paragraphs[0]).len(), 2);
    }

    #[test]
    fn test_namespace_declarations_kept() {
        let mut tree = DocumentTree::new();
        let parsed = XmlPartParser::parse(&mut tree, DOC.as_bytes()).unwrap();
        assert!(tree.get(parsed.root).unwrap().attributes().iter().any(|a| a.name == "xmlns:w"));
    }

    #[test]
    fn test_comment_kept() {
        let mut tree = DocumentTree::new();
        let parsed = XmlPartParser::parse(&mut tree, DOC.as_bytes()).unwrap();
        let body = tree.first_child_of_type(parsed.root, NodeType::Body).unwrap();
        let last = *tree.children(body).last().unwrap();
        assert!(matches!(tree.get(last).unwrap().content(), doc_model::NodeContent::Comment(_)));
    }

    #[test]
    fn test_unclosed_document_fails() {
        let mut tree = DocumentTree::new();
        assert!(XmlPartParser::parse(&mut tree, b"<w:document><w:body>").is_err());
    }

    #[test]
    fn test_empty_document_fails() {
        let mut tree = DocumentTree::new();
        assert!(XmlPartParser::parse(&mut tree, b"").is_err());
    }
}
