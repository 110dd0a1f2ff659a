//! Anchor names and markers
//!
//! Tags are block anchors: a `{name}` paragraph and a `{/name}` paragraph.
//! Placeholders are inline anchors: hidden `{{name}}` and `{{/name}}` runs.
//! Fields are content controls matched by their alias.

use doc_model::{ContentControlKind, DocumentTree, NodeId, NodeType, Result};

/// Literal anchor syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// `{name}` / `{/name}` paragraphs
    Tag,
    /// `{{name}}` / `{{/name}}` hidden runs
    Placeholder,
}

/// A parsed marker text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    Opening(&'a str),
    Closing(&'a str),
}

impl AnchorKind {
    fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            AnchorKind::Tag => ("{", "}"),
            AnchorKind::Placeholder => ("{{", "}}"),
        }
    }

    /// Opening marker text for `name`
    pub fn opening(&self, name: &str) -> String {
        let (open, close) = self.delimiters();
        format!("{}{}{}", open, name, close)
    }

    /// Closing marker text for `name`
    pub fn closing(&self, name: &str) -> String {
        let (open, close) = self.delimiters();
        format!("{}/{}{}", open, name, close)
    }

    /// Parse marker text back into a name
    pub fn parse<'a>(&self, text: &'a str) -> Option<Marker<'a>> {
        let (open, close) = self.delimiters();
        let inner = text.strip_prefix(open)?.strip_suffix(close)?;
        if inner.starts_with('{') || inner.ends_with('}') {
            return None;
        }
        match inner.strip_prefix('/') {
            Some(name) if !name.is_empty() => Some(Marker::Closing(name)),
            Some(_) => None,
            None if !inner.is_empty() => Some(Marker::Opening(inner)),
            None => None,
        }
    }

    /// Element type carrying the marker text
    pub fn element_type(&self) -> NodeType {
        match self {
            AnchorKind::Tag => NodeType::Paragraph,
            AnchorKind::Placeholder => NodeType::Run,
        }
    }

    /// Create a detached hidden marker element holding `text`.
    ///
    /// Tag markers are paragraphs whose mark and run are both vanished;
    /// placeholder markers are vanished runs.
    pub fn create_marker(&self, tree: &mut DocumentTree, text: &str) -> Result<NodeId> {
        let run_properties = tree.create_typed(NodeType::RunProperties)?;
        tree.set_vanish(run_properties, true)?;
        let run = tree.create_text_run(text, Some(run_properties))?;
        match self {
            AnchorKind::Placeholder => Ok(run),
            AnchorKind::Tag => {
                let paragraph = tree.create_paragraph()?;
                let mark = tree.ensure_mark_run_properties(paragraph)?;
                tree.set_vanish(mark, true)?;
                tree.append_child(paragraph, run)?;
                Ok(paragraph)
            }
        }
    }

    /// Create a detached opening/closing marker pair for `name`
    pub fn create_markers(&self, tree: &mut DocumentTree, name: &str) -> Result<(NodeId, NodeId)> {
        let opening = self.create_marker(tree, &self.opening(name))?;
        let closing = self.create_marker(tree, &self.closing(name))?;
        Ok((opening, closing))
    }
}

/// A located tag or placeholder occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub kind: AnchorKind,
    pub name: String,
    pub opening: NodeId,
    pub closing: NodeId,
}

impl Anchor {
    /// Remove both markers, leaving whatever sits between them in place
    pub fn remove(&self, tree: &mut DocumentTree) -> Result<()> {
        tree.remove(self.opening)?;
        tree.remove(self.closing)
    }

    /// Remove every sibling between the markers.
    ///
    /// Nothing is removed when the closing marker is not a following
    /// sibling of the opening one, e.g. a placeholder spanning paragraphs.
    pub fn clear(&self, tree: &mut DocumentTree) -> Result<usize> {
        match tree.remove_between(self.opening, self.closing)? {
            Some(removed) => Ok(removed),
            None => {
                tracing::warn!(
                    anchor = %self.kind.opening(&self.name),
                    "closing marker is not a following sibling, content left in place"
                );
                Ok(0)
            }
        }
    }
}

/// A located content-control field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAnchor {
    pub name: String,
    /// The `w:sdt` element; it acts as both opening and closing
    pub element: NodeId,
    /// The `w:sdtContent` wrapper receiving generated content
    pub content: NodeId,
    pub kind: ContentControlKind,
    /// Detached copy of the first `w:pPr` found inside the field
    pub paragraph_properties: Option<NodeId>,
    /// Detached copy of the first `w:rPr` found inside the field
    pub run_properties: Option<NodeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_text() {
        assert_eq!(AnchorKind::Tag.opening("MAIN"), "{MAIN}");
        assert_eq!(AnchorKind::Tag.closing("MAIN"), "{/MAIN}");
        assert_eq!(AnchorKind::Placeholder.opening("TITLE"), "{{TITLE}}");
        assert_eq!(AnchorKind::Placeholder.closing("TITLE"), "{{/TITLE}}");
    }

    #[test]
    fn test_parse() {
        assert_eq!(AnchorKind::Tag.parse("{MAIN}"), Some(Marker::Opening("MAIN")));
        assert_eq!(AnchorKind::Tag.parse("{/MAIN}"), Some(Marker::Closing("MAIN")));
        assert_eq!(AnchorKind::Placeholder.parse("{{/T}}"), Some(Marker::Closing("T")));
        assert_eq!(AnchorKind::Tag.parse("{{TITLE}}"), None);
        assert_eq!(AnchorKind::Placeholder.parse("{MAIN}"), None);
        assert_eq!(AnchorKind::Tag.parse("{}"), None);
        assert_eq!(AnchorKind::Tag.parse("{/}"), None);
        assert_eq!(AnchorKind::Tag.parse("MAIN"), None);
    }

    #[test]
    fn test_tag_marker_shape() {
        let mut tree = DocumentTree::new();
        let (opening, closing) = AnchorKind::Tag.create_markers(&mut tree, "MAIN").unwrap();

        assert!(tree.is(opening, NodeType::Paragraph));
        assert_eq!(tree.inner_text(opening), "{MAIN}");
        assert_eq!(tree.inner_text(closing), "{/MAIN}");

        let ppr = tree.paragraph_properties(opening).unwrap();
        let mark = tree.mark_run_properties(ppr).unwrap();
        assert!(tree.has_vanish(mark));
        let run = tree.first_child_of_type(opening, NodeType::Run).unwrap();
        assert!(tree.is_run_hidden(run));
    }

    #[test]
    fn test_placeholder_marker_is_hidden_run() {
        let mut tree = DocumentTree::new();
        let marker = AnchorKind::Placeholder.create_marker(&mut tree, "{{X}}").unwrap();
        assert!(tree.is(marker, NodeType::Run));
        assert!(tree.is_run_hidden(marker));
    }

    #[test]
    fn test_clear_and_remove() {
        let mut tree = DocumentTree::new();
        let body = tree.create_typed(NodeType::Body).unwrap();
        let (opening, closing) = AnchorKind::Tag.create_markers(&mut tree, "A").unwrap();
        let inner = tree.create_text_paragraph("inner").unwrap();
        tree.append_children(body, &[opening, inner, closing]).unwrap();

        let anchor = Anchor { kind: AnchorKind::Tag, name: "A".into(), opening, closing };
        assert_eq!(anchor.clear(&mut tree).unwrap(), 1);
        assert_eq!(tree.children(body), &[opening, closing]);

        anchor.remove(&mut tree).unwrap();
        assert!(tree.children(body).is_empty());
    }

    #[test]
    fn test_clear_keeps_content_across_paragraphs() {
        let mut tree = DocumentTree::new();
        let body = tree.create_typed(NodeType::Body).unwrap();
        let first = tree.create_paragraph().unwrap();
        let second = tree.create_paragraph().unwrap();
        let opening = AnchorKind::Placeholder.create_marker(&mut tree, "{{A}}").unwrap();
        let kept = tree.create_text_run("keep", None).unwrap();
        let closing = AnchorKind::Placeholder.create_marker(&mut tree, "{{/A}}").unwrap();
        let after = tree.create_text_run("after", None).unwrap();
        tree.append_children(first, &[opening, kept]).unwrap();
        tree.append_children(second, &[closing, after]).unwrap();
        tree.append_children(body, &[first, second]).unwrap();

        let anchor = Anchor { kind: AnchorKind::Placeholder, name: "A".into(), opening, closing };
        assert_eq!(anchor.clear(&mut tree).unwrap(), 0);
        assert_eq!(tree.children(first), &[opening, kept]);
        assert_eq!(tree.children(second), &[closing, after]);

        let reversed = Anchor { opening: closing, closing: opening, ..anchor };
        assert_eq!(reversed.clear(&mut tree).unwrap(), 0);
        assert_eq!(tree.inner_text(body), "{{A}}keep{{/A}}after");
    }
}
