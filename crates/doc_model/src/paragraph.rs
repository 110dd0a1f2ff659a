//! Paragraph helpers (`w:p`)

use crate::{DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

/// Text alignment for paragraphs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl Alignment {
    /// Get the OOXML `w:jc` value for this alignment
    pub fn ooxml_value(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
        }
    }

    /// Parse from OOXML attribute value
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" | "distribute" => Some(Alignment::Justify),
            _ => None,
        }
    }
}

/// Pending paragraph formatting, consumed by the next paragraph that is built
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphFormatting {
    pub alignment: Option<Alignment>,
    /// Prefix the paragraph with a tab run
    pub indent: bool,
}

impl DocumentTree {
    /// Create an empty detached paragraph
    pub fn create_paragraph(&mut self) -> Result<NodeId> {
        self.create_typed(NodeType::Paragraph)
    }

    /// `w:pPr` of a paragraph, if any
    pub fn paragraph_properties(&self, paragraph: NodeId) -> Option<NodeId> {
        self.first_child_of_type(paragraph, NodeType::ParagraphProperties)
    }

    /// `w:pPr` of a paragraph, creating it as the first child when missing
    pub fn ensure_paragraph_properties(&mut self, paragraph: NodeId) -> Result<NodeId> {
        if let Some(ppr) = self.paragraph_properties(paragraph) {
            return Ok(ppr);
        }
        let ppr = self.create_typed(NodeType::ParagraphProperties)?;
        self.prepend_child(paragraph, ppr)?;
        Ok(ppr)
    }

    /// Replace a paragraph's `w:pPr` with `properties`
    pub fn replace_paragraph_properties(&mut self, paragraph: NodeId, properties: NodeId) -> Result<()> {
        if let Some(existing) = self.paragraph_properties(paragraph) {
            self.remove(existing)?;
        }
        self.prepend_child(paragraph, properties)
    }

    /// Paragraph-mark run properties (`w:pPr/w:rPr`), if any
    pub fn mark_run_properties(&self, paragraph_properties: NodeId) -> Option<NodeId> {
        self.first_child_of_type(paragraph_properties, NodeType::RunProperties)
    }

    /// Paragraph-mark run properties, creating both containers when missing
    pub fn ensure_mark_run_properties(&mut self, paragraph: NodeId) -> Result<NodeId> {
        let ppr = self.ensure_paragraph_properties(paragraph)?;
        if let Some(rpr) = self.mark_run_properties(ppr) {
            return Ok(rpr);
        }
        let rpr = self.create_typed(NodeType::RunProperties)?;
        self.set_property(ppr, rpr)?;
        Ok(rpr)
    }

    /// Set `w:jc` on a paragraph
    pub fn set_alignment(&mut self, paragraph: NodeId, alignment: Alignment) -> Result<()> {
        let ppr = self.ensure_paragraph_properties(paragraph)?;
        let jc = self.create_element_with_attributes("w:jc", &[("w:val", alignment.ooxml_value())]);
        self.set_property(ppr, jc)
    }

    pub fn alignment(&self, paragraph: NodeId) -> Option<Alignment> {
        let ppr = self.paragraph_properties(paragraph)?;
        let jc = self.first_child_named(ppr, "jc")?;
        self.attribute(jc, "val").and_then(Alignment::from_ooxml)
    }

    /// Apply pending formatting to a paragraph built by the engine
    pub fn apply_paragraph_formatting(&mut self, paragraph: NodeId, formatting: ParagraphFormatting) -> Result<()> {
        if let Some(alignment) = formatting.alignment {
            self.set_alignment(paragraph, alignment)?;
        }
        if formatting.indent {
            let tab = self.create_tab_run(None)?;
            match self.paragraph_properties(paragraph) {
                Some(ppr) => self.insert_after(ppr, tab)?,
                None => self.prepend_child(paragraph, tab)?,
            }
        }
        Ok(())
    }

    /// Create a paragraph holding a single text run
    pub fn create_text_paragraph(&mut self, text: &str) -> Result<NodeId> {
        let paragraph = self.create_paragraph()?;
        let run = self.create_text_run(text, None)?;
        self.append_child(paragraph, run)?;
        Ok(paragraph)
    }

    /// Add `w:numPr` list membership and hanging indentation
    pub fn set_numbering(&mut self, paragraph: NodeId, num_id: u32, level: u32) -> Result<()> {
        let ppr = self.ensure_paragraph_properties(paragraph)?;
        let num_pr = self.create_element("w:numPr");
        let level = level.to_string();
        let num_id = num_id.to_string();
        let ilvl = self.create_element_with_attributes("w:ilvl", &[("w:val", level.as_str())]);
        let num = self.create_element_with_attributes("w:numId", &[("w:val", num_id.as_str())]);
        self.append_children(num_pr, &[ilvl, num])?;
        self.set_property(ppr, num_pr)?;
        let ind = self.create_element_with_attributes("w:ind", &[("w:left", "720"), ("w:hanging", "0")]);
        self.set_property(ppr, ind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_values() {
        assert_eq!(Alignment::Justify.ooxml_value(), "both");
        assert_eq!(Alignment::from_ooxml("both"), Some(Alignment::Justify));
        assert_eq!(Alignment::from_ooxml("bogus"), None);
    }

    #[test]
    fn test_set_alignment_creates_properties() {
        let mut tree = DocumentTree::new();
        let p = tree.create_text_paragraph("x").unwrap();
        tree.set_alignment(p, Alignment::Center).unwrap();
        assert_eq!(tree.alignment(p), Some(Alignment::Center));
        assert_eq!(tree.children(p)[0], tree.paragraph_properties(p).unwrap());
    }

    #[test]
    fn test_indent_inserts_tab_after_properties() {
        let mut tree = DocumentTree::new();
        let p = tree.create_text_paragraph("x").unwrap();
        tree.apply_paragraph_formatting(
            p,
            ParagraphFormatting { alignment: Some(Alignment::Right), indent: true },
        )
        .unwrap();

        let children = tree.children(p).to_vec();
        assert!(tree.is(children[0], NodeType::ParagraphProperties));
        assert!(tree.first_child_of_type(children[1], NodeType::Tab).is_some());
        assert_eq!(tree.inner_text(p), "x");
    }

    #[test]
    fn test_mark_run_properties_live_inside_paragraph_properties() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let rpr = tree.ensure_mark_run_properties(p).unwrap();
        let ppr = tree.paragraph_properties(p).unwrap();
        assert_eq!(tree.parent(rpr), Some(ppr));
        assert_eq!(tree.mark_run_properties(ppr), Some(rpr));
    }

    #[test]
    fn test_numbering_order() {
        let mut tree = DocumentTree::new();
        let p = tree.create_text_paragraph("item").unwrap();
        tree.set_alignment(p, Alignment::Left).unwrap();
        tree.set_numbering(p, 4, 0).unwrap();

        let ppr = tree.paragraph_properties(p).unwrap();
        let names: Vec<_> = tree.children(ppr).iter().map(|c| tree.local_name(*c).unwrap()).collect();
        assert_eq!(names, vec!["numPr", "ind", "jc"]);
    }
}
