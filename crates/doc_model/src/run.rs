//! Run helpers (`w:r`)

use crate::{DocumentTree, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

/// Character formatting applied by the engine to generated runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFormatting {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl RunFormatting {
    pub fn is_empty(&self) -> bool {
        !(self.bold || self.italic || self.underline)
    }

    /// Union of two formattings
    pub fn merge(self, other: RunFormatting) -> RunFormatting {
        RunFormatting {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
            underline: self.underline || other.underline,
        }
    }
}

impl DocumentTree {
    /// `w:rPr` of a run, if any
    pub fn run_properties(&self, run: NodeId) -> Option<NodeId> {
        self.first_child_of_type(run, NodeType::RunProperties)
    }

    /// `w:rPr` of a run, creating it as the first child when missing
    pub fn ensure_run_properties(&mut self, run: NodeId) -> Result<NodeId> {
        if let Some(rpr) = self.run_properties(run) {
            return Ok(rpr);
        }
        let rpr = self.create_typed(NodeType::RunProperties)?;
        self.prepend_child(run, rpr)?;
        Ok(rpr)
    }

    /// Whether the run carries a vanish flag
    pub fn is_run_hidden(&self, run: NodeId) -> bool {
        self.run_properties(run)
            .is_some_and(|rpr| self.has_vanish(rpr))
    }

    /// Set or clear the vanish flag on a properties container
    pub fn set_vanish(&mut self, properties: NodeId, hidden: bool) -> Result<()> {
        self.remove_property(properties, "vanish")?;
        if hidden {
            self.set_flag_property(properties, "vanish")?;
        }
        Ok(())
    }

    /// Set or clear the vanish flag on a run, creating `w:rPr` only when hiding
    pub fn set_run_hidden(&mut self, run: NodeId, hidden: bool) -> Result<()> {
        match (self.run_properties(run), hidden) {
            (Some(rpr), _) => self.set_vanish(rpr, hidden),
            (None, true) => {
                let rpr = self.ensure_run_properties(run)?;
                self.set_vanish(rpr, true)
            }
            (None, false) => Ok(()),
        }
    }

    /// Add bold/italic/underline flags to a properties container
    pub fn apply_run_formatting(&mut self, rpr: NodeId, formatting: RunFormatting) -> Result<()> {
        if formatting.bold {
            self.set_flag_property(rpr, "b")?;
        }
        if formatting.italic {
            self.set_flag_property(rpr, "i")?;
        }
        if formatting.underline {
            let u = self.create_element_with_attributes("w:u", &[("w:val", "single")]);
            self.set_property(rpr, u)?;
        }
        Ok(())
    }

    /// Create a `w:t` with `xml:space="preserve"`
    pub fn create_text_element(&mut self, text: &str) -> Result<NodeId> {
        let t = self.create_element_with_attributes("w:t", &[("xml:space", "preserve")]);
        if !text.is_empty() {
            let data = self.create_text(text);
            self.append_child(t, data)?;
        }
        Ok(t)
    }

    /// Create a run holding `text`, with optional properties attached first
    pub fn create_text_run(&mut self, text: &str, properties: Option<NodeId>) -> Result<NodeId> {
        let run = self.create_typed(NodeType::Run)?;
        if let Some(rpr) = properties {
            self.append_child(run, rpr)?;
        }
        let t = self.create_text_element(text)?;
        self.append_child(run, t)?;
        Ok(run)
    }

    /// Create a run holding a single `w:br`
    pub fn create_break_run(&mut self, properties: Option<NodeId>) -> Result<NodeId> {
        self.create_marker_run(NodeType::Break, properties)
    }

    /// Create a run holding a single `w:tab`
    pub fn create_tab_run(&mut self, properties: Option<NodeId>) -> Result<NodeId> {
        self.create_marker_run(NodeType::Tab, properties)
    }

    fn create_marker_run(&mut self, marker: NodeType, properties: Option<NodeId>) -> Result<NodeId> {
        let run = self.create_typed(NodeType::Run)?;
        if let Some(rpr) = properties {
            self.append_child(run, rpr)?;
        }
        let child = self.create_typed(marker)?;
        self.append_child(run, child)?;
        Ok(run)
    }

    /// Last `w:t` of a run, if any
    pub fn last_text_element(&self, run: NodeId) -> Option<NodeId> {
        self.children_of_type(run, NodeType::Text).last().copied()
    }

    /// Replace the content of a `w:t` with `text`, marking it space-preserving
    pub fn set_text_element(&mut self, t: NodeId, text: &str) -> Result<()> {
        self.remove_children(t)?;
        if !text.is_empty() {
            let data = self.create_text(text);
            self.append_child(t, data)?;
        }
        self.set_attribute(t, "xml:space", "preserve")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_run_shape() {
        let mut tree = DocumentTree::new();
        let run = tree.create_text_run(" spaced ", None).unwrap();
        let t = tree.last_text_element(run).unwrap();
        assert_eq!(tree.attribute(t, "space"), Some("preserve"));
        assert_eq!(tree.inner_text(run), " spaced ");
        assert!(tree.run_properties(run).is_none());
    }

    #[test]
    fn test_hide_creates_properties_first() {
        let mut tree = DocumentTree::new();
        let run = tree.create_text_run("x", None).unwrap();
        tree.set_run_hidden(run, true).unwrap();

        let rpr = tree.run_properties(run).unwrap();
        assert_eq!(tree.children(run)[0], rpr);
        assert!(tree.is_run_hidden(run));

        tree.set_run_hidden(run, false).unwrap();
        assert!(!tree.is_run_hidden(run));
        assert!(tree.children(rpr).is_empty());
    }

    #[test]
    fn test_show_without_properties_is_noop() {
        let mut tree = DocumentTree::new();
        let run = tree.create_text_run("x", None).unwrap();
        tree.set_run_hidden(run, false).unwrap();
        assert!(tree.run_properties(run).is_none());
    }

    #[test]
    fn test_apply_formatting() {
        let mut tree = DocumentTree::new();
        let rpr = tree.create_element("w:rPr");
        tree.apply_run_formatting(
            rpr,
            RunFormatting { bold: true, italic: false, underline: true },
        )
        .unwrap();
        let u = tree.first_child_named(rpr, "u").unwrap();
        assert_eq!(tree.attribute(u, "val"), Some("single"));
        assert!(tree.first_child_named(rpr, "b").is_some());
        assert!(tree.first_child_named(rpr, "i").is_none());
    }

    #[test]
    fn test_formatting_merge() {
        let bold = RunFormatting { bold: true, ..Default::default() };
        let italic = RunFormatting { italic: true, ..Default::default() };
        let both = bold.merge(italic);
        assert!(both.bold && both.italic && !both.underline);
        assert!(RunFormatting::default().is_empty());
    }
}
