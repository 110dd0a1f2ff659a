//! Inline content builder
//!
//! Accumulates detached runs in a buffer. The caller splices the buffer into
//! the tree once the closure filling it returns.

use doc_model::{NodeId, NodeType, RunFormatting};

use super::format::Format;
use crate::anchor::AnchorKind;
use crate::document::DocxDocument;
use crate::error::Result;
use crate::permission::{EditableState, PermissionRangeAllocator};

/// Builds runs for a placeholder, an inline field, or a paragraph
pub struct InlineBuilder<'d> {
    doc: &'d mut DocxDocument,
    /// Detached `w:rPr` that formatted text starts from
    base: Option<NodeId>,
    buffer: Vec<NodeId>,
    /// Toggles consumed by the next `text` call
    pending: RunFormatting,
    editable: EditableState,
}

impl<'d> InlineBuilder<'d> {
    pub(crate) fn new(doc: &'d mut DocxDocument, base: Option<NodeId>) -> Self {
        Self {
            doc,
            base,
            buffer: Vec::new(),
            pending: RunFormatting::default(),
            editable: EditableState::default(),
        }
    }

    /// Formatted text. Line feeds become breaks inside the run.
    pub fn text(&mut self, text: &str) -> &mut Self {
        let formatting = std::mem::take(&mut self.pending);
        self.formatted_text(text, formatting)
    }

    /// Formatted text made of several lines
    pub fn text_lines(&mut self, lines: &[&str]) -> &mut Self {
        self.text(&lines.join("\n"))
    }

    /// Formatted text followed by a line break
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.text(text);
        let result = self.doc.tree_mut().create_break_run(None).map_err(Into::into);
        self.push(result)
    }

    /// Plain text without the base formatting
    pub fn add_text(&mut self, text: &str) -> &mut Self {
        let result = self.build_run(text, None);
        self.push(result)
    }

    /// Plain lines separated by breaks
    pub fn add_text_lines(&mut self, lines: &[&str]) -> &mut Self {
        self.add_text(&lines.join("\n"))
    }

    pub fn bold(&mut self) -> &mut Self {
        self.pending.bold = true;
        self
    }

    pub fn italic(&mut self) -> &mut Self {
        self.pending.italic = true;
        self
    }

    pub fn underline(&mut self) -> &mut Self {
        self.pending.underline = true;
        self
    }

    /// An empty nested placeholder
    pub fn placeholder(&mut self, name: &str) -> &mut Self {
        self.placeholder_with(name, |_| {})
    }

    /// A nested placeholder filled by `fill`
    pub fn placeholder_with<F>(&mut self, name: &str, fill: F) -> &mut Self
    where
        F: FnOnce(&mut InlineBuilder<'_>),
    {
        let result = AnchorKind::Placeholder.create_markers(self.doc.tree_mut(), name);
        let Some((opening, closing)) = self.doc.record(result) else {
            return self;
        };
        let mut nested = InlineBuilder::new(&mut *self.doc, self.base);
        fill(&mut nested);
        let content = nested.finish();

        self.buffer.push(opening);
        self.buffer.extend(content);
        self.buffer.push(closing);
        self
    }

    /// A nested placeholder holding `text`
    pub fn placeholder_text(&mut self, name: &str, text: &str) -> &mut Self {
        self.placeholder_with(name, |nested| {
            nested.text(text);
        })
    }

    /// An inline picture; the image bytes become a new media part
    pub fn image(&mut self, data: &[u8], content_type: &str) -> &mut Self {
        let result = self.doc.create_image_run(data, content_type);
        self.push(result)
    }

    /// Open an editable range; no-op while one is open
    pub fn editable_start(&mut self) -> &mut Self {
        if self.editable.is_open() {
            return self;
        }
        let id = self.doc.allocate_permission_id();
        self.editable.open(id);
        let start = PermissionRangeAllocator::start(self.doc.tree_mut(), id);
        self.buffer.push(start);
        self
    }

    /// Close the open editable range; no-op when none is open
    pub fn editable_end(&mut self) -> &mut Self {
        if let Some(id) = self.editable.close() {
            let end = PermissionRangeAllocator::end(self.doc.tree_mut(), id);
            self.buffer.push(end);
        }
        self
    }

    /// Text built from formatting combinators
    pub fn format(&mut self, format: impl Into<Format>) -> &mut Self {
        format.into().write(self, RunFormatting::default());
        self
    }

    pub(crate) fn formatted_text(&mut self, text: &str, formatting: RunFormatting) -> &mut Self {
        let result = self
            .run_properties(formatting)
            .and_then(|properties| self.build_run(text, properties));
        self.push(result)
    }

    /// The buffered nodes, in order. An editable range left open is closed.
    pub(crate) fn finish(mut self) -> Vec<NodeId> {
        self.editable_end();
        self.buffer
    }

    fn push(&mut self, result: Result<NodeId>) -> &mut Self {
        if let Some(node) = self.doc.record(result) {
            self.buffer.push(node);
        }
        self
    }

    /// Base properties with `formatting` applied and the vanish flag
    /// cleared. Empty properties are dropped.
    fn run_properties(&mut self, formatting: RunFormatting) -> Result<Option<NodeId>> {
        let tree = self.doc.tree_mut();
        let properties = match self.base {
            Some(base) => tree.clone_subtree(base)?,
            None => tree.create_typed(NodeType::RunProperties)?,
        };
        tree.set_vanish(properties, false)?;
        tree.apply_run_formatting(properties, formatting)?;
        Ok((!tree.children(properties).is_empty()).then_some(properties))
    }

    fn build_run(&mut self, text: &str, properties: Option<NodeId>) -> Result<NodeId> {
        let tree = self.doc.tree_mut();
        let run = tree.create_typed(NodeType::Run)?;
        if let Some(properties) = properties {
            tree.append_child(run, properties)?;
        }
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                let br = tree.create_typed(NodeType::Break)?;
                tree.append_child(run, br)?;
            }
            let t = tree.create_text_element(line.trim_end_matches('\r'))?;
            tree.append_child(run, t)?;
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FormatExt;

    fn build<F>(document: &mut DocxDocument, base: Option<NodeId>, fill: F) -> Vec<NodeId>
    where
        F: FnOnce(&mut InlineBuilder<'_>),
    {
        let mut builder = InlineBuilder::new(document, base);
        fill(&mut builder);
        builder.finish()
    }

    fn child_names(document: &DocxDocument, node: NodeId) -> Vec<String> {
        let tree = document.tree();
        tree.children(node)
            .iter()
            .filter_map(|&c| tree.local_name(c).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_text_splits_lines() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.text("one\r\ntwo");
        });
        assert_eq!(nodes.len(), 1);
        assert_eq!(child_names(&document, nodes[0]), vec!["t", "br", "t"]);
        assert_eq!(document.tree().inner_text(nodes[0]), "onetwo");
    }

    #[test]
    fn test_line_ends_with_break_run() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.line("first").text("second");
        });
        assert_eq!(nodes.len(), 3);
        assert_eq!(child_names(&document, nodes[0]), vec!["t"]);
        assert_eq!(child_names(&document, nodes[1]), vec!["br"]);
        assert!(document.tree().is(nodes[1], NodeType::Run));
        assert_eq!(document.tree().inner_text(nodes[2]), "second");
        assert!(document.take_error().is_ok());
    }

    #[test]
    fn test_toggles_apply_to_next_text_only() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.bold().italic().text("strong").text("plain");
        });
        let tree = document.tree();
        let strong = tree.run_properties(nodes[0]).unwrap();
        assert!(tree.first_child_named(strong, "b").is_some());
        assert!(tree.first_child_named(strong, "i").is_some());
        assert!(tree.run_properties(nodes[1]).is_none());
    }

    #[test]
    fn test_base_properties_are_copied_visible() {
        let mut document = DocxDocument::new().unwrap();
        let tree = document.tree_mut();
        let base = tree.create_typed(NodeType::RunProperties).unwrap();
        tree.set_flag_property(base, "caps").unwrap();
        tree.set_vanish(base, true).unwrap();

        let nodes = build(&mut document, Some(base), |b| {
            b.text("a").add_text("b");
        });
        let tree = document.tree();
        let rpr = tree.run_properties(nodes[0]).unwrap();
        assert_ne!(rpr, base);
        assert!(tree.first_child_named(rpr, "caps").is_some());
        assert!(!tree.has_vanish(rpr));
        assert!(tree.run_properties(nodes[1]).is_none());
        assert!(tree.has_vanish(base));
    }

    #[test]
    fn test_nested_placeholder() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.placeholder_text("INNER", "value");
        });
        let tree = document.tree();
        let texts: Vec<String> = nodes.iter().map(|&n| tree.inner_text(n)).collect();
        assert_eq!(texts, vec!["{{INNER}}", "value", "{{/INNER}}"]);
        assert!(tree.is_run_hidden(nodes[0]));
        assert!(tree.is_run_hidden(nodes[2]));
        assert!(!tree.is_run_hidden(nodes[1]));
    }

    #[test]
    fn test_editable_range_is_not_nested() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.editable_start().editable_start().text("x").editable_end().editable_end();
        });
        let names: Vec<&str> = nodes
            .iter()
            .filter_map(|&n| document.tree().local_name(n))
            .collect();
        assert_eq!(names, vec!["permStart", "r", "permEnd"]);
    }

    #[test]
    fn test_open_range_closed_on_finish() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.editable_start().text("x");
        });
        assert_eq!(document.tree().local_name(*nodes.last().unwrap()), Some("permEnd"));
    }

    #[test]
    fn test_format_combinators() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.format("a".bold() + "b" + ("c".italic()).underlined());
        });
        let tree = document.tree();
        assert_eq!(nodes.len(), 3);
        let a = tree.run_properties(nodes[0]).unwrap();
        assert!(tree.first_child_named(a, "b").is_some());
        assert!(tree.run_properties(nodes[1]).is_none());
        let c = tree.run_properties(nodes[2]).unwrap();
        assert!(tree.first_child_named(c, "i").is_some());
        assert!(tree.first_child_named(c, "u").is_some());
    }

    #[test]
    fn test_image_adds_part() {
        let mut document = DocxDocument::new().unwrap();
        let nodes = build(&mut document, None, |b| {
            b.image(&[0x89, b'P', b'N', b'G'], "image/png");
        });
        assert_eq!(nodes.len(), 1);
        assert!(document.package().part_names().contains(&"word/media/image1.png"));
        assert!(!document.tree().descendants_named(nodes[0], "blip").is_empty());
    }
}
