//! Tag visibility
//!
//! Showing or hiding a tag flips the vanish flag on everything between its
//! markers: paragraph marks and runs. Hidden placeholder markers inside the
//! tag stay hidden either way.

use std::sync::OnceLock;

use doc_model::{DocumentTree, NodeId, NodeType, Result};
use regex_lite::Regex;

use crate::locator::AnchorLocator;
use crate::options::TagVisibilityOptions;

fn marker_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\{\{.*\}\}$").ok()).as_ref()
}

/// Shows and hides tag content
#[derive(Debug, Clone, Copy)]
pub struct VisibilityToggler<'a> {
    locator: AnchorLocator<'a>,
}

impl<'a> VisibilityToggler<'a> {
    pub fn new(roots: &'a [NodeId]) -> Self {
        Self {
            locator: AnchorLocator::new(roots),
        }
    }

    /// Set the visibility of every `tag` occurrence. Returns the number of
    /// occurrences touched.
    ///
    /// Occurrences whose markers live inside a content control, or whose
    /// closing marker is not a following sibling, are skipped.
    pub fn set_visibility(&self, tree: &mut DocumentTree, tag: &str, visible: bool) -> Result<usize> {
        let mut touched = 0;
        for anchor in self.locator.tags(tree, tag) {
            if inside_content_control(tree, anchor.opening) || inside_content_control(tree, anchor.closing) {
                continue;
            }
            let Some(between) = tree.siblings_between(anchor.opening, anchor.closing) else {
                tracing::warn!(tag, "closing marker is not a following sibling, visibility unchanged");
                continue;
            };
            for node in between.to_vec() {
                set_node_visibility(tree, node, visible)?;
            }
            touched += 1;
        }
        tracing::debug!(tag, visible, occurrences = touched, "set tag visibility");
        Ok(touched)
    }

    /// Show the visible tag, then hide each hidden tag
    pub fn apply(&self, tree: &mut DocumentTree, options: &TagVisibilityOptions) -> Result<()> {
        if let Some(visible) = &options.visible_tag {
            self.set_visibility(tree, visible, true)?;
        }
        for hidden in &options.hidden_tags {
            self.set_visibility(tree, hidden, false)?;
        }
        Ok(())
    }
}

fn inside_content_control(tree: &DocumentTree, node: NodeId) -> bool {
    tree.ancestors(node)
        .into_iter()
        .any(|ancestor| tree.is(ancestor, NodeType::ContentControl))
}

/// A hidden run whose whole text is a placeholder marker
fn is_hidden_placeholder(tree: &DocumentTree, run: NodeId) -> bool {
    tree.is_run_hidden(run) && marker_pattern().is_some_and(|re| re.is_match(&tree.inner_text(run)))
}

fn set_node_visibility(tree: &mut DocumentTree, node: NodeId, visible: bool) -> Result<()> {
    for properties in tree.descendants_of_type(node, NodeType::ParagraphProperties) {
        if let Some(mark) = tree.mark_run_properties(properties) {
            tree.set_vanish(mark, !visible)?;
        }
    }
    for run in tree.descendants_of_type(node, NodeType::Run) {
        if is_hidden_placeholder(tree, run) {
            continue;
        }
        tree.set_run_hidden(run, !visible)?;
    }
    Ok(())
}
