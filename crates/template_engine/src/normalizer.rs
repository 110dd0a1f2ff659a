//! Hidden run normalization
//!
//! Word splits a hidden run into several sibling runs as the cursor passes
//! through it, which breaks exact marker matching. This pass joins every
//! chain of adjacent hidden text runs back into its first run.

use std::sync::OnceLock;

use doc_model::{DocumentTree, NodeId, NodeType, Result};
use regex_lite::Regex;

fn placeholder_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\{\{/?.+\}\}").ok())
        .as_ref()
}

/// Whether `text` contains something shaped like a placeholder marker
pub fn looks_like_placeholder(text: &str) -> bool {
    placeholder_pattern().is_some_and(|re| re.is_match(text))
}

/// Merges fragmented hidden runs
#[derive(Debug, Default, Clone, Copy)]
pub struct RunNormalizer;

impl RunNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Merge adjacent hidden text runs under every root.
    /// Returns the number of runs removed.
    pub fn normalize(&self, tree: &mut DocumentTree, roots: &[NodeId]) -> Result<usize> {
        let mut removed = 0;
        for &root in roots {
            for group in self.groups(tree, root) {
                removed += self.merge(tree, &group)?;
            }
        }
        if removed > 0 {
            tracing::debug!(removed, "merged fragmented hidden runs");
        }
        Ok(removed)
    }

    /// A hidden run holding only properties and text whose content is not a
    /// placeholder marker
    fn is_candidate(&self, tree: &DocumentTree, run: NodeId) -> bool {
        tree.is_run_hidden(run)
            && tree.last_text_element(run).is_some()
            && tree.children(run).iter().all(|&child| {
                tree.is(child, NodeType::RunProperties) || tree.is(child, NodeType::Text)
            })
            && !looks_like_placeholder(&tree.inner_text(run))
    }

    /// Maximal chains of candidate runs where each run is the next run
    /// sibling of the previous one
    fn groups(&self, tree: &DocumentTree, root: NodeId) -> Vec<Vec<NodeId>> {
        let mut groups: Vec<Vec<NodeId>> = Vec::new();
        for run in tree.descendants_of_type(root, NodeType::Run) {
            if !self.is_candidate(tree, run) {
                continue;
            }
            let continues = groups
                .last()
                .and_then(|group| group.last())
                .is_some_and(|&last| tree.next_sibling_of_type(last, NodeType::Run) == Some(run));
            match groups.last_mut() {
                Some(group) if continues => group.push(run),
                _ => groups.push(vec![run]),
            }
        }
        groups.retain(|group| group.len() > 1);
        groups
    }

    fn merge(&self, tree: &mut DocumentTree, group: &[NodeId]) -> Result<usize> {
        let Some((&first, rest)) = group.split_first() else {
            return Ok(0);
        };
        let text: String = group.iter().map(|&run| tree.inner_text(run)).collect();

        let texts = tree.children_of_type(first, NodeType::Text);
        if let Some((&last, earlier)) = texts.split_last() {
            for &t in earlier {
                tree.remove(t)?;
            }
            tree.set_text_element(last, &text)?;
        }
        for &run in rest {
            tree.remove(run)?;
        }
        Ok(rest.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_run(tree: &mut DocumentTree, text: &str) -> NodeId {
        let run = tree.create_text_run(text, None).unwrap();
        tree.set_run_hidden(run, true).unwrap();
        run
    }

    #[test]
    fn test_placeholder_pattern() {
        assert!(looks_like_placeholder("{{TITLE}}"));
        assert!(looks_like_placeholder("{{/TITLE}}"));
        assert!(looks_like_placeholder("before {{X}} after"));
        assert!(!looks_like_placeholder("{{"));
        assert!(!looks_like_placeholder("{TAG}"));
    }

    #[test]
    fn test_merges_split_marker() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let runs = [
            hidden_run(&mut tree, "{{TI"),
            hidden_run(&mut tree, "TL"),
            hidden_run(&mut tree, "E}}"),
        ];
        tree.append_children(p, &runs).unwrap();

        let removed = RunNormalizer::new().normalize(&mut tree, &[p]).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(tree.children(p), &[runs[0]]);
        assert_eq!(tree.inner_text(runs[0]), "{{TITLE}}");
    }

    #[test]
    fn test_complete_markers_not_merged() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let runs = [
            hidden_run(&mut tree, "{{A}}"),
            hidden_run(&mut tree, "{{/A}}"),
        ];
        tree.append_children(p, &runs).unwrap();

        assert_eq!(RunNormalizer::new().normalize(&mut tree, &[p]).unwrap(), 0);
        assert_eq!(tree.children(p).len(), 2);
    }

    #[test]
    fn test_visible_run_breaks_chain() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let a = hidden_run(&mut tree, "a");
        let visible = tree.create_text_run("v", None).unwrap();
        let b = hidden_run(&mut tree, "b");
        tree.append_children(p, &[a, visible, b]).unwrap();

        assert_eq!(RunNormalizer::new().normalize(&mut tree, &[p]).unwrap(), 0);
        assert_eq!(tree.inner_text(p), "avb");
    }

    #[test]
    fn test_non_run_sibling_does_not_break_chain() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let a = hidden_run(&mut tree, "{A");
        let bookmark = tree.create_element("w:bookmarkStart");
        let b = hidden_run(&mut tree, "}");
        tree.append_children(p, &[a, bookmark, b]).unwrap();

        assert_eq!(RunNormalizer::new().normalize(&mut tree, &[p]).unwrap(), 1);
        assert_eq!(tree.inner_text(a), "{A}");
    }

    #[test]
    fn test_runs_with_breaks_kept() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let a = hidden_run(&mut tree, "a");
        let rpr = tree.create_element("w:rPr");
        tree.set_vanish(rpr, true).unwrap();
        let br = tree.create_break_run(Some(rpr)).unwrap();
        tree.append_children(p, &[a, br]).unwrap();

        assert_eq!(RunNormalizer::new().normalize(&mut tree, &[p]).unwrap(), 0);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut tree = DocumentTree::new();
        let p = tree.create_paragraph().unwrap();
        let runs = [
            hidden_run(&mut tree, "x"),
            hidden_run(&mut tree, "y"),
        ];
        tree.append_children(p, &runs).unwrap();
        let normalizer = RunNormalizer::new();
        assert_eq!(normalizer.normalize(&mut tree, &[p]).unwrap(), 1);
        assert_eq!(normalizer.normalize(&mut tree, &[p]).unwrap(), 0);
    }
}
