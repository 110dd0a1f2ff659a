//! Editable range ids
//!
//! Ids are derived from the `w:permStart` elements already in the document,
//! and never go backwards within a session even when buffered markers have
//! not been attached yet.

use doc_model::{DocumentTree, EditorGroup, NodeId};

/// Issues ids and markers for editable ranges
#[derive(Debug, Clone, Default)]
pub struct PermissionRangeAllocator {
    /// Last id handed out in this session
    last: Option<u32>,
}

impl PermissionRangeAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more than the largest existing id, where the baseline is 1
    pub fn scan(tree: &DocumentTree, roots: &[NodeId]) -> u32 {
        roots
            .iter()
            .flat_map(|&root| tree.permission_start_ids(root))
            .chain(std::iter::once(1))
            .max()
            .unwrap_or(1)
            + 1
    }

    /// Next id: above everything in the tree and everything issued before
    pub fn allocate_id(&mut self, tree: &DocumentTree, roots: &[NodeId]) -> u32 {
        let scanned = Self::scan(tree, roots);
        let id = match self.last {
            Some(last) => scanned.max(last + 1),
            None => scanned,
        };
        self.last = Some(id);
        tracing::debug!(id, "allocated permission range id");
        id
    }

    /// Last issued id, if any
    pub fn current(&self) -> Option<u32> {
        self.last
    }

    /// Create a detached `w:permStart` for `id`, editable by everyone
    pub fn start(tree: &mut DocumentTree, id: u32) -> NodeId {
        tree.create_permission_start(id, EditorGroup::Everyone)
    }

    /// Create a detached `w:permEnd` for `id`
    pub fn end(tree: &mut DocumentTree, id: u32) -> NodeId {
        tree.create_permission_end(id)
    }
}

/// Tracks whether a builder currently has an open editable range.
///
/// Opening twice or closing twice in a row is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditableState {
    open: Option<u32>,
}

impl EditableState {
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Record an opened range; false when one is already open
    pub fn open(&mut self, id: u32) -> bool {
        if self.open.is_some() {
            return false;
        }
        self.open = Some(id);
        true
    }

    /// Close the open range and return its id
    pub fn close(&mut self) -> Option<u32> {
        self.open.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::NodeType;

    fn body_with_ids(tree: &mut DocumentTree, ids: &[u32]) -> NodeId {
        let body = tree.create_typed(NodeType::Body).unwrap();
        for &id in ids {
            let start = tree.create_permission_start(id, EditorGroup::Everyone);
            tree.append_child(body, start).unwrap();
        }
        body
    }

    #[test]
    fn test_next_after_existing() {
        let mut tree = DocumentTree::new();
        let body = body_with_ids(&mut tree, &[1, 3, 5]);
        let mut allocator = PermissionRangeAllocator::new();
        assert_eq!(allocator.allocate_id(&tree, &[body]), 6);
    }

    #[test]
    fn test_empty_document_baseline() {
        let mut tree = DocumentTree::new();
        let body = body_with_ids(&mut tree, &[]);
        assert_eq!(PermissionRangeAllocator::scan(&tree, &[body]), 2);
    }

    #[test]
    fn test_monotonic_without_attachment() {
        let mut tree = DocumentTree::new();
        let body = body_with_ids(&mut tree, &[4]);
        let mut allocator = PermissionRangeAllocator::new();
        assert_eq!(allocator.allocate_id(&tree, &[body]), 5);
        assert_eq!(allocator.allocate_id(&tree, &[body]), 6);
        assert_eq!(allocator.current(), Some(6));
    }

    #[test]
    fn test_markers() {
        let mut tree = DocumentTree::new();
        let start = PermissionRangeAllocator::start(&mut tree, 9);
        let end = PermissionRangeAllocator::end(&mut tree, 9);
        assert_eq!(tree.attribute(start, "id"), Some("9"));
        assert_eq!(tree.attribute(start, "edGrp"), Some("everyone"));
        assert_eq!(tree.attribute(end, "id"), Some("9"));
    }

    #[test]
    fn test_editable_state() {
        let mut state = EditableState::default();
        assert!(state.open(3));
        assert!(!state.open(4));
        assert_eq!(state.close(), Some(3));
        assert_eq!(state.close(), None);
        assert!(!state.is_open());
    }
}
