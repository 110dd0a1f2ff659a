//! Document tree operations and storage

use crate::{local_name, Attribute, DocModelError, Node, NodeContent, NodeId, NodeType, Result};
use serde::{Deserialize, Serialize};

/// Arena holding every node of an open package.
///
/// All XML parts of a package share one tree; each part is a separate root.
/// Removed nodes stay in the arena as detached subtrees, so a `NodeId` never
/// dangles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    /// Incremented on every structural or content change
    version: u64,
}

impl DocumentTree {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Modification counter
    pub fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Creation
    // =========================================================================

    fn alloc(&mut self, content: NodeContent) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(Node::new(id, content));
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        self.alloc(NodeContent::Element {
            name: name.into(),
            attributes: Vec::new(),
        })
    }

    /// Create a detached element with attributes
    pub fn create_element_with_attributes(
        &mut self,
        name: impl Into<String>,
        attributes: &[(&str, &str)],
    ) -> NodeId {
        self.alloc(NodeContent::Element {
            name: name.into(),
            attributes: attributes
                .iter()
                .map(|(k, v)| Attribute::new(*k, *v))
                .collect(),
        })
    }

    /// Create a detached element of a known type
    pub fn create_typed(&mut self, node_type: NodeType) -> Result<NodeId> {
        let name = node_type.qualified_name().ok_or_else(|| {
            DocModelError::InvalidOperation(format!("{:?} has no element name", node_type))
        })?;
        Ok(self.create_element(name))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeContent::Text(text.into()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeContent::Comment(text.into()))
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .ok_or(DocModelError::NodeNotFound(id))
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(DocModelError::NodeNotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::name)
    }

    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::local_name)
    }

    pub fn node_type(&self, id: NodeId) -> Option<NodeType> {
        self.get(id).and_then(Node::node_type)
    }

    /// True when `id` is an element of the given type
    pub fn is(&self, id: NodeId, node_type: NodeType) -> bool {
        self.node_type(id) == Some(node_type)
    }

    fn position_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|c| *c == id)?;
        Some((parent, index))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.position_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.position_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Parent and child range strictly between two siblings. `None` unless
    /// both share a parent and `last` follows `first`.
    fn sibling_range(&self, first: NodeId, last: NodeId) -> Option<(NodeId, usize, usize)> {
        let parent = self.parent(first)?;
        if self.parent(last) != Some(parent) {
            return None;
        }
        let children = self.children(parent);
        let start = children.iter().position(|c| *c == first)?;
        let end = children.iter().position(|c| *c == last)?;
        (start < end).then_some((parent, start + 1, end))
    }

    /// Siblings strictly between `first` and `last`, in document order.
    /// `None` when `last` is not a following sibling of `first`.
    pub fn siblings_between(&self, first: NodeId, last: NodeId) -> Option<&[NodeId]> {
        let (parent, start, end) = self.sibling_range(first, last)?;
        Some(&self.children(parent)[start..end])
    }

    /// Next sibling that is an element of the given type, skipping others
    pub fn next_sibling_of_type(&self, id: NodeId, node_type: NodeType) -> Option<NodeId> {
        let (parent, index) = self.position_in_parent(id)?;
        self.children(parent)[index + 1..]
            .iter()
            .copied()
            .find(|&sibling| self.is(sibling, node_type))
    }

    pub fn first_child_of_type(&self, id: NodeId, node_type: NodeType) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.is(*c, node_type))
    }

    pub fn children_of_type(&self, id: NodeId, node_type: NodeType) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.is(*c, node_type))
            .collect()
    }

    /// First direct child with the given local name
    pub fn first_child_named(&self, id: NodeId, local: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|c| self.local_name(*c) == Some(local))
    }

    /// All descendants of `root` in document order, excluding `root` itself
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Typed subtree query in document order
    pub fn descendants_of_type(&self, root: NodeId, node_type: NodeType) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.is(*id, node_type))
            .collect()
    }

    /// Descendants with the given element local name
    pub fn descendants_named(&self, root: NodeId, local: &str) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.local_name(*id) == Some(local))
            .collect()
    }

    /// Walk up the parent chain, nearest first
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).contains(&ancestor)
    }

    /// Concatenation of every descendant text node, hidden text included
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut text = String::new();
        if let Some(t) = self.get(id).and_then(Node::text) {
            text.push_str(t);
        }
        for descendant in self.descendants(id) {
            if let Some(t) = self.get(descendant).and_then(Node::text) {
                text.push_str(t);
            }
        }
        text
    }

    // =========================================================================
    // Attributes and text
    // =========================================================================

    pub fn attribute(&self, id: NodeId, local: &str) -> Option<&str> {
        self.get(id).and_then(|n| n.attribute(local))
    }

    /// Set an attribute, replacing any existing one with the same local name
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let node = self.get_mut(id)?;
        let NodeContent::Element { attributes, .. } = &mut node.content else {
            return Err(DocModelError::InvalidOperation(format!(
                "cannot set attribute {} on non-element {}",
                name, id
            )));
        };
        let local = local_name(name);
        match attributes.iter_mut().find(|a| a.local_name() == local) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute::new(name, value)),
        }
        self.version += 1;
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, local: &str) -> Result<()> {
        let node = self.get_mut(id)?;
        if let NodeContent::Element { attributes, .. } = &mut node.content {
            attributes.retain(|a| a.local_name() != local);
        }
        self.version += 1;
        Ok(())
    }

    /// Replace the character data of a text node
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        let node = self.get_mut(id)?;
        match &mut node.content {
            NodeContent::Text(existing) => *existing = text.into(),
            _ => {
                return Err(DocModelError::InvalidOperation(format!(
                    "{} is not a text node",
                    id
                )))
            }
        }
        self.version += 1;
        Ok(())
    }

    // =========================================================================
    // Structural mutation
    // =========================================================================

    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DocModelError::Cycle { child, parent });
        }
        Ok(())
    }

    fn detach(&mut self, id: NodeId) -> Result<()> {
        if let Some((parent, index)) = self.position_in_parent(id) {
            self.get_mut(parent)?.children.remove(index);
        }
        self.get_mut(id)?.parent = None;
        Ok(())
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) -> Result<()> {
        let parent_node = self.get_mut(parent)?;
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);
        self.version += 1;
        Ok(())
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insert(parent, child)?;
        self.detach(child)?;
        let len = self.children(parent).len();
        self.insert_at(parent, len, child)
    }

    /// Append several nodes in order
    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        for child in children {
            self.append_child(parent, *child)?;
        }
        Ok(())
    }

    /// Insert `child` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insert(parent, child)?;
        self.detach(child)?;
        self.insert_at(parent, 0, child)
    }

    /// Insert `node` immediately before `reference`
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let parent = self.parent(reference).ok_or(DocModelError::Detached(reference))?;
        self.check_insert(parent, node)?;
        self.detach(node)?;
        let (_, index) = self.position_in_parent(reference).ok_or(DocModelError::Detached(reference))?;
        self.insert_at(parent, index, node)
    }

    /// Insert `node` immediately after `reference`
    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) -> Result<()> {
        let parent = self.parent(reference).ok_or(DocModelError::Detached(reference))?;
        self.check_insert(parent, node)?;
        self.detach(node)?;
        let (_, index) = self.position_in_parent(reference).ok_or(DocModelError::Detached(reference))?;
        self.insert_at(parent, index + 1, node)
    }

    /// Detach a node (and its subtree) from the tree
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.detach(id)?;
        self.version += 1;
        Ok(())
    }

    /// Detach every child of a node
    pub fn remove_children(&mut self, id: NodeId) -> Result<()> {
        let children = std::mem::take(&mut self.get_mut(id)?.children);
        for child in children {
            self.get_mut(child)?.parent = None;
        }
        self.version += 1;
        Ok(())
    }

    /// Detach every sibling strictly between `first` and `last` in one pass.
    /// Returns `None`, leaving the tree untouched, when `last` is not a
    /// following sibling of `first`.
    pub fn remove_between(&mut self, first: NodeId, last: NodeId) -> Result<Option<usize>> {
        let Some((parent, start, end)) = self.sibling_range(first, last) else {
            return Ok(None);
        };
        let removed: Vec<NodeId> = self.get_mut(parent)?.children.drain(start..end).collect();
        for &id in &removed {
            self.get_mut(id)?.parent = None;
        }
        if !removed.is_empty() {
            self.version += 1;
        }
        Ok(Some(removed.len()))
    }

    /// Deep copy of a subtree. The copy gets fresh IDs and no parent.
    pub fn clone_subtree(&mut self, id: NodeId) -> Result<NodeId> {
        let content = self.node(id)?.content.clone();
        let copy = self.alloc(content);
        let children = self.node(id)?.children.clone();
        for child in children {
            let child_copy = self.clone_subtree(child)?;
            self.get_mut(child_copy)?.parent = Some(copy);
            self.get_mut(copy)?.children.push(child_copy);
        }
        Ok(copy)
    }
}
