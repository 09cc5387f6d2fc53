//! Tree mutation: insertion, detachment and subtree copies.
//!
//! Every operation keeps `parent`, `children` and the sibling links in
//! agreement. A node that is already attached somewhere is detached first, so a
//! node is never listed under two parents.

use crate::{DomTree, NodeId};

impl DomTree {
    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.children(parent).len();
        self.insert_at(parent, index, child);
    }

    /// Inserts `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_at(parent, 0, child);
    }

    /// Inserts `child` into `parent` immediately before `reference`.
    ///
    /// With `reference == None`, or a reference that is not a child of
    /// `parent`, this appends.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let index = reference
            .and_then(|r| self.children(parent).iter().position(|&c| c == r))
            .unwrap_or_else(|| self.children(parent).len());
        self.insert_at(parent, index, child);
    }

    /// Removes `child` from `parent`'s children and clears its links.
    ///
    /// Does nothing if `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    /// Detaches every child of `parent`.
    pub fn remove_children(&mut self, parent: NodeId) {
        let children = std::mem::take(&mut self.nodes[parent.0].children);
        for child in children {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
        }
    }

    /// Puts `replacements` where `old` was, in order, and detaches `old`.
    ///
    /// Returns false (and changes nothing) if `old` has no parent.
    pub fn replace_node(&mut self, old: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.parent(old) else {
            return false;
        };
        for &node in replacements {
            if node != old {
                self.insert_before(parent, node, Some(old));
            }
        }
        if !replacements.contains(&old) {
            self.detach(old);
        }
        true
    }

    /// Detaches `id` from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        let node = &mut self.nodes[id.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
        self.relink_children(parent);
    }

    /// Deep-copies the subtree rooted at `id` into this arena. The copy is
    /// detached and shares no nodes with the original.
    pub fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let node_type = self.nodes[id.0].node_type.clone();
        let copy = self.alloc(node_type);
        let children = self.nodes[id.0].children.clone();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Deep-copies the subtree rooted at `id` in `other` into this arena. The
    /// copy is detached.
    pub fn import_subtree(&mut self, other: &Self, id: NodeId) -> NodeId {
        let copy = self.alloc(other.nodes[id.0].node_type.clone());
        for &child in other.children(id) {
            let child_copy = self.import_subtree(other, child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    fn insert_at(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(
            !self.is_inclusive_ancestor(child, parent),
            "inserting {child:?} under {parent:?} would create a cycle"
        );
        self.detach(child);
        let len = self.nodes[parent.0].children.len();
        let index = index.min(len);
        self.nodes[child.0].parent = Some(parent);
        if index == len {
            // Appending only touches the previous last child.
            let prev_last = self.nodes[parent.0].children.last().copied();
            self.nodes[parent.0].children.push(child);
            if let Some(prev_id) = prev_last {
                self.nodes[prev_id.0].next_sibling = Some(child);
            }
            self.nodes[child.0].prev_sibling = prev_last;
            self.nodes[child.0].next_sibling = None;
        } else {
            self.nodes[parent.0].children.insert(index, child);
            self.relink_children(parent);
        }
    }

    fn relink_children(&mut self, parent: NodeId) {
        let children = self.nodes[parent.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            let node = &mut self.nodes[child.0];
            node.prev_sibling = i.checked_sub(1).map(|p| children[p]);
            node.next_sibling = children.get(i + 1).copied();
        }
    }
}
