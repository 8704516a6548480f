//! Skill Tree Arena
//!
//! `SkillTree` owns every `SkillNode` in an id-keyed map. Parent and child links
//! are plain `SkillId`s, so every traversal goes through map lookups and a
//! reparent is a pair of collection edits instead of pointer surgery.
//!
//! # Invariants
//!
//! - At most one root; every linked node has exactly one parent
//! - No node is its own ancestor (`set_parent` and `add_child` refuse cycles)
//! - A node's `parent` link equals its `skill.parent_id` after every successful
//!   mutation; orphans keep their declared `parent_id` without a link
//!
//! Traversals that walk parent links carry a visited set so they terminate even
//! if the arena was corrupted into a cycle.

use crate::models::{SkillId, SkillNode};
use crate::operations::TreeOperationError;
use std::collections::{HashMap, HashSet};

/// Id-indexed arena holding the whole skill hierarchy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillTree {
    nodes: HashMap<SkillId, SkillNode>,
    root: Option<SkillId>,
}

impl SkillTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root_id(&self) -> Option<SkillId> {
        self.root
    }

    pub fn root(&self) -> Option<&SkillNode> {
        self.root.and_then(|id| self.nodes.get(&id))
    }

    pub(crate) fn set_root(&mut self, id: SkillId) {
        self.root = Some(id);
    }

    pub fn is_root_id(&self, id: SkillId) -> bool {
        self.root == Some(id)
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillNode> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: SkillId) -> Option<&mut SkillNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.values()
    }

    /// Registers an unlinked node, replacing any node with the same id
    pub(crate) fn register(&mut self, node: SkillNode) -> Option<SkillNode> {
        self.nodes.insert(node.id(), node)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Linked parent of a node
    pub fn parent_of(&self, id: SkillId) -> Option<&SkillNode> {
        self.nodes.get(&id)?.parent.and_then(|p| self.nodes.get(&p))
    }

    /// Linked children of a node, in order
    pub fn children_of(&self, id: SkillId) -> Vec<&SkillNode> {
        self.nodes
            .get(&id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns true if `other` is reachable from `ancestor` by following children
    pub fn is_ancestor_of(&self, ancestor: SkillId, other: SkillId) -> bool {
        let Some(start) = self.nodes.get(&ancestor) else {
            return false;
        };

        let mut visited = HashSet::new();
        let mut stack: Vec<SkillId> = start.children.clone();

        while let Some(current) = stack.pop() {
            if current == other {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().copied());
            }
        }

        false
    }

    /// Points `node_id` at `new_parent`, updating the link and the declared `parent_id`
    ///
    /// Children lists are left alone; callers splice them (see `reparent`).
    /// Fails before touching anything when the move would create a cycle.
    pub fn set_parent(
        &mut self,
        node_id: SkillId,
        new_parent: SkillId,
    ) -> Result<(), TreeOperationError> {
        if !self.contains(node_id) {
            return Err(TreeOperationError::node_not_found(node_id));
        }
        if !self.contains(new_parent) {
            return Err(TreeOperationError::node_not_found(new_parent));
        }
        if new_parent == node_id || self.is_ancestor_of(node_id, new_parent) {
            return Err(TreeOperationError::cyclic_reference(node_id, new_parent));
        }

        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.parent = Some(new_parent);
            node.skill.parent_id = Some(new_parent);
        }
        Ok(())
    }

    /// Appends `child` to the children of `parent`
    ///
    /// Refuses (with a warning) when `child` is `parent` itself or already one of
    /// its ancestors. Adding a child twice is a no-op.
    pub fn add_child(&mut self, parent: SkillId, child: SkillId) -> Result<(), TreeOperationError> {
        if !self.contains(child) {
            return Err(TreeOperationError::node_not_found(child));
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            tracing::warn!(
                "Refusing to add skill {} as child of {}: would create a cycle",
                child,
                parent
            );
            return Err(TreeOperationError::cyclic_reference(child, parent));
        }

        let node = self
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| TreeOperationError::node_not_found(parent))?;
        if !node.has_child(child) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Removes `child` from the children of `parent`
    ///
    /// Returns false (and logs) when the child was not there.
    pub fn remove_child(&mut self, parent: SkillId, child: SkillId) -> bool {
        let Some(node) = self.nodes.get_mut(&parent) else {
            tracing::warn!("Cannot remove child {} from missing skill {}", child, parent);
            return false;
        };

        let before = node.children.len();
        node.children.retain(|&id| id != child);
        if node.children.len() == before {
            tracing::debug!("Skill {} is not a child of {}, nothing removed", child, parent);
            return false;
        }
        true
    }

    /// Links a freshly registered node under `parent`
    ///
    /// Used while building the tree: the child is appended to the parent's
    /// children and its parent link is set in one step.
    pub(crate) fn link(&mut self, child: SkillId, parent: SkillId) -> Result<(), TreeOperationError> {
        self.add_child(parent, child)?;
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
            node.skill.parent_id = Some(parent);
        }
        Ok(())
    }

    /// Moves `node_id` below `new_parent` as one logical operation
    ///
    /// Every check runs before the first edit, so on error the node keeps its
    /// previous parent, position and `parent_id`. On success the node is in
    /// `new_parent`'s children, absent from the old parent's children, and its
    /// `parent_id` is `new_parent`.
    pub fn reparent(
        &mut self,
        node_id: SkillId,
        new_parent: SkillId,
    ) -> Result<(), TreeOperationError> {
        let old_parent = self
            .nodes
            .get(&node_id)
            .ok_or_else(|| TreeOperationError::node_not_found(node_id))?
            .parent;

        if self.is_root_id(node_id) {
            return Err(TreeOperationError::root_cannot_have_parent(node_id));
        }
        if !self.contains(new_parent) {
            return Err(TreeOperationError::orphan_parent(node_id, new_parent));
        }
        if old_parent == Some(new_parent) {
            return Ok(());
        }

        // set_parent validates before mutating; past this point nothing can fail.
        self.set_parent(node_id, new_parent)?;

        if let Some(old) = old_parent {
            self.remove_child(old, node_id);
        }
        if let Some(parent) = self.nodes.get_mut(&new_parent) {
            if !parent.has_child(node_id) {
                parent.children.push(node_id);
            }
        }

        tracing::debug!(
            "Reparented skill {} from {:?} to {}",
            node_id,
            old_parent,
            new_parent
        );
        Ok(())
    }

    /// Nodes from `stop`'s immediate child down to `id`, exclusive of `stop`
    ///
    /// `stop = None` means the root. The result is empty when `id` is the stop
    /// node or unknown. If the walk runs out of parents before reaching `stop`
    /// (an orphan branch), the path starts at the topmost node reached.
    pub fn path_to_ancestor(&self, id: SkillId, stop: Option<SkillId>) -> Vec<&SkillNode> {
        let stop = stop.or(self.root);
        let mut path = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(id);

        while let Some(current_id) = current {
            if Some(current_id) == stop || !visited.insert(current_id) {
                break;
            }
            let Some(node) = self.nodes.get(&current_id) else {
                break;
            };
            path.push(node);
            current = node.parent;
        }

        path.reverse();
        path
    }

    /// Ancestor ids from nearest to farthest
    ///
    /// Stops at the first repeated id so a corrupted cycle cannot loop forever.
    pub fn ancestor_ids(&self, id: SkillId) -> Vec<SkillId> {
        let mut ancestors = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut current = self.nodes.get(&id).and_then(|node| node.parent);

        while let Some(parent_id) = current {
            if !visited.insert(parent_id) {
                tracing::warn!("Cycle detected in ancestors of skill {} at {}", id, parent_id);
                break;
            }
            ancestors.push(parent_id);
            current = self.nodes.get(&parent_id).and_then(|node| node.parent);
        }

        ancestors
    }

    /// All descendants of `id` in pre-order, excluding `id`
    pub fn descendant_ids(&self, id: SkillId) -> Vec<SkillId> {
        let mut result = Vec::new();
        let mut visited = HashSet::from([id]);
        let mut stack: Vec<SkillId> = self
            .nodes
            .get(&id)
            .map(|node| node.children.iter().rev().copied().collect())
            .unwrap_or_default();

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }

        result
    }

    /// Nodes whose declared parent is not linked, sorted by id
    pub fn orphan_ids(&self) -> Vec<SkillId> {
        let mut orphans: Vec<SkillId> = self
            .nodes
            .values()
            .filter(|node| node.is_orphan())
            .map(SkillNode::id)
            .collect();
        orphans.sort_unstable();
        orphans
    }
}

#[cfg(test)]
#[path = "skill_tree_test.rs"]
mod skill_tree_test;
