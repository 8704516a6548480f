//! Search visibility filtering
//!
//! Decides, per skill, whether a tree view filtered by a search string shows it.
//! The tree itself is never modified.
//!
//! A skill is visible when
//! 1. its own title, description or comment contains the search string
//!    (case-insensitive), or one of its descendants does, or
//! 2. one of its strict ancestors other than the root has already been found
//!    matching in this session,
//!
//! and it is not soft-deleted (unless deleted skills are shown). A blank search
//! reduces visibility to the delete rule.
//!
//! Every skill found matching in step 1, whether by its own text or through a
//! descendant, is recorded in `matched`. Step 2 only consults what is recorded,
//! so evaluating a category before its children makes the siblings of a match
//! visible; a top-down walk such as `visible_tree` relies on this.
//!
//! Subtree results are memoized per `SearchFilter`, so evaluating siblings that
//! share ancestors does not repeat substring scans. Call `reset_match()` (or
//! build a new filter) before each pass.

use crate::models::SkillId;
use crate::operations::SkillTree;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// One row of a filtered tree view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibleSkill {
    pub id: SkillId,
    pub title: String,
    /// Distance from the first listed level
    pub depth: usize,
    /// The skill's own text contains the search string
    pub is_match: bool,
}

/// One search session over a borrowed tree
pub struct SearchFilter<'a> {
    tree: &'a SkillTree,
    /// Lowercased search string, `None` when blank
    needle: Option<String>,
    show_deleted: bool,
    /// Skills found matching by themselves or through a descendant
    matched: HashSet<SkillId>,
    /// Self-or-descendant match per visited skill
    visibility_memo: HashMap<SkillId, bool>,
}

impl<'a> SearchFilter<'a> {
    pub fn new(tree: &'a SkillTree, search: &str, show_deleted: bool) -> Self {
        let needle = (!search.trim().is_empty()).then(|| search.to_lowercase());

        Self {
            tree,
            needle,
            show_deleted,
            matched: HashSet::new(),
            visibility_memo: HashMap::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    /// Forget all memoized results
    pub fn reset_match(&mut self) {
        self.matched.clear();
        self.visibility_memo.clear();
    }

    /// Whether the skill is visible under this search
    pub fn matches(&mut self, id: SkillId) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };

        if node.is_deleted() && !self.show_deleted {
            return false;
        }
        if self.needle.is_none() {
            return true;
        }

        self.subtree_matches(id) || self.has_matching_ancestor(id)
    }

    /// Whether the skill's own text contains the search string
    pub fn is_self_match(&self, id: SkillId) -> bool {
        match (self.needle.as_deref(), self.tree.get(id)) {
            (Some(needle), Some(node)) => node.skill.text_contains(needle),
            _ => false,
        }
    }

    /// Skills recorded as matching so far, by their own text or a descendant's
    pub fn matched(&self) -> &HashSet<SkillId> {
        &self.matched
    }

    /// Bottom-up self-or-descendant match, memoized
    fn subtree_matches(&mut self, id: SkillId) -> bool {
        if let Some(&known) = self.visibility_memo.get(&id) {
            return known;
        }
        // Provisional entry keeps a corrupt cycle from recursing forever.
        self.visibility_memo.insert(id, false);

        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return false;
        };

        let needle = self.needle.as_deref().unwrap_or_default();
        let result = node.skill.text_contains(needle)
            || node.children.iter().any(|&child| self.subtree_matches(child));

        if result {
            self.matched.insert(id);
        }
        self.visibility_memo.insert(id, result);
        result
    }

    /// Whether a strict ancestor below the root is already recorded as matching
    ///
    /// Ancestors not evaluated yet in this session do not count.
    fn has_matching_ancestor(&self, id: SkillId) -> bool {
        self.tree
            .ancestor_ids(id)
            .into_iter()
            .filter(|&ancestor_id| !self.tree.is_root_id(ancestor_id))
            .any(|ancestor_id| self.matched.contains(&ancestor_id))
    }

    /// Pre-order rows of the filtered tree view
    ///
    /// Resets the session first. With `include_root` the root is the first row at
    /// depth 0; otherwise the root's children start at depth 0. A hidden skill
    /// hides its whole subtree.
    pub fn visible_tree(&mut self, include_root: bool) -> Vec<VisibleSkill> {
        self.reset_match();

        let tree = self.tree;
        let Some(root) = tree.root() else {
            return Vec::new();
        };

        let mut rows = Vec::new();
        let mut stack: Vec<(SkillId, usize)> = Vec::new();

        if include_root {
            if !self.matches(root.id()) {
                return rows;
            }
            stack.push((root.id(), 0));
        } else {
            stack.extend(root.children.iter().rev().map(|&child| (child, 0)));
        }

        let mut visited = HashSet::new();
        while let Some((id, depth)) = stack.pop() {
            if !visited.insert(id) || !self.matches(id) {
                continue;
            }
            let Some(node) = tree.get(id) else {
                continue;
            };

            rows.push(VisibleSkill {
                id,
                title: node.skill.title.clone(),
                depth,
                is_match: self.is_self_match(id),
            });
            stack.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        }

        rows
    }
}

#[cfg(test)]
#[path = "search_filter_test.rs"]
mod search_filter_test;
