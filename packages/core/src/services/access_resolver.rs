//! Hierarchical access resolution
//!
//! A skill grants an access class to the groups declared on it and to every group
//! declared on any of its ancestors. Nothing is cached: each call walks the
//! parent links up to the root, so callers that check many skills in one request
//! should keep the result themselves.
//!
//! Administrative bypass is not handled here; callers holding an admin capability
//! skip the resolver.

use crate::models::{AccessClass, GroupId, SkillId};
use crate::operations::SkillTree;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Effective groups of one skill for all three access classes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveAccess {
    pub full: BTreeSet<GroupId>,
    pub read_only: BTreeSet<GroupId>,
    pub training: BTreeSet<GroupId>,
}

impl EffectiveAccess {
    pub fn groups(&self, class: AccessClass) -> &BTreeSet<GroupId> {
        match class {
            AccessClass::Full => &self.full,
            AccessClass::ReadOnly => &self.read_only,
            AccessClass::Training => &self.training,
        }
    }
}

/// Read-only access resolver over a borrowed tree
///
/// # Examples
///
/// ```rust,no_run
/// use skilltree_core::models::AccessClass;
/// use skilltree_core::services::{AccessResolver, SkillTreeCache};
///
/// # async fn example(cache: &SkillTreeCache) -> anyhow::Result<()> {
/// let tree = cache.tree().await?;
/// let resolver = AccessResolver::new(&tree);
/// if resolver.has_access(3, AccessClass::Full, &[1, 7]) {
///     println!("editable");
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccessResolver<'a> {
    tree: &'a SkillTree,
}

impl<'a> AccessResolver<'a> {
    pub fn new(tree: &'a SkillTree) -> Self {
        Self { tree }
    }

    /// Union of the skill's own groups for `class` and those of all its ancestors
    ///
    /// Unknown skills have no groups.
    pub fn effective_groups(&self, id: SkillId, class: AccessClass) -> BTreeSet<GroupId> {
        let Some(node) = self.tree.get(id) else {
            return BTreeSet::new();
        };

        let mut groups = node.skill.groups(class).clone();
        for ancestor_id in self.tree.ancestor_ids(id) {
            if let Some(ancestor) = self.tree.get(ancestor_id) {
                groups.extend(ancestor.skill.groups(class).iter().copied());
            }
        }
        groups
    }

    /// True iff one of `user_groups` is among the effective groups
    pub fn has_access(&self, id: SkillId, class: AccessClass, user_groups: &[GroupId]) -> bool {
        if user_groups.is_empty() {
            return false;
        }
        let effective = self.effective_groups(id, class);
        user_groups.iter().any(|group| effective.contains(group))
    }

    pub fn has_full_access(&self, id: SkillId, user_groups: &[GroupId]) -> bool {
        self.has_access(id, AccessClass::Full, user_groups)
    }

    pub fn has_readonly_access(&self, id: SkillId, user_groups: &[GroupId]) -> bool {
        self.has_access(id, AccessClass::ReadOnly, user_groups)
    }

    pub fn has_training_access(&self, id: SkillId, user_groups: &[GroupId]) -> bool {
        self.has_access(id, AccessClass::Training, user_groups)
    }

    /// Effective groups for every access class at once
    pub fn effective_access(&self, id: SkillId) -> EffectiveAccess {
        EffectiveAccess {
            full: self.effective_groups(id, AccessClass::Full),
            read_only: self.effective_groups(id, AccessClass::ReadOnly),
            training: self.effective_groups(id, AccessClass::Training),
        }
    }

    /// All skills on which `user_groups` hold `class` access, sorted by id
    ///
    /// Walks down from every unlinked node (the root and any orphan branch) and
    /// carries the grant to descendants, since effective groups only grow
    /// downwards.
    pub fn accessible_skills(&self, class: AccessClass, user_groups: &[GroupId]) -> Vec<SkillId> {
        let user_groups: HashSet<GroupId> = user_groups.iter().copied().collect();
        let mut accessible = Vec::new();
        if user_groups.is_empty() {
            return accessible;
        }

        let mut visited = HashSet::new();
        let mut stack: Vec<(SkillId, bool)> = self
            .tree
            .iter()
            .filter(|node| node.parent.is_none())
            .map(|node| (node.id(), false))
            .collect();

        while let Some((id, inherited)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(node) = self.tree.get(id) else {
                continue;
            };

            let granted = inherited
                || node
                    .skill
                    .groups(class)
                    .iter()
                    .any(|group| user_groups.contains(group));
            if granted {
                accessible.push(id);
            }
            stack.extend(node.children.iter().map(|&child| (child, granted)));
        }

        accessible.sort_unstable();
        accessible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SkillNode, SkillRecord};

    /// root(1) -> A(2, full {1}) -> B(3) -> C(4, full {2}); root -> D(5, training {9})
    fn chain() -> SkillTree {
        let mut tree = SkillTree::new();
        tree.register(SkillNode::new(SkillRecord::new(1, None, "root")));
        tree.set_root(1);

        let records = [
            SkillRecord::new(2, Some(1), "A").with_groups(AccessClass::Full, [1]),
            SkillRecord::new(3, Some(2), "B"),
            SkillRecord::new(4, Some(3), "C")
                .with_groups(AccessClass::Full, [2])
                .with_groups(AccessClass::ReadOnly, [5]),
            SkillRecord::new(5, Some(1), "D").with_groups(AccessClass::Training, [9]),
        ];
        for record in records {
            let (id, parent) = (record.id, record.parent_id.unwrap());
            tree.register(SkillNode::new(record));
            tree.link(id, parent).unwrap();
        }
        tree
    }

    #[test]
    fn test_effective_groups_union_over_ancestors() {
        let tree = chain();
        let resolver = AccessResolver::new(&tree);

        assert_eq!(
            resolver.effective_groups(4, AccessClass::Full),
            BTreeSet::from([1, 2])
        );
        assert_eq!(resolver.effective_groups(3, AccessClass::Full), BTreeSet::from([1]));
        assert!(resolver.effective_groups(1, AccessClass::Full).is_empty());
        assert!(resolver.effective_groups(404, AccessClass::Full).is_empty());
    }

    #[test]
    fn test_access_classes_are_independent() {
        let tree = chain();
        let resolver = AccessResolver::new(&tree);

        assert_eq!(
            resolver.effective_groups(4, AccessClass::ReadOnly),
            BTreeSet::from([5])
        );
        assert!(resolver.effective_groups(4, AccessClass::Training).is_empty());
        assert!(resolver.has_training_access(5, &[9]));
        assert!(!resolver.has_full_access(5, &[9]));
    }

    #[test]
    fn test_has_access_via_inherited_group() {
        let tree = chain();
        let resolver = AccessResolver::new(&tree);

        assert!(resolver.has_full_access(4, &[1]));
        assert!(resolver.has_full_access(4, &[2, 99]));
        assert!(!resolver.has_full_access(3, &[2]));
        assert!(!resolver.has_readonly_access(3, &[5]));
        assert!(!resolver.has_full_access(4, &[]));
    }

    #[test]
    fn test_duplicates_across_levels_collapse() {
        let mut tree = chain();
        tree.get_mut(3)
            .unwrap()
            .skill
            .groups_mut(AccessClass::Full)
            .extend([1, 2]);

        let resolver = AccessResolver::new(&tree);
        assert_eq!(
            resolver.effective_groups(4, AccessClass::Full),
            BTreeSet::from([1, 2])
        );
    }

    #[test]
    fn test_effective_access_all_classes() {
        let tree = chain();
        let access = AccessResolver::new(&tree).effective_access(4);

        assert_eq!(access.groups(AccessClass::Full), &BTreeSet::from([1, 2]));
        assert_eq!(access.read_only, BTreeSet::from([5]));
        assert!(access.training.is_empty());
    }

    #[test]
    fn test_accessible_skills_matches_has_access() {
        let tree = chain();
        let resolver = AccessResolver::new(&tree);

        let accessible = resolver.accessible_skills(AccessClass::Full, &[1]);
        assert_eq!(accessible, vec![2, 3, 4]);

        for id in [1, 2, 3, 4, 5] {
            assert_eq!(
                accessible.contains(&id),
                resolver.has_full_access(id, &[1]),
                "mismatch for skill {}",
                id
            );
        }

        assert_eq!(resolver.accessible_skills(AccessClass::Full, &[2]), vec![4]);
        assert!(resolver.accessible_skills(AccessClass::Full, &[]).is_empty());
    }
}
