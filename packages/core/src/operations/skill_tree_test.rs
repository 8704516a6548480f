//! Tests for SkillTree structural operations

use super::*;
use crate::models::SkillRecord;

/// root(1) -> Languages(2) -> {Java(3), Rust(4)}; root(1) -> Soft Skills(5)
fn sample_tree() -> SkillTree {
    let mut tree = SkillTree::new();
    tree.register(SkillNode::new(SkillRecord::new(1, None, "root")));
    tree.set_root(1);
    for (id, parent, title) in [
        (2, 1, "Languages"),
        (3, 2, "Java"),
        (4, 2, "Rust"),
        (5, 1, "Soft Skills"),
    ] {
        tree.register(SkillNode::new(SkillRecord::new(id, Some(parent), title)));
        tree.link(id, parent).unwrap();
    }
    tree
}

fn ids(nodes: &[&SkillNode]) -> Vec<SkillId> {
    nodes.iter().map(|node| node.id()).collect()
}

#[test]
fn test_link_builds_parent_and_children() {
    let tree = sample_tree();

    assert_eq!(tree.root_id(), Some(1));
    assert_eq!(tree.get(1).unwrap().children, vec![2, 5]);
    assert_eq!(tree.get(2).unwrap().children, vec![3, 4]);
    assert_eq!(tree.parent_of(3).unwrap().id(), 2);
    assert_eq!(ids(&tree.children_of(2)), vec![3, 4]);
}

#[test]
fn test_is_ancestor_of() {
    let tree = sample_tree();

    assert!(tree.is_ancestor_of(1, 3));
    assert!(tree.is_ancestor_of(2, 4));
    assert!(!tree.is_ancestor_of(3, 2));
    assert!(!tree.is_ancestor_of(5, 3));
    assert!(!tree.is_ancestor_of(3, 3));
    assert!(!tree.is_ancestor_of(42, 3));
}

#[test]
fn test_set_parent_rejects_self() {
    let mut tree = sample_tree();

    let err = tree.set_parent(2, 2).unwrap_err();
    assert_eq!(err, TreeOperationError::cyclic_reference(2, 2));
}

#[test]
fn test_set_parent_rejects_descendant() {
    let mut tree = sample_tree();

    let err = tree.set_parent(2, 3).unwrap_err();
    assert!(err.is_cyclic_reference());
    assert_eq!(tree.get(2).unwrap().parent, Some(1));
    assert_eq!(tree.get(2).unwrap().skill.parent_id, Some(1));
}

#[test]
fn test_set_parent_does_not_touch_children() {
    let mut tree = sample_tree();

    tree.set_parent(3, 5).unwrap();

    let java = tree.get(3).unwrap();
    assert_eq!(java.parent, Some(5));
    assert_eq!(java.skill.parent_id, Some(5));
    assert!(tree.get(2).unwrap().has_child(3));
    assert!(!tree.get(5).unwrap().has_child(3));
}

#[test]
fn test_add_child_refuses_cycles_and_duplicates() {
    let mut tree = sample_tree();

    assert!(tree.add_child(3, 1).unwrap_err().is_cyclic_reference());
    assert!(tree.add_child(4, 4).unwrap_err().is_cyclic_reference());

    tree.add_child(2, 3).unwrap();
    assert_eq!(tree.get(2).unwrap().children, vec![3, 4]);
}

#[test]
fn test_remove_child_missing_is_noop() {
    let mut tree = sample_tree();

    assert!(!tree.remove_child(5, 3));
    assert!(!tree.remove_child(99, 3));
    assert!(tree.remove_child(2, 3));
    assert_eq!(tree.get(2).unwrap().children, vec![4]);
}

#[test]
fn test_reparent_moves_between_children_lists() {
    let mut tree = sample_tree();

    tree.reparent(4, 5).unwrap();

    assert!(tree.get(5).unwrap().has_child(4));
    assert!(!tree.get(2).unwrap().has_child(4));
    assert_eq!(tree.get(4).unwrap().skill.parent_id, Some(5));
    assert_eq!(tree.get(4).unwrap().parent, Some(5));
}

#[test]
fn test_reparent_failure_leaves_tree_untouched() {
    let mut tree = sample_tree();
    let before = tree.clone();

    assert!(tree.reparent(2, 4).unwrap_err().is_cyclic_reference());
    assert_eq!(tree, before);

    assert_eq!(
        tree.reparent(3, 77).unwrap_err(),
        TreeOperationError::orphan_parent(3, 77)
    );
    assert_eq!(tree, before);

    assert_eq!(
        tree.reparent(1, 5).unwrap_err(),
        TreeOperationError::root_cannot_have_parent(1)
    );
    assert_eq!(tree, before);
}

#[test]
fn test_reparent_to_same_parent_is_noop() {
    let mut tree = sample_tree();
    let before = tree.clone();

    tree.reparent(3, 2).unwrap();
    assert_eq!(tree, before);
}

#[test]
fn test_path_to_root_excludes_root() {
    let tree = sample_tree();

    assert_eq!(ids(&tree.path_to_ancestor(3, None)), vec![2, 3]);
    assert_eq!(ids(&tree.path_to_ancestor(5, None)), vec![5]);
    assert!(tree.path_to_ancestor(1, None).is_empty());
}

#[test]
fn test_path_to_explicit_ancestor() {
    let tree = sample_tree();

    assert_eq!(ids(&tree.path_to_ancestor(4, Some(2))), vec![4]);
    assert!(tree.path_to_ancestor(2, Some(2)).is_empty());
    assert!(tree.path_to_ancestor(404, None).is_empty());
}

#[test]
fn test_ancestor_ids_nearest_first() {
    let tree = sample_tree();

    assert_eq!(tree.ancestor_ids(4), vec![2, 1]);
    assert!(tree.ancestor_ids(1).is_empty());
}

#[test]
fn test_ancestor_ids_terminates_on_corrupt_cycle() {
    let mut tree = sample_tree();
    // Corrupt the arena directly, bypassing the cycle guards.
    tree.get_mut(2).unwrap().parent = Some(3);

    let ancestors = tree.ancestor_ids(3);
    assert_eq!(ancestors, vec![2]);

    let path = tree.path_to_ancestor(3, None);
    assert_eq!(ids(&path), vec![2, 3]);
}

#[test]
fn test_descendant_ids_pre_order() {
    let tree = sample_tree();

    assert_eq!(tree.descendant_ids(1), vec![2, 3, 4, 5]);
    assert!(tree.descendant_ids(4).is_empty());
}

#[test]
fn test_orphan_ids() {
    let mut tree = sample_tree();
    tree.register(SkillNode::new(SkillRecord::new(9, Some(99), "Lost")));
    tree.register(SkillNode::new(SkillRecord::new(8, Some(98), "Also lost")));

    assert_eq!(tree.orphan_ids(), vec![8, 9]);
    assert_eq!(ids(&tree.path_to_ancestor(9, None)), vec![9]);
}

#[test]
fn test_clear() {
    let mut tree = sample_tree();
    tree.clear();

    assert!(tree.is_empty());
    assert!(tree.root().is_none());
}
