//! Tests for SkillRecord and SkillNode

use super::*;
use serde_json::json;

#[test]
fn test_record_defaults() {
    let record = SkillRecord::new(1, None, "Root");
    assert!(record.rateable);
    assert!(!record.deleted);
    assert!(record.description.is_empty());
    for class in AccessClass::ALL {
        assert!(record.groups(class).is_empty());
    }
}

#[test]
fn test_category_only_is_not_rateable() {
    let record = SkillRecord::new(2, Some(1), "Languages").category_only();
    assert!(!record.rateable);
}

#[test]
fn test_groups_per_class_are_independent() {
    let record = SkillRecord::new(3, Some(1), "Java")
        .with_groups(AccessClass::Full, [1, 2])
        .with_groups(AccessClass::Training, [7]);

    assert_eq!(record.groups(AccessClass::Full).len(), 2);
    assert!(record.groups(AccessClass::ReadOnly).is_empty());
    assert!(record.groups(AccessClass::Training).contains(&7));
}

#[test]
fn test_text_contains_checks_all_text_fields() {
    let record = SkillRecord::new(3, Some(1), "JVM")
        .with_description("Runs Kotlin and Scala")
        .with_comment("Ask the platform team");

    assert!(record.text_contains("jvm"));
    assert!(record.text_contains("kotlin"));
    assert!(record.text_contains("platform"));
    assert!(!record.text_contains("rust"));
}

#[test]
fn test_record_deserialization_uses_defaults() {
    let record: SkillRecord = serde_json::from_value(json!({
        "id": 5,
        "parentId": 1,
        "title": "Go",
        "readonlyAccessGroups": [3, 3, 4]
    }))
    .unwrap();

    assert_eq!(record.parent_id, Some(1));
    assert!(record.rateable);
    assert!(!record.deleted);
    assert_eq!(record.readonly_access_groups.len(), 2);
}

#[test]
fn test_record_serialization_is_camel_case() {
    let record = SkillRecord::new(9, None, "Root").soft_deleted();
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["parentId"], serde_json::Value::Null);
    assert_eq!(value["deleted"], true);
    assert!(value.get("fullAccessGroups").is_some());
}

#[test]
fn test_access_class_serialization() {
    assert_eq!(serde_json::to_value(AccessClass::ReadOnly).unwrap(), json!("read_only"));
    assert_eq!(AccessClass::Training.to_string(), "training");
}

#[test]
fn test_update_fields_keeps_parent_declaration() {
    let mut node = SkillNode::new(SkillRecord::new(4, Some(2), "Rust"));
    node.parent = Some(2);

    node.update_fields(SkillRecord::new(4, Some(3), "Rust 2021").with_comment("edition"));

    assert_eq!(node.title(), "Rust 2021");
    assert_eq!(node.skill.comment, "edition");
    assert_eq!(node.skill.parent_id, Some(2));
    assert_eq!(node.parent, Some(2));
}

#[test]
fn test_orphan_detection() {
    let node = SkillNode::new(SkillRecord::new(8, Some(99), "Lost"));
    assert!(node.is_orphan());

    let root = SkillNode::new(SkillRecord::new(1, None, "Root"));
    assert!(!root.is_orphan());
}
