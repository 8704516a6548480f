//! Skill Data Structures
//!
//! This module defines the flat `SkillRecord` persisted by the backing store and
//! the `SkillNode` vertex kept by the in-memory skill tree.
//!
//! # Architecture
//!
//! - **Flat records**: The store hands out an unordered list of records, each
//!   carrying its own `parent_id`
//! - **Id links**: Tree nodes reference their parent and children by `SkillId`,
//!   never by pointer, so the arena in `operations::SkillTree` owns every node
//! - **Soft delete**: `deleted` is a flag filtered at query time; deleted skills
//!   stay linked in the tree
//!
//! # Examples
//!
//! ```rust
//! use skilltree_core::models::{AccessClass, SkillRecord};
//!
//! let rust = SkillRecord::new(4, Some(2), "Rust")
//!     .with_description("Systems programming language")
//!     .with_groups(AccessClass::Full, [10, 11]);
//!
//! assert!(rust.rateable);
//! assert!(rust.groups(AccessClass::Full).contains(&10));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a skill, assigned by the backing store
pub type SkillId = i64;

/// Identifier of an access group
pub type GroupId = i64;

/// The three independent access classes a skill can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessClass {
    /// Read/write access to the skill
    Full,
    /// View-only access to the skill
    ReadOnly,
    /// Access to the trainings attached to the skill
    Training,
}

impl AccessClass {
    /// All access classes, in declaration order
    pub const ALL: [AccessClass; 3] = [AccessClass::Full, AccessClass::ReadOnly, AccessClass::Training];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessClass::Full => "full",
            AccessClass::ReadOnly => "read_only",
            AccessClass::Training => "training",
        }
    }
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A skill as stored by the backing store
///
/// # Fields
///
/// - `id`: Unique identifier from the store
/// - `parent_id`: Parent skill, `None` for the root
/// - `title`, `description`, `comment`: Free text, all searched by `SearchFilter`
/// - `rateable`: `false` for category-only skills
/// - `deleted`: Soft-delete flag
/// - `*_access_groups`: Groups declared directly on this skill for each access class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub id: SkillId,

    #[serde(default)]
    pub parent_id: Option<SkillId>,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub comment: String,

    #[serde(default = "default_rateable")]
    pub rateable: bool,

    #[serde(default)]
    pub deleted: bool,

    #[serde(default)]
    pub full_access_groups: BTreeSet<GroupId>,

    #[serde(default)]
    pub readonly_access_groups: BTreeSet<GroupId>,

    #[serde(default)]
    pub training_access_groups: BTreeSet<GroupId>,
}

fn default_rateable() -> bool {
    true
}

impl SkillRecord {
    /// Create a rateable, non-deleted record with no access groups
    pub fn new(id: SkillId, parent_id: Option<SkillId>, title: impl Into<String>) -> Self {
        Self {
            id,
            parent_id,
            title: title.into(),
            description: String::new(),
            comment: String::new(),
            rateable: true,
            deleted: false,
            full_access_groups: BTreeSet::new(),
            readonly_access_groups: BTreeSet::new(),
            training_access_groups: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Mark the skill as a category that cannot be rated
    pub fn category_only(mut self) -> Self {
        self.rateable = false;
        self
    }

    pub fn soft_deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Add groups for one access class
    pub fn with_groups(mut self, class: AccessClass, groups: impl IntoIterator<Item = GroupId>) -> Self {
        self.groups_mut(class).extend(groups);
        self
    }

    /// Groups declared directly on this record for `class`
    pub fn groups(&self, class: AccessClass) -> &BTreeSet<GroupId> {
        match class {
            AccessClass::Full => &self.full_access_groups,
            AccessClass::ReadOnly => &self.readonly_access_groups,
            AccessClass::Training => &self.training_access_groups,
        }
    }

    pub fn groups_mut(&mut self, class: AccessClass) -> &mut BTreeSet<GroupId> {
        match class {
            AccessClass::Full => &mut self.full_access_groups,
            AccessClass::ReadOnly => &mut self.readonly_access_groups,
            AccessClass::Training => &mut self.training_access_groups,
        }
    }

    /// Case-insensitive substring match over title, description and comment
    ///
    /// `needle_lower` must already be lowercased.
    pub fn text_contains(&self, needle_lower: &str) -> bool {
        [&self.title, &self.description, &self.comment]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lower))
    }
}

/// A vertex of the in-memory skill tree
///
/// `parent` and `children` are structural links owned by the tree, not part of
/// the persisted identity. After every successful mutation `parent` equals
/// `skill.parent_id`; a node whose declared parent could not be resolved keeps
/// `parent_id` and has no `parent` link (an orphan).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    pub skill: SkillRecord,

    /// Linked parent (relation and lookup only)
    pub parent: Option<SkillId>,

    /// Linked children in insertion order
    pub children: Vec<SkillId>,
}

impl SkillNode {
    /// Wrap a record in an unlinked node
    pub fn new(skill: SkillRecord) -> Self {
        Self {
            skill,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> SkillId {
        self.skill.id
    }

    pub fn title(&self) -> &str {
        &self.skill.title
    }

    pub fn is_deleted(&self) -> bool {
        self.skill.deleted
    }

    /// True when a parent is declared but not linked
    pub fn is_orphan(&self) -> bool {
        self.parent.is_none() && self.skill.parent_id.is_some()
    }

    pub fn has_child(&self, child: SkillId) -> bool {
        self.children.contains(&child)
    }

    /// Replace the node's own fields, keeping the structural links
    ///
    /// The parent declaration is left untouched; reparenting goes through the tree.
    pub(crate) fn update_fields(&mut self, record: SkillRecord) {
        let parent_id = self.skill.parent_id;
        self.skill = SkillRecord { parent_id, ..record };
    }
}

#[cfg(test)]
#[path = "skill_test.rs"]
mod skill_test;
