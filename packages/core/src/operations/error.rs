//! Error types for structural skill tree operations
//!
//! These errors describe tree-integrity violations detected by `SkillTree`.
//! Some of them are recoverable when they come out of a full refresh (a duplicate
//! root is grafted, an orphan is left unlinked); the cache logs those instead of
//! failing the whole rebuild.

use crate::models::SkillId;
use thiserror::Error;

/// Errors that can occur while linking or relinking skill tree nodes
///
/// # Examples
///
/// ```rust
/// use skilltree_core::operations::TreeOperationError;
///
/// let err = TreeOperationError::cyclic_reference(3, 5);
/// assert!(err.is_cyclic_reference());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeOperationError {
    /// Attaching `node_id` below `parent_id` would make the node its own ancestor
    #[error("Cyclic reference: skill {node_id} cannot be placed under skill {parent_id}")]
    CyclicReference { node_id: SkillId, parent_id: SkillId },

    /// The declared parent of a skill is not in the tree
    #[error("Parent skill {parent_id} of skill {node_id} does not exist")]
    OrphanParent { node_id: SkillId, parent_id: SkillId },

    /// A second parentless skill was found while a root already exists
    #[error("Skill {duplicate_id} has no parent but skill {root_id} is already the root")]
    DuplicateRoot { root_id: SkillId, duplicate_id: SkillId },

    /// The root skill cannot be moved below another skill
    #[error("Root skill {node_id} cannot have a parent")]
    RootCannotHaveParent { node_id: SkillId },

    /// Referenced skill does not exist in the tree
    #[error("Skill {node_id} does not exist")]
    NodeNotFound { node_id: SkillId },
}

impl TreeOperationError {
    pub fn cyclic_reference(node_id: SkillId, parent_id: SkillId) -> Self {
        Self::CyclicReference { node_id, parent_id }
    }

    pub fn orphan_parent(node_id: SkillId, parent_id: SkillId) -> Self {
        Self::OrphanParent { node_id, parent_id }
    }

    pub fn duplicate_root(root_id: SkillId, duplicate_id: SkillId) -> Self {
        Self::DuplicateRoot {
            root_id,
            duplicate_id,
        }
    }

    pub fn root_cannot_have_parent(node_id: SkillId) -> Self {
        Self::RootCannotHaveParent { node_id }
    }

    pub fn node_not_found(node_id: SkillId) -> Self {
        Self::NodeNotFound { node_id }
    }

    pub fn is_cyclic_reference(&self) -> bool {
        matches!(self, Self::CyclicReference { .. })
    }

    /// Anomalies that a refresh logs and survives
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OrphanParent { .. } | Self::DuplicateRoot { .. } | Self::CyclicReference { .. }
        )
    }
}
