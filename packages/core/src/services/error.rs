//! Service Layer Error Types
//!
//! Errors returned by `SkillTreeCache`. Structural violations come from the
//! operations layer unchanged; backing-store failures are propagated as-is and
//! never retried here.

use crate::operations::TreeOperationError;
use thiserror::Error;

/// Skill tree service errors
#[derive(Error, Debug)]
pub enum SkillTreeError {
    /// A structural rule of the tree was violated
    #[error("Skill tree operation failed: {0}")]
    Operation(#[from] TreeOperationError),

    /// The backing store failed to load or insert
    #[error("Skill store operation failed: {0}")]
    Store(#[from] anyhow::Error),

    /// The tree has no root after a refresh
    #[error("Skill tree has no root")]
    MissingRoot,
}

impl SkillTreeError {
    /// True if the failure was a refused cyclic parent/child link
    pub fn is_cyclic_reference(&self) -> bool {
        matches!(self, Self::Operation(err) if err.is_cyclic_reference())
    }

    /// The structural error, if this is one
    pub fn as_operation(&self) -> Option<&TreeOperationError> {
        match self {
            Self::Operation(err) => Some(err),
            _ => None,
        }
    }
}
