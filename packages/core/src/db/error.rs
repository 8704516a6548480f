//! Database Error Types
//!
//! Errors raised by the bundled `InMemorySkillStore`. Real persistence backends
//! report their own errors through the `anyhow::Result` of the `SkillStore` trait.

use crate::models::SkillId;
use thiserror::Error;

/// Skill store operation errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A record with this id is already stored
    #[error("Skill {id} already exists")]
    DuplicateId { id: SkillId },

    /// No record with this id is stored
    #[error("Skill {id} not found")]
    NotFound { id: SkillId },

    /// Records could not be decoded
    #[error("Failed to decode skill records: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DatabaseError {
    /// Create a duplicate id error
    pub fn duplicate_id(id: SkillId) -> Self {
        Self::DuplicateId { id }
    }

    /// Create a not found error
    pub fn not_found(id: SkillId) -> Self {
        Self::NotFound { id }
    }
}
