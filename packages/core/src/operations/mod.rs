//! Skill Tree Operations
//!
//! This module holds the in-memory skill hierarchy and its structural rules:
//!
//! - `SkillTree` - Id-keyed arena with cycle-safe link, unlink and reparent operations
//! - `TreeOperationError` - Structural violations (cycles, orphans, duplicate roots)
//!
//! The arena has no locking of its own; `services::SkillTreeCache` serializes
//! writers around it.

mod error;
mod skill_tree;

pub use error::TreeOperationError;
pub use skill_tree::SkillTree;
