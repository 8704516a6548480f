//! Database Layer
//!
//! This module defines what the skill tree needs from persistence:
//!
//! - `SkillStore` - Async trait for loading records, inserting a record and
//!   reporting the last mutation time
//! - `InMemorySkillStore` - Complete in-process implementation
//! - `DatabaseError` - Errors raised by the in-memory store
//!
//! Relational backends live outside this crate and implement `SkillStore`.

mod error;
mod memory_store;
mod skill_store;

pub use error::DatabaseError;
pub use memory_store::InMemorySkillStore;
pub use skill_store::SkillStore;
