//! Data Models
//!
//! This module contains the core data structures used throughout SkillTree:
//!
//! - `SkillRecord` - Flat skill record as provided by the backing store
//! - `SkillNode` - Tree vertex wrapping a record with parent/children links
//! - `AccessClass` - The three access classes a skill can grant

mod skill;

pub use skill::{AccessClass, GroupId, SkillId, SkillNode, SkillRecord};
