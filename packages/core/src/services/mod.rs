//! Business Services
//!
//! This module contains the services built on top of the skill tree arena:
//!
//! - `SkillTreeCache` - Lazily refreshed, incrementally updated tree over a `SkillStore`
//! - `AccessResolver` - Effective access groups inherited down the hierarchy
//! - `SearchFilter` - Memoized search visibility for tree views
//! - `SkillTreeConfig` - Cache settings
//!
//! `AccessResolver` and `SearchFilter` borrow a tree obtained from
//! `SkillTreeCache::tree()` and never mutate it.

pub mod access_resolver;
pub mod config;
pub mod error;
pub mod search_filter;
pub mod tree_cache;

pub use access_resolver::{AccessResolver, EffectiveAccess};
pub use config::SkillTreeConfig;
pub use error::SkillTreeError;
pub use search_filter::{SearchFilter, VisibleSkill};
pub use tree_cache::{CacheStats, SkillTreeCache, TreeGuard};
