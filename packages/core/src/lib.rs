//! SkillTree Core
//!
//! This crate keeps the hierarchical skill catalog in memory and answers the
//! questions the rest of the application asks about it: where a skill sits, who
//! may see or edit it, and which skills a search shows.
//!
//! # Architecture
//!
//! - **Arena tree**: Skills live in an id-keyed map, links are ids
//! - **Lazy cache**: Rebuilt from a `SkillStore` when its mutation stamp moves,
//!   patched incrementally after single writes
//! - **Inherited access**: Effective groups are the union along the path to the root
//! - **Memoized search**: Subtree matches computed once per search session
//!
//! # Modules
//!
//! - [`models`] - Skill records and tree nodes
//! - [`operations`] - The tree arena and its structural rules
//! - [`services`] - Cache, access resolution and search filtering
//! - [`db`] - Backing store trait and in-memory implementation
//! - [`clock`] - Injectable time sources
//!
//! # Examples
//!
//! ```rust,no_run
//! use skilltree_core::clock::SystemClock;
//! use skilltree_core::db::InMemorySkillStore;
//! use skilltree_core::models::{AccessClass, SkillRecord};
//! use skilltree_core::services::SkillTreeCache;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let clock = Arc::new(SystemClock);
//!     let store = Arc::new(InMemorySkillStore::with_records(
//!         vec![
//!             SkillRecord::new(1, None, "root"),
//!             SkillRecord::new(2, Some(1), "Languages").with_groups(AccessClass::Full, [10]),
//!             SkillRecord::new(3, Some(2), "Rust"),
//!         ],
//!         clock.clone(),
//!     ));
//!
//!     let cache = SkillTreeCache::with_clock(store, clock);
//!     assert!(cache.has_access(3, AccessClass::Full, &[10]).await?);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod db;
pub mod logging;
pub mod models;
pub mod operations;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use operations::{SkillTree, TreeOperationError};
pub use services::*;
