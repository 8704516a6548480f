//! SkillStore Trait - Backing Store Abstraction
//!
//! `SkillTreeCache` never talks to a database directly. It needs exactly three
//! things from persistence, and this trait names them:
//!
//! 1. The full flat record list, for a rebuild
//! 2. A single-record insert, used only to synthesize a missing root
//! 3. The time of the last mutation, for staleness detection
//!
//! # Design Decisions
//!
//! - **Async-First**: Backends may be embedded or remote
//! - **Error Handling**: `anyhow::Result`, so each backend keeps its own error type;
//!   the cache propagates these failures without retrying
//! - **Write path outside**: Updates and soft deletes are written by the caller's
//!   persistence layer, which then informs the cache via `insert_node`/`upsert_node`
//!
//! # Examples
//!
//! ```rust,no_run
//! use skilltree_core::db::{InMemorySkillStore, SkillStore};
//! use skilltree_core::clock::SystemClock;
//! use skilltree_core::models::SkillRecord;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store: Arc<dyn SkillStore> = Arc::new(InMemorySkillStore::new(Arc::new(SystemClock)));
//!     let id = store.insert(SkillRecord::new(0, None, "Skills")).await?;
//!     assert_eq!(store.load_all().await?.len(), 1);
//!     println!("root id: {}", id);
//!     Ok(())
//! }
//! ```

use crate::models::{SkillId, SkillRecord};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence collaborator of the skill tree cache
///
/// Implementations must be `Send + Sync`; the cache holds them behind an `Arc`
/// and calls them from async tasks.
#[async_trait]
pub trait SkillStore: Send + Sync {
    /// Load every skill record, in no particular order
    ///
    /// Soft-deleted records are included; filtering happens at query time.
    async fn load_all(&self) -> Result<Vec<SkillRecord>>;

    /// Insert a record and return its id
    ///
    /// A record id of `0` asks the store to allocate one.
    async fn insert(&self, record: SkillRecord) -> Result<SkillId>;

    /// Time of the most recent mutation, `None` if the store was never written
    async fn last_modified(&self) -> Result<Option<DateTime<Utc>>>;
}
