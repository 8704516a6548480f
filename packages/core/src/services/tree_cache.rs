//! Skill Tree Cache
//!
//! The single authoritative in-memory view of the skill hierarchy, built from the
//! flat record list of a `SkillStore`.
//!
//! # Architecture
//!
//! The cache owns a `SkillTree` arena behind one `tokio::sync::RwLock`:
//! - **Readers** (`root_node`, `node_by_id`, `tree`, ...) take the read lock
//! - **Writers** (`refresh`, `insert_node`, `upsert_node`, `clear`) hold the write
//!   lock for their whole tree surgery, so nobody observes a node missing from
//!   both its old and new parent, or present in both
//!
//! # Cache Invalidation
//!
//! Every accessor checks staleness first:
//! - **Mutation stamp**: the store's `last_modified` is newer than the stamp the
//!   last build observed
//! - **Event-driven**: `invalidate()` sets a flag honoured on next access
//! - **Time-based** (optional): `max_staleness_secs` from `SkillTreeConfig`
//!
//! A stale cache is rebuilt under the write lock; the check is repeated after the
//! lock is acquired so concurrent readers trigger a single rebuild.
//!
//! Incremental `insert_node`/`upsert_node` calls mirror a store write that the
//! caller already committed, and mark that write as seen so it does not force a
//! full rebuild.

use crate::clock::{Clock, SystemClock};
use crate::db::SkillStore;
use crate::models::{AccessClass, GroupId, SkillId, SkillNode, SkillRecord};
use crate::operations::{SkillTree, TreeOperationError};
use crate::services::{AccessResolver, SearchFilter, SkillTreeConfig, SkillTreeError, VisibleSkill};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Read access to the cached tree, held for as long as the guard lives
///
/// Do not call back into the cache while holding one; writers wait for it.
pub type TreeGuard<'a> = RwLockReadGuard<'a, SkillTree>;

#[derive(Debug, Default)]
struct CacheState {
    tree: SkillTree,
    /// Store mutation stamp covered by the cached tree
    seen_modification: Option<DateTime<Utc>>,
    /// Clock time of the last full build
    last_built_at: Option<DateTime<Utc>>,
    /// Recoverable anomalies from the last build and later inserts
    anomalies: Vec<TreeOperationError>,
}

/// Cache statistics (for debugging/monitoring)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub node_count: usize,
    pub orphan_count: usize,
    pub anomaly_count: usize,
    pub root_id: Option<SkillId>,
    pub last_built_at: Option<DateTime<Utc>>,
    pub is_stale: bool,
}

/// Lazily refreshed, incrementally updated skill tree
pub struct SkillTreeCache {
    state: RwLock<CacheState>,
    store: Arc<dyn SkillStore>,
    clock: Arc<dyn Clock>,
    config: SkillTreeConfig,
    invalidated: AtomicBool,
}

impl SkillTreeCache {
    /// Create a cache over `store` using the wall clock and default settings
    ///
    /// The cache starts empty and is built on first access.
    pub fn new(store: Arc<dyn SkillStore>) -> Self {
        Self::with_config(store, Arc::new(SystemClock), SkillTreeConfig::default())
    }

    /// Create a cache with an injected clock (primarily for testing)
    pub fn with_clock(store: Arc<dyn SkillStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_config(store, clock, SkillTreeConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn SkillStore>,
        clock: Arc<dyn Clock>,
        config: SkillTreeConfig,
    ) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            store,
            clock,
            config,
            invalidated: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SkillTreeConfig {
        &self.config
    }

    // =========================================================================
    // Read access
    // =========================================================================

    /// Fresh read access to the whole tree
    ///
    /// This is the entry point for `AccessResolver` and `SearchFilter`.
    pub async fn tree(&self) -> Result<TreeGuard<'_>, SkillTreeError> {
        self.ensure_fresh().await?;
        let state = self.state.read().await;
        Ok(RwLockReadGuard::map(state, |state| &state.tree))
    }

    /// The root skill, refreshing first if stale
    pub async fn root_node(&self) -> Result<SkillNode, SkillTreeError> {
        let tree = self.tree().await?;
        let root = tree.root().cloned();
        root.ok_or(SkillTreeError::MissingRoot)
    }

    /// A skill by id, `None` if the tree does not contain it
    pub async fn node_by_id(&self, id: SkillId) -> Result<Option<SkillNode>, SkillTreeError> {
        let tree = self.tree().await?;
        let node = tree.get(id).cloned();
        Ok(node)
    }

    /// Skills from just below the root down to `id` (root excluded)
    pub async fn path_to_root(&self, id: SkillId) -> Result<Vec<SkillNode>, SkillTreeError> {
        let tree = self.tree().await?;
        let path = tree.path_to_ancestor(id, None).into_iter().cloned().collect();
        Ok(path)
    }

    /// Whether `record` is the root skill
    ///
    /// Before any root is known a parentless record is provisionally the root.
    /// Never triggers a refresh.
    pub async fn is_root(&self, record: &SkillRecord) -> bool {
        let state = self.state.read().await;
        match state.tree.root_id() {
            Some(root_id) => record.id == root_id,
            None => record.parent_id.is_none(),
        }
    }

    /// Effective groups of a skill for one access class
    pub async fn effective_groups(
        &self,
        id: SkillId,
        class: AccessClass,
    ) -> Result<BTreeSet<GroupId>, SkillTreeError> {
        let tree = self.tree().await?;
        let groups = AccessResolver::new(&tree).effective_groups(id, class);
        Ok(groups)
    }

    /// Whether any of `user_groups` grants `class` access to a skill
    pub async fn has_access(
        &self,
        id: SkillId,
        class: AccessClass,
        user_groups: &[GroupId],
    ) -> Result<bool, SkillTreeError> {
        let tree = self.tree().await?;
        let granted = AccessResolver::new(&tree).has_access(id, class, user_groups);
        Ok(granted)
    }

    /// Pre-order list of skills visible for a search
    pub async fn visible_tree(
        &self,
        search: &str,
        show_deleted: bool,
        include_root: bool,
    ) -> Result<Vec<VisibleSkill>, SkillTreeError> {
        let tree = self.tree().await?;
        let visible = SearchFilter::new(&tree, search, show_deleted).visible_tree(include_root);
        Ok(visible)
    }

    // =========================================================================
    // Incremental updates
    // =========================================================================

    /// Add a skill that was just persisted
    ///
    /// A missing `parent_id` attaches the skill to the current root (unless it is
    /// the root). An unknown parent is logged and leaves the skill unlinked. A
    /// skill already in the tree is handled as `upsert_node`.
    ///
    /// Call this right after the store write it mirrors. The store's current
    /// mutation stamp is then treated as seen, so any other write that reached
    /// the store in between is not picked up until the stamp moves again,
    /// `invalidate()` is called, or `max_staleness_secs` expires.
    pub async fn insert_node(&self, record: SkillRecord) -> Result<(), SkillTreeError> {
        let mut state = self.state.write().await;

        if state.tree.contains(record.id) {
            tracing::debug!("Skill {} already cached, updating instead", record.id);
            Self::apply_upsert(&mut state.tree, record)?;
        } else {
            Self::apply_insert(&mut state, record)?;
        }

        self.acknowledge_write(&mut state).await
    }

    /// Apply an update of a persisted skill
    ///
    /// Unknown skills are inserted. When the new `parent_id` differs from the
    /// currently linked parent, the skill moves between the two children lists
    /// as one step: on error it keeps its previous position and fields. An
    /// orphan whose parent has since been cached is linked under it.
    ///
    /// The same mirrored-write rule as `insert_node` applies: other store writes
    /// made between the caller's write and this call stay unseen until the
    /// stamp moves again, `invalidate()` is called, or the TTL expires.
    pub async fn upsert_node(&self, record: SkillRecord) -> Result<(), SkillTreeError> {
        let mut state = self.state.write().await;

        if state.tree.contains(record.id) {
            Self::apply_upsert(&mut state.tree, record)?;
        } else {
            Self::apply_insert(&mut state, record)?;
        }

        self.acknowledge_write(&mut state).await
    }

    fn apply_insert(state: &mut CacheState, record: SkillRecord) -> Result<(), SkillTreeError> {
        let id = record.id;
        let declared = record.parent_id;

        if declared == Some(id) {
            return Err(TreeOperationError::cyclic_reference(id, id).into());
        }

        let tree = &mut state.tree;
        let becomes_root = match tree.root_id() {
            Some(root_id) => root_id == id,
            None => declared.is_none(),
        };

        tree.register(SkillNode::new(record));

        if becomes_root {
            tree.set_root(id);
            tracing::info!("Skill {} established as root", id);
            return Ok(());
        }

        let Some(parent_id) = declared.or(tree.root_id()) else {
            return Ok(());
        };

        if !tree.contains(parent_id) {
            let anomaly = TreeOperationError::orphan_parent(id, parent_id);
            tracing::warn!("{}; skill left unlinked", anomaly);
            state.anomalies.push(anomaly);
            return Ok(());
        }

        tree.link(id, parent_id)?;
        tracing::debug!("Inserted skill {} under {}", id, parent_id);
        Ok(())
    }

    fn apply_upsert(tree: &mut SkillTree, record: SkillRecord) -> Result<(), SkillTreeError> {
        let id = record.id;
        let node = tree
            .get(id)
            .ok_or_else(|| TreeOperationError::node_not_found(id))?;
        let linked = node.parent;
        let declared = node.skill.parent_id;

        let target = match record.parent_id {
            Some(parent_id) => Some(parent_id),
            None if tree.is_root_id(id) => None,
            None => tree.root_id(),
        };

        if target != linked {
            if let Some(parent_id) = target {
                let still_missing = linked.is_none()
                    && declared == Some(parent_id)
                    && !tree.contains(parent_id);

                if still_missing {
                    tracing::debug!(
                        "Skill {} still waits for parent {}, updating fields only",
                        id,
                        parent_id
                    );
                } else if let Err(err) = tree.reparent(id, parent_id) {
                    tracing::warn!("Rejected move of skill {}: {}", id, err);
                    return Err(err.into());
                }
            }
        }

        if let Some(node) = tree.get_mut(id) {
            node.update_fields(record);
        }
        Ok(())
    }

    /// Mark the store write mirrored by an incremental update as seen
    ///
    /// Unrelated writes landing before this call are masked along with it.
    async fn acknowledge_write(&self, state: &mut CacheState) -> Result<(), SkillTreeError> {
        let modified = self.store.last_modified().await?;
        if modified > state.seen_modification {
            state.seen_modification = modified;
        }
        Ok(())
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Request a rebuild on next access
    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::Release);
    }

    /// Rebuild immediately, regardless of staleness
    pub async fn force_refresh(&self) -> Result<(), SkillTreeError> {
        let mut state = self.state.write().await;
        self.rebuild(&mut state).await
    }

    /// Drop all cached state
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = CacheState::default();
        self.invalidated.store(false, Ordering::Release);
    }

    /// Anomalies recorded by the last build and by later incremental inserts
    pub async fn anomalies(&self) -> Vec<TreeOperationError> {
        self.state.read().await.anomalies.clone()
    }

    pub async fn stats(&self) -> CacheStats {
        let last_modified = self.store.last_modified().await;
        let state = self.state.read().await;

        CacheStats {
            node_count: state.tree.len(),
            orphan_count: state.tree.orphan_ids().len(),
            anomaly_count: state.anomalies.len(),
            root_id: state.tree.root_id(),
            last_built_at: state.last_built_at,
            is_stale: match last_modified {
                Ok(modified) => self.is_stale(&state, modified),
                Err(_) => true,
            },
        }
    }

    async fn ensure_fresh(&self) -> Result<(), SkillTreeError> {
        let modified = self.store.last_modified().await?;

        {
            let state = self.state.read().await;
            if !self.is_stale(&state, modified) {
                return Ok(());
            }
        }

        let mut state = self.state.write().await;
        // Another task may have rebuilt while we waited for the lock.
        if self.is_stale(&state, modified) {
            self.rebuild(&mut state).await?;
        }
        Ok(())
    }

    fn is_stale(&self, state: &CacheState, modified: Option<DateTime<Utc>>) -> bool {
        if self.invalidated.load(Ordering::Acquire) {
            return true;
        }

        let Some(built_at) = state.last_built_at else {
            return true;
        };

        if modified > state.seen_modification {
            return true;
        }

        match self.config.max_staleness() {
            Some(max_age) => self.clock.now() - built_at > max_age,
            None => false,
        }
    }

    /// Rebuild the tree from the store's full record list
    ///
    /// Runs with the write lock held. Duplicate roots are grafted under the first
    /// root, unresolvable parents leave their skill unlinked, both logged as
    /// anomalies. Store failures abort the rebuild and keep the previous tree.
    async fn rebuild(&self, state: &mut CacheState) -> Result<(), SkillTreeError> {
        let mut seen_modification = self.store.last_modified().await?;
        let records = self.store.load_all().await?;
        let record_count = records.len();

        let mut tree = SkillTree::new();
        let mut anomalies = Vec::new();
        let mut order = Vec::with_capacity(record_count);
        let mut duplicate_roots = Vec::new();

        // First pass: one node per record, first parentless record is the root.
        for record in records {
            let id = record.id;
            let parentless = record.parent_id.is_none();

            if tree.contains(id) {
                tracing::warn!("Skill {} loaded twice, keeping the first record", id);
                continue;
            }
            tree.register(SkillNode::new(record));
            order.push(id);

            if parentless {
                match tree.root_id() {
                    None => tree.set_root(id),
                    Some(_) => duplicate_roots.push(id),
                }
            }
        }

        let root_id = match tree.root_id() {
            Some(root_id) => root_id,
            None => {
                let root = self.synthesize_root().await?;
                let root_id = root.id;
                tree.register(SkillNode::new(root));
                tree.set_root(root_id);
                seen_modification = self.store.last_modified().await?;
                root_id
            }
        };

        for duplicate_id in duplicate_roots {
            let anomaly = TreeOperationError::duplicate_root(root_id, duplicate_id);
            tracing::warn!("{}; grafting it under the root", anomaly);
            if let Err(err) = tree.link(duplicate_id, root_id) {
                tracing::warn!("Could not graft skill {}: {}", duplicate_id, err);
            }
            anomalies.push(anomaly);
        }

        // Second pass: link every remaining record to its declared parent.
        for id in order {
            let Some(node) = tree.get(id) else {
                continue;
            };
            if id == root_id || node.parent.is_some() {
                continue;
            }
            let Some(parent_id) = node.skill.parent_id else {
                continue;
            };

            if !tree.contains(parent_id) {
                let anomaly = TreeOperationError::orphan_parent(id, parent_id);
                tracing::warn!("{}; skill left unlinked", anomaly);
                anomalies.push(anomaly);
                continue;
            }

            if let Err(err) = tree.link(id, parent_id) {
                tracing::warn!("Skill {} left unlinked: {}", id, err);
                anomalies.push(err);
            }
        }

        tracing::info!(
            "Skill tree rebuilt: {} records, root {}, {} anomalies",
            record_count,
            root_id,
            anomalies.len()
        );

        state.tree = tree;
        state.anomalies = anomalies;
        state.seen_modification = seen_modification;
        state.last_built_at = Some(self.clock.now());
        self.invalidated.store(false, Ordering::Release);
        Ok(())
    }

    /// Persist a root skill when the store has none, returning it with its new id
    async fn synthesize_root(&self) -> Result<SkillRecord, SkillTreeError> {
        let mut root = SkillRecord::new(0, None, self.config.root_title.clone())
            .with_description(self.config.root_description.clone())
            .category_only();

        root.id = self.store.insert(root.clone()).await?;
        tracing::info!("No root skill found, created root {}", root.id);
        Ok(root)
    }
}

#[cfg(test)]
#[path = "tree_cache_test.rs"]
mod tree_cache_test;
