//! Skill catalog inspector
//!
//! Loads a JSON array of skill records into an in-memory store, builds the
//! cached tree and prints what the application would see.
//!
//! Usage:
//!   skilltree-inspect catalog.json tree --search java
//!   skilltree-inspect catalog.json access 42 --groups 3,7
//!   skilltree-inspect catalog.json stats
//!
//! `RUST_LOG` controls log output (default `skilltree_core=info`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use skilltree_core::clock::SystemClock;
use skilltree_core::db::InMemorySkillStore;
use skilltree_core::logging::init_tracing;
use skilltree_core::{AccessClass, AccessResolver, GroupId, SkillId, SkillTreeCache, SkillTreeConfig};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "skilltree-inspect")]
#[command(version)]
#[command(about = "Inspect a skill catalog exported as JSON", long_about = None)]
struct Cli {
    /// JSON file holding an array of skill records
    catalog: PathBuf,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree as a search would show it
    Tree {
        /// Search string (blank shows everything)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Include soft-deleted skills
        #[arg(long)]
        show_deleted: bool,

        /// Include the root skill as the first row
        #[arg(long)]
        include_root: bool,
    },

    /// Print the effective access groups of a skill
    Access {
        /// Skill id
        id: SkillId,

        /// Check these user groups against the effective groups
        #[arg(short, long, value_delimiter = ',')]
        groups: Vec<GroupId>,
    },

    /// List the skills a set of groups can access
    Accessible {
        /// Access class to check
        #[arg(short, long, value_enum, default_value = "full")]
        class: ClassArg,

        /// User groups
        #[arg(short, long, value_delimiter = ',', required = true)]
        groups: Vec<GroupId>,
    },

    /// Print cache statistics and build anomalies
    Stats,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClassArg {
    Full,
    ReadOnly,
    Training,
}

impl From<ClassArg> for AccessClass {
    fn from(arg: ClassArg) -> Self {
        match arg {
            ClassArg::Full => AccessClass::Full,
            ClassArg::ReadOnly => AccessClass::ReadOnly,
            ClassArg::Training => AccessClass::Training,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("skilltree_core=info");

    let cli = Cli::parse();
    let cache = load_cache(&cli.catalog).await?;

    match cli.command {
        Commands::Tree {
            search,
            show_deleted,
            include_root,
        } => {
            let rows = cache.visible_tree(&search, show_deleted, include_root).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No skills match {:?}", search);
            } else {
                for row in rows {
                    let marker = if row.is_match { "*" } else { " " };
                    println!("{}{} {} [{}]", "  ".repeat(row.depth), marker, row.title, row.id);
                }
            }
        }
        Commands::Access { id, groups } => {
            let tree = cache.tree().await?;
            let node = tree
                .get(id)
                .with_context(|| format!("Skill {} not found", id))?;
            let resolver = AccessResolver::new(&tree);
            let access = resolver.effective_access(id);

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&access)?);
            } else {
                println!("{} [{}]", node.title(), id);
                for class in AccessClass::ALL {
                    let granted = resolver.has_access(id, class, &groups);
                    println!(
                        "  {:<10} {:?}{}",
                        class.as_str(),
                        access.groups(class),
                        if groups.is_empty() {
                            ""
                        } else if granted {
                            "  granted"
                        } else {
                            "  denied"
                        }
                    );
                }
            }
        }
        Commands::Accessible { class, groups } => {
            let tree = cache.tree().await?;
            let ids = AccessResolver::new(&tree).accessible_skills(class.into(), &groups);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                for id in ids {
                    if let Some(node) = tree.get(id) {
                        println!("{} [{}]", node.title(), id);
                    }
                }
            }
        }
        Commands::Stats => {
            let stats = cache.stats().await;
            let anomalies = cache.anomalies().await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Skills:    {}", stats.node_count);
                println!("Root:      {:?}", stats.root_id);
                println!("Orphans:   {}", stats.orphan_count);
                println!("Anomalies: {}", stats.anomaly_count);
                for anomaly in anomalies {
                    println!("  - {}", anomaly);
                }
            }
        }
    }

    Ok(())
}

/// Build a fresh cache over the records in `path`
async fn load_cache(path: &PathBuf) -> Result<SkillTreeCache> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let clock = Arc::new(SystemClock);
    let store = InMemorySkillStore::from_json(&json, clock.clone())
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let cache = SkillTreeCache::with_config(Arc::new(store), clock, SkillTreeConfig::from_env());
    cache.force_refresh().await?;
    tracing::debug!("Loaded catalog from {}", path.display());
    Ok(cache)
}
