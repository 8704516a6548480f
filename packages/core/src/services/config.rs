//! Skill tree configuration
//!
//! Settings for `SkillTreeCache`: what a synthesized root looks like and an
//! optional time-based staleness bound on top of the store's mutation stamp.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Environment variable overriding `root_title`
pub const ENV_ROOT_TITLE: &str = "SKILLTREE_ROOT_TITLE";

/// Environment variable overriding `max_staleness_secs`
pub const ENV_MAX_STALENESS_SECS: &str = "SKILLTREE_MAX_STALENESS_SECS";

/// Configuration for the skill tree cache
///
/// # Examples
///
/// ```rust
/// use skilltree_core::services::SkillTreeConfig;
///
/// let config: SkillTreeConfig = serde_json::from_str(r#"{"maxStalenessSecs": 60}"#).unwrap();
/// assert_eq!(config.root_title, "Skills");
/// assert_eq!(config.max_staleness().unwrap().num_seconds(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SkillTreeConfig {
    /// Title of the root created when the store holds no parentless skill
    pub root_title: String,

    /// Description of the synthesized root
    pub root_description: String,

    /// Rebuild after this many seconds even if the store reports no change
    ///
    /// `None` relies on the mutation stamp and explicit invalidation only.
    pub max_staleness_secs: Option<u64>,
}

impl Default for SkillTreeConfig {
    fn default() -> Self {
        Self {
            root_title: "Skills".to_string(),
            root_description: String::new(),
            max_staleness_secs: None,
        }
    }
}

impl SkillTreeConfig {
    /// Defaults overridden by `SKILLTREE_*` environment variables
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(title) = std::env::var(ENV_ROOT_TITLE) {
            if !title.trim().is_empty() {
                config.root_title = title;
            }
        }

        if let Ok(raw) = std::env::var(ENV_MAX_STALENESS_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => config.max_staleness_secs = Some(secs),
                Err(e) => tracing::warn!(
                    "Ignoring {}={:?}: {}",
                    ENV_MAX_STALENESS_SECS,
                    raw,
                    e
                ),
            }
        }

        config
    }

    pub fn max_staleness(&self) -> Option<Duration> {
        self.max_staleness_secs
            .and_then(|secs| i64::try_from(secs).ok())
            .map(Duration::seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SkillTreeConfig::default();
        assert_eq!(config.root_title, "Skills");
        assert!(config.max_staleness().is_none());
    }

    #[test]
    fn test_partial_deserialization() {
        let config: SkillTreeConfig =
            serde_json::from_str(r#"{"rootTitle": "Competences"}"#).unwrap();
        assert_eq!(config.root_title, "Competences");
        assert!(config.root_description.is_empty());
        assert!(config.max_staleness_secs.is_none());
    }

    #[test]
    fn test_max_staleness_conversion() {
        let config = SkillTreeConfig {
            max_staleness_secs: Some(90),
            ..SkillTreeConfig::default()
        };
        assert_eq!(config.max_staleness(), Some(Duration::seconds(90)));
    }
}
