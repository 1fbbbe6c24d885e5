// ⚙️ Configuration - Which sources to load and how to read them
// JSON file; every key has a default so a minimal file only lists sources

use crate::classifier::ClassifierProfile;
use crate::normalizer::{RewriteRule, SourceId, SourceProfile};
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Quiet period before a typed query is applied
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

/// One source file and the rule set that reads it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub source: SourceId,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Loaded and merged in this order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default)]
    pub classifier: ClassifierProfile,

    /// Replaces the built-in federal party rewrites when present
    #[serde(default)]
    pub rewrite_rules: Option<Vec<RewriteRule>>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sources: Vec::new(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            classifier: ClassifierProfile::default(),
            rewrite_rules: None,
        }
    }
}

impl AppConfig {
    /// Load config from JSON file
    ///
    /// Relative source paths are resolved against the config file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config = AppConfig::from_json(&content)
            .with_context(|| format!("Invalid config file: {:?}", path))?;

        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.path.is_relative() {
                    source.path = base.join(&source.path);
                }
            }
        }

        Ok(config)
    }

    /// Parse and validate config JSON
    pub fn from_json(content: &str) -> Result<Self> {
        let config: AppConfig =
            serde_json::from_str(content).context("Failed to parse config JSON")?;
        config.validate()?;

        log::debug!(
            "Config: {} sources, debounce {}ms, ndp substring fallback {}",
            config.sources.len(),
            config.debounce_ms,
            config.classifier.ndp_substring
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            bail!("Config lists no sources");
        }
        if let Some(rules) = &self.rewrite_rules {
            if let Some(rule) = rules.iter().find(|r| r.contains.trim().is_empty()) {
                bail!("Rewrite rule with empty pattern (replacement {:?})", rule.replacement);
            }
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Rule set for a source, with configured rewrite overrides applied
    pub fn profile_for(&self, source: SourceId) -> SourceProfile {
        let profile = source.profile();
        match &self.rewrite_rules {
            // Overrides only touch sources that rewrite at all
            Some(rules) if !profile.rewrite_fields.is_empty() => {
                profile.with_rewrite_rules(rules.clone())
            }
            _ => profile,
        }
    }
}
