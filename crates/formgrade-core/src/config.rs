//! Grading configuration and loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::score::DEFAULT_POINTS;
use crate::validate::CategoryMatch;

/// Top-level formgrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Point weight for questions that do not set `points`.
    #[serde(default = "default_points")]
    pub default_points: f64,
    /// Category policy for categorize questions.
    #[serde(default)]
    pub category_match: CategoryMatch,
    /// Max submissions graded concurrently in a batch.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Where response records are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_points() -> f64 {
    DEFAULT_POINTS
}
fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./formgrade-results")
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            default_points: default_points(),
            category_match: CategoryMatch::default(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `formgrade.toml` in the current directory
/// 2. `~/.config/formgrade/config.toml`
///
/// Environment variable overrides: `FORMGRADE_STRICT_CATEGORIES`,
/// `FORMGRADE_PARALLELISM`.
pub fn load_config() -> Result<GradingConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradingConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("formgrade.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<GradingConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradingConfig::default(),
    };

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Apply `FORMGRADE_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: GradingConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> GradingConfig {
    if let Some(value) = lookup("FORMGRADE_STRICT_CATEGORIES") {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" => config.category_match = CategoryMatch::Strict,
            "0" | "false" | "no" => config.category_match = CategoryMatch::Lenient,
            other => tracing::warn!("ignoring FORMGRADE_STRICT_CATEGORIES={other}"),
        }
    }

    if let Some(value) = lookup("FORMGRADE_PARALLELISM") {
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => config.parallelism = n,
            _ => tracing::warn!("ignoring FORMGRADE_PARALLELISM={value}"),
        }
    }

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("formgrade"))
}
