//! Application configuration for interlink.
//!
//! User config lives at `~/.interlink/interlink.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InterlinkError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "interlink.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".interlink";

// ---------------------------------------------------------------------------
// Config structs (matching interlink.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Index (sitemap) resolution bounds.
    #[serde(default)]
    pub index: IndexConfig,

    /// Article content extraction rules.
    #[serde(default)]
    pub content: ContentConfig,

    /// Relevance weights.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Number of links to inject.
    #[serde(default = "default_num_links")]
    pub num_links: usize,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Redirects followed per request.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            num_links: default_num_links(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_num_links() -> usize {
    5
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_redirects() -> usize {
    5
}

/// `[index]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum number of index documents fetched per resolution.
    #[serde(default = "default_max_visited")]
    pub max_visited: usize,

    /// Maximum nested indexes followed per index-of-indexes.
    #[serde(default = "default_max_fan_out")]
    pub max_fan_out: usize,

    /// Nested index URLs containing any of these are never followed.
    #[serde(default = "default_skip_markers")]
    pub skip_markers: Vec<String>,

    /// URL suffixes that mark an index file rather than a content page.
    #[serde(default = "default_index_extensions")]
    pub index_extensions: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_visited: default_max_visited(),
            max_fan_out: default_max_fan_out(),
            skip_markers: default_skip_markers(),
            index_extensions: default_index_extensions(),
        }
    }
}

fn default_max_visited() -> usize {
    20
}
fn default_max_fan_out() -> usize {
    10
}
fn default_skip_markers() -> Vec<String> {
    ["category", "tag", "author", "image"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_index_extensions() -> Vec<String> {
    vec![".xml".into(), ".xml.gz".into()]
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// CSS selectors tried in order to locate the article region.
    #[serde(default = "default_region_selectors")]
    pub region_selectors: Vec<String>,

    /// CSS selectors for substructures removed from the region.
    #[serde(default = "default_strip_selectors")]
    pub strip_selectors: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            region_selectors: default_region_selectors(),
            strip_selectors: default_strip_selectors(),
        }
    }
}

fn default_region_selectors() -> Vec<String> {
    [
        "article .entry-content",
        "article .post-content",
        "article",
        "main",
        ".post-content",
        ".entry-content",
        r#"[role="main"]"#,
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_strip_selectors() -> Vec<String> {
    [
        "nav",
        "header",
        "footer",
        "aside",
        ".navigation",
        ".nav",
        ".menu",
        ".sidebar",
        ".widget",
        ".comments",
        ".related-posts",
        ".share-buttons",
        ".social-share",
        ".author-bio",
        "script",
        "style",
        "noscript",
        "form",
        ".newsletter",
        ".subscription",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// `[scoring]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_slug_weight")]
    pub slug_weight: f64,

    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f64,

    #[serde(default = "default_structure_weight")]
    pub structure_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            slug_weight: default_slug_weight(),
            keyword_weight: default_keyword_weight(),
            structure_weight: default_structure_weight(),
        }
    }
}

fn default_slug_weight() -> f64 {
    0.4
}
fn default_keyword_weight() -> f64 {
    0.4
}
fn default_structure_weight() -> f64 {
    0.2
}

// ---------------------------------------------------------------------------
// Runtime configs (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Bounds and filters applied while resolving an index tree.
#[derive(Debug, Clone)]
pub struct ResolveLimits {
    pub max_visited: usize,
    pub max_fan_out: usize,
    pub skip_markers: Vec<String>,
    pub index_extensions: Vec<String>,
}

impl Default for ResolveLimits {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ResolveLimits {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_visited: config.index.max_visited,
            max_fan_out: config.index.max_fan_out,
            skip_markers: config.index.skip_markers.clone(),
            index_extensions: config.index.index_extensions.clone(),
        }
    }
}

/// Region hints and strip list used by the content fetcher.
#[derive(Debug, Clone)]
pub struct ExtractRules {
    pub region_selectors: Vec<String>,
    pub strip_selectors: Vec<String>,
}

impl Default for ExtractRules {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ExtractRules {
    fn from(config: &AppConfig) -> Self {
        Self {
            region_selectors: config.content.region_selectors.clone(),
            strip_selectors: config.content.strip_selectors.clone(),
        }
    }
}

/// Weights of the three relevance components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub slug: f64,
    pub keywords: f64,
    pub structure: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ScoreWeights {
    fn from(config: &AppConfig) -> Self {
        Self {
            slug: config.scoring.slug_weight,
            keywords: config.scoring.keyword_weight,
            structure: config.scoring.structure_weight,
        }
    }
}

impl ScoreWeights {
    /// Weights must be non-negative and sum to at most 1 so scores stay in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let all = [self.slug, self.keywords, self.structure];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(InterlinkError::config(
                "scoring weights must be finite and non-negative",
            ));
        }
        let sum: f64 = all.iter().sum();
        if sum > 1.0 + 1e-9 {
            return Err(InterlinkError::config(format!(
                "scoring weights sum to {sum}, expected at most 1.0"
            )));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout_secs: u64,
    pub max_redirects: usize,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for TransportOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.defaults.timeout_secs,
            max_redirects: config.defaults.max_redirects,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.interlink/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| InterlinkError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.interlink/interlink.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| InterlinkError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        InterlinkError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    ScoreWeights::from(&config).validate()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| InterlinkError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| InterlinkError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| InterlinkError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("num_links"));
        assert!(toml_str.contains("skip_markers"));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[defaults]
num_links = 3

[index]
max_fan_out = 4
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.num_links, 3);
        assert_eq!(config.defaults.timeout_secs, 30);
        assert_eq!(config.index.max_fan_out, 4);
        assert_eq!(config.index.max_visited, 20);
        assert_eq!(config.index.skip_markers.len(), 4);
        assert!((config.scoring.structure_weight - 0.2).abs() < 1e-12);
    }

    #[test]
    fn runtime_configs_from_app_config() {
        let app = AppConfig::default();
        let limits = ResolveLimits::from(&app);
        assert_eq!(limits.max_visited, 20);
        assert_eq!(limits.max_fan_out, 10);
        assert!(limits.index_extensions.contains(&".xml".to_string()));

        let rules = ExtractRules::from(&app);
        assert_eq!(rules.region_selectors[2], "article");
        assert!(rules.strip_selectors.contains(&"script".to_string()));

        let weights = ScoreWeights::from(&app);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn weights_over_one_rejected() {
        let weights = ScoreWeights {
            slug: 0.6,
            keywords: 0.4,
            structure: 0.2,
        };
        let err = weights.validate().unwrap_err();
        assert!(err.to_string().contains("sum to"));

        let negative = ScoreWeights {
            slug: -0.1,
            keywords: 0.4,
            structure: 0.2,
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("interlink-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("interlink.toml");
        std::fs::write(&path, "[scoring]\nslug_weight = 0.5\nkeyword_weight = 0.3\n")
            .expect("write");

        let config = load_config_from(&path).expect("load");
        assert!((config.scoring.slug_weight - 0.5).abs() < 1e-12);

        std::fs::write(&path, "[scoring]\nslug_weight = 0.9\n").expect("write");
        assert!(load_config_from(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
