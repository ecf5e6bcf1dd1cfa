use crate::loader::{DEFAULT_BASE_URL, LoadOptions};
use crate::render::Layout;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Name of the optional per-directory configuration file.
pub const CONFIG_FILE: &str = ".cellviz.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid layout: {0}")]
    Layout(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SourceConfig,
    pub layout: Layout,
    pub serve: ServeConfig,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Backend URL or a directory of captured documents.
    pub location: String,
    pub timeout: Duration,
    pub black_trees: bool,
    pub stacked_trees: bool,
}

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    source: Option<RawSource>,
    layout: Option<RawLayout>,
    serve: Option<RawServe>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    black_trees: Option<bool>,
    stacked_trees: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawLayout {
    origin_x: Option<f64>,
    origin_y: Option<f64>,
    scale: Option<f64>,
    radius: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawServe {
    port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            layout: Layout::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
            black_trees: true,
            stacked_trees: true,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self { port: 3000 }
    }
}

impl SourceConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            black_trees: self.black_trees,
            stacked_trees: self.stacked_trees,
        }
    }
}

impl Config {
    /// Load `.cellviz.toml` from `dir`, or defaults when there is none.
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = Self::default();

        let source = match raw.source {
            Some(s) => SourceConfig {
                location: s.base_url.unwrap_or(defaults.source.location),
                timeout: s
                    .timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.source.timeout),
                black_trees: s.black_trees.unwrap_or(true),
                stacked_trees: s.stacked_trees.unwrap_or(true),
            },
            None => defaults.source,
        };

        let layout = match raw.layout {
            Some(l) => Layout {
                origin_x: l.origin_x.unwrap_or(defaults.layout.origin_x),
                origin_y: l.origin_y.unwrap_or(defaults.layout.origin_y),
                scale: l.scale.unwrap_or(defaults.layout.scale),
                radius: l.radius.unwrap_or(defaults.layout.radius),
            },
            None => defaults.layout,
        };
        let finite = [layout.origin_x, layout.origin_y, layout.scale, layout.radius]
            .iter()
            .all(|v| v.is_finite());
        if !finite || layout.scale <= 0.0 || layout.radius <= 0.0 {
            return Err(ConfigError::Layout(
                "values must be finite, and scale and radius positive".to_string(),
            ));
        }

        let serve = ServeConfig {
            port: raw
                .serve
                .and_then(|s| s.port)
                .unwrap_or(defaults.serve.port),
        };

        Ok(Self {
            source,
            layout,
            serve,
        })
    }
}

/// Commented starter file written by `cellviz init`.
pub fn generate_config_template() -> String {
    format!(
        r#"# cellviz configuration

[source]
# Topology backend, or a directory holding geometry.json, topology.json,
# black_tree.json and stack_treed.json
base_url = "{url}"
timeout_secs = 10
black_trees = true
stacked_trees = true

[layout]
# Cell (row, col) is drawn at (origin_x + col * scale, origin_y + row * scale)
origin_x = 50.0
origin_y = 50.0
scale = 50.0
radius = 10.0

[serve]
port = 3000
"#,
        url = DEFAULT_BASE_URL
    )
}
