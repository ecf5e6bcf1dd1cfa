//! Library entry points.
//!
//! These return proper `Result`s instead of printing and returning exit codes,
//! so the crate can be embedded in other tools.
//!
//! # Example
//!
//! ```no_run
//! use cellviz::{VisualizeOptions, visualize_blocking};
//!
//! let session = visualize_blocking(&VisualizeOptions::default())?;
//! println!("{} cells, {} links", session.scene().nodes.len(), session.scene().lines.len());
//! std::fs::write("topology.svg", session.svg())?;
//! # Ok::<(), cellviz::VizError>(())
//! ```

use crate::config::{Config, ConfigError};
use crate::loader::{AnySource, LoadError, LoadOptions, Loader, SourceError};
use crate::render::Layout;
use crate::session::Session;
use crate::view::ViewError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while visualizing a topology.
#[derive(Debug, Error)]
pub enum VizError {
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The source could not be set up.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// One of the load stages failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// A click or highlight request named something that does not exist.
    #[error(transparent)]
    View(#[from] ViewError),

    /// A previous visualize() is still running.
    #[error("A visualization is already in progress")]
    Busy,

    /// IO error while writing output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to load from and how to lay out the result.
#[derive(Debug, Clone)]
pub struct VisualizeOptions {
    /// Backend URL or a directory of captured documents.
    pub location: String,
    /// Per-request timeout for HTTP sources.
    pub timeout: Duration,
    pub load: LoadOptions,
    pub layout: Layout,
}

impl Default for VisualizeOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for VisualizeOptions {
    fn from(config: &Config) -> Self {
        Self {
            location: config.source.location.clone(),
            timeout: config.source.timeout,
            load: config.source.load_options(),
            layout: config.layout,
        }
    }
}

/// Fetch geometry, topology and tree overlays, then start a fresh session.
pub async fn visualize(options: &VisualizeOptions) -> Result<Session, VizError> {
    let source = AnySource::from_location(&options.location, options.timeout)?;
    let loader = Loader::new(source, options.load);
    Ok(Session::visualize(&loader, &options.layout).await?)
}

/// [`visualize`] on a private runtime, for callers without one.
pub fn visualize_blocking(options: &VisualizeOptions) -> Result<Session, VizError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(visualize(options))
}
