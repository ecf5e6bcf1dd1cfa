mod source;
pub mod wire;

pub use source::{AnySource, DEFAULT_BASE_URL, DirSource, Endpoint, HttpSource, SourceError, TopologySource};

use crate::model::{Cell, Topology, TreeKind};
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};
use wire::{AppCellsResponse, GeometryResponse};

/// Steps of the load pipeline, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geometry,
    Topology,
    BlackTrees,
    StackedTrees,
}

impl Stage {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Stage::Geometry => Endpoint::Geometry,
            Stage::Topology => Endpoint::Topology,
            Stage::BlackTrees => Endpoint::BlackTree,
            Stage::StackedTrees => Endpoint::StackTreed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Geometry => f.write_str("geometry"),
            Stage::Topology => f.write_str("topology"),
            Stage::BlackTrees => f.write_str("black tree"),
            Stage::StackedTrees => f.write_str("stacked tree"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    /// The backend knows no cells yet.
    #[error("Nothing to show.  Run simulator, and try again.")]
    NothingToShow,
    #[error("The {stage} stage failed: {source}")]
    Fetch {
        stage: Stage,
        #[source]
        source: SourceError,
    },
    #[error("The {stage} stage returned malformed JSON: {source}")]
    Parse {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn stage(&self) -> Stage {
        match self {
            LoadError::NothingToShow => Stage::Geometry,
            LoadError::Fetch { stage, .. } | LoadError::Parse { stage, .. } => *stage,
        }
    }
}

/// Which optional overlays to request after the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    pub black_trees: bool,
    pub stacked_trees: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            black_trees: true,
            stacked_trees: true,
        }
    }
}

/// Runs geometry -> topology -> black trees -> stacked trees, one request at a time.
pub struct Loader<S> {
    source: S,
    options: LoadOptions,
}

impl<S: TopologySource> Loader<S> {
    pub fn new(source: S, options: LoadOptions) -> Self {
        Self { source, options }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn load(&self) -> Result<Topology, LoadError> {
        info!(source = %self.source.describe(), "loading topology");

        // Geometry places every cell; nothing else can be drawn without it
        let geometry: GeometryResponse = self.stage(Stage::Geometry).await?;
        if geometry.geometry.rowcol.is_empty() {
            return Err(LoadError::NothingToShow);
        }

        let mut topology = Topology::new();
        topology.set_reported_limits(geometry.geometry.maxrow, geometry.geometry.maxcol);
        for (id, location) in geometry.geometry.rowcol {
            topology.insert_cell(Cell::new(id, location.row, location.col, location.is_border));
        }
        debug!(cells = topology.len(), "geometry applied");

        let cells: AppCellsResponse = self.stage(Stage::Topology).await?;
        for (id, appcell) in cells.appcells {
            if !topology.set_neighbors(&id, appcell.neighbors.neighbors) {
                warn!(cell = %id, "topology names a cell without geometry, ignoring");
            }
        }
        debug!(links = topology.links().len(), "topology applied");

        if self.options.black_trees {
            self.overlay(Stage::BlackTrees, TreeKind::Black, &mut topology)
                .await?;
        }
        if self.options.stacked_trees {
            self.overlay(Stage::StackedTrees, TreeKind::Stacked, &mut topology)
                .await?;
        }

        Ok(topology)
    }

    async fn stage<T: DeserializeOwned>(&self, stage: Stage) -> Result<T, LoadError> {
        let body = self
            .source
            .fetch(stage.endpoint())
            .await
            .map_err(|source| LoadError::Fetch { stage, source })?;
        serde_json::from_str(&body).map_err(|source| LoadError::Parse { stage, source })
    }

    /// Tree overlays are optional on the backend; a missing document means no trees.
    async fn overlay(
        &self,
        stage: Stage,
        kind: TreeKind,
        topology: &mut Topology,
    ) -> Result<(), LoadError> {
        let cells: AppCellsResponse = match self.stage(stage).await {
            Ok(cells) => cells,
            Err(LoadError::Fetch { source, .. }) if source.is_not_found() => {
                debug!(%stage, "overlay not published, skipping");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let mut applied = 0;
        for (id, appcell) in cells.appcells {
            let trees = match kind {
                TreeKind::Black => appcell.black_trees,
                TreeKind::Stacked => appcell.stacked_trees,
            };
            if topology.set_trees(kind, &id, trees.into_port_trees()) {
                applied += 1;
            } else {
                warn!(cell = %id, %stage, "overlay names a cell without geometry, ignoring");
            }
        }
        debug!(%stage, cells = applied, "overlay applied");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory source that records which endpoints were requested.
    #[derive(Debug, Default)]
    pub struct MemorySource {
        documents: HashMap<&'static str, String>,
        failures: HashMap<&'static str, u16>,
        requested: Mutex<Vec<&'static str>>,
    }

    impl MemorySource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, endpoint: Endpoint, body: impl Into<String>) -> Self {
            self.documents.insert(endpoint.path(), body.into());
            self
        }

        pub fn failing(mut self, endpoint: Endpoint, status: u16) -> Self {
            self.failures.insert(endpoint.path(), status);
            self
        }

        pub fn requested(&self) -> Vec<&'static str> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl TopologySource for MemorySource {
        async fn fetch(&self, endpoint: Endpoint) -> Result<String, SourceError> {
            let path = endpoint.path();
            self.requested.lock().unwrap().push(path);
            if let Some(status) = self.failures.get(path) {
                return Err(SourceError::Status {
                    url: path.to_string(),
                    status: *status,
                });
            }
            self.documents
                .get(path)
                .cloned()
                .ok_or_else(|| SourceError::Status {
                    url: path.to_string(),
                    status: 404,
                })
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    pub const GEOMETRY: &str = r#"{"geometry": {"rowcol": {
        "C:0": {"row": 0, "col": 0, "is_border": true},
        "C:1": {"row": 0, "col": 1, "is_border": false},
        "C:2": {"row": 1, "col": 0, "is_border": false}}}}"#;

    pub const TOPOLOGY: &str = r#"{"appcells": {
        "C:0": {"neighbors": {"neighbors": {"1": {"cell_name": "C:1", "port": 1},
                                            "2": {"cell_name": "C:2", "port": 1}}}},
        "C:1": {"neighbors": {"neighbors": {"1": {"cell_name": "C:0", "port": 1}}}},
        "C:2": {"neighbors": {"neighbors": {"1": {"cell_name": "C:0", "port": 2}}}}}}"#;

    pub const BLACK_TREES: &str = r#"{"appcells": {
        "C:0": {"black_trees": {"trees": {"Tree:C:0": {"tree": {"1": "Child", "2": "Child"}}}}},
        "C:1": {"black_trees": {"trees": {"Tree:C:0": {"tree": {"1": "Parent"}}}}},
        "C:2": {"black_trees": {"trees": {"Tree:C:0": {"tree": {"1": "Parent"}}}}}}}"#;

    pub const STACKED_TREES: &str = r#"{"appcells": {
        "C:1": {"stacked_trees": {"trees": {"Base": {"tree": {"1": "Child"}}}}},
        "C:0": {"stacked_trees": {"trees": {"Base": {"tree": {"1": "Parent", "2": "Child"}}}}},
        "C:2": {"stacked_trees": {"trees": {"Base": {"tree": {"1": "Parent"}}}}}}}"#;

    pub fn full() -> MemorySource {
        MemorySource::new()
            .with(Endpoint::Geometry, GEOMETRY)
            .with(Endpoint::Topology, TOPOLOGY)
            .with(Endpoint::BlackTree, BLACK_TREES)
            .with(Endpoint::StackTreed, STACKED_TREES)
    }
}
