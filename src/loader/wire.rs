//! JSON shapes served by the topology backend.
//!
//! ```text
//! geometry:     { geometry: { maxrow, maxcol, rowcol: { <cell>: { row, col, is_border } } } }
//! topology:     { appcells: { <cell>: { neighbors: { neighbors: { <port>: { cell_name, port } } } } } }
//! black_tree:   { appcells: { <cell>: { black_trees:   { trees: { <tree>: { tree: { <port>: role } } } } } } }
//! stack_treed:  { appcells: { <cell>: { stacked_trees: { trees: { <tree>: { tree: { <port>: role } } } } } } }
//! ```
//!
//! Every nested map defaults to empty so a cell the backend only half knows
//! about still parses.

use crate::model::{CellId, Neighbor, PortNo, PortTree, TreeId};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct GeometryResponse {
    pub geometry: Geometry,
}

#[derive(Debug, Default, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub maxrow: Option<usize>,
    #[serde(default)]
    pub maxcol: Option<usize>,
    #[serde(default)]
    pub rowcol: BTreeMap<CellId, Location>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Location {
    pub row: usize,
    pub col: usize,
    #[serde(default)]
    pub is_border: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppCellsResponse {
    #[serde(default)]
    pub appcells: BTreeMap<CellId, AppCell>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppCell {
    #[serde(default)]
    pub neighbors: Neighbors,
    #[serde(default)]
    pub black_trees: Trees,
    #[serde(default)]
    pub stacked_trees: Trees,
}

#[derive(Debug, Default, Deserialize)]
pub struct Neighbors {
    #[serde(default)]
    pub neighbors: BTreeMap<PortNo, Neighbor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Trees {
    #[serde(default)]
    pub trees: BTreeMap<TreeId, TreeEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TreeEntry {
    #[serde(default)]
    pub tree: PortTree,
}

impl Trees {
    pub fn into_port_trees(self) -> BTreeMap<TreeId, PortTree> {
        self.trees
            .into_iter()
            .map(|(id, entry)| (id, entry.tree))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LinkRole;

    #[test]
    fn test_geometry_with_backend_extras() {
        let json = r#"{"geometry": {"is_border": false, "maxrow": 1, "maxcol": 2,
            "rowcol": {"C:0": {"row": 0, "col": 0, "is_border": true},
                       "C:1": {"row": 1, "col": 2}}}}"#;
        let parsed: GeometryResponse = serde_json::from_str(json).unwrap();
        let rowcol = parsed.geometry.rowcol;
        assert_eq!(rowcol.len(), 2);
        assert!(rowcol[&CellId::from("C:0")].is_border);
        assert!(!rowcol[&CellId::from("C:1")].is_border);
        assert_eq!(rowcol[&CellId::from("C:1")].col, 2);
    }

    #[test]
    fn test_topology_neighbors() {
        let json = r#"{"appcells": {"C:0": {"neighbors": {"neighbors":
            {"1": {"cell_name": "C:1", "port": 3}}}}}}"#;
        let parsed: AppCellsResponse = serde_json::from_str(json).unwrap();
        let cell = &parsed.appcells[&CellId::from("C:0")];
        assert_eq!(cell.neighbors.neighbors[&PortNo(1)], Neighbor::new("C:1", 3));
        assert!(cell.black_trees.trees.is_empty());
    }

    #[test]
    fn test_tree_overlay() {
        let json = r#"{"appcells": {"C:1": {"black_trees": {"trees":
            {"Tree:C:0": {"tree": {"1": "Parent", "2": "Child"}}}}}}}"#;
        let parsed: AppCellsResponse = serde_json::from_str(json).unwrap();
        let trees = parsed
            .appcells
            .into_values()
            .next()
            .unwrap()
            .black_trees
            .into_port_trees();
        let tree = &trees[&TreeId::from("Tree:C:0")];
        assert_eq!(tree.role(PortNo(1)), Some(&LinkRole::Parent));
        assert_eq!(tree.role(PortNo(2)), Some(&LinkRole::Child));
    }

    #[test]
    fn test_missing_appcells_is_empty() {
        let parsed: AppCellsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.appcells.is_empty());
    }
}
