use super::tree::{PortTree, TreeId, TreeKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Name of a cell as reported by the backend, e.g. `C:12`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn sort_key(&self) -> SortKey<'_> {
        match self.0.rsplit_once(':') {
            Some((prefix, suffix)) => match suffix.parse::<u64>() {
                Ok(index) => SortKey::Indexed(prefix, index),
                Err(_) => SortKey::Plain,
            },
            None => SortKey::Plain,
        }
    }
}

/// Indexed names (`C:2`, `C:10`) sort numerically within their prefix and
/// before plain names. Ties fall back to the raw string so the order stays total.
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum SortKey<'a> {
    Indexed(&'a str, u64),
    Plain,
}

impl Ord for CellId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key()
            .cmp(&other.sort_key())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for CellId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Local port index on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(pub usize);

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// The far side of a port: which cell it reaches and on which of that cell's ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbor {
    pub cell_name: CellId,
    pub port: PortNo,
}

impl Neighbor {
    pub fn new(cell_name: impl Into<CellId>, port: usize) -> Self {
        Self {
            cell_name: cell_name.into(),
            port: PortNo(port),
        }
    }
}

/// A cell placed on the grid.
///
/// Neighbor and tree maps start empty and are filled by later loader stages,
/// so every consumer must treat an empty map as "not known yet".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub id: CellId,
    pub row: usize,
    pub col: usize,
    pub is_border: bool,
    pub neighbors: BTreeMap<PortNo, Neighbor>,
    pub black_trees: BTreeMap<TreeId, PortTree>,
    pub stacked_trees: BTreeMap<TreeId, PortTree>,
}

impl Cell {
    pub fn new(id: impl Into<CellId>, row: usize, col: usize, is_border: bool) -> Self {
        Self {
            id: id.into(),
            row,
            col,
            is_border,
            neighbors: BTreeMap::new(),
            black_trees: BTreeMap::new(),
            stacked_trees: BTreeMap::new(),
        }
    }

    pub fn neighbor(&self, port: PortNo) -> Option<&Neighbor> {
        self.neighbors.get(&port)
    }

    pub fn trees(&self, kind: TreeKind) -> &BTreeMap<TreeId, PortTree> {
        match kind {
            TreeKind::Black => &self.black_trees,
            TreeKind::Stacked => &self.stacked_trees,
        }
    }

    pub fn trees_mut(&mut self, kind: TreeKind) -> &mut BTreeMap<TreeId, PortTree> {
        match kind {
            TreeKind::Black => &mut self.black_trees,
            TreeKind::Stacked => &mut self.stacked_trees,
        }
    }

    pub fn tree(&self, kind: TreeKind, tree: &TreeId) -> Option<&PortTree> {
        self.trees(kind).get(tree)
    }

    pub fn has_tree(&self, kind: TreeKind, tree: &TreeId) -> bool {
        self.trees(kind).contains_key(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_names_sort_numerically() {
        let mut ids: Vec<CellId> = ["C:10", "C:2", "C:1"].into_iter().map(CellId::from).collect();
        ids.sort();
        let names: Vec<_> = ids.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["C:1", "C:2", "C:10"]);
    }

    #[test]
    fn test_plain_names_sort_as_strings() {
        assert!(CellId::from("C0") < CellId::from("C1"));
        assert!(CellId::from("C10") < CellId::from("C2"));
    }

    #[test]
    fn test_indexed_before_plain_keeps_order_total() {
        let a = CellId::from("C:2");
        let b = CellId::from("C:10");
        let c = CellId::from("C:1x");
        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
    }

    #[test]
    fn test_leading_zero_is_distinct() {
        let a = CellId::from("C:01");
        let b = CellId::from("C:1");
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert!(a < b);
    }

    #[test]
    fn test_port_display() {
        assert_eq!(PortNo(3).to_string(), "P3");
    }
}
