use super::cell::{Cell, CellId, Neighbor, PortNo};
use super::link::{Link, LinkId, make_link_id};
use super::tree::{PortTree, TreeId, TreeKind};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Parsed cell map for one render session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Topology {
    cells: BTreeMap<CellId, Cell>,
    /// Grid extent reported by the backend, if it sent one.
    reported_limits: (Option<usize>, Option<usize>),
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the backend's `maxrow`/`maxcol`. They widen `limits()` but never shrink it.
    pub fn set_reported_limits(&mut self, max_row: Option<usize>, max_col: Option<usize>) {
        self.reported_limits = (max_row, max_col);
    }

    pub fn insert_cell(&mut self, cell: Cell) {
        self.cells.insert(cell.id.clone(), cell);
    }

    /// Replace the neighbor map of a known cell. Returns false if the cell was never placed.
    pub fn set_neighbors(&mut self, id: &CellId, neighbors: BTreeMap<PortNo, Neighbor>) -> bool {
        match self.cells.get_mut(id) {
            Some(cell) => {
                cell.neighbors = neighbors;
                true
            }
            None => false,
        }
    }

    /// Replace one overlay's tree map of a known cell. Returns false if the cell was never placed.
    pub fn set_trees(
        &mut self,
        kind: TreeKind,
        id: &CellId,
        trees: BTreeMap<TreeId, PortTree>,
    ) -> bool {
        match self.cells.get_mut(id) {
            Some(cell) => {
                *cell.trees_mut(kind) = trees;
                true
            }
            None => false,
        }
    }

    pub fn cell(&self, id: &CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.cells.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn border_count(&self) -> usize {
        self.cells.values().filter(|c| c.is_border).count()
    }

    /// Largest row and column in use.
    pub fn limits(&self) -> (usize, usize) {
        let (reported_row, reported_col) = self.reported_limits;
        let start = (reported_row.unwrap_or(0), reported_col.unwrap_or(0));
        self.cells.values().fold(start, |(max_row, max_col), cell| {
            (max_row.max(cell.row), max_col.max(cell.col))
        })
    }

    /// Every unordered neighbor pair, exactly once, sorted by id.
    ///
    /// A link reported by only one side still appears. Neighbors naming a cell
    /// with no grid position cannot be drawn and are skipped.
    pub fn links(&self) -> Vec<Link> {
        let mut links: BTreeMap<LinkId, Link> = BTreeMap::new();
        for cell in self.cells.values() {
            for (port, neighbor) in &cell.neighbors {
                if !self.contains(&neighbor.cell_name) {
                    warn!(
                        cell = %cell.id,
                        port = %port,
                        neighbor = %neighbor.cell_name,
                        "neighbor has no grid position, skipping link"
                    );
                    continue;
                }
                let link = Link::new(&cell.id, *port, &neighbor.cell_name, neighbor.port);
                links.entry(link.id.clone()).or_insert(link);
            }
        }
        links.into_values().collect()
    }

    /// Id of the link leaving `cell` through `port`, if that port is connected.
    pub fn link_through(&self, cell: &CellId, port: PortNo) -> Option<LinkId> {
        let neighbor = self.cells.get(cell)?.neighbor(port)?;
        Some(make_link_id(cell, port, &neighbor.cell_name, neighbor.port))
    }

    /// Names of every tree of `kind` carried by at least one cell.
    pub fn tree_ids(&self, kind: TreeKind) -> BTreeSet<TreeId> {
        self.cells
            .values()
            .flat_map(|cell| cell.trees(kind).keys().cloned())
            .collect()
    }

    pub fn stacked_tree_ids(&self) -> BTreeSet<TreeId> {
        self.tree_ids(TreeKind::Stacked)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::LinkRole;

    /// Two cells joined on port 0 of each side.
    pub fn pair() -> Topology {
        let mut topo = Topology::new();
        topo.insert_cell(Cell::new("C0", 0, 0, true));
        topo.insert_cell(Cell::new("C1", 0, 1, false));
        topo.set_neighbors(&"C0".into(), [(PortNo(0), Neighbor::new("C1", 0))].into());
        topo.set_neighbors(&"C1".into(), [(PortNo(0), Neighbor::new("C0", 0))].into());
        topo
    }

    /// A 2x2 grid wired as a ring:
    ///
    /// ```text
    /// C:0 -p1/p1- C:1
    ///  |p2         |p2
    /// C:2 -p1/p3- C:3
    /// ```
    ///
    /// Port numbers on each side: C:0 p1->C:1 p1, C:0 p2->C:2 p2,
    /// C:1 p2->C:3 p2, C:2 p1->C:3 p3.
    pub fn ring() -> Topology {
        let mut topo = Topology::new();
        topo.insert_cell(Cell::new("C:0", 0, 0, true));
        topo.insert_cell(Cell::new("C:1", 0, 1, false));
        topo.insert_cell(Cell::new("C:2", 1, 0, false));
        topo.insert_cell(Cell::new("C:3", 1, 1, false));
        let wire = [
            ("C:0", 1, "C:1", 1),
            ("C:0", 2, "C:2", 2),
            ("C:1", 2, "C:3", 2),
            ("C:2", 1, "C:3", 3),
        ];
        let mut maps: BTreeMap<CellId, BTreeMap<PortNo, Neighbor>> = BTreeMap::new();
        for (a, pa, b, pb) in wire {
            maps.entry(a.into())
                .or_default()
                .insert(PortNo(pa), Neighbor::new(b, pb));
            maps.entry(b.into())
                .or_default()
                .insert(PortNo(pb), Neighbor::new(a, pa));
        }
        for (id, neighbors) in maps {
            topo.set_neighbors(&id, neighbors);
        }
        topo
    }

    /// `ring()` with the black tree `Tree:C:0` rooted at C:0 spanning
    /// C:0 -> C:1 -> C:3 and C:0 -> C:2. The C:2/C:3 link is not in the tree.
    pub fn ring_with_black_tree() -> Topology {
        let mut topo = ring();
        let tree = TreeId::from("Tree:C:0");
        let roles = [
            ("C:0", PortTree::new().with(1, LinkRole::Child).with(2, LinkRole::Child)),
            ("C:1", PortTree::new().with(1, LinkRole::Parent).with(2, LinkRole::Child)),
            ("C:2", PortTree::new().with(2, LinkRole::Parent)),
            ("C:3", PortTree::new().with(2, LinkRole::Parent)),
        ];
        for (cell, port_tree) in roles {
            topo.set_trees(
                TreeKind::Black,
                &cell.into(),
                [(tree.clone(), port_tree)].into(),
            );
        }
        topo
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_pair_has_one_link() {
        let topo = pair();
        let links = topo.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id.as_str(), "C0:P0-C1:P0");
    }

    #[test]
    fn test_ring_links_are_unique() {
        let topo = ring();
        let ids: Vec<_> = topo.links().into_iter().map(|l| l.id.to_string()).collect();
        assert_eq!(
            ids,
            vec!["C:0:P1-C:1:P1", "C:0:P2-C:2:P2", "C:1:P2-C:3:P2", "C:2:P1-C:3:P3"]
        );
    }

    #[test]
    fn test_one_sided_link_is_kept() {
        let mut topo = Topology::new();
        topo.insert_cell(Cell::new("C0", 0, 0, false));
        topo.insert_cell(Cell::new("C1", 0, 1, false));
        topo.set_neighbors(&"C1".into(), [(PortNo(4), Neighbor::new("C0", 2))].into());
        let links = topo.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].id.as_str(), "C0:P2-C1:P4");
    }

    #[test]
    fn test_unplaced_neighbor_is_skipped() {
        let mut topo = Topology::new();
        topo.insert_cell(Cell::new("C0", 0, 0, false));
        topo.set_neighbors(&"C0".into(), [(PortNo(0), Neighbor::new("C9", 0))].into());
        assert!(topo.links().is_empty());
    }

    #[test]
    fn test_updates_to_unknown_cells_are_rejected() {
        let mut topo = pair();
        assert!(!topo.set_neighbors(&"C7".into(), BTreeMap::new()));
        assert!(!topo.set_trees(TreeKind::Black, &"C7".into(), BTreeMap::new()));
        assert_eq!(topo.len(), 2);
    }

    #[test]
    fn test_limits_and_border_count() {
        let topo = ring();
        assert_eq!(topo.limits(), (1, 1));
        assert_eq!(topo.border_count(), 1);
    }

    #[test]
    fn test_reported_limits_widen_grid() {
        let mut topo = ring();
        topo.set_reported_limits(Some(3), None);
        assert_eq!(topo.limits(), (3, 1));
        topo.set_reported_limits(Some(0), Some(0));
        assert_eq!(topo.limits(), (1, 1));
    }

    #[test]
    fn test_link_through_port() {
        let topo = ring();
        let id = topo.link_through(&"C:3".into(), PortNo(3)).unwrap();
        assert_eq!(id.as_str(), "C:2:P1-C:3:P3");
        assert!(topo.link_through(&"C:3".into(), PortNo(9)).is_none());
    }

    #[test]
    fn test_tree_ids() {
        let topo = ring_with_black_tree();
        let ids: Vec<_> = topo.tree_ids(TreeKind::Black).into_iter().collect();
        assert_eq!(ids, vec![TreeId::from("Tree:C:0")]);
        assert!(topo.stacked_tree_ids().is_empty());
    }
}
