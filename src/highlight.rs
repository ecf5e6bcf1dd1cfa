//! Spanning-tree highlighting as pure functions over a [`Topology`].
//!
//! Nothing here knows about CSS or the DOM; callers apply the resulting sets.

use crate::model::{CellId, LinkId, PortNo, Topology, TreeId, TreeKind};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HighlightError {
    #[error("No root cell found for {0}")]
    NoRoot(TreeId),
}

/// Nodes and links belonging to one highlighted tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub tree: TreeId,
    pub root: Option<CellId>,
    pub nodes: BTreeSet<CellId>,
    pub links: BTreeSet<LinkId>,
    /// Inconsistencies met along the way (extra roots, cycles, dangling ports).
    pub warnings: Vec<String>,
}

impl Highlight {
    fn empty(tree: TreeId, root: Option<CellId>) -> Self {
        Self {
            tree,
            root,
            nodes: BTreeSet::new(),
            links: BTreeSet::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Highlight the black tree `Tree:<root>` as seen from `root`.
///
/// Starting at `root`, every cell reached through `Child` ports contributes
/// the link behind its `Parent` port. An unknown cell or tree yields an empty
/// highlight.
pub fn black_tree(topo: &Topology, root: &CellId) -> Highlight {
    let tree = TreeId::black_for(root);
    let mut highlight = Highlight::empty(tree.clone(), Some(root.clone()));
    walk(topo, TreeKind::Black, &tree, root, false, &mut highlight);
    highlight
}

/// Highlight the stacked tree `tree` from its root.
pub fn stacked_tree(topo: &Topology, tree: &TreeId) -> Result<Highlight, HighlightError> {
    let roots = roots(topo, TreeKind::Stacked, tree);
    let root = roots
        .first()
        .cloned()
        .ok_or_else(|| HighlightError::NoRoot(tree.clone()))?;

    let mut highlight = Highlight::empty(tree.clone(), Some(root.clone()));
    if roots.len() > 1 {
        highlight.warnings.push(multiple_roots(tree, &roots));
    }
    walk(topo, TreeKind::Stacked, tree, &root, true, &mut highlight);
    Ok(highlight)
}

/// The one cell whose stacked tree `tree` has no `Parent` port.
///
/// With several candidates the lowest cell id wins and a warning is logged.
pub fn find_root(topo: &Topology, tree: &TreeId) -> Result<CellId, HighlightError> {
    let roots = roots(topo, TreeKind::Stacked, tree);
    if roots.len() > 1 {
        warn!("{}", multiple_roots(tree, &roots));
    }
    roots
        .into_iter()
        .next()
        .ok_or_else(|| HighlightError::NoRoot(tree.clone()))
}

/// Every cell carrying `tree` without a `Parent` port, in cell order.
pub fn roots(topo: &Topology, kind: TreeKind, tree: &TreeId) -> Vec<CellId> {
    topo.cells()
        .filter(|cell| cell.tree(kind, tree).is_some_and(|t| t.is_root()))
        .map(|cell| cell.id.clone())
        .collect()
}

fn multiple_roots(tree: &TreeId, roots: &[CellId]) -> String {
    let names: Vec<_> = roots.iter().map(|r| r.to_string()).collect();
    format!("{} has {} roots ({}), using {}", tree, roots.len(), names.join(", "), names[0])
}

/// Depth-first walk along `Child` ports.
///
/// `require_member_parent` only marks a parent link when the cell on the other
/// end carries the same tree, which is how stacked trees are drawn.
fn walk(
    topo: &Topology,
    kind: TreeKind,
    tree: &TreeId,
    start: &CellId,
    require_member_parent: bool,
    highlight: &mut Highlight,
) {
    let mut stack = vec![start.clone()];

    while let Some(cell_id) = stack.pop() {
        let Some(cell) = topo.cell(&cell_id) else {
            continue;
        };
        let Some(port_tree) = cell.tree(kind, tree) else {
            continue;
        };
        if !highlight.nodes.insert(cell_id.clone()) {
            highlight
                .warnings
                .push(format!("{} reaches {} more than once", tree, cell_id));
            continue;
        }

        for port in port_tree.parent_ports() {
            match cell.neighbor(port) {
                Some(neighbor) => {
                    let member = topo
                        .cell(&neighbor.cell_name)
                        .is_some_and(|n| n.has_tree(kind, tree));
                    if require_member_parent && !member {
                        continue;
                    }
                    if let Some(link) = topo.link_through(&cell_id, port) {
                        highlight.links.insert(link);
                    }
                }
                None => highlight.warnings.push(dangling(tree, &cell_id, port)),
            }
        }

        // Reverse so the lowest port is visited first
        let children: Vec<PortNo> = port_tree.child_ports().collect();
        for port in children.into_iter().rev() {
            match cell.neighbor(port) {
                Some(neighbor) => stack.push(neighbor.cell_name.clone()),
                None => highlight.warnings.push(dangling(tree, &cell_id, port)),
            }
        }
    }
}

fn dangling(tree: &TreeId, cell: &CellId, port: PortNo) -> String {
    format!("{} uses unconnected port {} on {}", tree, port, cell)
}

/// Consistency of one tree across the whole topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeReport {
    pub tree: TreeId,
    pub kind: TreeKind,
    /// Cells carrying the tree.
    pub members: usize,
    /// Cells carrying the tree without a `Parent` port.
    pub roots: Vec<CellId>,
    /// Members reachable from the first root along parent->child edges.
    pub reachable: usize,
    pub cyclic: bool,
}

impl TreeReport {
    pub fn is_consistent(&self) -> bool {
        self.roots.len() == 1 && !self.cyclic && self.reachable == self.members
    }

    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        match self.roots.len() {
            0 => problems.push("no root".to_string()),
            1 => {}
            n => problems.push(format!("{} roots", n)),
        }
        if self.cyclic {
            problems.push("cycle".to_string());
        }
        if !self.roots.is_empty() && self.reachable < self.members {
            problems.push(format!(
                "{} unreachable",
                self.members - self.reachable
            ));
        }
        problems
    }
}

/// Build the parent->child graph of `tree` and check it is a single rooted tree.
pub fn validate_tree(topo: &Topology, kind: TreeKind, tree: &TreeId) -> TreeReport {
    let mut graph: DiGraph<CellId, ()> = DiGraph::new();
    let mut indices: HashMap<CellId, NodeIndex> = HashMap::new();

    for cell in topo.cells().filter(|c| c.has_tree(kind, tree)) {
        let idx = graph.add_node(cell.id.clone());
        indices.insert(cell.id.clone(), idx);
    }

    // Both sides describe each edge; update_edge keeps one copy
    for cell in topo.cells() {
        let Some(port_tree) = cell.tree(kind, tree) else {
            continue;
        };
        let here = indices[&cell.id];
        for port in port_tree.child_ports() {
            if let Some(there) = cell
                .neighbor(port)
                .and_then(|n| indices.get(&n.cell_name))
            {
                graph.update_edge(here, *there, ());
            }
        }
        for port in port_tree.parent_ports() {
            if let Some(there) = cell
                .neighbor(port)
                .and_then(|n| indices.get(&n.cell_name))
            {
                graph.update_edge(*there, here, ());
            }
        }
    }

    let roots = roots(topo, kind, tree);
    let reachable = match roots.first().and_then(|r| indices.get(r)) {
        Some(start) => {
            let mut dfs = Dfs::new(&graph, *start);
            let mut count = 0;
            while dfs.next(&graph).is_some() {
                count += 1;
            }
            count
        }
        None => 0,
    };

    TreeReport {
        tree: tree.clone(),
        kind,
        members: graph.node_count(),
        roots,
        reachable,
        cyclic: is_cyclic_directed(&graph),
    }
}
