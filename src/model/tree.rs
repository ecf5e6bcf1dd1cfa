use super::cell::{CellId, PortNo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of a spanning tree, e.g. `Tree:C:3`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeId(String);

impl TreeId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The black tree a cell roots is named after the cell.
    pub fn black_for(cell: &CellId) -> Self {
        Self(format!("Tree:{}", cell))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TreeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Role of a port within one tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkRole {
    /// Edge toward the tree root.
    Parent,
    /// Edge toward a descendant.
    Child,
    /// Anything else the backend reports. Traversal ignores it.
    Other(String),
}

impl From<String> for LinkRole {
    fn from(role: String) -> Self {
        match role.as_str() {
            "Parent" => LinkRole::Parent,
            "Child" => LinkRole::Child,
            _ => LinkRole::Other(role),
        }
    }
}

impl From<LinkRole> for String {
    fn from(role: LinkRole) -> Self {
        match role {
            LinkRole::Parent => "Parent".to_string(),
            LinkRole::Child => "Child".to_string(),
            LinkRole::Other(s) => s,
        }
    }
}

/// The two tree overlays the backend publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    /// One tree per cell, rooted at that cell, built by discovery.
    Black,
    /// Trees stacked on top of the black trees.
    Stacked,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::Black => f.write_str("black"),
            TreeKind::Stacked => f.write_str("stacked"),
        }
    }
}

/// Per-port roles of one cell within one tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortTree(BTreeMap<PortNo, LinkRole>);

impl PortTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, port: usize, role: LinkRole) -> Self {
        self.0.insert(PortNo(port), role);
        self
    }

    pub fn role(&self, port: PortNo) -> Option<&LinkRole> {
        self.0.get(&port)
    }

    /// First port tagged `Parent`. A well-formed tree has at most one.
    pub fn parent_port(&self) -> Option<PortNo> {
        self.parent_ports().next()
    }

    pub fn parent_ports(&self) -> impl Iterator<Item = PortNo> + '_ {
        self.ports_with(LinkRole::Parent)
    }

    pub fn child_ports(&self) -> impl Iterator<Item = PortNo> + '_ {
        self.ports_with(LinkRole::Child)
    }

    pub fn is_root(&self) -> bool {
        self.parent_port().is_none()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn ports_with(&self, wanted: LinkRole) -> impl Iterator<Item = PortNo> + '_ {
        self.0
            .iter()
            .filter(move |(_, role)| **role == wanted)
            .map(|(port, _)| *port)
    }
}

impl FromIterator<(PortNo, LinkRole)> for PortTree {
    fn from_iter<I: IntoIterator<Item = (PortNo, LinkRole)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
