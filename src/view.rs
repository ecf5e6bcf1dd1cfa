//! Per-element visual state and the click/double-click transitions.
//!
//! The state machine is independent of any rendering; `class_map` is the only
//! thing a page needs to restyle itself.

use crate::highlight::{self, Highlight, HighlightError};
use crate::model::{CellId, LinkId, Topology, TreeId};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("Unknown cell: {0}")]
    UnknownCell(String),
    #[error("Unknown link: {0}")]
    UnknownLink(String),
    #[error(transparent)]
    Highlight(#[from] HighlightError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    #[default]
    Normal,
    /// Clicked; root of the black tree on display.
    Root,
    /// Member of the stacked tree on display.
    Stacked,
    /// Terminal.
    Broken,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    #[default]
    Normal,
    Tree,
    StackedTree,
    /// Terminal.
    Broken,
}

impl NodeState {
    pub fn css_class(self, is_border: bool) -> &'static str {
        match (self, is_border) {
            (NodeState::Normal, false) => "node",
            (NodeState::Normal, true) => "nodeborder",
            (NodeState::Root, false) => "noderoot",
            (NodeState::Root, true) => "noderootborder",
            (NodeState::Stacked, false) => "nodestacked",
            (NodeState::Stacked, true) => "nodestackedborder",
            (NodeState::Broken, _) => "nodebroken",
        }
    }
}

impl LinkState {
    pub fn css_class(self) -> &'static str {
        match self {
            LinkState::Normal => "link",
            LinkState::Tree => "linktree",
            LinkState::StackedTree => "linkstackedtree",
            LinkState::Broken => "linkbroken",
        }
    }
}

#[derive(Debug, Clone)]
struct NodeEntry {
    state: NodeState,
    is_border: bool,
}

/// Visual state of every node and link of one render session.
#[derive(Debug, Clone)]
pub struct ViewState {
    nodes: BTreeMap<CellId, NodeEntry>,
    links: BTreeMap<LinkId, LinkState>,
    /// Highlight currently applied, if any.
    active: Option<Highlight>,
}

impl ViewState {
    /// Everything starts out normal.
    pub fn new(topo: &Topology) -> Self {
        let nodes = topo
            .cells()
            .map(|cell| {
                (
                    cell.id.clone(),
                    NodeEntry {
                        state: NodeState::Normal,
                        is_border: cell.is_border,
                    },
                )
            })
            .collect();
        let links = topo
            .links()
            .into_iter()
            .map(|link| (link.id, LinkState::Normal))
            .collect();

        Self {
            nodes,
            links,
            active: None,
        }
    }

    pub fn node_state(&self, id: &CellId) -> Option<NodeState> {
        self.nodes.get(id).map(|n| n.state)
    }

    pub fn link_state(&self, id: &LinkId) -> Option<LinkState> {
        self.links.get(id).copied()
    }

    pub fn active(&self) -> Option<&Highlight> {
        self.active.as_ref()
    }

    /// Return every highlighted element to normal. Broken elements stay broken.
    pub fn reset(&mut self) {
        for entry in self.nodes.values_mut() {
            if entry.state != NodeState::Broken {
                entry.state = NodeState::Normal;
            }
        }
        for state in self.links.values_mut() {
            if *state != LinkState::Broken {
                *state = LinkState::Normal;
            }
        }
        self.active = None;
    }

    /// Select `id` as root and draw its black tree.
    pub fn click_node(&mut self, topo: &Topology, id: &CellId) -> Result<&Highlight, ViewError> {
        self.require_node(id)?;
        self.reset();

        if let Some(entry) = self.nodes.get_mut(id) {
            if entry.state != NodeState::Broken {
                entry.state = NodeState::Root;
            }
        }

        let highlight = highlight::black_tree(topo, id);
        for link in &highlight.links {
            self.set_link(link, LinkState::Tree);
        }
        Ok(self.active.insert(highlight))
    }

    pub fn double_click_node(&mut self, id: &CellId) -> Result<(), ViewError> {
        self.require_node(id)?;
        if let Some(entry) = self.nodes.get_mut(id) {
            entry.state = NodeState::Broken;
        }
        Ok(())
    }

    /// Toggle a link in or out of the tree style, without looking at tree data.
    pub fn click_link(&mut self, id: &LinkId) -> Result<LinkState, ViewError> {
        let state = self
            .links
            .get_mut(id)
            .ok_or_else(|| ViewError::UnknownLink(id.to_string()))?;
        *state = match *state {
            LinkState::Normal => LinkState::Tree,
            LinkState::Broken => LinkState::Broken,
            LinkState::Tree | LinkState::StackedTree => LinkState::Normal,
        };
        Ok(*state)
    }

    pub fn double_click_link(&mut self, id: &LinkId) -> Result<(), ViewError> {
        let state = self
            .links
            .get_mut(id)
            .ok_or_else(|| ViewError::UnknownLink(id.to_string()))?;
        *state = LinkState::Broken;
        Ok(())
    }

    /// Draw stacked tree `tree` from its root, over a reset view.
    pub fn show_stacked_tree(
        &mut self,
        topo: &Topology,
        tree: &TreeId,
    ) -> Result<&Highlight, ViewError> {
        let highlight = highlight::stacked_tree(topo, tree)?;
        self.reset();

        for node in &highlight.nodes {
            if let Some(entry) = self.nodes.get_mut(node) {
                if entry.state != NodeState::Broken {
                    entry.state = NodeState::Stacked;
                }
            }
        }
        for link in &highlight.links {
            self.set_link(link, LinkState::StackedTree);
        }
        Ok(self.active.insert(highlight))
    }

    /// Element id -> CSS class, for nodes and links alike.
    pub fn class_map(&self) -> BTreeMap<String, &'static str> {
        let nodes = self
            .nodes
            .iter()
            .map(|(id, entry)| (id.to_string(), entry.state.css_class(entry.is_border)));
        let links = self
            .links
            .iter()
            .map(|(id, state)| (id.to_string(), state.css_class()));
        nodes.chain(links).collect()
    }

    pub fn node_class(&self, id: &CellId) -> &'static str {
        self.nodes
            .get(id)
            .map(|e| e.state.css_class(e.is_border))
            .unwrap_or("node")
    }

    pub fn link_class(&self, id: &LinkId) -> &'static str {
        self.links
            .get(id)
            .map(|s| s.css_class())
            .unwrap_or("link")
    }

    fn require_node(&self, id: &CellId) -> Result<(), ViewError> {
        if self.nodes.contains_key(id) {
            Ok(())
        } else {
            Err(ViewError::UnknownCell(id.to_string()))
        }
    }

    fn set_link(&mut self, id: &LinkId, to: LinkState) {
        if let Some(state) = self.links.get_mut(id) {
            if *state != LinkState::Broken {
                *state = to;
            }
        }
    }
}
