mod cell;
mod link;
mod topology;
mod tree;

pub use cell::{Cell, CellId, Neighbor, PortNo};
pub use link::{Endpoint, Link, LinkId, make_link_id};
pub use topology::Topology;
pub use tree::{LinkRole, PortTree, TreeId, TreeKind};

#[cfg(test)]
pub(crate) use topology::fixtures;
