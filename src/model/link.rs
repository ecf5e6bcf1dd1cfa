use super::cell::{CellId, PortNo};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical, order-independent identifier of a link, e.g. `C0:P0-C1:P0`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(String);

impl LinkId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse an id received from the browser or the command line.
    ///
    /// Either orientation is accepted and the result is canonical. Cell names
    /// may contain `-`; the split is taken where both halves end in `:P<port>`.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.match_indices('-').find_map(|(at, _)| {
            let (cell_a, port_a) = endpoint(&raw[..at])?;
            let (cell_b, port_b) = endpoint(&raw[at + 1..])?;
            Some(make_link_id(&cell_a, port_a, &cell_b, port_b))
        })
    }
}

fn endpoint(text: &str) -> Option<(CellId, PortNo)> {
    let (cell, port) = text.rsplit_once(":P")?;
    if cell.is_empty() {
        return None;
    }
    Some((CellId::new(cell), PortNo(port.parse().ok()?)))
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the identifier of the link between `(cell_a, port_a)` and `(cell_b, port_b)`.
///
/// The cell name that sorts first as a plain string is written first (the
/// lesser port for a loopback), so both sides of a link agree on its id.
pub fn make_link_id(cell_a: &CellId, port_a: PortNo, cell_b: &CellId, port_b: PortNo) -> LinkId {
    let ((first, first_port), (second, second_port)) = if in_order(cell_a, port_a, cell_b, port_b) {
        ((cell_a, port_a), (cell_b, port_b))
    } else {
        ((cell_b, port_b), (cell_a, port_a))
    };
    LinkId(format!("{}:{}-{}:{}", first, first_port, second, second_port))
}

fn in_order(cell_a: &CellId, port_a: PortNo, cell_b: &CellId, port_b: PortNo) -> bool {
    (cell_a.as_str(), port_a) <= (cell_b.as_str(), port_b)
}

/// One side of a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    pub cell: CellId,
    pub port: PortNo,
}

/// An unordered pair of endpoints, stored in id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: LinkId,
    pub a: Endpoint,
    pub b: Endpoint,
}

impl Link {
    pub fn new(cell_a: &CellId, port_a: PortNo, cell_b: &CellId, port_b: PortNo) -> Self {
        let id = make_link_id(cell_a, port_a, cell_b, port_b);
        let (a, b) = if in_order(cell_a, port_a, cell_b, port_b) {
            (
                Endpoint { cell: cell_a.clone(), port: port_a },
                Endpoint { cell: cell_b.clone(), port: port_b },
            )
        } else {
            (
                Endpoint { cell: cell_b.clone(), port: port_b },
                Endpoint { cell: cell_a.clone(), port: port_a },
            )
        };
        Self { id, a, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_link_id_format() {
        let id = make_link_id(&CellId::from("C1"), PortNo(2), &CellId::from("C0"), PortNo(0));
        assert_eq!(id.as_str(), "C0:P0-C1:P2");
    }

    #[test]
    fn test_link_id_orders_names_as_strings() {
        let id = make_link_id(&CellId::from("C:2"), PortNo(3), &CellId::from("C:10"), PortNo(1));
        assert_eq!(id.as_str(), "C:10:P1-C:2:P3");
        let id = make_link_id(&CellId::from("C:10"), PortNo(1), &CellId::from("C:2"), PortNo(3));
        assert_eq!(id.as_str(), "C:10:P1-C:2:P3");
    }

    #[test]
    fn test_link_endpoints_are_canonical() {
        let link = Link::new(&CellId::from("C:5"), PortNo(1), &CellId::from("C:4"), PortNo(2));
        assert_eq!(link.a.cell.as_str(), "C:4");
        assert_eq!(link.a.port, PortNo(2));
        assert_eq!(link.b.cell.as_str(), "C:5");
    }

    #[test]
    fn test_parse_link_id() {
        assert_eq!(LinkId::parse("C0:P0-C1:P0").unwrap().as_str(), "C0:P0-C1:P0");
        assert!(LinkId::parse("C0").is_none());
        assert!(LinkId::parse("C0-C1").is_none());
        assert!(LinkId::parse("C0:Px-C1:P0").is_none());
    }

    #[test]
    fn test_parse_reversed_link_id_is_canonical() {
        let id = LinkId::parse("C1:P0-C0:P0").unwrap();
        assert_eq!(id.as_str(), "C0:P0-C1:P0");
    }

    #[test]
    fn test_parse_cell_names_with_dashes() {
        let id = LinkId::parse("edge-1:P2-core-0:P1").unwrap();
        assert_eq!(
            id,
            make_link_id(&CellId::from("edge-1"), PortNo(2), &CellId::from("core-0"), PortNo(1))
        );
        assert_eq!(id.as_str(), "core-0:P1-edge-1:P2");
    }

    proptest! {
        #[test]
        fn prop_make_link_id_is_symmetric(
            a in "(C:[0-9]{1,3})|(C[0-9]{1,3})",
            b in "(C:[0-9]{1,3})|(C[0-9]{1,3})",
            pa in 0usize..16,
            pb in 0usize..16,
        ) {
            let (a, b) = (CellId::new(a), CellId::new(b));
            prop_assert_eq!(
                make_link_id(&a, PortNo(pa), &b, PortNo(pb)),
                make_link_id(&b, PortNo(pb), &a, PortNo(pa))
            );
        }
    }
}
