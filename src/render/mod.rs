mod html;
mod svg;

pub use html::{PageOptions, STYLESHEET, render_page};
pub use svg::render as render_svg;

use crate::model::{CellId, LinkId, Topology, TreeId};
use serde::{Deserialize, Serialize};

/// Grid transform from (row, col) to canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub origin_x: f64,
    pub origin_y: f64,
    pub scale: f64,
    pub radius: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            origin_y: 50.0,
            scale: 50.0,
            radius: 10.0,
        }
    }
}

impl Layout {
    pub fn position(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.scale,
            self.origin_y + row as f64 * self.scale,
        )
    }

    /// Canvas size that fits `max_row` x `max_col` with the origin margin on every side.
    pub fn canvas_size(&self, max_row: usize, max_col: usize) -> (f64, f64) {
        let (x, y) = self.position(max_row, max_col);
        (x + self.origin_x, y + self.origin_y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeShape {
    pub id: CellId,
    pub cx: f64,
    pub cy: f64,
    pub is_border: bool,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineShape {
    pub id: LinkId,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub tooltip: String,
}

/// Everything to draw for one topology, independent of visual state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub radius: f64,
    pub nodes: Vec<NodeShape>,
    pub lines: Vec<LineShape>,
    /// Stacked trees available for display, one button each.
    pub stacked_trees: Vec<TreeId>,
}

impl Scene {
    /// One circle per cell and one line per unique link.
    pub fn build(topo: &Topology, layout: &Layout) -> Self {
        let nodes = topo
            .cells()
            .map(|cell| {
                let (cx, cy) = layout.position(cell.row, cell.col);
                NodeShape {
                    id: cell.id.clone(),
                    cx,
                    cy,
                    is_border: cell.is_border,
                    tooltip: tooltip_id(cell.id.as_str()),
                }
            })
            .collect();

        let lines = topo
            .links()
            .into_iter()
            .filter_map(|link| {
                let a = topo.cell(&link.a.cell)?;
                let b = topo.cell(&link.b.cell)?;
                let (x1, y1) = layout.position(a.row, a.col);
                let (x2, y2) = layout.position(b.row, b.col);
                Some(LineShape {
                    tooltip: tooltip_id(link.id.as_str()),
                    id: link.id,
                    x1,
                    y1,
                    x2,
                    y2,
                })
            })
            .collect();

        let (max_row, max_col) = topo.limits();
        let (width, height) = layout.canvas_size(max_row, max_col);

        Self {
            width,
            height,
            radius: layout.radius,
            nodes,
            lines,
            stacked_trees: topo.stacked_tree_ids().into_iter().collect(),
        }
    }
}

/// Element id of the tooltip for `id`: `tooltip` followed by `id` without `:` or `-`.
pub fn tooltip_id(id: &str) -> String {
    let mut out = String::with_capacity("tooltip".len() + id.len());
    out.push_str("tooltip");
    out.extend(id.chars().filter(|c| *c != ':' && *c != '-'));
    out
}

/// Escape text for use in XML attributes and content.
pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Shortest decimal form of a coordinate (`50` rather than `50.0`).
pub(crate) fn coord(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{pair, ring};

    #[test]
    fn test_position() {
        let layout = Layout::default();
        assert_eq!(layout.position(0, 0), (50.0, 50.0));
        assert_eq!(layout.position(2, 1), (100.0, 150.0));
    }

    #[test]
    fn test_pair_scene() {
        let scene = Scene::build(&pair(), &Layout::default());
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.lines.len(), 1);
        let line = &scene.lines[0];
        assert_eq!(line.id.as_str(), "C0:P0-C1:P0");
        assert_eq!((line.x1, line.y1, line.x2, line.y2), (50.0, 50.0, 100.0, 50.0));
        assert_eq!(line.tooltip, "tooltipC0P0C1P0");
    }

    #[test]
    fn test_scene_counts_match_topology() {
        let topo = ring();
        let scene = Scene::build(&topo, &Layout::default());
        assert_eq!(scene.nodes.len(), topo.len());
        assert_eq!(scene.lines.len(), topo.links().len());
        assert_eq!((scene.width, scene.height), (150.0, 150.0));
    }

    #[test]
    fn test_tooltip_id_strips_separators() {
        assert_eq!(tooltip_id("C:1"), "tooltipC1");
        assert_eq!(tooltip_id("C:1:P2-C:3:P0"), "tooltipC1P2C3P0");
    }

    #[test]
    fn test_escape_and_coord() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(coord(50.0), "50");
        assert_eq!(coord(12.5), "12.5");
    }
}
