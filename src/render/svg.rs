use super::{Scene, coord, escape_xml};
use crate::view::ViewState;
use std::fmt::Write;

const DEFS: &str = r#"<defs><marker id="arrow-head" markerWidth="10" markerHeight="10" refX="10" refY="3" orient="auto" markerUnits="strokeWidth" viewBox="0 0 20 20"><path d="M0,0 L0,6 L9,3 z" fill="black"/></marker></defs>"#;

/// Standalone SVG document for `scene`, styled by `view`.
///
/// Lines come before circles so nodes paint on top. Each element carries a
/// `<title>` so viewers without the page script still show the tooltip.
pub fn render(scene: &Scene, view: &ViewState) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_svg(&mut out, scene, view);
    out
}

pub(super) fn write_svg(out: &mut String, scene: &Scene, view: &ViewState) -> std::fmt::Result {
    writeln!(
        out,
        r#"<svg id="viz-canvas" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = coord(scene.width),
        h = coord(scene.height)
    )?;
    writeln!(out, "{}", DEFS)?;

    for line in &scene.lines {
        let id = escape_xml(line.id.as_str());
        writeln!(
            out,
            r#"<line id="{id}" class="{class}" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" data-tooltip="{tooltip}"><title>{id}</title></line>"#,
            class = view.link_class(&line.id),
            x1 = coord(line.x1),
            y1 = coord(line.y1),
            x2 = coord(line.x2),
            y2 = coord(line.y2),
            tooltip = escape_xml(&line.tooltip),
        )?;
    }

    for node in &scene.nodes {
        let id = escape_xml(node.id.as_str());
        writeln!(
            out,
            r#"<circle id="{id}" class="{class}" cx="{cx}" cy="{cy}" r="{r}" data-tooltip="{tooltip}"><title>{id}</title></circle>"#,
            class = view.node_class(&node.id),
            cx = coord(node.cx),
            cy = coord(node.cy),
            r = coord(scene.radius),
            tooltip = escape_xml(&node.tooltip),
        )?;
    }

    writeln!(out, "</svg>")
}
