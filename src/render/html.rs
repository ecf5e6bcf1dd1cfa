use super::svg::write_svg;
use super::{Scene, escape_xml};
use crate::view::ViewState;
use std::fmt::Write;

/// Styling contract for the classes the view assigns.
pub const STYLESHEET: &str = r#"
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: #fafafa; color: #222; }
#buttons { margin: 8px 0; }
#buttons button { margin-right: 4px; }
#status { font-size: 0.85em; color: #a33; min-height: 1.2em; }
.node { fill: #4a90d9; stroke: #1d4f80; stroke-width: 2; cursor: pointer; }
.nodeborder { fill: #f5a623; stroke: #8a5a0b; stroke-width: 2; cursor: pointer; }
.noderoot { fill: #d0021b; stroke: #700; stroke-width: 3; cursor: pointer; }
.noderootborder { fill: #d0021b; stroke: #8a5a0b; stroke-width: 4; cursor: pointer; }
.nodestacked { fill: #7ed321; stroke: #3b6e0a; stroke-width: 3; cursor: pointer; }
.nodestackedborder { fill: #7ed321; stroke: #8a5a0b; stroke-width: 4; cursor: pointer; }
.nodebroken { fill: #9b9b9b; stroke: #4a4a4a; stroke-width: 2; stroke-dasharray: 3 2; }
.link { stroke: #9b9b9b; stroke-width: 4; cursor: pointer; }
.linktree { stroke: #d0021b; stroke-width: 6; cursor: pointer; }
.linkstackedtree { stroke: #7ed321; stroke-width: 6; cursor: pointer; }
.linkbroken { stroke: #4a4a4a; stroke-width: 4; stroke-dasharray: 6 4; }
.tooltip { position: fixed; top: 8px; right: 8px; padding: 4px 8px; background: #222; color: #fff; border-radius: 4px; font-size: 0.85em; }
"#;

const SCRIPT: &str = r##"
function applyClasses(classes) {
    for (const [id, cls] of Object.entries(classes)) {
        const el = document.getElementById(id);
        if (el) { el.setAttribute("class", cls); }
    }
}
function status(text) { document.getElementById("status").textContent = text || ""; }
async function post(path) {
    const res = await fetch(path, { method: "POST" });
    const body = await res.json().catch(() => ({}));
    if (!res.ok) { status(body.error || res.statusText); return null; }
    status((body.warnings || []).join("; "));
    if (body.classes) { applyClasses(body.classes); }
    return body;
}
function showTooltip(id) { const t = document.getElementById(id); if (t) t.style.display = "block"; }
function hideTooltip(id) { const t = document.getElementById(id); if (t) t.style.display = "none"; }
function wire() {
    for (const el of document.querySelectorAll("#viz-canvas circle, #viz-canvas line")) {
        const kind = el.tagName === "circle" ? "node" : "link";
        const id = encodeURIComponent(el.id);
        el.addEventListener("click", () => post(`/api/${kind}/${id}/click`));
        el.addEventListener("dblclick", () => post(`/api/${kind}/${id}/dblclick`));
        el.addEventListener("mouseenter", () => showTooltip(el.dataset.tooltip));
        el.addEventListener("mouseleave", () => hideTooltip(el.dataset.tooltip));
    }
    for (const b of document.querySelectorAll(".stackedtreebutton")) {
        b.addEventListener("click", () => post(`/api/stacked/${encodeURIComponent(b.id)}`));
    }
    document.getElementById("visualize").addEventListener("click", async () => {
        if (await post("/api/visualize")) { window.location.reload(); }
    });
    document.getElementById("reset").addEventListener("click", () => post("/api/reset"));
}
window.addEventListener("load", wire);
"##;

#[derive(Debug, Clone, Copy, Default)]
pub struct PageOptions<'a> {
    pub title: &'a str,
    /// Forward clicks to the serve API instead of producing a static snapshot.
    pub interactive: bool,
    /// Message shown above the canvas, e.g. why it is empty.
    pub notice: Option<&'a str>,
}

/// Full HTML page: stylesheet, canvas, hidden tooltips and stacked-tree buttons.
pub fn render_page(scene: &Scene, view: &ViewState, options: &PageOptions<'_>) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_page(&mut out, scene, view, options);
    out
}

fn write_page(
    out: &mut String,
    scene: &Scene,
    view: &ViewState,
    options: &PageOptions<'_>,
) -> std::fmt::Result {
    let interactive = options.interactive;
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, r#"<html lang="en">"#)?;
    writeln!(out, "<head>")?;
    writeln!(out, r#"<meta charset="UTF-8">"#)?;
    writeln!(out, "<title>{}</title>", escape_xml(options.title))?;
    writeln!(out, "<style>{}</style>", STYLESHEET)?;
    writeln!(out, "</head>")?;
    writeln!(out, r#"<body id="body">"#)?;

    writeln!(out, r#"<div id="buttons">"#)?;
    if interactive {
        writeln!(out, r#"<button id="visualize">Visualize</button>"#)?;
        writeln!(out, r#"<button id="reset">Reset</button>"#)?;
    }
    for tree in &scene.stacked_trees {
        let id = escape_xml(tree.as_str());
        writeln!(out, r#"<button id="{id}" class="stackedtreebutton">{id}</button>"#)?;
    }
    writeln!(out, "</div>")?;
    writeln!(
        out,
        r#"<div id="status">{}</div>"#,
        escape_xml(options.notice.unwrap_or_default())
    )?;

    write_svg(out, scene, view)?;

    // Ids differing only by separators share a tooltip id; first one wins
    let mut seen = std::collections::HashSet::new();
    let labels = scene
        .lines
        .iter()
        .map(|l| (&l.tooltip, l.id.as_str()))
        .chain(scene.nodes.iter().map(|n| (&n.tooltip, n.id.as_str())));
    for (tooltip, label) in labels {
        if seen.insert(tooltip) {
            writeln!(
                out,
                r#"<div id="{}" class="tooltip" style="display:none">{}</div>"#,
                escape_xml(tooltip),
                escape_xml(label)
            )?;
        }
    }

    if interactive {
        writeln!(out, "<script>{}</script>", SCRIPT)?;
    }
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::{pair, ring};
    use crate::model::{LinkRole, PortTree, TreeId, TreeKind};
    use crate::render::{Layout, Scene};

    #[test]
    fn test_static_page_has_tooltips_and_no_script() {
        let topo = pair();
        let scene = Scene::build(&topo, &Layout::default());
        let options = PageOptions {
            title: "pair",
            ..Default::default()
        };
        let page = render_page(&scene, &ViewState::new(&topo), &options);

        assert!(page.contains(r#"<div id="tooltipC0P0C1P0" class="tooltip" style="display:none">C0:P0-C1:P0</div>"#));
        assert!(page.contains(r#"<div id="tooltipC0" class="tooltip""#));
        assert!(!page.contains("<script>"));
        assert!(!page.contains(r#"id="visualize""#));
    }

    #[test]
    fn test_interactive_page_has_stacked_tree_buttons() {
        let mut topo = ring();
        topo.set_trees(
            TreeKind::Stacked,
            &"C:0".into(),
            [(TreeId::from("Tree:C:0+S"), PortTree::new().with(1, LinkRole::Child))].into(),
        );
        let scene = Scene::build(&topo, &Layout::default());
        let options = PageOptions {
            title: "ring",
            interactive: true,
            notice: None,
        };
        let page = render_page(&scene, &ViewState::new(&topo), &options);

        assert!(page.contains(r#"<button id="Tree:C:0+S" class="stackedtreebutton">Tree:C:0+S</button>"#));
        assert!(page.contains("<script>"));
        assert!(page.contains(r##"querySelectorAll("#viz-canvas circle, #viz-canvas line")"##));
        assert_eq!(page.matches(r#"class="tooltip""#).count(), 8);
    }

    #[test]
    fn test_notice_is_escaped() {
        let topo = crate::model::Topology::new();
        let scene = Scene::build(&topo, &Layout::default());
        let options = PageOptions {
            title: "empty",
            interactive: true,
            notice: Some("Nothing <here>"),
        };
        let page = render_page(&scene, &ViewState::new(&topo), &options);
        assert!(page.contains(r#"<div id="status">Nothing &lt;here&gt;</div>"#));
        assert!(!page.contains("<circle "));
    }
}
