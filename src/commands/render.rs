use crate::cli::{RenderArgs, RenderFormat};
use crate::model::{CellId, TreeId};
use crate::session::Session;
use crate::style;

use super::{CommandContext, write_output};

pub fn cmd_render(args: RenderArgs) -> i32 {
    let ctx = CommandContext::new(&args.source);

    let mut session = match ctx.load_session() {
        Ok(session) => session,
        Err(code) => return code,
    };

    if let Err(code) = apply_view(&mut session, &args) {
        return code;
    }

    let content = match args.format {
        RenderFormat::Svg => session.svg(),
        RenderFormat::Html => session.page("cellviz", false),
    };

    if let Err(code) = write_output(args.output.as_deref(), &content) {
        return code;
    }

    if let Some(path) = &args.output {
        style::success(&format!("Rendered to {}", style::path(path)));
        println!("{}", style::metric("cells", session.scene().nodes.len()));
        println!("{}", style::metric("links", session.scene().lines.len()));
    }
    0
}

/// Replay the requested clicks on a fresh session: broken marks first, then
/// the highlight.
fn apply_view(session: &mut Session, args: &RenderArgs) -> Result<(), i32> {
    for id in &args.broken {
        if let Err(e) = session.mark_broken(id) {
            style::error(&e.to_string());
            return Err(1);
        }
    }

    let highlight = if let Some(root) = &args.root {
        session.click_node(&CellId::new(root.as_str())).cloned()
    } else if let Some(tree) = &args.stacked {
        session.show_stacked_tree(&TreeId::new(tree.as_str())).cloned()
    } else {
        return Ok(());
    };

    match highlight {
        Ok(highlight) => {
            for warning in &highlight.warnings {
                style::warning(warning);
            }
            Ok(())
        }
        Err(e) => {
            style::error(&e.to_string());
            if args.stacked.is_some() {
                let trees: Vec<_> = session
                    .scene()
                    .stacked_trees
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                if !trees.is_empty() {
                    style::hint(&format!("Stacked trees: {}", trees.join(", ")));
                }
            }
            Err(1)
        }
    }
}
