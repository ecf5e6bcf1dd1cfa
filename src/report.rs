use crate::highlight::{TreeReport, validate_tree};
use crate::model::{Topology, TreeKind};
use serde::Serialize;
use std::io::Write;

/// Counts and tree consistency for a loaded topology.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub cells: usize,
    pub border_cells: usize,
    pub links: usize,
    pub max_row: usize,
    pub max_col: usize,
    pub black_trees: Vec<TreeReport>,
    pub stacked_trees: Vec<TreeReport>,
}

impl Summary {
    pub fn build(topo: &Topology) -> Self {
        let (max_row, max_col) = topo.limits();
        let reports = |kind: TreeKind| {
            topo.tree_ids(kind)
                .iter()
                .map(|tree| validate_tree(topo, kind, tree))
                .collect::<Vec<_>>()
        };

        Self {
            cells: topo.len(),
            border_cells: topo.border_count(),
            links: topo.links().len(),
            max_row,
            max_col,
            black_trees: reports(TreeKind::Black),
            stacked_trees: reports(TreeKind::Stacked),
        }
    }

    pub fn inconsistent(&self) -> impl Iterator<Item = &TreeReport> {
        self.black_trees
            .iter()
            .chain(&self.stacked_trees)
            .filter(|r| !r.is_consistent())
    }
}

pub fn write_markdown<W: Write>(summary: &Summary, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "# Topology Summary\n")?;

    writeln!(writer, "- **Cells:** {}", summary.cells)?;
    writeln!(writer, "- **Border cells:** {}", summary.border_cells)?;
    writeln!(writer, "- **Links:** {}", summary.links)?;
    writeln!(
        writer,
        "- **Grid:** {} rows x {} columns",
        summary.max_row + 1,
        summary.max_col + 1
    )?;

    let broken_black: Vec<_> = summary
        .black_trees
        .iter()
        .filter(|r| !r.is_consistent())
        .collect();
    writeln!(writer, "\n## Black Trees\n")?;
    writeln!(
        writer,
        "{} trees, {} inconsistent",
        summary.black_trees.len(),
        broken_black.len()
    )?;
    if !broken_black.is_empty() {
        writeln!(writer)?;
        for report in broken_black {
            writeln!(
                writer,
                "- *{}*: {}",
                report.tree,
                report.problems().join(", ")
            )?;
        }
    }

    writeln!(writer, "\n## Stacked Trees\n")?;
    if summary.stacked_trees.is_empty() {
        writeln!(writer, "No stacked trees loaded.")?;
        return Ok(());
    }

    writeln!(writer, "| Tree | Root | Members | Status |")?;
    writeln!(writer, "|------|------|---------|--------|")?;
    for report in &summary.stacked_trees {
        let root = match report.roots.as_slice() {
            [] => "-".to_string(),
            [root] => root.to_string(),
            [first, ..] => format!("{} (+{})", first, report.roots.len() - 1),
        };
        let status = if report.is_consistent() {
            "ok".to_string()
        } else {
            report.problems().join(", ")
        };
        writeln!(
            writer,
            "| {} | {} | {} | {} |",
            report.tree, root, report.members, status
        )?;
    }

    Ok(())
}

pub fn write_json<W: Write>(summary: &Summary, writer: &mut W) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summary)?;
    writeln!(writer)
}
