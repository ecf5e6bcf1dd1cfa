use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cellviz")]
#[command(about = "Fetch a cell network topology and draw it")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the topology as a standalone SVG or HTML file
    Render(RenderArgs),

    /// Serve the interactive viewer
    Serve(ServeArgs),

    /// Print cell, link and tree statistics
    Summary(SummaryArgs),

    /// Generate a starter .cellviz.toml configuration file
    Init(InitArgs),
}

/// Options shared by every command that loads a topology.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Backend URL, or a directory of captured JSON documents
    #[arg(short, long)]
    pub source: Option<String>,

    /// Directory to read .cellviz.toml from
    #[arg(long, default_value = ".")]
    pub config: PathBuf,

    /// Skip the black tree overlay
    #[arg(long)]
    pub no_black_trees: bool,

    /// Skip the stacked tree overlay
    #[arg(long)]
    pub no_stacked_trees: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Highlight the black tree rooted at this cell
    #[arg(long, conflicts_with = "stacked")]
    pub root: Option<String>,

    /// Highlight this stacked tree
    #[arg(long)]
    pub stacked: Option<String>,

    /// Mark a cell or link as broken (repeatable)
    #[arg(long)]
    pub broken: Vec<String>,

    /// Output format
    #[arg(short, long, default_value = "svg")]
    pub format: RenderFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Port to listen on (defaults to [serve] port, then 3000)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Open the viewer in the default browser
    #[arg(long)]
    pub open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format
    #[arg(short, long, default_value = "markdown")]
    pub format: SummaryFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Directory to create .cellviz.toml in
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderFormat {
    #[default]
    Svg,
    /// Standalone page with tooltips and stacked tree buttons
    Html,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SummaryFormat {
    #[default]
    Markdown,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_render_args() {
        let cli = Cli::parse_from([
            "cellviz",
            "render",
            "--source",
            "captures/",
            "--root",
            "C:0",
            "--broken",
            "C:1",
            "--broken",
            "C:0:P1-C:1:P1",
            "-f",
            "html",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.source.source.as_deref(), Some("captures/"));
        assert_eq!(args.root.as_deref(), Some("C:0"));
        assert_eq!(args.broken.len(), 2);
        assert_eq!(args.format, RenderFormat::Html);
    }

    #[test]
    fn test_root_conflicts_with_stacked() {
        let result = Cli::try_parse_from([
            "cellviz", "render", "--root", "C:0", "--stacked", "Base",
        ]);
        assert!(result.is_err());
    }
}
