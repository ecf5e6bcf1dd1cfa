use cellviz::cli::{Cli, Command};
use cellviz::{cmd_init, cmd_render, cmd_serve, cmd_summary};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Logs go to stderr; stdout carries rendered output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cellviz=info")))
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Command::Render(args) => cmd_render(args),
        Command::Serve(args) => cmd_serve(args),
        Command::Summary(args) => cmd_summary(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}
