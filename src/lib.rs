pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod highlight;
pub mod loader;
pub mod model;
pub mod render;
pub mod report;
pub mod serve;
pub mod session;
pub mod style;
pub mod view;

pub use api::{VisualizeOptions, VizError, visualize, visualize_blocking};
pub use cli::Cli;
pub use commands::{cmd_init, cmd_render, cmd_serve, cmd_summary};
pub use config::Config;
pub use session::Session;
