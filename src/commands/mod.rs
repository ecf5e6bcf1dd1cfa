mod init;
mod render;
mod serve;
mod summary;

pub use init::cmd_init;
pub use render::cmd_render;
pub use serve::cmd_serve;
pub use summary::cmd_summary;

use crate::api::{VisualizeOptions, VizError, visualize};
use crate::cli::SourceArgs;
use crate::config::Config;
use crate::loader::LoadError;
use crate::session::Session;
use crate::style;
use std::io::Write;
use std::path::Path;

/// Shared context for command execution: config merged with command-line overrides.
pub struct CommandContext {
    pub config: Config,
    pub options: VisualizeOptions,
}

impl CommandContext {
    pub fn new(args: &SourceArgs) -> Self {
        let mut config = Config::load(&args.config).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        if let Some(source) = &args.source {
            config.source.location = source.clone();
        }
        if args.no_black_trees {
            config.source.black_trees = false;
        }
        if args.no_stacked_trees {
            config.source.stacked_trees = false;
        }

        let options = VisualizeOptions::from(&config);
        Self { config, options }
    }

    /// Run one visualize() on a fresh runtime. Returns Err(exit_code) after
    /// reporting the failure.
    pub fn load_session(&self) -> Result<Session, i32> {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                style::error(&format!("Failed to start runtime: {}", e));
                return Err(1);
            }
        };

        match rt.block_on(visualize(&self.options)) {
            Ok(session) => Ok(session),
            Err(e) => {
                report_load_error(&e, &self.options.location);
                Err(1)
            }
        }
    }
}

fn report_load_error(err: &VizError, location: &str) {
    style::error(&err.to_string());
    match err {
        VizError::Load(LoadError::NothingToShow) => {}
        VizError::Load(LoadError::Fetch { .. }) | VizError::Source(_) => {
            style::hint(&format!("Is the simulator serving {}?", location));
        }
        VizError::Load(LoadError::Parse { .. }) => {
            style::hint("The backend answered with JSON in an unexpected shape");
        }
        _ => {}
    }
}

/// Write `content` to `output`, or stdout when no file is given.
pub(crate) fn write_output(output: Option<&Path>, content: &str) -> Result<(), i32> {
    let result = match output {
        Some(path) => std::fs::write(path, content),
        None => std::io::stdout().write_all(content.as_bytes()),
    };
    result.map_err(|e| {
        style::error(&format!("Failed to write output: {}", e));
        1
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE;

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[source]\nbase_url = \"http://10.0.0.2:8088/\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let args = SourceArgs {
            source: Some("captures".to_string()),
            config: dir.path().to_path_buf(),
            no_black_trees: false,
            no_stacked_trees: true,
        };
        let ctx = CommandContext::new(&args);
        assert_eq!(ctx.options.location, "captures");
        assert_eq!(ctx.options.timeout.as_secs(), 3);
        assert!(ctx.options.load.black_trees);
        assert!(!ctx.options.load.stacked_trees);
    }
}
