use crate::cli::ServeArgs;
use crate::serve::AppState;
use crate::style;
use std::sync::Arc;

use super::CommandContext;

pub fn cmd_serve(args: ServeArgs) -> i32 {
    let ctx = CommandContext::new(&args.source);
    let port = args.port.unwrap_or(ctx.config.serve.port);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            style::error(&format!("Failed to start runtime: {}", e));
            return 1;
        }
    };

    let state = Arc::new(AppState::new(ctx.options, "cellviz"));
    if let Err(e) = rt.block_on(crate::serve::serve(state, port, args.open)) {
        style::error(&format!("Server failed: {}", e));
        return 1;
    }

    0
}
