mod routes;
mod state;

pub use routes::{EventResponse, SceneResponse, router};
pub use state::AppState;

use crate::api::VizError;
use crate::style;
use std::sync::Arc;
use tracing::info;

/// Load the topology once, then serve the interactive page until interrupted.
///
/// A failed first load does not stop the server: the page shows the error
/// and the visualize button retries.
pub async fn serve(state: Arc<AppState>, port: u16, open_browser: bool) -> Result<(), VizError> {
    style::status(&format!("Fetching topology from {}", state.options.location));
    if let Err(e) = state.reload().await {
        style::warning(&format!("Initial load failed: {}", e));
    }

    let app = router(state);

    let addr = format!("127.0.0.1:{}", port);
    let url = format!("http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");

    style::header("Starting cellviz viewer...");
    println!("Open in browser: {}", style::url(&url));
    println!("Press Ctrl+C to stop");

    if open_browser {
        if let Err(e) = open::that(&url) {
            style::warning(&format!("Could not open browser: {}", e));
        }
    }

    axum::serve(listener, app).await?;

    Ok(())
}
