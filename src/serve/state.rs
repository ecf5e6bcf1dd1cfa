use crate::api::{VisualizeOptions, VizError, visualize};
use crate::loader::LoadError;
use crate::session::Session;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

/// Shared server state. The session is replaced whole on every reload.
pub struct AppState {
    pub session: RwLock<Option<Session>>,
    /// Message from the last failed load, shown on the page until a reload succeeds.
    pub last_error: RwLock<Option<String>>,
    pub options: VisualizeOptions,
    pub title: String,
    loading: Mutex<()>,
}

impl AppState {
    pub fn new(options: VisualizeOptions, title: impl Into<String>) -> Self {
        Self {
            session: RwLock::new(None),
            last_error: RwLock::new(None),
            options,
            title: title.into(),
            loading: Mutex::new(()),
        }
    }

    /// Fetch everything again and swap in a fresh session.
    ///
    /// Only one reload runs at a time; a concurrent call gets [`VizError::Busy`].
    /// On failure the previous session is kept.
    pub async fn reload(&self) -> Result<(), VizError> {
        let Ok(_guard) = self.loading.try_lock() else {
            return Err(VizError::Busy);
        };

        match visualize(&self.options).await {
            Ok(session) => {
                info!(
                    cells = session.topology().len(),
                    links = session.scene().lines.len(),
                    "topology loaded"
                );
                *self.session.write().await = Some(session);
                *self.last_error.write().await = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "visualize failed");
                *self.last_error.write().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub(super) fn not_loaded(&self) -> VizError {
        VizError::Load(LoadError::NothingToShow)
    }
}
