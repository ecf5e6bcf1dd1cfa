use super::state::AppState;
use crate::api::VizError;
use crate::highlight::Highlight;
use crate::loader::LoadError;
use crate::model::{CellId, LinkId, Topology, TreeId};
use crate::render::{PageOptions, Scene, render_page};
use crate::view::{ViewError, ViewState};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};

/// Class map and highlight returned by every event route.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub classes: BTreeMap<String, &'static str>,
    pub highlight: Option<Highlight>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SceneResponse {
    pub scene: Scene,
    pub classes: BTreeMap<String, &'static str>,
    pub highlight: Option<Highlight>,
}

pub struct ApiError(VizError);

impl<E: Into<VizError>> From<E> for ApiError {
    fn from(e: E) -> Self {
        ApiError(e.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            VizError::Busy => StatusCode::CONFLICT,
            VizError::Load(LoadError::NothingToShow) => StatusCode::SERVICE_UNAVAILABLE,
            VizError::Load(_) | VizError::Source(_) => StatusCode::BAD_GATEWAY,
            VizError::View(ViewError::UnknownCell(_) | ViewError::UnknownLink(_)) => {
                StatusCode::NOT_FOUND
            }
            VizError::View(ViewError::Highlight(_)) => StatusCode::NOT_FOUND,
            VizError::Config(_) | VizError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, "request rejected");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/scene", get(scene_handler))
        .route("/api/visualize", post(visualize_handler))
        .route("/api/reset", post(reset_handler))
        .route("/api/node/{id}/click", post(node_click_handler))
        .route("/api/node/{id}/dblclick", post(node_dblclick_handler))
        .route("/api/link/{id}/click", post(link_click_handler))
        .route("/api/link/{id}/dblclick", post(link_dblclick_handler))
        .route("/api/stacked/{tree}", post(stacked_handler))
        .layer(cors)
        .with_state(state)
}

async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let session = state.session.read().await;
    match session.as_ref() {
        Some(session) => Html(session.page(&state.title, true)),
        None => {
            let notice = state.last_error.read().await.clone();
            let topo = Topology::new();
            let scene = Scene::build(&topo, &state.options.layout);
            let options = PageOptions {
                title: &state.title,
                interactive: true,
                notice: Some(notice.as_deref().unwrap_or("No topology loaded yet")),
            };
            Html(render_page(&scene, &ViewState::new(&topo), &options))
        }
    }
}

async fn scene_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<SceneResponse>> {
    let session = state.session.read().await;
    let session = session.as_ref().ok_or_else(|| state.not_loaded())?;
    Ok(Json(SceneResponse {
        scene: session.scene().clone(),
        classes: session.view().class_map(),
        highlight: session.view().active().cloned(),
    }))
}

async fn visualize_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<EventResponse>> {
    state.reload().await?;
    event(&state, |_| Ok(None)).await
}

async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<Json<EventResponse>> {
    event(&state, |session| {
        session.reset();
        Ok(None)
    })
    .await
}

async fn node_click_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let id = CellId::new(id);
    event(&state, |session| Ok(Some(session.click_node(&id)?.clone()))).await
}

async fn node_dblclick_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let id = CellId::new(id);
    event(&state, |session| {
        session.double_click_node(&id)?;
        Ok(None)
    })
    .await
}

async fn link_click_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let id = parse_link(id)?;
    event(&state, |session| {
        session.click_link(&id)?;
        Ok(None)
    })
    .await
}

async fn link_dblclick_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let id = parse_link(id)?;
    event(&state, |session| {
        session.double_click_link(&id)?;
        Ok(None)
    })
    .await
}

async fn stacked_handler(
    State(state): State<Arc<AppState>>,
    Path(tree): Path<String>,
) -> ApiResult<Json<EventResponse>> {
    let tree = TreeId::new(tree);
    event(&state, |session| {
        Ok(Some(session.show_stacked_tree(&tree)?.clone()))
    })
    .await
}

fn parse_link(raw: String) -> Result<LinkId, ViewError> {
    LinkId::parse(&raw).ok_or(ViewError::UnknownLink(raw))
}

/// Apply `f` to the current session and answer with the resulting class map.
async fn event<F>(state: &AppState, f: F) -> ApiResult<Json<EventResponse>>
where
    F: FnOnce(&mut crate::session::Session) -> Result<Option<Highlight>, ViewError>,
{
    let mut session = state.session.write().await;
    let session = session.as_mut().ok_or_else(|| state.not_loaded())?;
    let highlight = f(session)?;
    let warnings = highlight
        .as_ref()
        .map(|h| h.warnings.clone())
        .unwrap_or_default();
    Ok(Json(EventResponse {
        classes: session.view().class_map(),
        highlight,
        warnings,
    }))
}
