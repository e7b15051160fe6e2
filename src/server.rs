//! HTTP API for the shiritori game.
//!
//! The server keeps no sessions: the client sends its whole history with
//! every move and gets the updated history back.

use crate::config::ServerConfig;
use crate::engine::{TurnEngine, TurnResult, Winner};
use crate::history::HistoryError;
use crate::mover::{MoveProvider, MoveSource};
use crate::word::Word;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};

/// Request for the AI's reply to a user word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Words played so far, oldest first.
    #[serde(default)]
    pub history: Vec<String>,
    /// The user's word.
    pub user_word: String,
}

/// Response to a [`MoveRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    /// False if the user's word was rejected or lost the game.
    pub ok: bool,
    /// Message for the player.
    pub message: String,
    /// The user's word after cleaning.
    pub user_word: String,
    /// The AI's word, if it moved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_word: Option<String>,
    /// Head the user's next word must start with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_head_for_user: Option<String>,
    /// Updated history to send back with the next move.
    pub history: Vec<String>,
    /// Every word played so far, sorted.
    pub used: Vec<String>,
    /// Completed exchanges.
    pub turn_count: usize,
    /// True once the game is over.
    pub game_over: bool,
    /// Winner of a finished game.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    /// Where the AI's word came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MoveSource>,
}

impl From<&TurnResult> for MoveResponse {
    fn from(result: &TurnResult) -> Self {
        let mut used: Vec<String> =
            result.history().used().iter().map(Word::to_string).collect();
        used.sort();

        Self {
            ok: result.is_ok(),
            message: result.message(),
            user_word: result.user_word().clone(),
            ai_word: result.ai_word().map(|w| w.as_str().to_string()),
            next_head_for_user: result.next_head().map(String::from),
            history: result.history().to_strings(),
            used,
            turn_count: *result.turn_count(),
            game_over: result.is_game_over(),
            winner: result.winner(),
            source: *result.source(),
        }
    }
}

/// Error returned to HTTP clients.
#[derive(Debug, Clone, derive_more::Display)]
#[display("{status}: {message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: err.message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

/// Builds the router.
///
/// Front-end files are served from `static_dir` when it exists.
pub fn create_router<P>(engine: Arc<TurnEngine<P>>, static_dir: Option<&Path>) -> Router
where
    P: MoveProvider + 'static,
{
    let mut router = Router::new()
        .route("/api/ai_move", post(ai_move::<P>))
        .route("/health", get(health))
        .with_state(engine);

    match static_dir {
        Some(dir) if dir.is_dir() => {
            info!(dir = %dir.display(), "Serving static files");
            router = router
                .nest_service("/static", ServeDir::new(dir))
                .route_service("/", ServeFile::new(dir.join("index.html")));
        }
        Some(dir) => debug!(dir = %dir.display(), "Static directory not found, skipping"),
        None => {}
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

/// Processes one user move and returns the AI's reply.
#[instrument(skip(engine, request), fields(user_word = %request.user_word, history_len = request.history.len()))]
async fn ai_move<P: MoveProvider>(
    State(engine): State<Arc<TurnEngine<P>>>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let result = engine
        .process_turn(&request.history, &request.user_word)
        .await
        .map_err(|e| {
            warn!(error = %e, "Malformed history");
            ApiError::from(e)
        })?;

    let response = MoveResponse::from(&result);
    info!(
        ok = response.ok,
        game_over = response.game_over,
        ai_word = ?response.ai_word,
        turn_count = response.turn_count,
        "Turn processed"
    );
    Ok(Json(response))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Binds and serves until the process exits.
#[instrument(skip(engine, config), fields(host = %config.host(), port = %config.port()))]
pub async fn serve<P>(engine: Arc<TurnEngine<P>>, config: &ServerConfig) -> anyhow::Result<()>
where
    P: MoveProvider + 'static,
{
    let app = create_router(engine, config.static_dir().as_deref());

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app).await?;
    Ok(())
}
