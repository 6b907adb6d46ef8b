//! HTTP endpoints.
//!
//! Handlers are thin: decode, delegate to [`AppState`], encode. Decoding
//! failures are turned into `invalid_request` before any session is looked up.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::GameError;
use crate::protocol::*;
use crate::state::AppState;
use crate::types::{EntrySummary, GameMode};

type ApiResult<T> = Result<Json<T>, GameError>;

impl GameError {
    pub fn status(&self) -> StatusCode {
        match self {
            GameError::SessionNotFound => StatusCode::NOT_FOUND,
            GameError::RevealLimitReached
            | GameError::QuestionLimitReached
            | GameError::CategoryAlreadyRevealed(_)
            | GameError::SessionFinished
            | GameError::DuplicateSessionId => StatusCode::CONFLICT,
            GameError::NoDataForCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GameError::InvalidRequest(_) | GameError::UnknownQuestion(_) => {
                StatusCode::BAD_REQUEST
            }
            GameError::EmptyCatalog => StatusCode::SERVICE_UNAVAILABLE,
            GameError::SecretMissing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        }
        let body = ErrorResponse {
            code: self.code().to_string(),
            msg: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for GameError {
    fn from(rejection: JsonRejection) -> Self {
        GameError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for GameError {
    fn from(rejection: QueryRejection) -> Self {
        GameError::InvalidRequest(rejection.body_text())
    }
}

fn require_session_id(id: &str) -> Result<&str, GameError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(GameError::InvalidRequest("missing sessionId".to_string()));
    }
    Ok(id)
}

/// All API routes with state attached. Static files and layers are added by the binary.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/guess/start", post(start_lottery))
        .route("/api/guess/categories", get(offer_categories))
        .route("/api/guess/reveal", post(reveal))
        .route("/api/guess/submit/{session_id}", post(submit_guess))
        .route("/api/guess/suggest", get(suggest))
        .route("/api/guess/ticker", get(ticker))
        .route("/api/session/start", post(start_narrowing))
        .route("/api/session/templates", get(templates))
        .route("/api/session/{session_id}/ask", post(ask))
        .route("/api/session/{session_id}/guess", post(submit_guess))
        .route("/api/explore/by-year", get(explore_by_year))
        .route("/api/explore/by-platform", get(explore_by_platform))
        .route("/api/explore/by-genre", get(explore_by_genre))
        .route("/api/dream/roll", get(dream_roll))
        .with_state(state)
}

async fn start(state: &AppState, mode: GameMode) -> Response {
    match state.start_game(mode).await {
        Ok(resp) => ([(header::CACHE_CONTROL, "no-store")], Json(resp)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/guess/start
pub async fn start_lottery(State(state): State<Arc<AppState>>) -> Response {
    start(&state, GameMode::Lottery).await
}

/// POST /api/session/start
pub async fn start_narrowing(State(state): State<Arc<AppState>>) -> Response {
    start(&state, GameMode::Narrowing).await
}

/// GET /api/guess/categories?sessionId=
pub async fn offer_categories(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> ApiResult<CategoriesResponse> {
    let Query(query) = query?;
    let id = require_session_id(&query.session_id)?;
    Ok(Json(state.offer_categories(id).await?))
}

/// POST /api/guess/reveal
pub async fn reveal(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RevealRequest>, JsonRejection>,
) -> ApiResult<RevealResponse> {
    let Json(req) = body?;
    let id = require_session_id(&req.session_id)?;
    Ok(Json(state.reveal(id, &req.category).await?))
}

/// POST /api/guess/submit/{session_id} and POST /api/session/{session_id}/guess
pub async fn submit_guess(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Result<Json<GuessRequest>, JsonRejection>,
) -> ApiResult<GuessResponse> {
    let Json(req) = body?;
    Ok(Json(state.submit_guess(&session_id, &req.guess).await?))
}

/// POST /api/session/{session_id}/ask
pub async fn ask(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<AskResponse> {
    let Json(req) = body?;
    Ok(Json(
        state
            .ask(&session_id, &req.question_type_id, &req.option)
            .await?,
    ))
}

/// GET /api/guess/suggest?q=
pub async fn suggest(
    State(state): State<Arc<AppState>>,
    query: Result<Query<SuggestQuery>, QueryRejection>,
) -> ApiResult<SuggestResponse> {
    let Query(query) = query?;
    Ok(Json(state.suggest(&query.q)))
}

/// GET /api/dream/roll
pub async fn dream_roll(State(state): State<Arc<AppState>>) -> ApiResult<DreamRollResponse> {
    Ok(Json(state.dream_roll()?))
}

pub async fn ticker(State(state): State<Arc<AppState>>) -> Json<TickerResponse> {
    Json(state.ticker())
}

pub async fn templates(State(state): State<Arc<AppState>>) -> Json<TemplatesResponse> {
    Json(state.question_templates())
}

pub async fn explore_by_year(
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<i64, Vec<EntrySummary>>> {
    Json(state.explore_by_year())
}

pub async fn explore_by_platform(
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<String, Vec<EntrySummary>>> {
    Json(state.explore_by_platform())
}

pub async fn explore_by_genre(
    State(state): State<Arc<AppState>>,
) -> Json<BTreeMap<String, Vec<EntrySummary>>> {
    Json(state.explore_by_genre())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(GameError::SessionNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(GameError::RevealLimitReached.status(), StatusCode::CONFLICT);
        assert_eq!(GameError::SessionFinished.status(), StatusCode::CONFLICT);
        assert_eq!(
            GameError::NoDataForCategory("year".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            GameError::InvalidRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GameError::EmptyCatalog.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_require_session_id() {
        assert_eq!(require_session_id("  abc ").unwrap(), "abc");
        assert!(matches!(
            require_session_id(" "),
            Err(GameError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = GameError::RevealLimitReached.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "reveal_limit_reached");
        assert_eq!(body.msg, "No more reveals left");
    }
}
