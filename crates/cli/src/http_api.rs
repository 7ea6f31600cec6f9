use anyhow::Result;
use axum::{
    body::{Body, Bytes},
    http::{Response as HttpResponse, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use legend_engine::{Candidate, EngineError, GuessReply, SessionRequest, SharedTree, TreeStats};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, PoisonError, RwLock};

use crate::app::{player_records, AppContext};

/// Roster and tree shared by all HTTP handlers
pub(crate) struct HttpState {
    context: AppContext,
    roster: RwLock<Arc<Vec<Candidate>>>,
    tree: SharedTree,
}

#[derive(Debug, Serialize)]
struct RefreshReport {
    players: usize,
    skipped: usize,
    tree: Option<TreeStats>,
}

impl HttpState {
    pub(crate) fn new(context: AppContext, pool: Vec<Candidate>) -> Self {
        let tree = SharedTree::new(context.train(&pool));
        Self {
            context,
            roster: RwLock::new(Arc::new(pool)),
            tree,
        }
    }

    fn roster(&self) -> Arc<Vec<Candidate>> {
        self.roster
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn players(&self) -> (StatusCode, Value) {
        let pool = self.roster();
        match serde_json::to_value(player_records(&pool)) {
            Ok(body) => (StatusCode::OK, body),
            Err(err) => internal_error(&err),
        }
    }

    fn next_question(&self, body: &[u8]) -> (StatusCode, Value) {
        let request = match parse_request(body) {
            Ok(request) => request,
            Err(reply) => return reply,
        };
        let pool = self.roster();
        let tree = self.tree.load();
        match self
            .context
            .session()
            .next_question(&pool, &request, tree.as_deref())
        {
            Ok(next) => encode(&next),
            Err(err) => engine_error(&err),
        }
    }

    fn guess(&self, body: &[u8]) -> (StatusCode, Value) {
        let request = match parse_request(body) {
            Ok(request) => request,
            Err(reply) => return reply,
        };
        let pool = self.roster();
        let tree = self.tree.load();
        match self.context.session().guess(&pool, &request, tree.as_deref()) {
            Ok(guess) => encode(&GuessReply::from(guess)),
            Err(err) => engine_error(&err),
        }
    }

    /// Reload the roster, retrain, then swap both handles.
    ///
    /// In-flight requests keep the roster and tree they already cloned.
    fn refresh(&self) -> Result<RefreshReport> {
        let roster = self.context.load()?;
        let tree = self.context.train(&roster.candidates);
        let report = RefreshReport {
            players: roster.candidates.len(),
            skipped: roster.skipped,
            tree: tree.as_ref().map(|t| t.stats()),
        };
        *self.roster.write().unwrap_or_else(PoisonError::into_inner) =
            Arc::new(roster.candidates);
        self.tree.replace(tree);
        log::info!(
            "Refreshed roster: {} players, {} skipped",
            report.players,
            report.skipped
        );
        Ok(report)
    }
}

fn parse_request(body: &[u8]) -> std::result::Result<SessionRequest, (StatusCode, Value)> {
    // An empty body is an empty transcript.
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(SessionRequest::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        (
            StatusCode::BAD_REQUEST,
            json!({ "detail": format!("Invalid JSON request: {err}") }),
        )
    })
}

fn encode<T: Serialize>(value: &T) -> (StatusCode, Value) {
    match serde_json::to_value(value) {
        Ok(body) => (StatusCode::OK, body),
        Err(err) => internal_error(&err),
    }
}

fn engine_error(err: &EngineError) -> (StatusCode, Value) {
    let status = match err {
        EngineError::EmptyPool => StatusCode::BAD_REQUEST,
        EngineError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, json!({ "detail": err.to_string() }))
}

fn internal_error(err: &dyn std::fmt::Display) -> (StatusCode, Value) {
    log::warn!("Request failed: {err}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "detail": err.to_string() }),
    )
}

fn build_response(
    (status, body): (StatusCode, Value),
) -> std::result::Result<Response, StatusCode> {
    let bytes = serde_json::to_vec(&body).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    HttpResponse::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

pub(crate) fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/health", get(http_health))
        .route(
            "/players",
            get({
                let state = state.clone();
                move || http_players(state.clone())
            }),
        )
        .route(
            "/next-question",
            post({
                let state = state.clone();
                move |body| http_next_question(body, state.clone())
            }),
        )
        .route(
            "/guess",
            post({
                let state = state.clone();
                move |body| http_guess(body, state.clone())
            }),
        )
        .route(
            "/refresh",
            post({
                let state = state.clone();
                move || http_refresh(state.clone())
            }),
        )
}

async fn http_health() -> std::result::Result<Response, StatusCode> {
    build_response((StatusCode::OK, json!({ "status": "ok" })))
}

async fn http_players(state: Arc<HttpState>) -> std::result::Result<Response, StatusCode> {
    build_response(state.players())
}

async fn http_next_question(
    body: Bytes,
    state: Arc<HttpState>,
) -> std::result::Result<Response, StatusCode> {
    build_response(state.next_question(&body))
}

async fn http_guess(
    body: Bytes,
    state: Arc<HttpState>,
) -> std::result::Result<Response, StatusCode> {
    build_response(state.guess(&body))
}

async fn http_refresh(state: Arc<HttpState>) -> std::result::Result<Response, StatusCode> {
    let outcome = tokio::task::spawn_blocking(move || state.refresh())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    match outcome {
        Ok(report) => build_response(encode(&report)),
        Err(err) => build_response(internal_error(&format!("{err:#}"))),
    }
}
