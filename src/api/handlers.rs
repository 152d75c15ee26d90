//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::agent::{AgentOperation, AgentReply};
use crate::io::export::{Format, report_filename};
use crate::sim::{SimulationInput, SimulationResult};

use super::AppState;
use super::error::ApiError;
use super::types::{AskRequest, SimulateQuery};

/// Runs one simulation at the site's current time and stores it as latest.
///
/// `GET /simulate?weather=&homes=&batteryCap=` → 200 + `SimulationResult` JSON
pub async fn simulate(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SimulateQuery>,
) -> Json<SimulationResult> {
    let now = state.clock.now().time();
    let input = SimulationInput::new(query.weather, query.homes, query.battery_cap, now);
    let result = state.simulator.run(&input).await;
    state.latest.store(result.clone());
    Json(result)
}

/// `GET /download/json` → pretty JSON attachment
pub async fn download_json(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    download(&state, Format::Json)
}

/// `GET /download/txt` → text report attachment
pub async fn download_txt(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    download(&state, Format::Text)
}

/// `GET /download/csv` → one-row CSV attachment
pub async fn download_csv(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    download(&state, Format::Csv)
}

fn download(state: &AppState, format: Format) -> Result<Response, ApiError> {
    let latest = state.latest.load().ok_or(ApiError::NoSimulation)?;
    let body = format
        .render(&latest)
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let filename = report_filename(&state.clock.file_stamp(), format);

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment;filename={filename}"),
            ),
        ],
        body,
    )
        .into_response())
}

/// `POST /agent/ask {"question": ...}` → free-text answer
pub async fn agent_ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AgentReply>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(ApiError::BadRequest("`question` must not be empty".to_string()));
    }
    run_agent(&state, AgentOperation::Ask, Some(question)).await
}

/// `POST /agent/autotune` → structured tuning proposal
pub async fn agent_autotune(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AgentReply>, ApiError> {
    run_agent(&state, AgentOperation::AutoTune, None).await
}

/// `POST /agent/forecast` → structured short-term forecast
pub async fn agent_forecast(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AgentReply>, ApiError> {
    run_agent(&state, AgentOperation::Forecast, None).await
}

/// `POST /agent/report` → narrative report
pub async fn agent_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AgentReply>, ApiError> {
    run_agent(&state, AgentOperation::Report, None).await
}

async fn run_agent(
    state: &AppState,
    operation: AgentOperation,
    question: Option<&str>,
) -> Result<Json<AgentReply>, ApiError> {
    let latest = state.latest.load().ok_or(ApiError::NoSimulation)?;
    let reply = state.agent.run(operation, &latest, question).await?;
    Ok(Json(reply))
}

/// `GET /health` → `ok`
pub async fn health() -> &'static str {
    "ok"
}
