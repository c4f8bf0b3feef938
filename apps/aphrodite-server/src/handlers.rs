//! HTTP handlers for the REST API.
//!
//! Chart building and scoring are CPU-bound and run on the blocking pool.

use aphrodite::chart::{BirthData, ChartId, NatalChart};
use aphrodite::synastry::CompatibilityResult;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use log::{debug, info};
use std::sync::Arc;

use crate::dto::{ChartInput, CompareRequest, HealthResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
pub async fn health_check() -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// POST /charts/build
///
/// Build a natal chart and remember it under its id.
pub async fn build_chart(
    State(state): State<AppState>,
    payload: Result<Json<BirthData>, JsonRejection>,
) -> HandlerResult<NatalChart> {
    let Json(birth) = payload?;
    let chart = build_and_cache(&state, birth).await?;
    info!("Built chart {}", chart.id());
    Ok(Json(NatalChart::clone(&chart)))
}

/// GET /charts/{chart_id}
pub async fn get_chart(
    State(state): State<AppState>,
    Path(chart_id): Path<String>,
) -> HandlerResult<NatalChart> {
    let chart = lookup(&state, &ChartId::from(chart_id)).await?;
    Ok(Json(NatalChart::clone(&chart)))
}

/// POST /charts/compare
///
/// Each side is either birth data or the id of a chart built earlier.
pub async fn compare_charts(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> HandlerResult<CompatibilityResult> {
    let Json(request) = payload?;
    let first = resolve(&state, request.first).await?;
    let second = resolve(&state, request.second).await?;

    let scorer = state.scorer.clone();
    let result = tokio::task::spawn_blocking(move || scorer.compare(&first, &second)).await??;
    info!(
        "Compared {} with {}: score {:.1}",
        result.first, result.second, result.score
    );
    Ok(Json(result))
}

async fn build_and_cache(state: &AppState, birth: BirthData) -> Result<Arc<NatalChart>, AppError> {
    let assembler = state.assembler.clone();
    let chart = tokio::task::spawn_blocking(move || assembler.build_from_birth(&birth)).await??;
    let chart = Arc::new(chart);
    state.charts.insert(chart.clone()).await;
    Ok(chart)
}

async fn lookup(state: &AppState, id: &ChartId) -> Result<Arc<NatalChart>, AppError> {
    state
        .charts
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("no chart with id {}", id)))
}

async fn resolve(state: &AppState, input: ChartInput) -> Result<Arc<NatalChart>, AppError> {
    match input {
        ChartInput::Stored { chart_id } => {
            debug!("Using cached chart {}", chart_id);
            lookup(state, &chart_id).await
        }
        ChartInput::Birth(birth) => build_and_cache(state, birth).await,
    }
}
