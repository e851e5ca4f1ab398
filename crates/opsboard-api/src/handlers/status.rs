//! Status handler
//!
//! Supports:
//! - GET /api/logs/status?type=summary - full snapshot (default)
//! - GET /api/logs/status?type=gateway - gateway health only
//! - GET /api/logs/status?type=cron - jobs and their tally
//! - GET /api/logs/status?type=logs - log file listing
//! - GET /api/logs/status?type=file&name=<file> - parsed tail of one file

use std::str::FromStr;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use opsboard_core::{FleetSummary, Report, SourceError, SourceResult};
use opsboard_fleet::{COMPOSE_FAILED, LOGS_DIR_MISSING};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

/// Which part of the snapshot to return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    Summary,
    Gateway,
    Cron,
    Logs,
    File,
}

impl FromStr for StatusView {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "summary" => Ok(StatusView::Summary),
            "gateway" => Ok(StatusView::Gateway),
            "cron" => Ok(StatusView::Cron),
            "logs" => Ok(StatusView::Logs),
            "file" => Ok(StatusView::File),
            _ => Err(ApiError::BadRequest("Invalid type parameter".to_string())),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct StatusQuery {
    #[serde(rename = "type")]
    pub view: Option<String>,
    /// File name for `type=file`
    pub name: Option<String>,
}

/// GET /api/logs/status
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, ApiError> {
    let composer = state.composer();

    // Missing storage short-circuits every view
    if !composer.is_available().await {
        return Ok(Json(Report::<FleetSummary>::fallback(LOGS_DIR_MISSING)).into_response());
    }

    let view: StatusView = query.view.as_deref().unwrap_or_default().parse()?;
    tracing::debug!(?view, "Status request");

    let result = match view {
        StatusView::Summary => return Ok(Json(composer.compose().await).into_response()),
        StatusView::Gateway => ok_json(composer.gateway().await),
        StatusView::Cron => ok_json(composer.cron().await),
        StatusView::Logs => ok_json(composer.log_files().await),
        StatusView::File => {
            let name = query
                .name
                .filter(|n| !n.is_empty())
                .ok_or_else(|| ApiError::BadRequest("File name required".to_string()))?;

            match composer.file(&name).await {
                Err(SourceError::NotFound(_)) => {
                    return Err(ApiError::NotFound("File not found".to_string()))
                }
                other => ok_json(other),
            }
        }
    };

    Ok(result.unwrap_or_else(|e| {
        tracing::error!(?view, error = %e, "Status view failed, returning fallback");
        Json(Report::<FleetSummary>::fallback(COMPOSE_FAILED)).into_response()
    }))
}

fn ok_json<T: Serialize>(result: SourceResult<T>) -> SourceResult<Response> {
    result.map(|data| Json(Report::ok(data)).into_response())
}
