use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use repairdesk_service::{CallSessionStatus, StartCallsResult};

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::StartCallsBody;

pub async fn start_calls(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartCallsBody>, JsonRejection>,
) -> Result<Json<StartCallsResult>, ApiError> {
    let Json(body) = body?;
    let result = state.quote_calls.start_quote_calls(body.into()).await?;
    Ok(Json(result))
}

pub async fn get_call_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<CallSessionStatus>, ApiError> {
    let status = state.quote_calls.get_session_status(&session_id).await?;
    Ok(Json(status))
}
