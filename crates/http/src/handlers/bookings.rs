use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use repairdesk_service::{BookingStatus, StartBookingResult};

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::StartBookingBody;

pub async fn start_booking(
    State(state): State<Arc<AppState>>,
    body: Result<Json<StartBookingBody>, JsonRejection>,
) -> Result<Json<StartBookingResult>, ApiError> {
    let Json(body) = body?;
    let result = state.bookings.start_booking(body.into()).await?;
    Ok(Json(result))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingStatus>, ApiError> {
    let status = state.bookings.get_booking_status(&booking_id).await?;
    Ok(Json(status))
}
