use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use repairdesk_service::ShopSearchResult;

use crate::AppState;
use crate::api_error::ApiError;
use crate::api_types::SearchShopsBody;

pub async fn search_shops(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SearchShopsBody>, JsonRejection>,
) -> Result<Json<ShopSearchResult>, ApiError> {
    let Json(body) = body?;
    let result = state.shop_search.resolve_shops(body.into()).await?;
    Ok(Json(result))
}
