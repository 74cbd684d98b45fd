use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{ConnectInfo, State},
    Json,
};
use tracing::info;

use contract::{CarFacts, FetchCarDetailsRequest};

use crate::{
    aggregate::aggregate_car_facts, error::AppError, state::AppState,
    utils::sanitize_model_query,
};

/// `POST /api/fetch-car-details`: validate, sanitize, fan out, merge.
pub async fn fetch_car_details_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(payload): Json<FetchCarDetailsRequest>,
) -> Result<Json<CarFacts>, AppError> {
    if !state.limiter.check(addr.ip()) {
        return Err(AppError::RateLimited);
    }

    let model = sanitize_model_query(payload.car_model.as_deref().unwrap_or_default())
        .ok_or(AppError::MissingCarModel)?;
    let language = payload
        .user_language
        .as_deref()
        .map(str::trim)
        .filter(|tag| !tag.is_empty());

    info!("Fetching car details for {model}");
    let facts = aggregate_car_facts(&state, &model, language).await?;

    Ok(Json(facts))
}
