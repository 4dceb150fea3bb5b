use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use tracing::info;

use crate::server::AppState;
use crate::station::profile::StationProfile;

/// GET /station
pub async fn get_station(State(state): State<Arc<AppState>>) -> Json<StationProfile> {
    Json(state.station.profile())
}

/// PUT /station
pub async fn update_station(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<StationProfile>,
) -> Json<StationProfile> {
    info!("PUT /station '{}'", profile.name);
    state.station.update_profile(profile.clone());
    Json(profile)
}
