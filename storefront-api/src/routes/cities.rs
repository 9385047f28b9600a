/// City reference data
///
/// `GET /cities` returns `{"cities": [...]}` ordered by ID.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::Serialize;
use storefront_shared::models::city::City;

#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<City>,
}

pub async fn list_cities(State(state): State<AppState>) -> ApiResult<Json<CitiesResponse>> {
    let cities = City::list(&state.db).await?;
    Ok(Json(CitiesResponse { cities }))
}
