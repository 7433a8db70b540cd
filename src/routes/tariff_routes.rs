use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::tariff_controller::TariffController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::tariff_dto::{CreateTariffRequest, TariffFilters};
use crate::models::tariff::Tariff;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_tariff_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tariff))
        .route("/", get(list_tariffs))
}

async fn create_tariff(
    State(state): State<AppState>,
    Json(request): Json<CreateTariffRequest>,
) -> Result<Json<ApiResponse<Tariff>>, AppError> {
    let controller = TariffController::new(state.pool.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_tariffs(
    State(state): State<AppState>,
    Query(filters): Query<TariffFilters>,
) -> Result<Json<Vec<Tariff>>, AppError> {
    let controller = TariffController::new(state.pool.clone());
    let response = controller.list(filters.vehicle_category_id).await?;
    Ok(Json(response))
}
