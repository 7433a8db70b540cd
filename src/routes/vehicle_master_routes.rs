use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::vehicle_master_controller::VehicleMasterController;
use crate::dto::vehicle_master_dto::DropdownOption;
use crate::middleware::language::RequestLanguage;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_vehicle_master_router() -> Router<AppState> {
    Router::new()
        .route("/makes", get(list_makes))
        .route("/makes/:id/models", get(list_models))
        .route("/years", get(list_years))
        .route("/engine-capacities", get(list_engine_capacities))
}

async fn list_makes(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
) -> Result<Json<Vec<DropdownOption>>, AppError> {
    let controller = VehicleMasterController::new(state.pool.clone());
    Ok(Json(controller.makes(lang).await?))
}

async fn list_models(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(make_id): Path<Uuid>,
) -> Result<Json<Vec<DropdownOption>>, AppError> {
    let controller = VehicleMasterController::new(state.pool.clone());
    Ok(Json(controller.models(make_id, lang).await?))
}

async fn list_years(State(state): State<AppState>) -> Result<Json<Vec<DropdownOption>>, AppError> {
    let controller = VehicleMasterController::new(state.pool.clone());
    Ok(Json(controller.years().await?))
}

async fn list_engine_capacities(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
) -> Result<Json<Vec<DropdownOption>>, AppError> {
    let controller = VehicleMasterController::new(state.pool.clone());
    Ok(Json(controller.engine_capacities(lang).await?))
}
