use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Form, Json, Router,
};
use uuid::Uuid;

use crate::controllers::customer_controller::CustomerController;
use crate::dto::common_dto::ApiResponse;
use crate::dto::customer_dto::CustomerDetailResponse;
use crate::middleware::language::RequestLanguage;
use crate::models::customer::Customer;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_customer_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_customer))
        .route("/:id", get(get_customer))
}

async fn create_customer(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Json<ApiResponse<Customer>>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    let response = controller.create(form).await?;
    Ok(Json(response))
}

async fn get_customer(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    Path(id): Path<Uuid>,
) -> Result<Json<CustomerDetailResponse>, AppError> {
    let controller = CustomerController::new(state.pool.clone());
    let response = controller.get_by_id(id, lang).await?;
    Ok(Json(response))
}
