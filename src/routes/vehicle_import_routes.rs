use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, warn};
use uuid::Uuid;

use crate::controllers::vehicle_import_controller::VehicleImportController;
use crate::dto::vehicle_import_dto::VehicleImportResponse;
use crate::middleware::language::RequestLanguage;
use crate::services::spreadsheet::{TEMPLATE_FILE_NAME, XLSX_CONTENT_TYPE};
use crate::services::vehicle_import_service::{ImportFailure, ImportUpload};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Room for multipart framing and the customerId field
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_vehicle_import_router(max_file_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(import_vehicles).layer(DefaultBodyLimit::max(
                max_file_bytes.saturating_mul(2) + MULTIPART_OVERHEAD_BYTES,
            )),
        )
        .route("/template", get(download_template))
}

#[derive(Debug, Default)]
struct ImportForm {
    customer_id: Option<Uuid>,
    upload: Option<ImportUpload>,
}

async fn import_vehicles(
    State(state): State<AppState>,
    RequestLanguage(lang): RequestLanguage,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<VehicleImportResponse>) {
    let max_file_bytes = state.config.import_max_file_bytes;

    let result = match multipart {
        Ok(multipart) => match read_import_form(multipart).await {
            Ok(form) => {
                VehicleImportController::new(state.pool.clone(), max_file_bytes)
                    .import(form.customer_id, form.upload)
                    .await
            }
            Err(e) => Err(multipart_failure(&e, &headers, max_file_bytes)),
        },
        Err(rejection) => {
            warn!("❌ Import request is not multipart: {}", rejection);
            Err(ImportFailure::NoFile)
        }
    };

    match result {
        Ok(outcome) => (
            StatusCode::OK,
            Json(VehicleImportResponse::from_outcome(&outcome, lang)),
        ),
        Err(failure) => {
            let status = failure.status_code();
            if status.is_server_error() {
                error!("❌ Vehicle import failed: {}", failure);
            } else {
                warn!("❌ Vehicle import rejected: {}", failure);
            }
            (status, Json(VehicleImportResponse::from_failure(&failure, lang)))
        }
    }
}

async fn read_import_form(mut multipart: Multipart) -> Result<ImportForm, MultipartError> {
    let mut form = ImportForm::default();

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("customerId") => {
                let text = field.text().await?;
                form.customer_id = Uuid::parse_str(text.trim()).ok();
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                if !file_name.is_empty() || !bytes.is_empty() {
                    form.upload = Some(ImportUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_failure(e: &MultipartError, headers: &HeaderMap, max: usize) -> ImportFailure {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        let size = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(max);
        return ImportFailure::FileTooLarge { size, max };
    }

    ImportFailure::UnreadableFile(e.body_text())
}

async fn download_template(
    RequestLanguage(lang): RequestLanguage,
) -> Result<impl IntoResponse, AppError> {
    let bytes = VehicleImportController::template(lang)
        .map_err(|e| AppError::Internal(format!("template generation failed: {}", e)))?;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILE_NAME),
            ),
        ],
        bytes,
    ))
}
