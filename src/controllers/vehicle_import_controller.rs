use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::vehicle_import_store::PgVehicleImportStore;
use crate::services::spreadsheet::{self, SpreadsheetError};
use crate::services::vehicle_import_service::{
    ImportFailure, ImportOutcome, ImportUpload, VehicleImportService,
};
use crate::utils::localization::Language;

pub struct VehicleImportController {
    service: VehicleImportService<PgVehicleImportStore>,
}

impl VehicleImportController {
    pub fn new(pool: PgPool, max_file_bytes: usize) -> Self {
        Self {
            service: VehicleImportService::new(PgVehicleImportStore::new(pool), max_file_bytes),
        }
    }

    /// Import an uploaded workbook. A missing or malformed customer id is
    /// reported as an unknown customer, after the file checks.
    pub async fn import(
        &self,
        customer_id: Option<Uuid>,
        upload: Option<ImportUpload>,
    ) -> Result<ImportOutcome, ImportFailure> {
        let upload = upload.ok_or(ImportFailure::NoFile)?;
        self.service.import(customer_id, &upload).await
    }

    /// Template workbook with headers in the request language.
    pub fn template(lang: Language) -> Result<Vec<u8>, SpreadsheetError> {
        spreadsheet::build_import_template(lang)
    }
}
