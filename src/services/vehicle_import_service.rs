//! Vehicle bulk import
//!
//! Validates a spreadsheet of vehicle rows for one customer against the
//! vehicle master data and the customer's existing vehicles. Row problems are
//! collected per row and never abort the batch; accepted rows are written in
//! a single bulk insert once every row has been checked.

use std::collections::HashSet;
use std::str::FromStr;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::customer::{Customer, CustomerVehicle, VehicleIdentifiers};
use crate::models::vehicle_master::{EngineCapacity, VehicleMake, VehicleModel, VehicleYear};
use crate::services::spreadsheet::{self, ImportRow};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::localization::Language;
use crate::utils::validation::identifier_key;

/// Default upload cap: 5 MB
pub const DEFAULT_MAX_IMPORT_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Data access needed by the importer
#[async_trait]
pub trait VehicleImportStore: Send + Sync {
    async fn find_active_customer(&self, customer_id: Uuid) -> AppResult<Option<Customer>>;

    /// Active makes, models, years and engine capacities.
    async fn load_reference_data(&self) -> AppResult<ReferenceData>;

    /// Registration and chassis numbers of the customer's active vehicles.
    async fn active_vehicle_identifiers(
        &self,
        customer_id: Uuid,
    ) -> AppResult<Vec<VehicleIdentifiers>>;

    /// Persist all vehicles in one write; returns the number of rows inserted.
    async fn insert_customer_vehicles(&self, vehicles: &[CustomerVehicle]) -> AppResult<u64>;
}

/// Master data held in memory for the duration of one import
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub makes: Vec<VehicleMake>,
    pub models: Vec<VehicleModel>,
    pub years: Vec<VehicleYear>,
    pub capacities: Vec<EngineCapacity>,
}

impl ReferenceData {
    /// English names first, then Arabic names.
    fn resolve_make(&self, name: &str) -> Option<&VehicleMake> {
        let needle = name.to_lowercase();
        let active = || self.makes.iter().filter(|m| m.is_active);

        active()
            .find(|m| m.name_en.trim().to_lowercase() == needle)
            .or_else(|| active().find(|m| m.name_ar.trim().to_lowercase() == needle))
    }

    fn resolve_model(&self, make_id: Uuid, name: &str) -> Option<&VehicleModel> {
        let needle = name.to_lowercase();

        self.models.iter().find(|m| {
            m.is_active
                && m.make_id == make_id
                && (m.name_en.trim().to_lowercase() == needle
                    || m.name_ar.trim().to_lowercase() == needle)
        })
    }

    fn resolve_year(&self, year: i32) -> Option<&VehicleYear> {
        self.years.iter().find(|y| y.is_active && y.year == year)
    }

    /// Numeric match first, then display-name containment.
    fn resolve_capacity(&self, value: &str) -> Option<&EngineCapacity> {
        let numeric = Decimal::from_str(value).ok();
        let needle = value.to_lowercase();
        let active = || self.capacities.iter().filter(|c| c.is_active);

        active()
            .find(|c| c.capacity_text() == value || numeric == Some(c.capacity))
            .or_else(|| {
                active().find(|c| {
                    [c.name_en.as_deref(), c.name_ar.as_deref()]
                        .into_iter()
                        .flatten()
                        .any(|name| name.to_lowercase().contains(&needle))
                })
            })
    }
}

/// Operation-level failures: the import stops and nothing is written
#[derive(Debug, Error)]
pub enum ImportFailure {
    #[error("customer not found or inactive")]
    CustomerNotFound,

    #[error("no file was uploaded")]
    NoFile,

    #[error("unsupported file type: {file_name}")]
    InvalidFileType { file_name: String },

    #[error("file is {size} bytes, limit is {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    #[error("file contains no data rows")]
    EmptyFile,

    #[error("file could not be read: {0}")]
    UnreadableFile(String),

    #[error(transparent)]
    Store(#[from] AppError),
}

impl ImportFailure {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ImportFailure::CustomerNotFound => StatusCode::NOT_FOUND,
            ImportFailure::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ImportFailure::Store(e) => e.status_code(),
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(&self, lang: Language) -> String {
        match (self, lang) {
            (ImportFailure::CustomerNotFound, Language::English) => {
                "Customer not found or inactive".to_string()
            }
            (ImportFailure::CustomerNotFound, Language::Arabic) => {
                "العميل غير موجود أو غير نشط".to_string()
            }
            (ImportFailure::NoFile, Language::English) => {
                "Please select a file to upload".to_string()
            }
            (ImportFailure::NoFile, Language::Arabic) => "يرجى اختيار ملف للرفع".to_string(),
            (ImportFailure::InvalidFileType { .. }, Language::English) => {
                "Invalid file type. Please upload an Excel file (.xlsx, .xls)".to_string()
            }
            (ImportFailure::InvalidFileType { .. }, Language::Arabic) => {
                "نوع الملف غير صالح. يرجى رفع ملف Excel (.xlsx, .xls)".to_string()
            }
            (ImportFailure::FileTooLarge { max, .. }, Language::English) => format!(
                "File size exceeds the maximum allowed size of {}",
                size_label(*max, Language::English)
            ),
            (ImportFailure::FileTooLarge { max, .. }, Language::Arabic) => format!(
                "حجم الملف يتجاوز الحد المسموح به وهو {}",
                size_label(*max, Language::Arabic)
            ),
            (ImportFailure::EmptyFile, Language::English) => {
                "The file contains no data rows".to_string()
            }
            (ImportFailure::EmptyFile, Language::Arabic) => {
                "الملف لا يحتوي على أي بيانات".to_string()
            }
            (ImportFailure::UnreadableFile(_), Language::English) => {
                "The file could not be read. Please check that it is a valid Excel file"
                    .to_string()
            }
            (ImportFailure::UnreadableFile(_), Language::Arabic) => {
                "تعذر قراءة الملف. يرجى التأكد من أنه ملف Excel صالح".to_string()
            }
            (ImportFailure::Store(AppError::Conflict(_)), Language::English) => {
                "Some vehicles were registered for this customer while the file was being imported. Please import the file again".to_string()
            }
            (ImportFailure::Store(AppError::Conflict(_)), Language::Arabic) => {
                "تم تسجيل بعض المركبات لهذا العميل أثناء استيراد الملف. يرجى استيراد الملف مرة أخرى".to_string()
            }
            (ImportFailure::Store(_), Language::English) => {
                "An error occurred while importing vehicles".to_string()
            }
            (ImportFailure::Store(_), Language::Arabic) => {
                "حدث خطأ أثناء استيراد المركبات".to_string()
            }
        }
    }
}

/// Byte count as whole megabytes, or kilobytes below one megabyte.
fn size_label(bytes: usize, lang: Language) -> String {
    const MB: usize = 1024 * 1024;
    match (bytes >= MB, lang) {
        (true, Language::English) => format!("{} MB", bytes / MB),
        (true, Language::Arabic) => format!("{} ميغابايت", bytes / MB),
        (false, Language::English) => format!("{} KB", bytes / 1024),
        (false, Language::Arabic) => format!("{} كيلوبايت", bytes / 1024),
    }
}

/// Row-level validation errors, collected per row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    MakeRequired,
    ModelRequired,
    YearRequired,
    MakeNotFound { make: String },
    ModelNotFound { model: String, make: String },
    InvalidYearFormat { year: String },
    YearNotFound { year: i32 },
    DuplicateRegistration { registration_number: String },
    DuplicateChassis { chassis_number: String },
}

impl RowError {
    pub fn message(&self, lang: Language) -> String {
        match lang {
            Language::English => match self {
                RowError::MakeRequired => "Make is required".to_string(),
                RowError::ModelRequired => "Model is required".to_string(),
                RowError::YearRequired => "Year is required".to_string(),
                RowError::MakeNotFound { make } => format!("Make '{}' not found in system", make),
                RowError::ModelNotFound { model, make } => {
                    format!("Model '{}' not found for Make '{}'", model, make)
                }
                RowError::InvalidYearFormat { year } => format!("Invalid year format: '{}'", year),
                RowError::YearNotFound { year } => format!("Year '{}' not found in system", year),
                RowError::DuplicateRegistration { registration_number } => {
                    format!("Registration number '{}' already exists", registration_number)
                }
                RowError::DuplicateChassis { chassis_number } => {
                    format!("Chassis number '{}' already exists", chassis_number)
                }
            },
            Language::Arabic => match self {
                RowError::MakeRequired => "الماركة مطلوبة".to_string(),
                RowError::ModelRequired => "الموديل مطلوب".to_string(),
                RowError::YearRequired => "سنة الصنع مطلوبة".to_string(),
                RowError::MakeNotFound { make } => {
                    format!("الماركة '{}' غير موجودة في النظام", make)
                }
                RowError::ModelNotFound { model, make } => {
                    format!("الموديل '{}' غير موجود للماركة '{}'", model, make)
                }
                RowError::InvalidYearFormat { year } => {
                    format!("صيغة السنة غير صحيحة: '{}'", year)
                }
                RowError::YearNotFound { year } => {
                    format!("السنة '{}' غير موجودة في النظام", year)
                }
                RowError::DuplicateRegistration { registration_number } => {
                    format!("رقم التسجيل '{}' موجود مسبقاً", registration_number)
                }
                RowError::DuplicateChassis { chassis_number } => {
                    format!("رقم الشاصي '{}' موجود مسبقاً", chassis_number)
                }
            },
        }
    }
}

/// A rejected row with the values that were submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub row: ImportRow,
    pub error: RowError,
}

/// Result of a processed batch
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Rows processed, excluding blank separator rows
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub failures: Vec<RowFailure>,
    pub created: Vec<CustomerVehicle>,
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        self.success_count > 0
    }

    pub fn summary(&self, lang: Language) -> String {
        let (total, ok, failed) = (self.total_rows, self.success_count, self.error_count);

        match lang {
            Language::English if total == 0 => "No vehicle rows found in the file".to_string(),
            Language::English if ok == 0 => format!(
                "No vehicles were imported. Rows with errors: {} of {}",
                failed, total
            ),
            Language::English if failed == 0 => format!(
                "Import completed: {} of {} vehicles imported successfully",
                ok, total
            ),
            Language::English => format!(
                "Import completed: {} of {} vehicles imported successfully, {} {} failed",
                ok,
                total,
                failed,
                if failed == 1 { "row" } else { "rows" }
            ),
            Language::Arabic if total == 0 => "لا توجد صفوف مركبات في الملف".to_string(),
            Language::Arabic if ok == 0 => format!(
                "لم يتم استيراد أي مركبة. الصفوف التي تحتوي على أخطاء: {} من {}",
                failed, total
            ),
            Language::Arabic if failed == 0 => format!(
                "اكتمل الاستيراد: تم استيراد {} من {} مركبة بنجاح",
                ok, total
            ),
            Language::Arabic => format!(
                "اكتمل الاستيراد: تم استيراد {} من {} مركبة بنجاح، عدد الصفوف الفاشلة: {}",
                ok, total, failed
            ),
        }
    }
}

/// Row-by-row validator for one customer's batch
pub struct VehicleRowValidator<'a> {
    reference: &'a ReferenceData,
    customer_id: Uuid,
    registrations: HashSet<String>,
    chassis_numbers: HashSet<String>,
}

impl<'a> VehicleRowValidator<'a> {
    pub fn new(
        reference: &'a ReferenceData,
        customer_id: Uuid,
        existing: &[VehicleIdentifiers],
    ) -> Self {
        let registrations = existing
            .iter()
            .filter_map(|v| identifier_key(v.registration_number.as_deref()))
            .collect();
        let chassis_numbers = existing
            .iter()
            .filter_map(|v| identifier_key(v.chassis_number.as_deref()))
            .collect();

        Self {
            reference,
            customer_id,
            registrations,
            chassis_numbers,
        }
    }

    /// Validate every row in order and collect the outcome.
    pub fn run(mut self, rows: &[ImportRow]) -> ImportOutcome {
        let mut outcome = ImportOutcome::default();

        for row in rows {
            if row.is_separator() {
                continue;
            }

            outcome.total_rows += 1;
            match self.validate_row(row) {
                Ok(vehicle) => {
                    outcome.success_count += 1;
                    outcome.created.push(vehicle);
                }
                Err(error) => {
                    outcome.error_count += 1;
                    outcome.failures.push(RowFailure {
                        row: row.clone(),
                        error,
                    });
                }
            }
        }

        outcome
    }

    /// Validate one row; on success the row's identifiers are reserved so
    /// later rows in the same batch cannot reuse them.
    pub fn validate_row(&mut self, row: &ImportRow) -> Result<CustomerVehicle, RowError> {
        let make_name = row.make.trim();
        let model_name = row.model.trim();
        let year_text = row.year.trim();

        if make_name.is_empty() {
            return Err(RowError::MakeRequired);
        }
        if model_name.is_empty() {
            return Err(RowError::ModelRequired);
        }
        if year_text.is_empty() {
            return Err(RowError::YearRequired);
        }

        let make = self
            .reference
            .resolve_make(make_name)
            .ok_or_else(|| RowError::MakeNotFound {
                make: make_name.to_string(),
            })?;

        let model = self
            .reference
            .resolve_model(make.id, model_name)
            .ok_or_else(|| RowError::ModelNotFound {
                model: model_name.to_string(),
                make: make_name.to_string(),
            })?;

        let year_value: i32 = year_text
            .parse()
            .map_err(|_| RowError::InvalidYearFormat {
                year: year_text.to_string(),
            })?;
        let year = self
            .reference
            .resolve_year(year_value)
            .ok_or(RowError::YearNotFound { year: year_value })?;

        let capacity_text = row.engine_capacity.trim();
        let engine_capacity_id = if capacity_text.is_empty() {
            None
        } else {
            self.reference.resolve_capacity(capacity_text).map(|c| c.id)
        };

        let registration_key = identifier_key(Some(row.registration_number.as_str()));
        if let Some(key) = &registration_key {
            if self.registrations.contains(key) {
                return Err(RowError::DuplicateRegistration {
                    registration_number: row.registration_number.trim().to_string(),
                });
            }
        }

        let chassis_key = identifier_key(Some(row.chassis_number.as_str()));
        if let Some(key) = &chassis_key {
            if self.chassis_numbers.contains(key) {
                return Err(RowError::DuplicateChassis {
                    chassis_number: row.chassis_number.trim().to_string(),
                });
            }
        }

        self.registrations.extend(registration_key);
        self.chassis_numbers.extend(chassis_key);

        Ok(CustomerVehicle {
            id: Uuid::new_v4(),
            customer_id: self.customer_id,
            make_id: make.id,
            model_id: model.id,
            year_id: year.id,
            engine_capacity_id,
            registration_number: non_blank(&row.registration_number),
            chassis_number: non_blank(&row.chassis_number),
            is_active: true,
            created_at: Utc::now(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImportUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct VehicleImportService<S> {
    store: S,
    max_file_bytes: usize,
}

impl<S: VehicleImportStore> VehicleImportService<S> {
    pub fn new(store: S, max_file_bytes: usize) -> Self {
        Self {
            store,
            max_file_bytes,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// File name and size checks; never touches the store.
    fn check_upload(&self, upload: &ImportUpload) -> Result<(), ImportFailure> {
        if !spreadsheet::is_spreadsheet_file_name(&upload.file_name) {
            warn!("❌ Rejected import file '{}': not a spreadsheet", upload.file_name);
            return Err(ImportFailure::InvalidFileType {
                file_name: upload.file_name.clone(),
            });
        }

        if upload.bytes.len() > self.max_file_bytes {
            warn!(
                "❌ Rejected import file '{}': {} bytes over the {} byte limit",
                upload.file_name,
                upload.bytes.len(),
                self.max_file_bytes
            );
            return Err(ImportFailure::FileTooLarge {
                size: upload.bytes.len(),
                max: self.max_file_bytes,
            });
        }

        Ok(())
    }

    /// Run a full import. File checks happen before any store access, so a
    /// missing customer id is reported only for an acceptable file.
    pub async fn import(
        &self,
        customer_id: Option<Uuid>,
        upload: &ImportUpload,
    ) -> Result<ImportOutcome, ImportFailure> {
        self.check_upload(upload)?;

        let Some(customer_id) = customer_id else {
            warn!("❌ Import requested without a valid customer id");
            return Err(ImportFailure::CustomerNotFound);
        };

        if self.store.find_active_customer(customer_id).await?.is_none() {
            warn!("❌ Import requested for unknown or inactive customer {}", customer_id);
            return Err(ImportFailure::CustomerNotFound);
        }

        let rows = spreadsheet::read_import_rows(&upload.bytes).map_err(|e| {
            error!("❌ Could not read import file '{}': {}", upload.file_name, e);
            ImportFailure::UnreadableFile(e.to_string())
        })?;

        if rows.is_empty() {
            return Err(ImportFailure::EmptyFile);
        }

        info!(
            "🔍 Importing {} rows from '{}' for customer {}",
            rows.len(),
            upload.file_name,
            customer_id
        );

        let reference = self.store.load_reference_data().await?;
        let existing = self.store.active_vehicle_identifiers(customer_id).await?;

        let outcome = VehicleRowValidator::new(&reference, customer_id, &existing).run(&rows);

        if !outcome.created.is_empty() {
            let inserted = self.store.insert_customer_vehicles(&outcome.created).await?;
            info!("💾 Inserted {} vehicles for customer {}", inserted, customer_id);
        }

        info!(
            "✅ Import finished for customer {}: {} total, {} ok, {} failed",
            customer_id, outcome.total_rows, outcome.success_count, outcome.error_count
        );

        Ok(outcome)
    }
}
