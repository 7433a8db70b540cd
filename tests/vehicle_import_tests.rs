use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_xlsxwriter::Workbook;
use uuid::Uuid;

use insurance_backoffice::dto::vehicle_import_dto::VehicleImportResponse;
use insurance_backoffice::models::customer::{Customer, CustomerVehicle, VehicleIdentifiers};
use insurance_backoffice::models::vehicle_master::{
    EngineCapacity, VehicleMake, VehicleModel, VehicleYear,
};
use insurance_backoffice::services::vehicle_import_service::{
    ImportFailure, ImportUpload, ReferenceData, VehicleImportService, VehicleImportStore,
    DEFAULT_MAX_IMPORT_FILE_BYTES,
};
use insurance_backoffice::utils::errors::{conflict_error, AppError, AppResult};
use insurance_backoffice::utils::localization::Language;

/// In-memory store counting every call made by the importer
struct InMemoryStore {
    customer: Customer,
    reference: Mutex<ReferenceData>,
    vehicles: Mutex<Vec<CustomerVehicle>>,
    queries: AtomicUsize,
    inserts: AtomicUsize,
    fail_inserts: bool,
    conflict_on_insert: bool,
}

impl InMemoryStore {
    fn new() -> Self {
        let toyota = Uuid::new_v4();

        Self {
            customer: Customer {
                id: Uuid::new_v4(),
                name_en: "Ahmed Ali".to_string(),
                name_ar: "أحمد علي".to_string(),
                email: None,
                phone: None,
                is_active: true,
                created_at: Utc::now(),
            },
            reference: Mutex::new(ReferenceData {
                makes: vec![VehicleMake {
                    id: toyota,
                    name_en: "Toyota".to_string(),
                    name_ar: "تويوتا".to_string(),
                    is_active: true,
                }],
                models: vec![VehicleModel {
                    id: Uuid::new_v4(),
                    make_id: toyota,
                    name_en: "Camry".to_string(),
                    name_ar: "كامري".to_string(),
                    is_active: true,
                }],
                years: vec![VehicleYear {
                    id: Uuid::new_v4(),
                    year: 2023,
                    is_active: true,
                }],
                capacities: vec![EngineCapacity {
                    id: Uuid::new_v4(),
                    capacity: Decimal::new(25, 1),
                    name_en: Some("2.5 L".to_string()),
                    name_ar: None,
                    is_active: true,
                }],
            }),
            vehicles: Mutex::new(Vec::new()),
            queries: AtomicUsize::new(0),
            inserts: AtomicUsize::new(0),
            fail_inserts: false,
            conflict_on_insert: false,
        }
    }

    fn customer_id(&self) -> Uuid {
        self.customer.id
    }

    fn stored(&self) -> Vec<CustomerVehicle> {
        self.vehicles.lock().unwrap().clone()
    }

    fn add_year(&self, year: i32) {
        self.reference.lock().unwrap().years.push(VehicleYear {
            id: Uuid::new_v4(),
            year,
            is_active: true,
        });
    }
}

#[async_trait]
impl VehicleImportStore for InMemoryStore {
    async fn find_active_customer(&self, customer_id: Uuid) -> AppResult<Option<Customer>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(Some(self.customer.clone()).filter(|c| c.id == customer_id && c.is_active))
    }

    async fn load_reference_data(&self) -> AppResult<ReferenceData> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.reference.lock().unwrap().clone())
    }

    async fn active_vehicle_identifiers(
        &self,
        customer_id: Uuid,
    ) -> AppResult<Vec<VehicleIdentifiers>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .vehicles
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.customer_id == customer_id && v.is_active)
            .map(|v| VehicleIdentifiers {
                registration_number: v.registration_number.clone(),
                chassis_number: v.chassis_number.clone(),
            })
            .collect())
    }

    async fn insert_customer_vehicles(&self, vehicles: &[CustomerVehicle]) -> AppResult<u64> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        if self.conflict_on_insert {
            return Err(conflict_error(
                "Customer vehicle",
                "registration number",
                "ABC-1234",
            ));
        }
        self.vehicles.lock().unwrap().extend_from_slice(vehicles);
        Ok(vehicles.len() as u64)
    }
}

fn workbook(rows: &[[&str; 6]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = ["Make", "Model", "Year", "Engine Capacity", "Registration Number", "Chassis Number"];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string((r + 1) as u32, c as u16, *value).unwrap();
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

fn upload(rows: &[[&str; 6]]) -> ImportUpload {
    ImportUpload {
        file_name: "vehicles.xlsx".to_string(),
        bytes: workbook(rows),
    }
}

fn service(store: InMemoryStore) -> VehicleImportService<InMemoryStore> {
    VehicleImportService::new(store, DEFAULT_MAX_IMPORT_FILE_BYTES)
}

#[tokio::test]
async fn test_valid_row_creates_vehicle_with_resolved_ids() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(
            Some(customer_id),
            &upload(&[["Toyota", "Camry", "2023", "2.5", "ABC-1234", "JT123456789012345"]]),
        )
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!((outcome.total_rows, outcome.success_count, outcome.error_count), (1, 1, 0));

    let reference = service.store().reference.lock().unwrap().clone();
    let stored = service.store().stored();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].customer_id, customer_id);
    assert_eq!(stored[0].make_id, reference.makes[0].id);
    assert_eq!(stored[0].model_id, reference.models[0].id);
    assert_eq!(stored[0].year_id, reference.years[0].id);
    assert_eq!(stored[0].engine_capacity_id, Some(reference.capacities[0].id));
    assert_eq!(stored[0].registration_number.as_deref(), Some("ABC-1234"));
    assert_eq!(stored[0].chassis_number.as_deref(), Some("JT123456789012345"));
    assert!(stored[0].is_active);
}

#[tokio::test]
async fn test_missing_year_is_reported_and_nothing_written() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(Some(customer_id), &upload(&[["Toyota", "Camry", "", "", "ABC-1234", ""]]))
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.failures[0].error.message(Language::English), "Year is required");
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 0);
    assert!(service.store().stored().is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_within_file() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(
            Some(customer_id),
            &upload(&[
                ["Toyota", "Camry", "2023", "", "ABC-1234", ""],
                ["Toyota", "Camry", "2023", "", "abc-1234", ""],
            ]),
        )
        .await
        .unwrap();

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.failures[0].row.row_number, 2);
    assert_eq!(
        outcome.failures[0].error.message(Language::English),
        "Registration number 'abc-1234' already exists"
    );
    assert_eq!(service.store().stored().len(), 1);
}

#[tokio::test]
async fn test_unknown_make_stops_row_validation() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(Some(customer_id), &upload(&[["Lada", "Nope", "1800", "", "", ""]]))
        .await
        .unwrap();

    assert_eq!(outcome.error_count, 1);
    assert_eq!(
        outcome.failures[0].error.message(Language::English),
        "Make 'Lada' not found in system"
    );
}

#[tokio::test]
async fn test_counts_exclude_blank_rows_and_keep_row_numbers() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(
            Some(customer_id),
            &upload(&[
                ["Toyota", "Camry", "2023", "", "R-1", ""],
                ["", "", "", "", "", ""],
                ["Toyota", "Corolla", "2023", "", "R-2", ""],
                ["Toyota", "Camry", "2023", "", "R-3", ""],
            ]),
        )
        .await
        .unwrap();

    assert_eq!(outcome.total_rows, 3);
    assert_eq!(outcome.success_count + outcome.error_count, outcome.total_rows);
    assert_eq!(outcome.success_count, 2);
    assert_eq!(outcome.failures[0].row.row_number, 3);
    assert_eq!(
        outcome.failures[0].error.message(Language::English),
        "Model 'Corolla' not found for Make 'Toyota'"
    );
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rerun_of_fixed_rows_succeeds_independently() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let first = service
        .import(
            Some(customer_id),
            &upload(&[
                ["Toyota", "Camry", "2023", "", "R-1", ""],
                ["Toyota", "Camry", "2024", "", "R-2", ""],
            ]),
        )
        .await
        .unwrap();
    assert_eq!((first.success_count, first.error_count), (1, 1));

    service.store().add_year(2024);

    let second = service
        .import(Some(customer_id), &upload(&[["Toyota", "Camry", "2024", "", "R-2", ""]]))
        .await
        .unwrap();
    assert_eq!((second.success_count, second.error_count), (1, 0));
    assert_eq!(service.store().stored().len(), 2);

    let third = service
        .import(Some(customer_id), &upload(&[["Toyota", "Camry", "2023", "", "r-1", ""]]))
        .await
        .unwrap();
    assert_eq!(third.error_count, 1, "committed identifiers stay unique");
}

#[tokio::test]
async fn test_oversized_file_rejected_without_store_queries() {
    let service = VehicleImportService::new(InMemoryStore::new(), 1024);
    let customer_id = service.store().customer_id();

    let big = ImportUpload {
        file_name: "vehicles.xlsx".to_string(),
        bytes: vec![0u8; 2048],
    };
    let failure = service.import(Some(customer_id), &big).await.unwrap_err();

    assert!(matches!(failure, ImportFailure::FileTooLarge { size: 2048, max: 1024 }));
    assert_eq!(failure.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(service.store().queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_file_type_rejected_without_store_queries() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let csv = ImportUpload {
        file_name: "vehicles.csv".to_string(),
        bytes: b"Make,Model\nToyota,Camry\n".to_vec(),
    };
    let failure = service.import(Some(customer_id), &csv).await.unwrap_err();

    assert!(matches!(failure, ImportFailure::InvalidFileType { .. }));
    assert_eq!(failure.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(service.store().queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_customer() {
    let service = service(InMemoryStore::new());

    let failure = service
        .import(Some(Uuid::new_v4()), &upload(&[["Toyota", "Camry", "2023", "", "", ""]]))
        .await
        .unwrap_err();

    assert!(matches!(failure, ImportFailure::CustomerNotFound));
    assert_eq!(failure.message(Language::English), "Customer not found or inactive");
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_header_only_file_is_empty() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let failure = service.import(Some(customer_id), &upload(&[])).await.unwrap_err();
    assert!(matches!(failure, ImportFailure::EmptyFile));
}

#[tokio::test]
async fn test_unreadable_workbook() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let corrupt = ImportUpload {
        file_name: "vehicles.xlsx".to_string(),
        bytes: b"PK not really a zip".to_vec(),
    };
    let failure = service.import(Some(customer_id), &corrupt).await.unwrap_err();
    assert!(matches!(failure, ImportFailure::UnreadableFile(_)));
}

#[tokio::test]
async fn test_store_failure_aborts_import() {
    let mut store = InMemoryStore::new();
    store.fail_inserts = true;
    let service = service(store);
    let customer_id = service.store().customer_id();

    let failure = service
        .import(Some(customer_id), &upload(&[["Toyota", "Camry", "2023", "", "", ""]]))
        .await
        .unwrap_err();

    assert!(matches!(failure, ImportFailure::Store(_)));
    assert_eq!(failure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(service.store().stored().is_empty());
}

#[tokio::test]
async fn test_response_shape() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(
            Some(customer_id),
            &upload(&[
                ["Toyota", "Camry", "2023", "2.5", "ABC-1234", ""],
                ["Toyota", "Camry", "", "", "", ""],
            ]),
        )
        .await
        .unwrap();

    let body = serde_json::to_value(VehicleImportResponse::from_outcome(&outcome, Language::Arabic))
        .unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["totalRows"], 2);
    assert_eq!(body["successCount"], 1);
    assert_eq!(body["errorCount"], 1);
    assert_eq!(body["errors"][0]["rowNumber"], 2);
    assert_eq!(body["errors"][0]["make"], "Toyota");
    assert_eq!(body["errors"][0]["errorMessage"], "سنة الصنع مطلوبة");
}

#[tokio::test]
async fn test_duplicate_chassis_within_file() {
    let service = service(InMemoryStore::new());
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(
            Some(customer_id),
            &upload(&[
                ["Toyota", "Camry", "2023", "", "R-1", "JT123456789012345"],
                ["Toyota", "Camry", "2023", "", "R-2", " jt123456789012345 "],
            ]),
        )
        .await
        .unwrap();

    assert_eq!((outcome.success_count, outcome.error_count), (1, 1));
    assert_eq!(outcome.failures[0].row.row_number, 2);
    assert_eq!(
        outcome.failures[0].error.message(Language::English),
        "Chassis number 'jt123456789012345' already exists"
    );
    assert_eq!(service.store().stored().len(), 1);
}

#[tokio::test]
async fn test_inactive_models_and_years_are_ignored() {
    let store = InMemoryStore::new();
    {
        let mut reference = store.reference.lock().unwrap();
        let toyota = reference.makes[0].id;
        reference.models.push(VehicleModel {
            id: Uuid::new_v4(),
            make_id: toyota,
            name_en: "Cressida".to_string(),
            name_ar: "كريسيدا".to_string(),
            is_active: false,
        });
        reference.years.push(VehicleYear {
            id: Uuid::new_v4(),
            year: 1990,
            is_active: false,
        });
    }
    let service = service(store);
    let customer_id = service.store().customer_id();

    let outcome = service
        .import(
            Some(customer_id),
            &upload(&[
                ["Toyota", "Cressida", "2023", "", "R-1", ""],
                ["Toyota", "Camry", "1990", "", "R-2", ""],
            ]),
        )
        .await
        .unwrap();

    assert_eq!((outcome.success_count, outcome.error_count), (0, 2));
    assert_eq!(
        outcome.failures[0].error.message(Language::English),
        "Model 'Cressida' not found for Make 'Toyota'"
    );
    assert_eq!(
        outcome.failures[1].error.message(Language::English),
        "Year '1990' not found in system"
    );
    assert_eq!(service.store().inserts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_concurrent_registration_surfaces_as_conflict() {
    let mut store = InMemoryStore::new();
    store.conflict_on_insert = true;
    let service = service(store);
    let customer_id = service.store().customer_id();

    let failure = service
        .import(
            Some(customer_id),
            &upload(&[["Toyota", "Camry", "2023", "", "ABC-1234", ""]]),
        )
        .await
        .unwrap_err();

    assert!(matches!(failure, ImportFailure::Store(AppError::Conflict(_))));
    assert_eq!(failure.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        failure.message(Language::English),
        "Some vehicles were registered for this customer while the file was being imported. Please import the file again"
    );
    assert!(service.store().stored().is_empty());
}

#[tokio::test]
async fn test_missing_customer_id_checks_file_once_and_queries_nothing() {
    let service = VehicleImportService::new(InMemoryStore::new(), 1024);

    let big = ImportUpload {
        file_name: "vehicles.xlsx".to_string(),
        bytes: vec![0u8; 2048],
    };
    let failure = service.import(None, &big).await.unwrap_err();
    assert!(matches!(failure, ImportFailure::FileTooLarge { .. }));

    let small = ImportUpload {
        file_name: "vehicles.xlsx".to_string(),
        bytes: b"PK".to_vec(),
    };
    let failure = service.import(None, &small).await.unwrap_err();
    assert!(matches!(failure, ImportFailure::CustomerNotFound));
    assert_eq!(service.store().queries.load(Ordering::SeqCst), 0);
}
