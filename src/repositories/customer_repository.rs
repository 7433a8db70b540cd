use crate::dto::customer_dto::{BankDetailEntry, CustomerFormHeader, VehicleEntry};
use crate::models::customer::{Customer, CustomerBankDetail, CustomerVehicle, VehicleIdentifiers};
use crate::utils::errors::{conflict_error, AppError};
use chrono::Utc;
use sqlx::postgres::PgDatabaseError;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

/// Keeps each INSERT well under the PostgreSQL bind-parameter limit
const VEHICLE_INSERT_CHUNK: usize = 1000;

/// PostgreSQL unique_violation
const UNIQUE_VIOLATION: &str = "23505";

const REGISTRATION_UNIQUE_INDEX: &str = "uq_customer_vehicles_registration";
const CHASSIS_UNIQUE_INDEX: &str = "uq_customer_vehicles_chassis";

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    pub async fn find_active(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND is_active = TRUE"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    pub async fn bank_details(&self, customer_id: Uuid) -> Result<Vec<CustomerBankDetail>, AppError> {
        let details = sqlx::query_as::<_, CustomerBankDetail>(
            r#"
            SELECT * FROM customer_bank_details
            WHERE customer_id = $1
            ORDER BY is_primary DESC, created_at
            "#
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    pub async fn active_vehicles(&self, customer_id: Uuid) -> Result<Vec<CustomerVehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, CustomerVehicle>(
            r#"
            SELECT * FROM customer_vehicles
            WHERE customer_id = $1 AND is_active = TRUE
            ORDER BY created_at
            "#
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn active_vehicle_identifiers(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<VehicleIdentifiers>, AppError> {
        let identifiers = sqlx::query_as::<_, VehicleIdentifiers>(
            r#"
            SELECT registration_number, chassis_number
            FROM customer_vehicles
            WHERE customer_id = $1 AND is_active = TRUE
            "#
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(identifiers)
    }

    /// Insert all vehicles in one transaction.
    pub async fn insert_vehicles(&self, vehicles: &[CustomerVehicle]) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;
        let inserted = Self::insert_vehicles_in(&mut tx, vehicles).await?;
        tx.commit().await?;

        Ok(inserted)
    }

    /// Create a customer together with its bank details and vehicles.
    pub async fn create_with_children(
        &self,
        header: &CustomerFormHeader,
        bank_details: &[BankDetailEntry],
        vehicles: &[VehicleEntry],
    ) -> Result<Customer, AppError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, name_en, name_ar, email, phone, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6)
            RETURNING *
            "#
        )
        .bind(Uuid::new_v4())
        .bind(&header.name_en)
        .bind(&header.name_ar)
        .bind(&header.email)
        .bind(&header.phone)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        for detail in bank_details {
            sqlx::query(
                r#"
                INSERT INTO customer_bank_details (
                    id, customer_id, bank_id, account_holder, account_number,
                    iban, is_primary, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#
            )
            .bind(Uuid::new_v4())
            .bind(customer.id)
            .bind(detail.bank_id)
            .bind(&detail.account_holder)
            .bind(&detail.account_number)
            .bind(&detail.iban)
            .bind(detail.is_primary)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        let customer_vehicles: Vec<CustomerVehicle> = vehicles
            .iter()
            .map(|entry| CustomerVehicle {
                id: Uuid::new_v4(),
                customer_id: customer.id,
                make_id: entry.make_id,
                model_id: entry.model_id,
                year_id: entry.year_id,
                engine_capacity_id: entry.engine_capacity_id,
                registration_number: entry.registration_number.clone(),
                chassis_number: entry.chassis_number.clone(),
                is_active: true,
                created_at: now,
            })
            .collect();
        Self::insert_vehicles_in(&mut tx, &customer_vehicles).await?;

        tx.commit().await?;

        Ok(customer)
    }

    async fn insert_vehicles_in(
        tx: &mut Transaction<'_, Postgres>,
        vehicles: &[CustomerVehicle],
    ) -> Result<u64, AppError> {
        let mut inserted = 0;

        for chunk in vehicles.chunks(VEHICLE_INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Postgres>::new(
                r#"
                INSERT INTO customer_vehicles (
                    id, customer_id, make_id, model_id, year_id, engine_capacity_id,
                    registration_number, chassis_number, is_active, created_at
                )
                "#
            );
            builder.push_values(chunk, |mut row, vehicle| {
                row.push_bind(vehicle.id)
                    .push_bind(vehicle.customer_id)
                    .push_bind(vehicle.make_id)
                    .push_bind(vehicle.model_id)
                    .push_bind(vehicle.year_id)
                    .push_bind(vehicle.engine_capacity_id)
                    .push_bind(vehicle.registration_number.clone())
                    .push_bind(vehicle.chassis_number.clone())
                    .push_bind(vehicle.is_active)
                    .push_bind(vehicle.created_at);
            });

            let result = builder
                .build()
                .execute(&mut **tx)
                .await
                .map_err(vehicle_write_error)?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }
}

/// Maps a hit on the per-customer identifier indexes to a conflict; any other
/// database error stays a database error.
fn vehicle_write_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            if let Some(field) = identifier_field(db_err.constraint()) {
                let detail = db_err
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .and_then(duplicate_key_value);

                return match detail {
                    Some(value) => conflict_error("Customer vehicle", field, value),
                    None => AppError::Conflict(format!(
                        "Customer vehicle with this {} already exists",
                        field
                    )),
                };
            }
        }
    }

    AppError::Database(error)
}

fn identifier_field(constraint: Option<&str>) -> Option<&'static str> {
    match constraint? {
        REGISTRATION_UNIQUE_INDEX => Some("registration number"),
        CHASSIS_UNIQUE_INDEX => Some("chassis number"),
        _ => None,
    }
}

/// Last key column from a detail such as
/// `Key (customer_id, upper(...))=(<uuid>, ABC-1234) already exists.`
fn duplicate_key_value(detail: &str) -> Option<&str> {
    let start = detail.find(")=(")? + 3;
    let end = start + detail[start..].rfind(')')?;

    detail[start..end].rsplit(", ").next().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_field_from_constraint() {
        assert_eq!(
            identifier_field(Some(REGISTRATION_UNIQUE_INDEX)),
            Some("registration number")
        );
        assert_eq!(identifier_field(Some(CHASSIS_UNIQUE_INDEX)), Some("chassis number"));
        assert_eq!(identifier_field(Some("customers_pkey")), None);
        assert_eq!(identifier_field(None), None);
    }

    #[test]
    fn test_duplicate_key_value() {
        let detail = "Key (customer_id, upper(TRIM(BOTH FROM registration_number)))=\
            (7b0e5d0c-4c1a-4f7e-9f5e-3f1c2b7d9a10, ABC-1234) already exists.";
        assert_eq!(duplicate_key_value(detail), Some("ABC-1234"));
        assert_eq!(duplicate_key_value("duplicate key"), None);
    }

    #[test]
    fn test_non_database_errors_pass_through() {
        assert!(matches!(
            vehicle_write_error(sqlx::Error::RowNotFound),
            AppError::Database(sqlx::Error::RowNotFound)
        ));
    }
}
