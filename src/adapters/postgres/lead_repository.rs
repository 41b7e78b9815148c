//! PostgreSQL implementation of LeadRepository.
//!
//! Persists customers to `customers` and chat exchanges to `conversations`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{CustomerId, Timestamp};
use crate::domain::lead::{ConversationEntry, CustomerData, CustomerRecord};
use crate::ports::{LeadRepository, LeadRepositoryError};

/// PostgreSQL implementation of LeadRepository.
#[derive(Clone)]
pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    /// Creates a new PostgresLeadRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn store_customer(
        &self,
        data: CustomerData,
    ) -> Result<CustomerRecord, LeadRepositoryError> {
        let row = sqlx::query(
            r#"
            INSERT INTO customers (
                name, email, phone, age, gender, zip_code, insurance_type,
                vehicle_number, vehicle_model, vehicle_year, medical_history,
                coverage_amount, monthly_investment, investment_goal, current_provider,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING customer_id, created_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.age.and_then(|age| i32::try_from(age).ok()))
        .bind(data.gender.as_deref())
        .bind(&data.zip_code)
        .bind(&data.insurance_type)
        .bind(data.vehicle_number.as_deref())
        .bind(data.vehicle_model.as_deref())
        .bind(data.vehicle_year.as_deref())
        .bind(data.medical_history.as_deref())
        .bind(data.coverage_amount)
        .bind(data.monthly_investment)
        .bind(data.investment_goal.as_deref())
        .bind(data.current_provider.as_deref())
        .bind(Timestamp::now().as_datetime())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| database_error("insert customer", e))?;

        let customer_id: i64 = column(&row, "customer_id")?;
        let created_at: chrono::DateTime<chrono::Utc> = column(&row, "created_at")?;

        Ok(CustomerRecord {
            customer_id: CustomerId::new(customer_id),
            data,
            created_at: Timestamp::from_datetime(created_at),
        })
    }

    async fn get_customer(
        &self,
        id: CustomerId,
    ) -> Result<Option<CustomerRecord>, LeadRepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT customer_id, name, email, phone, age, gender, zip_code, insurance_type,
                   vehicle_number, vehicle_model, vehicle_year, medical_history,
                   coverage_amount, monthly_investment, investment_goal, current_provider,
                   created_at
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| database_error("fetch customer", e))?;

        row.as_ref().map(row_to_customer).transpose()
    }

    async fn record_conversation(
        &self,
        entry: ConversationEntry,
    ) -> Result<(), LeadRepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO conversations (
                customer_id, session_id, message, response, message_type, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.customer_id.value())
        .bind(entry.session_id.as_str())
        .bind(&entry.message)
        .bind(&entry.response)
        .bind(&entry.message_type)
        .bind(Timestamp::now().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| database_error("insert conversation", e))?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), LeadRepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| LeadRepositoryError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn database_error(action: &str, error: sqlx::Error) -> LeadRepositoryError {
    LeadRepositoryError::Database(format!("Failed to {}: {}", action, error))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, LeadRepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| LeadRepositoryError::Database(format!("Failed to get {}: {}", name, e)))
}

fn row_to_customer(row: &PgRow) -> Result<CustomerRecord, LeadRepositoryError> {
    let age: Option<i32> = column(row, "age")?;
    let created_at: chrono::DateTime<chrono::Utc> = column(row, "created_at")?;

    Ok(CustomerRecord {
        customer_id: CustomerId::new(column(row, "customer_id")?),
        data: CustomerData {
            name: column(row, "name")?,
            email: column(row, "email")?,
            phone: column(row, "phone")?,
            age: age.map(i64::from),
            gender: column(row, "gender")?,
            zip_code: column(row, "zip_code")?,
            insurance_type: column(row, "insurance_type")?,
            vehicle_number: column(row, "vehicle_number")?,
            vehicle_model: column(row, "vehicle_model")?,
            vehicle_year: column(row, "vehicle_year")?,
            medical_history: column(row, "medical_history")?,
            coverage_amount: column(row, "coverage_amount")?,
            monthly_investment: column(row, "monthly_investment")?,
            investment_goal: column(row, "investment_goal")?,
            current_provider: column(row, "current_provider")?,
        },
        created_at: Timestamp::from_datetime(created_at),
    })
}
