//! Database service for ingestion-service.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

use crate::models::{FileSummary, TransactionRecord};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::store::IngestionStore;
use service_core::error::AppError;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "ingestion-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["health_check"])
            .start_timer();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;

        timer.observe_duration();
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl IngestionStore for Database {
    #[instrument(skip(self), fields(file_name = %file_name))]
    async fn exists_file_summary(&self, file_name: &str) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["exists_file_summary"])
            .start_timer();

        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM file_summaries WHERE file_name = $1)
            "#,
        )
        .bind(file_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check file summary: {}", e))
        })?;

        timer.observe_duration();

        Ok(exists)
    }

    #[instrument(skip(self), fields(utr = %utr))]
    async fn exists_transaction(
        &self,
        utr: &str,
        amount: Option<Decimal>,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["exists_transaction"])
            .start_timer();

        let exists: bool = if let Some(amount) = amount {
            sqlx::query_scalar(
                r#"
                SELECT EXISTS(SELECT 1 FROM payout_transactions WHERE utr = $1 AND amount = $2)
                "#,
            )
            .bind(utr)
            .bind(amount)
            .fetch_one(&self.pool)
            .await
        } else {
            sqlx::query_scalar(
                r#"
                SELECT EXISTS(SELECT 1 FROM payout_transactions WHERE utr = $1)
                "#,
            )
            .bind(utr)
            .fetch_one(&self.pool)
            .await
        }
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check transaction: {}", e))
        })?;

        timer.observe_duration();

        Ok(exists)
    }

    #[instrument(skip(self, summary), fields(file_name = %summary.file_name))]
    async fn insert_file_summary(&self, summary: &FileSummary) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_file_summary"])
            .start_timer();

        sqlx::query(
            r#"
            INSERT INTO file_summaries (file_name, transaction_count, total_amount, duplicate_count)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&summary.file_name)
        .bind(summary.transaction_count)
        .bind(summary.total_amount)
        .bind(summary.duplicate_count)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The unique constraint on file_name is the race guard against
            // two simultaneous submissions of the same file.
            if e.as_database_error()
                .is_some_and(|d| d.is_unique_violation())
            {
                AppError::Conflict(anyhow::anyhow!(
                    "File summary '{}' already exists",
                    summary.file_name
                ))
            } else {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert file summary: {}", e))
            }
        })?;

        timer.observe_duration();
        info!(file_name = %summary.file_name, "File summary recorded");

        Ok(())
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    async fn insert_transactions(&self, records: &[TransactionRecord]) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["insert_transactions"])
            .start_timer();

        // One transaction for the whole batch: a mid-batch failure rolls
        // everything back, so the call is all-or-nothing.
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO payout_transactions
                    (utr, source_row_index, account_holder_name, account_number, ifsc_code,
                     amount, raw_amount, txn_date, file_name, status, remark, bank_remark)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                "#,
            )
            .bind(&record.utr)
            .bind(record.source_row_index)
            .bind(&record.account_holder_name)
            .bind(&record.account_number)
            .bind(&record.ifsc_code)
            .bind(record.amount)
            .bind(&record.raw_amount)
            .bind(record.transaction_date)
            .bind(&record.file_name)
            .bind(record.status.as_str())
            .bind(&record.remark)
            .bind(&record.bank_remark)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|d| d.is_unique_violation())
                {
                    AppError::Conflict(anyhow::anyhow!(
                        "Transaction with UTR {} already exists",
                        record.utr
                    ))
                } else {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to insert transaction: {}", e))
                }
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transactions: {}", e))
        })?;

        timer.observe_duration();
        info!(count = records.len(), "Transactions recorded");

        Ok(())
    }
}
