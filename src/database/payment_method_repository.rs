use crate::database::error::DatabaseError;
use crate::database::repository::TransactionalRepository;
use crate::database::TableNames;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

/// Installed payment gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct PaymentMethod {
    pub id: i64,
    pub title: String,
    /// Provider identifier selecting the configuration schema
    pub folder: String,
    /// Whether the method is offered at checkout
    pub installed: bool,
}

/// Repository for the payment methods table
#[derive(Clone)]
pub struct PaymentMethodRepository {
    pool: PgPool,
    table: String,
}

impl PaymentMethodRepository {
    pub fn new(pool: PgPool, tables: &TableNames) -> Self {
        Self {
            pool,
            table: tables.payments.clone(),
        }
    }

    fn select_columns() -> &'static str {
        "payment_id AS id, payment_title AS title, payment_folder AS folder, \
         payment_install AS installed"
    }

    /// Find a payment method by its id
    pub async fn find_by_id(&self, id: i64) -> Result<Option<PaymentMethod>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE payment_id = $1",
            Self::select_columns(),
            self.table
        );

        sqlx::query_as::<_, PaymentMethod>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// All payment methods ordered by id
    pub async fn find_all(&self) -> Result<Vec<PaymentMethod>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY payment_id",
            Self::select_columns(),
            self.table
        );

        sqlx::query_as::<_, PaymentMethod>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Create a payment method row (installation/seed path)
    pub async fn create(
        &self,
        title: &str,
        folder: &str,
        installed: bool,
    ) -> Result<PaymentMethod, DatabaseError> {
        let sql = format!(
            "INSERT INTO {} (payment_title, payment_folder, payment_install) \
             VALUES ($1, $2, $3) \
             RETURNING {}",
            self.table,
            Self::select_columns()
        );

        sqlx::query_as::<_, PaymentMethod>(&sql)
            .bind(title)
            .bind(folder)
            .bind(installed)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_sqlx)
    }

    /// Update title and install flag inside an open transaction.
    ///
    /// `None` leaves the column untouched. Returns `None` when no row has `id`.
    pub async fn update_in_tx(
        &self,
        conn: &mut PgConnection,
        id: i64,
        title: Option<&str>,
        installed: Option<bool>,
    ) -> Result<Option<PaymentMethod>, DatabaseError> {
        let sql = format!(
            "UPDATE {} \
             SET payment_title = COALESCE($2, payment_title), \
                 payment_install = COALESCE($3, payment_install) \
             WHERE payment_id = $1 \
             RETURNING {}",
            self.table,
            Self::select_columns()
        );

        sqlx::query_as::<_, PaymentMethod>(&sql)
            .bind(id)
            .bind(title)
            .bind(installed)
            .fetch_optional(conn)
            .await
            .map_err(DatabaseError::from_sqlx)
    }
}

impl TransactionalRepository for PaymentMethodRepository {
    fn pool(&self) -> &PgPool {
        &self.pool
    }
}
