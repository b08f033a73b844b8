//! Storage seams used by the settings services
//!
//! Handlers never reach a global option store: they receive a `SettingsStore`
//! and read or write through it. Postgres and in-memory backends implement
//! the same traits.

use crate::database::error::DatabaseError;
use crate::database::payment_method_repository::PaymentMethod;
use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};

/// Read access to the payment methods table
#[async_trait]
pub trait PaymentMethodStore: Send + Sync {
    async fn find_payment_method(&self, id: i64) -> Result<Option<PaymentMethod>, DatabaseError>;

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, DatabaseError>;
}

/// Read access to the flat key/value options table
#[async_trait]
pub trait OptionStore: Send + Sync {
    async fn get_option(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    /// Fetch several options at once. Keys without a row are absent from the map.
    async fn get_options(&self, keys: &[&str]) -> Result<HashMap<String, String>, DatabaseError>;
}

/// A validated change to one payment method and its provider options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub method_id: i64,
    pub title: Option<String>,
    pub installed: Option<bool>,
    pub options: BTreeMap<String, String>,
}

impl SettingsUpdate {
    pub fn new(method_id: i64) -> Self {
        Self {
            method_id,
            title: None,
            installed: None,
            options: BTreeMap::new(),
        }
    }
}

/// Full store used by the admin panel
#[async_trait]
pub trait SettingsStore: PaymentMethodStore + OptionStore {
    /// Apply every part of `update` or none of it.
    ///
    /// Returns the payment method as stored after the update, or a
    /// `NotFound` error when the method does not exist.
    async fn apply_update(&self, update: &SettingsUpdate) -> Result<PaymentMethod, DatabaseError>;
}

/// Repositories backed by a Postgres pool
pub trait TransactionalRepository {
    fn pool(&self) -> &PgPool;
}
