//! In-memory settings store
//!
//! Backs the integration tests and `SKIP_EXTERNALS` mode. All state lives
//! behind one lock so an update is applied to methods and options together.

use crate::database::error::DatabaseError;
use crate::database::payment_method_repository::PaymentMethod;
use crate::database::repository::{
    OptionStore, PaymentMethodStore, SettingsStore, SettingsUpdate,
};
use crate::payments::registry;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    methods: BTreeMap<i64, PaymentMethod>,
    options: HashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    state: RwLock<State>,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One disabled payment method per registered provider, ids from 1 in
    /// registry order.
    pub fn seeded_from_registry() -> Self {
        let methods = registry::provider_ids()
            .enumerate()
            .map(|(idx, provider)| {
                let id = idx as i64 + 1;
                (
                    id,
                    PaymentMethod {
                        id,
                        title: provider.to_string(),
                        folder: provider.to_string(),
                        installed: false,
                    },
                )
            })
            .collect();

        Self {
            state: RwLock::new(State {
                methods,
                options: HashMap::new(),
            }),
        }
    }

    pub fn with_method(self, method: PaymentMethod) -> Self {
        let mut state = self.state.into_inner();
        state.methods.insert(method.id, method);
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn with_option(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut state = self.state.into_inner();
        state.options.insert(key.into(), value.into());
        Self {
            state: RwLock::new(state),
        }
    }

    /// Snapshot of every stored option
    pub async fn options_snapshot(&self) -> HashMap<String, String> {
        self.state.read().await.options.clone()
    }
}

#[async_trait]
impl PaymentMethodStore for InMemorySettingsStore {
    async fn find_payment_method(&self, id: i64) -> Result<Option<PaymentMethod>, DatabaseError> {
        Ok(self.state.read().await.methods.get(&id).cloned())
    }

    async fn list_payment_methods(&self) -> Result<Vec<PaymentMethod>, DatabaseError> {
        Ok(self.state.read().await.methods.values().cloned().collect())
    }
}

#[async_trait]
impl OptionStore for InMemorySettingsStore {
    async fn get_option(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.state.read().await.options.get(key).cloned())
    }

    async fn get_options(&self, keys: &[&str]) -> Result<HashMap<String, String>, DatabaseError> {
        let state = self.state.read().await;
        Ok(keys
            .iter()
            .filter_map(|key| {
                state
                    .options
                    .get(*key)
                    .map(|value| ((*key).to_string(), value.clone()))
            })
            .collect())
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn apply_update(&self, update: &SettingsUpdate) -> Result<PaymentMethod, DatabaseError> {
        let mut state = self.state.write().await;

        let method = state
            .methods
            .get_mut(&update.method_id)
            .ok_or_else(|| DatabaseError::not_found("payment_method", update.method_id.to_string()))?;

        if let Some(title) = &update.title {
            method.title = title.clone();
        }
        if let Some(installed) = update.installed {
            method.installed = installed;
        }
        let updated = method.clone();

        for (key, value) in &update.options {
            state.options.insert(key.clone(), value.clone());
        }

        debug!(
            method_id = update.method_id,
            options = update.options.len(),
            "Applied settings update in memory"
        );
        Ok(updated)
    }
}
