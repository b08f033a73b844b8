//! HTTP surface of the settings backend

pub mod health;
pub mod panel;
pub mod payment_settings;

use crate::config::SiteConfig;
use crate::database::repository::SettingsStore;
use crate::health::HealthChecker;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Shared state of the admin routes
#[derive(Clone)]
pub struct AdminState {
    pub store: Arc<dyn SettingsStore>,
    pub site: SiteConfig,
    pub health: HealthChecker,
}

impl AdminState {
    pub fn new(store: Arc<dyn SettingsStore>, site: SiteConfig) -> Self {
        Self {
            store,
            site,
            health: HealthChecker::default(),
        }
    }

    pub fn with_health(mut self, health: HealthChecker) -> Self {
        self.health = health;
        self
    }
}

/// All routes, without the request-id and logging layers
pub fn build_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/health/live", get(health::liveness))
        .route(
            "/admin/payments/edit",
            get(payment_settings::edit_panel).post(payment_settings::submit_edit),
        )
        .route("/api/admin/payments", get(payment_settings::list_methods))
        .route(
            "/api/admin/payments/{id}/settings",
            get(payment_settings::method_settings),
        )
        .route("/api/admin/providers", get(payment_settings::list_providers))
        .with_state(state)
}
