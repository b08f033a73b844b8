//! Admin settings backend for payment gateway plugins
//!
//! Renders the per-gateway settings panel from a static schema registry and
//! persists `paymentEdit` submissions into the flat options table.

pub mod api;
#[cfg(feature = "cache")]
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod payments;
pub mod services;
