//! Handles `paymentEdit` submissions from the settings panel
//!
//! A submission is a flat map of form fields. It is checked as a whole
//! against the provider's schema before anything is written; one bad field
//! rejects everything and the store is never touched.

use crate::database::error::DatabaseErrorKind;
use crate::database::payment_method_repository::PaymentMethod;
use crate::database::repository::{SettingsStore, SettingsUpdate};
use crate::error::{
    AppError, AppErrorKind, AppResult, FieldError, InfrastructureError, ValidationError,
};
use crate::logging::mask_secret;
use crate::payments::registry;
use crate::payments::types::FieldKind;
use crate::services::settings_form::{lookup_method, parse_method_id};
use std::collections::{BTreeMap, HashMap};
use tracing::{error, info, warn};

/// Dispatch name the panel posts under
pub const PAYMENT_EDIT_ACTION: &str = "paymentEdit";

const ID_FIELD: &str = "id";
const TITLE_FIELD: &str = "title";
const INSTALL_FIELD: &str = "install";
const ACTION_FIELD: &str = "action";

/// Coerce the install flag. Accepts `1/0`, `true/false`, `on/off` and
/// `yes/no` in any case.
pub fn parse_install_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

/// Check every submitted field against the schema of `method` and collect
/// the accepted ones into an update.
pub fn build_update(
    method: &PaymentMethod,
    fields: &HashMap<String, String>,
) -> Result<SettingsUpdate, Vec<FieldError>> {
    let schema = registry::schema_for(&method.folder);
    let mut update = SettingsUpdate::new(method.id);
    let mut errors = Vec::new();

    // Sorted so error detail is stable
    let sorted: BTreeMap<&str, &str> = fields
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    for (key, value) in sorted {
        match key {
            ID_FIELD => {}
            ACTION_FIELD => {
                if value != PAYMENT_EDIT_ACTION {
                    errors.push(FieldError::new(
                        key,
                        format!("unsupported action '{}'", value),
                    ));
                }
            }
            TITLE_FIELD => {
                let title = value.trim();
                if title.is_empty() {
                    errors.push(FieldError::new(key, "title cannot be empty"));
                } else {
                    update.title = Some(title.to_string());
                }
            }
            INSTALL_FIELD => match parse_install_flag(value) {
                Some(flag) => update.installed = Some(flag),
                None => errors.push(FieldError::new(key, "must be on or off")),
            },
            _ => match schema.and_then(|s| s.field(key)) {
                Some(descriptor) if descriptor.accepts(value) => {
                    update.options.insert(key.to_string(), value.to_string());
                }
                Some(descriptor) => {
                    let allowed: Vec<&str> = descriptor.choices.iter().map(|c| c.value).collect();
                    errors.push(FieldError::new(
                        key,
                        format!("'{}' is not one of: {}", value, allowed.join(", ")),
                    ));
                }
                None => {
                    let message = match registry::owner_of(key) {
                        Some(owner) => format!(
                            "belongs to provider '{}', not '{}'",
                            owner, method.folder
                        ),
                        None => format!("is not a setting of provider '{}'", method.folder),
                    };
                    errors.push(FieldError::new(key, message));
                }
            },
        }
    }

    if errors.is_empty() {
        Ok(update)
    } else {
        Err(errors)
    }
}

/// Validate and persist one submission, all-or-nothing.
///
/// The method id is read from the `id` field. Returns the method as stored
/// after the commit.
pub async fn submit_settings<S>(store: &S, fields: &HashMap<String, String>) -> AppResult<PaymentMethod>
where
    S: SettingsStore + ?Sized,
{
    let raw_id = fields.get(ID_FIELD).ok_or_else(|| {
        AppError::new(AppErrorKind::Validation(ValidationError::MissingField {
            field: ID_FIELD.to_string(),
        }))
    })?;
    let id = parse_method_id(raw_id)?;
    let method = lookup_method(store, id).await?;

    let update = build_update(&method, fields).map_err(|errors| {
        warn!(
            method_id = id,
            folder = %method.folder,
            rejected = errors.len(),
            "Settings submission rejected"
        );
        AppError::fields(errors)
    })?;

    log_accepted(&method, &update);

    store.apply_update(&update).await.map_err(|e| match e.kind {
        // Deleted between lookup and commit
        DatabaseErrorKind::NotFound { .. } => AppError::not_found(id.to_string()),
        _ => {
            error!(method_id = id, error = %e, "Failed to save payment settings");
            AppError::new(AppErrorKind::Infrastructure(
                InfrastructureError::Persistence {
                    message: e.to_string(),
                },
            ))
        }
    })
}

fn log_accepted(method: &PaymentMethod, update: &SettingsUpdate) {
    let schema = registry::schema_for(&method.folder);

    for (key, value) in &update.options {
        let field = schema.and_then(|s| s.field(key));
        let shown = match field {
            Some(f) if f.sensitive => mask_secret(value),
            Some(f) if f.kind == FieldKind::Textarea => format!("<{} chars>", value.len()),
            _ => value.clone(),
        };
        info!(method_id = method.id, option = %key, value = %shown, "Option accepted");
    }
}
