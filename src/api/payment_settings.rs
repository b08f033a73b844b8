//! Admin endpoints for payment method settings
//!
//! `GET /admin/payments/edit?id=N` renders the slide panel and
//! `POST /admin/payments/edit` takes the panel's `paymentEdit` submission.
//! The `/api/admin` routes expose the same data as JSON.

use crate::api::panel::{message_panel, settings_panel};
use crate::api::AdminState;
use crate::error::{AppError, AppErrorKind, AppResult, DomainError, ValidationError};
use crate::middleware::error::{
    get_request_id_from_headers, success_response, success_response_with_message,
};
use crate::payments::registry::{self, PROVIDER_SCHEMAS};
use crate::services::settings_form::{lookup_method, parse_method_id, render_form};
use crate::services::settings_submission::submit_settings;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info};

#[derive(Debug, Deserialize)]
pub struct EditQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentMethodSummary {
    pub id: i64,
    pub title: String,
    pub folder: String,
    pub installed: bool,
    pub known_provider: bool,
}

/// Slide panel HTML. Failures render a message panel with a matching status
/// instead of the editor.
pub async fn edit_panel(
    State(state): State<AdminState>,
    Query(query): Query<EditQuery>,
) -> Response {
    let raw_id = query.id.unwrap_or_default();

    let result: AppResult<_> = async {
        let id = parse_method_id(&raw_id)?;
        let method = lookup_method(state.store.as_ref(), id).await?;
        render_form(&method, state.store.as_ref(), &state.site).await
    }
    .await;

    match result {
        Ok(form) => {
            info!(method_id = form.method_id, folder = %form.folder, "Settings panel rendered");
            Html(settings_panel(&form).into_string()).into_response()
        }
        Err(err) => error_panel(&err),
    }
}

fn error_panel(err: &AppError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let heading = match &err.kind {
        AppErrorKind::Domain(DomainError::PaymentMethodNotFound { .. }) => "Not found",
        AppErrorKind::Validation(ValidationError::InvalidPaymentMethodId { .. }) => "Invalid request",
        _ => "Error",
    };

    if status.is_server_error() {
        error!(error = ?err, "Failed to render settings panel");
    }

    (
        status,
        Html(message_panel(heading, &err.user_message()).into_string()),
    )
        .into_response()
}

/// `paymentEdit` submission, form-encoded
pub async fn submit_edit(
    State(state): State<AdminState>,
    headers: HeaderMap,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let request_id = get_request_id_from_headers(&headers);

    let method = submit_settings(state.store.as_ref(), &fields)
        .await
        .map_err(|e| match &request_id {
            Some(id) => e.with_request_id(id.clone()),
            None => e,
        })?;

    info!(
        method_id = method.id,
        folder = %method.folder,
        installed = method.installed,
        "Payment settings saved"
    );
    Ok(success_response_with_message("Saved Successfully", method))
}

/// Every payment method, flagged with whether its folder has a schema
pub async fn list_methods(State(state): State<AdminState>) -> Result<impl IntoResponse, AppError> {
    let methods = state.store.list_payment_methods().await?;

    let summaries: Vec<PaymentMethodSummary> = methods
        .into_iter()
        .map(|m| PaymentMethodSummary {
            known_provider: registry::is_known(&m.folder),
            id: m.id,
            title: m.title,
            folder: m.folder,
            installed: m.installed,
        })
        .collect();

    Ok(success_response(summaries))
}

/// The rendered form as JSON
pub async fn method_settings(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_method_id(&id)?;
    let method = lookup_method(state.store.as_ref(), id).await?;
    let form = render_form(&method, state.store.as_ref(), &state.site).await?;

    Ok(success_response(form))
}

/// Registry dump: providers in listing order with their descriptors
pub async fn list_providers() -> impl IntoResponse {
    success_response(PROVIDER_SCHEMAS)
}
