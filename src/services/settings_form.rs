//! Builds the settings form of one payment method
//!
//! The form is the universal `title`/`install` pair followed by the
//! provider's declared fields in registry order, each prefilled from the
//! option store. Rendering is read-only and deterministic: identical stored
//! values always produce an identical form.

use crate::config::SiteConfig;
use crate::database::payment_method_repository::PaymentMethod;
use crate::database::repository::{OptionStore, PaymentMethodStore};
use crate::error::{AppError, AppErrorKind, AppResult, ValidationError};
use crate::payments::registry;
use crate::payments::types::{FieldDescriptor, FieldKind};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Rows of every textarea in the panel
pub const TEXTAREA_ROWS: u8 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedChoice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
    /// Form input name, equal to the option key
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Current value, `""` when unset
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<RenderedChoice>,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsForm {
    pub method_id: i64,
    pub folder: String,
    /// e.g. `Stripe - Settings`
    pub heading: String,
    pub title: String,
    pub install_choices: Vec<RenderedChoice>,
    pub fields: Vec<RenderedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_label: Option<&'static str>,
    /// False when the folder has no registry entry; only the universal
    /// fields are shown then
    pub known_provider: bool,
}

impl SettingsForm {
    pub fn field(&self, name: &str) -> Option<&RenderedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn installed(&self) -> bool {
        self.install_choices
            .iter()
            .any(|c| c.value == "1" && c.selected)
    }
}

/// Parse the `id` query or form parameter
pub fn parse_method_id(raw: &str) -> AppResult<i64> {
    raw.trim().parse::<i64>().map_err(|_| {
        AppError::new(AppErrorKind::Validation(
            ValidationError::InvalidPaymentMethodId {
                value: raw.to_string(),
            },
        ))
    })
}

/// Fetch a payment method or fail with `PAYMENT_METHOD_NOT_FOUND`
pub async fn lookup_method<S>(store: &S, id: i64) -> AppResult<PaymentMethod>
where
    S: PaymentMethodStore + ?Sized,
{
    store
        .find_payment_method(id)
        .await?
        .ok_or_else(|| AppError::not_found(id.to_string()))
}

/// Render the form of `method` with values read through `store`
pub async fn render_form<S>(
    method: &PaymentMethod,
    store: &S,
    site: &SiteConfig,
) -> AppResult<SettingsForm>
where
    S: OptionStore + ?Sized,
{
    let schema = registry::schema_for(&method.folder);
    let descriptors = registry::fields_for(&method.folder);

    let keys: Vec<&str> = descriptors.iter().map(|f| f.option_key).collect();
    let stored = store.get_options(&keys).await?;

    let fields = descriptors
        .iter()
        .map(|descriptor| render_field(descriptor, current_value(descriptor, &stored)))
        .collect();

    debug!(
        method_id = method.id,
        folder = %method.folder,
        known_provider = schema.is_some(),
        "Rendered settings form"
    );

    Ok(SettingsForm {
        method_id: method.id,
        folder: method.folder.clone(),
        heading: heading_for(&method.folder),
        title: method.title.clone(),
        install_choices: install_choices(method.installed),
        fields,
        webhook_url: schema
            .and_then(|s| s.webhook_path)
            .map(|path| format!("{}{}", site.site_url, path)),
        webhook_label: schema.and_then(|s| s.webhook_label),
        known_provider: schema.is_some(),
    })
}

/// Stored value of a field, its default when unset or empty, else `""`
fn current_value<'a>(
    descriptor: &'static FieldDescriptor,
    stored: &'a HashMap<String, String>,
) -> &'a str {
    stored
        .get(descriptor.option_key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .or(descriptor.default)
        .unwrap_or_default()
}

fn render_field(descriptor: &'static FieldDescriptor, value: &str) -> RenderedField {
    let choices = descriptor
        .choices
        .iter()
        .map(|choice| RenderedChoice {
            value: choice.value,
            label: choice.label,
            selected: choice.value == value,
        })
        .collect();

    RenderedField {
        name: descriptor.option_key,
        label: descriptor.label,
        kind: descriptor.kind,
        value: value.to_string(),
        placeholder: descriptor.placeholder,
        help: descriptor.help,
        choices,
        sensitive: descriptor.sensitive,
        rows: (descriptor.kind == FieldKind::Textarea).then_some(TEXTAREA_ROWS),
    }
}

fn install_choices(installed: bool) -> Vec<RenderedChoice> {
    vec![
        RenderedChoice {
            value: "1",
            label: "On",
            selected: installed,
        },
        RenderedChoice {
            value: "0",
            label: "Off",
            selected: !installed,
        },
    ]
}

/// Folder with its first character upper-cased, then ` - Settings`
pub fn heading_for(folder: &str) -> String {
    let mut chars = folder.chars();
    let name: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{} - Settings", name)
}
