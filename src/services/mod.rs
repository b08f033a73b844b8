//! Services module for the admin settings workflows

pub mod settings_form;
pub mod settings_submission;

pub use settings_form::{lookup_method, parse_method_id, render_form, SettingsForm};
pub use settings_submission::{submit_settings, PAYMENT_EDIT_ACTION};
