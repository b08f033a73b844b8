//! Static registry of payment gateway configuration schemas
//!
//! Each installed payment method carries a folder name (`stripe`, `paypal`,
//! ...). The folder selects a schema from this table, which lists the options
//! the admin panel renders and the submission handler accepts. Adding a
//! gateway is a new entry here, nothing else.
//!
//! Option keys live in one flat table shared by every provider, so a key may
//! only be declared once across the whole registry.

use crate::payments::types::{Choice, FieldDescriptor, FieldKind, ProviderSchema};
use std::collections::HashSet;
use thiserror::Error;

const PAYMENT_MODE: &[Choice] = &[
    Choice {
        value: "one_time",
        label: "One Time",
    },
    Choice {
        value: "recurring",
        label: "Recurring",
    },
    Choice {
        value: "both",
        label: "Both",
    },
];

// Sandbox vocabularies differ per gateway and are stored verbatim.
const PAYPAL_SANDBOX: &[Choice] = &[
    Choice {
        value: "Yes",
        label: "Sandbox Test Mode",
    },
    Choice {
        value: "No",
        label: "Live Mode",
    },
];

const PAYTM_ENVIRONMENT: &[Choice] = &[
    Choice {
        value: "TEST",
        label: "Sandbox Test Mode",
    },
    Choice {
        value: "PROD",
        label: "Live Mode",
    },
];

const TWOCHECKOUT_ENVIRONMENT: &[Choice] = &[
    Choice {
        value: "production",
        label: "Live Mode",
    },
    Choice {
        value: "sandbox",
        label: "Test Mode",
    },
];

const LIVE_OR_TEST: &[Choice] = &[
    Choice {
        value: "live",
        label: "Live Mode",
    },
    Choice {
        value: "test",
        label: "Test Mode",
    },
];

const PAYPAL: &[FieldDescriptor] = &[
    FieldDescriptor::select("paypal_sandbox_mode", "Live Mode/ Sandbox Mode", PAYPAL_SANDBOX),
    FieldDescriptor::select("paypal_payment_mode", "Payment Mode:", PAYMENT_MODE),
    FieldDescriptor::text("paypal_api_client_id", "Paypal API Client Id:"),
    FieldDescriptor::text("paypal_api_secret", "Paypal API Secret:").sensitive(),
];

const STRIPE: &[FieldDescriptor] = &[
    FieldDescriptor::select("stripe_payment_mode", "Payment Mode:", PAYMENT_MODE),
    FieldDescriptor::text("stripe_publishable_key", "Stripe Publishable Key:"),
    FieldDescriptor::text("stripe_secret_key", "Stripe Secret Key:").sensitive(),
    FieldDescriptor::text("stripe_webhook_secret", "Stripe Webhook Secret:").sensitive(),
];

const CCAVENUE: &[FieldDescriptor] = &[
    FieldDescriptor::text("CCAVENUE_MERCHANT_KEY", "CCAvenue Merchant key:")
        .placeholder("Enter your CCAvenue Merchant key")
        .sensitive(),
    FieldDescriptor::text("CCAVENUE_ACCESS_CODE", "CCAvenue Access Code:")
        .placeholder("Enter your CCAvenue Access Code"),
    FieldDescriptor::text("CCAVENUE_WORKING_KEY", "CCAvenue Working Key:")
        .placeholder("Enter your CCAvenue Working Key")
        .sensitive(),
];

const PAYTM: &[FieldDescriptor] = &[
    FieldDescriptor::select(
        "PAYTM_ENVIRONMENT",
        "Live Mode/ Sandbox Mode",
        PAYTM_ENVIRONMENT,
    ),
    FieldDescriptor::text("PAYTM_MERCHANT_KEY", "Paytm Merchant key:")
        .placeholder("Enter your Merchant key")
        .help("Change this constant's value with Merchant key downloaded from portal")
        .sensitive(),
    FieldDescriptor::text("PAYTM_MERCHANT_MID", "Paytm Merchant ID:")
        .placeholder("Enter your MID (Merchant ID)")
        .help("Change this constant's value with MID (Merchant ID) received from Paytm"),
    FieldDescriptor::text("PAYTM_MERCHANT_WEBSITE", "Paytm Website name:")
        .placeholder("Enter your Website name")
        .help("Change this constant's value with Website name received from Paytm"),
];

const PAYSTACK: &[FieldDescriptor] = &[
    FieldDescriptor::text("paystack_secret_key", "Paystack Secret Key:")
        .placeholder("Enter your Paystack Secret Key")
        .sensitive(),
    FieldDescriptor::text("paystack_public_key", "Paystack Public Key:")
        .placeholder("Enter your Paystack Public Key"),
];

const PAYUMONEY: &[FieldDescriptor] = &[
    FieldDescriptor::select("payumoney_sandbox_mode", "Live Mode/ Test Mode", LIVE_OR_TEST),
    FieldDescriptor::text("payumoney_merchant_id", "Payumoney Merchant ID:")
        .placeholder("Enter your Payumoney Merchant ID"),
    FieldDescriptor::text("payumoney_merchant_key", "Payumoney Merchant Key:")
        .placeholder("Enter your Payumoney Merchant Key")
        .sensitive(),
    FieldDescriptor::text("payumoney_merchant_salt", "Payumoney Merchant Salt:")
        .placeholder("Enter your Payumoney Merchant Salt")
        .sensitive(),
];

const TWOCHECKOUT: &[FieldDescriptor] = &[
    FieldDescriptor::select(
        "2checkout_sandbox_mode",
        "Live Mode/ Test Mode",
        TWOCHECKOUT_ENVIRONMENT,
    ),
    FieldDescriptor::text("checkout_account_number", "2Checkout Account Number:")
        .placeholder("Enter your 2Checkout Account Number"),
    FieldDescriptor::text("checkout_public_key", "Publishable Key:")
        .placeholder("Enter your 2Checkout Publishable Key."),
    FieldDescriptor::text("checkout_private_key", "Private API Key:")
        .placeholder("Enter your 2Checkout Private Key")
        .sensitive(),
];

const MONEYBOOKERS: &[FieldDescriptor] = &[FieldDescriptor::text(
    "skrill_merchant_id",
    "Skrill Merchant Id:",
)
.placeholder("Enter your skrill(moneybookers) merchant id")];

const NOCHEX: &[FieldDescriptor] = &[FieldDescriptor::text(
    "nochex_merchant_id",
    "NoChex Merchant Id:",
)
.placeholder("Enter your NoChex Merchant Id")];

const WIRE_TRANSFER: &[FieldDescriptor] = &[FieldDescriptor::textarea(
    "company_bank_info",
    "Bank Information :",
)
.placeholder("Write Information about Bank transfer")];

const CHEQUE: &[FieldDescriptor] = &[
    FieldDescriptor::textarea("company_cheque_info", "Cheque Information:")
        .placeholder("Write Cheque Information"),
    FieldDescriptor::text("cheque_payable_to", "Cheque Payable To:").placeholder("Payable To"),
];

const MOLLIE: &[FieldDescriptor] =
    &[FieldDescriptor::text("mollie_api_key", "API Key").sensitive()];

const IYZICO: &[FieldDescriptor] = &[
    FieldDescriptor::select("iyzico_sandbox_mode", "Live Mode/ Sandbox Mode", LIVE_OR_TEST),
    FieldDescriptor::text("iyzico_api_key", "iyzico API Key:")
        .placeholder("Enter your iyzico API Key"),
    FieldDescriptor::text("iyzico_secret_key", "iyzico Secret Key:")
        .placeholder("Enter your iyzico Secret Key")
        .sensitive(),
];

const MIDTRANS: &[FieldDescriptor] = &[
    FieldDescriptor::select("midtrans_sandbox_mode", "Live Mode/ Sandbox Mode", LIVE_OR_TEST),
    FieldDescriptor::text("midtrans_client_key", "Midtrans Client Key:")
        .placeholder("Enter your midtrans Client Key"),
    FieldDescriptor::text("midtrans_server_key", "Midtrans Server Key:")
        .placeholder("Enter your midtrans Server Key")
        .sensitive(),
];

const PAYTABS: &[FieldDescriptor] = &[
    FieldDescriptor::text("paytabs_profile_id", "Paytabs Profile id:")
        .placeholder("Enter Your Paytabs Profile id"),
    FieldDescriptor::text("paytabs_secret_key", "Paytabs Server Key:")
        .placeholder("Enter your Paytabs Server Key")
        .sensitive(),
];

const TELR: &[FieldDescriptor] = &[
    FieldDescriptor::select("telr_sandbox_mode", "Live Mode/ Sandbox Mode", LIVE_OR_TEST),
    FieldDescriptor::text("telr_store_id", "Telr Store ID:").placeholder("Enter Your Telr Store ID"),
    FieldDescriptor::text("telr_authkey", "Telr Auth Key:")
        .placeholder("Enter your Telr Auth Key")
        .sensitive(),
];

const RAZORPAY: &[FieldDescriptor] = &[
    FieldDescriptor::text("razorpay_api_key", "Razorpay API Key:")
        .placeholder("Enter your razorpay API Key"),
    FieldDescriptor::text("razorpay_secret_key", "Razorpay Secret Key:")
        .placeholder("Enter your razorpay Secret Key")
        .sensitive(),
];

const FLUTTERWAVE: &[FieldDescriptor] = &[
    FieldDescriptor::text("flutterwave_api_key", "Flutterwave API Key:")
        .placeholder("Enter your flutterwave API Key"),
    FieldDescriptor::text("flutterwave_secret_key", "Flutterwave Secret Key:")
        .placeholder("Enter your flutterwave Secret Key")
        .sensitive(),
];

/// Every supported gateway, in admin listing order
pub static PROVIDER_SCHEMAS: &[ProviderSchema] = &[
    ProviderSchema {
        provider_id: "paypal",
        fields: PAYPAL,
        webhook_path: Some("webhook/paypal"),
        webhook_label: Some("Paypal API WebHook Url:"),
    },
    ProviderSchema {
        provider_id: "stripe",
        fields: STRIPE,
        webhook_path: Some("webhook/stripe"),
        webhook_label: Some("Stripe WebHook Url:"),
    },
    ProviderSchema {
        provider_id: "ccavenue",
        fields: CCAVENUE,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "paytm",
        fields: PAYTM,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "paystack",
        fields: PAYSTACK,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "payumoney",
        fields: PAYUMONEY,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "2checkout",
        fields: TWOCHECKOUT,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "moneybookers",
        fields: MONEYBOOKERS,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "nochex",
        fields: NOCHEX,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "wire_transfer",
        fields: WIRE_TRANSFER,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "cheque",
        fields: CHEQUE,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "mollie",
        fields: MOLLIE,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "iyzico",
        fields: IYZICO,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "midtrans",
        fields: MIDTRANS,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "paytabs",
        fields: PAYTABS,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "telr",
        fields: TELR,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "razorpay",
        fields: RAZORPAY,
        webhook_path: None,
        webhook_label: None,
    },
    ProviderSchema {
        provider_id: "flutterwave",
        fields: FLUTTERWAVE,
        webhook_path: None,
        webhook_label: None,
    },
];

/// Look up the schema for a provider folder. Matching is exact.
pub fn schema_for(provider_id: &str) -> Option<&'static ProviderSchema> {
    PROVIDER_SCHEMAS
        .iter()
        .find(|schema| schema.provider_id == provider_id)
}

/// Ordered fields for a provider folder, empty for unknown folders
pub fn fields_for(provider_id: &str) -> &'static [FieldDescriptor] {
    schema_for(provider_id).map(|s| s.fields).unwrap_or(&[])
}

pub fn is_known(provider_id: &str) -> bool {
    schema_for(provider_id).is_some()
}

pub fn provider_ids() -> impl Iterator<Item = &'static str> {
    PROVIDER_SCHEMAS.iter().map(|s| s.provider_id)
}

/// Find the provider that declares an option key
pub fn owner_of(option_key: &str) -> Option<&'static str> {
    PROVIDER_SCHEMAS
        .iter()
        .find(|schema| schema.field(option_key).is_some())
        .map(|schema| schema.provider_id)
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("option key '{key}' is declared by both '{first}' and '{second}'")]
    DuplicateOptionKey {
        key: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("provider '{0}' is registered more than once")]
    DuplicateProvider(&'static str),

    #[error("select field '{0}' has no choices")]
    EmptyChoices(&'static str),
}

/// Check the table invariants: unique providers, globally unique option
/// keys and non-empty select vocabularies.
pub fn validate() -> Result<(), RegistryError> {
    validate_schemas(PROVIDER_SCHEMAS)
}

fn validate_schemas(schemas: &[ProviderSchema]) -> Result<(), RegistryError> {
    let mut providers = HashSet::new();
    let mut keys: Vec<(&'static str, &'static str)> = Vec::new();

    for schema in schemas {
        if !providers.insert(schema.provider_id) {
            return Err(RegistryError::DuplicateProvider(schema.provider_id));
        }

        for field in schema.fields {
            if field.kind == FieldKind::Select && field.choices.is_empty() {
                return Err(RegistryError::EmptyChoices(field.option_key));
            }

            if let Some((_, first)) = keys.iter().find(|(key, _)| *key == field.option_key) {
                return Err(RegistryError::DuplicateOptionKey {
                    key: field.option_key,
                    first: *first,
                    second: schema.provider_id,
                });
            }
            keys.push((field.option_key, schema.provider_id));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_consistent() {
        assert_eq!(validate(), Ok(()));
        assert_eq!(PROVIDER_SCHEMAS.len(), 18);
    }

    #[test]
    fn stripe_schema_matches_table() {
        let keys: Vec<_> = schema_for("stripe").unwrap().option_keys().collect();
        assert_eq!(
            keys,
            vec![
                "stripe_payment_mode",
                "stripe_publishable_key",
                "stripe_secret_key",
                "stripe_webhook_secret",
            ]
        );
        assert_eq!(schema_for("stripe").unwrap().webhook_path, Some("webhook/stripe"));
    }

    #[test]
    fn wire_transfer_has_single_textarea() {
        let fields = fields_for("wire_transfer");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].option_key, "company_bank_info");
        assert_eq!(fields[0].kind, FieldKind::Textarea);
    }

    #[test]
    fn unknown_provider_resolves_to_empty() {
        assert!(fields_for("bitcoin").is_empty());
        assert!(!is_known("bitcoin"));
        // folder names are matched exactly
        assert!(!is_known("Stripe"));
    }

    #[test]
    fn sandbox_vocabularies_are_preserved() {
        let values = |provider: &str, key: &str| -> Vec<&'static str> {
            schema_for(provider)
                .and_then(|s| s.field(key))
                .map(|f| f.choices.iter().map(|c| c.value).collect())
                .unwrap_or_default()
        };

        assert_eq!(values("paypal", "paypal_sandbox_mode"), vec!["Yes", "No"]);
        assert_eq!(values("paytm", "PAYTM_ENVIRONMENT"), vec!["TEST", "PROD"]);
        assert_eq!(
            values("2checkout", "2checkout_sandbox_mode"),
            vec!["production", "sandbox"]
        );
        assert_eq!(values("telr", "telr_sandbox_mode"), vec!["live", "test"]);
    }

    #[test]
    fn owner_lookup() {
        assert_eq!(owner_of("stripe_secret_key"), Some("stripe"));
        assert_eq!(owner_of("company_bank_info"), Some("wire_transfer"));
        assert_eq!(owner_of("site_title"), None);
    }

    #[test]
    fn duplicate_keys_are_detected() {
        const A: &[FieldDescriptor] = &[FieldDescriptor::text("shared_key", "Key")];
        const B: &[FieldDescriptor] = &[FieldDescriptor::text("shared_key", "Key")];
        let schemas = [
            ProviderSchema {
                provider_id: "a",
                fields: A,
                webhook_path: None,
                webhook_label: None,
            },
            ProviderSchema {
                provider_id: "b",
                fields: B,
                webhook_path: None,
                webhook_label: None,
            },
        ];

        assert_eq!(
            validate_schemas(&schemas),
            Err(RegistryError::DuplicateOptionKey {
                key: "shared_key",
                first: "a",
                second: "b",
            })
        );
    }

    #[test]
    fn labels_keep_panel_punctuation() {
        let label = |provider: &str, key: &str| schema_for(provider).unwrap().field(key).unwrap().label;

        assert_eq!(label("paypal", "paypal_sandbox_mode"), "Live Mode/ Sandbox Mode");
        assert_eq!(label("paypal", "paypal_api_secret"), "Paypal API Secret:");
        assert_eq!(label("mollie", "mollie_api_key"), "API Key");
        assert_eq!(label("wire_transfer", "company_bank_info"), "Bank Information :");
        assert_eq!(
            schema_for("paypal").unwrap().webhook_label,
            Some("Paypal API WebHook Url:")
        );
    }

    #[test]
    fn paytm_credentials_carry_help() {
        let paytm = schema_for("paytm").unwrap();
        for key in ["PAYTM_MERCHANT_KEY", "PAYTM_MERCHANT_MID", "PAYTM_MERCHANT_WEBSITE"] {
            assert!(paytm.field(key).unwrap().help.is_some(), "{key} has no help text");
        }
        assert_eq!(paytm.field("PAYTM_ENVIRONMENT").unwrap().help, None);
    }

    #[test]
    fn webhook_rows_are_labelled() {
        for schema in PROVIDER_SCHEMAS {
            assert_eq!(schema.webhook_path.is_some(), schema.webhook_label.is_some());
        }
    }

    #[test]
    fn sensitive_flags() {
        let stripe = schema_for("stripe").unwrap();
        assert!(stripe.field("stripe_secret_key").unwrap().sensitive);
        assert!(!stripe.field("stripe_publishable_key").unwrap().sensitive);
    }
}
