use serde::Serialize;

/// Input widget used to edit a provider option
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Select,
    Textarea,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Select => "select",
            FieldKind::Textarea => "textarea",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One enumerated value of a select field
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Choice {
    /// Value written to the option store
    pub value: &'static str,
    /// Text shown to the admin
    pub label: &'static str,
}

/// Describes a single configurable option of a payment provider
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key in the flat options table, unique across all providers
    pub option_key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub choices: &'static [Choice],
    pub placeholder: Option<&'static str>,
    /// Hint shown under the input
    pub help: Option<&'static str>,
    /// Shown when the option has no stored value
    pub default: Option<&'static str>,
    /// Credentials and secrets; never written to logs in clear text
    pub sensitive: bool,
}

impl FieldDescriptor {
    pub const fn text(option_key: &'static str, label: &'static str) -> Self {
        Self {
            option_key,
            label,
            kind: FieldKind::Text,
            choices: &[],
            placeholder: None,
            help: None,
            default: None,
            sensitive: false,
        }
    }

    pub const fn select(
        option_key: &'static str,
        label: &'static str,
        choices: &'static [Choice],
    ) -> Self {
        Self {
            option_key,
            label,
            kind: FieldKind::Select,
            choices,
            placeholder: None,
            help: None,
            default: None,
            sensitive: false,
        }
    }

    pub const fn textarea(option_key: &'static str, label: &'static str) -> Self {
        Self {
            option_key,
            label,
            kind: FieldKind::Textarea,
            choices: &[],
            placeholder: None,
            help: None,
            default: None,
            sensitive: false,
        }
    }

    pub const fn placeholder(self, placeholder: &'static str) -> Self {
        Self {
            placeholder: Some(placeholder),
            ..self
        }
    }

    pub const fn help(self, help: &'static str) -> Self {
        Self {
            help: Some(help),
            ..self
        }
    }

    pub const fn default(self, value: &'static str) -> Self {
        Self {
            default: Some(value),
            ..self
        }
    }

    pub const fn sensitive(self) -> Self {
        Self {
            sensitive: true,
            ..self
        }
    }

    /// Whether `value` may be stored under this field.
    ///
    /// Select fields only take one of their enumerated values; free-text
    /// fields take anything, including the empty string.
    pub fn accepts(&self, value: &str) -> bool {
        match self.kind {
            FieldKind::Select => self.choices.iter().any(|c| c.value == value),
            FieldKind::Text | FieldKind::Textarea => true,
        }
    }
}

/// Ordered configuration surface of one provider folder
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProviderSchema {
    pub provider_id: &'static str,
    pub fields: &'static [FieldDescriptor],
    /// Path appended to the site URL to show the inbound webhook endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_path: Option<&'static str>,
    /// Label of the read-only webhook URL row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_label: Option<&'static str>,
}

impl ProviderSchema {
    pub fn field(&self, option_key: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.option_key == option_key)
    }

    pub fn option_keys(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|f| f.option_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: &[Choice] = &[
        Choice {
            value: "live",
            label: "Live Mode",
        },
        Choice {
            value: "test",
            label: "Test Mode",
        },
    ];

    #[test]
    fn select_accepts_only_enumerated_values() {
        let field = FieldDescriptor::select("demo_mode", "Mode", MODES);
        assert!(field.accepts("live"));
        assert!(field.accepts("test"));
        assert!(!field.accepts("LIVE"));
        assert!(!field.accepts(""));
    }

    #[test]
    fn text_accepts_anything() {
        let field = FieldDescriptor::text("demo_key", "Key")
            .placeholder("Enter key")
            .sensitive();
        assert!(field.accepts(""));
        assert!(field.accepts("sk_live_123"));
        assert!(field.sensitive);
        assert_eq!(field.placeholder, Some("Enter key"));
        assert_eq!(field.kind.to_string(), "text");
    }

    #[test]
    fn help_and_default_builders() {
        let field = FieldDescriptor::select("demo_mode", "Mode:", MODES)
            .default("test")
            .help("Switch to live once the account is approved");
        assert_eq!(field.default, Some("test"));
        assert_eq!(field.help, Some("Switch to live once the account is approved"));
        assert!(field.accepts("test"));
    }
}
