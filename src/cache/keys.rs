//! Type-safe cache key builders

use std::fmt;

pub const VERSION: &str = "v1";

pub mod option {
    use super::*;

    pub const NAMESPACE: &str = "option";

    /// Cached value of one row of the options table
    #[derive(Debug, Clone)]
    pub struct OptionKey {
        pub name: String,
    }

    impl OptionKey {
        pub fn new(name: impl Into<String>) -> Self {
            Self { name: name.into() }
        }
    }

    impl fmt::Display for OptionKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}:{}:{}", VERSION, NAMESPACE, self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::option::OptionKey;

    #[test]
    fn option_key_format() {
        assert_eq!(
            OptionKey::new("stripe_secret_key").to_string(),
            "v1:option:stripe_secret_key"
        );
        // option names are case sensitive
        assert_eq!(
            OptionKey::new("PAYTM_ENVIRONMENT").to_string(),
            "v1:option:PAYTM_ENVIRONMENT"
        );
    }
}
