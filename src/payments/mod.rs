//! Payment gateway configuration surface

pub mod registry;
pub mod types;

pub use registry::{fields_for, is_known, schema_for, RegistryError, PROVIDER_SCHEMAS};
pub use types::{Choice, FieldDescriptor, FieldKind, ProviderSchema};
