//! Provider root: the `bunnycdn` provider block and its resource registry.

pub mod impls;
pub mod types;

pub use types::{BunnyCdnProvider, ProviderConfig, ProviderSchema, PROVIDER_TYPE_NAME};
