// Standard library
use std::collections::BTreeMap;
use std::sync::Arc;

// 3rd party crates
use serde::{Deserialize, Serialize};

// Project imports
use crate::resources::{ResourceHandler, Schema};
use crate::settings::Settings;

/// Prefix of every resource type name, e.g. `bunnycdn_pullzone`.
pub const PROVIDER_TYPE_NAME: &str = "bunnycdn";

/// The provider block as written by the user.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderSchema {
    pub version: String,
    pub provider: Schema,
    pub resource_schemas: BTreeMap<String, Schema>,
}

pub struct BunnyCdnProvider {
    pub version: String,
    pub settings: Settings,
    pub(super) resources: Option<BTreeMap<String, Arc<dyn ResourceHandler>>>,
}
