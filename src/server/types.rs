// 3rd party crates
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Project imports
use crate::provider::ProviderSchema;
use crate::resources::{Diagnostics, PlannedChange, PrivateState};

/// One call from the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "method")]
pub enum HostRequest {
    GetProviderSchema,
    ConfigureProvider {
        #[serde(default)]
        config: Value,
    },
    ValidateResourceConfig {
        type_name: String,
        config: Value,
    },
    PlanResourceChange {
        type_name: String,
        #[serde(default)]
        prior_state: Option<Value>,
        #[serde(default)]
        config: Option<Value>,
    },
    CreateResource {
        type_name: String,
        planned_state: Value,
    },
    ReadResource {
        type_name: String,
        current_state: Value,
        #[serde(default)]
        private: PrivateState,
    },
    UpdateResource {
        type_name: String,
        prior_state: Value,
        planned_state: Value,
        #[serde(default)]
        private: PrivateState,
    },
    DeleteResource {
        type_name: String,
        prior_state: Value,
        #[serde(default)]
        private: PrivateState,
    },
    ImportResourceState {
        type_name: String,
        import_id: String,
    },
    StopProvider,
}

impl HostRequest {
    pub fn method(&self) -> &'static str {
        match self {
            HostRequest::GetProviderSchema => "GetProviderSchema",
            HostRequest::ConfigureProvider { .. } => "ConfigureProvider",
            HostRequest::ValidateResourceConfig { .. } => "ValidateResourceConfig",
            HostRequest::PlanResourceChange { .. } => "PlanResourceChange",
            HostRequest::CreateResource { .. } => "CreateResource",
            HostRequest::ReadResource { .. } => "ReadResource",
            HostRequest::UpdateResource { .. } => "UpdateResource",
            HostRequest::DeleteResource { .. } => "DeleteResource",
            HostRequest::ImportResourceState { .. } => "ImportResourceState",
            HostRequest::StopProvider => "StopProvider",
        }
    }
}

/// A request line: `{"id": n, "method": ..., ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    pub id: Option<u64>,
    #[serde(flatten)]
    pub request: HostRequest,
}

/// A response line. Only the fields relevant to the request are present.
///
/// `new_state` is `null` when the resource is gone (after a delete, or a read
/// that found nothing) and absent for calls that do not produce state.
#[derive(Debug, Default, Serialize)]
pub struct HostResponse {
    pub id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ProviderSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlannedChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_state: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<PrivateState>,
    pub diagnostics: Diagnostics,
}

impl HostResponse {
    pub fn new(id: Option<u64>) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn with_diagnostics(id: Option<u64>, diagnostics: Diagnostics) -> Self {
        Self {
            id,
            diagnostics,
            ..Self::default()
        }
    }
}
