// Standard library
use std::collections::BTreeMap;
use std::sync::Arc;

// 3rd party crates
use serde_json::Value;
use tracing::{debug, error, info};

// Project imports
use crate::api::BunnyCdn;
use crate::resources::{
    hostname, pullzone, Attribute, AttributeKind, Diagnostics, HostnameResource, PlanAction,
    PlannedChange, PullzoneResource, ResourceHandler, Schema,
};
use crate::settings::Settings;

// Current module imports
use super::types::{BunnyCdnProvider, ProviderConfig, ProviderSchema, PROVIDER_TYPE_NAME};

fn full_type_name(type_name: &str) -> String {
    format!("{}_{}", PROVIDER_TYPE_NAME, type_name)
}

impl BunnyCdnProvider {
    pub fn new(version: impl Into<String>, settings: Settings) -> Self {
        Self {
            version: version.into(),
            settings,
            resources: None,
        }
    }

    pub fn provider_schema() -> Schema {
        Schema::new("Interact with BunnyCDN").attribute(
            "api_key",
            Attribute::optional(AttributeKind::String)
                .sensitive()
                .description("BunnyCDN API key"),
        )
    }

    /// Schemas of the provider block and of every resource, keyed by full
    /// resource type name.
    pub fn schema(&self) -> ProviderSchema {
        let resource_schemas = [
            (pullzone::TYPE_NAME, pullzone::schema()),
            (hostname::TYPE_NAME, hostname::schema()),
        ]
        .into_iter()
        .map(|(name, schema)| (full_type_name(name), schema))
        .collect();

        ProviderSchema {
            version: self.version.clone(),
            provider: Self::provider_schema(),
            resource_schemas,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.resources.is_some()
    }

    /// Builds the shared API client and the resource registry.
    ///
    /// The provider block's `api_key` wins over the one from settings.
    pub fn configure(&mut self, config: &Value) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        if !config.is_null() {
            diagnostics.append(Self::provider_schema().validate_config(config));
            if diagnostics.has_error() {
                return diagnostics;
            }
        }

        let config: ProviderConfig = if config.is_null() {
            ProviderConfig::default()
        } else {
            match serde_json::from_value(config.clone()) {
                Ok(config) => config,
                Err(e) => {
                    diagnostics.add_error(
                        "Invalid Provider Configuration",
                        format!("Unable to decode provider configuration: {}", e),
                    );
                    return diagnostics;
                }
            }
        };

        let Some(api_key) = config
            .api_key
            .filter(|key| !key.is_empty())
            .or_else(|| self.settings.api.api_key.clone())
        else {
            diagnostics.add_error(
                "Missing API key",
                "The provider cannot create the BunnyCDN API client as there is a missing or empty value for the BunnyCDN API key. Set the api_key value in the provider configuration or the BUNNYCDN_API__API_KEY environment variable.",
            );
            return diagnostics;
        };

        let api = match BunnyCdn::with_base_url(&api_key, &self.settings.api.base_url) {
            Ok(api) => Arc::new(api),
            Err(e) => {
                error!("Unable to create BunnyCDN API client: {}", e);
                diagnostics.add_error(
                    "Unable to Create BunnyCDN API Client",
                    format!("An unexpected error occurred when creating the BunnyCDN API client: {}", e),
                );
                return diagnostics;
            }
        };

        let handlers: [Arc<dyn ResourceHandler>; 2] = [
            Arc::new(PullzoneResource::new(Arc::clone(&api))),
            Arc::new(HostnameResource::new(Arc::clone(&api))),
        ];
        let resources: BTreeMap<String, Arc<dyn ResourceHandler>> = handlers
            .into_iter()
            .map(|handler| (full_type_name(handler.type_name()), handler))
            .collect();

        info!(
            base_url = %self.settings.api.base_url,
            resources = resources.len(),
            "Provider configured"
        );
        self.resources = Some(resources);
        diagnostics
    }

    /// Looks up the handler for a full resource type name.
    pub fn resource(&self, type_name: &str) -> Result<Arc<dyn ResourceHandler>, Diagnostics> {
        let mut diagnostics = Diagnostics::new();

        let Some(resources) = &self.resources else {
            diagnostics.add_error(
                "Provider not configured",
                "The provider must be configured before resources can be managed.",
            );
            return Err(diagnostics);
        };

        match resources.get(type_name) {
            Some(handler) => Ok(Arc::clone(handler)),
            None => {
                debug!(type_name, "Unknown resource type requested");
                diagnostics.add_error(
                    "Unknown resource type",
                    format!("The provider does not manage resources of type {}", type_name),
                );
                Err(diagnostics)
            }
        }
    }

    /// Validates a resource configuration.
    ///
    /// Before configuration only the schema checks run; the resource's own
    /// checks run again ahead of any API call.
    pub fn validate_resource(&self, type_name: &str, config: &Value) -> Diagnostics {
        if let Some(resources) = &self.resources {
            if let Some(handler) = resources.get(type_name) {
                return handler.validate(config);
            }
        }

        match self.resource_schema(type_name) {
            Some(schema) => schema.validate_config(config),
            None => {
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Unknown resource type",
                    format!("The provider does not manage resources of type {}", type_name),
                );
                diagnostics
            }
        }
    }

    /// Classifies the change from `prior` to `config` for one resource.
    pub fn plan_resource(
        &self,
        type_name: &str,
        prior: Option<&Value>,
        config: Option<&Value>,
    ) -> PlannedChange {
        if let Some(handler) = self.resources.as_ref().and_then(|r| r.get(type_name)) {
            return handler.plan(prior, config);
        }

        match self.resource_schema(type_name) {
            Some(schema) => schema.plan(prior, config),
            None => {
                let mut diagnostics = Diagnostics::new();
                diagnostics.add_error(
                    "Unknown resource type",
                    format!("The provider does not manage resources of type {}", type_name),
                );
                PlannedChange {
                    action: PlanAction::NoOp,
                    planned_state: Value::Null,
                    unknown: Vec::new(),
                    diagnostics,
                }
            }
        }
    }

    /// Schema of a resource type, available before configuration.
    pub fn resource_schema(&self, type_name: &str) -> Option<Schema> {
        self.schema().resource_schemas.remove(type_name)
    }
}
