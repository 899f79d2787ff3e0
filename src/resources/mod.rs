pub mod hostname;
pub mod pullzone;
pub mod schema;
pub mod traits;
pub mod types;

// 3rd party crates
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use hostname::HostnameResource;
pub use pullzone::PullzoneResource;
pub use schema::{Attribute, AttributeKind, PlanAction, PlannedChange, Schema};
pub use traits::Resource;
pub use types::{Diagnostic, Diagnostics, PrivateState, ResourceResponse, Severity};

/// Object-safe view of a [`Resource`] working on raw JSON states.
///
/// The provider keeps resources of different kinds in one registry through
/// this trait. Every [`Resource`] gets it through the blanket implementation
/// below, which decodes incoming states into the resource's model and encodes
/// the results back.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    fn validate(&self, config: &Value) -> Diagnostics;

    fn plan(&self, prior: Option<&Value>, config: Option<&Value>) -> PlannedChange {
        self.schema().plan(prior, config)
    }

    async fn create(&self, planned: Value, cancel: &CancellationToken) -> ResourceResponse<Value>;

    async fn read(
        &self,
        current: Value,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Value>;

    async fn update(
        &self,
        prior: Value,
        planned: Value,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Value>;

    async fn delete(&self, prior: Value, cancel: &CancellationToken) -> ResourceResponse<Value>;

    fn import(&self, id: &str) -> ResourceResponse<Value>;
}

fn decode<S: DeserializeOwned>(value: Value, what: &str, diagnostics: &mut Diagnostics) -> Option<S> {
    match serde_json::from_value(value) {
        Ok(state) => Some(state),
        Err(e) => {
            diagnostics.add_error(
                "Invalid State",
                format!("Unable to decode {}: {}", what, e),
            );
            None
        }
    }
}

fn encode<S: Serialize>(response: ResourceResponse<S>) -> ResourceResponse<Value> {
    let mut diagnostics = Diagnostics::new();
    let state = response.state.and_then(|state| match serde_json::to_value(state) {
        Ok(value) => Some(value),
        Err(e) => {
            diagnostics.add_error("Invalid State", format!("Unable to encode state: {}", e));
            None
        }
    });

    let mut encoded = ResourceResponse {
        state,
        private: response.private,
        diagnostics: response.diagnostics,
    };
    encoded.diagnostics.append(diagnostics);
    encoded
}

/// Response for a call whose input state could not be decoded.
fn rejected(diagnostics: Diagnostics, private: PrivateState) -> ResourceResponse<Value> {
    ResourceResponse {
        state: None,
        private,
        diagnostics,
    }
}

#[async_trait]
impl<R: Resource> ResourceHandler for R {
    fn type_name(&self) -> &'static str {
        Resource::type_name(self)
    }

    fn schema(&self) -> Schema {
        Resource::schema(self)
    }

    fn validate(&self, config: &Value) -> Diagnostics {
        let mut diagnostics = Resource::schema(self).validate_config(config);
        if diagnostics.has_error() {
            return diagnostics;
        }

        if let Some(state) = decode::<R::State>(config.clone(), "configuration", &mut diagnostics) {
            Resource::validate(self, &state, &mut diagnostics);
        }
        diagnostics
    }

    async fn create(&self, planned: Value, cancel: &CancellationToken) -> ResourceResponse<Value> {
        debug!(resource = Resource::type_name(self), "Create");
        let mut diagnostics = Diagnostics::new();
        match decode::<R::State>(planned, "planned state", &mut diagnostics) {
            Some(plan) => encode(Resource::create(self, plan, cancel).await),
            None => rejected(diagnostics, PrivateState::new()),
        }
    }

    async fn read(
        &self,
        current: Value,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Value> {
        debug!(resource = Resource::type_name(self), "Read");
        let mut diagnostics = Diagnostics::new();
        match decode::<R::State>(current, "current state", &mut diagnostics) {
            Some(state) => encode(Resource::read(self, state, private, cancel).await),
            None => rejected(diagnostics, private),
        }
    }

    async fn update(
        &self,
        prior: Value,
        planned: Value,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Value> {
        debug!(resource = Resource::type_name(self), "Update");
        let mut diagnostics = Diagnostics::new();
        let prior = decode::<R::State>(prior, "prior state", &mut diagnostics);
        let plan = decode::<R::State>(planned, "planned state", &mut diagnostics);
        match (prior, plan) {
            (Some(prior), Some(plan)) => {
                encode(Resource::update(self, prior, plan, private, cancel).await)
            }
            _ => rejected(diagnostics, private),
        }
    }

    async fn delete(&self, prior: Value, cancel: &CancellationToken) -> ResourceResponse<Value> {
        debug!(resource = Resource::type_name(self), "Delete");
        let mut diagnostics = Diagnostics::new();
        match decode::<R::State>(prior, "prior state", &mut diagnostics) {
            Some(state) => encode(Resource::delete(self, state, cancel).await),
            None => rejected(diagnostics, PrivateState::new()),
        }
    }

    fn import(&self, id: &str) -> ResourceResponse<Value> {
        encode(Resource::import(self, id))
    }
}
