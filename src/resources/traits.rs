// 3rd party crates
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

// Current module imports
use super::schema::Schema;
use super::types::{Diagnostics, PrivateState, ResourceResponse};

/// Core trait that every managed resource kind implements.
///
/// A resource maps the host's desired-state model onto vendor API calls. Each
/// method handles exactly one lifecycle call for one resource instance and
/// reports problems as [`Diagnostics`] rather than returning an error, so a
/// partially successful operation can still hand back the state it reached.
///
/// # Implementation Requirements
///
/// Implementors must provide:
/// - A `State` type mirroring the schema attribute names
/// - The four lifecycle verbs
/// - Local validation that runs before any network call
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct Widget;
///
/// #[async_trait]
/// impl Resource for Widget {
///     type State = WidgetModel;
///
///     fn type_name(&self) -> &'static str {
///         "widget"
///     }
///
///     fn schema(&self) -> Schema {
///         Schema::new("Widget resource")
///             .attribute("name", Attribute::required(AttributeKind::String))
///     }
///
///     async fn create(&self, plan: WidgetModel, _cancel: &CancellationToken)
///         -> ResourceResponse<WidgetModel> {
///         ResourceResponse { state: Some(plan), ..Default::default() }
///     }
///     // read, update and delete follow the same shape
/// }
/// ```
#[async_trait]
pub trait Resource: Send + Sync {
    /// The desired-state model of this resource.
    ///
    /// Field names must match the schema's attribute names. Every field
    /// should be optional so that partially known states (imports, plans with
    /// unknown values) still decode.
    type State: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// The resource type name without the provider prefix, e.g. `pullzone`.
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Validates a desired state before any network call.
    ///
    /// The default accepts everything.
    fn validate(&self, _state: &Self::State, _diagnostics: &mut Diagnostics) {}

    /// Creates the remote object and returns the state to track.
    async fn create(
        &self,
        plan: Self::State,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Self::State>;

    /// Refreshes tracked state from the remote side.
    ///
    /// Returning no state and no error tells the host the object was deleted
    /// out of band and must be dropped.
    async fn read(
        &self,
        state: Self::State,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Self::State>;

    /// Applies an in-place change.
    async fn update(
        &self,
        prior: Self::State,
        plan: Self::State,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Self::State>;

    /// Destroys the remote object. The returned private state is empty.
    async fn delete(
        &self,
        state: Self::State,
        cancel: &CancellationToken,
    ) -> ResourceResponse<Self::State>;

    /// Builds the starting state for an import.
    ///
    /// The default uses the identifier verbatim as the numeric `id`
    /// attribute; the host then runs a read to fill in everything else.
    fn import(&self, id: &str) -> ResourceResponse<Self::State> {
        let mut response = ResourceResponse::default();

        let Ok(id) = id.parse::<i64>() else {
            response.diagnostics.add_error(
                "Unexpected Import Identifier",
                format!("Expected a numeric id, got: {}", id),
            );
            return response;
        };

        match serde_json::from_value(json!({ "id": id })) {
            Ok(state) => response.state = Some(state),
            Err(e) => response.diagnostics.add_error(
                "Import Error",
                format!("Unable to build state from id {}: {}", id, e),
            ),
        }
        response
    }
}
