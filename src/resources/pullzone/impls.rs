// 3rd party crates
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

// Project imports
use crate::resources::schema::Schema;
use crate::resources::traits::Resource;
use crate::resources::types::{Diagnostics, PrivateState, ResourceResponse};

// Current module imports
use super::models::PullzoneResourceModel;
use super::{schema, PullzoneResource, TYPE_NAME};

#[async_trait]
impl Resource for PullzoneResource {
    type State = PullzoneResourceModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    fn validate(&self, state: &PullzoneResourceModel, diagnostics: &mut Diagnostics) {
        state.validate(diagnostics);
    }

    async fn create(
        &self,
        plan: PullzoneResourceModel,
        cancel: &CancellationToken,
    ) -> ResourceResponse<PullzoneResourceModel> {
        let mut response = ResourceResponse::default();

        plan.validate(&mut response.diagnostics);
        if response.diagnostics.has_error() {
            return response;
        }

        match self.api.pullzone_create(&plan.to_pullzone(), cancel).await {
            Ok(created) => {
                info!(pullzone_id = created.id, "Created a pull zone");
                response.state = Some(PullzoneResourceModel::from(&created));
            }
            Err(e) => response.diagnostics.add_error(
                "Client Error",
                format!("Unable to create pull zone, got error: {}", e),
            ),
        }
        response
    }

    async fn read(
        &self,
        state: PullzoneResourceModel,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<PullzoneResourceModel> {
        let mut response = ResourceResponse::with_private(private);
        let id = state.id.unwrap_or_default();

        match self.api.pullzone_get(id, cancel).await {
            Ok(remote) => response.state = Some(PullzoneResourceModel::from(&remote)),
            Err(e) if e.is_not_found() => {
                warn!(pullzone_id = id, "Pull zone no longer exists, removing it from state");
            }
            Err(e) => response.diagnostics.add_error(
                "Client Error",
                format!("Unable to read pull zone, got error: {}", e),
            ),
        }
        response
    }

    async fn update(
        &self,
        prior: PullzoneResourceModel,
        mut plan: PullzoneResourceModel,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<PullzoneResourceModel> {
        let mut response = ResourceResponse::with_private(private);

        plan.validate(&mut response.diagnostics);
        if response.diagnostics.has_error() {
            return response;
        }

        if plan.id.is_none() {
            plan.id = prior.id;
        }

        match self.api.pullzone_update(&plan.to_pullzone(), cancel).await {
            Ok(updated) => response.state = Some(PullzoneResourceModel::from(&updated)),
            Err(e) => response.diagnostics.add_error(
                "Client Error",
                format!("Unable to update pull zone, got error: {}", e),
            ),
        }
        response
    }

    async fn delete(
        &self,
        state: PullzoneResourceModel,
        cancel: &CancellationToken,
    ) -> ResourceResponse<PullzoneResourceModel> {
        let mut response = ResourceResponse::default();

        if let Err(e) = self.api.pullzone_delete(&state.to_pullzone(), cancel).await {
            response.diagnostics.add_error(
                "Client Error",
                format!("Unable to delete pull zone, got error: {}", e),
            );
        }
        response
    }
}
