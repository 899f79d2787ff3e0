// 3rd party crates
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// Project imports
use crate::resources::schema::Schema;
use crate::resources::traits::Resource;
use crate::resources::types::{Diagnostics, PrivateState, ResourceResponse};

// Current module imports
use super::models::{HostnameResourceModel, StoredCertificate};
use super::{schema, HostnameResource, CERTIFICATE_KEY, TYPE_NAME};

impl HostnameResource {
    /// Issues a free certificate, or uploads the configured one and remembers
    /// it in private state. Failures are warnings.
    async fn provision_ssl(
        &self,
        plan: &HostnameResourceModel,
        private: &mut PrivateState,
        diagnostics: &mut Diagnostics,
        cancel: &CancellationToken,
    ) {
        let pullzone_id = plan.pullzone_id.unwrap_or_default();
        let hostname = plan.to_hostname();

        if plan.certificate.is_none() {
            if let Err(e) = self
                .api
                .hostname_load_free_certificate(&hostname, cancel)
                .await
            {
                diagnostics.add_warning(
                    "Client Error",
                    format!("Unable to load free certificate, got error: {}", e),
                );
            }
            return;
        }

        if let Err(e) = self
            .api
            .hostname_add_certificate(pullzone_id, &hostname, cancel)
            .await
        {
            diagnostics.add_warning(
                "Client Error",
                format!("Unable to add certificate, got error: {}", e),
            );
        }

        if let Err(e) = private.set_key(CERTIFICATE_KEY, &plan.stored_certificate()) {
            diagnostics.add_warning(
                "Client Error",
                format!("Failed to encode certificate to json: {}", e),
            );
        }
    }

    async fn apply_force_ssl(
        &self,
        plan: &HostnameResourceModel,
        diagnostics: &mut Diagnostics,
        cancel: &CancellationToken,
    ) {
        let pullzone_id = plan.pullzone_id.unwrap_or_default();

        if let Err(e) = self
            .api
            .hostname_update_force_ssl(pullzone_id, &plan.to_hostname(), cancel)
            .await
        {
            diagnostics.add_warning(
                "Client Error",
                format!("Unable to update force_ssl, got error: {}", e),
            );
        }
    }

    /// Re-reads the hostname after the SSL steps so that server-side values
    /// land in state. Configured certificate material is merged back in.
    async fn refresh(
        &self,
        plan: &HostnameResourceModel,
        diagnostics: &mut Diagnostics,
        cancel: &CancellationToken,
    ) -> Option<HostnameResourceModel> {
        let pullzone_id = plan.pullzone_id.unwrap_or_default();
        let name = plan.hostname.clone().unwrap_or_default();

        let mut remote = match self.api.hostname_get(pullzone_id, &name, cancel).await {
            Ok(remote) => remote,
            Err(e) => {
                diagnostics.add_error(
                    "Client Error",
                    format!("Unable to read hostname, got error: {}", e),
                );
                return None;
            }
        };

        if plan.ssl_enabled() && plan.certificate.is_some() {
            remote.certificate = plan.certificate.clone();
            remote.certificate_key = plan.certificate_key.clone();
        }

        Some(HostnameResourceModel::from_remote(
            pullzone_id,
            &remote,
            plan.enable_ssl,
        ))
    }
}

#[async_trait]
impl Resource for HostnameResource {
    type State = HostnameResourceModel;

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        schema()
    }

    async fn create(
        &self,
        plan: HostnameResourceModel,
        cancel: &CancellationToken,
    ) -> ResourceResponse<HostnameResourceModel> {
        let mut response = ResourceResponse::default();
        let pullzone_id = plan.pullzone_id.unwrap_or_default();

        if let Err(e) = self
            .api
            .hostname_create(pullzone_id, &plan.to_hostname(), cancel)
            .await
        {
            response.diagnostics.add_error(
                "Client Error",
                format!("Unable to create hostname, got error: {}", e),
            );
            return response;
        }

        if plan.ssl_enabled() {
            self.provision_ssl(
                &plan,
                &mut response.private,
                &mut response.diagnostics,
                cancel,
            )
            .await;
            self.apply_force_ssl(&plan, &mut response.diagnostics, cancel)
                .await;
        }

        response.state = self.refresh(&plan, &mut response.diagnostics, cancel).await;
        response
    }

    async fn read(
        &self,
        state: HostnameResourceModel,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<HostnameResourceModel> {
        let mut response = ResourceResponse::with_private(private);
        let pullzone_id = state.pullzone_id.unwrap_or_default();
        let name = state.hostname.clone().unwrap_or_default();

        let mut remote = match self.api.hostname_get(pullzone_id, &name, cancel).await {
            Ok(remote) => remote,
            Err(e) if e.is_not_found() => {
                warn!(pullzone_id, hostname = %name, "Hostname no longer exists, removing it from state");
                return response;
            }
            Err(e) => {
                response.diagnostics.add_error(
                    "Client Error",
                    format!("Unable to read hostname, got error: {}", e),
                );
                return response;
            }
        };

        match response.private.get_key::<StoredCertificate>(CERTIFICATE_KEY) {
            Ok(Some(stored)) => {
                debug!(hostname = %name, "Restoring certificate from private state");
                remote.certificate = stored.certificate;
                remote.certificate_key = stored.certificate_key;
            }
            Ok(None) => {}
            Err(e) => response.diagnostics.add_warning(
                "Client Error",
                format!("Failed to decode certificate from json: {}", e),
            ),
        }

        response.state = Some(HostnameResourceModel::from_remote(
            pullzone_id,
            &remote,
            state.enable_ssl,
        ));
        response
    }

    async fn update(
        &self,
        prior: HostnameResourceModel,
        plan: HostnameResourceModel,
        private: PrivateState,
        cancel: &CancellationToken,
    ) -> ResourceResponse<HostnameResourceModel> {
        let mut response = ResourceResponse::with_private(private);

        // Turning SSL off is not applied remotely; the plan is stored as is.
        if !plan.ssl_enabled() {
            response.state = Some(plan);
            return response;
        }

        if prior.enable_ssl != Some(true) {
            info!(hostname = ?plan.hostname, "SSL enabled, provisioning certificate");
            self.provision_ssl(
                &plan,
                &mut response.private,
                &mut response.diagnostics,
                cancel,
            )
            .await;
        }

        self.apply_force_ssl(&plan, &mut response.diagnostics, cancel)
            .await;

        response.state = self.refresh(&plan, &mut response.diagnostics, cancel).await;
        response
    }

    async fn delete(
        &self,
        state: HostnameResourceModel,
        cancel: &CancellationToken,
    ) -> ResourceResponse<HostnameResourceModel> {
        let mut response = ResourceResponse::default();
        let pullzone_id = state.pullzone_id.unwrap_or_default();

        if let Err(e) = self
            .api
            .hostname_delete(pullzone_id, &state.to_hostname(), cancel)
            .await
        {
            response.diagnostics.add_error(
                "Client Error",
                format!("Unable to delete hostname, got error: {}", e),
            );
        }
        response
    }

    /// Imports from `<pullzone_id>|<hostname>`; a read then fills in the rest.
    fn import(&self, id: &str) -> ResourceResponse<HostnameResourceModel> {
        let mut response = ResourceResponse::default();

        let parsed = id
            .split_once('|')
            .and_then(|(pullzone_id, name)| Some((pullzone_id.parse::<i64>().ok()?, name)))
            .filter(|(_, name)| !name.is_empty());

        match parsed {
            Some((pullzone_id, name)) => {
                response.state = Some(HostnameResourceModel {
                    pullzone_id: Some(pullzone_id),
                    hostname: Some(name.to_string()),
                    ..Default::default()
                });
            }
            None => response.diagnostics.add_error(
                "Unexpected Import Identifier",
                format!(
                    "Expected import identifier with format: pullzone_id|hostname. Got: {}",
                    id
                ),
            ),
        }
        response
    }
}
