// 3rd party crates
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

// Current module imports
use super::errors::{BunnyCdnError, StatusError};
use super::types::{BunnyCdn, Pullzone};

impl BunnyCdn {
    /// Fetches a pull zone by id.
    pub async fn pullzone_get(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> Result<Pullzone, BunnyCdnError> {
        debug!(pullzone_id = id, "Fetching pull zone");

        let request = self.client.get(self.url(&format!("/pullzone/{}", id)));
        let response = self.send(request, cancel, "pullzone_get").await?;

        match response.status() {
            StatusCode::OK => Self::decode(response, cancel, "pullzone_get").await,
            status => Err(StatusError::pullzone(status, id).into()),
        }
    }

    /// Creates a pull zone and returns the record the API stored.
    pub async fn pullzone_create(
        &self,
        record: &Pullzone,
        cancel: &CancellationToken,
    ) -> Result<Pullzone, BunnyCdnError> {
        info!(name = %record.name, "Creating pull zone");

        let request = self.client.post(self.url("/pullzone")).json(record);
        let response = self.send(request, cancel, "pullzone_create").await?;

        match response.status() {
            StatusCode::CREATED => {
                let created: Pullzone = Self::decode(response, cancel, "pullzone_create").await?;
                info!(pullzone_id = created.id, "Created pull zone");
                Ok(created)
            }
            status => Err(StatusError::pullzone(status, record.id).into()),
        }
    }

    /// Replaces the settings of an existing pull zone.
    pub async fn pullzone_update(
        &self,
        record: &Pullzone,
        cancel: &CancellationToken,
    ) -> Result<Pullzone, BunnyCdnError> {
        info!(pullzone_id = record.id, "Updating pull zone");

        let request = self
            .client
            .post(self.url(&format!("/pullzone/{}", record.id)))
            .json(record);
        let response = self.send(request, cancel, "pullzone_update").await?;

        match response.status() {
            StatusCode::OK => Self::decode(response, cancel, "pullzone_update").await,
            status => Err(StatusError::pullzone(status, record.id).into()),
        }
    }

    pub async fn pullzone_delete(
        &self,
        record: &Pullzone,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        info!(pullzone_id = record.id, "Deleting pull zone");

        let request = self
            .client
            .delete(self.url(&format!("/pullzone/{}", record.id)));
        let response = self.send(request, cancel, "pullzone_delete").await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(StatusError::pullzone(status, record.id).into()),
        }
    }
}
