// 3rd party crates
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// Current module imports
use super::errors::{BunnyCdnError, StatusError};
use super::types::{AddCertificateRequest, BunnyCdn, ForceSslRequest, Hostname, HostnameRequest};

impl BunnyCdn {
    /// Looks a hostname up in its pull zone's hostname list.
    ///
    /// The match on the hostname value is exact and case-sensitive. Errors
    /// from fetching the pull zone are returned unchanged; a missing entry is
    /// reported as a 404 naming the hostname.
    pub async fn hostname_get(
        &self,
        pullzone_id: i64,
        hostname: &str,
        cancel: &CancellationToken,
    ) -> Result<Hostname, BunnyCdnError> {
        debug!(pullzone_id, hostname = %hostname, "Fetching hostname");

        let pullzone = self.pullzone_get(pullzone_id, cancel).await?;

        pullzone
            .hostnames
            .iter()
            .find(|entry| entry.value == hostname)
            .map(Hostname::from)
            .ok_or_else(|| StatusError::hostname(StatusCode::NOT_FOUND, hostname).into())
    }

    /// Registers a hostname under a pull zone.
    pub async fn hostname_create(
        &self,
        pullzone_id: i64,
        resource: &Hostname,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        info!(pullzone_id, hostname = %resource.hostname, "Adding hostname");

        let request = self
            .client
            .post(self.url(&format!("/pullzone/{}/addHostname", pullzone_id)))
            .json(&HostnameRequest {
                hostname: &resource.hostname,
            });
        let response = self.send(request, cancel, "hostname_create").await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(StatusError::hostname(status, &resource.hostname).into()),
        }
    }

    pub async fn hostname_delete(
        &self,
        pullzone_id: i64,
        resource: &Hostname,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        info!(pullzone_id, hostname = %resource.hostname, "Removing hostname");

        let request = self
            .client
            .delete(self.url(&format!("/pullzone/{}/removeHostname", pullzone_id)))
            .json(&HostnameRequest {
                hostname: &resource.hostname,
            });
        let response = self.send(request, cancel, "hostname_delete").await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(StatusError::hostname(status, &resource.hostname).into()),
        }
    }

    /// Asks the vendor to issue a free certificate for the hostname.
    ///
    /// On failure the response body is kept in the error, since the vendor
    /// explains there why issuance was refused (usually DNS not pointing at
    /// the CDN yet).
    pub async fn hostname_load_free_certificate(
        &self,
        resource: &Hostname,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        info!(hostname = %resource.hostname, "Loading free certificate");

        let request = self
            .client
            .get(self.url("/pullzone/loadFreeCertificate"))
            .query(&[("hostname", resource.hostname.as_str())]);
        let response = self
            .send(request, cancel, "hostname_load_free_certificate")
            .await?;

        let status = response.status();
        if status == StatusCode::OK {
            return Ok(());
        }

        let body = Self::read_text(response, cancel, "hostname_load_free_certificate").await;
        let body: String = match body {
            Ok(body) => body,
            Err(e @ BunnyCdnError::Cancelled(_)) => return Err(e),
            Err(_) => "Unknown error".to_string(),
        };
        warn!(hostname = %resource.hostname, status = %status, "Free certificate was refused");
        Err(StatusError::hostname(status, &resource.hostname)
            .with_body(body)
            .into())
    }

    /// Enables SSL on a hostname through vendor-managed certificate issuance.
    pub async fn hostname_enable_ssl(
        &self,
        resource: &Hostname,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        self.hostname_load_free_certificate(resource, cancel).await
    }

    pub async fn hostname_update_force_ssl(
        &self,
        pullzone_id: i64,
        resource: &Hostname,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        info!(
            pullzone_id,
            hostname = %resource.hostname,
            force_ssl = resource.force_ssl,
            "Setting force SSL"
        );

        let request = self
            .client
            .post(self.url(&format!("/pullzone/{}/setForceSSL", pullzone_id)))
            .json(&ForceSslRequest {
                hostname: &resource.hostname,
                force_ssl: resource.force_ssl,
            });
        let response = self
            .send(request, cancel, "hostname_update_force_ssl")
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT => Ok(()),
            status => Err(StatusError::hostname(status, &resource.hostname).into()),
        }
    }

    /// Uploads a custom certificate and key for the hostname.
    ///
    /// Missing certificate or key text is sent as an empty string and left to
    /// the API to reject.
    pub async fn hostname_add_certificate(
        &self,
        pullzone_id: i64,
        resource: &Hostname,
        cancel: &CancellationToken,
    ) -> Result<(), BunnyCdnError> {
        info!(pullzone_id, hostname = %resource.hostname, "Adding custom certificate");

        let encode = |pem: &Option<String>| STANDARD.encode(pem.as_deref().unwrap_or_default());
        let request = self
            .client
            .post(self.url(&format!("/pullzone/{}/addCertificate", pullzone_id)))
            .json(&AddCertificateRequest {
                hostname: &resource.hostname,
                certificate: encode(&resource.certificate),
                certificate_key: encode(&resource.certificate_key),
            });
        let response = self
            .send(request, cancel, "hostname_add_certificate")
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => Err(StatusError::hostname(status, &resource.hostname).into()),
        }
    }
}
