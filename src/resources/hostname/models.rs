// Standard library
use std::fmt;

// 3rd party crates
use serde::{Deserialize, Serialize};

// Project imports
use crate::api::Hostname;

/// Desired and tracked state of a `bunnycdn_hostname`.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostnameResourceModel {
    pub pullzone_id: Option<i64>,
    pub id: Option<i64>,
    pub hostname: Option<String>,
    pub enable_ssl: Option<bool>,
    pub force_ssl: Option<bool>,
    pub certificate: Option<String>,
    pub certificate_key: Option<String>,
}

/// Certificate pair kept in private state, since the API never returns it.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredCertificate {
    #[serde(rename = "Certificate")]
    pub certificate: Option<String>,
    #[serde(rename = "CertificateKey")]
    pub certificate_key: Option<String>,
}

impl HostnameResourceModel {
    pub fn ssl_enabled(&self) -> bool {
        self.enable_ssl.unwrap_or(true)
    }

    pub fn to_hostname(&self) -> Hostname {
        Hostname {
            id: self.id.unwrap_or_default(),
            hostname: self.hostname.clone().unwrap_or_default(),
            force_ssl: self.force_ssl.unwrap_or(true),
            has_certificate: false,
            certificate: self.certificate.clone(),
            certificate_key: self.certificate_key.clone(),
        }
    }

    /// Builds tracked state from a remote hostname.
    ///
    /// `enable_ssl` is the value already tracked for this resource; the remote
    /// certificate flag is only used when there is none, as after an import.
    pub fn from_remote(pullzone_id: i64, remote: &Hostname, enable_ssl: Option<bool>) -> Self {
        Self {
            pullzone_id: Some(pullzone_id),
            id: Some(remote.id),
            hostname: Some(remote.hostname.clone()),
            enable_ssl: enable_ssl.or(Some(remote.has_certificate)),
            force_ssl: Some(remote.force_ssl),
            certificate: remote.certificate.clone(),
            certificate_key: remote.certificate_key.clone(),
        }
    }

    pub fn stored_certificate(&self) -> StoredCertificate {
        StoredCertificate {
            certificate: self.certificate.clone(),
            certificate_key: self.certificate_key.clone(),
        }
    }
}

// Certificate material stays out of logs.
impl fmt::Debug for HostnameResourceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostnameResourceModel")
            .field("pullzone_id", &self.pullzone_id)
            .field("id", &self.id)
            .field("hostname", &self.hostname)
            .field("enable_ssl", &self.enable_ssl)
            .field("force_ssl", &self.force_ssl)
            .field("certificate", &self.certificate.as_ref().map(|_| "<sensitive>"))
            .field(
                "certificate_key",
                &self.certificate_key.as_ref().map(|_| "<sensitive>"),
            )
            .finish()
    }
}

impl fmt::Debug for StoredCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredCertificate").finish_non_exhaustive()
    }
}
