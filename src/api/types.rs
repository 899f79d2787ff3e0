// 3rd party crates
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Represents a client for interacting with the BunnyCDN API.
#[derive(Debug, Clone)]
pub struct BunnyCdn {
    pub client: Client,
    pub base_url: String,
}

/// Where a pull zone fetches its content from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginType {
    /// An arbitrary origin URL.
    Url,
    /// A BunnyCDN storage zone.
    StorageZone,
}

/// A pull zone as the API returns and accepts it.
///
/// Updates replace the whole record, so unset optional fields are sent as
/// `null` to clear them remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pullzone {
    #[serde(rename = "Id", default)]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "OriginType", default)]
    pub origin_type: i64,
    #[serde(rename = "StorageZoneId", default)]
    pub storage_zone_id: Option<i64>,
    #[serde(rename = "OriginUrl", default)]
    pub origin_url: Option<String>,
    #[serde(rename = "OriginHostHeader", default)]
    pub origin_host_header: Option<String>,
    #[serde(rename = "EnableSmartCache", default)]
    pub enable_smart_cache: bool,
    #[serde(rename = "DisableCookies", default)]
    pub disable_cookies: bool,
    #[serde(rename = "ErrorPageEnableCustomCode", default)]
    pub error_page_enable_custom_code: bool,
    #[serde(rename = "ErrorPageCustomCode", default)]
    pub error_page_custom_code: Option<String>,
    /// Read-only on the API side; never sent back.
    #[serde(rename = "Hostnames", default, skip_serializing)]
    pub hostnames: Vec<PullzoneHostname>,
}

/// A hostname entry embedded in a pull zone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullzoneHostname {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "ForceSSL", default)]
    pub force_ssl: bool,
    #[serde(rename = "HasCertificate", default)]
    pub has_certificate: bool,
}

/// A hostname as the resource layer sees it.
///
/// The API has no endpoint for a single hostname; values are built from the
/// parent pull zone's list. Certificate material is write-only on the API and
/// is only ever filled in from local input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hostname {
    pub id: i64,
    pub hostname: String,
    pub force_ssl: bool,
    pub has_certificate: bool,
    pub certificate: Option<String>,
    pub certificate_key: Option<String>,
}

/// Body of `addHostname` and `removeHostname`.
#[derive(Debug, Serialize)]
pub(super) struct HostnameRequest<'a> {
    #[serde(rename = "Hostname")]
    pub hostname: &'a str,
}

/// Body of `setForceSSL`.
#[derive(Debug, Serialize)]
pub(super) struct ForceSslRequest<'a> {
    #[serde(rename = "Hostname")]
    pub hostname: &'a str,
    #[serde(rename = "ForceSSL")]
    pub force_ssl: bool,
}

/// Body of `addCertificate`. Both fields are base64 encoded PEM text.
#[derive(Serialize)]
pub(super) struct AddCertificateRequest<'a> {
    #[serde(rename = "Hostname")]
    pub hostname: &'a str,
    #[serde(rename = "Certificate")]
    pub certificate: String,
    #[serde(rename = "CertificateKey")]
    pub certificate_key: String,
}
