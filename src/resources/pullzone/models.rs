// 3rd party crates
use serde::{Deserialize, Serialize};

// Project imports
use crate::api::{OriginType, Pullzone, PullzoneHostname};
use crate::resources::types::Diagnostics;

/// Desired and tracked state of a `bunnycdn_pullzone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullzoneResourceModel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub origin_type: Option<i64>,
    pub storage_zone_id: Option<i64>,
    pub origin_url: Option<String>,
    pub origin_host_header: Option<String>,
    pub enable_smart_cache: Option<bool>,
    pub disable_cookie: Option<bool>,
    pub error_page_enable_custom_code: Option<bool>,
    pub error_page_custom_code: Option<String>,
    pub hostnames: Option<Vec<PullzoneHostnameModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullzoneHostnameModel {
    pub id: i64,
    pub value: String,
    pub force_ssl: bool,
    pub has_certificate: bool,
}

impl PullzoneResourceModel {
    /// Checks the origin settings before anything is sent to the API.
    pub fn validate(&self, diagnostics: &mut Diagnostics) {
        match OriginType::try_from(self.origin_type.unwrap_or_default()) {
            Err(_) => {
                diagnostics.add_error("Validation Error", "origin_type is not implemented");
            }
            Ok(OriginType::Url) if self.origin_url.is_none() => {
                diagnostics.add_error(
                    "Validation Error",
                    "when origin_type = 0 origin_url must not be null",
                );
            }
            Ok(OriginType::StorageZone) if self.storage_zone_id.is_none() => {
                diagnostics.add_error(
                    "Validation Error",
                    "when origin_type = 2 storage_zone_id must not be null",
                );
            }
            Ok(_) => {}
        }
    }

    /// Builds the API record, filling unset flags with the schema defaults.
    pub fn to_pullzone(&self) -> Pullzone {
        Pullzone {
            id: self.id.unwrap_or_default(),
            name: self.name.clone().unwrap_or_default(),
            origin_type: self.origin_type.unwrap_or_default(),
            storage_zone_id: self.storage_zone_id,
            origin_url: self.origin_url.clone(),
            origin_host_header: self.origin_host_header.clone(),
            enable_smart_cache: self.enable_smart_cache.unwrap_or(true),
            disable_cookies: self.disable_cookie.unwrap_or(false),
            error_page_enable_custom_code: self.error_page_enable_custom_code.unwrap_or(false),
            error_page_custom_code: self.error_page_custom_code.clone(),
            hostnames: self
                .hostnames
                .iter()
                .flatten()
                .map(PullzoneHostname::from)
                .collect(),
        }
    }
}

impl From<&Pullzone> for PullzoneResourceModel {
    fn from(record: &Pullzone) -> Self {
        Self {
            id: Some(record.id),
            name: Some(record.name.clone()),
            origin_type: Some(record.origin_type),
            storage_zone_id: record.storage_zone_id,
            origin_url: record.origin_url.clone(),
            origin_host_header: record.origin_host_header.clone(),
            enable_smart_cache: Some(record.enable_smart_cache),
            disable_cookie: Some(record.disable_cookies),
            error_page_enable_custom_code: Some(record.error_page_enable_custom_code),
            error_page_custom_code: record.error_page_custom_code.clone(),
            hostnames: Some(
                record
                    .hostnames
                    .iter()
                    .map(PullzoneHostnameModel::from)
                    .collect(),
            ),
        }
    }
}

impl From<&PullzoneHostname> for PullzoneHostnameModel {
    fn from(entry: &PullzoneHostname) -> Self {
        Self {
            id: entry.id,
            value: entry.value.clone(),
            force_ssl: entry.force_ssl,
            has_certificate: entry.has_certificate,
        }
    }
}

impl From<&PullzoneHostnameModel> for PullzoneHostname {
    fn from(entry: &PullzoneHostnameModel) -> Self {
        Self {
            id: entry.id,
            value: entry.value.clone(),
            force_ssl: entry.force_ssl,
            has_certificate: entry.has_certificate,
        }
    }
}
