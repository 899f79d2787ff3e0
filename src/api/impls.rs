// 3rd party crates
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

// Current module imports
use super::constants::{ACCESS_KEY_HEADER, BUNNYCDN_API_BASE};
use super::errors::BunnyCdnError;
use super::types::{BunnyCdn, Hostname, OriginType, PullzoneHostname};

impl BunnyCdn {
    /// Creates a client against the public API.
    pub fn new(api_key: &str) -> Result<Self, BunnyCdnError> {
        Self::with_base_url(api_key, BUNNYCDN_API_BASE)
    }

    /// Creates a client against `base_url`, which must not end with a slash.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, BunnyCdnError> {
        if api_key.trim().is_empty() {
            error!("API key is not set");
            return Err(BunnyCdnError::InvalidApiKey);
        }

        let mut headers: HeaderMap = HeaderMap::new();

        // Mark security-sensitive headers with `set_sensitive`.
        let mut access_key: HeaderValue = HeaderValue::from_str(api_key).map_err(|e| {
            error!("Invalid API key format: {}", e);
            BunnyCdnError::InvalidHeaderValue(e)
        })?;
        access_key.set_sensitive(true);
        headers.insert(ACCESS_KEY_HEADER, access_key);

        let client: Client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| {
                error!("Failed to build HTTP client: {}", e);
                BunnyCdnError::HttpClientBuild(e)
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request unless `cancel` fires first.
    pub(super) async fn send(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
        operation: &'static str,
    ) -> Result<Response, BunnyCdnError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(operation, "Request cancelled");
                Err(BunnyCdnError::Cancelled(operation))
            }
            response = request.send() => {
                let response = response?;
                debug!(operation, status = %response.status(), "Received response");
                Ok(response)
            }
        }
    }

    /// Reads the whole response body unless `cancel` fires first.
    pub(super) async fn read_text(
        response: Response,
        cancel: &CancellationToken,
        operation: &'static str,
    ) -> Result<String, BunnyCdnError> {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(operation, "Body read cancelled");
                Err(BunnyCdnError::Cancelled(operation))
            }
            text = response.text() => Ok(text?),
        }
    }

    /// Reads the body of a successful response as JSON.
    pub(super) async fn decode<T: DeserializeOwned>(
        response: Response,
        cancel: &CancellationToken,
        operation: &'static str,
    ) -> Result<T, BunnyCdnError> {
        let text: String = Self::read_text(response, cancel, operation).await?;
        serde_json::from_str(&text).map_err(|source| {
            error!(operation, "Failed to parse response: {} - Raw: {}", source, text);
            BunnyCdnError::Decode { operation, source }
        })
    }
}

impl TryFrom<i64> for OriginType {
    type Error = i64;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OriginType::Url),
            2 => Ok(OriginType::StorageZone),
            other => Err(other),
        }
    }
}

impl From<OriginType> for i64 {
    fn from(value: OriginType) -> Self {
        match value {
            OriginType::Url => 0,
            OriginType::StorageZone => 2,
        }
    }
}

impl From<&PullzoneHostname> for Hostname {
    fn from(entry: &PullzoneHostname) -> Self {
        Self {
            id: entry.id,
            hostname: entry.value.clone(),
            force_ssl: entry.force_ssl,
            has_certificate: entry.has_certificate,
            certificate: None,
            certificate_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_api_key_is_rejected() {
        assert!(matches!(
            BunnyCdn::new("  "),
            Err(BunnyCdnError::InvalidApiKey)
        ));
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let api = BunnyCdn::with_base_url("key", "http://127.0.0.1:8080/").unwrap();
        assert_eq!(api.url("/pullzone/1"), "http://127.0.0.1:8080/pullzone/1");
    }

    #[test]
    fn origin_type_accepts_only_known_codes() {
        assert_eq!(OriginType::try_from(0), Ok(OriginType::Url));
        assert_eq!(OriginType::try_from(2), Ok(OriginType::StorageZone));
        assert_eq!(OriginType::try_from(1), Err(1));
        assert_eq!(i64::from(OriginType::StorageZone), 2);
    }
}
