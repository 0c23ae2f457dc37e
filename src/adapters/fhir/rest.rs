//! FHIR REST implementation of [`UpsertClient`]
//!
//! Records are written with `PUT [base]/[type]/[id]`, which a FHIR server
//! treats as update-or-create at a client-chosen id.

use super::client::UpsertClient;
use crate::config::{AuthType, FhirConfig};
use crate::domain::{ClinicalRecord, FhirError, LoaderError, ResourceType, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Media type of FHIR JSON resources
pub const FHIR_JSON: &str = "application/fhir+json";

/// HTTP client for a FHIR R4 server
///
/// Built once per run and reused for every request.
///
/// # Example
///
/// ```no_run
/// use labload::adapters::fhir::FhirRestClient;
/// use labload::config::FhirConfig;
///
/// # async fn example() -> labload::domain::Result<()> {
/// let client = FhirRestClient::new(&FhirConfig::default())?;
/// client.check_connection().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FhirRestClient {
    base_url: Url,
    client: Client,
    authorization: Option<String>,
    log_requests: bool,
}

impl FhirRestClient {
    /// Creates a client from the `[fhir]` configuration section
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &FhirConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            LoaderError::Configuration(format!("Invalid FHIR base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(LoaderError::Configuration(format!(
                "FHIR base URL '{}' cannot be used as a base",
                config.base_url
            )));
        }

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification is disabled for the FHIR server");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            LoaderError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url,
            client,
            authorization: auth_header_value(config),
            log_requests: config.log_requests,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of a resource: `{base}/{type}/{id}`
    pub fn resource_url(&self, resource_type: ResourceType, id: &str) -> Result<Url> {
        self.endpoint(&[resource_type.as_str(), id])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                LoaderError::Configuration(format!(
                    "FHIR base URL '{}' cannot be used as a base",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetches the server's CapabilityStatement from `GET [base]/metadata`
    ///
    /// Returns the `fhirVersion` the server reports, if any.
    ///
    /// # Errors
    ///
    /// Returns a FHIR error if the server cannot be reached or answers with a
    /// non-success status.
    pub async fn check_connection(&self) -> Result<Option<String>> {
        let url = self.endpoint(&["metadata"])?;

        let response = self
            .request(Method::GET, url.clone())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        self.log_exchange(&Method::GET, &url, status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FhirError::from_status(status.as_u16(), body).into());
        }

        let statement: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FhirError::InvalidResponse(e.to_string()))?;

        Ok(statement
            .get("fhirVersion")
            .and_then(|v| v.as_str())
            .map(str::to_string))
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, FHIR_JSON);

        if let Some(auth) = &self.authorization {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }

        request
    }

    fn log_exchange(&self, method: &Method, url: &Url, status: StatusCode) {
        if self.log_requests {
            tracing::info!(method = %method, url = %url, status = status.as_u16(), "FHIR request");
        } else {
            tracing::debug!(method = %method, url = %url, status = status.as_u16(), "FHIR request");
        }
    }
}

#[async_trait]
impl UpsertClient for FhirRestClient {
    async fn upsert(
        &self,
        resource_type: ResourceType,
        identity: &str,
        record: &ClinicalRecord,
    ) -> Result<()> {
        let id = resource_type.logical_id(identity);
        let url = self.resource_url(resource_type, id)?;
        let body = serde_json::to_vec(record)?;

        let response = self
            .request(Method::PUT, url.clone())
            .header(reqwest::header::CONTENT_TYPE, FHIR_JSON)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        self.log_exchange(&Method::PUT, &url, status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                resource_type = %resource_type,
                id = %id,
                status = status.as_u16(),
                "FHIR server rejected upsert"
            );
            return Err(FhirError::from_status(status.as_u16(), body).into());
        }

        Ok(())
    }
}

/// Build authorization header value
fn auth_header_value(config: &FhirConfig) -> Option<String> {
    match config.auth_type {
        AuthType::None => None,
        AuthType::Basic => {
            let username = config.username.as_deref()?;
            let password: &str = config.password.as_ref()?.expose_secret().as_ref();
            let credentials = format!("{username}:{password}");
            let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
            Some(format!("Basic {encoded}"))
        }
        AuthType::Bearer => {
            let token: &str = config.token.as_ref()?.expose_secret().as_ref();
            Some(format!("Bearer {token}"))
        }
    }
}

fn transport_error(err: reqwest::Error) -> LoaderError {
    if err.is_timeout() {
        FhirError::Timeout(err.to_string()).into()
    } else {
        FhirError::ConnectionFailed(err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    #[test]
    fn test_resource_url() {
        let config = FhirConfig {
            base_url: "http://localhost:8080/fhir/".to_string(),
            ..Default::default()
        };
        let client = FhirRestClient::new(&config).unwrap();

        let url = client
            .resource_url(ResourceType::Patient, "p1")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/fhir/Patient/p1");

        let url = client
            .resource_url(ResourceType::Observation, "rbc-1")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/fhir/Observation/rbc-1");
    }

    #[test]
    fn test_resource_url_escapes_id() {
        let client = FhirRestClient::new(&FhirConfig::default()).unwrap();
        let url = client
            .resource_url(ResourceType::Patient, "a b/c")
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/fhir/Patient/a%20b%2Fc");
    }

    #[test]
    fn test_auth_header_basic() {
        let config = FhirConfig {
            auth_type: AuthType::Basic,
            username: Some("user".to_string()),
            password: Some(secret_string("pass".to_string())),
            ..Default::default()
        };
        assert_eq!(
            auth_header_value(&config).as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[test]
    fn test_auth_header_bearer_and_none() {
        let config = FhirConfig {
            auth_type: AuthType::Bearer,
            token: Some(secret_string("abc".to_string())),
            ..Default::default()
        };
        assert_eq!(auth_header_value(&config).as_deref(), Some("Bearer abc"));

        assert!(auth_header_value(&FhirConfig::default()).is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let config = FhirConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            FhirRestClient::new(&config),
            Err(LoaderError::Configuration(_))
        ));
    }
}
