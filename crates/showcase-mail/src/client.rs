// EmailJS HTTP client
//
// Wraps `reqwest::Client` with the EmailJS send endpoint. The service and
// template identifiers plus the account's public key travel in the JSON
// body; EmailJS has no auth header for this route.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;

/// Public EmailJS API host.
pub const DEFAULT_ENDPOINT: &str = "https://api.emailjs.com";

const SEND_PATH: &str = "api/v1.0/email/send";

/// Account identifiers for a single EmailJS template.
#[derive(Debug)]
pub struct EmailJsCredentials {
    pub service_id: String,
    pub template_id: String,
    /// The account "public key" (sent as `user_id`).
    pub public_key: SecretString,
    /// Optional private access token, required when the account enforces
    /// server-side sending.
    pub access_token: Option<SecretString>,
}

/// Variables substituted into the EmailJS template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub subject: String,
    pub message: String,
    pub company: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
    #[serde(rename = "accessToken", skip_serializing_if = "Option::is_none")]
    access_token: Option<&'a str>,
}

/// Raw HTTP client for the EmailJS REST API.
pub struct EmailJsClient {
    http: reqwest::Client,
    endpoint: Url,
    credentials: EmailJsCredentials,
}

impl EmailJsClient {
    /// Create a client with its own `reqwest::Client` and request timeout.
    pub fn new(
        endpoint: Url,
        credentials: EmailJsCredentials,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("showcase/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(http, endpoint, credentials))
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, endpoint: Url, credentials: EmailJsCredentials) -> Self {
        Self {
            http,
            endpoint,
            credentials,
        }
    }

    /// The configured API host.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Full URL of the send route: `{endpoint}/api/v1.0/email/send`.
    pub fn send_url(&self) -> Result<Url, Error> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{SEND_PATH}"))?)
    }

    /// Deliver one message through the configured template.
    ///
    /// Any 2xx answer counts as delivered; the body is ignored.
    pub async fn send(&self, params: &TemplateParams) -> Result<(), Error> {
        let url = self.send_url()?;
        let body = SendRequest {
            service_id: &self.credentials.service_id,
            template_id: &self.credentials.template_id,
            user_id: self.credentials.public_key.expose_secret(),
            template_params: params,
            access_token: self
                .credentials
                .access_token
                .as_ref()
                .map(ExposeSecret::expose_secret),
        };

        debug!(%url, template = %self.credentials.template_id, "POST email");

        let resp = self.http.post(url).json(&body).send().await?;
        let status = resp.status();

        if status.is_success() {
            debug!(status = status.as_u16(), "email accepted");
            return Ok(());
        }

        let text = resp.text().await.unwrap_or_default();
        let message = if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        } else {
            text.chars().take(200).collect()
        };
        warn!(status = status.as_u16(), %message, "email rejected");
        Err(Error::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
