pub mod rest_auth_driven_ports;
pub mod rest_todo_driven_ports;

#[cfg(test)]
pub mod test_util;

use crate::app_env::DataServiceConfig;
use crate::domain::session::Session;
use crate::external_connections;
use anyhow::Context;
use derive_more::{Display, Error};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, RequestBuilder};
use reqwest_tracing::TracingMiddleware;
use serde_json::Value;

/// Data structure which owns clients for connecting to external systems.
/// Allows business logic to be agnostic of the external systems it communicates with
/// so driven adapters can easily be swapped out for other implementations
#[derive(Clone)]
pub struct ExternalConnectivity {
    http_client: reqwest_middleware::ClientWithMiddleware,
    data_service: DataServiceConfig,
    session: Option<Session>,
}

impl ExternalConnectivity {
    /// Builds the shared HTTP client used to reach the data service. The result has no
    /// session attached; see [ExternalConnectivity::for_session].
    pub fn new(data_service: DataServiceConfig) -> Result<Self, anyhow::Error> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .context("building the data service HTTP client")?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(ExternalConnectivity {
            http_client,
            data_service,
            session: None,
        })
    }

    /// A copy of this connectivity acting on behalf of whoever owns [session]
    pub fn for_session(&self, session: Option<Session>) -> Self {
        ExternalConnectivity {
            http_client: self.http_client.clone(),
            data_service: self.data_service.clone(),
            session,
        }
    }
}

impl external_connections::ExternalConnectivity for ExternalConnectivity {
    fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.http_client
    }

    fn data_service(&self) -> &DataServiceConfig {
        &self.data_service
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}

/// An error response from the data service. Displays as the explanation the service gave so
/// it can be shown to users unchanged.
#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display("{message}")]
pub struct ServiceRejection {
    pub status: u16,
    pub message: String,
}

/// Attaches the public API key and the requester's bearer token (or the API key itself when
/// nobody is signed in) to a request for the data service
fn authorize(
    request: RequestBuilder,
    ext_cxn: &impl external_connections::ExternalConnectivity,
) -> RequestBuilder {
    let anon_key = &ext_cxn.data_service().anon_key;
    let bearer = ext_cxn
        .session()
        .map(|session| session.access_token.as_str())
        .unwrap_or(anon_key.as_str());

    request.header("apikey", anon_key).bearer_auth(bearer)
}

/// Passes successful responses through and turns everything else into a [ServiceRejection]
async fn reject_unless_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceRejection> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ServiceRejection {
        status: status.as_u16(),
        message: service_error_message(status, &body),
    })
}

/// Pulls the human-readable explanation out of an error body. The table API reports
/// `message`, while the auth API uses `msg`, `error_description`, or `error` depending on
/// the endpoint.
fn service_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        let explanation = ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .filter(|text| !text.trim().is_empty());
        if let Some(text) = explanation {
            return text.to_owned();
        }
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() {
        return trimmed.to_owned();
    }

    status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()))
}
