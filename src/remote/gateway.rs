//! HTTP gateway to the inventory API
//!
//! The gateway is deliberately dumb: it attaches the credential it is handed
//! (never a process-global default), unwraps envelopes, and maps 401 to a
//! typed error. It knows nothing about sessions or navigation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;

use crate::remote::envelope::unwrap_envelope;
use crate::remote::error::ApiError;

/// A bearer credential, threaded explicitly into every call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(pub String);

impl Credential {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Verb-level access to the remote API. Object-safe so the store can run
/// against an in-memory fake in tests.
pub trait Gateway {
    fn get(&self, path: &str, cred: Option<&Credential>) -> Result<Value, ApiError>;
    fn post(&self, path: &str, body: &Value, cred: Option<&Credential>)
        -> Result<Value, ApiError>;
    fn put(&self, path: &str, body: &Value, cred: Option<&Credential>) -> Result<Value, ApiError>;
    fn delete(&self, path: &str, cred: Option<&Credential>) -> Result<Value, ApiError>;
}

/// Blocking HTTP implementation
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn dispatch(
        &self,
        builder: reqwest::blocking::RequestBuilder,
        cred: Option<&Credential>,
    ) -> Result<Value, ApiError> {
        let builder = match cred {
            Some(c) => builder.bearer_auth(c.as_str()),
            None => builder,
        };

        let response = builder.send()?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| ApiError::Decode(format!("response was not JSON: {}", e)))?;

        // Non-2xx responses still carry the envelope; let its message through
        // in preference to a bare status code.
        match unwrap_envelope(body) {
            Ok(payload) if status.is_success() => Ok(payload),
            Ok(_) => Err(ApiError::Rejected(format!(
                "remote returned HTTP {}",
                status.as_u16()
            ))),
            Err(err) => Err(err),
        }
    }
}

impl Gateway for HttpGateway {
    fn get(&self, path: &str, cred: Option<&Credential>) -> Result<Value, ApiError> {
        self.dispatch(self.client.get(self.url(path)), cred)
    }

    fn post(
        &self,
        path: &str,
        body: &Value,
        cred: Option<&Credential>,
    ) -> Result<Value, ApiError> {
        self.dispatch(self.client.post(self.url(path)).json(body), cred)
    }

    fn put(&self, path: &str, body: &Value, cred: Option<&Credential>) -> Result<Value, ApiError> {
        self.dispatch(self.client.put(self.url(path)).json(body), cred)
    }

    fn delete(&self, path: &str, cred: Option<&Credential>) -> Result<Value, ApiError> {
        self.dispatch(self.client.delete(self.url(path)), cred)
    }
}
