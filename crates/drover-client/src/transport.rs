//! The HTTP collaborator seam.
//!
//! All portal traffic goes through the [`Transport`] trait: GET with query
//! parameters, POST form bodies, POST percent-encoded-JSON form bodies, and
//! POST multipart file bodies, every one carrying the raw API key in an
//! `Authorization` header. [`HttpTransport`] is the reqwest blocking
//! implementation; tests substitute a recording fake.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use thiserror::Error;
use url::Url;

use drover_core::{AppError, HttpConfig, JsonMap, Outcome, RawResponse};

/// A transport-level failure: connect, timeout, unreadable body. These are
/// never surfaced as errors to users; [`normalize`] folds them into a
/// failed [`Outcome`].
#[derive(Error, Debug)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Synchronous request/response access to the portal's action endpoint.
pub trait Transport {
    fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<RawResponse, TransportError>;

    fn post_form(
        &self,
        action: &str,
        fields: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError>;

    /// POST with the record JSON-encoded and then percent-encoded whole as
    /// the `application/x-www-form-urlencoded` body.
    fn post_json_form(
        &self,
        action: &str,
        record: &JsonMap,
    ) -> Result<RawResponse, TransportError>;

    /// POST a multipart form: text fields plus one file part.
    fn post_multipart(
        &self,
        action: &str,
        fields: &[(&str, String)],
        file_field: &str,
        bytes: Vec<u8>,
    ) -> Result<RawResponse, TransportError>;
}

/// Folds a transport result into a normalized outcome.
pub fn normalize(result: Result<RawResponse, TransportError>) -> Outcome {
    match result {
        Ok(raw) => Outcome::from_raw(&raw),
        Err(e) => Outcome::from_error(e.to_string()),
    }
}

/// Characters escaped in the JSON-in-form body: everything except
/// alphanumerics, the unreserved marks, and `/`.
const FORM_QUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// JSON-encodes a record and percent-encodes the whole string, the form the
/// portal expects for create/update bodies.
pub(crate) fn urlencode_json(record: &JsonMap) -> Result<String, TransportError> {
    let json = serde_json::to_string(record).map_err(|e| TransportError(e.to_string()))?;
    Ok(utf8_percent_encode(&json, FORM_QUOTE).to_string())
}

/// Blocking HTTP transport over a validated action endpoint.
pub struct HttpTransport {
    client: Client,
    base: Url,
    key: String,
}

impl HttpTransport {
    /// Builds a transport for a base action URL (ending in `/action/`).
    ///
    /// # Errors
    ///
    /// Returns `AppError::ClientError` if the HTTP client cannot be built.
    pub fn new(action_url: &str, key: &str, config: &HttpConfig) -> Result<Self, AppError> {
        let base = Url::parse(action_url)
            .map_err(|e| AppError::InvalidEndpoint(format!("{}: {}", action_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("drover/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;

        Ok(Self {
            client,
            base,
            key: key.to_string(),
        })
    }

    fn action_url(&self, action: &str) -> Result<Url, TransportError> {
        self.base
            .join(action)
            .map_err(|e| TransportError(e.to_string()))
    }

    fn finish(response: Response) -> Result<RawResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().map_err(|e| TransportError(e.to_string()))?;
        Ok(RawResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn get(&self, action: &str, params: &[(&str, &str)]) -> Result<RawResponse, TransportError> {
        let mut url = self.action_url(action)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in params {
                pairs.append_pair(name, value);
            }
        }
        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, self.key.as_str())
            .send()
            .map_err(|e| TransportError(e.to_string()))?;
        Self::finish(response)
    }

    fn post_form(
        &self,
        action: &str,
        fields: &[(&str, &str)],
    ) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .post(self.action_url(action)?)
            .header(AUTHORIZATION, self.key.as_str())
            .form(fields)
            .send()
            .map_err(|e| TransportError(e.to_string()))?;
        Self::finish(response)
    }

    fn post_json_form(
        &self,
        action: &str,
        record: &JsonMap,
    ) -> Result<RawResponse, TransportError> {
        let body = urlencode_json(record)?;
        let response = self
            .client
            .post(self.action_url(action)?)
            .header(AUTHORIZATION, self.key.as_str())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .map_err(|e| TransportError(e.to_string()))?;
        Self::finish(response)
    }

    fn post_multipart(
        &self,
        action: &str,
        fields: &[(&str, String)],
        file_field: &str,
        bytes: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        let mut form = multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.clone());
        }
        let part = multipart::Part::bytes(bytes).file_name(file_field.to_string());
        form = form.part(file_field.to_string(), part);

        let response = self
            .client
            .post(self.action_url(action)?)
            .header(AUTHORIZATION, self.key.as_str())
            .multipart(form)
            .send()
            .map_err(|e| TransportError(e.to_string()))?;
        Self::finish(response)
    }
}
