use async_trait::async_trait;
use reqwest::{Client, header};
use serde_json::Value;
use tracing::{debug, warn};

pub use reqwest::Method;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Per-call options. Defaults to an unauthenticated `GET` with no body.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub token: Option<String>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            token: None,
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn token(mut self, token: Option<&str>) -> Self {
        self.token = token.map(str::to_string);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Issues exactly one request and returns the decoded body.
///
/// Implementations must fail with [`ApiError::Authentication`] for the token messages and
/// with [`ApiError::Status`] for every other non-2xx response. There is no retry and no timeout.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let url = self.config.url_for(path);
        debug!("{} {}", options.method, path);

        let mut request = self
            .client
            .request(options.method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = options.token.as_deref() {
            request = request.bearer_auth(token);
        }

        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);

        let text = response.text().await?;
        let data = decode_body(&text, is_json);

        if !status.is_success() {
            let message = resolve_error_message(status.as_u16(), &data);
            warn!("{} {} failed with {}: {}", options.method, path, status, message);
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        Ok(data)
    }
}

/// JSON when the response declared it, otherwise the raw text as a string value.
/// A declared-JSON body that does not parse is kept as text.
pub fn decode_body(text: &str, is_json: bool) -> Value {
    if is_json {
        if let Ok(value) = serde_json::from_str::<Value>(text) {
            return value;
        }
    }
    Value::String(text.to_string())
}

/// `message` field, then `error` field, then the text body, then a generic status line.
pub fn resolve_error_message(status: u16, data: &Value) -> String {
    fn non_empty(value: Option<&Value>) -> Option<&str> {
        value.and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    let resolved = match data {
        Value::Object(map) => non_empty(map.get("message")).or_else(|| non_empty(map.get("error"))),
        Value::String(text) if !text.is_empty() => Some(text.as_str()),
        _ => None,
    };

    resolved
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed ({})", status))
}
