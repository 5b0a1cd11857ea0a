//! # HTTP Transport
//!
//! The seam between [`ApiClient`](crate::ApiClient) and the network. The
//! client builds an [`HttpRequest`] (relative path, query, body, optional
//! bearer token) and a [`Transport`] turns it into an [`HttpResponse`].
//!
//! Production uses [`ReqwestTransport`]; tests script responses with an
//! in-memory implementation so the refresh logic runs without a server.
//!
//! Non-success statuses are *not* errors at this layer: the transport
//! reports what came back and the client decides.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::envelope;
use crate::error::{ClientError, ClientResult};

// =============================================================================
// Request
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A file sent as `multipart/form-data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl MultipartFile {
    /// A CSV upload in the `file` field.
    pub fn csv(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        MultipartFile {
            field: "file".to_string(),
            file_name: file_name.into(),
            bytes,
            mime: "text/csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartFile),
}

/// One request, cheap to clone so it can be replayed after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path relative to the API base URL, starting with `/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    pub bearer: Option<String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        HttpRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn with_file(mut self, file: MultipartFile) -> Self {
        self.body = RequestBody::Multipart(file);
        self
    }

    /// Appends every non-null field of `params` as a query pair.
    ///
    /// `params` must serialize to a JSON object (a query struct).
    pub fn with_query<Q: Serialize + ?Sized>(mut self, params: &Q) -> ClientResult<Self> {
        let value = serde_json::to_value(params)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;
        let Value::Object(fields) = value else {
            return Err(ClientError::SerializationFailed(
                "query parameters must serialize to an object".into(),
            ));
        };
        for (key, value) in fields {
            if let Some(text) = query_value(value) {
                self.query.push((key, text));
            }
        }
        Ok(self)
    }

    pub fn with_bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

fn query_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(parts) => {
            let joined: Vec<String> = parts.into_iter().filter_map(query_value).collect();
            (!joined.is_empty()).then(|| joined.join(","))
        }
        other @ Value::Object(_) => Some(other.to_string()),
    }
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        HttpResponse {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, value: &Value) -> Self {
        Self::new(status, value.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-success response into [`ClientError::Api`].
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Api {
                status: self.status,
                message: envelope::extract_message(&self.body),
            })
        }
    }

    /// The envelope's `data`, decoded.
    pub fn data<T: DeserializeOwned>(&self) -> ClientResult<T> {
        envelope::unwrap_data(&self.body)
    }

    /// The envelope's `message`, if any.
    pub fn message(&self) -> Option<String> {
        envelope::extract_message(&self.body)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// =============================================================================
// Transport
// =============================================================================

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request. Only failures to get *any* response are errors.
    async fn execute(&self, request: &HttpRequest) -> ClientResult<HttpResponse>;
}

/// [`Transport`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("stockdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ReqwestTransport {
            http,
            base_url: config.base_url()?,
            timeout_secs: config.api.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &HttpRequest) -> ClientResult<HttpResponse> {
        let url = self.url_for(&request.path)?;
        let request_id = uuid::Uuid::new_v4();
        debug!(method = %request.method, %url, %request_id, "Sending request");

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .header("x-request-id", request_id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(file) => {
                let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime)?;
                builder.multipart(reqwest::multipart::Form::new().part(file.field.clone(), part))
            }
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_secs)
            } else {
                ClientError::from(e)
            }
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(self.timeout_secs)
            } else {
                ClientError::from(e)
            }
        })?;

        debug!(%status, %request_id, bytes = body.len(), "Received response");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}
