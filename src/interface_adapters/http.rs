use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{ApiConfig, ApiError, ExecutionContext, NO_STATUS, Navigator};
use crate::use_cases::token_store::TokenStore;

const APPLICATION_JSON: &str = "application/json";
const X_FORWARDED_FOR: &str = "X-Forwarded-For";

// Statuses worth another attempt; everything else fails immediately.
const RETRYABLE_STATUSES: [u16; 8] = [408, 409, 425, 429, 500, 502, 503, 504];

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Multipart(Vec<MultipartField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartField {
    pub name: String,
    pub data: Vec<u8>,
    pub file_name: Option<String>,
    pub mime: Option<String>,
}

impl MultipartField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: value.into().into_bytes(),
            file_name: None,
            mime: None,
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            data,
            file_name: Some(file_name.into()),
            mime: Some(mime.into()),
        }
    }
}

/// One logical upstream call; may be sent several times when retried.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: RequestBody,
    query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json<B>(mut self, body: &B) -> Result<Self, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let value = serde_json::to_value(body)
            .map_err(|err| ApiError::invalid_payload(NO_STATUS, err))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Preconfigured upstream client.
///
/// Every call gets the bearer token from the [`TokenStore`], JSON accept and
/// content-type headers, the forwarded client address and locale when the
/// [`ExecutionContext`] allows it, and the configured retry/timeout policy.
/// Non-2xx responses come back as a normalized [`ApiError`]; a 401 also clears
/// the session token and, in a navigating context, redirects to the login path.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
    tokens: Arc<TokenStore>,
    context: Arc<ExecutionContext>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(
        config: Arc<ApiConfig>,
        tokens: Arc<TokenStore>,
        context: ExecutionContext,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ClientBuildError> {
        check_base_url(&config.base_url)?;
        // The timeout applies to each attempt.
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            tokens,
            context: Arc::new(context),
            navigator,
        })
    }

    /// Same connection pool and token store, different capabilities.
    pub fn with_context(&self, context: ExecutionContext) -> Self {
        Self {
            context: Arc::new(context),
            ..self.clone()
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub async fn call<T>(&self, request: ApiRequest) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(&request)?;
        // Always on, regardless of environment.
        info!(method = %request.method, %url, "api request");

        let mut attempt: u32 = 0;
        loop {
            let builder = self.build(&url, &request)?;
            let retries_left = attempt < self.config.retry;

            match builder.send().await {
                Ok(response) if response.status().is_success() => {
                    let status = response.status().as_u16();
                    debug!(status, %url, "api response");
                    let bytes = response.bytes().await.map_err(transport_error)?;
                    let body = parse_body(&bytes).unwrap_or(Value::Null);
                    return serde_json::from_value(body)
                        .map_err(|err| ApiError::invalid_payload(status, err));
                }
                Ok(response) if retries_left && is_retryable(response.status()) => {
                    warn!(status = response.status().as_u16(), %url, attempt, "retrying api request");
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = match response.bytes().await {
                        Ok(bytes) => parse_body(&bytes),
                        Err(_) => None,
                    };
                    let error = ApiError::from_response(status, body);
                    warn!(status, %url, message = error.message(), "api error");
                    if error.is_authentication_lost() {
                        self.on_authentication_lost();
                    }
                    return Err(error);
                }
                Err(err) if err.is_builder() => {
                    return Err(ApiError::invalid_payload(NO_STATUS, err));
                }
                Err(err) if retries_left => {
                    warn!(error = %err, %url, attempt, "retrying api request after transport error");
                }
                Err(err) => {
                    warn!(error = %err, %url, "api transport error");
                    return Err(transport_error(err));
                }
            }

            attempt += 1;
            tokio::time::sleep(self.config.retry_delay()).await;
        }
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let raw = format!(
            "{}{}",
            self.config.base_url.trim_end_matches('/'),
            request.path
        );
        let mut url = Url::parse(&raw)
            .map_err(|err| ApiError::invalid_payload(NO_STATUS, format!("{raw}: {err}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    fn build(&self, url: &Url, request: &ApiRequest) -> Result<reqwest::RequestBuilder, ApiError> {
        let mut builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(ACCEPT, APPLICATION_JSON);

        if let Some(token) = self.tokens.token() {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, APPLICATION_JSON),
            RequestBody::Json(value) => builder.json(value),
            // reqwest sets the multipart boundary content type itself.
            RequestBody::Multipart(fields) => builder.multipart(multipart_form(fields)?),
        };

        if let Some(client_ip) = self.context.forwarded_for() {
            builder = builder.header(X_FORWARDED_FOR, client_ip);
        }
        if let Some(locale) = &self.context.locale {
            builder = builder.header(self.config.header_locale.as_str(), locale.as_str());
        }

        Ok(builder)
    }

    fn on_authentication_lost(&self) {
        self.tokens.set_token(None);
        if self.context.can_navigate {
            self.navigator.navigate_to(&self.config.login_path);
        }
    }
}

fn multipart_form(fields: &[MultipartField]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for field in fields {
        let mut part = Part::bytes(field.data.clone());
        if let Some(file_name) = &field.file_name {
            part = part.file_name(file_name.clone());
        }
        if let Some(mime) = &field.mime {
            part = part
                .mime_str(mime)
                .map_err(|err| ApiError::invalid_payload(NO_STATUS, err))?;
        }
        form = form.part(field.name.clone(), part);
    }
    Ok(form)
}

fn is_retryable(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status.as_u16())
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::timeout()
    } else {
        ApiError::network(err)
    }
}

// JSON when it parses, raw text otherwise, nothing for an empty body.
fn parse_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(String::from_utf8_lossy(bytes).into_owned())),
    }
}

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid base url {base_url:?}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

// Request paths are appended to the base, so it must be an absolute http(s) URL.
fn check_base_url(base_url: &str) -> Result<(), ClientBuildError> {
    let invalid = |reason: String| ClientBuildError::InvalidBaseUrl {
        base_url: base_url.to_string(),
        reason,
    };
    let url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    Ok(())
}
