use crate::config::RequestConfig;
use crate::constants::network::{API_KEY_HEADER, TIMEOUT_API_REQUEST_MS, TIMEOUT_DOWNLOAD_MS};
use crate::errors::ConfigError;
use crate::services::logger::Logger;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Outcome of a remote call or file operation, carried as data.
///
/// `status` is the HTTP status when a response was received, `None` for
/// transport failures and for local file operations.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success { value: T, status: Option<u16> },
    Failure { reason: String, status: Option<u16> },
}

impl<T> OperationResult<T> {
    pub fn success(value: T) -> Self {
        OperationResult::Success {
            value,
            status: None,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        OperationResult::Failure {
            reason: reason.into(),
            status: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            OperationResult::Success { status, .. } | OperationResult::Failure { status, .. } => {
                *status
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OperationResult::Success { value, .. } => Some(value),
            OperationResult::Failure { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            OperationResult::Success { .. } => None,
            OperationResult::Failure { reason, .. } => Some(reason.as_str()),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            OperationResult::Success { value, .. } => Ok(value),
            OperationResult::Failure { reason, .. } => Err(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            OperationResult::Success { value, status } => OperationResult::Success {
                value: f(value),
                status,
            },
            OperationResult::Failure { reason, status } => {
                OperationResult::Failure { reason, status }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload described as plain data; turned into a reqwest form at
/// send time.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub texts: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.texts.push((field.to_string(), value.into()));
        self
    }

    pub fn file(mut self, field: &str, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.files.push(FilePart {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        });
        self
    }

    fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (field, value) in self.texts {
            form = form.text(field, value);
        }
        for part in self.files {
            let file = Part::bytes(part.bytes)
                .file_name(part.file_name)
                .mime_str(&part.mime)?;
            form = form.part(part.field, file);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartBody),
}

/// Anything that can hand back the bytes behind a URL.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> OperationResult<Bytes>;
}

pub struct IdeogramClient {
    config: RequestConfig,
    http: Client,
    logger: Logger,
}

impl IdeogramClient {
    pub fn new(config: RequestConfig, logger: &Logger) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        logger.register_secret(&config.api_key);
        Ok(Self {
            config,
            http,
            logger: logger.child("client"),
        })
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url,
            path.trim_start_matches('/')
        )
    }

    pub async fn post(&self, path: &str, body: RequestBody) -> OperationResult<Value> {
        let url = self.endpoint(path);
        let request = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .timeout(Duration::from_millis(TIMEOUT_API_REQUEST_MS));
        let request = match body {
            RequestBody::Json(payload) => request.json(&payload),
            RequestBody::Multipart(parts) => match parts.into_form() {
                Ok(form) => request.multipart(form),
                Err(err) => return OperationResult::failure(format!("Request failed: {}", err)),
            },
        };

        self.logger
            .debug("POST", Some(&serde_json::json!({ "path": path })));

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                let reason = format!(
                    "Request failed: {}",
                    describe_transport_error(&err, TIMEOUT_API_REQUEST_MS)
                );
                self.logger.warn(&reason, Some(&serde_json::json!({ "path": path })));
                return OperationResult::failure(reason);
            }
        };

        let status = response.status();
        let raw = match response.bytes().await {
            Ok(raw) => raw,
            Err(err) => {
                return OperationResult::Failure {
                    reason: format!(
                        "Request failed: {}",
                        describe_transport_error(&err, TIMEOUT_API_REQUEST_MS)
                    ),
                    status: Some(status.as_u16()),
                };
            }
        };
        let parsed: Option<Value> = serde_json::from_slice(&raw).ok();

        if status.is_success() {
            let value = parsed
                .unwrap_or_else(|| Value::String(String::from_utf8_lossy(&raw).into_owned()));
            return OperationResult::Success {
                value,
                status: Some(status.as_u16()),
            };
        }

        let reason = match parsed {
            Some(body) => format!(
                "API Error: {}",
                body.get("message")
                    .and_then(|m| m.as_str())
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or("Unknown error")
            ),
            None => format!("Request failed: {}", describe_status(status)),
        };
        self.logger.warn(
            &reason,
            Some(&serde_json::json!({ "path": path, "status": status.as_u16() })),
        );
        OperationResult::Failure {
            reason,
            status: Some(status.as_u16()),
        }
    }

    /// Plain GET of a generated image. The API key stays with the API host.
    pub async fn download_binary(&self, url: &str) -> OperationResult<Bytes> {
        let response = match self
            .http
            .get(url)
            .timeout(Duration::from_millis(TIMEOUT_DOWNLOAD_MS))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                return OperationResult::failure(describe_transport_error(
                    &err,
                    TIMEOUT_DOWNLOAD_MS,
                ))
            }
        };

        let status = response.status();
        if !status.is_success() {
            return OperationResult::Failure {
                reason: describe_status(status),
                status: Some(status.as_u16()),
            };
        }

        match response.bytes().await {
            Ok(body) => OperationResult::Success {
                value: body,
                status: Some(status.as_u16()),
            },
            Err(err) => OperationResult::Failure {
                reason: describe_transport_error(&err, TIMEOUT_DOWNLOAD_MS),
                status: Some(status.as_u16()),
            },
        }
    }
}

#[async_trait]
impl ImageSource for IdeogramClient {
    async fn fetch(&self, url: &str) -> OperationResult<Bytes> {
        self.download_binary(url).await
    }
}

fn describe_status(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn describe_transport_error(err: &reqwest::Error, timeout_ms: u64) -> String {
    if err.is_timeout() {
        return format!("timeout of {}ms exceeded", timeout_ms);
    }
    err.to_string()
}
