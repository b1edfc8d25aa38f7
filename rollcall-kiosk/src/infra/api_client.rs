use std::time::Duration;

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use rollcall_model::forms::{FIELD_IMAGE, FIELD_NAME, FIELD_ROLL_NO};
use rollcall_model::{BackendReply, ImagePayload, RegisterForm, routes};
use thiserror::Error;

/// Failures talking to the recognition backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS,
    /// timeout, TLS...).
    #[error("{0}")]
    Transport(String),

    /// The backend answered and said no.
    #[error("request rejected with status {status} {status_text}")]
    Rejected {
        status: u16,
        status_text: String,
        /// Error text supplied by the backend, if any.
        message: Option<String>,
    },

    /// The client could not be built or a request could not be assembled.
    #[error("invalid request: {0}")]
    Request(String),
}

impl ApiError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or("Unknown Status")
            .to_string();
        Self::Rejected {
            status,
            status_text,
            message,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    fn transport(err: reqwest::Error) -> Self {
        // Walk the source chain; reqwest's top-level message alone ("error
        // sending request") hides the useful part.
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            source = std::error::Error::source(inner);
        }
        Self::Transport(message)
    }
}

/// HTTP client for the recognition backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client. `timeout` of `None` waits indefinitely.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        // Operators often type "10.0.0.5:5000"; reqwest needs a scheme and a
        // trailing slash would double up with route paths.
        fn normalize(raw: String) -> String {
            let trimmed = raw.trim().trim_end_matches('/').to_string();
            let with_scheme = if trimmed.starts_with("http://")
                || trimmed.starts_with("https://")
            {
                trimmed
            } else {
                format!("http://{}", trimmed)
            };
            if with_scheme != raw {
                log::warn!(
                    "[ApiClient] Normalized base URL from '{}' to '{}'",
                    raw,
                    with_scheme
                );
            }
            with_scheme
        }

        let base_url = normalize(base_url.into());
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::Request(err.to_string()))?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        format!("{}/{}", self.base_url, path.as_ref().trim_start_matches('/'))
    }

    /// Plain-text liveness banner from `GET /`.
    pub async fn health(&self) -> Result<String, ApiError> {
        let request = self.client.get(self.build_url(routes::HEALTH));
        match self.execute_text(request).await? {
            BackendReply::Accepted { message } => Ok(message.unwrap_or_default()),
            BackendReply::Rejected { status, message } => {
                Err(ApiError::rejected(status, message))
            }
        }
    }

    pub async fn register(&self, form: RegisterForm) -> Result<BackendReply, ApiError> {
        let body = Form::new()
            .text(FIELD_NAME, form.name)
            .text(FIELD_ROLL_NO, form.roll_no)
            .part(FIELD_IMAGE, image_part(form.image)?);
        let request = self
            .client
            .post(self.build_url(routes::REGISTER))
            .multipart(body);
        self.execute_json(request).await
    }

    pub async fn scan_image(&self, image: ImagePayload) -> Result<BackendReply, ApiError> {
        let body = Form::new().part(FIELD_IMAGE, image_part(image)?);
        let request = self
            .client
            .post(self.build_url(routes::SCAN_IMAGE))
            .multipart(body);
        self.execute_json(request).await
    }

    pub async fn train(&self) -> Result<BackendReply, ApiError> {
        let request = self.client.post(self.build_url(routes::TRAIN));
        self.execute_json(request).await
    }

    pub async fn get_log(&self) -> Result<BackendReply, ApiError> {
        let request = self.client.get(self.build_url(routes::GET_LOG));
        self.execute_text(request).await
    }

    /// Send and read the body; only transport failures are errors here.
    async fn execute(&self, request: RequestBuilder) -> Result<(u16, String), ApiError> {
        let response = request.send().await.map_err(ApiError::transport)?;
        let status = response.status();
        debug!("[ApiClient] {} -> {}", response.url(), status);
        let body = response.text().await.map_err(ApiError::transport)?;
        Ok((status.as_u16(), body))
    }

    async fn execute_json(&self, request: RequestBuilder) -> Result<BackendReply, ApiError> {
        let (status, body) = self.execute(request).await?;
        Ok(BackendReply::from_json(status, &body))
    }

    async fn execute_text(&self, request: RequestBuilder) -> Result<BackendReply, ApiError> {
        let (status, body) = self.execute(request).await?;
        Ok(BackendReply::from_text(status, &body))
    }
}

fn image_part(image: ImagePayload) -> Result<Part, ApiError> {
    let ImagePayload {
        file_name,
        mime_type,
        bytes,
    } = image;
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(&mime_type)
        .map_err(|err| ApiError::Request(format!("invalid image type '{mime_type}': {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_scheme_and_loses_trailing_slash() {
        let client = ApiClient::new("10.0.0.5:5000/", None).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.5:5000");
        assert_eq!(client.build_url("/scan_image"), "http://10.0.0.5:5000/scan_image");
    }

    #[test]
    fn rejected_carries_canonical_status_text() {
        let err = ApiError::rejected(404, None);
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 404,
                status_text: "Not Found".into(),
                message: None
            }
        );
        assert!(!err.is_network());
    }
}
