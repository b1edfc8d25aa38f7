//! Recognition service trait and its HTTP adapter
//!
//! This is the contract the request orchestrator uses to reach the backend.
//! Replies are already classified: `Ok` means the backend accepted the
//! operation, `Err(ApiError::Rejected { .. })` means it answered with a
//! failure and `Err(ApiError::Transport(_))` means it never answered.

use std::sync::Arc;

use async_trait::async_trait;
use rollcall_model::{BackendReply, ImagePayload, RegisterForm};

use crate::infra::api_client::{ApiClient, ApiError};

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait RecognitionService: Send + Sync {
    /// Liveness check; never part of the busy envelope.
    async fn health(&self) -> ApiResult<String>;

    /// Register a face. Returns the backend's message, if it sent one.
    async fn register_face(&self, form: RegisterForm) -> ApiResult<Option<String>>;

    /// Submit one captured frame for recognition.
    async fn scan_image(&self, image: ImagePayload) -> ApiResult<Option<String>>;

    /// Trigger model (re)training.
    async fn train_model(&self) -> ApiResult<Option<String>>;

    /// Download the attendance log as opaque text.
    async fn fetch_attendance_log(&self) -> ApiResult<String>;
}

impl std::fmt::Debug for dyn RecognitionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("RecognitionService(..)")
    }
}

#[derive(Debug, Clone)]
pub struct RecognitionApiAdapter {
    client: Arc<ApiClient>,
}

impl RecognitionApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

fn into_message(reply: BackendReply) -> ApiResult<Option<String>> {
    match reply {
        BackendReply::Accepted { message } => Ok(message),
        BackendReply::Rejected { status, message } => {
            Err(ApiError::rejected(status, message))
        }
    }
}

#[async_trait]
impl RecognitionService for RecognitionApiAdapter {
    async fn health(&self) -> ApiResult<String> {
        self.client.health().await
    }

    async fn register_face(&self, form: RegisterForm) -> ApiResult<Option<String>> {
        into_message(self.client.register(form).await?)
    }

    async fn scan_image(&self, image: ImagePayload) -> ApiResult<Option<String>> {
        into_message(self.client.scan_image(image).await?)
    }

    async fn train_model(&self) -> ApiResult<Option<String>> {
        into_message(self.client.train().await?)
    }

    async fn fetch_attendance_log(&self) -> ApiResult<String> {
        into_message(self.client.get_log().await?).map(Option::unwrap_or_default)
    }
}
