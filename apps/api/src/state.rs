use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::documents::DocumentExtractor;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Any text generator; `LlmClient` in production.
    pub llm: Arc<dyn TextGenerator>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub config: Config,
}
