//! Text-to-speech placeholder. No audio is synthesized; clients get a
//! stable URL and a duration estimate so the interview UI can pace itself.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_VOICE: &str = "en-US-Standard-A";
const CHARS_PER_SECOND: usize = 10;

#[derive(Debug, Default, Deserialize)]
pub struct TtsRequest {
    pub text: Option<String>,
    pub voice: Option<String>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtsResponse {
    pub success: bool,
    pub audio_url: String,
    /// Estimated seconds.
    pub duration: usize,
    pub voice: String,
}

pub fn synthesize(request: &TtsRequest) -> Result<TtsResponse, AppError> {
    let text = request
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("Text is required".to_string()))?;

    Ok(TtsResponse {
        success: true,
        audio_url: format!("/api/tts/audio/{}", urlencoding::encode(text)),
        duration: text.chars().count().div_ceil(CHARS_PER_SECOND),
        voice: request
            .voice
            .clone()
            .unwrap_or_else(|| DEFAULT_VOICE.to_string()),
    })
}

/// POST /api/v1/tts
pub async fn handle_tts(Json(request): Json<TtsRequest>) -> Result<Json<TtsResponse>, AppError> {
    synthesize(&request).map(Json)
}
