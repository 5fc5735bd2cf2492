pub mod client;
pub mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::practice::attempt::Attempt;
use crate::practice::charset::CharacterSet;

pub use client::{Gateway, GatewayClient, GatewayReply, GatewayRequest, GatewayResponse, Ticket};
pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("built without network support")]
    Offline,
}

#[derive(Debug, Serialize)]
pub struct CharactersRequest<'a> {
    pub language: &'a str,
}

#[derive(Debug, Serialize)]
pub struct CheckRequest<'a> {
    pub image: &'a str,
    pub expected_char: &'a str,
    pub language: &'a str,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    #[serde(rename = "match")]
    pub is_match: bool,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Serialize)]
pub struct CoachRequest<'a> {
    pub history: &'a [Attempt],
    pub language: &'a str,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CoachHint {
    pub hint: String,
}

/// The remote OCR and coaching service. Calls block; the UI reaches it
/// through `GatewayClient`, which runs them off the event loop.
pub trait Backend: Send + Sync {
    fn fetch_character_set(&self, language: &str) -> Result<CharacterSet, GatewayError>;

    fn check_drawing(
        &self,
        image: &str,
        expected_char: &str,
        language: &str,
    ) -> Result<CheckResult, GatewayError>;

    fn request_coach_hint(
        &self,
        history: &[Attempt],
        language: &str,
    ) -> Result<CoachHint, GatewayError>;
}
