use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::gateway::{
    Backend, CharactersRequest, CheckRequest, CheckResult, CoachHint, CoachRequest, GatewayError,
};
use crate::practice::attempt::Attempt;
use crate::practice::charset::CharacterSet;

pub const CHARACTERS_PATH: &str = "get-characters";
pub const CHECK_PATH: &str = "check-ocr";
pub const COACH_PATH: &str = "coach";

/// JSON-over-POST client for the backend endpoints.
pub struct HttpBackend {
    base_url: String,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

impl HttpBackend {
    #[cfg(feature = "network")]
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(base_url: &str, _timeout: Duration) -> Result<Self, GatewayError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    #[cfg(feature = "network")]
    fn post<B, R>(&self, path: &str, body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status(status.as_u16()));
        }
        let text = response
            .text()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
    }

    #[cfg(not(feature = "network"))]
    fn post<B, R>(&self, _path: &str, _body: &B) -> Result<R, GatewayError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        Err(GatewayError::Offline)
    }
}

impl Backend for HttpBackend {
    fn fetch_character_set(&self, language: &str) -> Result<CharacterSet, GatewayError> {
        self.post(CHARACTERS_PATH, &CharactersRequest { language })
    }

    fn check_drawing(
        &self,
        image: &str,
        expected_char: &str,
        language: &str,
    ) -> Result<CheckResult, GatewayError> {
        self.post(
            CHECK_PATH,
            &CheckRequest {
                image,
                expected_char,
                language,
            },
        )
    }

    fn request_coach_hint(
        &self,
        history: &[Attempt],
        language: &str,
    ) -> Result<CoachHint, GatewayError> {
        self.post(COACH_PATH, &CoachRequest { history, language })
    }
}
