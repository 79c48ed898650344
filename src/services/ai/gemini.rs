use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AiResponse, TextGenerator};
use crate::error::StudyError;
use crate::models::settings::Settings;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.api_key().map(str::to_string),
            settings.ai.model.clone(),
            settings.ai.base_url.clone(),
            Duration::from_secs(settings.ai.timeout_secs),
        )
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn classify_failure(status: StatusCode, body: &str) -> StudyError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.chars().take(300).collect());

        let key_rejected = status == StatusCode::BAD_REQUEST
            && message.to_lowercase().contains("api key");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN || key_rejected {
            StudyError::Auth(format!("API key rejected ({}): {}", status, message))
        } else {
            StudyError::Service(format!("Gemini call failed ({}): {}", status, message))
        }
    }

    fn extract_text(response: GenerateResponse) -> Result<String, StudyError> {
        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(StudyError::Service(format!(
                "Gemini returned no answer: {}",
                reason
            )));
        };

        Ok(candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default())
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<AiResponse, StudyError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            StudyError::Auth(
                "No Gemini API key found. Add GEMINI_API_KEY to secrets.toml.".to_string(),
            )
        })?;

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| StudyError::Service(format!("Failed to build HTTP client: {}", e)))?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig { max_output_tokens },
        };

        log::debug!(
            "Calling {} (prompt {} chars, max {} tokens)",
            self.model,
            prompt.len(),
            max_output_tokens
        );

        let response = client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Self::classify_failure(status, &body));
        }

        let parsed: GenerateResponse = response.json().map_err(|e| {
            StudyError::Service(format!("Unexpected Gemini response format: {}", e))
        })?;

        let text = Self::extract_text(parsed)?;
        log::debug!("Gemini returned {} chars", text.len());
        Ok(AiResponse::new(text))
    }
}
