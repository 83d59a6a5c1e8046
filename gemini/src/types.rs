//! Request and response types for the Gemini `generateContent` API

use serde::{Deserialize, Serialize};

/// Request body for `generateContent`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation contents; a single user turn for plan generation
    pub contents: Vec<Content>,
    /// Generation parameters
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateRequest {
    /// Build a single-turn request from a prompt
    #[must_use]
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: prompt.into(),
                }],
            }],
            generation_config: None,
        }
    }

    /// Set the generation config
    #[must_use]
    pub fn with_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// A conversation turn
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Content {
    /// Turn role ("user" or "model")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    pub parts: Vec<Part>,
}

/// A text part within a turn
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Part {
    /// The text payload
    pub text: String,
}

/// Generation parameters
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

/// Response body for `generateContent`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated candidates; the first one carries the answer
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// A generated candidate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    /// Candidate content
    pub content: Content,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_contract_fields() {
        let request = GenerateRequest::from_prompt("plan my stay")
            .with_config(GenerationConfig {
                temperature: Some(0.2),
                max_output_tokens: Some(1024),
            });
        let json = serde_json::to_value(&request).expect("serializes");

        assert_eq!(json["contents"][0]["parts"][0]["text"], "plan my stay");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 1024);
    }

    #[test]
    fn response_text_concatenates_first_candidate_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{ "candidates": [ { "content": { "parts": [
                { "text": "{\"success\":" }, { "text": " true}" }
            ] } } ] }"#,
        )
        .expect("parses");
        assert_eq!(response.text().as_deref(), Some("{\"success\": true}"));
    }

    #[test]
    fn empty_candidates_yield_no_text() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{ "candidates": [] }"#).expect("parses");
        assert_eq!(response.text(), None);
    }
}
