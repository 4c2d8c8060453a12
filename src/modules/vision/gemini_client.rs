//! Gemini `generateContent` client
//!
//! One request per prompt: the rendered prompt text plus the photo as inline
//! base64 data, asking for a JSON reply.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{
    ClassificationResponse, ImageInput, RefinedLocation, RefinementResponse, SiteClassification,
    VisionAssistant, VisionError,
};
use crate::core::config::VisionConfig;
use crate::shared::llm::{parse_with_fallback, LlmResponse};
use crate::shared::prompts::{render_classify_site_prompt, render_refine_location_prompt};
use crate::shared::types::Coordinates;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

fn build_request<'a>(prompt: &'a str, image: &'a ImageInput) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: &image.mime_type,
                        data: STANDARD.encode(&image.data),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            temperature: 0.2,
        },
    }
}

/// Concatenate the text parts of the first candidate
fn reply_text(response: GenerateContentResponse) -> Result<String, VisionError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(VisionError::EmptyReply);
    }
    Ok(text)
}

pub struct GeminiVisionClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiVisionClient {
    pub fn new(config: &VisionConfig) -> Result<Self, VisionError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VisionError::Request(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            http,
            endpoint,
            api_key: config.api_key.clone(),
        })
    }

    async fn generate(&self, prompt: &str, image: &ImageInput) -> Result<String, VisionError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(prompt, image))
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {:?}", e);
                VisionError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini returned {}: {}", status, body);
            return Err(VisionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Request(format!("Invalid Gemini response: {}", e)))?;

        reply_text(parsed)
    }
}

#[async_trait]
impl VisionAssistant for GeminiVisionClient {
    #[instrument(skip(self, image), fields(bytes = image.data.len()))]
    async fn refine_location(
        &self,
        image: &ImageInput,
        marked: Coordinates,
    ) -> Result<RefinedLocation, VisionError> {
        let prompt =
            render_refine_location_prompt(marked, &RefinementResponse::json_schema_string())
                .map_err(|e| VisionError::Prompt(e.to_string()))?;

        let text = self.generate(&prompt, image).await?;
        debug!("Refinement reply: {}", text);

        parse_with_fallback::<RefinementResponse>(&text).into_refined()
    }

    #[instrument(skip(self, image), fields(bytes = image.data.len()))]
    async fn classify_site(&self, image: &ImageInput) -> Result<SiteClassification, VisionError> {
        let prompt = render_classify_site_prompt(&ClassificationResponse::json_schema_string())
            .map_err(|e| VisionError::Prompt(e.to_string()))?;

        let text = self.generate(&prompt, image).await?;
        debug!("Classification reply: {}", text);

        parse_with_fallback::<ClassificationResponse>(&text).into_classification()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let image = ImageInput {
            data: vec![0xFF, 0xD8, 0xFF],
            mime_type: "image/jpeg".to_string(),
        };
        let body = serde_json::to_value(build_request("Analiza", &image)).unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "Analiza");
        assert_eq!(parts[1]["inline_data"]["mimeType"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "/9j/");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_reply_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"latitude\": "}, {"text": "-27.1}"}]}}]}"#,
        )
        .unwrap();

        assert_eq!(reply_text(response).unwrap(), "{\"latitude\": -27.1}");
    }

    #[test]
    fn test_reply_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();

        assert!(matches!(reply_text(response), Err(VisionError::EmptyReply)));
    }

    #[test]
    fn test_endpoint_uses_model_name() {
        let client = GeminiVisionClient::new(&VisionConfig {
            api_key: "key".to_string(),
            model: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/".to_string(),
            timeout: std::time::Duration::from_secs(5),
            max_refinement_meters: 250.0,
        })
        .unwrap();

        assert_eq!(
            client.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
