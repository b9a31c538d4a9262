//! `generateContent` client for a hosted multimodal model.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};
use zonewatch_config::{AnalyzerConfig, ConfigError};
use zonewatch_core::collaborators::{Analyzer, Frame, Instruction};
use zonewatch_core::error::AnalysisError;
use zonewatch_core::model::AnalysisReport;

use crate::decode::{candidate_text, decode_report, error_message, report_schema};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Sends each frame with the privacy directive and decodes the structured reply.
pub struct HttpAnalyzer {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpAnalyzer {
    pub fn new(base_url: &str, model: &str, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: format!(
                "{}/models/{}:generateContent",
                base_url.trim_end_matches('/'),
                model
            ),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, ConfigError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("analyzer.api_key"))?;
        Ok(Self::new(&config.base_url, &config.model, api_key))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAnalyzer")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

fn build_request<'a>(frame: &'a Frame, instruction: &Instruction) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: &frame.mime_type,
                        data: STANDARD.encode(&frame.data),
                    }),
                    text: None,
                },
                Part {
                    inline_data: None,
                    text: Some(instruction.text()),
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: report_schema(),
        },
    }
}

#[async_trait]
impl Analyzer for HttpAnalyzer {
    async fn analyze(
        &self,
        frame: &Frame,
        instruction: &Instruction,
    ) -> Result<AnalysisReport, AnalysisError> {
        let request = build_request(frame, instruction);

        let resp = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Unreachable(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AnalysisError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), "Analysis request rejected: {}", message);
            return Err(AnalysisError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let text = candidate_text(&body)?;
        debug!("Analysis response: {} bytes", text.len());
        decode_report(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_url_and_model() {
        let analyzer = HttpAnalyzer::new("https://example.test/v1beta/", "vision-1", "k");
        assert_eq!(
            analyzer.endpoint(),
            "https://example.test/v1beta/models/vision-1:generateContent"
        );
    }

    #[test]
    fn config_without_key_is_rejected() {
        let config = AnalyzerConfig::default();
        assert!(matches!(
            HttpAnalyzer::from_config(&config),
            Err(ConfigError::Missing("analyzer.api_key"))
        ));

        let config = AnalyzerConfig {
            api_key: Some("secret".into()),
            ..AnalyzerConfig::default()
        };
        let analyzer = HttpAnalyzer::from_config(&config).unwrap();
        assert!(!format!("{analyzer:?}").contains("secret"));
    }

    #[test]
    fn request_carries_image_and_directive() {
        let frame = Frame::jpeg(bytes::Bytes::from_static(b"\xff\xd8\xff"));
        let request = build_request(&frame, &Instruction::privacy_directive());
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "/9j/");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], Instruction::privacy_directive().text());
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[tokio::test]
    async fn unreachable_service_maps_to_unreachable() {
        // Nothing listens on the discard port.
        let analyzer = HttpAnalyzer::new("http://127.0.0.1:9", "m", "k");
        let frame = Frame::jpeg(vec![1u8, 2, 3]);
        let err = analyzer
            .analyze(&frame, &Instruction::privacy_directive())
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Unreachable(_)));
    }
}
