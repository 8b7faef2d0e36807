//! Turning a photo of a part into a text search query.
//!
//! Extraction is best-effort: any failure yields `None` and the caller falls
//! back to whatever text the user supplied.

use std::future::Future;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SearchError;
use crate::http::{parse_base_url, HttpSettings};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

const EXTRACTION_PROMPT: &str = "Identify the automotive part in this photo. \
Reply with a short English search query naming the part and, if visible, the \
vehicle brand and model (for example: \"front brake caliper ford f-150\"). \
Reply with the query only. If the photo does not show a vehicle part, reply \
with an empty message.";

/// Derives a search query from image bytes.
pub trait QueryExtractor: Send + Sync {
    /// Returns the extracted query, or `None` when nothing usable came back.
    fn extract_query_from_image(&self, image: &[u8])
        -> impl Future<Output = Option<String>> + Send;
}

/// Extractor used when image search is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVision;

impl QueryExtractor for NoVision {
    async fn extract_query_from_image(&self, _image: &[u8]) -> Option<String> {
        None
    }
}

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from Gemini")]
    UnexpectedStatus { status: u16 },

    #[error("JSON deserialization error for Gemini response: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 2],
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
    }
}

/// [`QueryExtractor`] backed by Gemini `generateContent`.
pub struct GeminiQueryExtractor {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GeminiQueryExtractor {
    /// Creates an extractor against the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if `model` does not form a valid path.
    pub fn new(api_key: &str, model: &str, settings: &HttpSettings) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, model, settings, DEFAULT_BASE_URL)
    }

    /// Creates an extractor against a custom host (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`SearchError::InvalidBaseUrl`] if the endpoint URL does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        settings: &HttpSettings,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = settings.build_client()?;
        let endpoint = parse_base_url(base_url)
            .and_then(|base| {
                base.join(&format!("v1beta/models/{model}:generateContent"))
                    .map_err(|e| e.to_string())
            })
            .map_err(|reason| SearchError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason,
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    async fn generate(&self, image: &[u8]) -> Result<Option<String>, VisionError> {
        let request = GenerateRequest {
            contents: [Content {
                parts: [
                    Part::Text {
                        text: EXTRACTION_PROMPT,
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: sniff_mime_type(image),
                            data: BASE64.encode(image),
                        },
                    },
                ],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VisionError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&body)?;
        Ok(parsed.first_text())
    }
}

impl QueryExtractor for GeminiQueryExtractor {
    async fn extract_query_from_image(&self, image: &[u8]) -> Option<String> {
        if image.is_empty() {
            return None;
        }
        match self.generate(image).await {
            Ok(text) => {
                let query = text
                    .map(|t| t.trim().trim_matches('"').trim().to_owned())
                    .filter(|t| !t.is_empty());
                tracing::debug!(query = ?query, "image query extraction finished");
                query
            }
            Err(e) => {
                tracing::warn!(error = %e, "image query extraction failed");
                None
            }
        }
    }
}

/// Best-effort MIME type from magic bytes; JPEG when unrecognized.
fn sniff_mime_type(image: &[u8]) -> &'static str {
    match image {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_formats() {
        assert_eq!(sniff_mime_type(b"\x89PNG\r\n\x1a\n"), "image/png");
        assert_eq!(sniff_mime_type(b"GIF89a"), "image/gif");
        assert_eq!(sniff_mime_type(b"RIFF\0\0\0\0WEBPVP8 "), "image/webp");
        assert_eq!(sniff_mime_type(&[0xFF, 0xD8, 0xFF]), "image/jpeg");
        assert_eq!(sniff_mime_type(b""), "image/jpeg");
    }

    #[test]
    fn request_serializes_gemini_shape() {
        let request = GenerateRequest {
            contents: [Content {
                parts: [
                    Part::Text { text: "prompt" },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png",
                            data: BASE64.encode(b"abc"),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "prompt");
        assert_eq!(
            json["contents"][0]["parts"][1]["inline_data"]["mime_type"],
            "image/png"
        );
        assert_eq!(json["contents"][0]["parts"][1]["inline_data"]["data"], "YWJj");
    }

    #[test]
    fn first_text_skips_empty_candidates() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                { "finishReason": "SAFETY" },
                { "content": { "parts": [{ "text": "oil filter honda civic" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.first_text().as_deref(), Some("oil filter honda civic"));
    }

    #[test]
    fn endpoint_includes_model() {
        let extractor = GeminiQueryExtractor::with_base_url(
            "k",
            "gemini-1.5-flash",
            &HttpSettings::default(),
            "https://generativelanguage.googleapis.com",
        )
        .unwrap();
        assert_eq!(
            extractor.endpoint.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn no_vision_returns_none() {
        assert!(NoVision.extract_query_from_image(b"img").await.is_none());
    }
}
