//! Outfit suggestion client.
//!
//! Sends the visitor's occasion together with the catalog inventory to the
//! Gemini `generateContent` endpoint and reads back a list of product ids.
//! The ids are untrusted; the outfit composer resolves them against the
//! catalog before applying anything.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::instrument;
use vira_core::Catalog;

use crate::config::GeminiConfig;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when requesting a suggestion.
#[derive(Debug, Error)]
pub enum SuggestionError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API key cannot be sent as a header.
    #[error("invalid API key")]
    InvalidApiKey,

    /// Gemini returned an error status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The response carried no candidate text.
    #[error("response contained no suggestion")]
    EmptyResponse,

    /// Failed to parse response.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A suggested outfit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    #[serde(default)]
    pub selected_product_ids: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
}

/// Something that can propose an outfit for an occasion.
#[async_trait]
pub trait OutfitSuggester: Send + Sync {
    /// Propose products from `catalog` for `occasion`.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestionError`] if the suggestion could not be obtained.
    async fn suggest(
        &self,
        occasion: &str,
        catalog: &Catalog,
    ) -> Result<Suggestion, SuggestionError>;
}

/// Ask `suggester` for an outfit, degrading every failure to "no suggestion".
///
/// A blank occasion is not sent.
pub async fn suggest_or_empty(
    suggester: &dyn OutfitSuggester,
    occasion: &str,
    catalog: &Catalog,
) -> Suggestion {
    let occasion = occasion.trim();
    if occasion.is_empty() {
        return Suggestion::default();
    }

    match suggester.suggest(occasion, catalog).await {
        Ok(suggestion) => suggestion,
        Err(e) => {
            tracing::warn!(error = %e, "Outfit suggestion failed");
            Suggestion::default()
        }
    }
}

/// Suggester used when no API key is configured. Never proposes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSuggester;

#[async_trait]
impl OutfitSuggester for DisabledSuggester {
    async fn suggest(
        &self,
        _occasion: &str,
        _catalog: &Catalog,
    ) -> Result<Suggestion, SuggestionError> {
        tracing::debug!("Outfit suggestions are disabled (no GEMINI_API_KEY)");
        Ok(Suggestion::default())
    }
}

/// Gemini API client.
#[derive(Clone)]
pub struct GeminiSuggester {
    inner: Arc<GeminiSuggesterInner>,
}

struct GeminiSuggesterInner {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl GeminiSuggester {
    /// Create a new Gemini client.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key contains invalid header characters or
    /// the HTTP client cannot be built.
    pub fn new(config: &GeminiConfig) -> Result<Self, SuggestionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| SuggestionError::InvalidApiKey)?;
        api_key.set_sensitive(true);
        headers.insert("x-goog-api-key", api_key);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(GeminiSuggesterInner {
                client,
                endpoint: format!("{GEMINI_API_BASE}/{}:generateContent", config.model),
                model: config.model.clone(),
            }),
        })
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> SuggestionError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return SuggestionError::RateLimited(retry_after);
        }

        match response.text().await {
            Ok(body) => {
                let message = serde_json::from_str::<ApiErrorResponse>(&body)
                    .map_or(body, |e| e.error.message);
                SuggestionError::Api {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => SuggestionError::Http(e),
        }
    }
}

#[async_trait]
impl OutfitSuggester for GeminiSuggester {
    #[instrument(skip(self, catalog), fields(model = %self.inner.model))]
    async fn suggest(
        &self,
        occasion: &str,
        catalog: &Catalog,
    ) -> Result<Suggestion, SuggestionError> {
        let request = build_request(occasion, catalog)?;

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let suggestion = parse_response(&body)?;
        tracing::info!(
            selected = suggestion.selected_product_ids.len(),
            "Outfit suggestion received"
        );
        Ok(suggestion)
    }
}

// =============================================================================
// Wire format
// =============================================================================

#[derive(Debug, Serialize)]
struct InventoryItem<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(rename = "type")]
    clothing_type: &'static str,
    category: &'static str,
    description: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

fn build_prompt(occasion: &str, catalog: &Catalog) -> Result<String, SuggestionError> {
    let inventory: Vec<InventoryItem<'_>> = catalog
        .products()
        .iter()
        .map(|p| InventoryItem {
            id: p.id.as_str(),
            name: &p.name,
            clothing_type: p.clothing_type.as_str(),
            category: p.category.label(),
            description: &p.description,
        })
        .collect();
    let inventory =
        serde_json::to_string(&inventory).map_err(|e| SuggestionError::Parse(e.to_string()))?;

    Ok(format!(
        "Jako módní stylista vyber nejlepší outfit z dostupného inventáře pro tuto \
         příležitost: \"{occasion}\".\n\
         Inventář: {inventory}.\n\
         Vyber maximálně jeden produkt od každého typu (headwear, top, bottom, shoes).\n\
         Snaž se vybrat kompletní outfit (alespoň top, bottom a shoes)."
    ))
}

fn build_request(occasion: &str, catalog: &Catalog) -> Result<serde_json::Value, SuggestionError> {
    let prompt = build_prompt(occasion, catalog)?;
    Ok(json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "selectedProductIds": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" },
                        "description": "Array of product IDs selected for the outfit"
                    },
                    "reasoning": {
                        "type": "STRING",
                        "description": "Short explanation of why this outfit fits the occasion (in Czech)"
                    }
                },
                "required": ["selectedProductIds", "reasoning"]
            }
        }
    }))
}

/// Pull the suggestion out of a `generateContent` response body.
fn parse_response(body: &str) -> Result<Suggestion, SuggestionError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| SuggestionError::Parse(e.to_string()))?;

    let text = response
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or(SuggestionError::EmptyResponse)?;

    serde_json::from_str(&text).map_err(|e| SuggestionError::Parse(e.to_string()))
}
