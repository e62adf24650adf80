//! Remote language model producer
//!
//! Talks to an OpenAI-compatible chat-completion endpoint. The model is asked
//! for a JSON array of `{type, text, start, end, confidence}` objects. Any
//! failure along the way (network, status, malformed JSON) yields zero
//! candidates and a warning; it never fails the caller.

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{DetectionMethod, EntityKind, Span};
use crate::config::LlmConfig;
use crate::domain::{FacelessError, ProducerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Confidence for entities reported without one
const DEFAULT_LLM_CONFIDENCE: f32 = 0.8;

/// Trait for asynchronous span producers backed by a remote service
///
/// Implementations swallow their own failures: the returned list is empty
/// when the service is unreachable or answers with garbage.
#[async_trait]
pub trait RemoteProducer: Send + Sync {
    /// Short producer name used in logs
    fn name(&self) -> &'static str;

    /// Detect candidate spans in `text`
    async fn detect(&self, text: &str, config: &AnonymizationConfig) -> Vec<Span>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// One entity as reported by the model
#[derive(Debug, Deserialize)]
struct ReportedEntity {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
    start: Option<usize>,
    end: Option<usize>,
    confidence: Option<f32>,
}

/// LLM-backed producer
pub struct LlmProducer {
    client: Client,
    config: LlmConfig,
}

impl LlmProducer {
    /// Create a producer for an endpoint
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                FacelessError::Configuration(format!("Failed to build LLM HTTP client: {e}"))
            })?;

        tracing::info!(model = %config.model, base_url = %config.base_url, "LLM producer ready");

        Ok(Self { client, config })
    }

    async fn request(
        &self,
        text: &str,
        config: &AnonymizationConfig,
    ) -> std::result::Result<Vec<Span>, ProducerError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: build_prompt(text, &config.entities),
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));
        let mut builder = self.client.post(url).json(&request);

        if let Some(ref key) = self.config.api_key {
            builder = match self.config.api_key_header {
                Some(ref header) => builder.header(header.as_str(), key.expose_secret().as_str()),
                None => builder.bearer_auth(key.expose_secret().as_str()),
            };
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProducerError::Timeout(e.to_string())
            } else {
                ProducerError::Request(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProducerError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProducerError::InvalidResponse(e.to_string()))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ProducerError::InvalidResponse("response has no choices".to_string()))?;

        parse_llm_response(&content, text, &self.config.model)
    }
}

#[async_trait]
impl RemoteProducer for LlmProducer {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn detect(&self, text: &str, config: &AnonymizationConfig) -> Vec<Span> {
        if text.is_empty() {
            return Vec::new();
        }

        match self.request(text, config).await {
            Ok(spans) => {
                tracing::info!(count = spans.len(), model = %self.config.model, "LLM detection finished");
                spans
            }
            Err(e) => {
                crate::log_producer_failure!(self.name(), e);
                Vec::new()
            }
        }
    }
}

/// Build the detection prompt for the requested kinds
pub fn build_prompt(text: &str, kinds: &[EntityKind]) -> String {
    let wanted = kinds
        .iter()
        .map(|kind| format!("{} ({})", kind.description(), kind.label()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You detect personal data in text.\n\
         Find every occurrence of: {wanted}.\n\
         \n\
         TEXT:\n\
         {text}\n\
         \n\
         Answer with a JSON array only. Each element is an object with the fields \
         \"type\" (one of the labels above), \"text\" (the exact substring), \
         \"start\" and \"end\" (offsets into the text, end exclusive) and \
         \"confidence\" (0.0 to 1.0). Answer [] when nothing is found.\n\
         Example: [{{\"type\": \"PERSON\", \"text\": \"Jan Kowalski\", \"start\": 10, \"end\": 22, \"confidence\": 0.95}}]"
    )
}

/// Turn a model answer into spans over `original`
///
/// The array is taken from the first `[` to the last `]`, so prose or code
/// fences around it are tolerated. Unknown types are dropped. When the
/// reported offsets do not slice out the reported text, the first occurrence
/// of the text is used instead; entities whose text does not occur are
/// dropped.
pub fn parse_llm_response(
    content: &str,
    original: &str,
    model: &str,
) -> std::result::Result<Vec<Span>, ProducerError> {
    let (Some(open), Some(close)) = (content.find('['), content.rfind(']')) else {
        return Err(ProducerError::NoJsonArray);
    };
    if close < open {
        return Err(ProducerError::NoJsonArray);
    }

    let items: Vec<serde_json::Value> = serde_json::from_str(&content[open..=close])
        .map_err(|e| ProducerError::InvalidResponse(format!("malformed entity array: {e}")))?;

    let mut spans = Vec::new();
    for item in items {
        let reported: ReportedEntity = match serde_json::from_value(item) {
            Ok(reported) => reported,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed LLM entity");
                continue;
            }
        };

        let Some(kind) = EntityKind::from_alias(&reported.kind) else {
            tracing::debug!(label = %reported.kind, "Dropping LLM entity with unknown type");
            continue;
        };
        if reported.text.is_empty() {
            continue;
        }

        let Some((start, end)) = locate(original, &reported) else {
            tracing::debug!(kind = %kind, "Dropping LLM entity not found in text");
            continue;
        };

        let confidence = reported.confidence.unwrap_or(DEFAULT_LLM_CONFIDENCE);
        spans.push(
            Span::new(reported.text, kind, start, end, confidence, DetectionMethod::Llm)
                .with_attribute("source", "llm")
                .with_attribute("model", model),
        );
    }

    Ok(spans)
}

fn locate(original: &str, reported: &ReportedEntity) -> Option<(usize, usize)> {
    if let Some(start) = reported.start {
        let end = reported.end.unwrap_or(start.saturating_add(reported.text.len()));
        if original.get(start..end) == Some(reported.text.as_str()) {
            return Some((start, end));
        }
    }

    original
        .find(&reported.text)
        .map(|start| (start, start + reported.text.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Nazywam się Jan Kowalski, mail jan@example.com";

    #[test]
    fn test_parse_exact_offsets() {
        let content = r#"[{"type": "PERSON", "text": "Jan Kowalski", "start": 13, "end": 25, "confidence": 0.95}]"#;
        let spans = parse_llm_response(content, TEXT, "test-model").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind(), EntityKind::Person);
        assert_eq!(&TEXT[spans[0].start()..spans[0].end()], "Jan Kowalski");
        assert_eq!(spans[0].confidence(), 0.95);
        assert_eq!(spans[0].attribute("model"), Some("test-model"));
        assert_eq!(spans[0].source(), DetectionMethod::Llm);
    }

    #[test]
    fn test_parse_repairs_character_offsets() {
        // 'ę' is two bytes, so character offsets are one short
        let content = r#"[{"type": "PERSON", "text": "Jan Kowalski", "start": 12, "end": 24}]"#;
        let spans = parse_llm_response(content, TEXT, "m").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start(), 13);
        assert_eq!(spans[0].end(), 25);
        assert_eq!(spans[0].confidence(), 0.8);
    }

    #[test]
    fn test_parse_wrapped_in_prose() {
        let content = "Here you go:\n```json\n[{\"type\": \"EMAIL\", \"text\": \"jan@example.com\"}]\n```";
        let spans = parse_llm_response(content, TEXT, "m").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind(), EntityKind::Email);
    }

    #[test]
    fn test_parse_drops_absent_text_and_unknown_type() {
        let content = r#"[
            {"type": "PERSON", "text": "Anna Nowak", "start": 0, "end": 10},
            {"type": "FAVOURITE_COLOUR", "text": "Jan", "start": 13, "end": 16},
            {"type": "NAZWISKO", "text": "Kowalski"}
        ]"#;
        let spans = parse_llm_response(content, TEXT, "m").unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text(), "Kowalski");
        assert_eq!(spans[0].kind(), EntityKind::Person);
    }

    #[test]
    fn test_parse_without_array() {
        assert!(matches!(
            parse_llm_response("I found nothing.", TEXT, "m"),
            Err(ProducerError::NoJsonArray)
        ));
        assert!(matches!(
            parse_llm_response("[not json]", TEXT, "m"),
            Err(ProducerError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_llm_response("[]", TEXT, "m").unwrap().is_empty());
    }

    #[test]
    fn test_prompt_lists_requested_kinds() {
        let prompt = build_prompt("tekst", &[EntityKind::Person, EntityKind::NationalId]);
        assert!(prompt.contains("person names (PERSON)"));
        assert!(prompt.contains("PESEL numbers (PESEL)"));
        assert!(!prompt.contains("EMAIL"));
        assert!(prompt.contains("tekst"));
    }
}
