//! Hosted completion model client — generates chat replies from retrieved
//! knowledge.
//!
//! When constructed with [`CompletionClient::disabled`] (no endpoint
//! configured) generation returns `None` and callers fall back to a
//! retrieval-composed reply, so the platform keeps answering without a
//! model upstream.

use ownbot_common::config::ChatConfig;
use ownbot_common::models::client::BusinessType;
use ownbot_common::models::document::RankedChunk;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One candidate returned by the inference endpoint.
#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Completion client wrapper.
#[derive(Clone)]
pub struct CompletionClient {
    inner: Option<Inner>,
}

#[derive(Clone)]
struct Inner {
    http: reqwest::Client,
    url: String,
    api_key: String,
}

impl CompletionClient {
    /// Construct from chat config; an empty endpoint URL yields a disabled client.
    pub fn from_config(cfg: &ChatConfig) -> Self {
        if cfg.model_url.is_empty() {
            return Self::disabled();
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self {
            inner: Some(Inner {
                http,
                url: cfg.model_url.clone(),
                api_key: cfg.model_api_key.clone(),
            }),
        }
    }

    /// Construct a disabled client — replies come from retrieval only.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Returns `true` if a model endpoint is configured.
    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Ask the model for a reply to `prompt`.
    ///
    /// Returns `Ok(None)` when disabled. Upstream failures surface as
    /// errors so the caller can decide to degrade rather than fail the
    /// visitor's request.
    pub async fn generate(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        let Some(inner) = &self.inner else {
            return Ok(None);
        };

        let response = inner
            .http
            .post(&inner.url)
            .bearer_auth(&inner.api_key)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await?
            .error_for_status()?;

        let candidates: Vec<GeneratedText> = response.json().await?;
        let text = candidates
            .into_iter()
            .next()
            .map(|c| c.generated_text.trim().to_string())
            .filter(|t| !t.is_empty());

        match text {
            Some(t) => Ok(Some(t)),
            None => anyhow::bail!("inference endpoint returned no generated text"),
        }
    }
}

/// Build the model prompt from tenant identity, retrieved knowledge, and the
/// visitor's message.
pub fn build_prompt(
    client_name: &str,
    business_type: BusinessType,
    chunks: &[RankedChunk],
    message: &str,
) -> String {
    let vertical = match business_type {
        BusinessType::Restaurant => "restaurant",
        BusinessType::Gym => "gym",
        BusinessType::Clinic => "clinic",
        BusinessType::Retail => "retail store",
        BusinessType::Other => "business",
    };

    let mut prompt = format!(
        "You are the assistant for {client_name}, a {vertical}. \
         Answer the customer using only the knowledge below. \
         If the knowledge does not cover the question, say so briefly.\n"
    );

    if chunks.is_empty() {
        prompt.push_str("\nKnowledge: (none on file)\n");
    } else {
        prompt.push_str("\nKnowledge:\n");
        for chunk in chunks {
            prompt.push_str("- ");
            prompt.push_str(chunk.content.trim());
            prompt.push('\n');
        }
    }

    prompt.push_str("\nCustomer: ");
    prompt.push_str(message.trim());
    prompt.push_str("\nAssistant:");
    prompt
}

/// Compose a reply straight from retrieved chunks — used when the model is
/// disabled or unreachable. The visitor always gets an answer.
pub fn compose_fallback_reply(client_name: &str, chunks: &[RankedChunk]) -> String {
    if chunks.is_empty() {
        return format!(
            "Thanks for reaching out to {client_name}! I couldn't find an answer \
             to that in our records. Please leave your contact details and the \
             team will get back to you."
        );
    }

    let mut reply = String::from("Here's what I found:\n");
    for chunk in chunks {
        reply.push_str("• ");
        reply.push_str(chunk.content.trim());
        reply.push('\n');
    }
    reply.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk(content: &str) -> RankedChunk {
        RankedChunk {
            document_id: Uuid::now_v7(),
            seq: 0,
            content: content.to_string(),
            rank: 0.5,
        }
    }

    #[tokio::test]
    async fn disabled_client_generates_nothing() {
        let client = CompletionClient::disabled();
        assert!(!client.is_enabled());
        let reply = client.generate("hello").await.unwrap();
        assert!(reply.is_none());
    }

    #[test]
    fn empty_url_config_disables_the_client() {
        let cfg = ChatConfig {
            model_url: String::new(),
            model_api_key: String::new(),
            request_timeout_secs: 5,
        };
        assert!(!CompletionClient::from_config(&cfg).is_enabled());
    }

    #[test]
    fn inference_response_shape_parses() {
        let body = r#"[{"generated_text": "We open at 9am."}]"#;
        let parsed: Vec<GeneratedText> = serde_json::from_str(body).unwrap();
        assert_eq!(parsed[0].generated_text, "We open at 9am.");
    }

    #[test]
    fn prompt_carries_identity_knowledge_and_message() {
        let chunks = vec![chunk("Open 9am-5pm weekdays."), chunk("Closed Sundays.")];
        let prompt = build_prompt("Trattoria Roma", BusinessType::Restaurant, &chunks, "When are you open?");
        assert!(prompt.contains("Trattoria Roma"));
        assert!(prompt.contains("restaurant"));
        assert!(prompt.contains("Open 9am-5pm weekdays."));
        assert!(prompt.contains("Closed Sundays."));
        assert!(prompt.contains("When are you open?"));
        assert!(prompt.ends_with("Assistant:"));
    }

    #[test]
    fn prompt_without_knowledge_says_so() {
        let prompt = build_prompt("FitHub", BusinessType::Gym, &[], "Do you have a pool?");
        assert!(prompt.contains("(none on file)"));
    }

    #[test]
    fn fallback_reply_lists_chunks() {
        let chunks = vec![chunk("Classes run hourly from 7am.")];
        let reply = compose_fallback_reply("FitHub", &chunks);
        assert!(reply.contains("Classes run hourly from 7am."));
    }

    #[test]
    fn fallback_reply_without_chunks_offers_follow_up() {
        let reply = compose_fallback_reply("FitHub", &[]);
        assert!(reply.contains("FitHub"));
        assert!(reply.contains("get back to you"));
    }
}
