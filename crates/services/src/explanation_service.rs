use std::env;
use std::fmt::Write as _;

use async_trait::async_trait;
use quiz_core::model::Question;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ExplainError;

/// Produces a teaching explanation for a question.
#[async_trait]
pub trait Explainer: Send + Sync {
    /// # Errors
    ///
    /// Returns `ExplainError` when no provider is configured or the call fails.
    async fn explain(&self, question: &Question) -> Result<String, ExplainError>;
}

#[derive(Clone, Debug)]
pub struct ExplainConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl ExplainConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("QUIZ_AI_API_KEY").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url =
            env::var("QUIZ_AI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = env::var("QUIZ_AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Explanations from an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ExplanationService {
    client: Client,
    config: ExplainConfig,
}

impl ExplanationService {
    /// Returns `None` when `QUIZ_AI_API_KEY` is unset or blank.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        ExplainConfig::from_env().map(Self::new)
    }

    #[must_use]
    pub fn new(config: ExplainConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    #[must_use]
    pub fn build_prompt(question: &Question) -> String {
        let mut prompt = String::from(
            "You are an experienced teacher of modern Chinese history. \
             Explain the following quiz question for a student.\n\n",
        );
        let _ = writeln!(prompt, "Question: {}", question.prompt());
        prompt.push_str("Options:\n");
        for option in question.options() {
            let _ = writeln!(prompt, "{}. {}", option.key(), option.text());
        }
        let answer = question
            .correct_keys()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(prompt, "Correct answer: {answer}");
        prompt.push_str(
            "\nAnswer in three parts:\n\
             1. **Key concept**: one sentence naming the historical point being tested.\n\
             2. **Explanation**: why the correct answer is correct, with the background, \
             causes or significance of the events involved.\n\
             3. **Common mistakes**: briefly why the distractors are wrong, if any are tempting.\n\n\
             Keep the tone lively and easy to remember.",
        );
        prompt
    }
}

#[async_trait]
impl Explainer for ExplanationService {
    async fn explain(&self, question: &Question) -> Result<String, ExplainError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: Self::build_prompt(question),
            }],
            temperature: 0.3,
        };

        debug!(question = %question.id(), model = %self.config.model, "requesting explanation");
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplainError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ExplainError::EmptyResponse)?;

        Ok(content.trim().to_string())
    }
}

/// Fetch an explanation, degrading every failure to a readable placeholder.
pub async fn explain_or_placeholder(explainer: Option<&dyn Explainer>, question: &Question) -> String {
    let result = match explainer {
        Some(explainer) => explainer.explain(question).await,
        None => Err(ExplainError::NotConfigured),
    };
    result.unwrap_or_else(|err| {
        warn!(question = %question.id(), error = %err, "explanation unavailable");
        err.placeholder().to_string()
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
