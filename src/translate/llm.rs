//! OpenAI-compatible chat-completion client

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Translator;
use crate::config::LlmSettings;
use crate::error::{Error, Result, TranslationError};
use crate::utils::truncate_display;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_p: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct LlmClient {
    settings: LlmSettings,
    client: reqwest::blocking::Client,
}

impl LlmClient {
    pub fn new(settings: LlmSettings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn build_user_prompt(&self, text: &str, context: Option<&str>) -> String {
        let message = match context {
            Some(ctx) if !ctx.is_empty() => format!("{}\n{}", ctx, text),
            _ => text.to_string(),
        };
        format!("{}{}", self.settings.user_prompt_prefix, message)
    }
}

impl Translator for LlmClient {
    fn translate(
        &self,
        text: &str,
        context: Option<&str>,
    ) -> std::result::Result<String, TranslationError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let request = ChatRequest {
            model: &self.settings.model,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: self.settings.system_prompt.clone(),
                },
                Message {
                    role: "user".to_string(),
                    content: self.build_user_prompt(text, context),
                },
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            top_p: self.settings.top_p,
            top_k: self.settings.top_k,
            min_p: self.settings.min_p,
        };

        let mut req = self.client.post(&self.settings.api_url).json(&request);

        if !self.settings.api_key.is_empty() {
            req = req.header("Authorization", format!("Bearer {}", self.settings.api_key));
        }

        let response = req.send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body: truncate_display(&body, 300),
            });
        }

        let body = response.text()?;
        let result: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            TranslationError::MalformedResponse(format!(
                "{} in {}",
                e,
                truncate_display(&body, 200)
            ))
        })?;

        if let Some(model) = &result.model {
            tracing::debug!("Completion served by model {}", model);
        }

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .ok_or_else(|| {
                TranslationError::MalformedResponse(
                    "missing choices[0].message.content".to_string(),
                )
            })?;

        if content.is_empty() {
            return Err(TranslationError::MalformedResponse(
                "completion content is empty".to_string(),
            ));
        }

        Ok(content)
    }
}
