//! LLM HTTP client

use crate::config::{LlmConfig, LlmProvider};
use crate::llm::{check_token_limit, LlmError, LlmResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a research assistant summarizing neurodegenerative disease datasets, publications and code.";

pub struct LlmClient {
    client: Client,
    config: LlmConfig,
    api_base_url: String,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::ConfigError(e.to_string()))?;

        let api_base_url = config.api_base_url.clone().unwrap_or_else(|| match config.provider {
            LlmProvider::Anthropic => "https://api.anthropic.com/v1".to_string(),
            LlmProvider::OpenAI => "https://api.openai.com/v1".to_string(),
            LlmProvider::Ollama => "http://localhost:11434".to_string(),
        });

        Ok(Self {
            client,
            config: config.clone(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn system_prompt(&self) -> String {
        self.config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
    }

    /// Send `prompt` and return the completion text.
    ///
    /// The prompt size is checked against `max_input_tokens` before any
    /// request is made. There is no retry.
    pub async fn complete(&self, prompt: &str) -> LlmResult<String> {
        let estimated = check_token_limit(prompt, self.config.max_input_tokens)?;
        debug!(provider = ?self.config.provider, model = %self.config.model, estimated, "Sending LLM request");

        let text = match self.config.provider {
            LlmProvider::Anthropic => self.anthropic_messages(prompt).await?,
            LlmProvider::OpenAI => self.openai_chat(prompt).await?,
            LlmProvider::Ollama => self.ollama_generate(prompt).await?,
        };

        info!(provider = ?self.config.provider, chars = text.len(), "LLM response received");
        Ok(text)
    }

    async fn anthropic_messages(&self, prompt: &str) -> LlmResult<String> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            max_tokens: u32,
            temperature: f32,
            system: String,
            messages: Vec<Message<'a>>,
        }

        #[derive(Deserialize)]
        struct Response {
            content: Vec<ContentBlock>,
        }

        #[derive(Deserialize)]
        struct ContentBlock {
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            text: String,
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| LlmError::ConfigError("Anthropic requires API key".to_string()))?;

        let url = format!("{}/messages", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&Request {
                model: &self.config.model,
                max_tokens: self.config.max_tokens,
                temperature: self.config.temperature,
                system: self.system_prompt(),
                messages: vec![Message { role: "user", content: prompt }],
            })
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!("Anthropic error {}: {}", status, body)));
        }

        let result: Response = resp.json().await.map_err(|e| LlmError::SerializationError(e.to_string()))?;
        Ok(result
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""))
    }

    async fn openai_chat(&self, prompt: &str) -> LlmResult<String> {
        #[derive(Serialize)]
        struct Message {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message>,
            temperature: f32,
            max_tokens: u32,
        }

        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: MessageContent,
        }

        #[derive(Deserialize)]
        struct MessageContent {
            content: String,
        }

        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| LlmError::ConfigError("OpenAI requires API key".to_string()))?;

        let url = format!("{}/chat/completions", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&Request {
                model: &self.config.model,
                messages: vec![
                    Message { role: "system".to_string(), content: self.system_prompt() },
                    Message { role: "user".to_string(), content: prompt.to_string() },
                ],
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            })
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LlmError::ApiError(format!("OpenAI error: {}", resp.status())));
        }

        let result: Response = resp.json().await.map_err(|e| LlmError::SerializationError(e.to_string()))?;
        Ok(result.choices.first().map(|c| c.message.content.clone()).unwrap_or_default())
    }

    async fn ollama_generate(&self, prompt: &str) -> LlmResult<String> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            prompt: &'a str,
            system: String,
            stream: bool,
        }

        #[derive(Deserialize)]
        struct Response {
            response: String,
        }

        let url = format!("{}/api/generate", self.api_base_url);
        let resp = self
            .client
            .post(&url)
            .json(&Request {
                model: &self.config.model,
                prompt,
                system: self.system_prompt(),
                stream: false,
            })
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LlmError::ApiError(format!("Ollama error: {}", resp.status())));
        }

        let result: Response = resp.json().await.map_err(|e| LlmError::SerializationError(e.to_string()))?;
        Ok(result.response)
    }
}
