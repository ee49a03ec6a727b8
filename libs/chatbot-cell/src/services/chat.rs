use std::time::Duration;

use tracing::{debug, warn};

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{
    ChatRequest, ChatResponse, Content, GenerateRequest, GenerateResponse, Part,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Prepended to every user message before it reaches the model.
const SYSTEM_PROMPT: &str = "You are a helpful medical assistant for a telemedicine platform. \
Provide general health information and guidance. Always remind users that your answers are not \
a diagnosis and that they should consult a doctor for medical concerns. Do not prescribe \
medication. If a question is not health related, politely decline to answer.";

const FORMAT_HINT: &str =
    "Answer concisely in plain text, using short paragraphs or simple bullet points.";

pub struct ChatService<'a> {
    state: &'a AppState,
    client: reqwest::Client,
}

impl<'a> ChatService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            client: reqwest::Client::new(),
        }
    }

    /// Forward a user message to the upstream generate endpoint and return
    /// the first candidate's text.
    pub async fn ask(&self, request: ChatRequest) -> Result<ChatResponse, AppError> {
        if !self.state.config.is_chat_configured() {
            return Err(AppError::Internal("chat provider is not configured".to_string()));
        }
        if request.message.trim().is_empty() {
            return Err(AppError::Validation("message must not be empty".to_string()));
        }

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: format!("{SYSTEM_PROMPT}\n\nUser question: {}\n\n{FORMAT_HINT}", request.message),
                }],
            }],
        };

        let response = self
            .client
            .post(self.state.config.chat_api_url.as_str())
            .query(&[("key", &self.state.config.chat_api_key)])
            .timeout(REQUEST_TIMEOUT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("chat provider unreachable: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!("chat provider returned {}", status);
            return Err(AppError::Upstream(format!(
                "chat provider returned {status}"
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("unreadable chat provider response: {e}")))?;

        if let Some(feedback) = &generated.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                debug!("chat prompt blocked: {}", reason);
                return Err(AppError::Validation(format!(
                    "message was rejected by the provider: {reason}"
                )));
            }
        }

        let reply = generated
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .next()
            .ok_or_else(|| AppError::Upstream("chat provider returned no candidates".to_string()))?;

        Ok(ChatResponse { reply })
    }
}
