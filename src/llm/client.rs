use super::error::{RemoteError, RemoteResult};
use super::prompts::{ASSISTANT_SYSTEM, EMPTY_REPLY_FALLBACK};
use super::retry::{AttemptOutcome, RetryPolicy, RetryState};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Google Generative Language API
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Waits out backoff delays. Swapped for a recorder in tests.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Everything the caller needs to reach the endpoint
#[derive(Debug, Clone)]
pub struct RemoteSettings {
    pub api_key: Option<String>,
    pub api_base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
        }
    }
}

/// One prompt plus the system instruction it is sent with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub prompt: String,
    pub system_instruction: String,
}

impl RemoteRequest {
    /// Falls back to the assistant persona when no instruction is given
    pub fn new(prompt: impl Into<String>, system_instruction: Option<&str>) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: system_instruction.unwrap_or(ASSISTANT_SYSTEM).to_string(),
        }
    }

    fn payload(&self) -> GenerateRequest<'_> {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: &self.prompt }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: &self.system_instruction,
                }],
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if non-empty
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.is_empty())
    }
}

/// Sends prompts to the model endpoint, retrying transient failures
pub struct RemoteCaller {
    client: reqwest::Client,
    settings: RemoteSettings,
    sleeper: Arc<dyn Sleeper>,
}

impl RemoteCaller {
    pub fn new(settings: RemoteSettings) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| RemoteError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            settings,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn settings(&self) -> &RemoteSettings {
        &self.settings
    }

    fn endpoint(&self) -> Result<Url, RemoteError> {
        let api_key = self.settings.api_key.as_deref().ok_or_else(|| {
            RemoteError::Configuration(
                "No API key configured. Run 'planzo --setup' to get started.".to_string(),
            )
        })?;

        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base_url.trim_end_matches('/'),
            self.settings.model
        );
        let mut url = Url::parse(&raw)
            .map_err(|e| RemoteError::Configuration(format!("Invalid API URL '{}': {}", raw, e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    /// Send `prompt` with the given (or default) system instruction
    pub async fn call(&self, prompt: &str, system_instruction: Option<&str>) -> RemoteResult {
        self.call_request(&RemoteRequest::new(prompt, system_instruction))
            .await
    }

    pub async fn call_request(&self, request: &RemoteRequest) -> RemoteResult {
        let url = self.endpoint()?;
        let payload = request.payload();
        let policy = &self.settings.retry;
        let mut state = RetryState::start();

        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    debug!(
                        attempt = attempt,
                        max_attempts = policy.max_attempts,
                        model = %self.settings.model,
                        "Sending prompt"
                    );
                    let outcome = self.attempt(&url, &payload).await;
                    if let AttemptOutcome::Status(code) = &outcome {
                        warn!(attempt = attempt, status = code, "Remote call rejected");
                    } else if let AttemptOutcome::Network(detail) = &outcome {
                        warn!(attempt = attempt, error = %detail, "Fetch attempt failed");
                    }
                    RetryState::Attempting { attempt }.on_outcome(outcome, policy)
                }
                RetryState::Waiting {
                    next_attempt,
                    delay,
                } => {
                    debug!(
                        next_attempt = next_attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Backing off before retry"
                    );
                    self.sleeper.sleep(delay).await;
                    RetryState::Waiting {
                        next_attempt,
                        delay,
                    }
                    .resume()
                }
                RetryState::Succeeded { text, attempts } => {
                    if attempts > 1 {
                        debug!(attempts = attempts, "Remote call succeeded after retry");
                    }
                    return Ok(text);
                }
                RetryState::Failed {
                    attempts,
                    last_error,
                } => {
                    warn!(
                        attempts = attempts,
                        error = %last_error,
                        "Remote call failed after all retries"
                    );
                    return Err(RemoteError::ExhaustedRetries {
                        attempts,
                        last_error,
                    });
                }
            };
        }
    }

    async fn attempt(&self, url: &Url, payload: &GenerateRequest<'_>) -> AttemptOutcome {
        let response = match self
            .client
            .post(url.clone())
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return AttemptOutcome::Network(e.without_url().to_string()),
        };

        let status = response.status();
        if !status.is_success() {
            return AttemptOutcome::Status(status.as_u16());
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return AttemptOutcome::Network(e.without_url().to_string()),
        };

        match serde_json::from_str::<GenerateResponse>(&body) {
            Ok(parsed) => AttemptOutcome::Success(
                parsed
                    .first_text()
                    .unwrap_or_else(|| EMPTY_REPLY_FALLBACK.to_string()),
            ),
            Err(e) => AttemptOutcome::Network(format!("Failed to parse response: {}", e)),
        }
    }
}
