use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Url};

use crate::client_logger::{ClientLogger, StderrLogger};
use crate::error::{Error, Result};
use crate::observability::{
    CLIENT_MALFORMED_RESPONSES, CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS,
};
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, Credential, GenerationParameters, Model, Reply,
};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/";
const COMPLETIONS_PATH: &str = "chat/completions";

/// The fixed system instruction sent ahead of every user message.
pub const SYSTEM_PROMPT: &str = "tell a joke everytime";

/// One stateless completion round trip.
///
/// Implementations receive the credential and parameters explicitly so that
/// a request never observes settings changed after it was issued.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Sends `message` and returns the reply.
    ///
    /// A response without a usable choice is `Ok(Reply::Malformed { .. })`.
    /// `Err` is reserved for requests that never produced a response body.
    async fn complete(
        &self,
        message: &str,
        credential: &Credential,
        params: &GenerationParameters,
    ) -> Result<Reply>;
}

/// Client for an OpenAI-compatible chat-completion endpoint.
#[derive(Clone)]
pub struct OpenAi {
    client: ReqwestClient,
    endpoint: Url,
    timeout: Option<Duration>,
    model: Model,
    system_prompt: String,
    logger: Arc<dyn ClientLogger>,
}

impl OpenAi {
    /// Create a new client for the public endpoint with no request timeout.
    pub fn new() -> Result<Self> {
        Self::with_options(None, None)
    }

    /// Create a new client with a custom base URL and optional timeout.
    ///
    /// The base URL is the API root; `chat/completions` is appended to it.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = completions_endpoint(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

        Ok(Self {
            client,
            endpoint,
            timeout,
            model: Model::default(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            logger: Arc::new(StderrLogger),
        })
    }

    /// Replaces the diagnostic logger.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Targets a different model.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Replaces the system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// The URL requests are posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The model requests target.
    pub fn model(&self) -> &Model {
        &self.model
    }

    fn request_headers(credential: &Credential) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let bearer = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| {
                Error::validation(
                    "credential contains characters that cannot be sent in a header",
                    Some("credential".to_string()),
                )
            })?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                self.timeout.map(|t| t.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    fn fail(&self, err: Error) -> Error {
        CLIENT_REQUEST_ERRORS.click();
        self.logger.log_transport_error(&err);
        err
    }
}

impl fmt::Debug for OpenAi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAi")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Completion for OpenAi {
    async fn complete(
        &self,
        message: &str,
        credential: &Credential,
        params: &GenerationParameters,
    ) -> Result<Reply> {
        let request =
            ChatCompletionRequest::new(self.model.clone(), &self.system_prompt, message, params);
        let headers = Self::request_headers(credential)?;

        self.logger.log_request(&request);
        CLIENT_REQUESTS.click();
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.fail(self.transport_error(e)))?;

        let status = response.status().as_u16();
        let raw = response.text().await.map_err(|e| {
            self.fail(Error::http_client(
                format!("Failed to read response: {}", e),
                Some(Box::new(e)),
            ))
        })?;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());

        let reply = parse_reply(status, raw);
        match &reply {
            Reply::Text(text) => self.logger.log_reply(status, text),
            Reply::Malformed { status, raw } => {
                CLIENT_MALFORMED_RESPONSES.click();
                self.logger.log_malformed_response(*status, raw);
            }
        }
        Ok(reply)
    }
}

/// Interprets a response body regardless of its HTTP status.
///
/// The first choice's content, trimmed, is the reply. Anything else,
/// including a body that is not JSON, is malformed.
pub fn parse_reply(status: u16, raw: String) -> Reply {
    let text = serde_json::from_str::<ChatCompletionResponse>(&raw)
        .ok()
        .and_then(|response| response.first_content().map(|s| s.trim().to_string()));
    match text {
        Some(text) => Reply::Text(text),
        None => Reply::Malformed { status, raw },
    }
}

fn completions_endpoint(base_url: &str) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(COMPLETIONS_PATH)?)
}
