use crate::config::settings::GeminiSettings;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{AnipeError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const KEY_CHECK_PROMPT: &str = "Say 'Hello from Gemini!' in exactly 3 words.";

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
    #[serde(default)]
    status: String,
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        if settings.api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not found, using fallback content");
        }

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnipeError::GeneratorUnavailable)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!("Sending {} char prompt to {}", prompt.len(), self.model);
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&raw)
                .map(|e| format!("{} {}", e.error.status, e.error.message).trim().to_string())
                .unwrap_or(raw);
            return Err(AnipeError::GeneratorError {
                message: format!("{}: {}", status, message),
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&raw)?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| {
                c.parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| AnipeError::GeneratorError {
                message: "Response contained no candidates".to_string(),
            })?;

        Ok(text)
    }
}

/// Stand-in used when no API key is configured at all.
#[derive(Debug, Clone, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    fn is_configured(&self) -> bool {
        false
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(AnipeError::GeneratorUnavailable)
    }
}

/// 去除模型回覆外層的 ``` 或 ```json 區塊標記
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T> {
    Ok(serde_json::from_str(strip_code_fences(text))?)
}

/// Sends `prompt` and decodes the reply as JSON. Unconfigured generators fail
/// without making a request.
pub async fn generate_json<T: DeserializeOwned>(
    generator: &dyn TextGenerator,
    prompt: &str,
) -> Result<T> {
    if !generator.is_configured() {
        return Err(AnipeError::GeneratorUnavailable);
    }
    let reply = generator.generate(prompt).await?;
    parse_json_reply(&reply)
}

/// Gemini API keys share a fixed prefix; this only checks the format.
pub fn has_valid_key_format(api_key: &str) -> bool {
    api_key.starts_with("AIzaSy")
}

/// The configured key, or `MissingConfigError` naming `GEMINI_API_KEY`.
pub fn required_api_key(settings: &GeminiSettings) -> Result<&str> {
    validate_required_field("GEMINI_API_KEY", &settings.api_key).map(String::as_str)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::sync::Mutex;

    /// Scripted generator for the service tests.
    pub(crate) struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String>>>,
        pub(crate) prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub(crate) fn replying(replies: Vec<&str>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().map(|r| Ok(r.to_string())).collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                replies: Mutex::new(vec![Err(AnipeError::GeneratorError {
                    message: "quota exceeded".to_string(),
                })]),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(AnipeError::GeneratorError {
                    message: "no scripted reply left".to_string(),
                }))
        }
    }

    fn settings(base_url: String, api_key: Option<&str>) -> GeminiSettings {
        GeminiSettings {
            api_key: api_key.map(str::to_string),
            model: "gemini-1.5-flash".to_string(),
            base_url,
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_generate_joins_candidate_parts() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-flash:generateContent")
                .query_param("key", "AIzaSy-test")
                .json_body_partial(r#"{"contents":[{"parts":[{"text":"Hello?"}]}]}"#);
            then.status(200).json_body(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "Hello "}, {"text": "from Gemini!"}], "role": "model"},
                    "finishReason": "STOP"
                }]
            }));
        });

        let client = GeminiClient::new(&settings(server.base_url(), Some("AIzaSy-test"))).unwrap();
        let text = client.generate("Hello?").await.unwrap();

        api_mock.assert();
        assert_eq!(text, "Hello from Gemini!");
    }

    #[tokio::test]
    async fn test_generate_surfaces_api_error_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(400).json_body(serde_json::json!({
                "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
            }));
        });

        let client = GeminiClient::new(&settings(server.base_url(), Some("bad"))).unwrap();
        let err = client.generate("anything").await.unwrap_err();

        match err {
            AnipeError::GeneratorError { message } => {
                assert!(message.contains("API key not valid."));
                assert!(message.contains("INVALID_ARGUMENT"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_generate_without_candidates_fails() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(200).json_body(serde_json::json!({"candidates": []}));
        });

        let client = GeminiClient::new(&settings(server.base_url(), Some("AIzaSy-test"))).unwrap();
        assert!(matches!(
            client.generate("anything").await,
            Err(AnipeError::GeneratorError { .. })
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_client_makes_no_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST);
            then.status(200);
        });

        let client = GeminiClient::new(&settings(server.base_url(), None)).unwrap();
        assert!(!client.is_configured());
        let result: Result<serde_json::Value> = generate_json(&client, "prompt").await;

        assert!(matches!(result, Err(AnipeError::GeneratorUnavailable)));
        api_mock.assert_hits(0);
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_parse_json_reply() {
        let value: serde_json::Value = parse_json_reply("```json\n{\"twitter\": \"hi\"}\n```").unwrap();
        assert_eq!(value["twitter"], "hi");
        assert!(parse_json_reply::<serde_json::Value>("not json").is_err());
    }

    #[test]
    fn test_key_format() {
        assert!(has_valid_key_format("AIzaSyExample"));
        assert!(!has_valid_key_format("sk-example"));
    }

    #[test]
    fn test_required_api_key() {
        let err = required_api_key(&GeminiSettings::default()).unwrap_err();
        assert!(matches!(err, AnipeError::MissingConfigError { ref field } if field == "GEMINI_API_KEY"));

        let configured = GeminiSettings {
            api_key: Some("AIzaSy-local".to_string()),
            ..GeminiSettings::default()
        };
        assert_eq!(required_api_key(&configured).unwrap(), "AIzaSy-local");
    }
}
