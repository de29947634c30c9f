// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Google Gemini provider using the generateContent REST API.
//!
//! Conversation messages map onto Gemini `contents` (role `user`/`model`),
//! tool calls onto `functionCall`/`functionResponse` parts, and registry
//! tool definitions onto `functionDeclarations`. Gemini does not assign
//! call ids, so the provider synthesizes `call-{n}` ids to correlate
//! results within a turn.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::error::ProviderError;
use crate::types::{
    ContentBlock, Message, MessageContent, Provider, ProviderResponse, Role, StopReason,
    TokenUsage, ToolCall, ToolDefinition,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Strip a `gemini/` routing prefix if present, so model names configured
/// for litellm-style routers work unchanged.
pub fn normalize_model(model: &str) -> &str {
    model.strip_prefix("gemini/").unwrap_or(model)
}

/// Provider for Google Gemini models.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    call_counter: AtomicU64,
}

impl GeminiProvider {
    /// Create a provider for the given model.
    pub fn new(api_key: impl Into<String>, model: &str) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create a provider with a custom API base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: &str,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: normalize_model(model).to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            call_counter: AtomicU64::new(0),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn next_call_id(&self) -> String {
        let n = self.call_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("call-{n}")
    }

    fn build_request(
        &self,
        system: Option<&str>,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Value {
        let contents: Vec<Value> = messages.iter().map(convert_message).collect();

        let mut request = json!({ "contents": contents });

        if let Some(system) = system {
            request["systemInstruction"] = json!({
                "parts": [{ "text": system }]
            });
        }

        if let Some(tools) = tools {
            if !tools.is_empty() {
                let declarations: Vec<Value> = tools
                    .iter()
                    .map(|t| {
                        json!({
                            "name": t.name,
                            "description": t.description,
                            "parameters": sanitize_schema(
                                serde_json::to_value(&t.input_schema)
                                    .unwrap_or_else(|_| json!({"type": "object"}))
                            )
                        })
                    })
                    .collect();
                request["tools"] = json!([{ "functionDeclarations": declarations }]);
            }
        }

        request
    }

    fn parse_response(&self, body: Value) -> Result<ProviderResponse, ProviderError> {
        let candidate = body
            .get("candidates")
            .and_then(|c| c.as_array())
            .and_then(|c| c.first())
            .ok_or_else(|| ProviderError::ParseError("no candidates in response".to_string()))?;

        let finish_reason = candidate
            .get("finishReason")
            .and_then(|v| v.as_str())
            .unwrap_or("STOP");

        let parts = candidate
            .get("content")
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.as_array())
            .cloned()
            .unwrap_or_default();

        let mut content = String::new();
        let mut tool_calls = Vec::new();

        for part in parts {
            if let Some(text) = part.get("text").and_then(|v| v.as_str()) {
                content.push_str(text);
            } else if let Some(call) = part.get("functionCall") {
                let name = call
                    .get("name")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| {
                        ProviderError::ParseError("functionCall without name".to_string())
                    })?
                    .to_string();
                tool_calls.push(ToolCall {
                    id: self.next_call_id(),
                    name,
                    input: call.get("args").cloned().unwrap_or(json!({})),
                });
            }
        }

        let stop_reason = if !tool_calls.is_empty() {
            StopReason::ToolUse
        } else if finish_reason == "MAX_TOKENS" {
            StopReason::MaxTokens
        } else {
            StopReason::EndTurn
        };

        let usage = body.get("usageMetadata").map(|u| TokenUsage {
            input_tokens: u
                .get("promptTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
            output_tokens: u
                .get("candidatesTokenCount")
                .and_then(|v| v.as_u64())
                .unwrap_or(0) as u32,
        });

        Ok(ProviderResponse {
            content,
            tool_calls,
            stop_reason,
            usage,
        })
    }
}

/// Convert a message into a Gemini content entry.
fn convert_message(message: &Message) -> Value {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "model",
    };

    let parts: Vec<Value> = match &message.content {
        MessageContent::Text(text) => vec![json!({ "text": text })],
        MessageContent::Blocks(blocks) => blocks.iter().map(convert_block).collect(),
    };

    json!({ "role": role, "parts": parts })
}

fn convert_block(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Text { text } => json!({ "text": text }),
        ContentBlock::ToolUse { name, input, .. } => json!({
            "functionCall": { "name": name, "args": input }
        }),
        ContentBlock::ToolResult {
            name,
            content,
            is_error,
            ..
        } => {
            let response = if *is_error {
                json!({ "error": content })
            } else {
                json!({ "result": content })
            };
            json!({
                "functionResponse": { "name": name, "response": response }
            })
        }
    }
}

/// Remove JSON Schema keywords the Gemini API rejects.
fn sanitize_schema(mut schema: Value) -> Value {
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("additionalProperties");
        for value in obj.values_mut() {
            *value = sanitize_schema(value.take());
        }
    } else if let Some(arr) = schema.as_array_mut() {
        for value in arr.iter_mut() {
            *value = sanitize_schema(value.take());
        }
    }
    schema
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn chat(
        &self,
        system: Option<&str>,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<ProviderResponse, ProviderError> {
        let request = self.build_request(system, messages, tools);
        debug!(messages = messages.len(), "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthError(message),
                404 => ProviderError::ModelNotFound(self.model.clone()),
                429 => ProviderError::RateLimited(message),
                code => ProviderError::api(message, code),
            });
        }

        let body: Value = response.json().await?;
        self.parse_response(body)
    }
}

fn extract_api_error(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InputSchema;

    #[test]
    fn test_normalize_model() {
        assert_eq!(normalize_model("gemini/gemini-1.5-flash"), "gemini-1.5-flash");
        assert_eq!(normalize_model("gemini-1.5-pro"), "gemini-1.5-pro");
    }

    #[test]
    fn test_endpoint() {
        let provider = GeminiProvider::new("key", "gemini/gemini-1.5-flash");
        assert_eq!(
            provider.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );

        let provider = GeminiProvider::with_base_url("key", "gemini-1.5-pro", "http://localhost:9999/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_build_request_with_system_and_tools() {
        let provider = GeminiProvider::new("key", "gemini-1.5-flash");
        let messages = vec![Message::user("hello")];
        let tools = vec![ToolDefinition::new("create_plan", "Create a plan").with_schema(
            InputSchema::new()
                .with_property("title", serde_json::json!({"type": "string"}))
                .with_required(vec!["title".to_string()]),
        )];

        let request = provider.build_request(Some("You coordinate agents."), &messages, Some(&tools));

        assert_eq!(
            request["systemInstruction"]["parts"][0]["text"],
            "You coordinate agents."
        );
        assert_eq!(request["contents"][0]["role"], "user");
        assert_eq!(
            request["tools"][0]["functionDeclarations"][0]["name"],
            "create_plan"
        );
    }

    #[test]
    fn test_convert_tool_blocks() {
        let message = Message::with_blocks(
            Role::Assistant,
            vec![ContentBlock::ToolUse {
                id: "call-1".to_string(),
                name: "read_file".to_string(),
                input: serde_json::json!({"path": "a.txt"}),
            }],
        );
        let converted = convert_message(&message);
        assert_eq!(converted["role"], "model");
        assert_eq!(converted["parts"][0]["functionCall"]["name"], "read_file");

        let message = Message::with_blocks(
            Role::User,
            vec![ContentBlock::ToolResult {
                tool_use_id: "call-1".to_string(),
                name: "read_file".to_string(),
                content: "file contents".to_string(),
                is_error: false,
            }],
        );
        let converted = convert_message(&message);
        assert_eq!(
            converted["parts"][0]["functionResponse"]["response"]["result"],
            "file contents"
        );
    }

    #[test]
    fn test_parse_text_response() {
        let provider = GeminiProvider::new("key", "gemini-1.5-flash");
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{"text": "Hello!"}], "role": "model" },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10, "candidatesTokenCount": 3 }
        });

        let response = provider.parse_response(body).unwrap();
        assert_eq!(response.content, "Hello!");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.unwrap().total(), 13);
    }

    #[test]
    fn test_parse_function_call_response() {
        let provider = GeminiProvider::new("key", "gemini-1.5-flash");
        let body = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "functionCall": {
                            "name": "create_plan",
                            "args": {"title": "Build the API"}
                        }
                    }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        });

        let response = provider.parse_response(body).unwrap();
        assert_eq!(response.stop_reason, StopReason::ToolUse);
        assert_eq!(response.tool_calls.len(), 1);
        assert_eq!(response.tool_calls[0].name, "create_plan");
        assert_eq!(response.tool_calls[0].id, "call-1");
        assert_eq!(response.tool_calls[0].input["title"], "Build the API");
    }

    #[test]
    fn test_call_ids_increment() {
        let provider = GeminiProvider::new("key", "gemini-1.5-flash");
        assert_eq!(provider.next_call_id(), "call-1");
        assert_eq!(provider.next_call_id(), "call-2");
    }

    #[test]
    fn test_parse_no_candidates() {
        let provider = GeminiProvider::new("key", "gemini-1.5-flash");
        let result = provider.parse_response(serde_json::json!({"candidates": []}));
        assert!(matches!(result, Err(ProviderError::ParseError(_))));
    }

    #[test]
    fn test_sanitize_schema() {
        let schema = serde_json::json!({
            "type": "object",
            "$schema": "http://json-schema.org/draft-07/schema#",
            "additionalProperties": false,
            "properties": {
                "nested": { "type": "object", "additionalProperties": false }
            }
        });
        let sanitized = sanitize_schema(schema);
        assert!(sanitized.get("$schema").is_none());
        assert!(sanitized.get("additionalProperties").is_none());
        assert!(sanitized["properties"]["nested"]
            .get("additionalProperties")
            .is_none());
    }

    #[test]
    fn test_extract_api_error() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert_eq!(extract_api_error(body).as_deref(), Some("API key not valid"));
        assert!(extract_api_error("not json").is_none());
    }
}
