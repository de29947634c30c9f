// Copyright 2026 Talking Agents Contributors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Google Programmable Search tool.
//!
//! Direct HTTP tool (no MCP server) used by the research agent when the
//! Brave search server is unavailable, and registered standalone so search
//! works even in a degraded startup.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::ToolError;
use crate::tools::registry::ToolHandler;
use crate::types::{InputSchema, ToolDefinition};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// Default public search engine id used when none is configured.
pub const DEFAULT_ENGINE_ID: &str = "017576662512468239146:omuauf_lfve";

/// Maximum results the API allows per request.
const MAX_RESULTS: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Web search backed by the Google Custom Search JSON API.
pub struct GoogleSearchHandler {
    client: reqwest::Client,
    api_key: String,
    engine_id: String,
}

impl GoogleSearchHandler {
    /// Create a search handler.
    pub fn new(api_key: impl Into<String>, engine_id: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            engine_id: engine_id.unwrap_or_else(|| DEFAULT_ENGINE_ID.to_string()),
        }
    }

    async fn search(&self, query: &str, num: u32) -> Result<String, ToolError> {
        let num = num.clamp(1, MAX_RESULTS);
        debug!(query = %query, num, "google search");

        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("search request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::ExecutionFailed(format!(
                "search API returned {status}: {body}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("invalid search response: {e}")))?;

        Ok(format_results(query, &parsed.items))
    }
}

fn format_results(query: &str, items: &[SearchItem]) -> String {
    if items.is_empty() {
        return format!("No results found for '{query}'.");
    }

    let mut out = format!("Search results for '{query}':\n");
    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {}\n   {}\n   {}\n",
            i + 1,
            item.title,
            item.link,
            item.snippet
        ));
    }
    out
}

#[async_trait]
impl ToolHandler for GoogleSearchHandler {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "google_search",
            "Search the web with Google. Returns titles, links, and snippets.",
        )
        .with_schema(
            InputSchema::new()
                .with_property(
                    "query",
                    serde_json::json!({"type": "string", "description": "Search query"}),
                )
                .with_property(
                    "num_results",
                    serde_json::json!({
                        "type": "integer",
                        "description": "Number of results (1-10, default 5)"
                    }),
                )
                .with_required(vec!["query".to_string()]),
        )
    }

    async fn execute(&self, input: serde_json::Value) -> Result<String, ToolError> {
        let query = input
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::MissingParameter("query".to_string()))?;

        let num = input
            .get("num_results")
            .and_then(|v| v.as_u64())
            .unwrap_or(5) as u32;

        self.search(query, num).await
    }
}
