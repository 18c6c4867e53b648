// Congress MCP - Model Context Protocol server for the Congress.gov API
//
// Copyright (c) 2025 the congress-mcp contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Search tools over the cross-entity search engine.
//!
//! `search_all` and `search_by_topic` expose the full aggregator;
//! `search_bills` and `search_hearings` are the same search pinned to a
//! single category.

use crate::error::CongressResult;
use crate::protocol::CallToolResult;
use crate::search::{ItemType, SearchResult};
use crate::tools::types::{parse_args, SearchAllArgs, SearchArgs, TopicSearchArgs};
use crate::tools::ToolContext;
use serde_json::Value as JsonValue;
use std::fmt::Write;

/// Execute search_all tool.
pub async fn execute_search_all(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: SearchAllArgs = parse_args(args)?;
    let results = ctx
        .search
        .search_all(&args.query, args.limit, &args.include_types)
        .await;

    Ok(CallToolResult::text(render_query_results(
        &args.query,
        &results,
    )))
}

/// Execute search_by_topic tool.
pub async fn execute_search_by_topic(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: TopicSearchArgs = parse_args(args)?;
    let results = ctx
        .search
        .search_by_topic(&args.topic, args.limit, &args.item_types)
        .await;

    if results.is_empty() {
        return Ok(CallToolResult::text(format!(
            "No results found for topic '{}'",
            args.topic
        )));
    }

    let mut out = format!(
        "Topic Search Results for '{}' ({} found):\n\n",
        args.topic,
        results.len()
    );
    render_result_items(&mut out, &results);
    Ok(CallToolResult::text(out))
}

/// Execute search_bills tool.
pub async fn execute_search_bills(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    execute_single_type_search(args, ctx, ItemType::Bill).await
}

/// Execute search_hearings tool.
pub async fn execute_search_hearings(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    execute_single_type_search(args, ctx, ItemType::Hearing).await
}

async fn execute_single_type_search(
    args: Option<JsonValue>,
    ctx: &ToolContext,
    item_type: ItemType,
) -> CongressResult<CallToolResult> {
    let args: SearchArgs = parse_args(args)?;
    let results = ctx
        .search
        .search_all(&args.query, args.limit, &[item_type])
        .await;

    Ok(CallToolResult::text(render_query_results(
        &args.query,
        &results,
    )))
}

fn render_query_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for '{}'", query);
    }

    let mut out = format!(
        "Search Results for '{}' ({} found):\n\n",
        query,
        results.len()
    );
    render_result_items(&mut out, results);
    out
}

fn render_result_items(out: &mut String, results: &[SearchResult]) {
    for item in results {
        let _ = writeln!(out, "\u{2022} {} ({})", item.title, item.item_type);
        let _ = writeln!(out, "  {}", item.description);
        if let Some(chamber) = &item.chamber {
            let _ = writeln!(out, "  Chamber: {}", chamber);
        }
        let _ = writeln!(out, "  Relevance: {:.1}\n", item.relevance_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bill, BillsResponse, Hearing, HearingsResponse, LatestAction};
    use crate::tools::test_support::{context_with_stub, StubApi};
    use serde_json::json;

    fn result(title: &str, item_type: ItemType, score: f64) -> SearchResult {
        SearchResult {
            item_type,
            title: title.to_string(),
            description: "desc".to_string(),
            url: None,
            date: None,
            chamber: None,
            congress: None,
            relevance_score: score,
        }
    }

    #[test]
    fn test_render_query_results_empty() {
        assert_eq!(
            render_query_results("nothing", &[]),
            "No results found for 'nothing'"
        );
    }

    #[test]
    fn test_render_query_results_includes_scores() {
        let results = vec![result("Water Act", ItemType::Bill, 2.5)];
        let text = render_query_results("water", &results);
        assert!(text.starts_with("Search Results for 'water' (1 found):\n\n"));
        assert!(text.contains("\u{2022} Water Act (bill)"));
        assert!(text.contains("  Relevance: 2.5"));
    }

    #[test]
    fn test_render_result_items_chamber_only_when_present() {
        let mut with_chamber = result("A", ItemType::Hearing, 1.0);
        with_chamber.chamber = Some("House".to_string());
        let without = result("B", ItemType::Bill, 1.0);

        let mut out = String::new();
        render_result_items(&mut out, &[with_chamber, without]);

        assert_eq!(out.matches("Chamber:").count(), 1);
    }

    fn stub_with_matches() -> StubApi {
        let mut stub = StubApi::default();
        stub.bills = BillsResponse {
            bills: vec![Bill {
                bill_type: Some("HR".to_string()),
                number: Some(crate::models::BillNumber::Numeric(1)),
                title: Some("Clean Water Act Amendments".to_string()),
                latest_action: Some(LatestAction {
                    text: Some("Referred to committee.".to_string()),
                    ..Default::default()
                }),
                ..Bill::default()
            }],
            ..BillsResponse::default()
        };
        stub.hearings = HearingsResponse {
            hearings: vec![Hearing {
                title: Some("Water Infrastructure Oversight".to_string()),
                ..Hearing::default()
            }],
            ..HearingsResponse::default()
        };
        stub
    }

    #[tokio::test]
    async fn test_execute_search_all_merges_categories() {
        let ctx = context_with_stub(stub_with_matches());
        let result = execute_search_all(Some(json!({"query": "water", "limit": 10})), &ctx)
            .await
            .expect("search should succeed");

        let text = result.first_text().expect("text content");
        assert!(text.contains("Clean Water Act Amendments"));
        assert!(text.contains("Water Infrastructure Oversight"));
    }

    #[tokio::test]
    async fn test_execute_search_bills_is_single_category() {
        let ctx = context_with_stub(stub_with_matches());
        let result = execute_search_bills(Some(json!({"query": "water"})), &ctx)
            .await
            .expect("search should succeed");

        let text = result.first_text().expect("text content");
        assert!(text.contains("Clean Water Act Amendments"));
        assert!(!text.contains("Water Infrastructure Oversight"));
    }

    #[tokio::test]
    async fn test_execute_search_all_requires_query() {
        let ctx = context_with_stub(StubApi::default());
        let result = execute_search_all(Some(json!({"limit": 5})), &ctx).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_execute_search_by_topic_no_results() {
        let ctx = context_with_stub(StubApi::default());
        let result = execute_search_by_topic(Some(json!({"topic": "healthcare"})), &ctx)
            .await
            .expect("topic search should succeed");

        assert_eq!(
            result.first_text(),
            Some("No results found for topic 'healthcare'")
        );
    }
}
