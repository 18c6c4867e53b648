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

//! Congress tools for the MCP server.
//!
//! Available tools:
//! - `get_committees`: List congressional committees
//! - `get_committee_hearings`: List hearings, optionally filtered by committee
//! - `get_hearings`: List congressional hearings
//! - `get_bills`: List bills and resolutions
//! - `get_bill_details`: Fetch one bill with sponsor and latest action
//! - `get_members`: List members of Congress
//! - `search_all`: Relevance-ranked search across all entity types
//! - `search_by_topic`: Topic search with synonym expansion
//! - `search_bills`: Bill-only search
//! - `search_hearings`: Hearing-only search
//! - `get_congress_info`: Current congress number and session years
//! - `get_rate_limit_status`: Outbound API quota usage
//! - `get_health_status`: Component health report
//! - `get_system_metrics`: Uptime, quota and cache counters
//! - `clear_cache`: Drop all cached API responses

mod entities;
#[macro_use]
mod schema;
mod search;
mod status;
mod types;

// Re-export public APIs
pub use entities::{
    execute_get_bill_details, execute_get_bills, execute_get_committee_hearings,
    execute_get_committees, execute_get_hearings, execute_get_members,
};
pub use search::{
    execute_search_all, execute_search_bills, execute_search_by_topic, execute_search_hearings,
};
pub use status::{
    execute_clear_cache, execute_get_congress_info, execute_get_health_status,
    execute_get_rate_limit_status, execute_get_system_metrics,
};
pub use types::parse_args;

// Renderers shared with the resource reads.
pub(crate) use entities::{render_bills, render_committees, render_hearings, render_members};
pub(crate) use status::{render_congress_info, render_rate_limit_status};

use crate::cache::CacheManager;
use crate::client::CongressApi;
use crate::error::{CongressError, CongressResult};
use crate::health::HealthChecker;
use crate::protocol::{CallToolResult, Tool};
use crate::rate_limit::RateLimiter;
use crate::search::SearchEngine;
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Shared components every tool execution runs against.
pub struct ToolContext {
    pub client: Arc<dyn CongressApi>,
    pub search: SearchEngine,
    pub cache: Arc<CacheManager>,
    pub rate_limiter: Arc<RateLimiter>,
    pub health: Arc<HealthChecker>,
}

impl ToolContext {
    pub fn new(
        client: Arc<dyn CongressApi>,
        cache: Arc<CacheManager>,
        rate_limiter: Arc<RateLimiter>,
        health: Arc<HealthChecker>,
    ) -> Self {
        let search = SearchEngine::new(Arc::clone(&client));
        Self {
            client,
            search,
            cache,
            rate_limiter,
            health,
        }
    }
}

/// Get all available Congress tools.
pub fn get_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "get_committees".to_string(),
            description: "Get list of congressional committees".to_string(),
            input_schema: tool_schema! {
                properties: {
                    congress: congress_arg!("Congress number (e.g., 118 for current)"),
                    chamber: chamber_arg!(),
                    limit: limit_arg!(default: 20)
                }
            },
        },
        Tool {
            name: "get_committee_hearings".to_string(),
            description: "Get hearings for committees".to_string(),
            input_schema: tool_schema! {
                properties: {
                    congress: congress_arg!(),
                    chamber: chamber_arg!(),
                    committee: schema_string!("Committee system code (e.g., 'hsif00')"),
                    limit: limit_arg!(default: 10)
                }
            },
        },
        Tool {
            name: "get_hearings".to_string(),
            description: "Get congressional hearings".to_string(),
            input_schema: tool_schema! {
                properties: {
                    congress: congress_arg!(),
                    chamber: chamber_arg!(),
                    limit: limit_arg!(default: 10)
                }
            },
        },
        Tool {
            name: "get_bills".to_string(),
            description: "Get congressional bills and resolutions".to_string(),
            input_schema: tool_schema! {
                properties: {
                    congress: congress_arg!(),
                    bill_type: bill_type_arg!(),
                    limit: limit_arg!(default: 10)
                }
            },
        },
        Tool {
            name: "get_bill_details".to_string(),
            description: "Get detailed information about a specific bill".to_string(),
            input_schema: tool_schema! {
                required: ["congress", "bill_type", "bill_number"],
                properties: {
                    congress: congress_arg!(),
                    bill_type: bill_type_arg!(),
                    bill_number: schema_integer!("Bill number", minimum: 1)
                }
            },
        },
        Tool {
            name: "get_members".to_string(),
            description: "Get congressional members".to_string(),
            input_schema: tool_schema! {
                properties: {
                    congress: congress_arg!(),
                    chamber: chamber_arg!(["house", "senate"]),
                    state: schema_string!(
                        "State abbreviation (e.g., 'CA', 'NY')",
                        pattern: "^[A-Z]{2}$"
                    ),
                    limit: limit_arg!(default: 10)
                }
            },
        },
        Tool {
            name: "search_all".to_string(),
            description:
                "Search across all Congress data types (bills, hearings, committees, members)"
                    .to_string(),
            input_schema: tool_schema! {
                required: ["query"],
                properties: {
                    query: query_arg!(),
                    limit: limit_arg!(default: 20, maximum: 50),
                    include_types: item_types_arg!(
                        default: ["bill", "hearing", "committee", "member"]
                    )
                }
            },
        },
        Tool {
            name: "search_by_topic".to_string(),
            description:
                "Search for congressional items by topic (healthcare, economy, defense, etc.)"
                    .to_string(),
            input_schema: tool_schema! {
                required: ["topic"],
                properties: {
                    topic: topic_arg!(),
                    item_types: item_types_arg!(default: ["bill", "hearing"]),
                    limit: limit_arg!(default: 20, maximum: 50)
                }
            },
        },
        Tool {
            name: "search_bills".to_string(),
            description: "Search bills by title or content".to_string(),
            input_schema: tool_schema! {
                required: ["query"],
                properties: {
                    query: query_arg!(),
                    limit: limit_arg!(default: 10, maximum: 50)
                }
            },
        },
        Tool {
            name: "search_hearings".to_string(),
            description: "Search hearings by title or content".to_string(),
            input_schema: tool_schema! {
                required: ["query"],
                properties: {
                    query: query_arg!(),
                    limit: limit_arg!(default: 10, maximum: 50)
                }
            },
        },
        Tool {
            name: "get_congress_info".to_string(),
            description: "Get information about current Congress".to_string(),
            input_schema: tool_schema!(),
        },
        Tool {
            name: "get_rate_limit_status".to_string(),
            description: "Get current API rate limit status".to_string(),
            input_schema: tool_schema!(),
        },
        Tool {
            name: "get_health_status".to_string(),
            description: "Get comprehensive system health status".to_string(),
            input_schema: tool_schema! {
                properties: {
                    force_refresh: schema_bool!(
                        "Force refresh of cached health status",
                        default: false
                    )
                }
            },
        },
        Tool {
            name: "get_system_metrics".to_string(),
            description: "Get system performance metrics and uptime".to_string(),
            input_schema: tool_schema!(),
        },
        Tool {
            name: "clear_cache".to_string(),
            description: "Clear all cached API responses".to_string(),
            input_schema: tool_schema!(),
        },
    ]
}

/// Execute a tool by name.
pub async fn execute_tool(
    name: &str,
    arguments: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    match name {
        "get_committees" => execute_get_committees(arguments, ctx).await,
        "get_committee_hearings" => execute_get_committee_hearings(arguments, ctx).await,
        "get_hearings" => execute_get_hearings(arguments, ctx).await,
        "get_bills" => execute_get_bills(arguments, ctx).await,
        "get_bill_details" => execute_get_bill_details(arguments, ctx).await,
        "get_members" => execute_get_members(arguments, ctx).await,
        "search_all" => execute_search_all(arguments, ctx).await,
        "search_by_topic" => execute_search_by_topic(arguments, ctx).await,
        "search_bills" => execute_search_bills(arguments, ctx).await,
        "search_hearings" => execute_search_hearings(arguments, ctx).await,
        "get_congress_info" => execute_get_congress_info(ctx).await,
        "get_rate_limit_status" => execute_get_rate_limit_status(ctx).await,
        "get_health_status" => execute_get_health_status(arguments, ctx).await,
        "get_system_metrics" => execute_get_system_metrics(ctx).await,
        "clear_cache" => execute_clear_cache(ctx).await,
        _ => Err(CongressError::ToolNotFound(name.to_string())),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::ToolContext;
    use crate::cache::{CacheManager, MemoryCache};
    use crate::client::{
        BillQuery, CommitteeQuery, CongressApi, HearingQuery, MemberQuery,
    };
    use crate::config::Settings;
    use crate::error::CongressResult;
    use crate::health::HealthChecker;
    use crate::models::{
        BillDetailResponse, BillsResponse, CommitteesResponse, HearingsResponse, MembersResponse,
    };
    use crate::rate_limit::RateLimiter;
    use async_trait::async_trait;
    use std::sync::Arc;

    /// Canned-response upstream for exercising tools without a network.
    #[derive(Default)]
    pub struct StubApi {
        pub committees: CommitteesResponse,
        pub hearings: HearingsResponse,
        pub bills: BillsResponse,
        pub bill_detail: BillDetailResponse,
        pub members: MembersResponse,
    }

    #[async_trait]
    impl CongressApi for StubApi {
        async fn get_committees(
            &self,
            _query: CommitteeQuery,
        ) -> CongressResult<CommitteesResponse> {
            Ok(self.committees.clone())
        }

        async fn get_hearings(&self, _query: HearingQuery) -> CongressResult<HearingsResponse> {
            Ok(self.hearings.clone())
        }

        async fn get_bills(&self, _query: BillQuery) -> CongressResult<BillsResponse> {
            Ok(self.bills.clone())
        }

        async fn get_bill_details(
            &self,
            _congress: u32,
            _bill_type: &str,
            _bill_number: u32,
        ) -> CongressResult<BillDetailResponse> {
            Ok(self.bill_detail.clone())
        }

        async fn get_members(&self, _query: MemberQuery) -> CongressResult<MembersResponse> {
            Ok(self.members.clone())
        }

        fn current_congress(&self) -> u32 {
            118
        }
    }

    /// Build a full tool context around a stub upstream, memory cache and
    /// fresh rate limiter.
    pub fn context_with_stub(stub: StubApi) -> ToolContext {
        let settings = Settings::default();
        let client: Arc<dyn CongressApi> = Arc::new(stub);
        let cache = Arc::new(CacheManager::new(
            Box::new(MemoryCache::new()),
            settings.cache_ttl.clone(),
        ));
        let rate_limiter = Arc::new(RateLimiter::new(
            settings.rate_limit.requests_per_minute,
            settings.rate_limit.requests_per_hour,
        ));
        let health = Arc::new(HealthChecker::new(
            settings,
            Arc::clone(&client),
            Arc::clone(&cache),
            Arc::clone(&rate_limiter),
        ));
        ToolContext::new(client, cache, rate_limiter, health)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{context_with_stub, StubApi};
    use super::*;

    #[test]
    fn test_get_tools_returns_all_tools() {
        let tools = get_tools();
        assert_eq!(tools.len(), 15);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_str()).collect();
        // Entity listings
        assert!(names.contains(&"get_committees"));
        assert!(names.contains(&"get_committee_hearings"));
        assert!(names.contains(&"get_hearings"));
        assert!(names.contains(&"get_bills"));
        assert!(names.contains(&"get_bill_details"));
        assert!(names.contains(&"get_members"));
        // Search
        assert!(names.contains(&"search_all"));
        assert!(names.contains(&"search_by_topic"));
        assert!(names.contains(&"search_bills"));
        assert!(names.contains(&"search_hearings"));
        // Operational
        assert!(names.contains(&"get_congress_info"));
        assert!(names.contains(&"get_rate_limit_status"));
        assert!(names.contains(&"get_health_status"));
        assert!(names.contains(&"get_system_metrics"));
        assert!(names.contains(&"clear_cache"));
    }

    #[test]
    fn test_tool_descriptions_not_empty() {
        let tools = get_tools();
        for tool in &tools {
            assert!(
                !tool.description.is_empty(),
                "Tool {} has empty description",
                tool.name
            );
        }
    }

    #[test]
    fn test_tool_schemas_valid() {
        let tools = get_tools();
        for tool in &tools {
            assert_eq!(
                tool.input_schema["type"], "object",
                "Tool {} missing object type",
                tool.name
            );
            assert!(
                tool.input_schema["properties"].is_object(),
                "Tool {} missing properties",
                tool.name
            );
            assert_eq!(
                tool.input_schema["additionalProperties"], false,
                "Tool {} accepts unknown arguments",
                tool.name
            );
        }
    }

    #[test]
    fn test_required_fields_exist_in_properties() {
        let tools = get_tools();
        for tool in &tools {
            let Some(required) = tool.input_schema.get("required") else {
                continue;
            };
            let properties = tool.input_schema["properties"].as_object().unwrap();
            for field in required.as_array().unwrap() {
                let field = field.as_str().unwrap();
                assert!(
                    properties.contains_key(field),
                    "Tool {} requires undeclared field {}",
                    tool.name,
                    field
                );
            }
        }
    }

    #[test]
    fn test_search_tools_cap_limit_at_fifty() {
        let tools = get_tools();
        for name in ["search_all", "search_by_topic", "search_bills", "search_hearings"] {
            let tool = tools.iter().find(|t| t.name == name).unwrap();
            assert_eq!(
                tool.input_schema["properties"]["limit"]["maximum"], 50,
                "{} limit maximum",
                name
            );
        }
    }

    #[tokio::test]
    async fn test_execute_tool_unknown_name() {
        let ctx = context_with_stub(StubApi::default());
        let result = execute_tool("no_such_tool", None, &ctx).await;
        assert!(matches!(result, Err(CongressError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_execute_tool_routes_by_name() {
        let ctx = context_with_stub(StubApi::default());
        let result = execute_tool("get_congress_info", None, &ctx)
            .await
            .expect("routing should reach the executor");
        assert!(result
            .first_text()
            .expect("text content")
            .contains("Congress Number: 118"));
    }
}
