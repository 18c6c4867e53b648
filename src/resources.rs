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

//! MCP resources: pre-baked read-only views over common listings.
//!
//! Resource URIs use a `congress://` scheme with a `type/entry` path, for
//! example `congress://committees/house`. Reads render the same plain-text
//! listings the corresponding tools produce, with fixed pagination.

use crate::client::{BillQuery, CommitteeQuery, MemberQuery};
use crate::error::{CongressError, CongressResult};
use crate::protocol::Resource;
use crate::tools::{
    render_bills, render_committees, render_congress_info, render_hearings, render_members,
    render_rate_limit_status, ToolContext,
};

const SCHEME: &str = "congress://";
const MIME_TEXT: &str = "text/plain";

/// Rows fetched for each listing resource.
const RESOURCE_LIMIT: u32 = 20;

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    Resource {
        uri: uri.to_string(),
        name: name.to_string(),
        description: Some(description.to_string()),
        mime_type: Some(MIME_TEXT.to_string()),
    }
}

/// Get all available resources.
pub fn get_resources() -> Vec<Resource> {
    vec![
        resource(
            "congress://committees/current",
            "Current Congress Committees",
            "List of all committees in the current Congress",
        ),
        resource(
            "congress://committees/house",
            "House Committees",
            "List of House committees in the current Congress",
        ),
        resource(
            "congress://committees/senate",
            "Senate Committees",
            "List of Senate committees in the current Congress",
        ),
        resource(
            "congress://committees/joint",
            "Joint Committees",
            "List of joint committees in the current Congress",
        ),
        resource(
            "congress://hearings/recent",
            "Recent Hearings",
            "Recent congressional hearings across all committees",
        ),
        resource(
            "congress://bills/recent",
            "Recent Bills",
            "Recently introduced bills and resolutions",
        ),
        resource(
            "congress://bills/house",
            "House Bills",
            "Recent House bills and resolutions",
        ),
        resource(
            "congress://bills/senate",
            "Senate Bills",
            "Recent Senate bills and resolutions",
        ),
        resource(
            "congress://members/house",
            "House Members",
            "Current House of Representatives members",
        ),
        resource(
            "congress://members/senate",
            "Senate Members",
            "Current Senate members",
        ),
        resource(
            "congress://status/api",
            "API Status",
            "Current API rate limits and status",
        ),
        resource(
            "congress://status/congress",
            "Congress Information",
            "Information about the current Congress",
        ),
    ]
}

/// Read a resource by URI, rendering it as plain text.
pub async fn read_resource(uri: &str, ctx: &ToolContext) -> CongressResult<String> {
    let path = uri.strip_prefix(SCHEME).ok_or_else(|| {
        CongressError::ResourceNotFound(format!("Invalid resource URI scheme: {}", uri))
    })?;

    let (category, entry) = match path.split_once('/') {
        Some((category, entry)) => (category, entry),
        None => (path, ""),
    };

    match category {
        "committees" => read_committees(entry, ctx).await,
        "hearings" => read_hearings(entry, ctx).await,
        "bills" => read_bills(entry, ctx).await,
        "members" => read_members(entry, ctx).await,
        "status" => read_status(entry, ctx).await,
        other => Err(CongressError::ResourceNotFound(format!(
            "Unknown resource type: {}",
            other
        ))),
    }
}

async fn read_committees(entry: &str, ctx: &ToolContext) -> CongressResult<String> {
    let chamber = match entry {
        "current" => None,
        "house" | "senate" | "joint" => Some(entry.to_string()),
        other => {
            return Err(CongressError::ResourceNotFound(format!(
                "Unknown committees resource: {}",
                other
            )))
        }
    };

    let data = ctx
        .client
        .get_committees(CommitteeQuery {
            congress: Some(ctx.client.current_congress()),
            chamber,
            limit: Some(RESOURCE_LIMIT),
            offset: None,
        })
        .await?;
    Ok(render_committees(&data))
}

async fn read_hearings(entry: &str, ctx: &ToolContext) -> CongressResult<String> {
    if entry != "recent" {
        return Err(CongressError::ResourceNotFound(format!(
            "Unknown hearings resource: {}",
            entry
        )));
    }

    let data = ctx.client.recent_hearings(RESOURCE_LIMIT).await?;
    Ok(render_hearings(&data))
}

async fn read_bills(entry: &str, ctx: &ToolContext) -> CongressResult<String> {
    // Chamber-specific listings map to the chamber's primary bill type.
    let bill_type = match entry {
        "recent" => None,
        "house" => Some("hr".to_string()),
        "senate" => Some("s".to_string()),
        other => {
            return Err(CongressError::ResourceNotFound(format!(
                "Unknown bills resource: {}",
                other
            )))
        }
    };

    let data = ctx
        .client
        .get_bills(BillQuery {
            congress: Some(ctx.client.current_congress()),
            bill_type,
            limit: Some(RESOURCE_LIMIT),
            offset: None,
        })
        .await?;
    Ok(render_bills(&data))
}

async fn read_members(entry: &str, ctx: &ToolContext) -> CongressResult<String> {
    let chamber = match entry {
        "house" | "senate" => entry.to_string(),
        other => {
            return Err(CongressError::ResourceNotFound(format!(
                "Unknown members resource: {}",
                other
            )))
        }
    };

    let data = ctx
        .client
        .get_members(MemberQuery {
            congress: Some(ctx.client.current_congress()),
            chamber: Some(chamber),
            state: None,
            limit: Some(RESOURCE_LIMIT),
            offset: None,
        })
        .await?;
    Ok(render_members(&data))
}

async fn read_status(entry: &str, ctx: &ToolContext) -> CongressResult<String> {
    match entry {
        "api" => {
            let status = ctx.rate_limiter.status().await;
            let mut out = String::from("Congress API Status:\n\n");
            out.push_str(&render_rate_limit_status(&status));
            let stats = ctx.cache.stats();
            out.push_str(&format!(
                "Cache: {} hits, {} misses ({:.1}% hit rate)\n",
                stats.hits,
                stats.misses,
                stats.hit_rate_percent()
            ));
            Ok(out)
        }
        "congress" => Ok(render_congress_info(ctx.client.current_congress())),
        other => Err(CongressError::ResourceNotFound(format!(
            "Unknown status resource: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Committee, CommitteesResponse};
    use crate::tools::test_support::{context_with_stub, StubApi};
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_unique_uris() {
        let resources = get_resources();
        assert_eq!(resources.len(), 12);

        let uris: HashSet<_> = resources.iter().map(|r| r.uri.as_str()).collect();
        assert_eq!(uris.len(), resources.len());
        for resource in &resources {
            assert!(resource.uri.starts_with("congress://"), "{}", resource.uri);
            assert!(resource.description.is_some());
            assert_eq!(resource.mime_type.as_deref(), Some("text/plain"));
        }
    }

    #[tokio::test]
    async fn test_read_rejects_foreign_scheme() {
        let ctx = context_with_stub(StubApi::default());
        let result = read_resource("file:///etc/passwd", &ctx).await;
        let err = result.expect_err("foreign scheme must be rejected");
        assert!(err.to_string().contains("Invalid resource URI scheme"));
    }

    #[tokio::test]
    async fn test_read_rejects_unknown_type() {
        let ctx = context_with_stub(StubApi::default());
        let result = read_resource("congress://treaties/recent", &ctx).await;
        let err = result.expect_err("unknown type must be rejected");
        assert!(err.to_string().contains("Unknown resource type: treaties"));
    }

    #[tokio::test]
    async fn test_read_rejects_unknown_entry() {
        let ctx = context_with_stub(StubApi::default());
        let result = read_resource("congress://committees/bogus", &ctx).await;
        assert!(matches!(result, Err(CongressError::ResourceNotFound(_))));
    }

    #[tokio::test]
    async fn test_read_committee_listing() {
        let mut stub = StubApi::default();
        stub.committees = CommitteesResponse {
            committees: vec![Committee {
                name: Some("Appropriations".to_string()),
                chamber: Some("House".to_string()),
                system_code: Some("hsap00".to_string()),
                ..Committee::default()
            }],
            ..CommitteesResponse::default()
        };
        let ctx = context_with_stub(stub);

        let text = read_resource("congress://committees/house", &ctx)
            .await
            .expect("read should succeed");
        assert!(text.contains("Appropriations (House)"));
    }

    #[tokio::test]
    async fn test_read_status_congress() {
        let ctx = context_with_stub(StubApi::default());
        let text = read_resource("congress://status/congress", &ctx)
            .await
            .expect("read should succeed");
        assert!(text.contains("Congress Number: 118"));
    }

    #[tokio::test]
    async fn test_read_status_api_includes_cache_line() {
        let ctx = context_with_stub(StubApi::default());
        let text = read_resource("congress://status/api", &ctx)
            .await
            .expect("read should succeed");
        assert!(text.starts_with("Congress API Status:"));
        assert!(text.contains("hit rate"));
    }
}
