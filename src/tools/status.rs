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

//! Operational tools: congress info, rate limits, health, metrics, cache
//! administration.

use crate::cache::CacheStats;
use crate::error::CongressResult;
use crate::health::{format_uptime, SystemHealth};
use crate::protocol::CallToolResult;
use crate::rate_limit::WindowStatus;
use crate::tools::types::{parse_args, HealthStatusArgs};
use crate::tools::ToolContext;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

/// Execute get_congress_info tool.
pub async fn execute_get_congress_info(ctx: &ToolContext) -> CongressResult<CallToolResult> {
    let congress = ctx.client.current_congress();
    Ok(CallToolResult::text(render_congress_info(congress)))
}

/// Execute get_rate_limit_status tool.
pub async fn execute_get_rate_limit_status(ctx: &ToolContext) -> CongressResult<CallToolResult> {
    let status = ctx.rate_limiter.status().await;
    Ok(CallToolResult::text(render_rate_limit_status(&status)))
}

/// Execute get_health_status tool.
pub async fn execute_get_health_status(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: HealthStatusArgs = parse_args(args)?;
    let health = ctx.health.check_health(args.force_refresh).await;
    Ok(CallToolResult::text(render_health(&health)))
}

/// Execute get_system_metrics tool.
pub async fn execute_get_system_metrics(ctx: &ToolContext) -> CongressResult<CallToolResult> {
    let uptime = ctx.health.uptime_formatted();
    let rate_status = ctx.rate_limiter.status().await;
    let cache_stats = ctx.cache.stats();
    Ok(CallToolResult::text(render_metrics(
        &uptime,
        &rate_status,
        &cache_stats,
    )))
}

/// Execute clear_cache tool.
pub async fn execute_clear_cache(ctx: &ToolContext) -> CongressResult<CallToolResult> {
    ctx.cache.clear().await?;
    Ok(CallToolResult::text("Cache cleared"))
}

// ============ Renderers ============

pub(crate) fn render_congress_info(congress: u32) -> String {
    let first_year = 2023 + (i64::from(congress) - 118) * 2;
    let mut out = String::from("Current Congress Information:\n\n");
    let _ = writeln!(out, "Congress Number: {}", congress);
    let _ = writeln!(out, "Years: {}-{}", first_year, first_year + 1);
    out
}

pub(crate) fn render_rate_limit_status(status: &BTreeMap<String, WindowStatus>) -> String {
    let mut out = String::from("Rate Limit Status:\n\n");
    for (window, info) in status {
        let _ = writeln!(out, "{} Window:", title_case(window));
        let _ = writeln!(out, "  Used: {}/{}", info.used, info.limit);
        let _ = writeln!(out, "  Remaining: {}", info.remaining);
        let _ = writeln!(out, "  Reset in: {} seconds\n", info.reset_in_secs);
    }
    out
}

fn render_health(health: &SystemHealth) -> String {
    let mut out = format!("System Health: {}\n\n", health.status.as_str());
    let uptime = Duration::from_secs_f64(health.uptime_seconds.max(0.0));
    let _ = writeln!(out, "Uptime: {}", format_uptime(uptime));
    let _ = writeln!(out, "Checked: {}\n", health.timestamp.to_rfc3339());

    for check in &health.checks {
        let _ = writeln!(out, "\u{2022} {}: {}", check.name, check.status.as_str());
        let _ = writeln!(out, "  {}", check.message);
    }
    out
}

fn render_metrics(
    uptime: &str,
    rate_status: &BTreeMap<String, WindowStatus>,
    cache_stats: &CacheStats,
) -> String {
    let mut out = String::from("System Metrics:\n\n");
    let _ = writeln!(out, "Uptime: {}\n", uptime);

    let _ = writeln!(out, "Rate Limits:");
    for (window, info) in rate_status {
        let _ = writeln!(
            out,
            "  {} Window: {}/{} used, resets in {} seconds",
            title_case(window),
            info.used,
            info.limit,
            info.reset_in_secs
        );
    }

    let _ = writeln!(out, "\nCache:");
    let _ = writeln!(out, "  Hits: {}", cache_stats.hits);
    let _ = writeln!(out, "  Misses: {}", cache_stats.misses);
    let _ = writeln!(out, "  Stores: {}", cache_stats.stores);
    let _ = writeln!(out, "  Errors: {}", cache_stats.errors);
    let _ = writeln!(out, "  Hit Rate: {:.1}%", cache_stats.hit_rate_percent());
    out
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
