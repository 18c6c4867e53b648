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

//! Committee, hearing, bill and member listing tools.
//!
//! Each tool fetches one upstream listing and renders it as a bulleted
//! plain-text summary. The renderers are kept separate from the executors
//! so they can be tested against canned envelopes without any upstream.

use crate::client::{BillQuery, CommitteeQuery, HearingQuery, MemberQuery};
use crate::error::CongressResult;
use crate::models::{
    Bill, BillsResponse, CommitteesResponse, HearingsResponse, MembersResponse,
};
use crate::protocol::CallToolResult;
use crate::tools::types::{
    parse_args, BillDetailsArgs, BillsArgs, CommitteeHearingsArgs, CommitteesArgs, HearingsArgs,
    MembersArgs,
};
use crate::tools::ToolContext;
use serde_json::Value as JsonValue;
use std::fmt::Write;

/// Execute get_committees tool.
pub async fn execute_get_committees(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: CommitteesArgs = parse_args(args)?;
    let data = ctx
        .client
        .get_committees(CommitteeQuery {
            congress: args.congress,
            chamber: args.chamber,
            limit: Some(args.limit),
            offset: None,
        })
        .await?;

    Ok(CallToolResult::text(render_committees(&data)))
}

/// Execute get_committee_hearings tool.
pub async fn execute_get_committee_hearings(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: CommitteeHearingsArgs = parse_args(args)?;
    let data = ctx
        .client
        .get_hearings(HearingQuery {
            congress: args.congress,
            chamber: args.chamber,
            committee: args.committee,
            limit: Some(args.limit),
            offset: None,
        })
        .await?;

    Ok(CallToolResult::text(render_committee_hearings(&data)))
}

/// Execute get_hearings tool.
pub async fn execute_get_hearings(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: HearingsArgs = parse_args(args)?;
    let data = ctx
        .client
        .get_hearings(HearingQuery {
            congress: args.congress,
            chamber: args.chamber,
            committee: None,
            limit: Some(args.limit),
            offset: None,
        })
        .await?;

    Ok(CallToolResult::text(render_hearings(&data)))
}

/// Execute get_bills tool.
pub async fn execute_get_bills(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: BillsArgs = parse_args(args)?;
    let data = ctx
        .client
        .get_bills(BillQuery {
            congress: args.congress,
            bill_type: args.bill_type,
            limit: Some(args.limit),
            offset: None,
        })
        .await?;

    Ok(CallToolResult::text(render_bills(&data)))
}

/// Execute get_bill_details tool.
pub async fn execute_get_bill_details(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: BillDetailsArgs = parse_args(args)?;
    let data = ctx
        .client
        .get_bill_details(args.congress, &args.bill_type, args.bill_number)
        .await?;

    let bill = data.bill.unwrap_or_default();
    Ok(CallToolResult::text(render_bill_details(
        &args.bill_type,
        args.bill_number,
        &bill,
    )))
}

/// Execute get_members tool.
pub async fn execute_get_members(
    args: Option<JsonValue>,
    ctx: &ToolContext,
) -> CongressResult<CallToolResult> {
    let args: MembersArgs = parse_args(args)?;
    let data = ctx
        .client
        .get_members(MemberQuery {
            congress: args.congress,
            chamber: args.chamber,
            state: args.state,
            limit: Some(args.limit),
            offset: None,
        })
        .await?;

    Ok(CallToolResult::text(render_members(&data)))
}

// ============ Renderers ============

pub(crate) fn render_committees(data: &CommitteesResponse) -> String {
    let mut out = format!("Found {} committees:\n\n", data.committees.len());
    for committee in &data.committees {
        let _ = writeln!(
            out,
            "\u{2022} {} ({})",
            committee.display_name(),
            committee.chamber_display()
        );
        let _ = writeln!(
            out,
            "  System Code: {}\n",
            committee.system_code.as_deref().unwrap_or("Unknown")
        );
    }
    out
}

pub(crate) fn render_committee_hearings(data: &HearingsResponse) -> String {
    let mut out = format!("Found {} hearings:\n\n", data.hearings.len());
    for hearing in &data.hearings {
        let _ = writeln!(out, "\u{2022} {}", hearing.display_title());
        let _ = writeln!(out, "  Date: {}", hearing.date_display());
        let _ = writeln!(out, "  Chamber: {}\n", hearing.chamber_display());
    }
    out
}

pub(crate) fn render_hearings(data: &HearingsResponse) -> String {
    let mut out = format!("Found {} hearings:\n\n", data.hearings.len());
    for hearing in &data.hearings {
        let _ = writeln!(out, "\u{2022} {}", hearing.display_title());
        let _ = writeln!(out, "  Date: {}", hearing.date_display());
        let _ = writeln!(out, "  Committee: {}\n", hearing.committee_name());
    }
    out
}

pub(crate) fn render_bills(data: &BillsResponse) -> String {
    let mut out = format!("Found {} bills:\n\n", data.bills.len());
    for bill in &data.bills {
        let _ = writeln!(out, "\u{2022} {}: {}", bill.identifier(), bill.display_title());
        let _ = writeln!(out, "  Latest Action: {}\n", bill.latest_action_text());
    }
    out
}

fn render_bill_details(bill_type: &str, bill_number: u32, bill: &Bill) -> String {
    let mut out = format!("Bill Details: {} {}\n\n", bill_type, bill_number);
    let _ = writeln!(out, "Title: {}", bill.display_title());
    let _ = writeln!(out, "Sponsor: {}", bill.sponsor_name());
    let _ = writeln!(out, "Latest Action: {}", bill.latest_action_text());
    out
}

pub(crate) fn render_members(data: &MembersResponse) -> String {
    let mut out = format!("Found {} members:\n\n", data.members.len());
    for member in &data.members {
        let party = member.party.as_deref().unwrap_or("Unknown");
        let state = member.state.as_deref().unwrap_or("Unknown");
        let district = match member.district {
            Some(d) => d.to_string(),
            None => "At Large".to_string(),
        };
        let _ = writeln!(out, "\u{2022} {} ({})", member.display_name(), party);
        let _ = writeln!(out, "  State: {}, District: {}\n", state, district);
    }
    out
}
