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

//! Shared types for MCP tools.
//!
//! Each tool deserializes its JSON arguments into one of these structs.
//! Defaults here mirror the advertised input schemas, so a client that
//! omits an optional field gets the documented behavior.

use crate::error::{CongressError, CongressResult};
use crate::search::ItemType;
use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Parse JSON arguments into a typed structure.
///
/// Absent arguments are treated as an empty object so tools with all-default
/// parameters accept a bare call.
pub fn parse_args<T: for<'de> Deserialize<'de>>(args: Option<JsonValue>) -> CongressResult<T> {
    let args = args.unwrap_or(JsonValue::Object(serde_json::Map::new()));
    serde_json::from_value(args).map_err(|e| CongressError::InvalidArguments(e.to_string()))
}

// ============ Argument Structures ============

#[derive(Debug, Deserialize)]
pub struct CommitteesArgs {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    #[serde(default = "default_committee_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct CommitteeHearingsArgs {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    /// Committee system code such as `hsif00`.
    pub committee: Option<String>,
    #[serde(default = "default_listing_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct HearingsArgs {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    #[serde(default = "default_listing_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct BillsArgs {
    pub congress: Option<u32>,
    pub bill_type: Option<String>,
    #[serde(default = "default_listing_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct BillDetailsArgs {
    pub congress: u32,
    pub bill_type: String,
    pub bill_number: u32,
}

#[derive(Debug, Deserialize)]
pub struct MembersArgs {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    pub state: Option<String>,
    #[serde(default = "default_listing_limit")]
    pub limit: u32,
}

/// Arguments for the single-type search tools (`search_bills`,
/// `search_hearings`).
#[derive(Debug, Deserialize)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct SearchAllArgs {
    pub query: String,
    #[serde(default = "default_aggregate_limit")]
    pub limit: usize,
    #[serde(default = "default_include_types")]
    pub include_types: Vec<ItemType>,
}

#[derive(Debug, Deserialize)]
pub struct TopicSearchArgs {
    pub topic: String,
    #[serde(default = "default_topic_types")]
    pub item_types: Vec<ItemType>,
    #[serde(default = "default_aggregate_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct HealthStatusArgs {
    #[serde(default)]
    pub force_refresh: bool,
}

// ============ Default Value Functions ============

pub fn default_committee_limit() -> u32 {
    20
}

pub fn default_listing_limit() -> u32 {
    10
}

pub fn default_search_limit() -> usize {
    10
}

pub fn default_aggregate_limit() -> usize {
    20
}

pub fn default_include_types() -> Vec<ItemType> {
    ItemType::ALL.to_vec()
}

/// Topic search defaults to bills and hearings; committees and members
/// rarely match topic vocabulary and would dilute the scoring.
pub fn default_topic_types() -> Vec<ItemType> {
    vec![ItemType::Bill, ItemType::Hearing]
}
