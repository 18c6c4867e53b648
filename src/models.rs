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

//! Typed views over Congress.gov API responses.
//!
//! The upstream schema evolves without notice, so every model is permissive:
//! all fields are optional, structs tolerate missing keys, and unrecognized
//! keys are preserved in a flattened `extra` map instead of failing the
//! deserialize. Only the fields the tools and search layer actually read get
//! typed accessors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

const UNKNOWN: &str = "Unknown";

fn chamber_label(raw: Option<&str>) -> String {
    match raw.map(|c| c.to_lowercase()).as_deref() {
        Some("house") => "House".to_string(),
        Some("senate") => "Senate".to_string(),
        Some("joint") => "Joint".to_string(),
        _ => raw.unwrap_or(UNKNOWN).to_string(),
    }
}

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pagination {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Most recent recorded action on a bill.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LatestAction {
    pub action_date: Option<String>,
    pub text: Option<String>,
    pub url: Option<String>,
}

/// Committee reference as embedded in hearings, bills, and parent links.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitteeRef {
    pub name: Option<String>,
    pub system_code: Option<String>,
    pub url: Option<String>,
}

/// Congressional committee or subcommittee.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Committee {
    pub name: Option<String>,
    pub chamber: Option<String>,
    pub system_code: Option<String>,
    pub committee_type_code: Option<String>,
    pub parent: Option<CommitteeRef>,
    pub subcommittees: Vec<CommitteeRef>,
    pub is_current: Option<bool>,
    pub update_date: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Committee {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn chamber_display(&self) -> String {
        chamber_label(self.chamber.as_deref())
    }
}

/// Committee hearing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hearing {
    pub title: Option<String>,
    pub chamber: Option<String>,
    pub congress: Option<i64>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub committee: Option<CommitteeRef>,
    pub update_date: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Hearing {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn chamber_display(&self) -> String {
        chamber_label(self.chamber.as_deref())
    }

    pub fn committee_name(&self) -> &str {
        self.committee
            .as_ref()
            .and_then(|c| c.name.as_deref())
            .unwrap_or(UNKNOWN)
    }

    pub fn date_display(&self) -> &str {
        self.date.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Bill numbers arrive as strings on some endpoints and integers on others.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BillNumber {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for BillNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillNumber::Numeric(n) => write!(f, "{}", n),
            BillNumber::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Sponsor entry on a bill detail record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillSponsor {
    pub bioguide_id: Option<String>,
    pub full_name: Option<String>,
    pub party: Option<String>,
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Bill or resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bill {
    #[serde(rename = "type")]
    pub bill_type: Option<String>,
    pub number: Option<BillNumber>,
    pub title: Option<String>,
    pub congress: Option<i64>,
    pub origin_chamber: Option<String>,
    pub introduced_date: Option<String>,
    pub latest_action: Option<LatestAction>,
    pub sponsors: Vec<BillSponsor>,
    pub update_date: Option<String>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Bill {
    /// Short identifier like `HR 3076`, or `Unknown` when the wire data
    /// lacks either part.
    pub fn identifier(&self) -> String {
        match (&self.bill_type, &self.number) {
            (Some(t), Some(n)) => format!("{} {}", t, n),
            _ => UNKNOWN.to_string(),
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn latest_action_text(&self) -> &str {
        self.latest_action
            .as_ref()
            .and_then(|a| a.text.as_deref())
            .unwrap_or(UNKNOWN)
    }

    /// Full name of the primary sponsor, when the detail record carries one.
    pub fn sponsor_name(&self) -> &str {
        self.sponsors
            .first()
            .and_then(|s| s.full_name.as_deref())
            .unwrap_or(UNKNOWN)
    }
}

/// Member of Congress.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Member {
    pub bioguide_id: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    // The list endpoint labels party affiliation `partyName`.
    #[serde(alias = "partyName")]
    pub party: Option<String>,
    pub state: Option<String>,
    pub district: Option<i64>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Member {
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            _ => UNKNOWN.to_string(),
        }
    }
}

/// List envelope for `/committee`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommitteesResponse {
    pub committees: Vec<Committee>,
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// List envelope for `/hearing`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HearingsResponse {
    pub hearings: Vec<Hearing>,
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// List envelope for `/bill`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillsResponse {
    pub bills: Vec<Bill>,
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// List envelope for `/member`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MembersResponse {
    pub members: Vec<Member>,
    pub pagination: Option<Pagination>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Detail envelope for `/bill/{congress}/{type}/{number}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillDetailResponse {
    pub bill: Option<Bill>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}
