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

//! Cross-entity search over Congress data.
//!
//! `search_all` fans out one concurrent category search per requested item
//! type, scores candidates by substring and word matching against their
//! title and a category-specific secondary field, then merges everything
//! into a single relevance-ordered list. A failed category is logged and
//! contributes zero results; it never fails the aggregate. Topic search
//! expands a small synonym vocabulary and deduplicates merged results by
//! exact title, first occurrence winning.

use crate::client::{BillQuery, CommitteeQuery, CongressApi, HearingQuery, MemberQuery};
use crate::error::CongressResult;
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

/// Searchable entity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Bill,
    Hearing,
    Committee,
    Member,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Bill,
        ItemType::Hearing,
        ItemType::Committee,
        ItemType::Member,
    ];

    /// Parse a category name; unknown names yield `None` and are skipped
    /// by callers rather than rejected.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "bill" => Some(ItemType::Bill),
            "hearing" => Some(ItemType::Hearing),
            "committee" => Some(ItemType::Committee),
            "member" => Some(ItemType::Member),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Bill => "bill",
            ItemType::Hearing => "hearing",
            ItemType::Committee => "committee",
            ItemType::Member => "member",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub item_type: ItemType,
    pub title: String,
    pub description: String,
    pub url: Option<String>,
    pub date: Option<String>,
    pub chamber: Option<String>,
    pub congress: Option<u32>,
    pub relevance_score: f64,
}

/// Topic names with a synonym expansion.
pub fn known_topics() -> &'static [&'static str] {
    &[
        "healthcare",
        "economy",
        "defense",
        "education",
        "environment",
        "immigration",
        "technology",
        "transportation",
    ]
}

fn topic_terms(topic: &str) -> Vec<String> {
    let known: &[&str] = match topic.to_lowercase().as_str() {
        "healthcare" => &["health", "medicare", "medicaid", "affordable care"],
        "economy" => &["economic", "budget", "tax", "finance", "trade"],
        "defense" => &["defense", "military", "national security", "veterans"],
        "education" => &["education", "school", "student", "college"],
        "environment" => &["climate", "environment", "energy", "renewable"],
        "immigration" => &["immigration", "border", "visa", "refugee"],
        "technology" => &["technology", "cyber", "internet", "digital"],
        "transportation" => &["transportation", "infrastructure", "highway", "transit"],
        _ => return vec![topic.to_string()],
    };
    known.iter().map(|s| s.to_string()).collect()
}

/// Score a candidate against the query.
///
/// An exact query substring in the title is worth 2.0 and in the secondary
/// field `secondary_weight`; each whitespace-split query word adds 0.5 when
/// found in the title and `word_weight` when found in the secondary field.
fn score_match(query: &str, title: &str, secondary: &str, secondary_weight: f64, word_weight: f64) -> f64 {
    let query = query.to_lowercase();
    let title = title.to_lowercase();
    let secondary = secondary.to_lowercase();

    let mut score = 0.0;
    if title.contains(&query) {
        score += 2.0;
    }
    if secondary.contains(&query) {
        score += secondary_weight;
    }
    for word in query.split_whitespace() {
        if title.contains(word) {
            score += 0.5;
        }
        if secondary.contains(word) {
            score += word_weight;
        }
    }
    score
}

fn score_member(query: &str, name: &str, state: &str, party: &str) -> f64 {
    let mut score = score_match(query, name, state, 1.0, 0.3);
    if party.to_lowercase().contains(&query.to_lowercase()) {
        score += 0.5;
    }
    score
}

fn sort_by_score(results: &mut Vec<SearchResult>) {
    results.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
}

/// Concurrent search aggregator over a [`CongressApi`] client.
pub struct SearchEngine {
    client: Arc<dyn CongressApi>,
}

impl SearchEngine {
    pub fn new(client: Arc<dyn CongressApi>) -> Self {
        Self { client }
    }

    /// Search the requested categories concurrently and merge by relevance.
    ///
    /// Each category gets `limit / |types|` of the result budget (integer
    /// division, so a type can legitimately receive zero when the limit is
    /// smaller than the type count). An empty `include_types` means all
    /// categories.
    pub async fn search_all(
        &self,
        query: &str,
        limit: usize,
        include_types: &[ItemType],
    ) -> Vec<SearchResult> {
        let selected: Vec<ItemType> = if include_types.is_empty() {
            ItemType::ALL.to_vec()
        } else {
            ItemType::ALL
                .iter()
                .copied()
                .filter(|t| include_types.contains(t))
                .collect()
        };
        if selected.is_empty() {
            return Vec::new();
        }

        let per_type = limit / selected.len();
        info!(
            "Searching for '{}' across {} categories (limit {})",
            query,
            selected.len(),
            limit
        );

        let searches = selected
            .iter()
            .map(|item_type| self.search_category(*item_type, query, per_type));
        let per_category = join_all(searches).await;

        let mut combined: Vec<SearchResult> = per_category.into_iter().flatten().collect();
        sort_by_score(&mut combined);
        combined.truncate(limit);

        info!("Found {} total results for '{}'", combined.len(), query);
        combined
    }

    /// Search by topic, expanding known topics into synonym terms.
    ///
    /// Unknown topics fall back to a single-term search of the topic itself.
    /// Merged results are deduplicated by exact title, first hit winning.
    pub async fn search_by_topic(
        &self,
        topic: &str,
        limit: usize,
        include_types: &[ItemType],
    ) -> Vec<SearchResult> {
        let terms = topic_terms(topic);
        let per_term = limit / terms.len();

        let mut all_results = Vec::new();
        for term in &terms {
            let results = self.search_all(term, per_term, include_types).await;
            all_results.extend(results);
        }

        let mut seen = HashSet::new();
        let mut unique: Vec<SearchResult> = all_results
            .into_iter()
            .filter(|r| seen.insert(r.title.clone()))
            .collect();
        sort_by_score(&mut unique);
        unique.truncate(limit);
        unique
    }

    /// One category search; failures are logged and yield no results.
    async fn search_category(
        &self,
        item_type: ItemType,
        query: &str,
        limit: usize,
    ) -> Vec<SearchResult> {
        let outcome = match item_type {
            ItemType::Bill => self.search_bills(query, limit).await,
            ItemType::Hearing => self.search_hearings(query, limit).await,
            ItemType::Committee => self.search_committees(query, limit).await,
            ItemType::Member => self.search_members(query, limit).await,
        };
        match outcome {
            Ok(results) => results,
            Err(e) => {
                error!("Error searching {}s: {}", item_type, e);
                Vec::new()
            }
        }
    }

    async fn search_bills(&self, query: &str, limit: usize) -> CongressResult<Vec<SearchResult>> {
        let congress = self.client.current_congress();
        let data = self
            .client
            .get_bills(BillQuery {
                congress: Some(congress),
                limit: Some((limit * 2) as u32),
                ..Default::default()
            })
            .await?;

        let mut results: Vec<SearchResult> = data
            .bills
            .iter()
            .filter_map(|bill| {
                let title = bill.title.as_deref().unwrap_or("");
                let action = bill
                    .latest_action
                    .as_ref()
                    .and_then(|a| a.text.as_deref())
                    .unwrap_or("");

                let score = score_match(query, title, action, 1.0, 0.3);
                if score <= 0.0 {
                    return None;
                }
                Some(SearchResult {
                    item_type: ItemType::Bill,
                    title: format!("{}: {}", bill.identifier(), title),
                    description: action.to_string(),
                    url: bill.url.clone(),
                    date: bill.latest_action.as_ref().and_then(|a| a.action_date.clone()),
                    chamber: bill.origin_chamber.clone(),
                    congress: Some(congress),
                    relevance_score: score,
                })
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(limit);
        Ok(results)
    }

    async fn search_hearings(&self, query: &str, limit: usize) -> CongressResult<Vec<SearchResult>> {
        let congress = self.client.current_congress();
        let data = self
            .client
            .get_hearings(HearingQuery {
                congress: Some(congress),
                limit: Some((limit * 2) as u32),
                ..Default::default()
            })
            .await?;

        let mut results: Vec<SearchResult> = data
            .hearings
            .iter()
            .filter_map(|hearing| {
                let title = hearing.title.as_deref().unwrap_or("");
                let committee = hearing
                    .committee
                    .as_ref()
                    .and_then(|c| c.name.as_deref())
                    .unwrap_or("");

                let score = score_match(query, title, committee, 1.5, 0.3);
                if score <= 0.0 {
                    return None;
                }
                Some(SearchResult {
                    item_type: ItemType::Hearing,
                    title: title.to_string(),
                    description: format!("Committee: {}", committee),
                    url: hearing.url.clone(),
                    date: hearing.date.clone(),
                    chamber: hearing.chamber.clone(),
                    congress: Some(congress),
                    relevance_score: score,
                })
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(limit);
        Ok(results)
    }

    async fn search_committees(&self, query: &str, limit: usize) -> CongressResult<Vec<SearchResult>> {
        let congress = self.client.current_congress();
        let data = self
            .client
            .get_committees(CommitteeQuery {
                congress: Some(congress),
                limit: Some((limit * 2) as u32),
                ..Default::default()
            })
            .await?;

        let mut results: Vec<SearchResult> = data
            .committees
            .iter()
            .filter_map(|committee| {
                let name = committee.name.as_deref().unwrap_or("");
                let system_code = committee.system_code.as_deref().unwrap_or("");

                let score = score_match(query, name, system_code, 1.0, 0.0);
                if score <= 0.0 {
                    return None;
                }
                Some(SearchResult {
                    item_type: ItemType::Committee,
                    title: name.to_string(),
                    description: format!("{} Committee", committee.chamber_display()),
                    url: committee.url.clone(),
                    date: None,
                    chamber: committee.chamber.clone(),
                    congress: Some(congress),
                    relevance_score: score,
                })
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(limit);
        Ok(results)
    }

    async fn search_members(&self, query: &str, limit: usize) -> CongressResult<Vec<SearchResult>> {
        let congress = self.client.current_congress();
        let data = self
            .client
            .get_members(MemberQuery {
                congress: Some(congress),
                limit: Some((limit * 2) as u32),
                ..Default::default()
            })
            .await?;

        let mut results: Vec<SearchResult> = data
            .members
            .iter()
            .filter_map(|member| {
                let name = member.display_name();
                let state = member.state.as_deref().unwrap_or("");
                let party = member.party.as_deref().unwrap_or("");

                let score = score_member(query, &name, state, party);
                if score <= 0.0 {
                    return None;
                }
                let district = match member.district {
                    Some(d) if d != 0 => format!(", District {}", d),
                    _ => String::new(),
                };
                Some(SearchResult {
                    item_type: ItemType::Member,
                    title: name,
                    description: format!("{} - {}{}", party, state, district),
                    url: member.url.clone(),
                    date: None,
                    chamber: None,
                    congress: Some(congress),
                    relevance_score: score,
                })
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(limit);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_exact_title_match() {
        let score = score_match("infrastructure", "Infrastructure Investment Act", "", 1.0, 0.3);
        // Exact substring plus the single word hit.
        assert_eq!(score, 2.5);
    }

    #[test]
    fn test_score_word_matches_accumulate() {
        let score = score_match(
            "clean energy",
            "Promoting Clean Water",
            "Advancing energy storage",
            1.0,
            0.3,
        );
        // No exact phrase anywhere; "clean" in title, "energy" in secondary.
        assert_eq!(score, 0.8);
    }

    #[test]
    fn test_score_secondary_weight_applies() {
        let score = score_match("judiciary", "", "Committee on the Judiciary", 1.5, 0.3);
        assert_eq!(score, 1.8);
    }

    #[test]
    fn test_score_no_match_is_zero() {
        let score = score_match("agriculture", "Cyber Defense Act", "passed the House", 1.0, 0.3);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_score_member_party_bonus() {
        let score = score_member("republican", "Crapo, Michael D.", "Idaho", "Republican");
        assert_eq!(score, 0.5);
    }

    #[test]
    fn test_topic_terms_known_topic() {
        let terms = topic_terms("Healthcare");
        assert_eq!(terms, vec!["health", "medicare", "medicaid", "affordable care"]);
    }

    #[test]
    fn test_topic_terms_unknown_topic_falls_back() {
        assert_eq!(topic_terms("space exploration"), vec!["space exploration"]);
    }

    #[test]
    fn test_item_type_parse() {
        assert_eq!(ItemType::parse("BILL"), Some(ItemType::Bill));
        assert_eq!(ItemType::parse("hearing"), Some(ItemType::Hearing));
        assert_eq!(ItemType::parse("senator"), None);
    }

    #[test]
    fn test_sort_by_score_is_descending_and_stable() {
        let mk = |title: &str, score: f64| SearchResult {
            item_type: ItemType::Bill,
            title: title.to_string(),
            description: String::new(),
            url: None,
            date: None,
            chamber: None,
            congress: None,
            relevance_score: score,
        };

        let mut results = vec![mk("a", 1.0), mk("b", 3.0), mk("c", 1.0), mk("d", 2.0)];
        sort_by_score(&mut results);

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        // Equal scores keep their original relative order.
        assert_eq!(titles, vec!["b", "d", "a", "c"]);
    }
}
