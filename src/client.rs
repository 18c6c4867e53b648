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

//! Congress.gov API client with rate limiting and caching.
//!
//! Every outbound call flows through the same pipeline: cache lookup, then
//! the rate limiter gate, then the HTTP request, then a cache write-back on
//! success. The [`CongressApi`] trait is the seam the search layer and
//! resources are written against, so tests can substitute a stub that never
//! touches the network.

use crate::cache::CacheManager;
use crate::config::Settings;
use crate::error::{CongressError, CongressResult};
use crate::models::{
    BillDetailResponse, BillsResponse, CommitteesResponse, HearingsResponse, MembersResponse,
};
use crate::rate_limit::RateLimiter;
use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, error};

/// Default page size for list endpoints, the maximum Congress.gov allows.
pub const DEFAULT_PAGE_LIMIT: u32 = 250;

/// Congress number for a calendar year.
///
/// Congresses run two years and convene in odd years; Congress 1 convened
/// in 1789. An even year therefore belongs to the Congress that started the
/// year before.
pub fn congress_for_year(year: i32) -> u32 {
    let adjusted = if year % 2 == 0 { year - 1 } else { year };
    ((adjusted - 1789) / 2 + 1).max(1) as u32
}

/// Filters for the `/committee` list endpoint.
#[derive(Debug, Clone, Default)]
pub struct CommitteeQuery {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Filters for the `/hearing` list endpoint.
#[derive(Debug, Clone, Default)]
pub struct HearingQuery {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    pub committee: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Filters for the `/bill` list endpoint.
#[derive(Debug, Clone, Default)]
pub struct BillQuery {
    pub congress: Option<u32>,
    pub bill_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Filters for the `/member` list endpoint.
#[derive(Debug, Clone, Default)]
pub struct MemberQuery {
    pub congress: Option<u32>,
    pub chamber: Option<String>,
    pub state: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Upstream data operations, implemented by [`CongressClient`] and by test
/// stubs.
#[async_trait]
pub trait CongressApi: Send + Sync {
    async fn get_committees(&self, query: CommitteeQuery) -> CongressResult<CommitteesResponse>;

    async fn get_hearings(&self, query: HearingQuery) -> CongressResult<HearingsResponse>;

    async fn get_bills(&self, query: BillQuery) -> CongressResult<BillsResponse>;

    async fn get_bill_details(
        &self,
        congress: u32,
        bill_type: &str,
        bill_number: u32,
    ) -> CongressResult<BillDetailResponse>;

    async fn get_members(&self, query: MemberQuery) -> CongressResult<MembersResponse>;

    /// Congress number in session today. Pure date arithmetic, no network call.
    fn current_congress(&self) -> u32 {
        congress_for_year(Utc::now().year())
    }

    /// Hearings for the sitting Congress, newest page first.
    async fn recent_hearings(&self, limit: u32) -> CongressResult<HearingsResponse> {
        let query = HearingQuery {
            congress: Some(self.current_congress()),
            limit: Some(limit),
            ..Default::default()
        };
        self.get_hearings(query).await
    }
}

fn push_param<T: ToString>(params: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<T>) {
    if let Some(v) = value {
        params.push((name, v.to_string()));
    }
}

fn paging(params: &mut Vec<(&'static str, String)>, limit: Option<u32>, offset: Option<u32>) {
    params.push(("limit", limit.unwrap_or(DEFAULT_PAGE_LIMIT).to_string()));
    params.push(("offset", offset.unwrap_or(0).to_string()));
}

/// HTTP client for the Congress.gov v3 API.
pub struct CongressClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    cache: Arc<CacheManager>,
    rate_limiter: Arc<RateLimiter>,
}

impl CongressClient {
    /// Build a client from settings plus the shared cache and limiter.
    pub fn new(
        settings: &Settings,
        cache: Arc<CacheManager>,
        rate_limiter: Arc<RateLimiter>,
    ) -> CongressResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .pool_max_idle_per_host(10)
            .user_agent(concat!("congress-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CongressError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: settings.api_key.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            cache,
            rate_limiter,
        })
    }

    /// Make a GET request with caching and rate limiting.
    ///
    /// `category` selects the cache TTL bucket; `params` must only contain
    /// parameters that are actually set, since absent filters are omitted
    /// from the query string entirely.
    pub async fn request(
        &self,
        endpoint: &str,
        category: &str,
        use_cache: bool,
        params: &[(&str, String)],
    ) -> CongressResult<JsonValue> {
        if use_cache {
            if let Some(cached) = self.cache.get(category, &[endpoint], params).await {
                return Ok(cached);
            }
        }

        self.rate_limiter.wait_if_needed().await;

        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("Requesting {}", endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str()), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(200).collect();
            error!("HTTP {} from {}: {}", status.as_u16(), endpoint, snippet);
            return Err(CongressError::Upstream {
                status: Some(status.as_u16()),
                message: format!("request failed with status {}: {}", status.as_u16(), snippet),
            });
        }

        let data: JsonValue = response.json().await?;

        if use_cache {
            self.cache.set(category, data.clone(), &[endpoint], params).await;
        }

        debug!("Request successful for {}", endpoint);
        Ok(data)
    }
}

#[async_trait]
impl CongressApi for CongressClient {
    async fn get_committees(&self, query: CommitteeQuery) -> CongressResult<CommitteesResponse> {
        let mut params = Vec::with_capacity(4);
        push_param(&mut params, "congress", query.congress);
        push_param(&mut params, "chamber", query.chamber);
        paging(&mut params, query.limit, query.offset);

        let data = self.request("committee", "committee", true, &params).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get_hearings(&self, query: HearingQuery) -> CongressResult<HearingsResponse> {
        let mut params = Vec::with_capacity(5);
        push_param(&mut params, "congress", query.congress);
        push_param(&mut params, "chamber", query.chamber);
        push_param(&mut params, "committee", query.committee);
        paging(&mut params, query.limit, query.offset);

        let data = self.request("hearing", "hearing", true, &params).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get_bills(&self, query: BillQuery) -> CongressResult<BillsResponse> {
        let mut params = Vec::with_capacity(4);
        push_param(&mut params, "congress", query.congress);
        push_param(&mut params, "type", query.bill_type);
        paging(&mut params, query.limit, query.offset);

        let data = self.request("bill", "bill", true, &params).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get_bill_details(
        &self,
        congress: u32,
        bill_type: &str,
        bill_number: u32,
    ) -> CongressResult<BillDetailResponse> {
        let endpoint = format!(
            "bill/{}/{}/{}",
            congress,
            bill_type.to_lowercase(),
            bill_number
        );

        let data = self.request(&endpoint, "bill", true, &[]).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get_members(&self, query: MemberQuery) -> CongressResult<MembersResponse> {
        let mut params = Vec::with_capacity(5);
        push_param(&mut params, "congress", query.congress);
        push_param(&mut params, "chamber", query.chamber);
        push_param(&mut params, "state", query.state);
        paging(&mut params, query.limit, query.offset);

        let data = self.request("member", "member", true, &params).await?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_congress_for_year() {
        assert_eq!(congress_for_year(1789), 1);
        assert_eq!(congress_for_year(1790), 1);
        assert_eq!(congress_for_year(2021), 117);
        assert_eq!(congress_for_year(2023), 118);
        assert_eq!(congress_for_year(2024), 118);
        assert_eq!(congress_for_year(2025), 119);
        assert_eq!(congress_for_year(2026), 119);
    }

    #[test]
    fn test_push_param_skips_absent_values() {
        let mut params: Vec<(&'static str, String)> = Vec::new();
        push_param(&mut params, "congress", Some(118u32));
        push_param::<String>(&mut params, "chamber", None);
        paging(&mut params, None, None);

        assert_eq!(
            params,
            vec![
                ("congress", "118".to_string()),
                ("limit", "250".to_string()),
                ("offset", "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_client_construction_trims_base_url() {
        use crate::cache::{CacheManager, MemoryCache};
        use crate::config::CacheTtlPolicy;

        let mut settings = Settings::default();
        settings.base_url = "https://api.congress.gov/v3/".to_string();

        let cache = Arc::new(CacheManager::new(
            Box::new(MemoryCache::new()),
            CacheTtlPolicy::default(),
        ));
        let limiter = Arc::new(RateLimiter::new(75, 4500));

        let client = CongressClient::new(&settings, cache, limiter).expect("client should build");
        assert_eq!(client.base_url, "https://api.congress.gov/v3");
    }

    #[tokio::test]
    async fn test_cache_hit_bypasses_rate_limiter() {
        use crate::cache::{CacheManager, MemoryCache};
        use crate::config::CacheTtlPolicy;

        let mut settings = Settings::default();
        // Nothing listens here; a cache miss would fail with a connect error.
        settings.base_url = "http://127.0.0.1:9".to_string();

        let cache = Arc::new(CacheManager::new(
            Box::new(MemoryCache::new()),
            CacheTtlPolicy::default(),
        ));
        let limiter = Arc::new(RateLimiter::new(75, 4500));
        let client = CongressClient::new(&settings, Arc::clone(&cache), Arc::clone(&limiter))
            .expect("client should build");

        let params = vec![("limit", "250".to_string()), ("offset", "0".to_string())];
        let payload = serde_json::json!({"committees": []});
        assert!(
            cache
                .set("committee", payload.clone(), &["committee"], &params)
                .await
        );

        let data = client
            .request("committee", "committee", true, &params)
            .await
            .expect("cached response should be served without a network call");
        assert_eq!(data, payload);

        let status = limiter.status().await;
        assert_eq!(status["minute"].used, 0);
        assert_eq!(status["hour"].used, 0);
    }
}
