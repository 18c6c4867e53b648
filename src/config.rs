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

//! Environment-driven configuration.
//!
//! All settings are read once at startup (`Settings::from_env`); the rest of
//! the crate takes explicit config structs and never touches the environment.

use crate::error::{CongressError, CongressResult};
use std::env;
use std::time::Duration;

/// Default Congress.gov API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.congress.gov/v3";

/// Cache backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    /// In-process map, lost on restart.
    Memory,
    /// Redis, shared across processes.
    Redis,
}

/// Per-category cache TTLs in seconds.
///
/// Committee membership moves slowly, hearing schedules change daily, and
/// bill status can change within hours; the defaults reflect that.
#[derive(Debug, Clone)]
pub struct CacheTtlPolicy {
    /// Fallback TTL for uncategorized entries.
    pub default_secs: u64,
    /// TTL for committee listings and details.
    pub committee_secs: u64,
    /// TTL for hearings and committee meetings.
    pub hearing_secs: u64,
    /// TTL for bill listings and details.
    pub bill_secs: u64,
    /// TTL for member listings and details.
    pub member_secs: u64,
}

impl Default for CacheTtlPolicy {
    fn default() -> Self {
        Self {
            default_secs: 3600,
            committee_secs: 86400,
            hearing_secs: 21600,
            bill_secs: 7200,
            member_secs: 604800,
        }
    }
}

impl CacheTtlPolicy {
    /// TTL for a cache category; unknown categories get the default.
    pub fn ttl_for(&self, category: &str) -> Duration {
        let secs = match category {
            "committee" => self.committee_secs,
            "hearing" => self.hearing_secs,
            "bill" => self.bill_secs,
            "member" => self.member_secs,
            _ => self.default_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Outbound rate limit caps, per trailing window.
#[derive(Debug, Clone)]
pub struct RateLimitSettings {
    /// Maximum upstream requests per trailing hour.
    pub requests_per_hour: usize,
    /// Maximum upstream requests per trailing minute.
    pub requests_per_minute: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        // Congress.gov allows 5000/hour; stay under it with headroom.
        Self {
            requests_per_hour: 4500,
            requests_per_minute: 75,
        }
    }
}

/// Server settings, loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Congress.gov API key (`CONGRESS_API_KEY`, required).
    pub api_key: String,

    /// Upstream base URL (`CONGRESS_API_BASE_URL`).
    pub base_url: String,

    /// Cache backend selection (`CACHE_TYPE`, `memory` or `redis`).
    pub cache_backend: CacheBackendKind,

    /// Redis connection URL (`REDIS_URL`), used when the backend is Redis.
    pub redis_url: String,

    /// Per-category cache TTLs (`CACHE_TTL_*`).
    pub cache_ttl: CacheTtlPolicy,

    /// Outbound rate limit caps (`RATE_LIMIT_REQUESTS_PER_*`).
    pub rate_limit: RateLimitSettings,

    /// Upstream request timeout in seconds (`REQUEST_TIMEOUT_SECS`).
    pub request_timeout_secs: u64,

    /// Default log level when `RUST_LOG` is unset (`LOG_LEVEL`).
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: "DEMO_KEY".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_backend: CacheBackendKind::Memory,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            cache_ttl: CacheTtlPolicy::default(),
            rate_limit: RateLimitSettings::default(),
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the environment (and a `.env` file if present).
    ///
    /// # Errors
    ///
    /// Returns `CongressError::Config` if `CONGRESS_API_KEY` is missing or
    /// empty, or if either rate limit cap is zero.
    pub fn from_env() -> CongressResult<Self> {
        dotenv::dotenv().ok();

        let api_key = env::var("CONGRESS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                CongressError::Config("CONGRESS_API_KEY must be set to a non-empty value".into())
            })?;

        let cache_backend = match env::var("CACHE_TYPE").as_deref() {
            Ok("redis") => CacheBackendKind::Redis,
            _ => CacheBackendKind::Memory,
        };

        let defaults = CacheTtlPolicy::default();
        let cache_ttl = CacheTtlPolicy {
            default_secs: env_u64("CACHE_TTL_DEFAULT", defaults.default_secs),
            committee_secs: env_u64("CACHE_TTL_COMMITTEE", defaults.committee_secs),
            hearing_secs: env_u64("CACHE_TTL_HEARING", defaults.hearing_secs),
            bill_secs: env_u64("CACHE_TTL_BILL", defaults.bill_secs),
            member_secs: env_u64("CACHE_TTL_MEMBER", defaults.member_secs),
        };

        let rate_limit = RateLimitSettings {
            requests_per_hour: env_u64("RATE_LIMIT_REQUESTS_PER_HOUR", 4500) as usize,
            requests_per_minute: env_u64("RATE_LIMIT_REQUESTS_PER_MINUTE", 75) as usize,
        };
        if rate_limit.requests_per_hour == 0 || rate_limit.requests_per_minute == 0 {
            return Err(CongressError::Config(
                "rate limit caps must be positive (a zero cap would block all requests)".into(),
            ));
        }

        Ok(Self {
            api_key,
            base_url: env::var("CONGRESS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            cache_backend,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://127.0.0.1:6379/0".to_string()),
            cache_ttl,
            rate_limit,
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS", 30),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Upstream request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
