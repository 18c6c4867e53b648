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

//! System health checks.
//!
//! `HealthChecker` runs four checks (configuration, API connectivity, rate
//! limiter headroom, cache round-trip) and folds them into a worst-of
//! overall status. Results are cached for thirty seconds so a chatty client
//! polling health does not itself become load.

use crate::cache::CacheManager;
use crate::client::{CommitteeQuery, CongressApi};
use crate::config::Settings;
use crate::rate_limit::RateLimiter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

const HEALTH_CACHE_DURATION: Duration = Duration::from_secs(30);
const SLOW_API_THRESHOLD_MS: f64 = 5000.0;

/// Health status levels, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
    Unknown,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
            HealthStatus::Unknown => "unknown",
        }
    }
}

/// Result of one individual check.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    pub message: String,
    pub response_time_ms: Option<f64>,
}

impl HealthCheck {
    fn new(name: &str, status: HealthStatus, message: String, elapsed: Option<Duration>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message,
            response_time_ms: elapsed.map(|d| d.as_secs_f64() * 1000.0),
        }
    }
}

/// Aggregated system health.
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub checks: Vec<HealthCheck>,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: f64,
}

/// Worst status wins: one unhealthy check marks the whole system
/// unhealthy, one degraded check marks it degraded, and so on.
fn overall_status(checks: &[HealthCheck]) -> HealthStatus {
    if checks.is_empty() {
        return HealthStatus::Unknown;
    }
    if checks.iter().any(|c| c.status == HealthStatus::Unhealthy) {
        HealthStatus::Unhealthy
    } else if checks.iter().any(|c| c.status == HealthStatus::Degraded) {
        HealthStatus::Degraded
    } else if checks.iter().any(|c| c.status == HealthStatus::Unknown) {
        HealthStatus::Unknown
    } else {
        HealthStatus::Healthy
    }
}

/// Render an uptime as `1d 2h 3m 4s`, dropping leading zero units.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let days = total / 86400;
    let hours = (total % 86400) / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

/// Periodic health checker over the server's shared components.
pub struct HealthChecker {
    settings: Settings,
    client: Arc<dyn CongressApi>,
    cache: Arc<CacheManager>,
    rate_limiter: Arc<RateLimiter>,
    started_at: Instant,
    cached: Mutex<Option<(SystemHealth, Instant)>>,
}

impl HealthChecker {
    pub fn new(
        settings: Settings,
        client: Arc<dyn CongressApi>,
        cache: Arc<CacheManager>,
        rate_limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            settings,
            client,
            cache,
            rate_limiter,
            started_at: Instant::now(),
            cached: Mutex::new(None),
        }
    }

    /// Run all checks, reusing a cached result younger than thirty seconds
    /// unless `force_refresh` is set.
    pub async fn check_health(&self, force_refresh: bool) -> SystemHealth {
        if !force_refresh {
            let cached = self.cached.lock().await;
            if let Some((health, at)) = cached.as_ref() {
                if at.elapsed() < HEALTH_CACHE_DURATION {
                    return health.clone();
                }
            }
        }

        info!("Performing health check");

        let checks = vec![
            self.check_configuration(),
            self.check_api_connectivity().await,
            self.check_rate_limiting().await,
            self.check_cache().await,
        ];

        let health = SystemHealth {
            status: overall_status(&checks),
            checks,
            timestamp: Utc::now(),
            uptime_seconds: self.uptime().as_secs_f64(),
        };

        info!("Health check completed, overall status: {}", health.status.as_str());

        let mut cached = self.cached.lock().await;
        *cached = Some((health.clone(), Instant::now()));
        health
    }

    /// Seconds since the checker (and in practice the server) started.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn uptime_formatted(&self) -> String {
        format_uptime(self.uptime())
    }

    fn check_configuration(&self) -> HealthCheck {
        let started = Instant::now();
        let mut issues = Vec::new();

        if self.settings.api_key.is_empty() {
            issues.push("Congress API key not configured");
        }
        if self.settings.base_url.is_empty() {
            issues.push("Congress API base URL not configured");
        }

        if issues.is_empty() {
            HealthCheck::new(
                "configuration",
                HealthStatus::Healthy,
                "Configuration valid".to_string(),
                Some(started.elapsed()),
            )
        } else {
            HealthCheck::new(
                "configuration",
                HealthStatus::Unhealthy,
                format!("Configuration issues: {}", issues.join(", ")),
                Some(started.elapsed()),
            )
        }
    }

    /// Probe the upstream API with the cheapest possible list call. The
    /// probe goes through the normal cache, so repeated health checks do
    /// not burn rate limit budget.
    async fn check_api_connectivity(&self) -> HealthCheck {
        let started = Instant::now();
        let probe = CommitteeQuery {
            limit: Some(1),
            ..Default::default()
        };

        match self.client.get_committees(probe).await {
            Ok(_) => {
                let elapsed = started.elapsed();
                let millis = elapsed.as_secs_f64() * 1000.0;
                if millis > SLOW_API_THRESHOLD_MS {
                    HealthCheck::new(
                        "api_connectivity",
                        HealthStatus::Degraded,
                        format!("API responsive but slow ({:.0}ms)", millis),
                        Some(elapsed),
                    )
                } else {
                    HealthCheck::new(
                        "api_connectivity",
                        HealthStatus::Healthy,
                        format!("API connectivity healthy ({:.0}ms)", millis),
                        Some(elapsed),
                    )
                }
            }
            Err(e) => HealthCheck::new(
                "api_connectivity",
                HealthStatus::Unhealthy,
                format!("API connectivity failed: {}", e),
                Some(started.elapsed()),
            ),
        }
    }

    async fn check_rate_limiting(&self) -> HealthCheck {
        let started = Instant::now();
        let statuses = self.rate_limiter.status().await;

        let mut critical = false;
        let mut warnings = Vec::new();
        for (window, status) in &statuses {
            if status.limit == 0 {
                continue;
            }
            let usage = status.used as f64 / status.limit as f64 * 100.0;
            if usage > 90.0 {
                critical = true;
                warnings.push(format!("{} window at {:.1}%", window, usage));
            } else if usage > 70.0 {
                warnings.push(format!("{} window at {:.1}%", window, usage));
            }
        }

        let (status, message) = if critical {
            (
                HealthStatus::Unhealthy,
                format!("Rate limit critical: {}", warnings.join(", ")),
            )
        } else if !warnings.is_empty() {
            (
                HealthStatus::Degraded,
                format!("Rate limit warning: {}", warnings.join(", ")),
            )
        } else {
            (HealthStatus::Healthy, "Rate limiting healthy".to_string())
        };

        HealthCheck::new("rate_limiting", status, message, Some(started.elapsed()))
    }

    /// Round-trip a probe entry through the cache manager.
    async fn check_cache(&self) -> HealthCheck {
        let started = Instant::now();
        let probe_value = json!({"timestamp": Utc::now().to_rfc3339()});

        if !self.cache.set("health", probe_value, &["probe"], &[]).await {
            return HealthCheck::new(
                "cache",
                HealthStatus::Unhealthy,
                "Cache operations failed".to_string(),
                Some(started.elapsed()),
            );
        }

        let retained = self.cache.get("health", &["probe"], &[]).await.is_some();
        self.cache.delete("health", &["probe"], &[]).await;

        if retained {
            HealthCheck::new(
                "cache",
                HealthStatus::Healthy,
                "Cache operations healthy".to_string(),
                Some(started.elapsed()),
            )
        } else {
            HealthCheck::new(
                "cache",
                HealthStatus::Degraded,
                "Cache not retaining values".to_string(),
                Some(started.elapsed()),
            )
        }
    }
}
