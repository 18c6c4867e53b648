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

//! Sliding-window rate limiting for outbound Congress.gov requests.
//!
//! The upstream API enforces hourly quotas; this limiter keeps the process
//! under them with two trailing windows (75/minute and 4500/hour by default).
//! Each window tracks the timestamps of admitted requests, a call is admitted
//! only when every window has headroom, and a denied caller sleeps until the
//! blocking window's oldest timestamp ages out.

use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// One fixed trailing window and the request timestamps inside it.
///
/// Timestamps are monotonic seconds relative to the owning limiter's start
/// and are kept in ascending order; entries older than the window are purged
/// lazily on every operation. Synchronization is the owner's responsibility.
#[derive(Debug)]
pub struct RateLimitWindow {
    /// Maximum requests admitted per window. Zero never admits.
    max_requests: usize,
    /// Window length.
    window: Duration,
    /// Admission timestamps, ascending, all within the trailing window.
    timestamps: VecDeque<f64>,
}

impl RateLimitWindow {
    /// Create a window admitting at most `max_requests` per `window`.
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            timestamps: VecDeque::new(),
        }
    }

    /// Drop timestamps that have aged out of the window as of `now`.
    fn purge(&mut self, now: f64) {
        let cutoff = now - self.window.as_secs_f64();
        while self.timestamps.front().is_some_and(|&t| t <= cutoff) {
            self.timestamps.pop_front();
        }
    }

    /// Whether a request may be admitted at `now`.
    pub fn can_admit(&mut self, now: f64) -> bool {
        self.purge(now);
        self.timestamps.len() < self.max_requests
    }

    /// Seconds until a request could be admitted at `now`; `0.0` when one is
    /// admissible already.
    ///
    /// A zero-capacity window (or one denying with nothing recorded) reports
    /// the full window length, so callers poll at most once per window.
    pub fn time_until_admit(&mut self, now: f64) -> f64 {
        self.purge(now);
        if self.timestamps.len() < self.max_requests {
            return 0.0;
        }
        match self.timestamps.front() {
            Some(&oldest) => (oldest + self.window.as_secs_f64() - now).max(0.0),
            None => self.window.as_secs_f64(),
        }
    }

    /// Record an admitted request at `now`.
    pub fn record(&mut self, now: f64) {
        self.timestamps.push_back(now);
        self.purge(now);
    }

    /// Requests currently inside the window.
    pub fn used(&mut self, now: f64) -> usize {
        self.purge(now);
        self.timestamps.len()
    }

    /// Seconds until the oldest recorded request ages out; `0.0` when empty.
    pub fn reset_in(&mut self, now: f64) -> f64 {
        self.purge(now);
        match self.timestamps.front() {
            Some(&oldest) => (oldest + self.window.as_secs_f64() - now).max(0.0),
            None => 0.0,
        }
    }

    /// Window capacity.
    pub fn limit(&self) -> usize {
        self.max_requests
    }

    fn clear(&mut self) {
        self.timestamps.clear();
    }
}

/// Point-in-time usage snapshot for one window.
#[derive(Debug, Clone, Serialize)]
pub struct WindowStatus {
    /// Requests recorded inside the window.
    pub used: usize,
    /// Window capacity.
    pub limit: usize,
    /// Requests still admissible without waiting.
    pub remaining: usize,
    /// Seconds until the oldest recorded request ages out.
    pub reset_in_secs: u64,
}

/// Multi-window rate limiter serializing outbound API calls.
///
/// Admission requires headroom in every window; the wait on denial is the
/// longest wait any denying window demands. The windows share one async
/// mutex, held only for the read-decide-record step: waits happen with the
/// lock released and admission is re-checked after waking, so `status`
/// readers are never starved behind a sleeping caller.
pub struct RateLimiter {
    windows: Mutex<BTreeMap<String, RateLimitWindow>>,
    origin: Instant,
}

impl RateLimiter {
    /// Create a limiter with the standard per-minute and per-hour windows.
    pub fn new(requests_per_minute: usize, requests_per_hour: usize) -> Self {
        Self::with_windows(vec![
            ("minute".to_string(), requests_per_minute, Duration::from_secs(60)),
            ("hour".to_string(), requests_per_hour, Duration::from_secs(3600)),
        ])
    }

    /// Create a limiter from arbitrary named windows.
    ///
    /// A zero-capacity window is legal here and blocks forever; configuration
    /// loading rejects zero caps so deployments fail at startup instead.
    pub fn with_windows(windows: Vec<(String, usize, Duration)>) -> Self {
        let map = windows
            .into_iter()
            .map(|(name, max_requests, window)| (name, RateLimitWindow::new(max_requests, window)))
            .collect();
        Self {
            windows: Mutex::new(map),
            origin: Instant::now(),
        }
    }

    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Wait until every window admits a request, then record it on all of them.
    ///
    /// The timestamp is recorded in the same critical section that validated
    /// admission, after all waiting is done. Dropping the future mid-wait
    /// therefore leaves every window untouched.
    pub async fn wait_if_needed(&self) {
        loop {
            let delay = {
                let mut windows = self.windows.lock().await;
                let now = self.now();
                let mut wait = 0.0_f64;
                for window in windows.values_mut() {
                    if !window.can_admit(now) {
                        wait = wait.max(window.time_until_admit(now));
                    }
                }
                if wait <= 0.0 {
                    for window in windows.values_mut() {
                        window.record(now);
                    }
                    return;
                }
                wait
            };
            // Lock is released here; another caller may win the slot while we
            // sleep, which the next loop iteration detects.
            warn!("Rate limit reached, waiting {:.2}s before next request", delay);
            tokio::time::sleep(Duration::from_secs_f64(delay)).await;
        }
    }

    /// Whether a request would be admitted right now. Records nothing.
    pub async fn can_admit_now(&self) -> bool {
        let mut windows = self.windows.lock().await;
        let now = self.now();
        windows.values_mut().all(|w| w.can_admit(now))
    }

    /// Usage snapshot per window. Purges stale entries, records nothing.
    pub async fn status(&self) -> BTreeMap<String, WindowStatus> {
        let mut windows = self.windows.lock().await;
        let now = self.now();
        windows
            .iter_mut()
            .map(|(name, window)| {
                let used = window.used(now);
                let limit = window.limit();
                (
                    name.clone(),
                    WindowStatus {
                        used,
                        limit,
                        remaining: limit.saturating_sub(used),
                        reset_in_secs: window.reset_in(now).ceil() as u64,
                    },
                )
            })
            .collect()
    }

    /// Clear every window.
    pub async fn reset(&self) {
        let mut windows = self.windows.lock().await;
        for window in windows.values_mut() {
            window.clear();
        }
        debug!("Rate limiter reset");
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish_non_exhaustive()
    }
}
