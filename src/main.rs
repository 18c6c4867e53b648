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

//! Congress MCP server binary.
//!
//! Runs the Model Context Protocol server over stdio. Configuration comes
//! from the environment (and a `.env` file if present); a few settings can
//! be overridden on the command line.
//!
//! # Usage
//!
//! ```bash
//! # Run with settings from the environment / .env
//! congress-mcp
//!
//! # Override the API key and cache backend
//! congress-mcp --api-key YOUR_KEY --cache redis
//!
//! # Run with debug logging
//! RUST_LOG=debug congress-mcp
//! ```

use clap::Parser;
use congress_mcp::cache::{CacheManager, CacheStore, MemoryCache, RedisCache};
use congress_mcp::client::{CongressApi, CongressClient};
use congress_mcp::config::{CacheBackendKind, Settings};
use congress_mcp::health::HealthChecker;
use congress_mcp::rate_limit::RateLimiter;
use congress_mcp::{McpServer, ToolContext};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "congress-mcp")]
#[command(version)]
#[command(about = "Congress.gov Model Context Protocol (MCP) server for AI/LLM integration")]
struct Cli {
    /// Congress.gov API key (overrides CONGRESS_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Cache backend (overrides CACHE_TYPE)
    #[arg(long, value_parser = ["memory", "redis"])]
    cache: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Flags are routed through the environment so they share one precedence
    // path with `.env`: explicit flags beat the environment, which beats
    // `.env` defaults.
    if let Some(key) = cli.api_key.as_deref() {
        env::set_var("CONGRESS_API_KEY", key);
    }
    if let Some(cache) = cli.cache.as_deref() {
        env::set_var("CACHE_TYPE", cache);
    }

    let settings = Settings::from_env()?;

    // Logging goes to stderr; stdout carries the JSON-RPC stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("congress_mcp={}", settings.log_level))
        }))
        .with_writer(std::io::stderr)
        .init();

    let store: Box<dyn CacheStore> = match settings.cache_backend {
        CacheBackendKind::Memory => Box::new(MemoryCache::new()),
        CacheBackendKind::Redis => {
            info!("Using Redis cache at {}", settings.redis_url);
            Box::new(RedisCache::new(&settings.redis_url)?)
        }
    };
    let cache = Arc::new(CacheManager::new(store, settings.cache_ttl.clone()));

    let rate_limiter = Arc::new(RateLimiter::new(
        settings.rate_limit.requests_per_minute,
        settings.rate_limit.requests_per_hour,
    ));

    let client: Arc<dyn CongressApi> = Arc::new(CongressClient::new(
        &settings,
        Arc::clone(&cache),
        Arc::clone(&rate_limiter),
    )?);

    let health = Arc::new(HealthChecker::new(
        settings,
        Arc::clone(&client),
        Arc::clone(&cache),
        Arc::clone(&rate_limiter),
    ));

    let ctx = ToolContext::new(client, cache, rate_limiter, health);
    let server = Arc::new(McpServer::new(ctx));
    server.run_stdio().await?;

    Ok(())
}
