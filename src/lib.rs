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

//! Congress MCP Server
//!
//! This crate provides a Model Context Protocol (MCP) server that gives
//! AI/LLM systems access to U.S. legislative data from the Congress.gov
//! API. Key features:
//!
//! - **Browse committees, hearings, bills and members** with typed queries
//! - **Cross-type search** that fans out across categories and ranks by
//!   relevance, with topic-vocabulary expansion
//! - **TTL caching** (in-memory or Redis) keyed per data category
//! - **Sliding-window rate limiting** against the upstream API quota
//! - **Health checks and metrics** over the server's own components

pub mod cache;
pub mod client;
pub mod config;
mod error;
pub mod health;
pub mod models;
mod protocol;
pub mod rate_limit;
pub mod resources;
pub mod search;
mod server;
pub mod tools;

pub use error::{CongressError, CongressResult};
pub use protocol::*;
pub use server::McpServer;
pub use tools::{execute_tool, get_tools, ToolContext};

/// MCP server version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name for the MCP protocol handshake
pub const SERVER_NAME: &str = "congress-mcp";
