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

//! Error types for the Congress MCP server.

use thiserror::Error;

/// Congress MCP server error type.
#[derive(Error, Debug)]
pub enum CongressError {
    /// Upstream Congress.gov API failure (transport, timeout, or non-2xx status).
    #[error("Congress API error: {message}")]
    Upstream {
        /// HTTP status code when the upstream answered; `None` for transport failures.
        status: Option<u16>,
        /// Human-readable failure description.
        message: String,
    },

    /// Cache backend failure (Redis connection, command, or value decoding).
    #[error("Cache backend error: {0}")]
    CacheBackend(String),

    /// Configuration error (missing or invalid settings).
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Tool not found.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid arguments.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

/// Result type for Congress MCP operations.
pub type CongressResult<T> = Result<T, CongressError>;

impl CongressError {
    /// Get the JSON-RPC error code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Upstream { .. } => -32001,
            Self::Io(_) => -32002,
            Self::CacheBackend(_) => -32003,
            Self::Config(_) => -32004,
            Self::Json(_) => -32700,
            Self::InvalidRequest(_) => -32600,
            Self::ToolNotFound(_) => -32601,
            Self::ResourceNotFound(_) => -32602,
            Self::InvalidArguments(_) => -32602,
        }
    }

    /// Build an upstream error with no HTTP status (transport-level failure).
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CongressError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        Self::Upstream { status, message }
    }
}

impl From<redis::RedisError> for CongressError {
    fn from(err: redis::RedisError) -> Self {
        Self::CacheBackend(err.to_string())
    }
}
