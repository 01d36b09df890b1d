// SPDX-License-Identifier: Apache-2.0

//! Error types for the SQL printer
//!
//! Errors raised on the diagnostic path (statement lookup, reconstruction,
//! panics in host callbacks) are logged and dropped by the interceptor.
//! Setup errors (config, filters, chain installation) reach the caller.

use sqlprint_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("Reconstruction failed: {0}")]
    Reconstruction(#[from] CoreError),

    #[error("Statement source failed for '{statement_id}': {message}")]
    StatementSource {
        statement_id: String,
        message: String,
    },

    #[error("Diagnostic panicked: {message}")]
    DiagnosticPanic { message: String },

    #[error("Interceptor chain not found on host '{host}'")]
    ChainNotFound { host: String },

    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PrintError {
    pub fn statement_source(statement_id: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::StatementSource {
            statement_id: statement_id.into(),
            message: msg.into(),
        }
    }

    pub fn chain_not_found(host: impl Into<String>) -> Self {
        Self::ChainNotFound { host: host.into() }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}

/// Result type alias for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
