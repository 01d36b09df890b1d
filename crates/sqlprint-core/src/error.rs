// SPDX-License-Identifier: Apache-2.0

//! Error types for statement reconstruction

use thiserror::Error;

/// Errors raised while rebuilding a literal statement
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// More values were supplied than the template has placeholders.
    #[error("No placeholder left for value #{supplied}: template has {placeholders} placeholder(s)")]
    PlaceholderExhausted { supplied: usize, placeholders: usize },
}

/// Result type alias for reconstruction operations
pub type CoreResult<T> = Result<T, CoreError>;
