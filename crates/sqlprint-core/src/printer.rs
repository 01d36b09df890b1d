// SPDX-License-Identifier: Apache-2.0

//! Reconstruction engine
//!
//! Rebuilds a literal statement from a `?` template by substituting one
//! formatted value per placeholder, left to right. The template is opaque
//! text: no SQL is parsed, so a `?` inside a string literal is a placeholder
//! like any other.

use chrono::Local;

use crate::binding::SYNTHETIC_PARAMETER_MARKER;
use crate::error::{CoreError, CoreResult};
use crate::normalize::normalize;
use crate::value::Value;

/// Positional placeholder token
pub const PLACEHOLDER: char = '?';

/// `yyyy-MM-dd HH:mm:ss.SSS`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Single-use builder for one reconstructed statement
#[derive(Debug)]
pub struct SqlPrinter {
    template: String,
    sql: String,
    cursor: usize,
    bound: usize,
}

impl SqlPrinter {
    pub fn new(template: &str) -> Self {
        let template = normalize(template);
        let sql = String::with_capacity(template.len() * 2);
        Self {
            template,
            sql,
            cursor: 0,
            bound: 0,
        }
    }

    /// Substitutes the next placeholder with `value`.
    ///
    /// Values must arrive in the order their placeholders appear. Supplying
    /// more values than placeholders fails and leaves the builder unchanged.
    pub fn set_next_value(&mut self, name: Option<&str>, value: &Value) -> CoreResult<()> {
        let index = self.template[self.cursor..]
            .find(PLACEHOLDER)
            .map(|offset| self.cursor + offset)
            .ok_or(CoreError::PlaceholderExhausted {
                supplied: self.bound + 1,
                placeholders: self.bound,
            })?;

        self.sql.push_str(&self.template[self.cursor..index]);
        self.sql.push_str(&format_value(name, value));
        self.cursor = index + PLACEHOLDER.len_utf8();
        self.bound += 1;
        Ok(())
    }

    /// Number of placeholders substituted so far
    pub fn bound_count(&self) -> usize {
        self.bound
    }

    /// Appends the rest of the template and returns the normalized statement.
    /// Placeholders that were never substituted are kept as-is.
    pub fn build(mut self) -> String {
        self.sql.push_str(&self.template[self.cursor..]);
        normalize(&self.sql)
    }
}

/// Renders one bound value as it appears in the printed statement.
///
/// Temporal values print the current local time, not the bound instant.
/// Text is quoted without escaping embedded quotes.
pub fn format_value(name: Option<&str>, value: &Value) -> String {
    let rendered = match value {
        Value::Null => "NULL".to_string(),
        v if v.is_temporal() => format!("'{}'", Local::now().format(TIMESTAMP_FORMAT)),
        Value::Text(text) => format!("'{}'", text),
        other => other.to_string(),
    };

    match name {
        Some(name) if !name.is_empty() && !name.contains(SYNTHETIC_PARAMETER_MARKER) => {
            format!("{} /*{}*/", rendered, name)
        }
        _ => rendered,
    }
}
