// SPDX-License-Identifier: Apache-2.0

//! Interceptor Types
//!
//! Type definitions shared by the SQL printer pipeline.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use sqlprint_core::Value;
use uuid::Uuid;

use super::resolver::{DefaultTypeRegistry, TypeRegistry};
use crate::error::PrintResult;

/// Kind of data-access operation behind a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlCommandType {
    Unknown,
    Insert,
    Update,
    Delete,
    Select,
    Flush,
}

impl Default for SqlCommandType {
    fn default() -> Self {
        Self::Unknown
    }
}

impl SqlCommandType {
    /// Returns true if this operation only reads data
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Select)
    }
}

/// A declarative print filter loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementFilter {
    /// Print only statements whose id matches the regex
    Include { pattern: String },
    /// Never print statements whose id matches the regex
    Exclude { pattern: String },
    /// Print only the listed command types
    Commands { allow: Vec<SqlCommandType> },
}

/// Configuration for the SQL printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterConfig {
    /// Whether the printer does anything at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Print only statements at or above the warn threshold
    #[serde(default = "default_true")]
    pub only_warn_slow: bool,
    /// Slow statement threshold (milliseconds)
    #[serde(default = "default_warn_threshold_ms")]
    pub warn_threshold_ms: u64,
    /// Prefix for slow statement lines
    #[serde(default = "default_warn_marker")]
    pub warn_marker: String,
    /// Print filters, all of which must pass
    #[serde(default)]
    pub filters: Vec<StatementFilter>,
    /// Replace bound values with a redaction marker
    #[serde(default)]
    pub redact_values: bool,
}

fn default_true() -> bool {
    true
}

fn default_warn_threshold_ms() -> u64 {
    500
}

pub const DEFAULT_WARN_MARKER: &str = "===== SLOW SQL =====";

fn default_warn_marker() -> String {
    DEFAULT_WARN_MARKER.to_string()
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            only_warn_slow: true,
            warn_threshold_ms: default_warn_threshold_ms(),
            warn_marker: default_warn_marker(),
            filters: Vec::new(),
            redact_values: false,
        }
    }
}

impl PrinterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn only_warn_slow(mut self, only_warn_slow: bool) -> Self {
        self.only_warn_slow = only_warn_slow;
        self
    }

    pub fn warn_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.warn_threshold_ms = threshold_ms;
        self
    }

    pub fn warn_marker(mut self, marker: impl Into<String>) -> Self {
        self.warn_marker = marker.into();
        self
    }

    pub fn filter(mut self, filter: StatementFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn redact_values(mut self, redact: bool) -> Self {
        self.redact_values = redact;
        self
    }
}

/// Declared binding for one placeholder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMapping {
    /// Property path on the parameter object (`id`, `user.name`, `items[0]`)
    pub property: String,
}

impl ParameterMapping {
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
        }
    }
}

/// A statement template bound to one invocation's parameter object
#[derive(Debug, Clone, Default)]
pub struct BoundSql {
    /// Template text with `?` placeholders
    pub sql: String,
    /// One mapping per placeholder, in placeholder order
    pub parameter_mappings: Vec<ParameterMapping>,
    /// Runtime argument of the invocation
    pub parameter_object: Option<Value>,
    /// Generated parameters that do not exist on the parameter object
    pub additional_parameters: HashMap<String, Value>,
}

impl BoundSql {
    pub fn new(
        sql: impl Into<String>,
        parameter_mappings: Vec<ParameterMapping>,
        parameter_object: Option<Value>,
    ) -> Self {
        Self {
            sql: sql.into(),
            parameter_mappings,
            parameter_object,
            additional_parameters: HashMap::new(),
        }
    }

    pub fn with_additional_parameter(mut self, name: impl Into<String>, value: Value) -> Self {
        self.additional_parameters.insert(name.into(), value);
        self
    }

    pub fn additional_parameter(&self, name: &str) -> Option<&Value> {
        self.additional_parameters.get(name)
    }
}

/// Statement source: everything the printer needs to know about one
/// statement id.
pub trait MappedStatement: Send + Sync {
    /// Unique statement identifier (usually `namespace.method`)
    fn id(&self) -> &str;

    fn command_type(&self) -> SqlCommandType;

    /// Binds the template to the invocation's parameter object
    fn bound_sql(&self, parameter: Option<&Value>) -> PrintResult<BoundSql>;

    /// Decides which parameter objects bind as a single scalar
    fn type_registry(&self) -> &dyn TypeRegistry {
        &DefaultTypeRegistry
    }
}

/// A statement with a fixed template and fixed parameter mappings
#[derive(Debug, Clone)]
pub struct StaticStatement {
    pub id: String,
    pub command_type: SqlCommandType,
    pub sql: String,
    pub parameter_mappings: Vec<ParameterMapping>,
}

impl StaticStatement {
    pub fn new(id: impl Into<String>, command_type: SqlCommandType, sql: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            command_type,
            sql: sql.into(),
            parameter_mappings: Vec::new(),
        }
    }

    pub fn with_parameters<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_mappings
            .extend(properties.into_iter().map(ParameterMapping::new));
        self
    }
}

impl MappedStatement for StaticStatement {
    fn id(&self) -> &str {
        &self.id
    }

    fn command_type(&self) -> SqlCommandType {
        self.command_type
    }

    fn bound_sql(&self, parameter: Option<&Value>) -> PrintResult<BoundSql> {
        Ok(BoundSql::new(
            self.sql.clone(),
            self.parameter_mappings.clone(),
            parameter.cloned(),
        ))
    }
}

/// Result of a wrapped call, as far as the printer cares
pub trait StatementOutcome {
    /// Affected row count for write operations, if the outcome carries one
    fn affected_rows(&self) -> Option<u64> {
        None
    }
}

macro_rules! impl_count_outcome {
    ($($ty:ty),*) => {
        $(
            impl StatementOutcome for $ty {
                fn affected_rows(&self) -> Option<u64> {
                    u64::try_from(*self).ok()
                }
            }
        )*
    };
}

impl_count_outcome!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl StatementOutcome for () {}

impl<T> StatementOutcome for Vec<T> {}

impl<T: StatementOutcome> StatementOutcome for Option<T> {
    fn affected_rows(&self) -> Option<u64> {
        self.as_ref().and_then(StatementOutcome::affected_rows)
    }
}

impl StatementOutcome for Value {
    fn affected_rows(&self) -> Option<u64> {
        match self {
            Value::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }
}

/// Millisecond breakdown of one intercepted invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Timings {
    /// Start of the call to end of reconstruction
    pub total_ms: u64,
    /// The wrapped call alone
    pub exec_ms: u64,
    /// Statement reconstruction alone
    pub reconstruct_ms: u64,
}

impl Timings {
    pub fn new(exec_ms: u64, reconstruct_ms: u64) -> Self {
        Self {
            total_ms: exec_ms + reconstruct_ms,
            exec_ms,
            reconstruct_ms,
        }
    }
}

/// Per-invocation time marks. Lives on the stack of one invocation.
#[derive(Debug, Clone)]
pub struct ExecutionRecord {
    pub id: Uuid,
    started: Instant,
    finished: Instant,
    reconstructed: Option<Instant>,
}

impl ExecutionRecord {
    pub fn new(started: Instant, finished: Instant) -> Self {
        Self {
            id: Uuid::new_v4(),
            started,
            finished,
            reconstructed: None,
        }
    }

    pub fn mark_reconstructed(&mut self) {
        self.reconstructed = Some(Instant::now());
    }

    pub fn timings(&self) -> Timings {
        let reconstructed = self.reconstructed.unwrap_or(self.finished);
        let exec_ms = self.finished.duration_since(self.started).as_millis() as u64;
        let reconstruct_ms = reconstructed
            .saturating_duration_since(self.finished)
            .as_millis() as u64;
        Timings::new(exec_ms, reconstruct_ms)
    }
}

/// A rendered line ready for the log sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogLine {
    pub statement_id: String,
    /// Total time reached the warn threshold
    pub slow: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: PrinterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PrinterConfig::default());
        assert!(config.enabled);
        assert!(config.only_warn_slow);
        assert_eq!(config.warn_threshold_ms, 500);
        assert_eq!(config.warn_marker, "===== SLOW SQL =====");
        assert!(config.filters.is_empty());
    }

    #[test]
    fn test_filter_rules_deserialize() {
        let json = r#"{
            "filters": [
                {"kind": "exclude", "pattern": "^health\\."},
                {"kind": "commands", "allow": ["insert", "update"]}
            ]
        }"#;
        let config: PrinterConfig = serde_json::from_str(json).unwrap();
        assert_eq!(
            config.filters,
            vec![
                StatementFilter::Exclude {
                    pattern: r"^health\.".to_string()
                },
                StatementFilter::Commands {
                    allow: vec![SqlCommandType::Insert, SqlCommandType::Update]
                },
            ]
        );
    }

    #[test]
    fn test_outcome_counts() {
        assert_eq!(3i32.affected_rows(), Some(3));
        assert_eq!((-1i64).affected_rows(), None);
        assert_eq!(().affected_rows(), None);
        assert_eq!(vec![1, 2, 3].affected_rows(), None);
        assert_eq!(Some(7u64).affected_rows(), Some(7));
        assert_eq!(Value::Int(2).affected_rows(), Some(2));
    }

    #[test]
    fn test_record_timings() {
        let finished = Instant::now();
        let started = finished
            .checked_sub(Duration::from_millis(120))
            .expect("monotonic clock too young");
        let mut record = ExecutionRecord::new(started, finished);

        let timings = record.timings();
        assert_eq!(timings.exec_ms, 120);
        assert_eq!(timings.reconstruct_ms, 0);
        assert_eq!(timings.total_ms, 120);

        record.mark_reconstructed();
        let timings = record.timings();
        assert!(timings.total_ms >= timings.exec_ms);
        assert_eq!(timings.total_ms, timings.exec_ms + timings.reconstruct_ms);
    }

    #[test]
    fn test_static_statement_binds_parameter() {
        let statement = StaticStatement::new("user.find", SqlCommandType::Select, "SELECT ?")
            .with_parameters(["id"]);
        let bound = statement.bound_sql(Some(&Value::Int(1))).unwrap();

        assert_eq!(bound.sql, "SELECT ?");
        assert_eq!(bound.parameter_mappings, vec![ParameterMapping::new("id")]);
        assert_eq!(bound.parameter_object, Some(Value::Int(1)));
        assert!(bound.additional_parameters.is_empty());
    }
}
