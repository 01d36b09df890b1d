// SPDX-License-Identifier: Apache-2.0

//! SQL Print Interceptor
//!
//! Wraps each statement execution:
//! 1. Execution: the wrapped call runs and is timed
//! 2. Diagnostic: filters, parameter resolution, statement reconstruction
//! 3. Decision: the logging policy prints or suppresses the statement
//!
//! The diagnostic stage runs after the call whether it succeeded or not,
//! and nothing it does can change what the caller receives.

use std::any::Any;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use sqlprint_core::{SqlPrinter, Value};
use tracing::{debug, info};

use super::chain::{self, ChainHost, Interceptor};
use super::filter::FilterChain;
use super::policy::{Decision, LoggingPolicy, LOG_MARK};
use super::profiling::{PrinterStats, PrinterStatsSnapshot};
use super::resolver::resolve_bindings;
use super::sink::{LogSink, TracingSink};
use super::types::{ExecutionRecord, LogLine, MappedStatement, PrinterConfig, StatementOutcome};
use crate::error::{PrintError, PrintResult};
use crate::observability::Sensitive;

/// The SQL print interceptor.
///
/// Built once during setup, then shared (`Arc`) by every executing thread.
/// Nothing in it is mutated after construction except the stats counters.
pub struct SqlPrintInterceptor {
    policy: LoggingPolicy,
    filters: FilterChain,
    redact_values: bool,
    sink: Arc<dyn LogSink>,
    stats: PrinterStats,
}

impl SqlPrintInterceptor {
    /// Creates an interceptor from configuration, compiling its filter rules
    pub fn new(config: PrinterConfig) -> PrintResult<Self> {
        let filters = FilterChain::from_rules(&config.filters)?;
        let policy = LoggingPolicy::from_config(&config);

        info!(
            enabled = policy.enabled,
            only_warn_slow = policy.only_warn_slow,
            warn_threshold_ms = policy.warn_threshold_ms,
            filters = filters.len(),
            "SQL printer initialized"
        );

        Ok(Self {
            policy,
            filters,
            redact_values: config.redact_values,
            sink: Arc::new(TracingSink),
            stats: PrinterStats::new(),
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Appends a print predicate after the configured filters
    pub fn with_filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&dyn MappedStatement) -> bool + Send + Sync + 'static,
    {
        self.filters.push(predicate);
        self
    }

    pub fn policy(&self) -> &LoggingPolicy {
        &self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.enabled
    }

    pub fn stats(&self) -> PrinterStatsSnapshot {
        self.stats.snapshot()
    }

    /// Registers this instance at the head of a host chain
    pub fn install(self: &Arc<Self>, host: &dyn ChainHost) -> PrintResult<()> {
        let this: Arc<dyn Interceptor> = Arc::clone(self) as Arc<dyn Interceptor>;
        chain::install(&this, host)
    }

    /// Runs `call` and prints the statement it executed.
    ///
    /// The returned value is always exactly what `call` produced. The
    /// statement is printed even when `call` panics or is dropped before
    /// completing; the panic then keeps unwinding unchanged.
    pub async fn intercept<T, E, Fut>(
        &self,
        statement: &dyn MappedStatement,
        parameter: Option<&Value>,
        call: Fut,
    ) -> Result<T, E>
    where
        T: StatementOutcome,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.policy.enabled {
            return call.await;
        }

        let mut guard = CompletionGuard::start(self, statement, parameter);
        let result = call.await;
        guard.finish(&result);
        result
    }

    /// Blocking counterpart of [`intercept`](Self::intercept)
    pub fn intercept_blocking<T, E, F>(
        &self,
        statement: &dyn MappedStatement,
        parameter: Option<&Value>,
        call: F,
    ) -> Result<T, E>
    where
        T: StatementOutcome,
        F: FnOnce() -> Result<T, E>,
    {
        if !self.policy.enabled {
            return call();
        }

        let mut guard = CompletionGuard::start(self, statement, parameter);
        let result = call();
        guard.finish(&result);
        result
    }

    /// Diagnostic boundary: failures and panics end here
    fn after_execution(
        &self,
        statement: &dyn MappedStatement,
        parameter: Option<&Value>,
        outcome: Option<u64>,
        mut record: ExecutionRecord,
    ) {
        self.stats.record_intercepted();

        let error = match catch_unwind(AssertUnwindSafe(|| {
            self.print(statement, parameter, outcome, &mut record)
        })) {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(payload) => PrintError::DiagnosticPanic {
                message: panic_message(payload.as_ref()),
            },
        };

        self.stats.record_diagnostic_error();
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.sink.diagnostic_error(statement.id(), &error)
        }));
    }

    /// `affected_rows` is the wrapped call's row count; `None` when the call
    /// failed, panicked or carries no count
    fn print(
        &self,
        statement: &dyn MappedStatement,
        parameter: Option<&Value>,
        affected_rows: Option<u64>,
        record: &mut ExecutionRecord,
    ) -> PrintResult<()> {
        if !self.filters.allows(statement) {
            self.stats.record_filtered();
            return Ok(());
        }

        let sql = self.reconstruct(statement, parameter)?;
        record.mark_reconstructed();
        let timings = record.timings();

        match self.policy.decide(&timings) {
            Decision::Suppress => {
                self.stats.record_suppressed(timings.total_ms);
                debug!(
                    statement = statement.id(),
                    invocation = %record.id,
                    total_ms = timings.total_ms,
                    "Statement below warn threshold"
                );
            }
            Decision::Emit { slow } => {
                let affected_rows =
                    affected_rows.filter(|_| !statement.command_type().is_read());
                let message = self.policy.render_line(
                    &timings,
                    slow,
                    affected_rows,
                    statement.id(),
                    &sql,
                );
                self.sink.emit(&LogLine {
                    statement_id: statement.id().to_string(),
                    slow,
                    message,
                });
                self.stats.record_printed(slow, timings.total_ms);
            }
        }
        Ok(())
    }

    /// Binds, resolves, and substitutes the statement's parameters
    fn reconstruct(
        &self,
        statement: &dyn MappedStatement,
        parameter: Option<&Value>,
    ) -> PrintResult<String> {
        let bound = statement.bound_sql(parameter)?;
        let bindings = resolve_bindings(&bound, statement.type_registry());

        self.stats.record_reconstruction();
        let mut printer = SqlPrinter::new(&bound.sql);
        for binding in &bindings {
            let name = binding.name.as_deref();
            if self.redact_values && !binding.value.is_null() {
                let redacted = Value::Text(Sensitive::new(&binding.value).to_string());
                printer.set_next_value(name, &redacted)?;
            } else {
                printer.set_next_value(name, &binding.value)?;
            }
        }
        Ok(printer.build())
    }
}

impl Interceptor for SqlPrintInterceptor {
    fn name(&self) -> &str {
        LOG_MARK
    }
}

/// Runs the diagnostic stage when dropped, so a panicking or cancelled call
/// is still timed and printed
struct CompletionGuard<'a> {
    printer: &'a SqlPrintInterceptor,
    statement: &'a dyn MappedStatement,
    parameter: Option<&'a Value>,
    started: Instant,
    finished: Option<Instant>,
    affected_rows: Option<u64>,
}

impl<'a> CompletionGuard<'a> {
    fn start(
        printer: &'a SqlPrintInterceptor,
        statement: &'a dyn MappedStatement,
        parameter: Option<&'a Value>,
    ) -> Self {
        Self {
            printer,
            statement,
            parameter,
            started: Instant::now(),
            finished: None,
            affected_rows: None,
        }
    }

    fn finish<T: StatementOutcome, E>(&mut self, result: &Result<T, E>) {
        self.finished = Some(Instant::now());
        self.affected_rows = result.as_ref().ok().and_then(|outcome| outcome.affected_rows());
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        let finished = self.finished.unwrap_or_else(Instant::now);
        self.printer.after_execution(
            self.statement,
            self.parameter,
            self.affected_rows,
            ExecutionRecord::new(self.started, finished),
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown cause".to_string()
    }
}
