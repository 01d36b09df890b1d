// SPDX-License-Identifier: Apache-2.0

//! Log sinks for printed statements and diagnostic failures

use parking_lot::Mutex;
use tracing::{error, info, warn};

use super::types::LogLine;
use crate::error::PrintError;

/// Destination for printer output. Shared by every invocation.
pub trait LogSink: Send + Sync {
    fn emit(&self, line: &LogLine);

    /// Reports a failure to build the diagnostic for one invocation
    fn diagnostic_error(&self, statement_id: &str, error: &PrintError);
}

/// Default sink: forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, line: &LogLine) {
        if line.slow {
            warn!(statement = %line.statement_id, "{}", line.message);
        } else {
            info!(statement = %line.statement_id, "{}", line.message);
        }
    }

    fn diagnostic_error(&self, statement_id: &str, error: &PrintError) {
        error!(statement = %statement_id, error = ?error, "print sql error: {}", error);
    }
}

/// In-memory sink, for hosts that collect printed statements themselves
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<LogLine>>,
    errors: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines.lock().clone()
    }

    /// Diagnostic failures, rendered as `statement_id: error`
    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
        self.errors.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn emit(&self, line: &LogLine) {
        self.lines.lock().push(line.clone());
    }

    fn diagnostic_error(&self, statement_id: &str, error: &PrintError) {
        self.errors.lock().push(format!("{}: {}", statement_id, error));
    }
}
