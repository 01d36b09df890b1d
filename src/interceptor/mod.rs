// SPDX-License-Identifier: Apache-2.0

//! SQL Print Interceptor
//!
//! Wraps statement executions to print the executable SQL they ran:
//! - **Reconstruction**: bound parameters substituted into the template
//! - **Timing**: execution and reconstruction cost for every statement
//! - **Policy**: print everything, or only statements over a warn threshold
//! - **Filters**: per-statement opt-out before any reconstruction work
//! - **Registration**: keeps the printer first in a host's interceptor chain

pub mod chain;
pub mod filter;
pub mod pipeline;
pub mod policy;
pub mod profiling;
pub mod resolver;
pub mod sink;
pub mod types;

pub use chain::{install, install_all, ChainHost, Interceptor, InterceptorChain};
pub use filter::{FilterChain, StatementPredicate};
pub use pipeline::SqlPrintInterceptor;
pub use policy::{Decision, LoggingPolicy, LOG_MARK};
pub use profiling::{PrinterStats, PrinterStatsSnapshot};
pub use resolver::{resolve_bindings, DefaultTypeRegistry, TypeRegistry};
pub use sink::{LogSink, MemorySink, TracingSink};
pub use types::*;
