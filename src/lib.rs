// SPDX-License-Identifier: Apache-2.0

// sqlprint - executable SQL printer
// Core library

pub mod config;
pub mod error;
pub mod interceptor;
pub mod observability;

pub use error::{PrintError, PrintResult};
pub use interceptor::{
    BoundSql, MappedStatement, ParameterMapping, PrinterConfig, SqlCommandType,
    SqlPrintInterceptor, StaticStatement, StatementFilter, StatementOutcome,
};
pub use sqlprint_core::{normalize, Binding, SqlPrinter, Value, ValueKind};
