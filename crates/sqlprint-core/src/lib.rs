// SPDX-License-Identifier: Apache-2.0

//! Statement reconstruction primitives for sqlprint.
//!
//! Everything in this crate is pure: no logging, no I/O, no shared state.
//! - [`normalize`] collapses whitespace runs in statement text
//! - [`SqlPrinter`] substitutes bound values into `?` placeholders
//! - [`Value`] and [`Binding`] describe what gets substituted

pub mod binding;
pub mod error;
pub mod normalize;
pub mod printer;
pub mod value;

pub use binding::{Binding, SYNTHETIC_PARAMETER_MARKER};
pub use error::{CoreError, CoreResult};
pub use normalize::normalize;
pub use printer::{format_value, SqlPrinter, PLACEHOLDER, TIMESTAMP_FORMAT};
pub use value::{Value, ValueKind};
