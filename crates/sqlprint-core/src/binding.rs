// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::value::Value;

/// Substring carried by parameter names generated from collection expansion
/// (`__frch_item_0`, `__frch_id_1`, ...).
pub const SYNTHETIC_PARAMETER_MARKER: &str = "frch_";

/// A resolved `(name, value)` pair, consumed in placeholder order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    /// Parameter name, `None` for an anonymous placeholder
    pub name: Option<String>,
    pub value: Value,
}

impl Binding {
    pub fn named(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    pub fn anonymous(value: impl Into<Value>) -> Self {
        Self {
            name: None,
            value: value.into(),
        }
    }

    /// Returns true if the name was generated rather than written by a caller
    pub fn is_synthetic(&self) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| name.contains(SYNTHETIC_PARAMETER_MARKER))
    }
}
