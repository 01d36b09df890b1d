// SPDX-License-Identifier: Apache-2.0

//! Parameter Resolver
//!
//! Turns a bound statement into the ordered `(name, value)` list the
//! reconstruction engine consumes. Either the whole parameter object binds
//! to a single placeholder, or one property is extracted per declared
//! mapping.

use sqlprint_core::{Binding, Value, ValueKind};

use super::types::BoundSql;

/// Capability answering "does this argument bind as one scalar?"
pub trait TypeRegistry: Send + Sync {
    fn is_scalar(&self, kind: ValueKind) -> bool;
}

/// Every shape except `Record` and `Array` is scalar
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeRegistry;

impl TypeRegistry for DefaultTypeRegistry {
    fn is_scalar(&self, kind: ValueKind) -> bool {
        !matches!(kind, ValueKind::Record | ValueKind::Array)
    }
}

/// Resolves one binding per placeholder, in declaration order.
///
/// A null parameter object counts as absent and yields no bindings. A
/// property missing from both the parameter object and the additional
/// parameters resolves to `NULL`.
pub fn resolve_bindings(bound: &BoundSql, registry: &dyn TypeRegistry) -> Vec<Binding> {
    let parameter = match bound.parameter_object.as_ref() {
        Some(parameter) if !parameter.is_null() && !bound.parameter_mappings.is_empty() => {
            parameter
        }
        _ => return Vec::new(),
    };

    if registry.is_scalar(parameter.kind()) {
        return vec![Binding::anonymous(parameter.clone())];
    }

    bound
        .parameter_mappings
        .iter()
        .map(|mapping| {
            let path = PropertyPath::parse(&mapping.property);
            let value = path
                .lookup(parameter)
                .or_else(|| path.lookup_additional(bound))
                .cloned()
                .unwrap_or(Value::Null);
            Binding::named(mapping.property.clone(), value)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Key(&'a str),
    /// `[..]` suffix: array index or record key
    Index(&'a str),
}

/// A property expression such as `user.addresses[0].city`
#[derive(Debug, Clone, PartialEq, Eq)]
struct PropertyPath<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> PropertyPath<'a> {
    fn parse(expr: &'a str) -> Self {
        let mut segments = Vec::new();
        for part in expr.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(open) => (&part[..open], &part[open..]),
                None => (part, ""),
            };
            segments.push(Segment::Key(key));

            while let Some(stripped) = rest.strip_prefix('[') {
                match stripped.find(']') {
                    Some(close) => {
                        segments.push(Segment::Index(&stripped[..close]));
                        rest = &stripped[close + 1..];
                    }
                    None => {
                        // Unbalanced bracket: keep the raw text as a key
                        segments.push(Segment::Key(rest));
                        break;
                    }
                }
            }
        }
        Self { segments }
    }

    /// Value at this path on the parameter object, `None` if not exposed
    fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        navigate(root, &self.segments)
    }

    /// Falls back to the generated parameters, keyed by the first segment
    fn lookup_additional<'v>(&self, bound: &'v BoundSql) -> Option<&'v Value> {
        let (first, rest) = self.segments.split_first()?;
        let Segment::Key(name) = first else {
            return None;
        };
        let root = bound.additional_parameter(name)?;
        navigate(root, rest)
    }
}

fn navigate<'v>(root: &'v Value, segments: &[Segment<'_>]) -> Option<&'v Value> {
    segments
        .iter()
        .try_fold(root, |current, segment| match segment {
            Segment::Key(key) => current.field(key),
            Segment::Index(index) => match current {
                Value::Array(_) => index.parse::<usize>().ok().and_then(|i| current.element(i)),
                Value::Record(_) => current.field(index),
                _ => None,
            },
        })
}
