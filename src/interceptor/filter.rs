// SPDX-License-Identifier: Apache-2.0

//! Print Filter Chain
//!
//! Ordered predicates over statements. A statement is printed only if every
//! predicate accepts it; evaluation stops at the first rejection so the
//! reconstruction cost is never paid for filtered statements.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use super::types::{MappedStatement, StatementFilter};
use crate::error::{PrintError, PrintResult};

/// A single print predicate; `true` means "print"
pub type StatementPredicate = Arc<dyn Fn(&dyn MappedStatement) -> bool + Send + Sync>;

/// Filter chain, built during setup and read-only afterwards
#[derive(Clone, Default)]
pub struct FilterChain {
    predicates: Vec<StatementPredicate>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles configured filter rules, in order
    pub fn from_rules(rules: &[StatementFilter]) -> PrintResult<Self> {
        let mut chain = Self::new();
        for rule in rules {
            chain.predicates.push(compile_rule(rule)?);
        }
        Ok(chain)
    }

    /// Appends a predicate at the end of the chain
    pub fn push<F>(&mut self, predicate: F)
    where
        F: Fn(&dyn MappedStatement) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
    }

    /// Returns true if every predicate accepts the statement
    pub fn allows(&self, statement: &dyn MappedStatement) -> bool {
        self.predicates.iter().all(|predicate| predicate(statement))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}

fn compile_rule(rule: &StatementFilter) -> PrintResult<StatementPredicate> {
    let predicate: StatementPredicate = match rule {
        StatementFilter::Include { pattern } => {
            let regex = compile_pattern(pattern)?;
            Arc::new(move |statement: &dyn MappedStatement| regex.is_match(statement.id()))
        }
        StatementFilter::Exclude { pattern } => {
            let regex = compile_pattern(pattern)?;
            Arc::new(move |statement: &dyn MappedStatement| !regex.is_match(statement.id()))
        }
        StatementFilter::Commands { allow } => {
            let allow = allow.clone();
            Arc::new(move |statement: &dyn MappedStatement| {
                allow.contains(&statement.command_type())
            })
        }
    };
    Ok(predicate)
}

fn compile_pattern(pattern: &str) -> PrintResult<Regex> {
    Regex::new(pattern).map_err(|e| PrintError::InvalidFilter {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
