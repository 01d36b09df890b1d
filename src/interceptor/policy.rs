// SPDX-License-Identifier: Apache-2.0

//! Logging policy: decides whether a reconstructed statement is printed and
//! renders the printed line.

use super::types::{PrinterConfig, Timings};

/// Mark written in front of every printed statement
pub const LOG_MARK: &str = "sqlprint";

/// Outcome of the print decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Suppress,
    Emit { slow: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingPolicy {
    pub enabled: bool,
    pub only_warn_slow: bool,
    pub warn_threshold_ms: u64,
    pub warn_marker: String,
}

impl LoggingPolicy {
    pub fn from_config(config: &PrinterConfig) -> Self {
        Self {
            enabled: config.enabled,
            only_warn_slow: config.only_warn_slow,
            warn_threshold_ms: config.warn_threshold_ms,
            warn_marker: config.warn_marker.clone(),
        }
    }

    pub fn is_slow(&self, total_ms: u64) -> bool {
        total_ms >= self.warn_threshold_ms
    }

    pub fn decide(&self, timings: &Timings) -> Decision {
        let slow = self.is_slow(timings.total_ms);
        if self.only_warn_slow && !slow {
            Decision::Suppress
        } else {
            Decision::Emit { slow }
        }
    }

    /// `[marker ]total T ms = E ms(exec) + R ms(reconstruct)[, affect count N] method ID`
    /// followed by the statement on its own line. A space separates the
    /// marker from the timing unless the marker already ends in whitespace.
    pub fn render_line(
        &self,
        timings: &Timings,
        slow: bool,
        affected_rows: Option<u64>,
        statement_id: &str,
        sql: &str,
    ) -> String {
        let mut line = String::with_capacity(sql.len() + 128);
        if slow && !self.warn_marker.is_empty() {
            line.push_str(&self.warn_marker);
            if !self.warn_marker.ends_with(char::is_whitespace) {
                line.push(' ');
            }
        }
        line.push_str(&format!(
            "total {} ms = {} ms(exec) + {} ms(reconstruct)",
            timings.total_ms, timings.exec_ms, timings.reconstruct_ms
        ));
        if let Some(count) = affected_rows {
            line.push_str(&format!(", affect count {}", count));
        }
        line.push_str(&format!(
            " method {}\n  /* {} */ {}",
            statement_id, LOG_MARK, sql
        ));
        line
    }
}

impl Default for LoggingPolicy {
    fn default() -> Self {
        Self::from_config(&PrinterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_only_warn_slow_suppresses_fast_statements() {
        let policy = LoggingPolicy::default();
        assert_eq!(policy.decide(&Timings::new(100, 20)), Decision::Suppress);
        assert_eq!(
            policy.decide(&Timings::new(650, 50)),
            Decision::Emit { slow: true }
        );
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = LoggingPolicy::default();
        assert_eq!(
            policy.decide(&Timings::new(500, 0)),
            Decision::Emit { slow: true }
        );
        assert_eq!(policy.decide(&Timings::new(499, 0)), Decision::Suppress);
    }

    #[test]
    fn test_print_all_marks_only_slow_ones() {
        let policy = LoggingPolicy::from_config(&PrinterConfig::new().only_warn_slow(false));
        assert_eq!(
            policy.decide(&Timings::new(1, 0)),
            Decision::Emit { slow: false }
        );
        assert_eq!(
            policy.decide(&Timings::new(900, 0)),
            Decision::Emit { slow: true }
        );
    }

    #[test]
    fn test_render_fast_select() {
        let policy = LoggingPolicy::default();
        let line = policy.render_line(
            &Timings::new(12, 1),
            false,
            None,
            "user.findById",
            "SELECT * FROM users WHERE id = 1 /*id*/",
        );
        assert_eq!(
            line,
            "total 13 ms = 12 ms(exec) + 1 ms(reconstruct) method user.findById\n  /* sqlprint */ SELECT * FROM users WHERE id = 1 /*id*/"
        );
    }

    #[test]
    fn test_render_slow_update_with_count() {
        let policy = LoggingPolicy::default();
        let line = policy.render_line(
            &Timings::new(700, 2),
            true,
            Some(3),
            "user.touch",
            "UPDATE users SET seen = 1",
        );
        assert_eq!(
            line,
            "===== SLOW SQL ===== total 702 ms = 700 ms(exec) + 2 ms(reconstruct), affect count 3 method user.touch\n  /* sqlprint */ UPDATE users SET seen = 1"
        );
    }

    #[test]
    fn test_marker_spacing() {
        let timings = Timings::new(900, 0);
        let spaced = LoggingPolicy::from_config(&PrinterConfig::new().warn_marker("[SLOW] "));
        assert!(spaced
            .render_line(&timings, true, None, "a.b", "SELECT 1")
            .starts_with("[SLOW] total 900 ms"));

        let bare = LoggingPolicy::from_config(&PrinterConfig::new().warn_marker(""));
        assert!(bare
            .render_line(&timings, true, None, "a.b", "SELECT 1")
            .starts_with("total 900 ms"));
    }

    proptest! {
        #[test]
        fn prop_decision_follows_threshold(
            exec in 0u64..10_000,
            reconstruct in 0u64..100,
            threshold in 0u64..10_000,
            only_warn_slow in any::<bool>(),
        ) {
            let policy = LoggingPolicy::from_config(
                &PrinterConfig::new()
                    .only_warn_slow(only_warn_slow)
                    .warn_threshold_ms(threshold),
            );
            let timings = Timings::new(exec, reconstruct);
            let slow = exec + reconstruct >= threshold;

            let expected = if only_warn_slow && !slow {
                Decision::Suppress
            } else {
                Decision::Emit { slow }
            };
            prop_assert_eq!(policy.decide(&timings), expected);
        }

        #[test]
        fn prop_raising_threshold_never_adds_output(
            total in 0u64..10_000,
            low in 0u64..10_000,
            raise in 0u64..10_000,
        ) {
            let at = |threshold| {
                LoggingPolicy::from_config(&PrinterConfig::new().warn_threshold_ms(threshold))
                    .decide(&Timings::new(total, 0))
            };
            if at(low + raise) != Decision::Suppress {
                prop_assert_ne!(at(low), Decision::Suppress);
            }
        }
    }
}
