// SPDX-License-Identifier: Apache-2.0

//! Printer Statistics
//!
//! Lock-free counters describing what the printer did with each
//! intercepted invocation.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct PrinterStats {
    intercepted: AtomicU64,
    printed: AtomicU64,
    slow: AtomicU64,
    suppressed: AtomicU64,
    filtered: AtomicU64,
    reconstructions: AtomicU64,
    diagnostic_errors: AtomicU64,
    max_total_ms: AtomicU64,
}

impl PrinterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_intercepted(&self) {
        self.intercepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reconstruction(&self) {
        self.reconstructions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suppressed(&self, total_ms: u64) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
        self.update_max(total_ms);
    }

    pub fn record_printed(&self, slow: bool, total_ms: u64) {
        self.printed.fetch_add(1, Ordering::Relaxed);
        if slow {
            self.slow.fetch_add(1, Ordering::Relaxed);
        }
        self.update_max(total_ms);
    }

    pub fn record_diagnostic_error(&self) {
        self.diagnostic_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn update_max(&self, total_ms: u64) {
        let mut current = self.max_total_ms.load(Ordering::Relaxed);
        while total_ms > current {
            match self.max_total_ms.compare_exchange(
                current,
                total_ms,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(next) => current = next,
            }
        }
    }

    pub fn snapshot(&self) -> PrinterStatsSnapshot {
        PrinterStatsSnapshot {
            intercepted: self.intercepted.load(Ordering::Relaxed),
            printed: self.printed.load(Ordering::Relaxed),
            slow: self.slow.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            reconstructions: self.reconstructions.load(Ordering::Relaxed),
            diagnostic_errors: self.diagnostic_errors.load(Ordering::Relaxed),
            max_total_ms: self.max_total_ms.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PrinterStatsSnapshot {
    pub intercepted: u64,
    pub printed: u64,
    pub slow: u64,
    pub suppressed: u64,
    pub filtered: u64,
    pub reconstructions: u64,
    pub diagnostic_errors: u64,
    pub max_total_ms: u64,
}
