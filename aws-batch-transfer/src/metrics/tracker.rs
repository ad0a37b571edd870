/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::unit::{ByteCountDisplayContext, ByteUnit};
use super::Throughput;

/// Accumulates bytes transferred by a single transfer and logs progress.
///
/// A progress line is logged every time the running total crosses a multiple of the
/// report threshold. The crossing is computed from the cumulative total, so reporting
/// happens at the same byte offsets regardless of the chunk sizes the transport uses.
///
/// Trackers are created through [`ThroughputTracker::enter`], which hands back a
/// [`TransferGuard`] responsible for emitting the closing summary.
#[derive(Debug)]
pub struct ThroughputTracker {
    label: String,
    start: Instant,
    report_threshold: u64,
    total_bytes: AtomicU64,
    reports: AtomicU64,
    finished: AtomicBool,
}

impl ThroughputTracker {
    /// Start tracking a transfer identified by `label`.
    ///
    /// A `report_threshold` of zero is treated as one byte.
    pub fn enter(label: impl Into<String>, report_threshold: u64) -> TransferGuard {
        let tracker = Arc::new(ThroughputTracker {
            label: label.into(),
            start: Instant::now(),
            report_threshold: report_threshold.max(1),
            total_bytes: AtomicU64::new(0),
            reports: AtomicU64::new(0),
            finished: AtomicBool::new(false),
        });
        tracing::info!(target_label = %tracker.label, "transfer started");
        TransferGuard { tracker }
    }

    /// Record `n` more bytes transferred
    pub fn update(&self, n: u64) {
        if n == 0 {
            return;
        }
        let prev = self.total_bytes.fetch_add(n, Ordering::Relaxed);
        let total = prev.saturating_add(n);

        let first = prev / self.report_threshold + 1;
        let last = total / self.report_threshold;
        for mark in first..=last {
            self.reports.fetch_add(1, Ordering::Relaxed);
            let reached = mark * self.report_threshold;
            tracing::info!(
                target_label = %self.label,
                bytes = reached,
                "transferred {}",
                ByteUnit::display(reached)
            );
        }
    }

    /// Bytes recorded so far
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes.load(Ordering::Relaxed)
    }

    /// Number of progress lines logged so far
    pub fn progress_reports(&self) -> u64 {
        self.reports.load(Ordering::Relaxed)
    }

    /// Byte interval between progress lines
    pub fn report_threshold(&self) -> u64 {
        self.report_threshold
    }

    /// Time since the tracker was entered
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn summary(&self, completed: bool) -> TransferSummary {
        TransferSummary {
            label: self.label.clone(),
            total_bytes: self.total_bytes(),
            elapsed: self.elapsed(),
            completed,
        }
    }

    /// Emit the closing summary. Only the first call logs anything.
    fn close(&self, completed: bool) -> Option<TransferSummary> {
        if self.finished.swap(true, Ordering::AcqRel) {
            return None;
        }

        let summary = self.summary(completed);
        let outcome = if completed { "completed" } else { "aborted" };
        tracing::info!(
            target_label = %summary.label,
            total_mib = summary.total_mib(),
            elapsed_secs = summary.elapsed.as_secs_f64(),
            mib_per_sec = summary.mib_per_sec(),
            "transfer finished [{outcome}]: {:.3} in {:.3} s ({:.3})",
            ByteCountDisplayContext::new(summary.total_bytes, ByteUnit::Mebibyte),
            summary.elapsed.as_secs_f64(),
            summary.throughput(),
        );
        Some(summary)
    }
}

/// Scope guard for a tracked transfer.
///
/// Calling [`finish`](TransferGuard::finish) closes the transfer as completed. If the guard is
/// dropped without finishing (e.g. an error was propagated with `?`) the summary is still logged,
/// marked as aborted.
#[derive(Debug)]
pub struct TransferGuard {
    tracker: Arc<ThroughputTracker>,
}

impl TransferGuard {
    /// The tracker owned by this guard
    pub fn tracker(&self) -> &Arc<ThroughputTracker> {
        &self.tracker
    }

    /// Returns a callback suitable for [`CallbackStream`](crate::io::CallbackStream)
    pub fn callback(&self) -> impl FnMut(u64) + Send + Sync + 'static {
        let tracker = self.tracker.clone();
        move |n| tracker.update(n)
    }

    /// Close the transfer as completed and return its summary
    pub fn finish(self) -> TransferSummary {
        self.tracker
            .close(true)
            .unwrap_or_else(|| self.tracker.summary(true))
    }
}

impl Drop for TransferGuard {
    fn drop(&mut self) {
        self.tracker.close(false);
    }
}

/// Final accounting for a transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSummary {
    label: String,
    total_bytes: u64,
    elapsed: Duration,
    completed: bool,
}

impl TransferSummary {
    /// Total bytes transferred
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    /// Total bytes transferred in MiB
    pub fn total_mib(&self) -> f64 {
        ByteUnit::Mebibyte.convert(self.total_bytes)
    }

    /// Wall clock time of the transfer
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Average throughput of the transfer
    pub fn throughput(&self) -> Throughput {
        Throughput::new(self.total_bytes, self.elapsed)
    }

    /// Average throughput in MiB/s
    pub fn mib_per_sec(&self) -> f64 {
        self.throughput().as_unit_per_sec(ByteUnit::Mebibyte)
    }

    /// Whether the transfer ran to completion
    pub fn completed(&self) -> bool {
        self.completed
    }
}
