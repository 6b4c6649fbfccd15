//! Per-target statistics aggregation.
//!
//! Each monitored URL owns exactly one [`Stats`] instance. The poll loop for
//! that URL is the only writer; the web handlers and the renderer read
//! concurrently through the same instance-level lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// The per-target aggregator map. Built once at startup and never
/// structurally mutated afterward, so lookups need no lock of their own.
pub type StatsMap = HashMap<String, Arc<Stats>>;

/// Outcome of one completed fetch attempt. Immutable once recorded.
#[derive(Debug, Clone)]
pub struct PollResult {
    /// When the fetch started.
    pub date: DateTime<Utc>,
    /// Wall-clock time from request start to full body read.
    pub duration: Duration,
    /// Whether the response status was in `200..400`.
    pub ok: bool,
    /// Response body size in whole KiB (0 on transport failure).
    pub size_kib: u64,
}

/// Aggregate view over a target's full result log at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    pub min_duration: Duration,
    pub avg_duration: Duration,
    pub max_duration: Duration,
    pub min_size: u64,
    pub avg_size: u64,
    pub max_size: u64,
    pub success: u64,
    pub total: u64,
}

#[derive(Debug, Default)]
struct StatsInner {
    results: Vec<PollResult>,
    success_count: u64,
}

/// Thread-safe result log for a single target.
///
/// The log is append-only and chronological (the poll loop admits at most
/// one fetch in flight per target) and grows unbounded for the process
/// lifetime; there is no retention policy.
#[derive(Debug, Default)]
pub struct Stats {
    inner: Mutex<StatsInner>,
}

impl Stats {
    /// Append one result to the log.
    pub fn record(&self, result: PollResult) {
        let mut inner = self.inner.lock().unwrap();
        if result.ok {
            inner.success_count += 1;
        }
        inner.results.push(result);
    }

    /// Compute min/avg/max duration and size over the whole log.
    ///
    /// Returns `None` when nothing has been recorded yet, never a
    /// zero-valued report. Averages are integer truncation of `sum / count`,
    /// recomputed from the full log on every call.
    pub fn report(&self) -> Option<StatsReport> {
        let inner = self.inner.lock().unwrap();

        if inner.results.is_empty() {
            return None;
        }

        let count = inner.results.len() as u64;

        let mut min_duration = inner.results[0].duration;
        let mut max_duration = inner.results[0].duration;
        let mut total_duration = Duration::ZERO;

        for r in &inner.results {
            min_duration = min_duration.min(r.duration);
            max_duration = max_duration.max(r.duration);
            total_duration += r.duration;
        }

        let mut min_size = inner.results[0].size_kib;
        let mut max_size = inner.results[0].size_kib;
        let mut total_size = 0u64;

        for r in &inner.results {
            min_size = min_size.min(r.size_kib);
            max_size = max_size.max(r.size_kib);
            total_size += r.size_kib;
        }

        Some(StatsReport {
            min_duration,
            avg_duration: truncating_avg(total_duration, count),
            max_duration,
            min_size,
            avg_size: total_size / count,
            max_size,
            success: inner.success_count,
            total: count,
        })
    }

    /// Return one page of the log plus the total log length, both observed
    /// under a single lock acquisition.
    ///
    /// Indices are clamped into `[0, total]`; a page past the end yields an
    /// empty slice, never an out-of-range access.
    pub fn page_of(&self, page: usize, page_size: usize) -> (Vec<PollResult>, usize) {
        let inner = self.inner.lock().unwrap();
        let total = inner.results.len();

        let start = page.saturating_sub(1).saturating_mul(page_size).min(total);
        let end = (start + page_size).min(total);

        (inner.results[start..end].to_vec(), total)
    }
}

/// Truncating average over the full sum, computed in nanoseconds so counts
/// beyond `u32::MAX` divide without loss.
fn truncating_avg(total: Duration, count: u64) -> Duration {
    let nanos = total.as_nanos() / u128::from(count);

    // The average never exceeds the total, so both halves fit their types.
    let secs = (nanos / 1_000_000_000) as u64;
    let subsec = (nanos % 1_000_000_000) as u32;

    Duration::new(secs, subsec)
}
