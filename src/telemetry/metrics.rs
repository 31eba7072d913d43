//! Verdict counters.
//!
//! Relaxed atomics only; counters never feed back into a verdict.

use crate::dataplane::{DecodeError, Verdict};
use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counter for thread-safe increment operations.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    /// Creates a new counter initialized to zero.
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Increments the counter by 1.
    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds a value to the counter.
    pub fn add(&self, val: u64) {
        self.0.fetch_add(val, Ordering::Relaxed);
    }

    /// Gets the current value of the counter.
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Filter-wide statistics.
#[derive(Debug, Default)]
pub struct FilterMetrics {
    /// Frames evaluated.
    pub frames: Counter,
    /// Bytes evaluated.
    pub bytes: Counter,
    /// Frames passed.
    pub passed: Counter,
    /// Frames dropped.
    pub dropped: Counter,
    /// Frames aborted for lack of configuration.
    pub aborted: Counter,
    /// Frames dropped because a header did not fit or lied about its length.
    pub malformed: Counter,
    /// Frames passed without inspection (not TCP/IPv4).
    pub out_of_scope: Counter,
    /// Trace records discarded because the sink was full or gone.
    pub trace_dropped: Counter,
}

impl FilterMetrics {
    /// Creates a new, zeroed registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one evaluated frame and its verdict.
    pub fn record_verdict(&self, bytes: usize, verdict: Verdict) {
        self.frames.inc();
        self.bytes.add(bytes as u64);
        match verdict {
            Verdict::Pass => self.passed.inc(),
            Verdict::Drop => self.dropped.inc(),
            Verdict::Abort => self.aborted.inc(),
        }
    }

    /// Records why decoding stopped early.
    pub fn record_decode_error(&self, err: &DecodeError) {
        if err.is_malformed() {
            self.malformed.inc();
        } else {
            self.out_of_scope.inc();
        }
    }

    /// Exports all metrics as key-value pairs.
    pub fn export(&self) -> Vec<(String, u64)> {
        vec![
            ("frames".into(), self.frames.get()),
            ("bytes".into(), self.bytes.get()),
            ("passed".into(), self.passed.get()),
            ("dropped".into(), self.dropped.get()),
            ("aborted".into(), self.aborted.get()),
            ("malformed".into(), self.malformed.get()),
            ("out_of_scope".into(), self.out_of_scope.get()),
            ("trace_dropped".into(), self.trace_dropped.get()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataplane::Layer;

    #[test]
    fn test_counter_basic() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);

        counter.inc();
        assert_eq!(counter.get(), 1);

        counter.add(10);
        assert_eq!(counter.get(), 11);
    }

    #[test]
    fn test_record_verdict() {
        let metrics = FilterMetrics::new();

        metrics.record_verdict(60, Verdict::Pass);
        metrics.record_verdict(40, Verdict::Drop);
        metrics.record_verdict(54, Verdict::Abort);
        metrics.record_verdict(64, Verdict::Pass);

        assert_eq!(metrics.frames.get(), 4);
        assert_eq!(metrics.bytes.get(), 218);
        assert_eq!(metrics.passed.get(), 2);
        assert_eq!(metrics.dropped.get(), 1);
        assert_eq!(metrics.aborted.get(), 1);
    }

    #[test]
    fn test_record_decode_error() {
        let metrics = FilterMetrics::new();

        metrics.record_decode_error(&DecodeError::Truncated(Layer::Tcp));
        metrics.record_decode_error(&DecodeError::BadDataOffset(3));
        metrics.record_decode_error(&DecodeError::NotTcp(17));

        let exported = metrics.export();
        assert!(exported.contains(&("malformed".into(), 2)));
        assert!(exported.contains(&("out_of_scope".into(), 1)));
    }
}
