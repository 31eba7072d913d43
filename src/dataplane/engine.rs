//! Per-frame evaluation
//!
//! `evaluate_frame` is the pure entry point. `PacketFilter` wraps it with the
//! shared configuration store, counters and a trace sink.

use super::decoder::{self, DecodeError};
use super::filter::{self, Decision, Verdict};
use crate::config::{ConfigStore, Configuration};
use crate::protocol::FrameView;
use crate::telemetry::{FilterMetrics, NullSink, TraceRecord, TraceSink};
use std::sync::Arc;
use tracing::trace;

/// Outcome of one evaluation, before it is collapsed to a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Decoding stopped early
    Terminal(DecodeError),
    /// A TCP packet reached the rule evaluator
    Decided(decoder::DecodedPacket, Decision),
}

impl Evaluation {
    pub fn verdict(&self) -> Verdict {
        match self {
            Evaluation::Terminal(err) => err.verdict(),
            Evaluation::Decided(_, decision) => decision.verdict,
        }
    }
}

/// Decode `frame` and run the rules over it
pub fn evaluate_frame(frame: &[u8], config: Option<&Configuration>) -> Verdict {
    inspect(FrameView::new(frame), config).verdict()
}

/// Full outcome for a frame with an explicit extent
pub fn inspect(view: FrameView<'_>, config: Option<&Configuration>) -> Evaluation {
    match decoder::decode_view(view) {
        Ok(packet) => Evaluation::Decided(packet, filter::decide(&packet, config)),
        Err(err) => Evaluation::Terminal(err),
    }
}

/// Filter bound to a configuration store, counters and a trace sink
pub struct PacketFilter {
    config: Arc<ConfigStore>,
    metrics: Arc<FilterMetrics>,
    sink: Box<dyn TraceSink>,
}

impl PacketFilter {
    /// Filter without tracing
    pub fn new(config: Arc<ConfigStore>) -> Self {
        Self::with_sink(config, Box::new(NullSink))
    }

    pub fn with_sink(config: Arc<ConfigStore>, sink: Box<dyn TraceSink>) -> Self {
        Self {
            config,
            metrics: Arc::new(FilterMetrics::new()),
            sink,
        }
    }

    /// Share an existing metrics registry
    pub fn with_metrics(mut self, metrics: Arc<FilterMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<FilterMetrics> {
        &self.metrics
    }

    /// Evaluate one frame against the current configuration snapshot
    pub fn process(&self, frame: &[u8]) -> Verdict {
        self.process_evaluation(frame).verdict()
    }

    /// Like [`process`](Self::process), keeping the full outcome
    pub fn process_evaluation(&self, frame: &[u8]) -> Evaluation {
        let snapshot = self.config.snapshot();
        let evaluation = inspect(FrameView::new(frame), snapshot.as_deref());
        let verdict = evaluation.verdict();

        self.metrics.record_verdict(frame.len(), verdict);
        match &evaluation {
            Evaluation::Terminal(err) => {
                self.metrics.record_decode_error(err);
                trace!(len = frame.len(), reason = %err, %verdict, "frame not inspected");
            }
            Evaluation::Decided(packet, decision) => {
                if !self.sink.emit(&TraceRecord::new(packet, *decision)) {
                    self.metrics.trace_dropped.inc();
                }
            }
        }

        evaluation
    }
}
