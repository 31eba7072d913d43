//! Best-effort trace records for decoded TCP packets.
//!
//! Sinks must never block the caller. A sink that cannot take a record drops
//! it; the verdict it describes has already been decided.

use crate::dataplane::{DecodedPacket, Decision, Rule, Verdict};
use std::net::Ipv4Addr;
use tokio::sync::mpsc;
use tracing::debug;

/// Summary of one decoded packet and what the filter decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub source_address: Ipv4Addr,
    pub destination_address: Ipv4Addr,
    pub source_port: u16,
    pub destination_port: u16,
    pub payload_length: usize,
    pub verdict: Verdict,
    pub rule: Rule,
}

impl TraceRecord {
    pub fn new(packet: &DecodedPacket, decision: Decision) -> Self {
        Self {
            source_address: packet.source_address,
            destination_address: packet.destination_address,
            source_port: packet.source_port,
            destination_port: packet.destination_port,
            payload_length: packet.payload_length,
            verdict: decision.verdict,
            rule: decision.rule,
        }
    }
}

/// Fire-and-forget destination for trace records
pub trait TraceSink: Send + Sync {
    /// Hand a record to the sink without blocking.
    ///
    /// Returns false when the record was discarded.
    fn emit(&self, record: &TraceRecord) -> bool;
}

/// Discards every record
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn emit(&self, _record: &TraceRecord) -> bool {
        true
    }
}

/// Emits each record as a `tracing` debug event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, record: &TraceRecord) -> bool {
        debug!(
            src = %record.source_address,
            dst = %record.destination_address,
            sport = record.source_port,
            dport = record.destination_port,
            payload_len = record.payload_length,
            verdict = %record.verdict,
            rule = %record.rule,
            "tcp packet"
        );
        true
    }
}

/// Bounded queue towards a consumer task
///
/// `try_send` only: a full or closed channel drops the record.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<TraceRecord>,
}

impl ChannelSink {
    /// Sink plus the receiving end, holding at most `capacity` records
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<TraceRecord>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl TraceSink for ChannelSink {
    fn emit(&self, record: &TraceRecord) -> bool {
        self.tx.try_send(*record).is_ok()
    }
}
