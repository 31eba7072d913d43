//! End-to-end behavior of the packet filter

mod common;

use common::{ethernet, tcp_frame};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::thread;
use tcpgate::capture::parse_hex_frames;
use tcpgate::config::{self, ConfigStore};
use tcpgate::dataplane::{DecodeError, Evaluation, Layer, Rule};
use tcpgate::telemetry::ChannelSink;
use tcpgate::{PacketFilter, Verdict};

const LOCAL: Ipv4Addr = Ipv4Addr::new(192, 168, 1, 10);
const REMOTE: Ipv4Addr = Ipv4Addr::new(203, 0, 113, 9);

#[test]
fn test_policy_walkthrough() {
    let store = Arc::new(ConfigStore::with_local_address(LOCAL));
    let filter = PacketFilter::new(store);

    let cases = [
        (tcp_frame(REMOTE, LOCAL, 50000, 80, b"GET /"), Verdict::Pass),
        (tcp_frame(REMOTE, LOCAL, 50000, 443, b""), Verdict::Pass),
        (tcp_frame(REMOTE, LOCAL, 50000, 8080, b""), Verdict::Drop),
        (tcp_frame(REMOTE, LOCAL, 50000, 22, b""), Verdict::Pass),
        (tcp_frame(LOCAL, REMOTE, 22, 50000, b""), Verdict::Pass),
        (tcp_frame(LOCAL, LOCAL, 50000, 6942, b""), Verdict::Pass),
        (tcp_frame(REMOTE, Ipv4Addr::new(10, 9, 9, 9), 1, 2, b""), Verdict::Pass),
        (ethernet(0x86DD, &[0u8; 40]), Verdict::Pass),
        (vec![0u8; 13], Verdict::Drop),
    ];

    for (i, (frame, expected)) in cases.iter().enumerate() {
        assert_eq!(filter.process(frame), *expected, "case {}", i);
    }

    let metrics = filter.metrics();
    assert_eq!(metrics.frames.get(), cases.len() as u64);
    assert_eq!(metrics.dropped.get(), 2);
    assert_eq!(metrics.malformed.get(), 1);
    assert_eq!(metrics.out_of_scope.get(), 1);
}

#[test]
fn test_abort_until_configured() {
    let store = Arc::new(ConfigStore::new());
    let filter = PacketFilter::new(Arc::clone(&store));
    let frame = tcp_frame(REMOTE, LOCAL, 50000, 80, b"");

    assert_eq!(filter.process(&frame), Verdict::Abort);
    // Self and SSH traffic do not need the configuration
    assert_eq!(
        filter.process(&tcp_frame(REMOTE, LOCAL, 50000, 22, b"")),
        Verdict::Pass
    );

    store.set_local_address(LOCAL);
    assert_eq!(filter.process(&frame), Verdict::Pass);

    store.clear();
    assert_eq!(filter.process(&frame), Verdict::Abort);
}

#[test]
fn test_concurrent_evaluation_with_config_swaps() {
    let store = Arc::new(ConfigStore::with_local_address(LOCAL));
    let filter = Arc::new(PacketFilter::new(Arc::clone(&store)));
    let other = Ipv4Addr::new(192, 168, 1, 11);

    // Dropped while LOCAL is configured, passed while `other` is
    let frame = Arc::new(tcp_frame(REMOTE, LOCAL, 50000, 8080, b""));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let filter = Arc::clone(&filter);
            let frame = Arc::clone(&frame);
            thread::spawn(move || {
                for _ in 0..5_000 {
                    let verdict = filter.process(&frame);
                    assert!(verdict == Verdict::Drop || verdict == Verdict::Pass);
                }
            })
        })
        .collect();

    for i in 0..500 {
        store.set_local_address(if i % 2 == 0 { other } else { LOCAL });
    }

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(filter.metrics().frames.get(), 20_000);
    assert_eq!(filter.metrics().aborted.get(), 0);
}

#[test]
fn test_trace_records_match_verdicts() {
    let store = Arc::new(ConfigStore::with_local_address(LOCAL));
    let (sink, mut rx) = ChannelSink::new(16);
    let filter = PacketFilter::with_sink(store, Box::new(sink));

    filter.process(&tcp_frame(REMOTE, LOCAL, 50000, 80, b"abc"));
    filter.process(&tcp_frame(REMOTE, LOCAL, 50000, 25, b""));
    filter.process(&ethernet(0x0806, &[0u8; 28]));

    let first = rx.try_recv().unwrap();
    assert_eq!(first.verdict, Verdict::Pass);
    assert_eq!(first.rule, Rule::WebPort);
    assert_eq!(first.payload_length, 3);

    let second = rx.try_recv().unwrap();
    assert_eq!(second.verdict, Verdict::Drop);
    assert_eq!(second.rule, Rule::LocalDefaultDrop);

    // ARP never reaches the rule evaluator
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_hex_dump_through_filter() {
    let frame = tcp_frame(REMOTE, LOCAL, 50000, 8080, b"");
    let content = format!(
        "# dropped web probe\n{}\n\n{}\n",
        hex::encode(&frame),
        hex::encode(&frame[..30])
    );

    let frames = parse_hex_frames(&content).unwrap();
    assert_eq!(frames.len(), 2);

    let cfg = config::parse(&format!("local_address = \"{}\"", LOCAL)).unwrap();
    let store = Arc::new(ConfigStore::new());
    if let Some(configuration) = cfg.configuration() {
        store.replace(configuration);
    }
    let filter = PacketFilter::new(store);

    match filter.process_evaluation(&frames[0].bytes) {
        Evaluation::Decided(packet, decision) => {
            assert_eq!(packet.destination_port, 8080);
            assert_eq!(decision.verdict, Verdict::Drop);
        }
        other => panic!("unexpected {:?}", other),
    }

    assert_eq!(
        filter.process_evaluation(&frames[1].bytes),
        Evaluation::Terminal(DecodeError::Truncated(Layer::Ipv4))
    );
    assert_eq!(frames[1].line, 4);
}
