//! Data plane components
//!
//! Frame decoding, rule evaluation and the per-frame entry point.

mod decoder;
mod engine;
mod filter;

pub use decoder::{decode, decode_view, DecodeError, DecodedPacket, Layer};
pub use engine::{evaluate_frame, inspect, Evaluation, PacketFilter};
pub use filter::{decide, evaluate, Decision, Rule, Verdict, SSH_PORT, WEB_PORTS};
