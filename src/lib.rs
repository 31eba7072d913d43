//! tcpgate - TCP/IPv4 frame filter
//!
//! Decodes Ethernet, IPv4 and TCP headers through a bounds-checked frame view
//! and decides PASS / DROP / ABORT for each frame against a local-address policy.

pub mod capture;
pub mod config;
pub mod dataplane;
pub mod error;
pub mod protocol;
pub mod telemetry;

pub use dataplane::{evaluate_frame, PacketFilter, Verdict};
pub use error::{Error, Result};
