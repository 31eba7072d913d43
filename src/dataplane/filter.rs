//! Rule evaluator
//!
//! Ordered policy over a decoded TCP/IPv4 packet:
//! 1. Self traffic (source == destination) passes
//! 2. SSH in either direction passes
//! 3. Without a configuration nothing else can be decided: abort
//! 4. Traffic to the local address passes from the local address itself or
//!    to a web port, everything else to it is dropped
//! 5. Traffic not addressed to the local address passes

use super::decoder::DecodedPacket;
use crate::config::Configuration;
use std::fmt;

/// SSH port, allowed in both directions
pub const SSH_PORT: u16 = 22;
/// Web ports allowed towards the local address
pub const WEB_PORTS: [u16; 2] = [80, 443];

/// Filter verdict for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Forward the frame
    Pass,
    /// Silently discard the frame
    Drop,
    /// The filter cannot decide safely (missing configuration)
    Abort,
}

impl Verdict {
    /// Matching XDP action code (XDP_ABORTED = 0, XDP_DROP = 1, XDP_PASS = 2)
    pub fn xdp_action(self) -> u32 {
        match self {
            Verdict::Abort => 0,
            Verdict::Drop => 1,
            Verdict::Pass => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Drop => "DROP",
            Verdict::Abort => "ABORT",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    SelfTraffic,
    Ssh,
    MissingConfig,
    LocalToLocal,
    WebPort,
    LocalDefaultDrop,
    NotLocal,
}

impl Rule {
    pub fn as_str(self) -> &'static str {
        match self {
            Rule::SelfTraffic => "self-traffic",
            Rule::Ssh => "ssh",
            Rule::MissingConfig => "missing-config",
            Rule::LocalToLocal => "local-to-local",
            Rule::WebPort => "web-port",
            Rule::LocalDefaultDrop => "local-default-drop",
            Rule::NotLocal => "not-local",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict together with the rule that matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    pub rule: Rule,
}

impl Decision {
    fn new(verdict: Verdict, rule: Rule) -> Self {
        Self { verdict, rule }
    }
}

/// Apply the ordered rules; the first one that matches decides.
pub fn decide(packet: &DecodedPacket, config: Option<&Configuration>) -> Decision {
    if packet.source_address == packet.destination_address {
        return Decision::new(Verdict::Pass, Rule::SelfTraffic);
    }

    if packet.destination_port == SSH_PORT || packet.source_port == SSH_PORT {
        return Decision::new(Verdict::Pass, Rule::Ssh);
    }

    let Some(config) = config else {
        return Decision::new(Verdict::Abort, Rule::MissingConfig);
    };

    if packet.destination_address != config.local_address {
        return Decision::new(Verdict::Pass, Rule::NotLocal);
    }

    // Shadowed by the self-traffic rule while both compare exact addresses
    if packet.source_address == config.local_address {
        return Decision::new(Verdict::Pass, Rule::LocalToLocal);
    }

    if WEB_PORTS.contains(&packet.destination_port) {
        return Decision::new(Verdict::Pass, Rule::WebPort);
    }

    Decision::new(Verdict::Drop, Rule::LocalDefaultDrop)
}

/// Verdict only; see [`decide`]
pub fn evaluate(packet: &DecodedPacket, config: Option<&Configuration>) -> Verdict {
    decide(packet, config).verdict
}
