//! Header decoder chain
//!
//! Ethernet -> IPv4 -> TCP, each stage taken through the frame view. The first
//! stage that does not fit the buffer or does not match the expected protocol
//! ends decoding with a [`DecodeError`], which maps to a terminal verdict.

use super::Verdict;
use crate::protocol::ethernet::EthernetHeader;
use crate::protocol::ipv4::{self, Ipv4Header};
use crate::protocol::tcp::{self, TcpHeader};
use crate::protocol::{ip_protocol, EtherType, FrameView};
use std::fmt;
use std::net::Ipv4Addr;

/// Header layer, for reporting where decoding stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Ethernet,
    Ipv4,
    Ipv4Options,
    Tcp,
    TcpOptions,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::Ethernet => "ethernet",
            Layer::Ipv4 => "ipv4",
            Layer::Ipv4Options => "ipv4 options",
            Layer::Tcp => "tcp",
            Layer::TcpOptions => "tcp options",
        };
        f.write_str(name)
    }
}

/// Why decoding stopped before producing a [`DecodedPacket`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("{0} header truncated")]
    Truncated(Layer),

    #[error("IPv4 IHL {0} shorter than the fixed header")]
    BadIhl(u8),

    #[error("TCP data offset {0} shorter than the fixed header")]
    BadDataOffset(u8),

    #[error("ethertype {0:#06x} is not IPv4")]
    NotIpv4(u16),

    #[error("IP version {0} is not 4")]
    NotVersion4(u8),

    #[error("IP protocol {0} is not TCP")]
    NotTcp(u8),
}

impl DecodeError {
    /// Malformed frames fail closed, foreign protocols fail open.
    pub fn verdict(&self) -> Verdict {
        if self.is_malformed() {
            Verdict::Drop
        } else {
            Verdict::Pass
        }
    }

    /// Truncated or self-contradicting headers
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DecodeError::Truncated(_) | DecodeError::BadIhl(_) | DecodeError::BadDataOffset(_)
        )
    }
}

/// Fields of a decoded TCP/IPv4 frame the rule evaluator works on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedPacket {
    pub source_address: Ipv4Addr,
    pub destination_address: Ipv4Addr,
    pub source_port: u16,
    pub destination_port: u16,
    /// Bytes between the end of the TCP header and the frame end
    pub payload_length: usize,
}

/// Decode a whole buffer
pub fn decode(frame: &[u8]) -> Result<DecodedPacket, DecodeError> {
    decode_view(FrameView::new(frame))
}

/// Decode a frame that has already been given its `[data, data_end)` extent
pub fn decode_view(mut view: FrameView<'_>) -> Result<DecodedPacket, DecodeError> {
    let eth = EthernetHeader::decode(&mut view)
        .map_err(|_| DecodeError::Truncated(Layer::Ethernet))?;
    let ethertype = eth.ethertype();
    if ethertype != EtherType::Ipv4 {
        return Err(DecodeError::NotIpv4(ethertype.to_u16()));
    }

    let ip = Ipv4Header::decode(&mut view).map_err(|_| DecodeError::Truncated(Layer::Ipv4))?;
    if ip.version() != 4 {
        return Err(DecodeError::NotVersion4(ip.version()));
    }
    if ip.protocol() != ip_protocol::TCP {
        return Err(DecodeError::NotTcp(ip.protocol()));
    }
    let ip_header_len = ip.header_len();
    if ip_header_len < ipv4::MIN_HEADER_SIZE {
        return Err(DecodeError::BadIhl(ip.ihl()));
    }
    view.take_header(ip_header_len - ipv4::MIN_HEADER_SIZE)
        .map_err(|_| DecodeError::Truncated(Layer::Ipv4Options))?;

    let segment =
        TcpHeader::decode(&mut view).map_err(|_| DecodeError::Truncated(Layer::Tcp))?;
    if segment.data_offset() < tcp::MIN_DATA_OFFSET {
        return Err(DecodeError::BadDataOffset(segment.data_offset()));
    }
    // Payload starts at tcp_start + data_offset * 4 and must not pass data_end
    view.take_header(segment.header_len() - tcp::MIN_HEADER_SIZE)
        .map_err(|_| DecodeError::Truncated(Layer::TcpOptions))?;

    Ok(DecodedPacket {
        source_address: ip.src_addr(),
        destination_address: ip.dst_addr(),
        source_port: segment.src_port(),
        destination_port: segment.dst_port(),
        payload_length: view.remaining(),
    })
}
