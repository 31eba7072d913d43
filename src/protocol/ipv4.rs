//! IPv4 protocol - RFC 791

use super::view::{FrameView, OutOfBounds};
use std::net::Ipv4Addr;

/// Minimum IPv4 header size (without options)
pub const MIN_HEADER_SIZE: usize = 20;

/// Largest option area a 4-bit header length can announce
pub const MAX_OPTIONS_SIZE: usize = 40;

/// Fixed part of the IPv4 header
///
/// Options, when the IHL announces any, are taken separately by the decoder.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4Header<'a> {
    bytes: &'a [u8; MIN_HEADER_SIZE],
}

impl<'a> Ipv4Header<'a> {
    /// Take the fixed 20-byte header at the view's cursor
    pub fn decode(view: &mut FrameView<'a>) -> Result<Self, OutOfBounds> {
        let bytes = view.take_array::<MIN_HEADER_SIZE>()?;
        Ok(Self { bytes })
    }

    pub fn version(&self) -> u8 {
        self.bytes[0] >> 4
    }

    pub fn ihl(&self) -> u8 {
        self.bytes[0] & 0x0F
    }

    /// Header length announced by the IHL field, in bytes
    ///
    /// Not trusted until checked against the frame end.
    pub fn header_len(&self) -> usize {
        self.ihl() as usize * 4
    }

    pub fn total_length(&self) -> u16 {
        u16::from_be_bytes([self.bytes[2], self.bytes[3]])
    }

    pub fn ttl(&self) -> u8 {
        self.bytes[8]
    }

    pub fn protocol(&self) -> u8 {
        self.bytes[9]
    }

    pub fn src_addr(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.bytes[12], self.bytes[13], self.bytes[14], self.bytes[15])
    }

    pub fn dst_addr(&self) -> Ipv4Addr {
        Ipv4Addr::new(self.bytes[16], self.bytes[17], self.bytes[18], self.bytes[19])
    }
}

/// Calculate IPv4 header checksum
pub fn checksum(header: &[u8]) -> u16 {
    let mut sum: u32 = 0;

    for chunk in header.chunks(2) {
        let word = match chunk {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [hi] => u16::from_be_bytes([*hi, 0]),
            _ => 0,
        };
        sum = sum.wrapping_add(word as u32);
    }

    // Fold 32-bit sum to 16 bits
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }

    !(sum as u16)
}

/// Builder for constructing IPv4 packets
#[derive(Debug, Clone)]
pub struct Ipv4Builder {
    version: u8,
    ihl: Option<u8>,
    options: Vec<u8>,
    ttl: u8,
    protocol: u8,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
    payload: Vec<u8>,
}

impl Ipv4Builder {
    pub fn new() -> Self {
        Self {
            version: 4,
            ihl: None,
            options: Vec::new(),
            ttl: 64,
            protocol: 0,
            src_addr: Ipv4Addr::UNSPECIFIED,
            dst_addr: Ipv4Addr::UNSPECIFIED,
            payload: Vec::new(),
        }
    }

    /// Override the version nibble (anything but 4 is not IPv4)
    pub fn version(mut self, version: u8) -> Self {
        self.version = version & 0x0F;
        self
    }

    /// Override the IHL nibble instead of deriving it from the options
    pub fn ihl(mut self, ihl: u8) -> Self {
        self.ihl = Some(ihl & 0x0F);
        self
    }

    /// Raw option bytes, cut to [`MAX_OPTIONS_SIZE`] and padded to a 4-byte boundary on build
    pub fn options(mut self, options: &[u8]) -> Self {
        self.options = options.to_vec();
        self
    }

    pub fn ttl(mut self, ttl: u8) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn protocol(mut self, protocol: u8) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn src_addr(mut self, addr: Ipv4Addr) -> Self {
        self.src_addr = addr;
        self
    }

    pub fn dst_addr(mut self, addr: Ipv4Addr) -> Self {
        self.dst_addr = addr;
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut options = self.options;
        options.truncate(MAX_OPTIONS_SIZE);
        options.resize(options.len().div_ceil(4) * 4, 0);

        let header_len = MIN_HEADER_SIZE + options.len();
        let ihl = self.ihl.unwrap_or((header_len / 4) as u8);
        let total_length = (header_len + self.payload.len()) as u16;

        let mut buffer = vec![0u8; MIN_HEADER_SIZE];

        // Version + IHL
        buffer[0] = (self.version << 4) | ihl;

        // Total length
        buffer[2..4].copy_from_slice(&total_length.to_be_bytes());

        // Flags: Don't Fragment
        buffer[6] = 0x40;

        buffer[8] = self.ttl;
        buffer[9] = self.protocol;
        buffer[12..16].copy_from_slice(&self.src_addr.octets());
        buffer[16..20].copy_from_slice(&self.dst_addr.octets());
        buffer.extend_from_slice(&options);

        let sum = checksum(&buffer);
        buffer[10..12].copy_from_slice(&sum.to_be_bytes());

        buffer.extend_from_slice(&self.payload);
        buffer
    }
}

impl Default for Ipv4Builder {
    fn default() -> Self {
        Self::new()
    }
}
