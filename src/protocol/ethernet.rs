//! Ethernet II header view and frame construction

use super::view::{FrameView, OutOfBounds};
use super::{EtherType, MacAddr};

/// Ethernet II header size (no VLAN tag, no FCS)
pub const HEADER_SIZE: usize = 14;
/// Maximum Ethernet frame size (without FCS, with VLAN tag)
pub const MAX_FRAME_SIZE: usize = 1522;

/// Ethernet header over bytes the frame view has already bounds-checked
#[derive(Debug, Clone, Copy)]
pub struct EthernetHeader<'a> {
    bytes: &'a [u8; HEADER_SIZE],
}

impl<'a> EthernetHeader<'a> {
    /// Take the link header from the front of the view
    pub fn decode(view: &mut FrameView<'a>) -> Result<Self, OutOfBounds> {
        let bytes = view.take_array::<HEADER_SIZE>()?;
        Ok(Self { bytes })
    }

    pub fn dst_mac(&self) -> MacAddr {
        let b = self.bytes;
        MacAddr([b[0], b[1], b[2], b[3], b[4], b[5]])
    }

    pub fn src_mac(&self) -> MacAddr {
        let b = self.bytes;
        MacAddr([b[6], b[7], b[8], b[9], b[10], b[11]])
    }

    /// Raw EtherType field
    pub fn ethertype_raw(&self) -> u16 {
        u16::from_be_bytes([self.bytes[12], self.bytes[13]])
    }

    pub fn ethertype(&self) -> EtherType {
        EtherType::from_u16(self.ethertype_raw())
    }
}

/// Builder for constructing Ethernet frames
pub struct FrameBuilder {
    buffer: Vec<u8>,
}

impl FrameBuilder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(MAX_FRAME_SIZE),
        }
    }

    pub fn dst_mac(mut self, mac: MacAddr) -> Self {
        self.buffer.extend_from_slice(&mac.0);
        self
    }

    pub fn src_mac(mut self, mac: MacAddr) -> Self {
        self.buffer.extend_from_slice(&mac.0);
        self
    }

    pub fn ethertype(mut self, ethertype: u16) -> Self {
        self.buffer.extend_from_slice(&ethertype.to_be_bytes());
        self
    }

    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.buffer.extend_from_slice(payload);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.buffer
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}
