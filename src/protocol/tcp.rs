//! TCP protocol - RFC 793

use super::view::{FrameView, OutOfBounds};

/// Minimum TCP header size (without options)
pub const MIN_HEADER_SIZE: usize = 20;

/// Largest option area a 4-bit header length can announce
pub const MAX_OPTIONS_SIZE: usize = 40;

/// Smallest data offset that covers the fixed header
pub const MIN_DATA_OFFSET: u8 = 5;

/// Fixed part of the TCP header
#[derive(Debug, Clone, Copy)]
pub struct TcpHeader<'a> {
    bytes: &'a [u8; MIN_HEADER_SIZE],
}

impl<'a> TcpHeader<'a> {
    /// Take the fixed 20-byte header at the view's cursor
    pub fn decode(view: &mut FrameView<'a>) -> Result<Self, OutOfBounds> {
        let bytes = view.take_array::<MIN_HEADER_SIZE>()?;
        Ok(Self { bytes })
    }

    /// Source port (offset 0-1)
    pub fn src_port(&self) -> u16 {
        u16::from_be_bytes([self.bytes[0], self.bytes[1]])
    }

    /// Destination port (offset 2-3)
    pub fn dst_port(&self) -> u16 {
        u16::from_be_bytes([self.bytes[2], self.bytes[3]])
    }

    /// Data offset (header length in 32-bit words)
    pub fn data_offset(&self) -> u8 {
        self.bytes[12] >> 4
    }

    /// Header length announced by the data offset, in bytes
    pub fn header_len(&self) -> usize {
        self.data_offset() as usize * 4
    }

    /// Raw flags byte (offset 13)
    pub fn flags(&self) -> u8 {
        self.bytes[13]
    }
}

/// Builder for constructing TCP segments (checksum left zero)
#[derive(Debug, Clone)]
pub struct TcpBuilder {
    src_port: u16,
    dst_port: u16,
    data_offset: Option<u8>,
    flags: u8,
    options: Vec<u8>,
    payload: Vec<u8>,
}

impl TcpBuilder {
    pub fn new() -> Self {
        Self {
            src_port: 0,
            dst_port: 0,
            data_offset: None,
            // SYN
            flags: 0x02,
            options: Vec::new(),
            payload: Vec::new(),
        }
    }

    pub fn src_port(mut self, port: u16) -> Self {
        self.src_port = port;
        self
    }

    pub fn dst_port(mut self, port: u16) -> Self {
        self.dst_port = port;
        self
    }

    /// Override the data offset nibble instead of deriving it from the options
    pub fn data_offset(mut self, offset: u8) -> Self {
        self.data_offset = Some(offset & 0x0F);
        self
    }

    pub fn flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    /// Raw option bytes, cut to [`MAX_OPTIONS_SIZE`] and padded to a 4-byte boundary on build
    pub fn options(mut self, options: &[u8]) -> Self {
        self.options = options.to_vec();
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
        let data_offset = self.data_offset.unwrap_or((header_len / 4) as u8);

        let mut buffer = vec![0u8; MIN_HEADER_SIZE];
        buffer[0..2].copy_from_slice(&self.src_port.to_be_bytes());
        buffer[2..4].copy_from_slice(&self.dst_port.to_be_bytes());
        buffer[12] = data_offset << 4;
        buffer[13] = self.flags;
        // Window
        buffer[14..16].copy_from_slice(&65535u16.to_be_bytes());
        buffer.extend_from_slice(&options);
        buffer.extend_from_slice(&self.payload);
        buffer
    }
}

impl Default for TcpBuilder {
    fn default() -> Self {
        Self::new()
    }
}
