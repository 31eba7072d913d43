//! Frame sources
//!
//! Attaching to a live interface is left to the host. Offline frames come
//! from hex dumps, one frame per line.

mod hex_dump;

pub use hex_dump::{load_hex_frames, parse_hex_frames};

/// One frame read from a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    /// 1-based line number in the source file
    pub line: usize,
    pub bytes: Vec<u8>,
}
