//! Hex dump frame files
//!
//! ```text
//! # comment
//! 02 00 00 00 00 01 02 00 00 00 00 02 08 00 45 00 ...
//! 020000000001:020000000002:0800...
//! ```
//! Spaces and colons inside a line are ignored.

use super::CapturedFrame;
use crate::{Error, Result};
use std::path::Path;

/// Read a hex dump file
pub fn load_hex_frames<P: AsRef<Path>>(path: P) -> Result<Vec<CapturedFrame>> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse_hex_frames(&content)
}

/// Parse hex dump text, skipping blank lines and `#` comments
pub fn parse_hex_frames(content: &str) -> Result<Vec<CapturedFrame>> {
    let mut frames = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let text = raw.split('#').next().unwrap_or("").trim();
        if text.is_empty() {
            continue;
        }

        let digits: String = text
            .chars()
            .filter(|c| !c.is_whitespace() && *c != ':')
            .collect();
        let bytes = hex::decode(&digits).map_err(|e| Error::InvalidFrame {
            line,
            reason: e.to_string(),
        })?;

        frames.push(CapturedFrame { line, bytes });
    }

    Ok(frames)
}
