//! Bounded frame view
//!
//! Every header read goes through [`FrameView::take_header`], which proves the
//! requested range lies inside `[data, data_end)` before handing out bytes.

use std::fmt;

/// A requested range does not fit inside the frame extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{requested} bytes at offset {offset} exceed frame end {data_end}")]
pub struct OutOfBounds {
    pub offset: usize,
    pub requested: usize,
    pub data_end: usize,
}

/// Bytes of one header, already proven to lie inside the frame.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct HeaderSlice<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> HeaderSlice<'a> {
    /// Offset of the first byte relative to the start of the buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl fmt::Debug for HeaderSlice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderSlice")
            .field("offset", &self.offset)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Cursor over a frame with a fixed `[data, data_end)` extent.
#[derive(Debug, Clone)]
pub struct FrameView<'a> {
    buffer: &'a [u8],
    cursor: usize,
    data_end: usize,
}

impl<'a> FrameView<'a> {
    /// View covering the whole buffer
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            data_end: buffer.len(),
        }
    }

    /// View covering `buffer[data..data_end]`
    ///
    /// Fails if the extent is inverted or reaches past the buffer.
    pub fn with_extent(
        buffer: &'a [u8],
        data: usize,
        data_end: usize,
    ) -> Result<Self, OutOfBounds> {
        if data > data_end || data_end > buffer.len() {
            return Err(OutOfBounds {
                offset: data,
                requested: data_end.saturating_sub(data),
                data_end: buffer.len(),
            });
        }

        Ok(Self {
            buffer,
            cursor: data,
            data_end,
        })
    }

    /// Take exactly `size` bytes at the cursor and advance past them.
    ///
    /// On failure the cursor does not move.
    pub fn take_header(&mut self, size: usize) -> Result<HeaderSlice<'a>, OutOfBounds> {
        let out_of_bounds = OutOfBounds {
            offset: self.cursor,
            requested: size,
            data_end: self.data_end,
        };

        let end = self.cursor.checked_add(size).ok_or(out_of_bounds)?;
        if end > self.data_end {
            return Err(out_of_bounds);
        }

        let bytes = self.buffer.get(self.cursor..end).ok_or(out_of_bounds)?;
        let slice = HeaderSlice {
            bytes,
            offset: self.cursor,
        };
        self.cursor = end;
        Ok(slice)
    }

    /// Fixed-size form of [`take_header`](Self::take_header)
    pub fn take_array<const N: usize>(&mut self) -> Result<&'a [u8; N], OutOfBounds> {
        let offset = self.cursor;
        let slice = self.take_header(N)?;
        slice.as_bytes().try_into().map_err(|_| OutOfBounds {
            offset,
            requested: N,
            data_end: self.data_end,
        })
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn data_end(&self) -> usize {
        self.data_end
    }

    /// Bytes left between the cursor and `data_end`
    pub fn remaining(&self) -> usize {
        self.data_end - self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_header_advances_cursor() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut view = FrameView::new(&data);

        let first = view.take_header(2).unwrap();
        assert_eq!(first.as_bytes(), &[1, 2]);
        assert_eq!(first.offset(), 0);
        assert_eq!(view.cursor(), 2);

        let second = view.take_header(4).unwrap();
        assert_eq!(second.as_bytes(), &[3, 4, 5, 6]);
        assert_eq!(second.offset(), 2);
        assert_eq!(view.remaining(), 0);
    }

    #[test]
    fn test_take_header_out_of_bounds() {
        let data = [0u8; 10];
        let mut view = FrameView::new(&data);
        view.take_header(8).unwrap();

        let err = view.take_header(3).unwrap_err();
        assert_eq!(
            err,
            OutOfBounds {
                offset: 8,
                requested: 3,
                data_end: 10,
            }
        );
        // Failed take leaves the cursor alone
        assert_eq!(view.cursor(), 8);
        assert!(view.take_header(2).is_ok());
    }

    #[test]
    fn test_take_header_zero_size_at_end() {
        let data = [0u8; 4];
        let mut view = FrameView::new(&data);
        view.take_header(4).unwrap();

        let empty = view.take_header(0).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.offset(), 4);
    }

    #[test]
    fn test_take_header_overflow() {
        let data = [0u8; 4];
        let mut view = FrameView::new(&data);
        view.take_header(1).unwrap();

        assert!(view.take_header(usize::MAX).is_err());
        assert_eq!(view.cursor(), 1);
    }

    #[test]
    fn test_with_extent_respects_data_end() {
        let data = [0xaau8; 32];
        let mut view = FrameView::with_extent(&data, 4, 10).unwrap();

        assert_eq!(view.cursor(), 4);
        assert_eq!(view.remaining(), 6);
        assert!(view.take_header(7).is_err());

        let slice = view.take_header(6).unwrap();
        assert_eq!(slice.offset(), 4);
        assert_eq!(slice.len(), 6);
    }

    #[test]
    fn test_with_extent_rejects_bad_bounds() {
        let data = [0u8; 8];
        assert!(FrameView::with_extent(&data, 5, 4).is_err());
        assert!(FrameView::with_extent(&data, 0, 9).is_err());
        assert!(FrameView::with_extent(&data, 8, 8).is_ok());
    }

    #[test]
    fn test_take_array() {
        let data = [9u8, 8, 7, 6, 5];
        let mut view = FrameView::new(&data);

        let arr: &[u8; 3] = view.take_array().unwrap();
        assert_eq!(arr, &[9, 8, 7]);
        assert!(view.take_array::<3>().is_err());
        assert_eq!(view.take_array::<2>().unwrap(), &[6, 5]);
    }
}
