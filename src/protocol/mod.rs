//! Protocol header views
//!
//! Headers are only ever built from bytes handed out by [`view::FrameView`].

pub mod ethernet;
pub mod ipv4;
pub mod tcp;
pub mod types;
pub mod view;

pub use types::*;
pub use view::{FrameView, HeaderSlice, OutOfBounds};
