//! Terminal model.
//!
//! This crate is the screen-state engine for a virtual terminal emulator:
//! it consumes the semantic operations produced by an escape-sequence
//! parser and maintains the structured in-memory representation of what
//! the byte stream would render — the visible grid, styling, cursor
//! stack, scrollback history and selection — while emitting coalesced
//! change notifications for a presentation layer to draw from.
//!
//! The parser, pty plumbing, keyboard translation and glyph rendering
//! are external collaborators; they drive and observe this crate through
//! the operations on [`Screen`], [`Cursor`] and [`ScreenData`] and the
//! [`ScreenListener`] / [`TerminalHost`] traits.

/// Represents a row within the visible portion of the screen.
/// Value 0 is the top visible row.  The same coordinate space is used
/// for the cursor position and the scroll margins.
pub type ScreenRowIndex = usize;

/// Represents a row in the combined scrollback + visible content.
/// Value 0 is the oldest line of scrollback; rows at and beyond
/// `Scrollback::height()` address the visible grid.
pub type ContentRowIndex = usize;

/// The delta to apply to the cursor after an edit operation.
/// Returned by [`ScreenData::replace`] and [`ScreenData::insert`].
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CursorDiff {
    pub line: isize,
    pub character: isize,
}

/// The response given when queried for primary device attributes.
/// This particular string says "we are a VT102".
pub const PRIMARY_DEVICE_ATTRIBUTES: &[u8] = b"\x1b[?6c";

/// The response given when queried for secondary device attributes.
pub const SECONDARY_DEVICE_ATTRIBUTES: &[u8] = b"\x1b[>1;95;0c";

pub mod block;
pub mod charset;
pub mod color;
pub mod config;
pub mod cursor;
pub mod events;
pub mod screen;
pub mod screen_data;
pub mod scrollback;
pub mod segment;
pub mod selection;
pub mod style;

pub use crate::block::{Block, BlockId};
pub use crate::charset::{Charset, Decoder};
pub use crate::color::{AnsiColor, ColorPalette, RgbColor};
pub use crate::config::TerminalConfiguration;
pub use crate::cursor::{Cursor, InsertMode};
pub use crate::events::{ClipboardMode, ScreenListener, TerminalHost};
pub use crate::screen::Screen;
pub use crate::screen_data::ScreenData;
pub use crate::scrollback::Scrollback;
pub use crate::segment::{SegmentPool, TextSegment};
pub use crate::selection::{Selection, SelectionCoordinate, SelectionRange};
pub use crate::style::{StyleFlags, StyleRun, TextStyle};

#[cfg(test)]
mod test;
