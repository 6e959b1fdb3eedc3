//! Text styling for blocks and the cursor pen.

use crate::color::RgbColor;
use bitflags::bitflags;
#[cfg(feature = "use_serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// The attribute bit-set carried alongside the foreground and
    /// background colors.
    #[cfg_attr(feature = "use_serde", derive(Deserialize, Serialize))]
    #[derive(Default)]
    pub struct StyleFlags: u16 {
        const ITALIC = 1;
        const BOLD = 1 << 1;
        const UNDERLINE = 1 << 2;
        const DOUBLE_UNDERLINE = 1 << 3;
        const BLINKING = 1 << 4;
        const FAST_BLINKING = 1 << 5;
        const INVERSE = 1 << 6;
        const INVISIBLE = 1 << 7;
        const STRIKETHROUGH = 1 << 8;
        const GOTHIC = 1 << 9;
        const FRAMED = 1 << 10;
        const ENCIRCLED = 1 << 11;
        const OVERLINED = 1 << 12;
    }
}

/// An immutable bundle of foreground color, background color and
/// attribute flags.  Value type; compared and copied freely.
#[cfg_attr(feature = "use_serde", derive(Deserialize, Serialize))]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextStyle {
    pub flags: StyleFlags,
    pub foreground: RgbColor,
    pub background: RgbColor,
}

impl TextStyle {
    pub fn new(foreground: RgbColor, background: RgbColor) -> TextStyle {
        TextStyle {
            flags: StyleFlags::empty(),
            foreground,
            background,
        }
    }
}

/// A run-length entry in a block's style list.  The half-open range
/// `start..end` indexes the block's codepoints; a block's run list
/// covers `[0, len)` with no gaps.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct StyleRun {
    pub start: usize,
    pub end: usize,
    pub style: TextStyle,
}

impl StyleRun {
    pub fn new(start: usize, end: usize, style: TextStyle) -> StyleRun {
        StyleRun { start, end, style }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}
