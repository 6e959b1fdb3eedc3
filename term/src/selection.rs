//! Selection over the combined scrollback + grid coordinate space.

use crate::block::Block;
use crate::config::TerminalConfiguration;
use crate::ContentRowIndex;
#[cfg(feature = "use_serde")]
use serde::{Deserialize, Serialize};

/// The x,y coordinates of either the start or end of a selection region.
/// `y` addresses the combined content: rows below the scrollback height
/// live in the scrollback, the rest in the visible grid.
#[cfg_attr(feature = "use_serde", derive(Deserialize, Serialize))]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SelectionCoordinate {
    pub x: usize,
    pub y: ContentRowIndex,
}

impl SelectionCoordinate {
    pub fn new(x: usize, y: ContentRowIndex) -> SelectionCoordinate {
        SelectionCoordinate { x, y }
    }
}

/// Represents the selected text range.
/// The end coordinates are inclusive cell coordinates.
#[cfg_attr(feature = "use_serde", derive(Deserialize, Serialize))]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct SelectionRange {
    pub start: SelectionCoordinate,
    pub end: SelectionCoordinate,
}

impl SelectionRange {
    /// Create a new range that starts at the specified location
    pub fn start(start: SelectionCoordinate) -> Self {
        let end = start;
        Self { start, end }
    }

    /// Returns an extended selection that ends at the specified location
    pub fn extend(&self, end: SelectionCoordinate) -> Self {
        Self {
            start: self.start,
            end,
        }
    }

    /// Return a normalized selection such that the starting y coord
    /// is <= the ending y coord.
    pub fn normalize(&self) -> Self {
        if self.start.y <= self.end.y {
            *self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }
}

/// The anchored selection state.  Mutations land in the pending pair
/// and are committed (with a single change notification) at dispatch.
#[derive(Debug, Default)]
pub struct Selection {
    start: SelectionCoordinate,
    end: SelectionCoordinate,
    new_start: SelectionCoordinate,
    new_end: SelectionCoordinate,
}

impl Selection {
    pub fn new() -> Selection {
        Selection::default()
    }

    pub fn range(&self) -> SelectionRange {
        SelectionRange {
            start: self.start,
            end: self.end,
        }
    }

    pub fn set_range(&mut self, range: SelectionRange) {
        self.new_start = range.start;
        self.new_end = range.end;
    }

    pub fn set_start(&mut self, start: SelectionCoordinate) {
        self.new_start = start;
    }

    pub fn set_end(&mut self, end: SelectionCoordinate) {
        self.new_end = end;
    }

    /// Commit pending coordinates; returns the committed range when it
    /// actually moved.
    pub fn dispatch_changes(&mut self) -> Option<SelectionRange> {
        if self.new_start == self.start && self.new_end == self.end {
            return None;
        }
        self.start = self.new_start;
        self.end = self.new_end;
        Some(self.range())
    }
}

/// Compute the word-boundary range around a cell of `block`.
///
/// `character` is the column within the physical row addressed by the
/// combined coordinate `line`; `block_first_line` is the combined
/// coordinate of the block's first row.  The configuration decides
/// which characters continue a word; a delimiter cell selects itself.
pub(crate) fn double_click_range(
    block: &Block,
    character: usize,
    line: ContentRowIndex,
    block_first_line: ContentRowIndex,
    width: usize,
    config: &dyn TerminalConfiguration,
) -> SelectionRange {
    let line_in_block = line - block_first_line;
    let pos = line_in_block * width + character;
    let len = block.text_size();
    if len == 0 || pos >= len {
        let cell = SelectionCoordinate::new(character, line);
        return SelectionRange { start: cell, end: cell };
    }

    let is_word = |i: usize| -> bool {
        block
            .char_at(i)
            .map(|c| config.is_double_click_word(&c.to_string()))
            .unwrap_or(false)
    };

    if !is_word(pos) {
        let cell = SelectionCoordinate::new(character, line);
        return SelectionRange { start: cell, end: cell };
    }

    let mut start = pos;
    while start > 0 && is_word(start - 1) {
        start -= 1;
    }
    let mut end = pos;
    while end + 1 < len && is_word(end + 1) {
        end += 1;
    }

    SelectionRange {
        start: SelectionCoordinate::new(start % width, block_first_line + start / width),
        end: SelectionCoordinate::new(end % width, block_first_line + end / width),
    }
}
