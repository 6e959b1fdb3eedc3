//! Bounded history of blocks that have scrolled off the top of the
//! visible grid.  FIFO with a line budget: inserting evicts from the
//! front until the budget holds again.  Reclaiming hands blocks back to
//! the grid when it grows.
//!
//! Only a window of the scrollback is ever on screen, so blocks get
//! their global line numbers (and presentation segments) assigned
//! lazily for the currently visible slice.

use crate::block::Block;
use crate::config::TerminalConfiguration;
use crate::segment::SegmentPool;
use crate::selection::{self, SelectionRange};
use crate::ContentRowIndex;
use log::debug;
use std::collections::VecDeque;

#[derive(Debug)]
pub struct Scrollback {
    blocks: VecDeque<Block>,
    height: usize,
    width: usize,
    max_lines: usize,
    first_visible_line: usize,
}

impl Scrollback {
    pub fn new(max_lines: usize) -> Scrollback {
        Scrollback {
            blocks: VecDeque::new(),
            height: 0,
            width: 0,
            max_lines,
            first_visible_line: 0,
        }
    }

    /// Total number of physical lines held.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    /// Append a block that fell off the top of the grid, then evict
    /// from the front while that would neither empty the scrollback of
    /// everything but the new block nor be needed to respect the
    /// budget.  With a budget of zero the block is simply dropped.
    pub fn add_block(&mut self, mut block: Block, pool: &mut SegmentPool) {
        if self.max_lines == 0 {
            return;
        }

        debug!("scrollback: adding block {:?}", block.id());
        block.release_text_objects(pool);
        self.height += block.line_count();
        self.blocks.push_back(block);

        while self.blocks.len() > 1 {
            let front_lines = self.blocks[0].line_count();
            if self.height - front_lines < self.max_lines {
                break;
            }
            debug!("scrollback: popping excess block");
            self.height -= front_lines.min(self.height);
            self.blocks.pop_front();
        }
    }

    /// Pop the most recent block back out for the grid to use.  The
    /// block is re-wrapped to the current width on the way out.
    pub fn reclaim_block(&mut self) -> Option<Block> {
        let mut last = self.blocks.pop_back()?;
        debug!("scrollback: reclaiming block {:?}", last.id());
        last.set_width(self.width);
        self.height -= last.line_count().min(self.height);
        Some(last)
    }

    /// Re-wrap every held block for a new width; line numbers of the
    /// visible window are fixed up afterwards.
    pub fn set_width(
        &mut self,
        screen_height: usize,
        width: usize,
        pool: &mut SegmentPool,
    ) -> Vec<usize> {
        self.width = width;
        self.height = 0;
        for block in &mut self.blocks {
            block.set_width(width);
            self.height += block.line_count();
        }
        self.fixup_visibility(screen_height, pool)
    }

    /// Make everything from `top_line` down one screen visible,
    /// releasing the presentation objects of the previous window.
    pub fn ensure_visible_lines(
        &mut self,
        screen_height: usize,
        top_line: usize,
        pool: &mut SegmentPool,
    ) -> Vec<usize> {
        if top_line >= self.height {
            return Vec::new();
        }

        // Hide the old window.
        if let Some((mut it, _)) = self.index_for_line(self.first_visible_line) {
            let last_visible = self.first_visible_line + screen_height;
            let mut line_no = self.first_visible_line;
            while it < self.blocks.len() && line_no <= last_visible {
                debug!("scrollback: releasing block starting {}", line_no);
                line_no += self.blocks[it].line_count();
                self.blocks[it].release_text_objects(pool);
                it += 1;
            }
        }

        self.first_visible_line = top_line;
        self.fixup_visibility(screen_height, pool)
    }

    /// Assign global line numbers to the blocks in the visible window
    /// and collect change events for them.
    pub fn fixup_visibility(&mut self, screen_height: usize, pool: &mut SegmentPool) -> Vec<usize> {
        let mut changed = Vec::new();
        if let Some((mut it, start_line)) = self.index_for_line(self.first_visible_line) {
            let last_visible = self.first_visible_line + screen_height;
            let mut line_no = start_line;
            while it < self.blocks.len() && line_no <= last_visible {
                let block = &mut self.blocks[it];
                block.set_line(line_no);
                if let Some(line) = block.dispatch_events(pool) {
                    changed.push(line);
                }
                line_no += block.line_count();
                it += 1;
            }
        }
        changed
    }

    /// Extract the text between two points in scrollback coordinates.
    /// The end x coordinate is exclusive.
    pub fn selection(&self, start: (usize, ContentRowIndex), end: (usize, ContentRowIndex)) -> String {
        debug_assert!(end.1 < self.height);
        let mut out = String::new();

        let mut current_line = self.height;
        let mut it = self.blocks.len();
        let mut should_continue = true;

        while it > 0 && should_continue {
            it -= 1;
            let block = &self.blocks[it];
            let block_height = block.line_count();
            current_line -= block_height;
            if current_line > end.1 {
                continue;
            }

            let mut end_pos = block.text_size();
            if current_line <= end.1 && current_line + block_height >= end.1 {
                let end_line_count = end.1 - current_line;
                end_pos = end_line_count * self.width + end.0;
            }
            let mut start_pos = 0;
            if current_line <= start.1 && current_line + block_height >= start.1 {
                let start_line_count = start.1 - current_line;
                start_pos = start_line_count * self.width + start.0;
                should_continue = false;
            } else if current_line + block_height < start.1 {
                should_continue = false;
            }

            let text = block.text_line();
            let slice: String = text
                .chars()
                .skip(start_pos)
                .take(end_pos.saturating_sub(start_pos))
                .collect();
            out.insert_str(0, &slice);
            if should_continue {
                out.insert(0, '\n');
            }
        }

        out
    }

    /// Word range around a point, for double-click selection.
    pub fn get_double_click_selection_range(
        &self,
        character: usize,
        line: ContentRowIndex,
        config: &dyn TerminalConfiguration,
    ) -> SelectionRange {
        if let Some((it, start_line)) = self.index_for_line(line) {
            selection::double_click_range(
                &self.blocks[it],
                character,
                line,
                start_line,
                self.width,
                config,
            )
        } else {
            SelectionRange::default()
        }
    }

    /// Find the block containing `line`, returning its index and the
    /// line at which it starts.
    fn index_for_line(&self, line: usize) -> Option<(usize, usize)> {
        let mut current_line = self.height;
        let mut it = self.blocks.len();
        while it > 0 {
            it -= 1;
            current_line -= self.blocks[it].line_count();
            if current_line <= line {
                return Some((it, current_line));
            }
        }
        None
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    pub(crate) fn find_block(&self, id: crate::block::BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    /// Iterate blocks from oldest to newest; used by tests to audit the
    /// block partition invariant.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }
}
