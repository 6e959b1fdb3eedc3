//! Holds the model of the visible grid: an ordered sequence of blocks
//! whose physical rows add up to the screen height, together with the
//! scrollback those blocks retire into.  There is one instance for the
//! primary screen (with scrollback) and one for the alternate screen
//! (without).
//!
//! Rows are addressed in visible coordinates; a lookup walks the block
//! sequence summing row counts.  Operations that need a row to be a
//! block of its own (clearing, splicing during scroll) split the
//! containing block first; writes that grow a block re-merge physical
//! rows from its successors so the grid height stays consistent.

use crate::block::{Block, BlockId};
use crate::config::TerminalConfiguration;
use crate::events::DataEvent;
use crate::segment::SegmentPool;
use crate::selection::{self, SelectionRange};
use crate::scrollback::Scrollback;
use crate::style::TextStyle;
use crate::{ContentRowIndex, CursorDiff, ScreenRowIndex};
use log::debug;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

fn scrollback_size(config: &Arc<dyn TerminalConfiguration>, allow_scrollback: bool) -> usize {
    if allow_scrollback {
        config.scrollback_size()
    } else {
        0
    }
}

pub struct ScreenData {
    /// The blocks currently on the grid, top to bottom.
    blocks: VecDeque<Block>,
    scrollback: Scrollback,
    width: usize,
    screen_height: usize,
    /// Physical lines currently on the grid: Σ block.line_count().
    height: usize,
    old_total_lines: usize,
    default_style: TextStyle,
    config: Arc<dyn TerminalConfiguration>,
    segments: Rc<RefCell<SegmentPool>>,
    events: Vec<DataEvent>,
    pending_line_events: Vec<usize>,
}

impl ScreenData {
    pub fn new(
        config: &Arc<dyn TerminalConfiguration>,
        allow_scrollback: bool,
        default_style: TextStyle,
        segments: Rc<RefCell<SegmentPool>>,
    ) -> ScreenData {
        ScreenData {
            blocks: VecDeque::new(),
            scrollback: Scrollback::new(scrollback_size(config, allow_scrollback)),
            width: 0,
            screen_height: 0,
            height: 0,
            old_total_lines: 0,
            default_style,
            config: Arc::clone(config),
            segments,
            events: Vec::new(),
            pending_line_events: Vec::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn screen_height(&self) -> usize {
        self.screen_height
    }

    /// Physical lines currently on the grid.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Scrollback plus grid.
    #[inline]
    pub fn content_height(&self) -> usize {
        self.height + self.scrollback.height()
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn default_style(&self) -> TextStyle {
        self.default_style
    }

    /// The screen re-resolves this when the palette's defaults change.
    pub fn set_default_style(&mut self, style: TextStyle) {
        self.default_style = style;
    }

    pub(crate) fn take_events(&mut self) -> Vec<DataEvent> {
        std::mem::replace(&mut self.events, Vec::new())
    }

    /// Resize to a new width and/or height.  `current_cursor_line` is
    /// the row the cursor occupies; shrinking the height removes rows
    /// strictly below it before pushing rows above it into scrollback.
    pub fn set_size(
        &mut self,
        width: usize,
        height: usize,
        current_cursor_line: ScreenRowIndex,
    ) {
        if width != self.width {
            let old_width = self.width;
            let old_content_height = self.height;
            self.width = width;

            for block in &mut self.blocks {
                let before = block.line_count();
                block.set_width(width);
                self.height = self.height + block.line_count() - before;
            }

            {
                let mut pool = self.segments.borrow_mut();
                let changed = self
                    .scrollback
                    .set_width(self.screen_height, width, &mut pool);
                self.pending_line_events.extend(changed);
            }

            let mut removed = 0;
            let mut reclaimed = 0;
            if self.height > self.screen_height {
                let to_remove = self.height - self.screen_height;
                removed = self.push_at_most_to_scrollback(to_remove);
            } else {
                reclaimed = self.ensure_at_least_height(self.screen_height);
            }
            debug!(
                "changed width from {} to {}; height was {} now {} -- pushed {} reclaimed {}",
                old_width, width, old_content_height, self.height, removed, reclaimed
            );
            self.events.push(DataEvent::WidthChanged {
                width,
                removed,
                reclaimed,
            });
        }

        if height != self.screen_height {
            let old_screen_height = self.screen_height;
            self.screen_height = height;

            let mut removed_beginning = 0;
            let mut reclaimed = 0;

            if self.height > height {
                let to_remove = self.height - height;
                let remove_from_end = self
                    .height
                    .saturating_sub(current_cursor_line + 1)
                    .min(to_remove);
                let remove_from_start = to_remove - remove_from_end;

                let mut removed_end = 0;
                if remove_from_end > 0 {
                    removed_end = self.remove_lines_from_end(remove_from_end);
                }
                if remove_from_start > 0 {
                    removed_beginning = self.push_at_most_to_scrollback(remove_from_start);
                }
                debug!(
                    "changed height from {} to {} -- culling {} removed {} and start {} removed {}",
                    old_screen_height,
                    height,
                    remove_from_end,
                    removed_end,
                    remove_from_start,
                    removed_beginning
                );
            } else {
                reclaimed = self.ensure_at_least_height(height);
                debug!("reclaimed {} lines from scrollback", reclaimed);
            }

            self.events.push(DataEvent::HeightChanged {
                height,
                removed: removed_beginning,
                reclaimed,
            });
        }
    }

    pub fn clear_to_end_of_line(&mut self, x: usize, y: ScreenRowIndex) {
        if let Some(idx) = self.ensure_single_line_block(y) {
            self.blocks[idx].clear_to_end(x);
        }
    }

    pub fn clear_to_end_of_screen(&mut self, y: ScreenRowIndex) {
        if let Some(first) = self.ensure_single_line_block(y) {
            let mut idx = first;
            while idx < self.blocks.len() {
                self.clear_block(idx);
                idx += 1;
            }
        }
    }

    pub fn clear_to_beginning_of_line(&mut self, x: usize, y: ScreenRowIndex) {
        if let Some(idx) = self.ensure_single_line_block(y) {
            self.blocks[idx].clear_characters(0, x);
        }
    }

    pub fn clear_to_beginning_of_screen(&mut self, y: ScreenRowIndex) {
        if let Some(first) = self.ensure_single_line_block(y) {
            self.blocks[first].clear();
            for idx in (0..first).rev() {
                self.clear_block(idx);
            }
        }
    }

    pub fn clear_line(&mut self, y: ScreenRowIndex) {
        if let Some(idx) = self.ensure_single_line_block(y) {
            self.blocks[idx].clear();
        }
    }

    pub fn clear(&mut self) {
        let mut idx = 0;
        while idx < self.blocks.len() {
            self.clear_block(idx);
            idx += 1;
        }
    }

    /// Clear the grid, then fill every row with `character`.
    pub fn fill(&mut self, character: char) {
        self.clear();
        let fill_str: String = std::iter::repeat(character).take(self.width).collect();
        let style = self.default_style;
        let only_ascii = character.is_ascii();
        for block in &mut self.blocks {
            block.replace_at(0, &fill_str, style, only_ascii);
        }
    }

    /// Reset the inclusive character range `[x, to]` on row `y` to
    /// default-style blanks.
    pub fn clear_characters(&mut self, x: usize, y: ScreenRowIndex, to: usize) {
        if let Some(idx) = self.ensure_single_line_block(y) {
            self.blocks[idx].clear_characters(x, to);
        }
    }

    /// Delete the inclusive character range `[x, to]` on row `y`,
    /// shifting the remainder of the logical line left.
    pub fn delete_characters(&mut self, x: usize, y: ScreenRowIndex, to: usize) {
        let idx = match self.index_for_row(y) {
            Some(idx) => idx,
            None => return,
        };

        let line_in_block = y - self.blocks[idx].screen_index();
        let chars_to_line = line_in_block * self.width;
        let before = self.blocks[idx].line_count();
        self.blocks[idx].delete_characters(chars_to_line + x, chars_to_line + to);
        let after = self.blocks[idx].line_count();
        // Deleting across a row boundary shrinks the block; keep the
        // grid filled the same way clear_block does.
        for _ in after..before {
            self.blocks
                .insert(idx + 1, Block::new(self.width, self.default_style));
        }
    }

    pub fn replace(
        &mut self,
        x: usize,
        y: ScreenRowIndex,
        text: &str,
        style: TextStyle,
        only_ascii: bool,
    ) -> CursorDiff {
        self.modify(x, y, text, style, true, only_ascii)
    }

    pub fn insert(
        &mut self,
        x: usize,
        y: ScreenRowIndex,
        text: &str,
        style: TextStyle,
        only_ascii: bool,
    ) -> CursorDiff {
        self.modify(x, y, text, style, false, only_ascii)
    }

    /// Extract row `from`, clear it, and splice it back in at `to`.
    pub fn move_line(&mut self, from: ScreenRowIndex, to: ScreenRowIndex) {
        if from == to {
            return;
        }
        let old_content_height = self.content_height();
        let mut to = to;
        if to > from {
            to += 1;
        }

        let from_idx = match self.ensure_single_line_block(from) {
            Some(idx) => idx,
            None => return,
        };
        let to_idx = self.ensure_single_line_block(to);

        self.blocks[from_idx].clear();
        let block = self.blocks.remove(from_idx).expect("from row exists");
        let mut insert_at = to_idx.unwrap_or(self.blocks.len() + 1);
        if from_idx < insert_at {
            insert_at -= 1;
        }
        self.blocks.insert(insert_at.min(self.blocks.len()), block);

        self.events.push(DataEvent::ContentModified {
            start_line: self.scrollback.height() + to,
            line_count: 1,
            content_height_diff: self.content_height_diff(old_content_height),
        });
    }

    /// Scroll-region-aware line insertion: the row that scrolls off the
    /// top of the region either retires into scrollback (when the
    /// region starts at the top of an overfull grid) or is deleted, and
    /// a fresh row appears after `row`.
    ///
    /// When `row == top_margin` the top-margin row is cleared in place
    /// and nothing is inserted.
    pub fn insert_line(&mut self, row: ScreenRowIndex, top_margin: ScreenRowIndex) {
        let old_content_height = self.content_height();
        let anchor = self
            .index_for_row(row + 1)
            .map(|idx| self.blocks[idx].id());

        if top_margin == 0 && self.height >= self.screen_height {
            self.push_at_most_to_scrollback(1);
        } else {
            let top_idx = match self.ensure_single_line_block(top_margin) {
                Some(idx) => idx,
                None => return,
            };
            if row == top_margin {
                self.blocks[top_idx].clear();
                return;
            }
            self.blocks.remove(top_idx);
            self.height -= 1;
        }

        let insert_at = anchor
            .and_then(|id| self.blocks.iter().position(|b| b.id() == id))
            .unwrap_or_else(|| self.blocks.len());
        self.blocks
            .insert(insert_at, Block::new(self.width, self.default_style));
        self.height += 1;

        self.events.push(DataEvent::ContentModified {
            start_line: self.scrollback.height() + row + 1,
            line_count: 1,
            content_height_diff: self.content_height_diff(old_content_height),
        });
    }

    /// Shared body of `replace` and `insert`.
    fn modify(
        &mut self,
        x: usize,
        y: ScreenRowIndex,
        text: &str,
        style: TextStyle,
        replace: bool,
        only_ascii: bool,
    ) -> CursorDiff {
        let idx = match self.index_for_row(y) {
            Some(idx) => idx,
            None => return CursorDiff::default(),
        };
        let block_id = self.blocks[idx].id();
        let start_char = (y - self.blocks[idx].screen_index()) * self.width + x;
        let text_count = if only_ascii {
            text.len()
        } else {
            text.chars().count()
        };

        let lines_before = self.blocks[idx].line_count() as isize;
        let lines_changed =
            self.blocks[idx].line_count_after_modified(start_char, text_count, replace) as isize
                - lines_before;
        let old_content_height = self.content_height();
        self.height = (self.height as isize + lines_changed) as usize;

        if lines_changed > 0 {
            // The write spills into new physical rows; consume that
            // many rows from the successor blocks so the grid height
            // stays consistent.
            let mut removed: isize = 0;
            let mut to_merge = idx + 1;
            while removed < lines_changed && to_merge < self.blocks.len() {
                let successor_lines = self.blocks[to_merge].line_count() as isize;
                let remove_block = removed + successor_lines <= lines_changed;
                let lines_to_remove = if remove_block {
                    successor_lines
                } else {
                    successor_lines - (lines_changed - removed)
                };

                let mut successor = self.blocks.remove(to_merge).expect("successor exists");
                self.blocks[idx].move_lines_from_block(
                    &mut successor,
                    0,
                    lines_to_remove as usize,
                );
                removed += lines_to_remove;
                if !remove_block {
                    self.blocks.insert(to_merge, successor);
                    to_merge += 1;
                }
            }
            self.height = (self.height as isize - removed) as usize;
        }

        if self.height > self.screen_height {
            let overflow = self.height - self.screen_height;
            self.push_at_most_to_scrollback(overflow);
        }

        // The write itself; the target block may have retired into
        // scrollback while we pushed the overflow.
        if let Some(target) = self
            .blocks
            .iter()
            .position(|b| b.id() == block_id)
        {
            let block = &mut self.blocks[target];
            if replace {
                block.replace_at(start_char, text, style, only_ascii);
            } else {
                block.insert_at(start_char, text, style, only_ascii);
            }
        } else if let Some(target) = self.scrollback.find_block(block_id) {
            if let Some(block) = self.scrollback.block_mut(target) {
                if replace {
                    block.replace_at(start_char, text, style, only_ascii);
                } else {
                    block.insert_at(start_char, text, style, only_ascii);
                }
            }
        }

        let mut end_char = (start_char + text_count) % self.width;
        if end_char == 0 {
            end_char = self.width - 1;
        }
        let end_line = (start_char + text_count) / self.width;
        let line_diff = end_line as isize - (start_char / self.width) as isize;

        self.events.push(DataEvent::ContentModified {
            start_line: self.scrollback.height() + y,
            line_count: lines_changed,
            content_height_diff: self.content_height_diff(old_content_height),
        });
        CursorDiff {
            line: line_diff,
            character: end_char as isize - x as isize,
        }
    }

    /// Assign line numbers top to bottom and fire per-line change
    /// events for blocks that were touched since the last dispatch.
    /// Returns the changed line numbers and whether the total content
    /// height moved.
    pub fn dispatch_line_events(&mut self) -> (Vec<usize>, bool) {
        let mut changed = std::mem::replace(&mut self.pending_line_events, Vec::new());

        if !self.blocks.is_empty() {
            let mut pool = self.segments.borrow_mut();
            let mut line = self.scrollback.height();
            let mut screen_index = 0;
            for block in &mut self.blocks {
                block.set_screen_index(screen_index);
                block.set_line(line);
                if let Some(event) = block.dispatch_events(&mut pool) {
                    changed.push(event);
                }
                screen_index += block.line_count();
                line += block.line_count();
            }
        }

        let content_height_changed = self.content_height() != self.old_total_lines;
        if content_height_changed {
            self.old_total_lines = self.content_height();
        }
        (changed, content_height_changed)
    }

    /// Release the presentation objects of every block on the grid;
    /// block data is retained so the grid can be swapped back in.
    pub fn release_text_objects(&mut self) {
        let mut pool = self.segments.borrow_mut();
        for block in &mut self.blocks {
            block.release_text_objects(&mut pool);
        }
    }

    /// Make the scrollback window starting at `top_line` renderable.
    pub fn ensure_visible_lines(&mut self, top_line: usize) {
        let mut pool = self.segments.borrow_mut();
        let changed =
            self.scrollback
                .ensure_visible_lines(self.screen_height, top_line, &mut pool);
        self.pending_line_events.extend(changed);
    }

    /// Extract the selected text and hand it to the host's clipboard.
    pub fn send_selection_to_clipboard(
        &mut self,
        start: (usize, ContentRowIndex),
        end: (usize, ContentRowIndex),
        mode: crate::events::ClipboardMode,
        host: &mut dyn crate::events::TerminalHost,
    ) -> Result<(), anyhow::Error> {
        let text = self.selection_text(start, end);
        host.set_clipboard(mode, text)
    }

    /// Stitch together the selected text between two combined-content
    /// points.  The end x coordinate is exclusive; rows are joined with
    /// newlines.
    pub fn selection_text(
        &mut self,
        start: (usize, ContentRowIndex),
        end: (usize, ContentRowIndex),
    ) -> Option<String> {
        if end.1 >= self.content_height() {
            return None;
        }

        let sb_height = self.scrollback.height();
        let mut buffer = String::new();

        let started_in_scrollback = start.1 < sb_height;
        if started_in_scrollback {
            let end_scrollback = if end.1 >= sb_height {
                (self.width, sb_height - 1)
            } else {
                end
            };
            buffer = self.scrollback.selection(start, end_scrollback);
        }

        if end.1 >= sb_height {
            let start_in_screen = if started_in_scrollback {
                (0, 0)
            } else {
                (start.0, start.1 - sb_height)
            };
            let end_in_screen = (end.0, end.1 - sb_height);

            let first = self.index_for_row(start_in_screen.1)?;
            let mut screen_index = self.blocks[first].screen_index();
            let mut start_pos =
                (start_in_screen.1 - screen_index) * self.width + start_in_screen.0;
            for idx in first..self.blocks.len() {
                let block = &self.blocks[idx];
                let mut end_pos = block.text_size();
                let mut should_break = false;
                if screen_index + block.line_count() > end_in_screen.1 {
                    end_pos = (end_in_screen.1 - screen_index) * self.width + end_in_screen.0;
                    should_break = true;
                }
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                let text = block.text_line();
                buffer.extend(
                    text.chars()
                        .skip(start_pos)
                        .take(end_pos.saturating_sub(start_pos)),
                );
                if should_break {
                    break;
                }
                screen_index += block.line_count();
                start_pos = 0;
            }
        }

        Some(buffer)
    }

    /// Word range around a combined-content point.
    pub fn get_double_click_selection_range(
        &mut self,
        character: usize,
        line: ContentRowIndex,
    ) -> SelectionRange {
        let sb_height = self.scrollback.height();
        if line < sb_height {
            return self
                .scrollback
                .get_double_click_selection_range(character, line, &*self.config);
        }
        let screen_line = line - sb_height;
        match self.index_for_row(screen_line) {
            Some(idx) => {
                let first_line = sb_height + self.blocks[idx].screen_index();
                selection::double_click_range(
                    &self.blocks[idx],
                    character,
                    line,
                    first_line,
                    self.width,
                    &*self.config,
                )
            }
            None => SelectionRange::default(),
        }
    }

    /// Push complete blocks from the top of the grid into scrollback,
    /// never more than `lines` in total and never the entire grid.
    fn push_at_most_to_scrollback(&mut self, lines: usize) -> usize {
        let lines = if lines >= self.height {
            self.height.saturating_sub(1)
        } else {
            lines
        };
        let mut pushed = 0;
        while let Some(front) = self.blocks.front() {
            let block_height = front.line_count();
            if pushed + block_height > lines {
                break;
            }
            let block = self.blocks.pop_front().expect("front exists");
            self.height -= block_height;
            pushed += block_height;
            let mut pool = self.segments.borrow_mut();
            self.scrollback.add_block(block, &mut pool);
        }
        pushed
    }

    /// Pull blocks back out of scrollback onto the top of the grid
    /// until at least `lines` rows were recovered (block granularity
    /// may overshoot).
    fn reclaim_at_least(&mut self, lines: usize) -> usize {
        let mut reclaimed = 0;
        while self.scrollback.block_count() > 0 && reclaimed < lines {
            let block = self.scrollback.reclaim_block().expect("checked non-empty");
            reclaimed += block.line_count();
            self.height += block.line_count();
            self.blocks.push_front(block);
        }
        reclaimed
    }

    /// Drop `lines` physical rows from the bottom of the grid,
    /// trimming a final partial block row by row.
    fn remove_lines_from_end(&mut self, lines: usize) -> usize {
        let mut removed = 0;
        while !self.blocks.is_empty() && removed < lines {
            let last = self.blocks.len() - 1;
            let block_height = self.blocks[last].line_count();
            if removed + block_height <= lines {
                removed += block_height;
                self.height -= block_height;
                self.blocks.pop_back();
            } else {
                let to_remove = lines - removed;
                removed += to_remove;
                self.height -= to_remove;
                let block = &mut self.blocks[last];
                for _ in 0..to_remove {
                    block.remove_line(block.line_count() - 1);
                }
            }
        }
        removed
    }

    /// Grow the grid to at least `height` rows: reclaim from scrollback
    /// first, then append fresh empty blocks at the bottom.
    fn ensure_at_least_height(&mut self, height: usize) -> usize {
        if self.height > height {
            return 0;
        }

        let to_grow = height - self.height;
        let reclaimed = self.reclaim_at_least(to_grow);

        if height > self.height {
            let to_insert = height - self.height;
            for _ in 0..to_insert {
                self.blocks
                    .push_back(Block::new(self.width, self.default_style));
            }
            debug!("inserted {} new blocks", to_insert);
            self.height += to_insert;
            // Only scrollback reclaim is of interest to the caller;
            // fresh buffer growth is not.
            reclaimed
        } else {
            to_grow
        }
    }

    fn clear_block(&mut self, idx: usize) {
        let before = self.blocks[idx].line_count();
        self.blocks[idx].clear();
        let after = self.blocks[idx].line_count();
        for _ in after..before {
            self.blocks
                .insert(idx + 1, Block::new(self.width, self.default_style));
        }
    }

    /// Find the block containing visible row `row`, refreshing the
    /// screen indices along the walk.
    fn index_for_row(&mut self, row: ScreenRowIndex) -> Option<usize> {
        let mut current = 0;
        for idx in 0..self.blocks.len() {
            self.blocks[idx].set_screen_index(current);
            let lines = self.blocks[idx].line_count();
            if row < current + lines {
                return Some(idx);
            }
            current += lines;
        }
        None
    }

    /// Like `index_for_row`, but splits the containing block so the
    /// requested row is a single-row block of its own.
    fn ensure_single_line_block(&mut self, row: ScreenRowIndex) -> Option<usize> {
        let idx = self.index_for_row(row)?;
        let index = self.blocks[idx].screen_index();
        let lines = self.blocks[idx].line_count();
        if index == row && lines == 1 {
            return Some(idx);
        }
        Some(self.split_out_row_from_block(idx, row - index))
    }

    fn split_out_row_from_block(&mut self, idx: usize, row_in_block: usize) -> usize {
        let lines = self.blocks[idx].line_count();
        let start_index = self.blocks[idx].screen_index();

        if row_in_block == 0 && lines == 1 {
            return idx;
        }

        if row_in_block == 0 {
            let mut head = self.blocks[idx].take_line(0);
            head.set_screen_index(start_index);
            self.blocks.insert(idx, head);
            idx
        } else if row_in_block == lines - 1 {
            let mut tail = self.blocks[idx].take_line(lines - 1);
            tail.set_screen_index(start_index + row_in_block);
            self.blocks.insert(idx + 1, tail);
            idx + 1
        } else {
            let half = self.blocks[idx].split(row_in_block);
            self.blocks.insert(idx + 1, half);
            let mut the_one = self.blocks[idx + 1].take_line(0);
            the_one.set_screen_index(start_index + row_in_block);
            self.blocks.insert(idx + 1, the_one);
            idx + 1
        }
    }

    fn content_height_diff(&self, old_content_height: usize) -> isize {
        self.content_height() as isize - old_content_height as isize
    }

    /// Locate a block by id, returning its index and starting row.
    pub(crate) fn find_block(&self, id: BlockId) -> Option<(usize, ScreenRowIndex)> {
        let mut row = 0;
        for (idx, block) in self.blocks.iter().enumerate() {
            if block.id() == id {
                return Some((idx, row));
            }
            row += block.line_count();
        }
        None
    }

    /// The block under a visible row, plus the row it starts at; used
    /// by the cursor to anchor itself across a reflow.
    pub(crate) fn block_info_for_row(
        &mut self,
        row: ScreenRowIndex,
    ) -> Option<(BlockId, ScreenRowIndex)> {
        let idx = self.index_for_row(row)?;
        Some((self.blocks[idx].id(), self.blocks[idx].screen_index()))
    }

    /// Iterate the grid's blocks top to bottom.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Returns the visible rows as width-padded strings.
    pub fn visible_lines(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.height);
        for block in &self.blocks {
            let text: Vec<char> = block.text_line().chars().collect();
            for row in 0..block.line_count() {
                let start = row * self.width;
                let end = text.len().min(start + self.width);
                let mut line: String = if start < end {
                    text[start..end].iter().collect()
                } else {
                    String::new()
                };
                while line.chars().count() < self.width {
                    line.push(' ');
                }
                rows.push(line);
            }
        }
        rows
    }
}

impl std::fmt::Debug for ScreenData {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("ScreenData")
            .field("width", &self.width)
            .field("screen_height", &self.screen_height)
            .field("height", &self.height)
            .field("blocks", &self.blocks.len())
            .field("scrollback_height", &self.scrollback.height())
            .finish()
    }
}
