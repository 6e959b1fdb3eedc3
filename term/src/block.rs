//! A Block is one logical line of styled text.  When its length exceeds
//! the screen width it occupies several physical rows; reflowing the
//! grid to a new width only means recomputing each block's row count.
//!
//! Blocks move between the visible grid and the scrollback as whole
//! units, and several grid operations (clearing a row, splicing a row
//! during scroll) require the target row to be a block of its own, so
//! blocks can be split at physical row boundaries and merged back
//! together.

use crate::segment::{SegmentPool, TextSegment};
use crate::style::{StyleRun, TextStyle};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BLOCK_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity for a block, independent of which container it is
/// in.  The cursor uses this to find "its" block again after a reflow.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlockId(u64);

impl BlockId {
    fn next() -> BlockId {
        BlockId(NEXT_BLOCK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct Block {
    id: BlockId,
    text: Vec<char>,
    /// Covers exactly `[0, text.len())` with no gaps.
    styles: Vec<StyleRun>,
    width: usize,
    line_count: usize,
    /// Physical row at which this block starts on the visible grid.
    /// Only meaningful while the block is owned by a ScreenData.
    screen_index: usize,
    /// Global line number including scrollback; assigned at dispatch.
    line_number: usize,
    default_style: TextStyle,
    dirty: bool,
    segments: Vec<TextSegment>,
}

impl Block {
    pub fn new(width: usize, default_style: TextStyle) -> Block {
        Block {
            id: BlockId::next(),
            text: Vec::new(),
            styles: Vec::new(),
            width,
            line_count: 1,
            screen_index: 0,
            line_number: 0,
            default_style,
            dirty: true,
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn text_size(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    #[inline]
    pub fn screen_index(&self) -> usize {
        self.screen_index
    }

    pub fn set_screen_index(&mut self, index: usize) {
        self.screen_index = index;
    }

    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Assign the global line number; moving a block within the view
    /// means it must be redrawn.
    pub fn set_line(&mut self, line: usize) {
        if self.line_number != line {
            self.line_number = line;
            self.dirty = true;
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn styles(&self) -> &[StyleRun] {
        &self.styles
    }

    pub fn default_style(&self) -> TextStyle {
        self.default_style
    }

    /// Recompose the block's text as a string.
    pub fn text_line(&self) -> String {
        self.text.iter().collect()
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.text.get(index).copied()
    }

    #[inline]
    fn rows_for_len(&self, len: usize) -> usize {
        let width = self.width.max(1);
        std::cmp::max(1, (len + width - 1) / width)
    }

    fn update_line_count(&mut self) {
        self.line_count = self.rows_for_len(self.text.len());
    }

    pub fn set_width(&mut self, width: usize) {
        if self.width != width {
            self.width = width;
            self.update_line_count();
            self.dirty = true;
        }
    }

    /// Reports what `line_count` would become if `text_length`
    /// characters were written at `pos`, without mutating anything.
    pub fn line_count_after_modified(
        &self,
        pos: usize,
        text_length: usize,
        replace: bool,
    ) -> usize {
        let len = self.text.len();
        let new_len = if replace {
            len.max(pos + text_length)
        } else {
            len.max(pos) + text_length
        };
        self.rows_for_len(new_len)
    }

    /// Overwrite `text` starting at `pos`, extending the block as
    /// needed.  `only_ascii` is a parser hint: the byte count is then
    /// also the character count, sparing a counting pass.
    pub fn replace_at(&mut self, pos: usize, text: &str, style: TextStyle, only_ascii: bool) {
        let count = if only_ascii {
            text.len()
        } else {
            text.chars().count()
        };
        if count == 0 {
            return;
        }
        self.pad_to(pos);

        let old_len = self.text.len();
        let mut cursor = pos;
        for c in text.chars() {
            if cursor < old_len {
                self.text[cursor] = c;
            } else {
                self.text.push(c);
            }
            cursor += 1;
        }

        let overwritten_end = old_len.min(pos + count);
        self.styles_overwrite(pos, overwritten_end, style);
        if pos + count > old_len {
            self.styles_append(pos + count - old_len.max(pos), style);
        }
        self.update_line_count();
        self.dirty = true;
    }

    /// Insert `text` at `pos`, shifting the remainder of the block to
    /// the right.
    pub fn insert_at(&mut self, pos: usize, text: &str, style: TextStyle, only_ascii: bool) {
        let count = if only_ascii {
            text.len()
        } else {
            text.chars().count()
        };
        if count == 0 {
            return;
        }
        self.pad_to(pos);

        let tail = self.text.split_off(pos);
        self.text.extend(text.chars());
        self.text.extend(tail);

        self.styles_insert(pos, count, style);
        self.update_line_count();
        self.dirty = true;
    }

    /// Remove all content.
    pub fn clear(&mut self) {
        self.text.clear();
        self.styles.clear();
        self.update_line_count();
        self.dirty = true;
    }

    /// Clear from `pos` to the end of the block.  Trailing cells render
    /// with the default style, so this is a truncation.
    pub fn clear_to_end(&mut self, pos: usize) {
        if pos >= self.text.len() {
            return;
        }
        let len = self.text.len();
        self.text.truncate(pos);
        self.styles_remove(pos, len);
        self.update_line_count();
        self.dirty = true;
    }

    /// Reset the inclusive range `[from, to]` to default-style blanks.
    pub fn clear_characters(&mut self, from: usize, to: usize) {
        let end = self.text.len().min(to + 1);
        if from >= end {
            return;
        }
        for c in &mut self.text[from..end] {
            *c = ' ';
        }
        self.styles_overwrite(from, end, self.default_style);
        self.dirty = true;
    }

    /// Remove the inclusive range `[from, to]`, shifting the remainder
    /// left and shortening the block.
    pub fn delete_characters(&mut self, from: usize, to: usize) {
        let end = self.text.len().min(to + 1);
        if from >= end {
            return;
        }
        self.text.drain(from..end);
        self.styles_remove(from, end);
        self.update_line_count();
        self.dirty = true;
    }

    /// Split off physical row `row` as a block of its own.  The
    /// returned block has length `width` (or the remainder for the
    /// final row); text and styles are preserved exactly.
    pub fn take_line(&mut self, row: usize) -> Block {
        let start = row * self.width;
        let end = self.text.len().min(start + self.width);
        let (text, styles) = self.extract(start, end);
        self.update_line_count();
        self.dirty = true;
        self.child_with(text, styles)
    }

    /// Discard physical row `row`.
    pub fn remove_line(&mut self, row: usize) {
        let start = row * self.width;
        let end = self.text.len().min(start + self.width);
        if start < end {
            self.text.drain(start..end);
            self.styles_remove(start, end);
        }
        self.update_line_count();
        self.dirty = true;
    }

    /// Split the block at a physical row boundary; `self` keeps rows
    /// `[0, at_row)` and the returned block owns the rest.
    pub fn split(&mut self, at_row: usize) -> Block {
        let at = at_row * self.width;
        let end = self.text.len();
        let (text, styles) = self.extract(at.min(end), end);
        self.update_line_count();
        self.dirty = true;
        self.child_with(text, styles)
    }

    /// Append `count` physical rows from the head of `src`, starting at
    /// row `first`.  The destination is padded with default-style
    /// blanks up to its current row boundary first, so that the moved
    /// rows keep their columns.
    pub fn move_lines_from_block(&mut self, src: &mut Block, first: usize, count: usize) {
        let boundary = self.line_count * self.width;
        self.pad_to(boundary);

        let start = first * src.width;
        let end = src.text.len().min(start + count * src.width);
        let (text, styles) = src.extract(start, end);
        src.update_line_count();
        src.dirty = true;

        let base = self.text.len();
        self.text.extend(text);
        for run in styles {
            self.styles
                .push(StyleRun::new(base + run.start, base + run.end, run.style));
        }
        coalesce(&mut self.styles);
        self.update_line_count();
        self.dirty = true;
    }

    /// Build a presentation event for this block if it changed,
    /// rebuilding its pooled text segments (one per style run).
    pub fn dispatch_events(&mut self, pool: &mut SegmentPool) -> Option<usize> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        for segment in self.segments.drain(..) {
            pool.release_text_segment(segment);
        }
        for _ in 0..self.styles.len() {
            let segment = pool.create_text_segment();
            self.segments.push(segment);
        }
        Some(self.line_number)
    }

    /// Hand every presentation segment back to the pool; the block will
    /// rebuild them the next time it becomes visible.
    pub fn release_text_objects(&mut self, pool: &mut SegmentPool) {
        for segment in self.segments.drain(..) {
            pool.release_text_segment(segment);
        }
        self.dirty = true;
    }

    fn child_with(&self, text: Vec<char>, styles: Vec<StyleRun>) -> Block {
        Block {
            id: BlockId::next(),
            text,
            styles,
            width: self.width,
            line_count: 1,
            screen_index: 0,
            line_number: 0,
            default_style: self.default_style,
            dirty: true,
            segments: Vec::new(),
        }
        .into_recounted()
    }

    fn into_recounted(mut self) -> Block {
        self.update_line_count();
        self
    }

    /// Extend the text with default-style blanks so that `pos` is a
    /// valid write position.
    fn pad_to(&mut self, pos: usize) {
        let len = self.text.len();
        if pos > len {
            self.text.resize(pos, ' ');
            self.styles_append(pos - len, self.default_style);
        }
    }

    /// Remove `[start, end)` returning the text and rebased styles.
    /// The range is clamped to the text that actually exists.
    fn extract(&mut self, start: usize, end: usize) -> (Vec<char>, Vec<StyleRun>) {
        let len = self.text.len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let text: Vec<char> = self.text.drain(start..end).collect();
        let mut styles = Vec::new();
        for run in &self.styles {
            let s = run.start.max(start);
            let e = run.end.min(end);
            if s < e {
                styles.push(StyleRun::new(s - start, e - start, run.style));
            }
        }
        self.styles_remove(start, end);
        (text, styles)
    }

    fn styles_overwrite(&mut self, start: usize, end: usize, style: TextStyle) {
        if start >= end {
            return;
        }
        let mut out = Vec::with_capacity(self.styles.len() + 2);
        for run in &self.styles {
            if run.end <= start || run.start >= end {
                out.push(*run);
                continue;
            }
            if run.start < start {
                out.push(StyleRun::new(run.start, start, run.style));
            }
            if run.end > end {
                out.push(StyleRun::new(end, run.end, run.style));
            }
        }
        out.push(StyleRun::new(start, end, style));
        out.sort_by_key(|run| run.start);
        coalesce(&mut out);
        self.styles = out;
    }

    fn styles_append(&mut self, count: usize, style: TextStyle) {
        if count == 0 {
            return;
        }
        let covered = self.styles.last().map(|run| run.end).unwrap_or(0);
        self.styles
            .push(StyleRun::new(covered, covered + count, style));
        coalesce(&mut self.styles);
    }

    fn styles_insert(&mut self, pos: usize, count: usize, style: TextStyle) {
        let mut out = Vec::with_capacity(self.styles.len() + 2);
        for run in &self.styles {
            if run.end <= pos {
                out.push(*run);
            } else if run.start >= pos {
                out.push(StyleRun::new(run.start + count, run.end + count, run.style));
            } else {
                out.push(StyleRun::new(run.start, pos, run.style));
                out.push(StyleRun::new(pos + count, run.end + count, run.style));
            }
        }
        out.push(StyleRun::new(pos, pos + count, style));
        out.sort_by_key(|run| run.start);
        coalesce(&mut out);
        self.styles = out;
    }

    fn styles_remove(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let removed = end - start;
        let mut out = Vec::with_capacity(self.styles.len());
        for run in &self.styles {
            if run.end <= start {
                out.push(*run);
            } else if run.start >= end {
                out.push(StyleRun::new(run.start - removed, run.end - removed, run.style));
            } else {
                if run.start < start {
                    out.push(StyleRun::new(run.start, start, run.style));
                }
                if run.end > end {
                    out.push(StyleRun::new(start, run.end - removed, run.style));
                }
            }
        }
        out.sort_by_key(|run| run.start);
        coalesce(&mut out);
        self.styles = out;
    }
}

fn coalesce(styles: &mut Vec<StyleRun>) {
    let mut i = 1;
    while i < styles.len() {
        if styles[i - 1].end == styles[i].start && styles[i - 1].style == styles[i].style {
            styles[i - 1].end = styles[i].end;
            styles.remove(i);
        } else {
            i += 1;
        }
    }
}
