//! The cursor state machine.
//!
//! Movement operations compute into a pending position; a later
//! dispatch commits it and emits change notifications only for the
//! fields that actually moved, which is what lets a burst of parser
//! activity collapse into a single redraw.
//!
//! The cursor caches the screen dimensions and reacts to resize
//! notifications from the owning screen; operations that edit the grid
//! receive the active `ScreenData` as explicit context.

use crate::block::BlockId;
use crate::charset::{Charset, Decoder};
use crate::color::{AnsiColor, ColorPalette, RgbColor};
use crate::screen_data::ScreenData;
use crate::style::{StyleFlags, TextStyle};
use log::debug;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InsertMode {
    Replace,
    Insert,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum CursorEvent {
    XChanged(usize),
    YChanged(usize),
    VisibilityChanged(bool),
    BlinkingChanged(bool),
}

pub struct Cursor {
    id: usize,
    position: (usize, usize),
    new_position: (usize, usize),
    current_text_style: TextStyle,
    screen_width: usize,
    screen_height: usize,
    top_margin: usize,
    bottom_margin: usize,
    scroll_margins_set: bool,
    origin_at_margin: bool,
    visible: bool,
    new_visibility: bool,
    blinking: bool,
    new_blinking: bool,
    wrap_around: bool,
    content_height_changed: bool,
    insert_mode: InsertMode,
    tab_stops: Vec<usize>,
    gl_decoder: Decoder,
    gr_decoder: Decoder,
    resize_block: Option<BlockId>,
    current_pos_in_block: usize,
}

impl Cursor {
    pub fn new(
        id: usize,
        screen_width: usize,
        screen_height: usize,
        style: TextStyle,
    ) -> Cursor {
        let tab_stops = (0..screen_width).step_by(8).collect();
        Cursor {
            id,
            position: (0, 0),
            new_position: (0, 0),
            current_text_style: style,
            screen_width,
            screen_height,
            top_margin: 0,
            bottom_margin: 0,
            scroll_margins_set: false,
            origin_at_margin: false,
            visible: true,
            new_visibility: true,
            blinking: false,
            new_blinking: false,
            wrap_around: true,
            content_height_changed: false,
            insert_mode: InsertMode::Replace,
            tab_stops,
            gl_decoder: Decoder::new(Charset::Utf8),
            gr_decoder: Decoder::new(Charset::Utf8),
            resize_block: None,
            current_pos_in_block: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Committed column.
    #[inline]
    pub fn x(&self) -> usize {
        self.position.0
    }

    /// Committed row, in visible-grid coordinates.  The absolute
    /// content row is obtained through `Screen::cursor_y`.
    #[inline]
    pub fn screen_y(&self) -> usize {
        self.position.1
    }

    /// Pending column.
    #[inline]
    pub fn new_x(&self) -> usize {
        self.new_position.0
    }

    /// Pending row.
    #[inline]
    pub fn new_y(&self) -> usize {
        self.new_position.1
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.new_visibility = visible;
    }

    pub fn blinking(&self) -> bool {
        self.blinking
    }

    pub fn set_blinking(&mut self, blinking: bool) {
        self.new_blinking = blinking;
    }

    pub fn wrap_around(&self) -> bool {
        self.wrap_around
    }

    pub fn set_wrap_around(&mut self, wrap: bool) {
        self.wrap_around = wrap;
    }

    pub fn insert_mode(&self) -> InsertMode {
        self.insert_mode
    }

    pub fn set_insert_mode(&mut self, mode: InsertMode) {
        self.insert_mode = mode;
    }

    pub fn origin_at_margin(&self) -> bool {
        self.origin_at_margin
    }

    pub fn set_origin_at_margin(&mut self, at_margin: bool) {
        self.origin_at_margin = at_margin;
        self.new_position = (0, self.adjusted_top());
    }

    pub fn current_text_style(&self) -> TextStyle {
        self.current_text_style
    }

    /// Add or remove attribute bits on the pen.
    pub fn set_text_style(&mut self, style: StyleFlags, add: bool) {
        if add {
            self.current_text_style.flags.insert(style);
        } else {
            self.current_text_style.flags.remove(style);
        }
    }

    pub fn reset_colors(&mut self, palette: &ColorPalette) {
        self.current_text_style.foreground = palette.default_foreground();
        self.current_text_style.background = palette.default_background();
    }

    pub fn reset_style(&mut self, palette: &ColorPalette) {
        self.reset_colors(palette);
        self.current_text_style.flags = StyleFlags::empty();
    }

    pub fn set_text_foreground_color(&mut self, color: RgbColor) {
        self.current_text_style.foreground = color;
    }

    pub fn set_text_background_color(&mut self, color: RgbColor) {
        self.current_text_style.background = color;
    }

    pub fn set_text_foreground_color_index(
        &mut self,
        palette: &ColorPalette,
        color: AnsiColor,
        bold: bool,
    ) {
        debug!("foreground {:?}", color);
        self.set_text_foreground_color(palette.color(color, bold));
    }

    pub fn set_text_background_color_index(
        &mut self,
        palette: &ColorPalette,
        color: AnsiColor,
        bold: bool,
    ) {
        debug!("background {:?}", color);
        self.set_text_background_color(palette.color(color, bold));
    }

    pub fn set_gl_charset(&mut self, charset: Charset) {
        self.gl_decoder.set_charset(charset);
    }

    pub fn set_gr_charset(&mut self, charset: Charset) {
        self.gr_decoder.set_charset(charset);
    }

    pub fn gr_decoder_mut(&mut self) -> &mut Decoder {
        &mut self.gr_decoder
    }

    fn top(&self) -> usize {
        if self.scroll_margins_set {
            self.top_margin
        } else {
            0
        }
    }

    fn bottom(&self) -> usize {
        if self.scroll_margins_set {
            self.bottom_margin
        } else {
            self.screen_height - 1
        }
    }

    fn adjusted_top(&self) -> usize {
        if self.origin_at_margin {
            self.top_margin
        } else {
            0
        }
    }

    fn adjusted_bottom(&self) -> usize {
        if self.origin_at_margin {
            self.bottom_margin
        } else {
            self.screen_height - 1
        }
    }

    fn adjusted_new_y(&self) -> usize {
        if self.origin_at_margin {
            self.new_position.1 - self.top_margin
        } else {
            self.new_position.1
        }
    }

    pub fn move_origin(&mut self) {
        self.new_position = (0, self.adjusted_top());
    }

    pub fn move_beginning_of_line(&mut self) {
        self.new_position.0 = 0;
    }

    pub fn move_up(&mut self, lines: usize) {
        let adjusted_new_y = self.adjusted_new_y();
        debug!("move_up {} from {}", lines, self.new_position.1);
        if adjusted_new_y == 0 || lines == 0 {
            return;
        }
        if lines < adjusted_new_y {
            self.new_position.1 -= lines;
        } else {
            self.new_position.1 = self.adjusted_top();
        }
    }

    pub fn move_down(&mut self, lines: usize) {
        let bottom = self.adjusted_bottom();
        debug!("move_down {} toward {}", lines, bottom);
        if self.new_position.1 == bottom || lines == 0 {
            return;
        }
        if self.new_position.1 + lines <= bottom {
            self.new_position.1 += lines;
        } else {
            self.new_position.1 = bottom;
        }
    }

    pub fn move_left(&mut self, positions: usize) {
        if self.new_position.0 == 0 || positions == 0 {
            return;
        }
        if positions < self.new_position.0 {
            self.new_position.0 -= positions;
        } else {
            self.new_position.0 = 0;
        }
    }

    pub fn move_right(&mut self, positions: usize) {
        let width = self.screen_width;
        if self.new_position.0 == width - 1 || positions == 0 {
            return;
        }
        if positions < width - self.new_position.0 {
            self.new_position.0 += positions;
        } else {
            self.new_position.0 = width - 1;
        }
    }

    /// Absolute move; `y` is interpreted relative to the top margin in
    /// origin mode.  Both axes clamp.
    pub fn move_to(&mut self, x: isize, y: isize) {
        let width = self.screen_width as isize;

        let mut y = y;
        if self.origin_at_margin {
            y += self.top_margin as isize;
        }

        let x = x.max(0).min(width - 1) as usize;
        let y = y
            .max(self.adjusted_top() as isize)
            .min(self.adjusted_bottom() as isize) as usize;

        debug!("move_to ({}, {})", x, y);
        if self.new_position != (x, y) {
            self.new_position = (x, y);
        }
    }

    pub fn move_to_line(&mut self, line: isize) {
        let height = self.screen_height;
        let line = if line < self.adjusted_top() as isize {
            0
        } else if line > self.adjusted_bottom() as isize {
            height - 1
        } else {
            line as usize
        };

        if line != self.new_position.1 {
            self.new_position.1 = line;
        }
    }

    /// Horizontal move with 1-based DEC semantics: negative values
    /// clamp to column 1 and values above the width clamp to the
    /// width itself.  This is knowingly inconsistent with the 0-based
    /// move operations; callers compensate.
    pub fn move_to_character(&mut self, character: isize) {
        let width = self.screen_width as isize;
        let character = if character < 0 {
            1
        } else if character > width {
            width as usize
        } else {
            character as usize
        };
        if character != self.new_position.0 {
            self.new_position.0 = character;
        }
    }

    /// Advance to the least tab stop greater than the pending column,
    /// or the last column when none remains.
    pub fn move_to_next_tab(&mut self) {
        for &stop in &self.tab_stops {
            if self.new_position.0 < stop {
                let target = stop.min(self.screen_width - 1);
                self.move_to_character(target as isize);
                return;
            }
        }
        self.move_to_character(self.screen_width as isize - 1);
    }

    pub fn set_tab_stop(&mut self) {
        let x = self.new_position.0;
        match self.tab_stops.binary_search(&x) {
            Ok(_) => {}
            Err(pos) => self.tab_stops.insert(pos, x),
        }
    }

    pub fn remove_tab_stop(&mut self) {
        let x = self.new_position.0;
        if let Ok(pos) = self.tab_stops.binary_search(&x) {
            self.tab_stops.remove(pos);
        }
    }

    pub fn clear_tab_stops(&mut self) {
        self.tab_stops.clear();
    }

    pub fn set_scroll_area(&mut self, from: usize, to: usize) {
        self.top_margin = from;
        self.bottom_margin = to.min(self.screen_height - 1);
        self.scroll_margins_set = true;
    }

    pub fn reset_scroll_area(&mut self) {
        self.top_margin = 0;
        self.bottom_margin = 0;
        self.scroll_margins_set = false;
    }

    /// Scroll the region up: the top line is cleared and reinserted at
    /// the bottom, moving content toward the top.
    pub fn scroll_up(&mut self, data: &mut ScreenData, lines: usize) {
        if self.new_position.1 < self.top() || self.new_position.1 > self.bottom() {
            return;
        }
        for _ in 0..lines {
            data.move_line(self.top(), self.bottom());
        }
    }

    /// Scroll the region down: the bottom line is cleared and
    /// reinserted at the top, moving content toward the bottom.
    pub fn scroll_down(&mut self, data: &mut ScreenData, lines: usize) {
        if self.new_position.1 < self.top() || self.new_position.1 > self.bottom() {
            return;
        }
        for _ in 0..lines {
            data.move_line(self.bottom(), self.top());
        }
    }

    /// Write decoded text at the cursor, honoring the insert mode.
    pub fn add_at_cursor(&mut self, data: &mut ScreenData, bytes: &[u8], only_ascii: bool) {
        match self.insert_mode {
            InsertMode::Replace => self.replace_at_cursor(data, bytes, only_ascii),
            InsertMode::Insert => self.insert_at_cursor(data, bytes, only_ascii),
        }
    }

    pub fn replace_at_cursor(&mut self, data: &mut ScreenData, bytes: &[u8], only_ascii: bool) {
        let text = self.gl_decoder.decode_to_string(bytes);
        if text.is_empty() {
            return;
        }
        // the hint is only trustworthy if the decoder kept it true
        let only_ascii = only_ascii && text.is_ascii();
        let count = if only_ascii {
            text.len()
        } else {
            text.chars().count()
        };
        let (x, y) = self.new_position;

        if !self.wrap_around && x + count > self.screen_width {
            // No autowrap: the overflow is discarded except for the
            // final character, which lands in the rightmost cell.
            let size = self.screen_width - x;
            let mut to_block: String = text.chars().take(size).collect();
            if let Some(last) = text.chars().last() {
                to_block.pop();
                to_block.push(last);
            }
            data.replace(x, y, &to_block, self.current_text_style, only_ascii);
            self.new_position.0 += size;
        } else {
            let diff = data.replace(x, y, &text, self.current_text_style, only_ascii);
            self.new_position.0 = (self.new_position.0 as isize + diff.character) as usize;
            self.new_position.1 = (self.new_position.1 as isize + diff.line) as usize;
        }

        if self.new_position.1 >= self.screen_height {
            self.new_position.1 = self.screen_height - 1;
        }
        if self.new_position.0 >= self.screen_width {
            self.new_position.0 = self.screen_width - 1;
        }
    }

    pub fn insert_at_cursor(&mut self, data: &mut ScreenData, bytes: &[u8], only_ascii: bool) {
        let text = self.gl_decoder.decode_to_string(bytes);
        if text.is_empty() {
            return;
        }
        let only_ascii = only_ascii && text.is_ascii();
        let (x, y) = self.new_position;
        let diff = data.insert(x, y, &text, self.current_text_style, only_ascii);
        self.new_position.0 = (self.new_position.0 as isize + diff.character) as usize;
        self.new_position.1 = (self.new_position.1 as isize + diff.line) as usize;
        if self.new_position.1 >= self.screen_height {
            self.new_position.1 = self.screen_height - 1;
        }
        if self.new_position.0 >= self.screen_width {
            self.new_position.0 = self.screen_width - 1;
        }
    }

    /// At the bottom of the scroll region this scrolls the region up
    /// by one; elsewhere the cursor just moves down.
    pub fn line_feed(&mut self, data: &mut ScreenData) {
        if self.new_position.1 >= self.bottom() {
            data.insert_line(self.bottom(), self.top());
        } else {
            self.new_position.1 += 1;
        }
    }

    /// At the top of the scroll region this scrolls the region down by
    /// one; elsewhere the cursor just moves up.
    pub fn reverse_line_feed(&mut self, data: &mut ScreenData) {
        if self.new_position.1 == self.top() {
            self.scroll_down(data, 1);
        } else {
            self.new_position.1 -= 1;
        }
    }

    pub fn clear_to_beginning_of_line(&mut self, data: &mut ScreenData) {
        data.clear_to_beginning_of_line(self.new_position.0, self.new_position.1);
    }

    pub fn clear_to_end_of_line(&mut self, data: &mut ScreenData) {
        data.clear_to_end_of_line(self.new_position.0, self.new_position.1);
    }

    pub fn clear_to_beginning_of_screen(&mut self, data: &mut ScreenData) {
        self.clear_to_beginning_of_line(data);
        if self.new_position.1 > 0 {
            data.clear_to_beginning_of_screen(self.new_position.1 - 1);
        }
    }

    pub fn clear_to_end_of_screen(&mut self, data: &mut ScreenData) {
        self.clear_to_end_of_line(data);
        if self.new_position.1 < self.screen_height - 1 {
            data.clear_to_end_of_screen(self.new_position.1 + 1);
        }
    }

    pub fn clear_line(&mut self, data: &mut ScreenData) {
        data.clear_line(self.new_position.1);
    }

    pub fn delete_characters(&mut self, data: &mut ScreenData, characters: usize) {
        if characters == 0 {
            return;
        }
        data.delete_characters(
            self.new_position.0,
            self.new_position.1,
            self.new_position.0 + characters - 1,
        );
    }

    /// The width is about to change: remember which block holds the
    /// pending row and the character offset within it, so the cursor
    /// can stay on the same logical character across the reflow.
    pub fn width_about_to_change(&mut self, data: &mut ScreenData) {
        if let Some((id, start_row)) = data.block_info_for_row(self.new_position.1) {
            self.resize_block = Some(id);
            let line_diff = self.new_position.1 - start_row;
            self.current_pos_in_block = line_diff * self.screen_width + self.new_position.0;
        } else {
            self.resize_block = None;
            self.current_pos_in_block = 0;
        }
    }

    /// The reflow finished; recompute the pending position from the
    /// snapshot taken in `width_about_to_change`.
    pub fn width_changed(
        &mut self,
        data: &ScreenData,
        new_width: usize,
        removed_beginning: usize,
        reclaimed: usize,
    ) {
        if new_width > self.screen_width {
            for i in self.screen_width..new_width {
                if i % 8 == 0 {
                    self.tab_stops.push(i);
                }
            }
        }

        self.screen_width = new_width;

        match self.resize_block.and_then(|id| data.find_block(id)) {
            None => {
                // The block left the grid entirely.
                if removed_beginning > reclaimed {
                    self.new_position = (0, 0);
                } else {
                    self.new_position = (0, self.screen_height - 1);
                }
            }
            Some((_, start_row)) => {
                let mut y = start_row + self.current_pos_in_block / new_width;
                let x = self.current_pos_in_block % new_width;
                if y >= self.screen_height {
                    let diff = y - self.screen_height;
                    y -= diff + 1;
                }
                self.new_position = (x, y);
            }
        }
        debug!(
            "width_changed: {} removed {} reclaimed {} new pos {:?} screen {}x{}",
            new_width,
            removed_beginning,
            reclaimed,
            self.new_position,
            self.screen_width,
            self.screen_height
        );
        debug_assert!(self.new_position.0 < self.screen_width);
        debug_assert!(self.new_position.1 < self.screen_height);
        self.resize_block = None;
        self.current_pos_in_block = 0;
    }

    pub fn height_changed(
        &mut self,
        new_height: usize,
        removed_beginning: usize,
        reclaimed: usize,
    ) {
        self.reset_scroll_area();
        self.screen_height = new_height;
        let mut y =
            self.new_position.1 as isize - removed_beginning as isize + reclaimed as isize;
        if y <= 0 {
            y = 0;
        }
        if y as usize >= new_height {
            let diff = y as usize - new_height;
            y -= diff as isize + 1;
        }
        self.new_position.1 = y.max(0) as usize;
        debug!(
            "height_changed: {} removed {} reclaimed {} new pos {:?}",
            new_height, removed_beginning, reclaimed, self.new_position
        );
        debug_assert!(self.new_position.1 < self.screen_height);
    }

    pub(crate) fn note_content_height_changed(&mut self) {
        self.content_height_changed = true;
    }

    /// Commit pending state, reporting only the fields that moved.
    pub(crate) fn dispatch_events(&mut self) -> Vec<CursorEvent> {
        let mut events = Vec::new();

        if self.new_position != self.position || self.content_height_changed {
            let x_changed = self.new_position.0 != self.position.0;
            let y_changed = self.new_position.1 != self.position.1;
            self.position = self.new_position;
            if x_changed {
                events.push(CursorEvent::XChanged(self.position.0));
            }
            if y_changed || self.content_height_changed {
                events.push(CursorEvent::YChanged(self.position.1));
            }
            self.content_height_changed = false;
        }

        if self.new_visibility != self.visible {
            self.visible = self.new_visibility;
            events.push(CursorEvent::VisibilityChanged(self.visible));
        }

        if self.new_blinking != self.blinking {
            self.blinking = self.new_blinking;
            events.push(CursorEvent::BlinkingChanged(self.blinking));
        }

        events
    }

    /// Clone the state a freshly saved cursor starts from.
    pub(crate) fn clone_for_save(&self, id: usize) -> Cursor {
        Cursor {
            id,
            position: self.position,
            new_position: self.new_position,
            current_text_style: self.current_text_style,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            top_margin: self.top_margin,
            bottom_margin: self.bottom_margin,
            scroll_margins_set: self.scroll_margins_set,
            origin_at_margin: self.origin_at_margin,
            visible: self.visible,
            new_visibility: true,
            blinking: self.blinking,
            new_blinking: self.new_blinking,
            wrap_around: self.wrap_around,
            content_height_changed: false,
            insert_mode: self.insert_mode,
            tab_stops: self.tab_stops.clone(),
            gl_decoder: Decoder::new(Charset::Utf8),
            gr_decoder: Decoder::new(Charset::Utf8),
            resize_block: None,
            current_pos_in_block: 0,
        }
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("Cursor")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("new_position", &self.new_position)
            .field("visible", &self.visible)
            .field("screen", &(self.screen_width, self.screen_height))
            .finish()
    }
}
