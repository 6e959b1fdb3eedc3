//! The top-level terminal screen: owns the primary and alternate grids,
//! the cursor save/restore stack, the palette, the selection and the
//! change-dispatch scheduler.
//!
//! The escape-sequence parser drives this type (and the current cursor)
//! synchronously from the event thread.  Mutations accumulate; a
//! debounced dispatch commits them and notifies the registered
//! listeners in one batch, which amortizes presentation work across a
//! whole burst of pty output.

use crate::color::{ColorPalette, RgbColor};
use crate::config::TerminalConfiguration;
use crate::cursor::{Cursor, CursorEvent};
use crate::events::{ClipboardMode, DataEvent, ScreenListener, TerminalHost};
use crate::screen_data::ScreenData;
use crate::segment::{SegmentPool, TextSegment};
use crate::selection::{Selection, SelectionCoordinate, SelectionRange};
use crate::style::TextStyle;
use crate::{ContentRowIndex, PRIMARY_DEVICE_ATTRIBUTES, SECONDARY_DEVICE_ATTRIBUTES};
use anyhow::Error;
use log::debug;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

pub struct Screen {
    config: Arc<dyn TerminalConfiguration>,
    palette: ColorPalette,
    width: usize,
    height: usize,
    primary_data: ScreenData,
    alternate_data: ScreenData,
    alt_screen_is_active: bool,
    /// Which grid the presentation objects were last built for.
    old_current_is_alt: bool,
    cursor_stack: Vec<Cursor>,
    next_cursor_id: usize,
    new_cursors: Vec<usize>,
    delete_cursors: Vec<Cursor>,
    selection: Selection,
    title: String,
    flash: bool,
    application_cursor_keys: bool,
    fast_scroll: bool,
    default_background: RgbColor,
    listeners: Vec<Rc<RefCell<dyn ScreenListener>>>,
    segments: Rc<RefCell<SegmentPool>>,
    dispatch_armed_at: Option<Instant>,
    last_modified: Instant,
}

impl Screen {
    pub fn new(config: Arc<dyn TerminalConfiguration>) -> Screen {
        let palette = ColorPalette::default();
        let default_style =
            TextStyle::new(palette.default_foreground(), palette.default_background());
        let segments = Rc::new(RefCell::new(SegmentPool::new()));

        let primary_data = ScreenData::new(&config, true, default_style, Rc::clone(&segments));
        let alternate_data = ScreenData::new(&config, false, default_style, Rc::clone(&segments));

        let default_background = palette.default_background();
        let cursor = Cursor::new(0, 1, 0, default_style);

        let mut screen = Screen {
            config,
            palette,
            width: 1,
            height: 0,
            primary_data,
            alternate_data,
            alt_screen_is_active: false,
            old_current_is_alt: false,
            cursor_stack: vec![cursor],
            next_cursor_id: 1,
            new_cursors: vec![0],
            delete_cursors: Vec::new(),
            selection: Selection::new(),
            title: String::new(),
            flash: false,
            application_cursor_keys: false,
            fast_scroll: true,
            default_background,
            listeners: Vec::new(),
            segments,
            dispatch_armed_at: None,
            last_modified: Instant::now(),
        };

        screen.set_height(25);
        screen.set_width(80);
        screen
    }

    pub fn add_listener(&mut self, listener: Rc<RefCell<dyn ScreenListener>>) {
        self.listeners.push(listener);
    }

    pub fn config(&self) -> &Arc<dyn TerminalConfiguration> {
        &self.config
    }

    pub fn color_palette(&self) -> &ColorPalette {
        &self.palette
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn content_height(&self) -> usize {
        self.current_screen_data().content_height()
    }

    pub fn default_text_style(&self) -> TextStyle {
        TextStyle::new(
            self.palette.default_foreground(),
            self.palette.default_background(),
        )
    }

    pub fn current_screen_data(&self) -> &ScreenData {
        if self.alt_screen_is_active {
            &self.alternate_data
        } else {
            &self.primary_data
        }
    }

    pub fn current_screen_data_mut(&mut self) -> &mut ScreenData {
        if self.alt_screen_is_active {
            &mut self.alternate_data
        } else {
            &mut self.primary_data
        }
    }

    pub fn using_alternate_screen_buffer(&self) -> bool {
        self.alt_screen_is_active
    }

    pub fn current_cursor(&self) -> &Cursor {
        self.cursor_stack.last().expect("cursor stack is never empty")
    }

    pub fn current_cursor_mut(&mut self) -> &mut Cursor {
        self.cursor_stack
            .last_mut()
            .expect("cursor stack is never empty")
    }

    /// Committed cursor column.
    pub fn cursor_x(&self) -> usize {
        self.current_cursor().x()
    }

    /// Committed cursor row in absolute content coordinates
    /// (scrollback + grid).
    pub fn cursor_y(&self) -> ContentRowIndex {
        let data = self.current_screen_data();
        data.content_height().saturating_sub(self.height) + self.current_cursor().screen_y()
    }

    fn parts(&mut self) -> (&mut ScreenData, &mut Cursor) {
        let data = if self.alt_screen_is_active {
            &mut self.alternate_data
        } else {
            &mut self.primary_data
        };
        let cursor = self
            .cursor_stack
            .last_mut()
            .expect("cursor stack is never empty");
        (data, cursor)
    }

    pub fn set_height(&mut self, height: usize) {
        let height = height.max(1);
        if height == self.height {
            return;
        }

        debug!("setting height {}", height);
        self.height = height;

        let cursor_line = self.current_cursor().new_y();
        let width = self.primary_data.width();
        self.primary_data.set_size(width, height, cursor_line);
        let width = self.alternate_data.width();
        self.alternate_data.set_size(width, height, cursor_line);

        self.relay_data_events();
        self.emit(|l| l.height_changed(height));
        self.schedule_event_dispatch();
    }

    pub fn set_width(&mut self, width: usize) {
        let width = width.max(1);
        if width == self.width {
            return;
        }

        debug!("width about to change to {}", width);
        {
            let data = if self.alt_screen_is_active {
                &mut self.alternate_data
            } else {
                &mut self.primary_data
            };
            for cursor in &mut self.cursor_stack {
                cursor.width_about_to_change(data);
            }
        }

        debug!("setting width {}", width);
        self.width = width;

        let cursor_line = self.current_cursor().new_y();
        let height = self.primary_data.screen_height();
        self.primary_data.set_size(width, height, cursor_line);
        let height = self.alternate_data.screen_height();
        self.alternate_data.set_size(width, height, cursor_line);

        self.relay_data_events();
        self.emit(|l| l.width_changed(width));
        self.schedule_event_dispatch();
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.set_height(height);
        self.set_width(width);
    }

    pub fn use_alternate_screen_buffer(&mut self) {
        if !self.alt_screen_is_active {
            debug!("switching to alternate screen buffer");
            // Drop anything the outgoing grid still had queued; its
            // notifications are disconnected while it is inactive.
            self.primary_data.take_events();
            self.alt_screen_is_active = true;
            self.alternate_data.clear();
            self.alternate_data.take_events();
            let content_height = self.alternate_data.content_height();
            self.emit(|l| l.content_height_changed(content_height));
            self.schedule_event_dispatch();
        }
    }

    pub fn use_normal_screen_buffer(&mut self) {
        if self.alt_screen_is_active {
            debug!("switching to normal screen buffer");
            self.alternate_data.take_events();
            self.alt_screen_is_active = false;
            let content_height = self.primary_data.content_height();
            self.emit(|l| l.content_height_changed(content_height));
            self.schedule_event_dispatch();
        }
    }

    /// Push a clone of the current cursor; the predecessor is hidden
    /// until restored.
    pub fn save_cursor(&mut self) {
        let id = self.next_cursor_id;
        self.next_cursor_id += 1;

        let current = self.current_cursor_mut();
        current.set_visible(false);
        let saved = current.clone_for_save(id);
        self.cursor_stack.push(saved);
        self.new_cursors.push(id);
        debug!("saved cursor, stack size: {}", self.cursor_stack.len());
        self.schedule_event_dispatch();
    }

    /// Pop the cursor stack, keeping at least one cursor.  The popped
    /// cursor is reaped at the next dispatch so listeners never see a
    /// dangling reference.
    pub fn restore_cursor(&mut self) {
        if self.cursor_stack.len() <= 1 {
            return;
        }

        let popped = self.cursor_stack.pop().expect("stack size checked");
        self.delete_cursors.push(popped);
        self.current_cursor_mut().set_visible(true);
        debug!("restored cursor, stack size: {}", self.cursor_stack.len());
        self.schedule_event_dispatch();
    }

    pub fn clear_screen(&mut self) {
        self.current_screen_data_mut().clear();
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    /// Fill every row of the grid with `character`.
    pub fn fill(&mut self, character: char) {
        self.current_screen_data_mut().fill(character);
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    pub fn clear(&mut self) {
        self.fill(' ');
    }

    /// Write decoded bytes at the cursor, honoring the insert mode.
    pub fn add_at_cursor(&mut self, bytes: &[u8], only_ascii: bool) {
        let (data, cursor) = self.parts();
        cursor.add_at_cursor(data, bytes, only_ascii);
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    pub fn line_feed(&mut self) {
        let (data, cursor) = self.parts();
        cursor.line_feed(data);
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    pub fn reverse_line_feed(&mut self) {
        let (data, cursor) = self.parts();
        cursor.reverse_line_feed(data);
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let (data, cursor) = self.parts();
        cursor.scroll_up(data, lines);
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let (data, cursor) = self.parts();
        cursor.scroll_down(data, lines);
        self.relay_data_events();
        self.schedule_event_dispatch();
    }

    pub fn clear_to_end_of_line(&mut self) {
        let (data, cursor) = self.parts();
        cursor.clear_to_end_of_line(data);
        self.schedule_event_dispatch();
    }

    pub fn clear_to_beginning_of_line(&mut self) {
        let (data, cursor) = self.parts();
        cursor.clear_to_beginning_of_line(data);
        self.schedule_event_dispatch();
    }

    pub fn clear_to_end_of_screen(&mut self) {
        let (data, cursor) = self.parts();
        cursor.clear_to_end_of_screen(data);
        self.schedule_event_dispatch();
    }

    pub fn clear_to_beginning_of_screen(&mut self) {
        let (data, cursor) = self.parts();
        cursor.clear_to_beginning_of_screen(data);
        self.schedule_event_dispatch();
    }

    pub fn clear_line(&mut self) {
        let (data, cursor) = self.parts();
        cursor.clear_line(data);
        self.schedule_event_dispatch();
    }

    pub fn delete_characters(&mut self, characters: usize) {
        let (data, cursor) = self.parts();
        cursor.delete_characters(data, characters);
        self.schedule_event_dispatch();
    }

    pub fn set_application_cursor_keys(&mut self, enable: bool) {
        self.application_cursor_keys = enable;
    }

    pub fn application_cursor_keys(&self) -> bool {
        self.application_cursor_keys
    }

    pub fn set_fast_scroll(&mut self, fast: bool) {
        self.fast_scroll = fast;
    }

    pub fn fast_scroll(&self) -> bool {
        self.fast_scroll
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
        let title = self.title.clone();
        self.emit(|l| l.screen_title_changed(&title));
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Request the visual bell; emitted once at the next dispatch.
    pub fn schedule_flash(&mut self) {
        self.flash = true;
        self.schedule_event_dispatch();
    }

    pub fn selection_range(&self) -> SelectionRange {
        self.selection.range()
    }

    pub fn set_selection(&mut self, start: SelectionCoordinate, end: SelectionCoordinate) {
        self.selection.set_start(start);
        self.selection.set_end(end);
        self.schedule_event_dispatch();
    }

    /// Anchor the selection on the word around the given combined
    /// content coordinate.
    pub fn double_clicked(&mut self, character: usize, line: ContentRowIndex) {
        let range = self
            .current_screen_data_mut()
            .get_double_click_selection_range(character, line);
        self.selection.set_range(range);
        self.schedule_event_dispatch();
    }

    /// Stitch the selected text together and hand it to the host's
    /// clipboard.
    pub fn send_selection_to_clipboard(
        &mut self,
        start: (usize, ContentRowIndex),
        end: (usize, ContentRowIndex),
        mode: ClipboardMode,
        host: &mut dyn TerminalHost,
    ) -> Result<(), Error> {
        self.current_screen_data_mut()
            .send_selection_to_clipboard(start, end, mode, host)
    }

    pub fn send_primary_device_attributes(
        &mut self,
        host: &mut dyn TerminalHost,
    ) -> Result<(), Error> {
        host.writer().write_all(PRIMARY_DEVICE_ATTRIBUTES)?;
        Ok(())
    }

    pub fn send_secondary_device_attributes(
        &mut self,
        host: &mut dyn TerminalHost,
    ) -> Result<(), Error> {
        host.writer().write_all(SECONDARY_DEVICE_ATTRIBUTES)?;
        Ok(())
    }

    pub fn default_foreground_color(&self) -> RgbColor {
        self.palette.default_foreground()
    }

    pub fn default_background_color(&self) -> RgbColor {
        self.palette.default_background()
    }

    pub fn set_default_foreground_color(&mut self, color: RgbColor) {
        if self.palette.set_default_foreground(color) {
            self.palette_changed();
        }
    }

    pub fn set_default_background_color(&mut self, color: RgbColor) {
        if self.palette.set_default_background(color) {
            self.palette_changed();
        }
    }

    fn palette_changed(&mut self) {
        let default_style = self.default_text_style();
        self.primary_data.set_default_style(default_style);
        self.alternate_data.set_default_style(default_style);
        for cursor in &mut self.cursor_stack {
            cursor.reset_colors(&self.palette);
        }

        let new_default = self.palette.default_background();
        if new_default != self.default_background {
            self.default_background = new_default;
            self.emit(|l| l.default_background_color_changed(new_default));
        }
        self.schedule_event_dispatch();
    }

    /// Make the scrollback window starting at `top_line` renderable.
    pub fn ensure_visible_lines(&mut self, top_line: usize) {
        self.current_screen_data_mut().ensure_visible_lines(top_line);
        self.schedule_event_dispatch();
    }

    pub fn create_text_segment(&self) -> TextSegment {
        self.segments.borrow_mut().create_text_segment()
    }

    pub fn release_text_segment(&self, segment: TextSegment) {
        self.segments.borrow_mut().release_text_segment(segment);
    }

    /// Dump the grid's text to the log for debugging.
    pub fn print_screen(&self) {
        for (idx, line) in self.current_screen_data().visible_lines().iter().enumerate() {
            debug!("{:3} [{}]", idx, line);
        }
        debug!("total height: {}", self.current_screen_data().content_height());
    }

    /// Arm the dispatch debounce (if not already armed) and note that
    /// the stream was active just now.
    pub fn schedule_event_dispatch(&mut self) {
        let now = Instant::now();
        if self.dispatch_armed_at.is_none() {
            debug!("scheduling dispatch");
            self.dispatch_armed_at = Some(now);
        }
        self.last_modified = now;
    }

    /// True when the debounce should fire: the stream has stayed quiet
    /// for the idle interval, or the watchdog interval elapsed since
    /// the dispatch was first armed.
    pub fn needs_dispatch(&self, now: Instant) -> bool {
        match self.dispatch_armed_at {
            None => false,
            Some(armed_at) => {
                now.duration_since(self.last_modified) > self.config.dispatch_idle_interval()
                    || now.duration_since(armed_at) > self.config.dispatch_watchdog_interval()
            }
        }
    }

    /// The instant at which the pending dispatch is due, for event
    /// loops that want to sleep precisely.
    pub fn next_dispatch_deadline(&self) -> Option<Instant> {
        self.dispatch_armed_at.map(|armed_at| {
            (self.last_modified + self.config.dispatch_idle_interval())
                .min(armed_at + self.config.dispatch_watchdog_interval())
        })
    }

    /// Fire the dispatch if it is due.  Returns whether it ran.
    pub fn maybe_dispatch_changes(&mut self, now: Instant) -> bool {
        if self.needs_dispatch(now) {
            self.dispatch_changes();
            true
        } else {
            false
        }
    }

    /// Commit and publish everything that changed since the previous
    /// dispatch.
    pub fn dispatch_changes(&mut self) {
        debug!("dispatching");
        self.dispatch_armed_at = None;

        // The outgoing grid frees its presentation objects once we
        // stopped displaying it; its block data stays intact.
        if self.old_current_is_alt != self.alt_screen_is_active {
            if self.old_current_is_alt {
                self.alternate_data.release_text_objects();
            } else {
                self.primary_data.release_text_objects();
            }
            self.old_current_is_alt = self.alt_screen_is_active;
        }

        let (changed_lines, content_height_changed) =
            self.current_screen_data_mut().dispatch_line_events();

        let created = self.segments.borrow_mut().take_created();
        for segment in created {
            self.emit(|l| l.text_segment_created(segment));
        }
        for line in changed_lines {
            self.emit(|l| l.line_changed(line));
        }
        if content_height_changed {
            for cursor in &mut self.cursor_stack {
                cursor.note_content_height_changed();
            }
            let content_height = self.current_screen_data().content_height();
            self.emit(|l| l.content_height_changed(content_height));
        }

        self.emit(|l| l.text_segment_changes());

        if self.flash {
            self.flash = false;
            self.emit(|l| l.flash());
        }

        for dead in self.delete_cursors.drain(..).collect::<Vec<_>>() {
            if let Some(pos) = self.new_cursors.iter().position(|&id| id == dead.id()) {
                self.new_cursors.remove(pos);
            }
        }
        for id in self.new_cursors.drain(..).collect::<Vec<_>>() {
            self.emit(|l| l.cursor_created(id));
        }

        for idx in 0..self.cursor_stack.len() {
            let id = self.cursor_stack[idx].id();
            let events = self.cursor_stack[idx].dispatch_events();
            for event in events {
                match event {
                    CursorEvent::XChanged(x) => self.emit(|l| l.cursor_x_changed(id, x)),
                    CursorEvent::YChanged(y) => self.emit(|l| l.cursor_y_changed(id, y)),
                    CursorEvent::VisibilityChanged(v) => {
                        self.emit(|l| l.cursor_visibility_changed(id, v))
                    }
                    CursorEvent::BlinkingChanged(b) => {
                        self.emit(|l| l.cursor_blinking_changed(id, b))
                    }
                }
            }
        }

        if let Some(range) = self.selection.dispatch_changes() {
            self.emit(|l| l.selection_changed(range));
        }
    }

    /// Forward pending data notifications: the active grid's events go
    /// to the cursors and listeners, the inactive grid's are dropped
    /// (its signals are disconnected while it is not displayed).
    fn relay_data_events(&mut self) {
        if self.alt_screen_is_active {
            self.primary_data.take_events();
        } else {
            self.alternate_data.take_events();
        }

        let events = self.current_screen_data_mut().take_events();
        for event in events {
            match event {
                DataEvent::WidthChanged {
                    width,
                    removed,
                    reclaimed,
                } => {
                    {
                        let data = if self.alt_screen_is_active {
                            &self.alternate_data
                        } else {
                            &self.primary_data
                        };
                        for cursor in &mut self.cursor_stack {
                            cursor.width_changed(data, width, removed, reclaimed);
                        }
                    }
                    self.emit(|l| l.data_width_changed(width, removed, reclaimed));
                }
                DataEvent::HeightChanged {
                    height,
                    removed,
                    reclaimed,
                } => {
                    for cursor in &mut self.cursor_stack {
                        cursor.height_changed(height, removed, reclaimed);
                    }
                    self.emit(|l| l.data_height_changed(height, removed, reclaimed));
                }
                DataEvent::ContentModified {
                    start_line,
                    line_count,
                    content_height_diff,
                } => {
                    self.emit(|l| l.content_modified(start_line, line_count, content_height_diff));
                }
            }
        }
    }

    fn emit<F: FnMut(&mut dyn ScreenListener)>(&self, mut f: F) {
        for listener in &self.listeners {
            f(&mut *listener.borrow_mut());
        }
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.debug_struct("Screen")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alt_active", &self.alt_screen_is_active)
            .field("cursors", &self.cursor_stack.len())
            .finish()
    }
}
