//! The engine's outward-facing interfaces: the observer trait the
//! presentation layer subscribes with, and the host trait through which
//! bytes reach the pty and the clipboard.

use crate::color::RgbColor;
use crate::segment::TextSegment;
use crate::selection::SelectionRange;
use anyhow::Error;

/// Identifies which clipboard a selection should land in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ClipboardMode {
    /// The explicit copy/paste clipboard.
    Clipboard,
    /// The implicit select-to-copy (primary) clipboard.
    Selection,
}

/// Represents the host of the terminal.
/// Provides a means for sending data to the connected pty,
/// and for operating on the clipboard and window title.
pub trait TerminalHost {
    /// Returns an object that can be used to send data to the
    /// slave end of the associated pty.
    fn writer(&mut self) -> &mut dyn std::io::Write;

    /// Returns the current clipboard contents
    fn get_clipboard(&mut self) -> Result<String, Error>;

    /// Adjust the contents of the clipboard
    fn set_clipboard(&mut self, mode: ClipboardMode, clip: Option<String>) -> Result<(), Error>;

    /// Change the title of the window
    fn set_title(&mut self, title: &str);
}

/// Change notifications emitted by the engine.  All methods have no-op
/// defaults so a subscriber implements only what it draws from.
///
/// Subscribers are invoked synchronously from within
/// `Screen::dispatch_changes` and must tolerate that.
pub trait ScreenListener {
    /// The screen was told to use a new width.
    fn width_changed(&mut self, _width: usize) {}
    /// The screen was told to use a new height.
    fn height_changed(&mut self, _height: usize) {}
    /// The grid finished reflowing to a new width; `removed` lines were
    /// pushed to scrollback and `reclaimed` lines came back out of it.
    fn data_width_changed(&mut self, _new_width: usize, _removed: usize, _reclaimed: usize) {}
    /// The grid finished resizing to a new height.
    fn data_height_changed(&mut self, _new_height: usize, _removed: usize, _reclaimed: usize) {}
    /// Total content height (scrollback + grid) changed.
    fn content_height_changed(&mut self, _content_height: usize) {}
    /// A contiguous run of content lines changed.
    fn content_modified(
        &mut self,
        _start_line: usize,
        _line_count: isize,
        _content_height_diff: isize,
    ) {
    }
    /// A visible line changed since the last dispatch; `line` is the
    /// global line number including scrollback.
    fn line_changed(&mut self, _line: usize) {}
    /// Coarse signal emitted once per dispatch when anything at all
    /// changed in the text content.
    fn text_segment_changes(&mut self) {}
    /// A new presentation text segment was allocated.
    fn text_segment_created(&mut self, _segment: TextSegment) {}
    /// A cursor joined the save/restore stack.
    fn cursor_created(&mut self, _cursor_id: usize) {}
    fn cursor_x_changed(&mut self, _cursor_id: usize, _x: usize) {}
    fn cursor_y_changed(&mut self, _cursor_id: usize, _y: usize) {}
    fn cursor_visibility_changed(&mut self, _cursor_id: usize, _visible: bool) {}
    fn cursor_blinking_changed(&mut self, _cursor_id: usize, _blinking: bool) {}
    fn screen_title_changed(&mut self, _title: &str) {}
    /// The bell; emitted at most once per dispatch.
    fn flash(&mut self) {}
    fn default_background_color_changed(&mut self, _color: RgbColor) {}
    fn selection_changed(&mut self, _range: SelectionRange) {}
}

/// Notifications raised by `ScreenData` while an operation runs; the
/// owning `Screen` drains these, informs the cursors, and relays them
/// to its listeners.  Only the displayed grid's events are relayed;
/// the inactive grid's are dropped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub(crate) enum DataEvent {
    ContentModified {
        start_line: usize,
        line_count: isize,
        content_height_diff: isize,
    },
    WidthChanged {
        width: usize,
        removed: usize,
        reclaimed: usize,
    },
    HeightChanged {
        height: usize,
        removed: usize,
        reclaimed: usize,
    },
}
