//! Various tests of the screen-state model: grid edits, reflow,
//! scrollback movement, cursor clamping and the coalesced dispatch.

use crate::color::RgbColor;
use crate::config::{DefaultConfiguration, TerminalConfiguration};
use crate::events::{ClipboardMode, ScreenListener, TerminalHost};
use crate::screen::Screen;
use crate::segment::TextSegment;
use crate::selection::SelectionRange;
use anyhow::anyhow;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

mod cursor;
mod resize;
mod screen;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug)]
struct TestConfig {
    scrollback: usize,
}

impl TerminalConfiguration for TestConfig {
    fn scrollback_size(&self) -> usize {
        self.scrollback
    }
}

fn new_screen() -> Screen {
    Screen::new(Arc::new(DefaultConfiguration))
}

fn screen_with_scrollback(lines: usize) -> Screen {
    Screen::new(Arc::new(TestConfig { scrollback: lines }))
}

#[derive(Default, Debug)]
struct TestHost {
    output: Vec<u8>,
    clip: Option<String>,
    clip_mode: Option<ClipboardMode>,
    title: String,
}

impl TerminalHost for TestHost {
    fn writer(&mut self) -> &mut dyn std::io::Write {
        &mut self.output
    }

    fn get_clipboard(&mut self) -> Result<String, anyhow::Error> {
        self.clip.clone().ok_or_else(|| anyhow!("no clipboard"))
    }

    fn set_clipboard(
        &mut self,
        mode: ClipboardMode,
        clip: Option<String>,
    ) -> Result<(), anyhow::Error> {
        self.clip_mode = Some(mode);
        self.clip = clip;
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.into();
    }
}

/// Records every notification so tests can assert on exactly what a
/// dispatch emitted.
#[derive(Default)]
struct TestListener {
    width_changed: Vec<usize>,
    height_changed: Vec<usize>,
    data_width_changed: Vec<(usize, usize, usize)>,
    data_height_changed: Vec<(usize, usize, usize)>,
    content_height_changed: Vec<usize>,
    content_modified: Vec<(usize, isize, isize)>,
    lines_changed: Vec<usize>,
    text_segment_changes: usize,
    segments_created: Vec<TextSegment>,
    cursors_created: Vec<usize>,
    cursor_x_changed: Vec<(usize, usize)>,
    cursor_y_changed: Vec<(usize, usize)>,
    cursor_visibility_changed: Vec<(usize, bool)>,
    cursor_blinking_changed: Vec<(usize, bool)>,
    titles: Vec<String>,
    flashes: usize,
    default_backgrounds: Vec<RgbColor>,
    selections: Vec<SelectionRange>,
}

impl TestListener {
    fn clear(&mut self) {
        *self = TestListener::default();
    }
}

impl ScreenListener for TestListener {
    fn width_changed(&mut self, width: usize) {
        self.width_changed.push(width);
    }
    fn height_changed(&mut self, height: usize) {
        self.height_changed.push(height);
    }
    fn data_width_changed(&mut self, new_width: usize, removed: usize, reclaimed: usize) {
        self.data_width_changed.push((new_width, removed, reclaimed));
    }
    fn data_height_changed(&mut self, new_height: usize, removed: usize, reclaimed: usize) {
        self.data_height_changed
            .push((new_height, removed, reclaimed));
    }
    fn content_height_changed(&mut self, content_height: usize) {
        self.content_height_changed.push(content_height);
    }
    fn content_modified(&mut self, start_line: usize, line_count: isize, diff: isize) {
        self.content_modified.push((start_line, line_count, diff));
    }
    fn line_changed(&mut self, line: usize) {
        self.lines_changed.push(line);
    }
    fn text_segment_changes(&mut self) {
        self.text_segment_changes += 1;
    }
    fn text_segment_created(&mut self, segment: TextSegment) {
        self.segments_created.push(segment);
    }
    fn cursor_created(&mut self, cursor_id: usize) {
        self.cursors_created.push(cursor_id);
    }
    fn cursor_x_changed(&mut self, cursor_id: usize, x: usize) {
        self.cursor_x_changed.push((cursor_id, x));
    }
    fn cursor_y_changed(&mut self, cursor_id: usize, y: usize) {
        self.cursor_y_changed.push((cursor_id, y));
    }
    fn cursor_visibility_changed(&mut self, cursor_id: usize, visible: bool) {
        self.cursor_visibility_changed.push((cursor_id, visible));
    }
    fn cursor_blinking_changed(&mut self, cursor_id: usize, blinking: bool) {
        self.cursor_blinking_changed.push((cursor_id, blinking));
    }
    fn screen_title_changed(&mut self, title: &str) {
        self.titles.push(title.into());
    }
    fn flash(&mut self) {
        self.flashes += 1;
    }
    fn default_background_color_changed(&mut self, color: RgbColor) {
        self.default_backgrounds.push(color);
    }
    fn selection_changed(&mut self, range: SelectionRange) {
        self.selections.push(range);
    }
}

fn listen(screen: &mut Screen) -> Rc<RefCell<TestListener>> {
    let listener = Rc::new(RefCell::new(TestListener::default()));
    screen.add_listener(listener.clone());
    listener
}

/// Position the cursor and write `text` through the normal input path.
fn write_at(screen: &mut Screen, x: isize, y: isize, text: &str) {
    screen.current_cursor_mut().move_to(x, y);
    screen.add_at_cursor(text.as_bytes(), text.is_ascii());
}

fn visible_contents(screen: &Screen) -> Vec<String> {
    screen
        .current_screen_data()
        .visible_lines()
        .iter()
        .map(|line| line.trim_end().to_string())
        .collect()
}

/// Asserts that the visible rows of the screen have the same character
/// contents as the expected lines (trailing blanks ignored).
fn assert_visible_contents(screen: &Screen, expect_lines: &[&str]) {
    let lines = visible_contents(screen);
    assert_eq!(
        lines.len(),
        expect_lines.len(),
        "expectation has wrong number of lines"
    );
    for (idx, (line, expect)) in lines.iter().zip(expect_lines.iter()).enumerate() {
        assert_eq!(line, expect, "line {} text didn't match", idx);
    }
}

/// The structural invariants that must hold after every operation.
fn check_invariants(screen: &Screen) {
    let data = screen.current_screen_data();

    let sum: usize = data.blocks().map(|b| b.line_count()).sum();
    assert_eq!(data.height(), sum, "grid height must equal the block sum");

    let mut ids = HashSet::new();
    for block in data.blocks().chain(data.scrollback().blocks()) {
        assert!(
            ids.insert(block.id()),
            "a block may only be owned by one container"
        );
    }

    let cursor = screen.current_cursor();
    assert!(cursor.new_x() < screen.width(), "cursor x out of bounds");
    assert!(cursor.new_y() < screen.height(), "cursor y out of bounds");

    let scrollback = data.scrollback();
    assert!(
        scrollback.height() <= scrollback.max_lines()
            || (scrollback.block_count() == 1
                && scrollback.blocks().next().unwrap().line_count() > scrollback.max_lines()),
        "scrollback must respect its budget"
    );
}

#[test]
fn construct() {
    init_logs();
    let screen = new_screen();

    // Ensure sanity for the screen. If this fails, the rest of the
    // tests are going to have a bad day.
    k9::assert_equal!(screen.width(), 80);
    k9::assert_equal!(screen.height(), 25);

    // Cursor should start at the origin, visible and steady.
    let cursor = screen.current_cursor();
    assert_eq!(screen.cursor_x(), 0);
    assert_eq!(screen.cursor_y(), 0);
    assert_eq!(cursor.new_x(), 0);
    assert_eq!(cursor.new_y(), 0);
    assert!(cursor.visible());
    assert!(!cursor.blinking());

    check_invariants(&screen);
}

#[test]
fn write_and_read_back_ascii() {
    let mut screen = new_screen();
    write_at(&mut screen, 2, 1, "ABC");

    let lines = screen.current_screen_data().visible_lines();
    assert_eq!(&lines[1][0..6], "  ABC ");
    assert_eq!(screen.current_cursor().new_x(), 5);
    assert_eq!(screen.current_cursor().new_y(), 1);
    check_invariants(&screen);
}
