use super::*;
use crate::charset::Charset;
use crate::color::AnsiColor;
use crate::style::StyleFlags;

#[test]
fn stay_within_bounds() {
    let mut screen = new_screen();
    let width = screen.width();
    let height = screen.height();
    let cursor = screen.current_cursor_mut();

    // up off-by-one
    cursor.move_up(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));

    // up off-by-many
    cursor.move_up(10);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));

    // left off-by-one
    cursor.move_left(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));

    // left off-by-many
    cursor.move_left(10);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));

    // right off-by-one
    cursor.move_right(width - 1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (width - 1, 0));
    cursor.move_right(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (width - 1, 0));
    cursor.move_origin();

    // right off-by-many
    cursor.move_right(width);
    assert_eq!((cursor.new_x(), cursor.new_y()), (width - 1, 0));
    cursor.move_origin();

    // down off-by-one
    cursor.move_down(height - 1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, height - 1));
    cursor.move_down(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, height - 1));
    cursor.move_origin();

    // down off-by-many
    cursor.move_down(height);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, height - 1));
}

#[test]
fn move_down_and_up() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.move_down(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 1));
    cursor.move_down(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 2));

    // back up
    cursor.move_up(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 1));
    cursor.move_up(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));
}

#[test]
fn move_right_and_left() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.move_right(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (1, 0));
    cursor.move_right(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (2, 0));

    // back left
    cursor.move_left(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (1, 0));
    cursor.move_left(1);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));
}

#[test]
fn absolute_move_clamps_both_axes() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.move_to(500, 500);
    assert_eq!((cursor.new_x(), cursor.new_y()), (79, 24));
    cursor.move_to(-3, -3);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));
}

#[test]
fn move_to_character_keeps_one_based_clamping() {
    let mut screen = new_screen();
    let width = screen.width();
    let cursor = screen.current_cursor_mut();

    // Negative input clamps to column 1, not 0.
    cursor.move_to_character(-4);
    assert_eq!(cursor.new_x(), 1);

    // Input past the right edge clamps to the width itself; the write
    // path re-clamps before using it.
    cursor.move_to_character(width as isize + 40);
    assert_eq!(cursor.new_x(), width);

    cursor.move_to_character(10);
    assert_eq!(cursor.new_x(), 10);
}

#[test]
fn default_tab_stops_every_eight_columns() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 8);
    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 16);

    // Past the last stop the cursor lands on the final column.
    cursor.move_to_character(72);
    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 79);
}

#[test]
fn custom_tab_stops() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.clear_tab_stops();
    cursor.move_to_character(5);
    cursor.set_tab_stop();
    cursor.move_to_character(11);
    cursor.set_tab_stop();

    cursor.move_to(0, 0);
    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 5);
    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 11);

    cursor.move_to_character(11);
    cursor.remove_tab_stop();
    cursor.move_to(0, 0);
    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 5);
    cursor.move_to_next_tab();
    assert_eq!(cursor.new_x(), 79);
}

#[test]
fn origin_mode_confines_cursor_to_margins() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.set_scroll_area(5, 20);
    cursor.set_origin_at_margin(true);
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 5));

    // Absolute moves are relative to the top margin now.
    cursor.move_to(0, 0);
    assert_eq!(cursor.new_y(), 5);

    // And movement can't escape the margins.
    cursor.move_up(3);
    assert_eq!(cursor.new_y(), 5);
    cursor.move_to(0, 100);
    assert_eq!(cursor.new_y(), 20);
    cursor.move_down(10);
    assert_eq!(cursor.new_y(), 20);
}

#[test]
fn scroll_area_bottom_clamps_to_screen() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();
    cursor.set_scroll_area(2, 400);
    cursor.set_origin_at_margin(true);
    cursor.move_to(0, 500);
    assert_eq!(cursor.new_y(), 24);
}

#[test]
fn text_style_add_and_remove() {
    let mut screen = new_screen();
    let cursor = screen.current_cursor_mut();

    cursor.set_text_style(StyleFlags::BOLD, true);
    cursor.set_text_style(StyleFlags::UNDERLINE, true);
    assert!(cursor.current_text_style().flags.contains(StyleFlags::BOLD));
    assert!(cursor
        .current_text_style()
        .flags
        .contains(StyleFlags::UNDERLINE));

    // Removing one attribute leaves the others alone.
    cursor.set_text_style(StyleFlags::BOLD, false);
    assert!(!cursor.current_text_style().flags.contains(StyleFlags::BOLD));
    assert!(cursor
        .current_text_style()
        .flags
        .contains(StyleFlags::UNDERLINE));
}

#[test]
fn sgr_color_round_trip() {
    // The engine-side half of `ESC [ 31 ; 42 m` followed by
    // `ESC [ 39 ; 49 m`: the parser resolves the indices through the
    // palette and restores the defaults afterwards.
    let mut screen = new_screen();
    let red = screen.color_palette().color(AnsiColor::Red, false);
    let green = screen.color_palette().color(AnsiColor::Green, false);
    let default_fg = screen.default_foreground_color();
    let default_bg = screen.default_background_color();

    {
        let palette = screen.color_palette().clone();
        let cursor = screen.current_cursor_mut();
        cursor.set_text_foreground_color_index(&palette, AnsiColor::Red, false);
        cursor.set_text_background_color_index(&palette, AnsiColor::Green, false);
        assert_eq!(cursor.current_text_style().foreground, red);
        assert_eq!(cursor.current_text_style().background, green);

        cursor.reset_colors(&palette);
        assert_eq!(cursor.current_text_style().foreground, default_fg);
        assert_eq!(cursor.current_text_style().background, default_bg);
    }
}

#[test]
fn bold_resolves_bright_palette_variant() {
    let screen = new_screen();
    let palette = screen.color_palette();
    assert_ne!(
        palette.color(AnsiColor::Red, false),
        palette.color(AnsiColor::Red, true)
    );
}

#[test]
fn dec_graphics_charset_at_cursor() {
    let mut screen = new_screen();
    screen.current_cursor_mut().set_gl_charset(Charset::DecLineDrawing);
    screen.add_at_cursor(b"lqk", true);

    let lines = screen.current_screen_data().visible_lines();
    assert!(lines[0].starts_with("┌─┐"));

    screen.current_cursor_mut().set_gl_charset(Charset::Utf8);
    write_at(&mut screen, 0, 1, "plain");
    let lines = screen.current_screen_data().visible_lines();
    assert!(lines[1].starts_with("plain"));
}

#[test]
fn no_wrap_overwrites_rightmost_cell() {
    let mut screen = new_screen();
    screen.current_cursor_mut().set_wrap_around(false);
    screen.current_cursor_mut().move_to(78, 0);
    screen.add_at_cursor(b"abcdef", true);

    let lines = screen.current_screen_data().visible_lines();
    // Two cells were available; the tail character lands in the last.
    assert_eq!(&lines[0][78..80], "af");
    let cursor = screen.current_cursor();
    assert!(cursor.new_x() < screen.width());
    check_invariants(&screen);
}

#[test]
fn wrap_advances_to_next_row() {
    let mut screen = new_screen();
    screen.current_cursor_mut().move_to(78, 0);
    screen.add_at_cursor(b"abcd", true);

    let lines = screen.current_screen_data().visible_lines();
    assert_eq!(&lines[0][78..80], "ab");
    assert_eq!(&lines[1][0..2], "cd");
    assert_eq!(screen.current_cursor().new_y(), 1);
    assert_eq!(screen.current_cursor().new_x(), 2);
    check_invariants(&screen);
}

#[test]
fn insert_mode_shifts_line_content() {
    let mut screen = new_screen();
    write_at(&mut screen, 0, 0, "world");
    screen.current_cursor_mut().move_to(0, 0);
    screen
        .current_cursor_mut()
        .set_insert_mode(crate::cursor::InsertMode::Insert);
    screen.add_at_cursor(b"hello ", true);

    let lines = screen.current_screen_data().visible_lines();
    assert!(lines[0].starts_with("hello world"));
    check_invariants(&screen);
}
