use super::*;

#[test]
fn width_shrink_reflows_long_line_and_tracks_cursor() {
    init_logs();
    let mut screen = new_screen();
    let long: String = std::iter::repeat('a').take(120).collect();
    write_at(&mut screen, 0, 0, &long);

    {
        let data = screen.current_screen_data();
        let first = data.blocks().next().unwrap();
        assert_eq!(first.line_count(), 2);
        assert_eq!(data.height(), 25);
    }
    assert_eq!(screen.current_cursor().new_x(), 40);
    assert_eq!(screen.current_cursor().new_y(), 1);

    screen.set_width(40);

    {
        let data = screen.current_screen_data();
        let first = data.blocks().next().unwrap();
        assert_eq!(first.line_count(), 3);
        assert_eq!(first.text_line().len(), 120);
    }
    // The cursor stayed on the same logical character: one past the
    // 120th, which is now the start of the fourth physical row.
    assert_eq!(screen.current_cursor().new_x(), 0);
    assert_eq!(screen.current_cursor().new_y(), 3);

    screen.set_width(80);

    {
        let data = screen.current_screen_data();
        let first = data.blocks().next().unwrap();
        assert_eq!(first.line_count(), 2);
        assert_eq!(data.height(), 25);
    }
    let lines = visible_contents(&screen);
    assert_eq!(lines[0].len(), 80);
    assert_eq!(lines[1].len(), 40);
}

#[test]
fn resize_to_same_size_is_a_no_op() {
    let mut screen = new_screen();
    write_at(&mut screen, 0, 0, "stable content");
    screen.current_cursor_mut().move_to(3, 7);

    screen.set_size(40, 20);
    let after_first = visible_contents(&screen);
    let cursor_first = (
        screen.current_cursor().new_x(),
        screen.current_cursor().new_y(),
    );
    let content_height_first = screen.content_height();

    screen.set_size(40, 20);
    assert_eq!(visible_contents(&screen), after_first);
    assert_eq!(
        (
            screen.current_cursor().new_x(),
            screen.current_cursor().new_y()
        ),
        cursor_first
    );
    assert_eq!(screen.content_height(), content_height_first);
    check_invariants(&screen);
}

#[test]
fn width_shrink_pushes_whole_blocks_to_scrollback() {
    let mut screen = new_screen();
    let full: String = std::iter::repeat('x').take(80).collect();
    for y in 0..10 {
        write_at(&mut screen, 0, y, &full);
    }
    screen.current_cursor_mut().move_to(0, 24);

    screen.set_width(40);

    // Ten 80-char blocks became two rows each; the overflow retired
    // complete blocks into scrollback.
    let data = screen.current_screen_data();
    assert_eq!(data.height(), 25);
    assert_eq!(data.scrollback().height(), 10);
    check_invariants(&screen);

    screen.set_width(80);
    let data = screen.current_screen_data();
    assert_eq!(data.height(), 25);
    assert_eq!(data.scrollback().height(), 0);
    let lines = visible_contents(&screen);
    assert_eq!(lines[0], full);
    assert_eq!(lines[9], full);
    check_invariants(&screen);
}

#[test]
fn width_grow_extends_tab_stops() {
    let mut screen = new_screen();
    screen.set_width(100);

    let cursor = screen.current_cursor_mut();
    cursor.move_to(0, 0);
    for _ in 0..11 {
        cursor.move_to_next_tab();
    }
    // Stops continue at the default cadence into the new columns.
    assert_eq!(cursor.new_x(), 88);
}

#[test]
fn cursor_falls_back_to_origin_when_its_block_scrolls_out() {
    let mut screen = new_screen();
    let full: String = std::iter::repeat('y').take(80).collect();
    for y in 0..10 {
        write_at(&mut screen, 0, y, &full);
    }
    // Park the cursor on the first row; that block will retire into
    // scrollback during the reflow.
    screen.current_cursor_mut().move_to(0, 0);

    screen.set_width(40);

    let cursor = screen.current_cursor();
    assert_eq!((cursor.new_x(), cursor.new_y()), (0, 0));
    check_invariants(&screen);
}

#[test]
fn resize_emits_data_signals_with_counts() {
    let mut screen = new_screen();
    let listener = listen(&mut screen);
    let full: String = std::iter::repeat('z').take(80).collect();
    for y in 0..10 {
        write_at(&mut screen, 0, y, &full);
    }
    screen.current_cursor_mut().move_to(0, 24);
    listener.borrow_mut().clear();

    screen.set_width(40);

    let recorded = listener.borrow();
    assert_eq!(recorded.width_changed, vec![40]);
    assert_eq!(recorded.data_width_changed, vec![(40, 10, 0)]);

    drop(recorded);
    listener.borrow_mut().clear();
    screen.set_height(20);
    let recorded = listener.borrow();
    assert_eq!(recorded.height_changed, vec![20]);
    assert_eq!(recorded.data_height_changed.len(), 1);
    let (h, _removed, _reclaimed) = recorded.data_height_changed[0];
    assert_eq!(h, 20);
}
