use super::*;
use crate::color::RgbColor;
use std::time::Duration;

#[test]
fn alternate_buffer_isolation() {
    let mut screen = new_screen();
    write_at(&mut screen, 0, 0, "hello");

    screen.use_alternate_screen_buffer();
    assert!(screen.using_alternate_screen_buffer());
    assert_eq!(visible_contents(&screen)[0], "");

    write_at(&mut screen, 0, 0, "other");
    screen.use_normal_screen_buffer();
    assert!(!screen.using_alternate_screen_buffer());
    assert_eq!(visible_contents(&screen)[0], "hello");
    check_invariants(&screen);
}

#[test]
fn switching_to_alternate_clears_it() {
    let mut screen = new_screen();
    screen.use_alternate_screen_buffer();
    write_at(&mut screen, 0, 0, "leftover");
    screen.use_normal_screen_buffer();

    screen.use_alternate_screen_buffer();
    assert_eq!(visible_contents(&screen)[0], "");
}

#[test]
fn save_and_restore_cursor() {
    let mut screen = new_screen();
    screen.current_cursor_mut().move_to(3, 4);
    screen.save_cursor();

    // The saved clone starts where its predecessor was, and the
    // predecessor is hidden until restored.
    assert_eq!(screen.current_cursor().new_x(), 3);
    assert_eq!(screen.current_cursor().new_y(), 4);

    screen.current_cursor_mut().move_to(10, 12);
    screen.restore_cursor();
    assert_eq!(screen.current_cursor().new_x(), 3);
    assert_eq!(screen.current_cursor().new_y(), 4);
}

#[test]
fn restore_with_single_cursor_is_ignored() {
    let mut screen = new_screen();
    screen.current_cursor_mut().move_to(5, 5);
    screen.restore_cursor();
    assert_eq!(screen.current_cursor().new_x(), 5);
}

#[test]
fn saved_cursor_is_announced_and_reaped_at_dispatch() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    screen.save_cursor();
    screen.dispatch_changes();
    assert_eq!(listener.borrow().cursors_created.len(), 1);

    listener.borrow_mut().clear();
    // Save and restore between dispatches: the popped cursor is reaped
    // before it is ever announced.
    screen.save_cursor();
    screen.restore_cursor();
    screen.dispatch_changes();
    assert_eq!(listener.borrow().cursors_created.len(), 0);
}

#[test]
fn dispatch_coalesces_cursor_movement() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    for _ in 0..5 {
        screen.current_cursor_mut().move_right(1);
    }
    screen.schedule_event_dispatch();
    screen.dispatch_changes();

    // Five moves collapse into a single x notification carrying the
    // final position, and nothing for y.
    let recorded = listener.borrow();
    assert_eq!(recorded.cursor_x_changed, vec![(0, 5)]);
    assert_eq!(recorded.cursor_y_changed, vec![]);
    drop(recorded);

    // A quiet dispatch emits no further cursor events.
    listener.borrow_mut().clear();
    screen.dispatch_changes();
    assert_eq!(listener.borrow().cursor_x_changed, vec![]);
}

#[test]
fn cursor_visibility_and_blinking_signals() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    screen.current_cursor_mut().set_visible(false);
    screen.current_cursor_mut().set_blinking(true);
    screen.dispatch_changes();

    let recorded = listener.borrow();
    assert_eq!(recorded.cursor_visibility_changed, vec![(0, false)]);
    assert_eq!(recorded.cursor_blinking_changed, vec![(0, true)]);
    assert!(!screen.current_cursor().visible());
    assert!(screen.current_cursor().blinking());
}

#[test]
fn flash_is_emitted_once_per_request() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    screen.schedule_flash();
    screen.dispatch_changes();
    assert_eq!(listener.borrow().flashes, 1);

    screen.dispatch_changes();
    assert_eq!(listener.borrow().flashes, 1);
}

#[test]
fn title_change_notifies_immediately() {
    let mut screen = new_screen();
    let listener = listen(&mut screen);

    screen.set_title("vim");
    assert_eq!(screen.title(), "vim");
    assert_eq!(listener.borrow().titles, vec!["vim".to_string()]);
}

#[test]
fn device_attribute_responses() {
    let mut screen = new_screen();
    let mut host = TestHost::default();

    screen.send_primary_device_attributes(&mut host).unwrap();
    assert_eq!(host.output, b"\x1b[?6c");

    host.output.clear();
    screen.send_secondary_device_attributes(&mut host).unwrap();
    assert_eq!(host.output, b"\x1b[>1;95;0c");
}

#[test]
fn default_background_change_broadcasts() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    let teal = RgbColor::new(0x00, 0x60, 0x60);
    screen.set_default_background_color(teal);

    assert_eq!(listener.borrow().default_backgrounds, vec![teal]);
    // Every cursor re-resolved its pen against the palette.
    assert_eq!(screen.current_cursor().current_text_style().background, teal);

    // Setting the same color again is not a change.
    listener.borrow_mut().clear();
    screen.set_default_background_color(teal);
    assert_eq!(listener.borrow().default_backgrounds, vec![]);
}

#[test]
fn text_segments_are_pooled() {
    let mut screen = new_screen();
    let segment = screen.create_text_segment();
    screen.release_text_segment(segment);
    let again = screen.create_text_segment();
    assert_eq!(segment, again);
}

#[test]
fn dispatch_rebuilds_segments_for_dirty_lines() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    write_at(&mut screen, 0, 3, "text");
    screen.dispatch_changes();

    let recorded = listener.borrow();
    assert!(recorded.lines_changed.contains(&3));
    assert!(recorded.text_segment_changes >= 1);
    // The dirty line materialized a presentation segment.
    assert!(!recorded.segments_created.is_empty());
}

#[test]
fn dispatch_debounce_deadline() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    assert!(screen.next_dispatch_deadline().is_none());

    screen.schedule_event_dispatch();
    let deadline = screen.next_dispatch_deadline().expect("armed");

    // Not due at the deadline itself, due just past it.
    assert!(!screen.needs_dispatch(deadline));
    assert!(screen.needs_dispatch(deadline + Duration::from_millis(1)));

    // Firing disarms the debounce.
    assert!(screen.maybe_dispatch_changes(deadline + Duration::from_millis(1)));
    assert!(screen.next_dispatch_deadline().is_none());
    assert!(!screen.maybe_dispatch_changes(deadline + Duration::from_millis(10)));
}

#[test]
fn content_modified_reports_combined_coordinates() {
    let mut screen = new_screen();
    screen.dispatch_changes();
    let listener = listen(&mut screen);

    write_at(&mut screen, 0, 2, "hi");

    let recorded = listener.borrow();
    assert_eq!(recorded.content_modified, vec![(2, 0, 0)]);
}

#[test]
fn application_cursor_keys_and_fast_scroll_flags() {
    let mut screen = new_screen();
    assert!(!screen.application_cursor_keys());
    screen.set_application_cursor_keys(true);
    assert!(screen.application_cursor_keys());

    assert!(screen.fast_scroll());
    screen.set_fast_scroll(false);
    assert!(!screen.fast_scroll());
}
