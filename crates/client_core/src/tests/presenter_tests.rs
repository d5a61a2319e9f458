use super::*;

#[test]
fn navigation_stays_inside_the_deck() {
    let mut cursor = PresentationCursor::new(3);
    assert!(!cursor.previous());
    assert!(cursor.next());
    assert!(cursor.next());
    assert!(cursor.is_last());
    assert!(!cursor.next());
    assert_eq!(cursor.index(), 2);
    assert_eq!(cursor.progress_label(), "3 / 3");
}

#[test]
fn keys_drive_the_cursor_and_grid() {
    let mut cursor = PresentationCursor::new(5);
    assert!(cursor.handle_key(PresenterKey::Last));
    assert_eq!(cursor.index(), 4);
    assert!(cursor.handle_key(PresenterKey::ToggleGrid));
    assert!(cursor.show_grid());

    assert!(cursor.go_to(1));
    assert!(!cursor.show_grid());
    assert!(cursor.handle_key(PresenterKey::First));
    assert_eq!(cursor.index(), 0);
    assert!(!cursor.go_to(9));
}

#[test]
fn resize_clamps_index() {
    let mut cursor = PresentationCursor::new(4);
    cursor.go_to(3);
    cursor.resize(2);
    assert_eq!(cursor.index(), 1);
    cursor.resize(0);
    assert!(cursor.is_empty());
    assert_eq!(cursor.progress_label(), "0 / 0");
}

#[test]
fn parses_terminal_input() {
    assert_eq!(PresenterKey::from_input(""), Some(PresenterKey::Next));
    assert_eq!(PresenterKey::from_input("p\n"), Some(PresenterKey::Previous));
    assert_eq!(PresenterKey::from_input("G"), Some(PresenterKey::ToggleGrid));
    assert_eq!(PresenterKey::from_input("q"), Some(PresenterKey::Quit));
    assert_eq!(PresenterKey::from_input("x"), None);
}

#[test]
fn next_on_the_last_slide_stays_put() {
    let mut cursor = PresentationCursor::new(2);
    assert!(cursor.handle_key(PresenterKey::Next));
    assert!(!cursor.handle_key(PresenterKey::Next));
    assert!(!cursor.handle_key(PresenterKey::Next));
    assert_eq!(cursor.index(), 1);
    assert_eq!(cursor.progress_label(), "2 / 2");
}
