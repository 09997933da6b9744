#![forbid(unsafe_code)]

//! End-to-end pill behavior through the headless screen.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pillbox_core::event::{Event, KeyCode};
use pillbox_core::glyph_policy::GlyphPolicy;
use pillbox_harness::{QueryError, Screen};
use pillbox_render::semantics::Role;
use pillbox_style::PillTheme;
use pillbox_widgets::{PillList, PillOptions, PillRecord};
use proptest::prelude::*;

fn basic_pill() -> PillRecord {
    PillRecord::new("Test").bgcolor("lime")
}

fn close_select_pill() -> PillRecord {
    PillRecord::new("With icon and close button").bgcolor("#ff0000")
}

fn rounded_icon_pill() -> PillRecord {
    PillRecord::new("Rounded Icon Pill").icon("🎂")
}

fn counter() -> (Rc<Cell<usize>>, impl Fn(&PillRecord) + 'static) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move |_: &PillRecord| handle.set(handle.get() + 1))
}

fn list<I>(records: I, options: PillOptions) -> PillList
where
    I: IntoIterator<Item = PillRecord>,
{
    PillList::from_records(records)
        .with_options(options)
        .theme(PillTheme::dark())
        .glyphs(GlyphPolicy::default())
}

#[test]
fn renders_one_pill_with_item_class() {
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list(
        [basic_pill()],
        PillOptions::new().item_class_name("custom-class"),
    ));

    let button = screen.get_by_role(Role::Button).unwrap();
    assert_eq!(screen.text_content(button), "Test");
    assert!(screen.has_class(button, "custom-class"));
    assert!(screen.has_class(button, "pill"));
    assert!(screen.text().starts_with(" Test "));
}

#[test]
fn renders_several_pills() {
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list(
        [basic_pill(), close_select_pill()],
        PillOptions::new().on_close(|_| {}).on_select(|_| {}),
    ));

    assert!(screen.get_by_text("Test").is_ok());
    assert!(screen.get_by_text("With icon and close button").is_ok());
    assert_eq!(screen.get_all_by_role(Role::List).len(), 1);
}

#[test]
fn renders_rounded_pill_with_icon() {
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list([rounded_icon_pill()], PillOptions::new().rounded(true)));

    let button = screen.get_by_role(Role::Button).unwrap();
    assert!(screen.contains_html(button, r#"<span class="icon-container">🎂</span>"#));
    assert!(screen.has_class(button, "rounded"));
    assert_eq!(screen.accessible_name(button), "🎂Rounded Icon Pill");
}

#[test]
fn clicks_reach_the_right_callback() {
    let (selected, on_select) = counter();
    let (closed, on_close) = counter();
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list(
        [close_select_pill()],
        PillOptions::new().on_select(on_select).on_close(on_close),
    ));

    let label = screen.get_by_text("With icon and close button").unwrap();
    screen.click(label).unwrap();
    assert_eq!(selected.get(), 1);
    assert_eq!(closed.get(), 0);

    let close = screen
        .get_by_label_text("Close With icon and close button")
        .unwrap();
    screen.click(close).unwrap();
    assert_eq!(closed.get(), 1);
    assert_eq!(selected.get(), 1, "close click must not select");
}

#[test]
fn clicking_the_outer_button_selects_even_when_short() {
    let (selected, on_select) = counter();
    let (closed, on_close) = counter();
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list(
        [PillRecord::new("a")],
        PillOptions::new().on_select(on_select).on_close(on_close),
    ));

    // " a × ": the center cell belongs to the close button.
    let outer = screen.get_all_by_role(Role::Button)[0];
    screen.click(outer).unwrap();
    assert_eq!((selected.get(), closed.get()), (1, 0));
    assert_eq!(screen.active_element(), Some(outer));

    let close = screen.get_by_label_text("Close a").unwrap();
    screen.click(close).unwrap();
    assert_eq!((selected.get(), closed.get()), (1, 1));
}

#[test]
fn keyboard_closes_and_escape_releases_focus() {
    let (closed, on_close) = counter();
    let (selected, on_select) = counter();
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list(
        [close_select_pill()],
        PillOptions::new().on_close(on_close).on_select(on_select),
    ));

    let close = screen
        .get_by_label_text("Close With icon and close button")
        .unwrap();
    screen.click(close).unwrap();
    assert_eq!(closed.get(), 1);
    assert_eq!(screen.active_element(), Some(close));

    screen.blur();
    assert_eq!(screen.active_element(), None);
    screen.focus(close).unwrap();
    assert_eq!(screen.active_element(), Some(close));

    screen.key_down(KeyCode::Enter);
    screen.key_down(KeyCode::Char(' '));
    assert_eq!(closed.get(), 3);
    assert_eq!(selected.get(), 0);

    screen.key_down(KeyCode::Escape);
    assert_eq!(screen.active_element(), None);

    // With focus back at the root, keys reach nobody.
    screen.key_down(KeyCode::Enter);
    assert_eq!(closed.get(), 3);
}

#[test]
fn label_only_pill_is_inert() {
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list([basic_pill()], PillOptions::new()));

    let button = screen.get_by_role(Role::Button).unwrap();
    assert!(screen.markup(button).contains(r#"aria-disabled="true""#));
    assert!(screen.focus(button).is_err());

    let label = screen.get_by_text("Test").unwrap();
    screen.click(label).unwrap();
    assert_eq!(screen.active_element(), None);
}

#[test]
fn tab_walks_pills_in_order() {
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list(
        [PillRecord::new("a"), PillRecord::new("b")],
        PillOptions::new().on_close(|_| {}).on_select(|_| {}),
    ));

    let buttons = screen.get_all_by_role(Role::Button);
    // Outer a, close a, outer b, close b.
    assert_eq!(buttons.len(), 4);

    screen.focus(buttons[0]).unwrap();
    screen.key_down(KeyCode::Tab);
    assert_eq!(screen.active_element(), Some(screen.get_all_by_role(Role::Button)[1]));
    screen.key_down(KeyCode::Tab);
    assert_eq!(screen.active_element(), Some(screen.get_all_by_role(Role::Button)[2]));
    screen.key_down(KeyCode::BackTab);
    assert_eq!(screen.active_element(), Some(screen.get_all_by_role(Role::Button)[1]));
}

#[test]
fn pills_in_separate_lists_share_one_focus() {
    let mut screen = Screen::with_size(80, 4);
    screen.mount(list([PillRecord::new("left")], PillOptions::new().on_select(|_| {})));
    screen.mount(list([PillRecord::new("right")], PillOptions::new().on_select(|_| {})));

    let left = screen.get_by_text("left").unwrap();
    let right = screen.get_by_text("right").unwrap();
    screen.click(left).unwrap();
    screen.click(right).unwrap();

    let focused = screen.active_element().unwrap();
    assert_eq!(screen.text_content(focused), "right");
    assert_eq!(
        screen.tree().iter().filter(|(_, node)| node.focused).count(),
        1
    );
}

type Records = Rc<RefCell<Vec<PillRecord>>>;

/// The app's list: closing a pill removes its record.
fn removable(records: &Records) -> PillList {
    let sink = Rc::clone(records);
    list(
        records.borrow().clone(),
        PillOptions::new()
            .on_select(|_| {})
            .on_close(move |closed| sink.borrow_mut().retain(|r| r.label != closed.label)),
    )
}

#[test]
fn close_handler_can_remove_its_own_pill() {
    let records: Records = Rc::new(RefCell::new(
        ["a", "b", "c"].into_iter().map(PillRecord::new).collect(),
    ));
    let mut screen = Screen::with_size(20, 2);
    let id = screen.mount(removable(&records));

    let close_a = screen.get_by_label_text("Close a").unwrap();
    screen.click(close_a).unwrap();
    assert_eq!(records.borrow().len(), 2);

    screen.replace(id, removable(&records)).unwrap();
    assert_eq!(screen.query_by_text("a"), Ok(None));
    assert!(matches!(
        screen.get_by_label_text("Close a"),
        Err(QueryError::NotFound { .. })
    ));
    assert_eq!(screen.get_all_by_role(Role::Button).len(), 4);
    assert_eq!(screen.active_element(), None);
    screen.assert_text(" b ×   c ×");

    // A sibling keeps its focus when an earlier pill goes away.
    let close_c = screen.get_by_label_text("Close c").unwrap();
    screen.focus(close_c).unwrap();
    records.borrow_mut().retain(|r| r.label != "b");
    screen.replace(id, removable(&records)).unwrap();
    let close_c = screen.get_by_label_text("Close c").unwrap();
    assert_eq!(screen.active_element(), Some(close_c));

    screen.key_down(KeyCode::Enter);
    screen.replace(id, removable(&records)).unwrap();
    assert!(records.borrow().is_empty());
    assert!(screen.get_all_by_role(Role::Button).is_empty());
    assert_eq!(screen.active_element(), None);
    screen.assert_text("");
}

proptest! {
    #[test]
    fn one_click_fires_at_most_one_callback(x in 0u16..60, y in 0u16..3) {
        let (selected, on_select) = counter();
        let (closed, on_close) = counter();
        let mut screen = Screen::with_size(60, 3);
        screen.mount(list(
            [basic_pill(), close_select_pill(), rounded_icon_pill()],
            PillOptions::new().rounded(true).on_select(on_select).on_close(on_close),
        ));

        screen.dispatch(&Event::left_click(x, y));
        prop_assert!(selected.get() + closed.get() <= 1);
    }
}
