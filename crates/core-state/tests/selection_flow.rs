use std::cell::Cell;

use core_config::Options;
use core_events::{Event, InputProbe, Key, NeverPending};
use core_filter::CandidateSet;
use core_state::{Control, Outcome, Session};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn session_with(options: Options, input: &str, rows: u16) -> Session {
    let set = CandidateSet::parse(
        input.as_bytes(),
        options.descriptions,
        &options.field_separators,
    );
    let mut s = Session::new(options, set, 80, rows);
    s.refresh(&NeverPending);
    s
}

fn session(input: &str, rows: u16) -> Session {
    session_with(Options::default(), input, rows)
}

fn press(s: &mut Session, k: Key) -> Control {
    s.handle(Event::Key(k), &NeverPending)
}

fn type_str(s: &mut Session, text: &str) {
    for ch in text.chars() {
        press(s, Key::Printable(ch));
    }
}

fn visible_texts(s: &Session) -> Vec<String> {
    (0..s.visible_count())
        .filter_map(|r| s.visible(r))
        .map(|c| c.text().to_owned())
        .collect()
}

#[test]
fn single_letter_matches_all_three() {
    let mut s = session("alpha\nbeta\ngamma\n", 10);
    type_str(&mut s, "a");
    assert_eq!(s.visible_count(), 3);
    assert!(s.candidates().items().iter().all(|c| c.score > 0.0));
}

#[test]
fn no_match_disables_enter() {
    let mut s = session("alpha\nbeta\ngamma\n", 10);
    type_str(&mut s, "z");
    assert_eq!(s.visible_count(), 0);
    assert_eq!(press(&mut s, Key::Enter), Control::Continue);
    assert_eq!(press(&mut s, Key::Down), Control::Continue);
    assert_eq!(s.view().selection, 0);
}

#[test]
fn growing_query_skips_previous_misses() {
    let mut s = session("alpha\nbeta\ngamma\nxyz\n", 10);
    type_str(&mut s, "a");
    assert_eq!(s.last_pass().scored, 4);
    type_str(&mut s, "l");
    assert_eq!(s.last_pass().skipped, 1);
    assert_eq!(s.last_pass().scored, 3);
    assert_eq!(visible_texts(&s), vec!["alpha"]);
}

#[test]
fn shorter_window_ranks_first() {
    let mut s = session("a-x-x-b\nab\nzzz\n", 10);
    type_str(&mut s, "ab");
    assert_eq!(visible_texts(&s), vec!["ab", "a-x-x-b"]);
}

#[test]
fn alt_enter_returns_query_even_without_matches() {
    let mut s = session("alpha\n", 10);
    type_str(&mut s, "zz");
    assert_eq!(
        press(&mut s, Key::AltEnter),
        Control::Finish(Outcome::FreeText("zz".into()))
    );
}

#[test]
fn committed_description_is_emitted() {
    let options = Options {
        descriptions: true,
        output_description: true,
        ..Options::default()
    }
    .normalize();
    let mut s = session_with(options, "one first\ntwo second\n", 10);
    type_str(&mut s, "tw");
    let Control::Finish(outcome) = press(&mut s, Key::Enter) else {
        panic!("enter did not finish");
    };
    let mut out = Vec::new();
    s.emit(&outcome, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "two\nsecond\n");
}

#[test]
fn unsorted_keeps_input_order_among_matches() {
    let options = Options {
        sort: false,
        ..Options::default()
    };
    let mut s = session_with(options, "a-x-x-b\nzzz\nab\n", 10);
    type_str(&mut s, "ab");
    assert_eq!(visible_texts(&s), vec!["a-x-x-b", "ab"]);
}

#[test]
fn word_erase_and_kill_refilter() {
    let mut s = session("foo bar\nbaz\n", 10);
    type_str(&mut s, "foo ba");
    assert_eq!(visible_texts(&s), vec!["foo bar"]);
    press(&mut s, Key::WordErase);
    assert_eq!(s.query().as_str(), "foo ");
    press(&mut s, Key::KillBefore);
    assert!(s.query().is_empty());
    assert_eq!(s.visible_count(), 2);
}

#[test]
fn list_end_scrolls_window() {
    let input: String = (0..30).map(|i| format!("item{i}\n")).collect();
    let mut s = session(&input, 6);
    press(&mut s, Key::ListEnd);
    assert_eq!(s.view().selection, 29);
    assert_eq!(s.view().y_scroll, 25);
    press(&mut s, Key::ListHome);
    assert_eq!((s.view().selection, s.view().y_scroll), (0, 0));
}

#[test]
fn resize_clamps_selection_window() {
    let input: String = (0..30).map(|i| format!("item{i}\n")).collect();
    let mut s = session(&input, 20);
    for _ in 0..15 {
        press(&mut s, Key::Down);
    }
    assert_eq!(s.view().y_scroll, 0);
    assert_eq!(s.handle(Event::Resize, &NeverPending), Control::Resize);
    s.resize(40, 5);
    assert_eq!(s.view().selection, 15);
    assert_eq!(s.view().y_scroll, 12);
}

struct PendingOnce(Cell<bool>);

impl InputProbe for PendingOnce {
    fn input_pending(&self) -> bool {
        self.0.replace(false)
    }
}

#[test]
fn aborted_pass_is_finished_on_next_event() {
    let input: String = (0..200).map(|i| format!("line{i}\n")).collect();
    let mut s = session(&input, 10);
    let probe = PendingOnce(Cell::new(true));
    s.handle(Event::Key(Key::Printable('9')), &probe);
    assert!(s.last_pass().aborted);
    assert_eq!(s.candidates().order().len(), 200);

    s.handle(Event::Key(Key::Down), &NeverPending);
    assert!(!s.last_pass().aborted);
    assert_eq!(s.last_pass().scored, 200);
    let expected = (0..200).filter(|i| format!("line{i}").contains('9')).count();
    assert_eq!(s.visible_count(), expected);
}

fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        (0u8..4).prop_map(|b| Key::Printable(char::from(b'a' + b))),
        Just(Key::Backspace),
        Just(Key::Delete),
        Just(Key::WordErase),
        Just(Key::Left),
        Just(Key::Right),
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::PageUp),
        Just(Key::PageDown),
        Just(Key::ListHome),
        Just(Key::ListEnd),
    ]
}

proptest! {
    #[test]
    fn selection_stays_in_window(
        lines in prop::collection::vec("[a-d]{0,6}", 0..40),
        rows in 1u16..12,
        keys in prop::collection::vec(key_strategy(), 0..60),
        resize_to in prop::option::of(1u16..12),
    ) {
        let mut input = lines.join("\n");
        input.push('\n');
        let mut s = session(&input, rows);
        for (i, k) in keys.into_iter().enumerate() {
            press(&mut s, k);
            if i == 30 && let Some(r) = resize_to {
                s.resize(80, r);
            }
            let v = *s.view();
            let count = s.visible_count();
            let window = v.choices_lines().max(1);
            if count > 0 {
                prop_assert!(v.selection < count);
            } else {
                prop_assert_eq!(v.selection, 0);
            }
            prop_assert!(v.y_scroll <= v.selection);
            prop_assert!(v.selection - v.y_scroll < window);
            prop_assert!(s.query().cursor() <= s.query().len());
            prop_assert!(s.cursor_column() < usize::from(v.cols));
        }
    }
}
