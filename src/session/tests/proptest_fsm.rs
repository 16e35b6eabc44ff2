//! Property-based test of the session state machine.
//!
//! Random interleavings of keystrokes, triggers, and response deliveries
//! (current, stale, empty, failed) must preserve the structural invariants:
//! at most one rendered suggestion, markers present exactly while
//! rendering, and a monotonically increasing request generation.

use proptest::prelude::*;

use super::*;
use crate::session::{Key, KeyEvent, SessionPhase};

#[derive(Debug, Clone)]
enum Action {
    TypeChar(char),
    Backspace,
    Tab,
    Escape,
    Enter,
    ArrowLeft,
    Trigger,
    /// Deliver a response for the latest generation.
    Deliver,
    /// Deliver a response for a superseded generation.
    DeliverStale,
    DeliverEmpty,
    DeliverFailed,
    Accept,
    Clear,
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        8 => prop::sample::select(vec!['a', 'b', 'g', 'h', 'o', 's', 't', ' ', ')']).prop_map(Action::TypeChar),
        2 => Just(Action::Backspace),
        2 => Just(Action::Tab),
        1 => Just(Action::Escape),
        1 => Just(Action::Enter),
        1 => Just(Action::ArrowLeft),
        4 => Just(Action::Trigger),
        4 => Just(Action::Deliver),
        2 => Just(Action::DeliverStale),
        1 => Just(Action::DeliverEmpty),
        1 => Just(Action::DeliverFailed),
        2 => Just(Action::Accept),
        2 => Just(Action::Clear),
    ]
}

fn deliver(
    session: &mut CompletionSession,
    buf: &CellBuffer,
    generation: u64,
    items: Option<Vec<crate::protocol::CompletionItem>>,
) -> bool {
    session.receive_completions(generation, buf, items, 0, Vec::new)
}

fn ghost_item(buf: &CellBuffer) -> crate::protocol::CompletionItem {
    let at = unicode::code_units_to_bytes(&buf.text(), buf.cursor_code_units());
    inline_item("ghost", at)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_session_invariants_hold(actions in prop::collection::vec(arb_action(), 1..60)) {
        let mut session = session();
        let mut buf = buffer("");
        let mut last_generation = 0u64;

        for action in actions {
            match action {
                Action::TypeChar(ch) => {
                    session.handle_key(&mut buf, &KeyEvent::char(ch));
                    type_char(&mut buf, ch);
                }
                Action::Backspace => {
                    session.handle_key(&mut buf, &KeyEvent::new(Key::Backspace));
                    apply_backspace(&mut buf);
                }
                Action::Tab => {
                    session.handle_key(&mut buf, &KeyEvent::new(Key::Tab));
                }
                Action::Escape => {
                    session.handle_key(&mut buf, &KeyEvent::new(Key::Escape));
                }
                Action::Enter => {
                    session.handle_key(&mut buf, &KeyEvent::new(Key::Enter));
                    type_char(&mut buf, '\n');
                }
                Action::ArrowLeft => {
                    session.handle_key(&mut buf, &KeyEvent::new(Key::ArrowLeft));
                    let cursor = buf.cursor_code_units();
                    buf.set_cursor_code_units(cursor.saturating_sub(1));
                }
                Action::Trigger => {
                    session.begin_request(buf.cursor_code_units());
                }
                Action::Deliver => {
                    let generation = session.generation();
                    if generation > 0 {
                        deliver(&mut session, &buf, generation, Some(vec![ghost_item(&buf)]));
                    }
                }
                Action::DeliverStale => {
                    let generation = session.generation();
                    if generation > 1 {
                        let phase = session.phase();
                        prop_assert!(!deliver(
                            &mut session,
                            &buf,
                            generation - 1,
                            Some(vec![ghost_item(&buf)]),
                        ));
                        // A superseded response never changes the phase.
                        prop_assert_eq!(session.phase(), phase);
                    }
                }
                Action::DeliverEmpty => {
                    let generation = session.generation();
                    if generation > 0 {
                        prop_assert!(!deliver(&mut session, &buf, generation, Some(Vec::new())));
                    }
                }
                Action::DeliverFailed => {
                    let generation = session.generation();
                    if generation > 0 {
                        prop_assert!(!deliver(&mut session, &buf, generation, None));
                    }
                }
                Action::Accept => {
                    let had_session = session.phase() == SessionPhase::Rendering;
                    let result = session.accept_completion(&mut buf);
                    prop_assert_eq!(result.accepted, had_session);
                    if had_session {
                        prop_assert_eq!(session.phase(), SessionPhase::Idle);
                    }
                }
                Action::Clear => {
                    let had_session = session.phase() == SessionPhase::Rendering;
                    prop_assert_eq!(session.clear_completion("proptest"), had_session);
                }
            }

            // Generation never decreases.
            prop_assert!(session.generation() >= last_generation);
            last_generation = session.generation();

            // Markers exist exactly while a suggestion is rendered, and a
            // rendered suggestion always has an anchor marker.
            let rendering = session.phase() == SessionPhase::Rendering;
            prop_assert_eq!(!session.markers().is_empty(), rendering);
        }
    }
}
