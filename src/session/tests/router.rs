use super::*;
use crate::session::{Key, KeyEvent, KeyHandling, SessionPhase};

#[test]
fn test_ctrl_space_forces_trigger() {
    let mut session = session();
    let mut buf = buffer("x");
    let outcome = session.handle_key(&mut buf, &KeyEvent::char(' ').with_ctrl());
    assert!(outcome.force_trigger);
    assert_eq!(outcome.consume, None);
}

#[test]
fn test_other_ctrl_chord_passes_through() {
    let mut session = session();
    let mut buf = buffer("x");
    render(&mut session, &buf, inline_item("y", 1));

    let outcome = session.handle_key(&mut buf, &KeyEvent::char('c').with_ctrl());
    assert_eq!(outcome.consume, Some(false));
    assert!(!outcome.force_trigger);
    // The chord belongs to the editor; the ghost text is untouched.
    assert_eq!(session.phase(), SessionPhase::Rendering);
}

#[test]
fn test_auto_closing_punctuation_forces_trigger() {
    let mut session = session();
    let mut buf = buffer("x");
    for ch in ['"', '\'', ')', '}', ']'] {
        let outcome = session.handle_key(&mut buf, &KeyEvent::char(ch));
        assert!(outcome.force_trigger, "{ch:?} should force a trigger");
        assert_eq!(outcome.consume, None);
    }
}

#[test]
fn test_composition_clears_and_passes_through() {
    let mut session = session();
    let mut buf = buffer("x");
    render(&mut session, &buf, inline_item("y", 1));

    let outcome = session.handle_key(&mut buf, &KeyEvent::char('a').with_composing());
    assert_eq!(outcome.consume, Some(false));
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_navigation_keys_clear_and_pass_through() {
    for key in [
        Key::Delete,
        Key::ArrowUp,
        Key::ArrowDown,
        Key::ArrowLeft,
        Key::ArrowRight,
        Key::Home,
        Key::End,
        Key::PageUp,
        Key::PageDown,
    ] {
        let mut session = session();
        let mut buf = buffer("x");
        render(&mut session, &buf, inline_item("y", 1));

        let outcome = session.handle_key(&mut buf, &KeyEvent::new(key.clone()));
        assert_eq!(outcome.consume, Some(false), "{key:?}");
        assert_eq!(session.phase(), SessionPhase::Idle, "{key:?}");
    }
}

#[test]
fn test_tab_accepts_and_consumes() {
    let mut session = session();
    let mut buf = buffer("x = ");
    render(&mut session, &buf, inline_item("foo()", 4));

    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Tab));
    assert_eq!(outcome.consume, Some(true));
    assert_eq!(outcome.accepted_completion_id.as_deref(), Some("c-1"));
    assert_eq!(buf.text(), "x = foo()");
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_tab_without_session_falls_through() {
    let mut session = session();
    let mut buf = buffer("x = ");
    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Tab));
    assert_eq!(outcome.consume, None);
    assert!(outcome.accepted_completion_id.is_none());
    assert_eq!(buf.text(), "x = ");
}

#[test]
fn test_escape_dismisses_and_consumes() {
    let mut session = session();
    let mut buf = buffer("x = ");
    render(&mut session, &buf, inline_item("foo()", 4));

    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Escape));
    assert_eq!(outcome.consume, Some(true));
    assert_eq!(session.phase(), SessionPhase::Idle);

    // Without a session, Escape belongs to the editor.
    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Escape));
    assert_eq!(outcome.consume, None);
}

#[test]
fn test_modified_binding_does_not_accept() {
    let mut session = session();
    let mut buf = buffer("x = ");
    render(&mut session, &buf, inline_item("foo()", 4));

    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Tab).with_shift());
    assert_eq!(outcome.consume, None);
    assert_eq!(buf.text(), "x = ");
    assert_eq!(session.phase(), SessionPhase::Rendering);
}

#[test]
fn test_disabled_handling_defers_to_adapter_commands() {
    let mut config = SessionConfig::default();
    config.handling = KeyHandling {
        accept: false,
        dismiss: false,
    };
    let mut session = CompletionSession::new(config);
    let mut buf = buffer("x = ");
    render(&mut session, &buf, inline_item("foo()", 4));

    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Tab));
    assert_eq!(outcome.consume, None);
    assert_eq!(buf.text(), "x = ");

    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Escape));
    assert_eq!(outcome.consume, None);
    assert_eq!(session.phase(), SessionPhase::Rendering);
}

#[test]
fn test_named_keys_do_not_clear() {
    let mut session = session();
    let mut buf = buffer("x");
    render(&mut session, &buf, inline_item("y", 1));

    for key in ["CapsLock", "Shift", "F5"] {
        let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::from_event_key(key)));
        assert_eq!(outcome.consume, None);
        assert_eq!(session.phase(), SessionPhase::Rendering, "{key}");
    }
}

#[test]
fn test_enter_clears() {
    let mut session = session();
    let mut buf = buffer("x");
    render(&mut session, &buf, inline_item("y", 1));

    let outcome = session.handle_key(&mut buf, &KeyEvent::new(Key::Enter));
    assert_eq!(outcome.consume, None);
    assert_eq!(session.phase(), SessionPhase::Idle);
}

#[test]
fn test_key_parsing() {
    assert_eq!(Key::from_event_key("Tab"), Key::Tab);
    assert_eq!(Key::from_event_key("a"), Key::Char('a'));
    assert_eq!(Key::from_event_key("😀"), Key::Char('😀'));
    assert_eq!(
        Key::from_event_key("CapsLock"),
        Key::Other("CapsLock".to_string())
    );
}
