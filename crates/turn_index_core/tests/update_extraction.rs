use std::sync::Once;

use pretty_assertions::assert_eq;
use turn_index_core::{
    update, AppState, Effect, Msg, TurnRole, TurnRowView, TurnSummary, EMPTY_STATE_TEXT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn turn(index: usize, role: TurnRole, preview: &str) -> TurnSummary {
    TurnSummary {
        index,
        role,
        preview: preview.to_string(),
    }
}

fn conversation() -> Vec<TurnSummary> {
    vec![
        turn(0, TurnRole::User, "What is 2+2?"),
        turn(1, TurnRole::Assistant, "4"),
        turn(2, TurnRole::User, "Thanks!"),
    ]
}

#[test]
fn fresh_state_shows_empty_message() {
    init_logging();
    let view = AppState::new("ChatGPT").view();

    assert!(view.sidebar_visible);
    assert!(view.rows.is_empty());
    assert_eq!(view.empty_state, Some(EMPTY_STATE_TEXT));
    assert!(!view.dirty);
}

#[test]
fn extracted_turns_become_labelled_rows() {
    init_logging();
    let (mut state, effects) = update(AppState::new("Claude"), Msg::TurnsExtracted(conversation()));
    let view = state.view();

    assert!(effects.is_empty());
    assert_eq!(view.empty_state, None);
    assert_eq!(
        view.rows,
        vec![
            TurnRowView {
                index: 0,
                role_label: "You".to_string(),
                preview: "What is 2+2?".to_string(),
                selected: false,
            },
            TurnRowView {
                index: 1,
                role_label: "Claude".to_string(),
                preview: "4".to_string(),
                selected: false,
            },
            TurnRowView {
                index: 2,
                role_label: "You".to_string(),
                preview: "Thanks!".to_string(),
                selected: false,
            },
        ]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn refresh_and_settled_page_request_extraction() {
    init_logging();
    for msg in [Msg::RefreshRequested, Msg::PageSettled] {
        let (_, effects) = update(AppState::new("ChatGPT"), msg);
        assert_eq!(effects, vec![Effect::RunExtraction]);
    }
}

#[test]
fn selection_survives_only_while_in_range() {
    init_logging();
    let (state, _) = update(AppState::new("ChatGPT"), Msg::TurnsExtracted(conversation()));
    let (state, _) = update(state, Msg::TurnClicked { index: 2 });

    let (state, _) = update(state, Msg::TurnsExtracted(conversation()));
    assert_eq!(state.selected(), Some(2));

    let (state, _) = update(state, Msg::TurnsExtracted(conversation()[..2].to_vec()));
    assert_eq!(state.selected(), None);
}

#[test]
fn toggling_the_sidebar_marks_dirty() {
    init_logging();
    let (mut state, effects) = update(AppState::new("ChatGPT"), Msg::ToggleSidebar);

    assert!(effects.is_empty());
    assert!(!state.view().sidebar_visible);
    assert!(state.consume_dirty());

    let (state, _) = update(state, Msg::ToggleSidebar);
    assert!(state.sidebar_visible());
}
