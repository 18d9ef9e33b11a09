use std::time::Duration;

use pretty_assertions::assert_eq;
use turn_index_core::{update, AppState, Effect, Msg, TurnRole, TurnSummary, DEFAULT_HIGHLIGHT};

fn loaded(count: usize) -> AppState {
    let turns = (0..count)
        .map(|index| TurnSummary {
            index,
            role: if index % 2 == 0 {
                TurnRole::User
            } else {
                TurnRole::Assistant
            },
            preview: format!("turn {index}"),
        })
        .collect();
    update(AppState::new("Gemini"), Msg::TurnsExtracted(turns)).0
}

/// Generation carried by the revert timer a navigation scheduled.
fn armed_generation(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::ScheduleHighlightRevert { generation, .. } => Some(*generation),
            _ => None,
        })
        .expect("navigation schedules a revert")
}

#[test]
fn clicking_a_turn_scrolls_and_schedules_revert() {
    let (state, effects) = update(loaded(3), Msg::TurnClicked { index: 1 });

    assert_eq!(state.selected(), Some(1));
    assert_eq!(state.highlighted(), Some(1));
    assert!(state.view().rows[1].selected);
    assert_eq!(
        effects,
        vec![
            Effect::ScrollToTurn { index: 1 },
            Effect::ScheduleHighlightRevert {
                index: 1,
                generation: armed_generation(&effects),
                after: DEFAULT_HIGHLIGHT,
            },
        ]
    );
}

#[test]
fn clicking_a_missing_turn_is_ignored() {
    let state = loaded(2);
    let (next, effects) = update(state.clone(), Msg::TurnClicked { index: 7 });

    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn new_highlight_reverts_the_previous_one() {
    let (state, _) = update(loaded(3), Msg::TurnClicked { index: 0 });
    let (state, effects) = update(state, Msg::TurnClicked { index: 2 });

    assert_eq!(state.highlighted(), Some(2));
    assert_eq!(effects[0], Effect::RevertHighlight { index: 0 });
    assert_eq!(effects[1], Effect::ScrollToTurn { index: 2 });
}

#[test]
fn only_the_current_highlight_expires() {
    let (state, first) = update(loaded(3), Msg::TurnClicked { index: 0 });
    let (state, second) = update(state, Msg::TurnClicked { index: 1 });

    let (state, stale) = update(
        state,
        Msg::HighlightExpired {
            index: 0,
            generation: armed_generation(&first),
        },
    );
    assert!(stale.is_empty());
    assert_eq!(state.highlighted(), Some(1));

    let (state, effects) = update(
        state,
        Msg::HighlightExpired {
            index: 1,
            generation: armed_generation(&second),
        },
    );
    assert_eq!(effects, vec![Effect::RevertHighlight { index: 1 }]);
    assert_eq!(state.highlighted(), None);
    assert_eq!(state.selected(), Some(1));
}

#[test]
fn reclicking_a_turn_outlives_the_first_timer() {
    let (state, first) = update(loaded(3), Msg::TurnClicked { index: 1 });
    let (state, second) = update(state, Msg::TurnClicked { index: 1 });

    assert_eq!(second[0], Effect::RevertHighlight { index: 1 });
    assert_ne!(armed_generation(&first), armed_generation(&second));

    let (state, stale) = update(
        state,
        Msg::HighlightExpired {
            index: 1,
            generation: armed_generation(&first),
        },
    );
    assert!(stale.is_empty());
    assert_eq!(state.highlighted(), Some(1));

    let (state, effects) = update(
        state,
        Msg::HighlightExpired {
            index: 1,
            generation: armed_generation(&second),
        },
    );
    assert_eq!(effects, vec![Effect::RevertHighlight { index: 1 }]);
    assert_eq!(state.highlighted(), None);
}

#[test]
fn keyboard_navigation_walks_and_stops_at_the_ends() {
    let (state, effects) = update(loaded(2), Msg::NextTurn);
    assert_eq!(state.selected(), Some(0));
    assert!(!effects.is_empty());

    let (state, _) = update(state, Msg::NextTurn);
    assert_eq!(state.selected(), Some(1));
    let (state, effects) = update(state, Msg::NextTurn);
    assert_eq!(state.selected(), Some(1));
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::PreviousTurn);
    assert_eq!(state.selected(), Some(0));
    let (state, effects) = update(state, Msg::PreviousTurn);
    assert_eq!(state.selected(), Some(0));
    assert!(effects.is_empty());
}

#[test]
fn previous_without_selection_starts_from_the_end() {
    let (state, _) = update(loaded(3), Msg::PreviousTurn);
    assert_eq!(state.selected(), Some(2));

    let (_, effects) = update(AppState::new("Gemini"), Msg::PreviousTurn);
    assert!(effects.is_empty());
}

#[test]
fn highlight_duration_is_configurable() {
    let state = loaded(1).with_highlight_duration(Duration::from_millis(250));
    let (_, effects) = update(state, Msg::TurnClicked { index: 0 });

    assert_eq!(
        effects.last(),
        Some(&Effect::ScheduleHighlightRevert {
            index: 0,
            generation: armed_generation(&effects),
            after: Duration::from_millis(250),
        })
    );
}
