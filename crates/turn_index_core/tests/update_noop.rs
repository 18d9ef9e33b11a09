use turn_index_core::{update, AppState, Msg};

#[test]
fn tick_leaves_state_untouched() {
    let state = AppState::new("ChatGPT");
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
