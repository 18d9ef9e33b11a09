use crate::{AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::TurnsExtracted(turns) => {
            state.replace_turns(turns);
            Vec::new()
        }
        Msg::TurnClicked { index } => navigate(&mut state, index),
        Msg::NextTurn => {
            let target = state.selected().map_or(0, |index| index + 1);
            navigate(&mut state, target)
        }
        Msg::PreviousTurn => match state.selected() {
            Some(0) => Vec::new(),
            Some(index) => navigate(&mut state, index - 1),
            None => match state.turns().len() {
                0 => Vec::new(),
                len => navigate(&mut state, len - 1),
            },
        },
        Msg::ToggleSidebar => {
            state.toggle_sidebar();
            Vec::new()
        }
        Msg::RefreshRequested | Msg::PageSettled => vec![Effect::RunExtraction],
        Msg::HighlightExpired { index, generation } => {
            if state.end_highlight(index, generation) {
                vec![Effect::RevertHighlight { index }]
            } else {
                Vec::new()
            }
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

/// Selects, scrolls to and highlights a turn. Out-of-range indices are
/// ignored; a previous highlight is reverted first.
fn navigate(state: &mut AppState, index: usize) -> Vec<Effect> {
    if !state.contains(index) {
        return Vec::new();
    }
    state.select(index);
    let mut effects = Vec::with_capacity(3);
    let (previous, generation) = state.begin_highlight(index);
    if let Some(previous) = previous {
        effects.push(Effect::RevertHighlight { index: previous });
    }
    effects.push(Effect::ScrollToTurn { index });
    effects.push(Effect::ScheduleHighlightRevert {
        index,
        generation,
        after: state.highlight_duration(),
    });
    effects
}
