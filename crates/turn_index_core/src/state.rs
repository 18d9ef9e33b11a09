use std::time::Duration;

use crate::view_model::{AppViewModel, TurnRowView, EMPTY_STATE_TEXT, USER_LABEL};

pub const DEFAULT_HIGHLIGHT: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnRole {
    User,
    Assistant,
}

/// What the index needs to know about one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnSummary {
    pub index: usize,
    pub role: TurnRole,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    platform_label: String,
    sidebar_visible: bool,
    turns: Vec<TurnSummary>,
    selected: Option<usize>,
    /// Highlighted turn and the generation of the click that lit it.
    highlighted: Option<(usize, u64)>,
    highlight_generation: u64,
    highlight_duration: Duration,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl AppState {
    /// `platform_label` names the assistant side of the conversation.
    pub fn new(platform_label: impl Into<String>) -> Self {
        Self {
            platform_label: platform_label.into(),
            sidebar_visible: true,
            turns: Vec::new(),
            selected: None,
            highlighted: None,
            highlight_generation: 0,
            highlight_duration: DEFAULT_HIGHLIGHT,
            dirty: false,
        }
    }

    pub fn with_highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_duration = duration;
        self
    }

    pub fn turns(&self) -> &[TurnSummary] {
        &self.turns
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted.map(|(index, _)| index)
    }

    pub fn sidebar_visible(&self) -> bool {
        self.sidebar_visible
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            sidebar_visible: self.sidebar_visible,
            platform_label: self.platform_label.clone(),
            rows: self
                .turns
                .iter()
                .map(|turn| TurnRowView {
                    index: turn.index,
                    role_label: self.role_label(turn.role).to_string(),
                    preview: turn.preview.clone(),
                    selected: self.selected == Some(turn.index),
                })
                .collect(),
            selected: self.selected,
            empty_state: self.turns.is_empty().then_some(EMPTY_STATE_TEXT),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn role_label(&self, role: TurnRole) -> &str {
        match role {
            TurnRole::User => USER_LABEL,
            TurnRole::Assistant => &self.platform_label,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn replace_turns(&mut self, turns: Vec<TurnSummary>) {
        if self.selected.is_some_and(|index| index >= turns.len()) {
            self.selected = None;
        }
        self.turns = turns;
        self.mark_dirty();
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        index < self.turns.len()
    }

    pub(crate) fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        self.mark_dirty();
    }

    pub(crate) fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.mark_dirty();
    }

    /// Records `index` as highlighted under a fresh generation. Returns the
    /// turn it replaces, if any, and the new generation.
    pub(crate) fn begin_highlight(&mut self, index: usize) -> (Option<usize>, u64) {
        self.highlight_generation += 1;
        let generation = self.highlight_generation;
        let previous = self.highlighted.replace((index, generation));
        (previous.map(|(index, _)| index), generation)
    }

    /// Clears the highlight if it is still the one `generation` lit.
    /// Re-clicking a turn starts a new generation, so older timers for the
    /// same turn are ignored.
    pub(crate) fn end_highlight(&mut self, index: usize, generation: u64) -> bool {
        if self.highlighted != Some((index, generation)) {
            return false;
        }
        self.highlighted = None;
        true
    }

    pub(crate) fn highlight_duration(&self) -> Duration {
        self.highlight_duration
    }
}
