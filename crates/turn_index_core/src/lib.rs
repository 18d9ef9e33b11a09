//! Turn index core: pure sidebar state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, TurnRole, TurnSummary, DEFAULT_HIGHLIGHT};
pub use update::update;
pub use view_model::{AppViewModel, TurnRowView, EMPTY_STATE_TEXT, USER_LABEL};
