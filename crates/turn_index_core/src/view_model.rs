pub const USER_LABEL: &str = "You";

pub const EMPTY_STATE_TEXT: &str =
    "No conversation yet. Start chatting to see your message index here.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub sidebar_visible: bool,
    pub platform_label: String,
    pub rows: Vec<TurnRowView>,
    pub selected: Option<usize>,
    /// Shown instead of rows while no turns were found.
    pub empty_state: Option<&'static str>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRowView {
    pub index: usize,
    pub role_label: String,
    pub preview: String,
    pub selected: bool,
}
