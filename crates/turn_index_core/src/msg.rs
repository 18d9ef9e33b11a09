#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A finished extraction pass; replaces the previous list wholesale.
    TurnsExtracted(Vec<crate::TurnSummary>),
    /// User clicked a row in the index.
    TurnClicked { index: usize },
    /// Keyboard navigation to the following turn.
    NextTurn,
    /// Keyboard navigation to the preceding turn.
    PreviousTurn,
    ToggleSidebar,
    /// Manual refresh gesture.
    RefreshRequested,
    /// The watcher saw relevant page changes settle.
    PageSettled,
    /// A highlight timer elapsed. `generation` identifies the click that
    /// armed it.
    HighlightExpired { index: usize, generation: u64 },
    /// UI/render tick to coalesce rendering.
    Tick,
}
