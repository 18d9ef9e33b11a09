use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Rebuild the turn list from the page.
    RunExtraction,
    /// Scroll the page to a turn and highlight it.
    ScrollToTurn { index: usize },
    /// Deliver `Msg::HighlightExpired { index, generation }` once `after`
    /// has elapsed.
    ScheduleHighlightRevert {
        index: usize,
        generation: u64,
        after: Duration,
    },
    RevertHighlight { index: usize },
}
