use engine_logging::{engine_debug, engine_info, engine_warn};
use tokio::sync::mpsc;
use turn_index_core::{Effect, Msg, TurnRole, TurnSummary};
use turn_index_engine::{
    navigate_to, ConversationTurn, ElementHandle, HeuristicTurnExtractor, HighlightGuard,
    HighlightSettings, HostPage, Role, TurnExtractor,
};

/// Executes controller effects against the page.
pub struct EffectRunner {
    extractor: HeuristicTurnExtractor,
    highlight: HighlightSettings,
    msg_tx: mpsc::UnboundedSender<Msg>,
    turns: Vec<ConversationTurn>,
    active: Option<(usize, HighlightGuard)>,
    pending_timers: usize,
}

impl EffectRunner {
    pub fn new(
        extractor: HeuristicTurnExtractor,
        highlight: HighlightSettings,
        msg_tx: mpsc::UnboundedSender<Msg>,
    ) -> Self {
        Self {
            extractor,
            highlight,
            msg_tx,
            turns: Vec::new(),
            active: None,
            pending_timers: 0,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>, page: &mut HostPage) {
        for effect in effects {
            match effect {
                Effect::RunExtraction => {
                    self.turns = self.extractor.extract_turns(page);
                    let summaries = self.turns.iter().map(summarize).collect();
                    let _ = self.msg_tx.send(Msg::TurnsExtracted(summaries));
                }
                Effect::ScrollToTurn { index } => self.scroll_to(index, page),
                Effect::ScheduleHighlightRevert {
                    index,
                    generation,
                    after,
                } => {
                    self.pending_timers += 1;
                    let msg_tx = self.msg_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(after).await;
                        let _ = msg_tx.send(Msg::HighlightExpired { index, generation });
                    });
                }
                Effect::RevertHighlight { index } => {
                    if self.active.as_ref().is_some_and(|(active, _)| *active == index) {
                        self.revert(page);
                    }
                }
            }
        }
    }

    /// Element of a turn from the latest extraction.
    pub fn turn_handle(&self, index: usize) -> Option<ElementHandle> {
        self.turns.get(index).map(|turn| turn.source)
    }

    /// Highlight timers scheduled but not yet delivered.
    pub fn pending_timers(&self) -> usize {
        self.pending_timers
    }

    pub fn timer_elapsed(&mut self) {
        self.pending_timers = self.pending_timers.saturating_sub(1);
    }

    /// Puts back any highlight still on the page.
    pub fn shutdown(&mut self, page: &mut HostPage) {
        if self.active.is_some() {
            engine_info!("Restoring active highlight before exit");
            self.revert(page);
        }
    }

    fn scroll_to(&mut self, index: usize, page: &mut HostPage) {
        self.revert(page);
        let Some(handle) = self.turn_handle(index) else {
            engine_warn!("No turn {} in the latest extraction", index);
            return;
        };
        match navigate_to(page, handle, &self.highlight) {
            Some(guard) => {
                engine_debug!("Scrolled to turn {}", index);
                self.active = Some((index, guard));
            }
            None => engine_warn!("Turn {} is no longer on the page", index),
        }
    }

    fn revert(&mut self, page: &mut HostPage) {
        if let Some((index, guard)) = self.active.take() {
            if !guard.restore(page) {
                engine_debug!("Highlight of turn {} outlived its element", index);
            }
        }
    }
}

fn summarize(turn: &ConversationTurn) -> TurnSummary {
    TurnSummary {
        index: turn.sequence_index,
        role: match turn.role {
            Role::User => TurnRole::User,
            Role::Assistant => TurnRole::Assistant,
        },
        preview: turn.preview_text.clone(),
    }
}
