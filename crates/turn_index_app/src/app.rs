use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use engine_logging::{engine_debug, engine_info, engine_trace};
use tokio::sync::mpsc;
use turn_index_core::{update, AppState, Msg};
use turn_index_engine::{
    decode_snapshot, ActivePlatform, DecodedSnapshot, HeuristicTurnExtractor, HighlightSettings,
    HostPage, MutationWatcher, WatchSettings,
};

use crate::cli::Cli;
use crate::render::{IndexSnapshot, NavigationReport, Report};
use crate::runner::EffectRunner;

/// Indexes the snapshot, replays appended fragments and an optional
/// navigation, and reports what the sidebar showed along the way.
pub(crate) async fn run(cli: &Cli) -> anyhow::Result<Report> {
    let snapshot = load_html(&cli.page)?;
    engine_info!(
        "Loaded {} ({} bytes, {})",
        cli.page.display(),
        snapshot.html.len(),
        snapshot.encoding_label
    );

    let mut session = Session::open(&cli.url, &snapshot.html, cli.debounce(), cli.highlight())?;
    session.dispatch(Msg::RefreshRequested);
    session.pump_until_idle().await;
    let mut snapshots = vec![session.snapshot("initial")];

    for path in &cli.appends {
        let fragment = load_html(path)?;
        if !session.append(&fragment.html) {
            engine_info!("{} did not touch the conversation", path.display());
        }
        session.pump_until_idle().await;
        snapshots.push(session.snapshot(format!("after {}", path.display())));
    }

    let navigation = match cli.goto {
        Some(index) => Some(session.navigate(index).await),
        None => None,
    };

    let report = Report {
        platform: session.platform.id(),
        platform_label: session.platform.display_name().to_string(),
        encoding: snapshot.encoding_label,
        snapshots,
        navigation,
    };
    session.close();
    Ok(report)
}

fn load_html(path: &Path) -> anyhow::Result<DecodedSnapshot> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    decode_snapshot(&bytes).with_context(|| format!("failed to decode {}", path.display()))
}

/// One page load: the page, the controller state and the watcher feeding it.
struct Session {
    page: HostPage,
    platform: Arc<ActivePlatform>,
    state: AppState,
    runner: EffectRunner,
    watcher: MutationWatcher,
    msg_rx: mpsc::UnboundedReceiver<Msg>,
    awaiting_settle: bool,
}

impl Session {
    fn open(
        location: &str,
        html: &str,
        debounce: Duration,
        highlight: Duration,
    ) -> anyhow::Result<Self> {
        let page = HostPage::new(location, html);
        let platform = Arc::new(ActivePlatform::for_page(&page));
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        let settled_tx = msg_tx.clone();
        let watcher = MutationWatcher::watch(platform.clone(), WatchSettings { debounce }, move || {
            let _ = settled_tx.send(Msg::PageSettled);
        })
        .context("failed to start watching the page")?;

        let extractor = HeuristicTurnExtractor::new(platform.clone());
        let state = AppState::new(platform.display_name()).with_highlight_duration(highlight);

        Ok(Self {
            page,
            platform,
            state,
            runner: EffectRunner::new(extractor, HighlightSettings::default(), msg_tx),
            watcher,
            msg_rx,
            awaiting_settle: false,
        })
    }

    fn dispatch(&mut self, msg: Msg) {
        engine_trace!("Dispatching {:?}", msg);
        match msg {
            Msg::PageSettled => self.awaiting_settle = false,
            Msg::HighlightExpired { .. } => self.runner.timer_elapsed(),
            _ => {}
        }
        let (state, effects) = update(std::mem::take(&mut self.state), msg);
        self.state = state;
        self.runner.run(effects, &mut self.page);
    }

    fn drain(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    /// Processes messages until no debounce or highlight timer is pending.
    async fn pump_until_idle(&mut self) {
        loop {
            self.drain();
            if !self.awaiting_settle && self.runner.pending_timers() == 0 {
                break;
            }
            match self.msg_rx.recv().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    /// Appends a fragment to the observation root as one mutation batch.
    /// Returns whether the watcher found it relevant.
    fn append(&mut self, fragment: &str) -> bool {
        let root = self.platform.observation_root_handle(&self.page);
        if self.page.insert_html(root, fragment).is_none() {
            return false;
        }
        let batch = self.page.take_mutations();
        let relevant = self.watcher.observe(&self.page, &batch);
        self.awaiting_settle |= relevant;
        relevant
    }

    fn snapshot(&mut self, stage: impl Into<String>) -> IndexSnapshot {
        let view = self.state.view();
        self.state.consume_dirty();
        IndexSnapshot::from_view(stage, &view, self.state.turns())
    }

    /// Clicks a turn, then waits for its highlight to expire.
    async fn navigate(&mut self, index: usize) -> NavigationReport {
        let handle = self.runner.turn_handle(index);
        let style = |page: &HostPage| handle.and_then(|handle| page.style_attribute(handle));
        let style_before = style(&self.page);

        self.dispatch(Msg::TurnClicked { index });
        self.drain();
        let scrolled = handle.is_some() && self.page.scrolled_to() == handle;
        let style_highlighted = style(&self.page);
        engine_debug!("Turn {} highlighted: {}", index, scrolled);

        self.pump_until_idle().await;
        NavigationReport {
            index,
            scrolled,
            style_before,
            style_highlighted,
            style_restored: style(&self.page),
        }
    }

    fn close(mut self) {
        self.watcher.unsubscribe();
        self.runner.shutdown(&mut self.page);
    }
}
