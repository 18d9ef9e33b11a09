//! Debounced change watching.
//!
//! The host feeds every mutation batch to [`MutationWatcher::observe`].
//! Relevance is judged against the page right away; relevant batches push a
//! shared deadline forward, and the callback runs once the page has been
//! quiet for the debounce interval.

use std::sync::Arc;
use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::detect::ActivePlatform;
use crate::page::{HostPage, MutationRecord};
use crate::settings::WatchSettings;

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("mutation watching needs a running tokio runtime")]
    NoRuntime,
}

/// Decides whether a mutation batch may have changed the conversation.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    platform: Arc<ActivePlatform>,
}

impl RelevanceFilter {
    pub fn new(platform: Arc<ActivePlatform>) -> Self {
        Self { platform }
    }

    /// True when some added node is still attached, lies inside the
    /// observation root, and is or contains a message element.
    pub fn is_relevant(&self, page: &HostPage, batch: &[MutationRecord]) -> bool {
        let root = self.platform.observation_root(page);
        let selectors = &self.platform.message_selectors;
        batch
            .iter()
            .flat_map(|record| record.added.iter().copied())
            .filter(|handle| page.is_attached(*handle))
            .filter_map(|handle| page.element(handle))
            .filter(|element| {
                element.id() == root.id()
                    || element.ancestors().any(|ancestor| ancestor.id() == root.id())
            })
            .any(|element| selectors.matches_self_or_descendant(element))
    }
}

/// Subscription to page changes. Dropping it unsubscribes.
#[derive(Debug)]
pub struct MutationWatcher {
    relevance: RelevanceFilter,
    bursts: Option<mpsc::UnboundedSender<Instant>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl MutationWatcher {
    /// Starts watching; `on_settled` runs once per quiet period following
    /// relevant changes.
    pub fn watch<F>(
        platform: Arc<ActivePlatform>,
        settings: WatchSettings,
        on_settled: F,
    ) -> Result<Self, WatchError>
    where
        F: FnMut() + Send + 'static,
    {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| WatchError::NoRuntime)?;
        let (bursts_tx, bursts_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = runtime.spawn(debounce_loop(
            bursts_rx,
            cancel.clone(),
            settings.debounce,
            on_settled,
        ));
        engine_info!(
            "Watching {} for conversation changes (debounce {:?})",
            platform.display_name(),
            settings.debounce
        );
        Ok(Self {
            relevance: RelevanceFilter::new(platform),
            bursts: Some(bursts_tx),
            cancel,
            task: Some(task),
        })
    }

    /// Feeds one mutation batch. Returns whether it was relevant and
    /// (re)armed the debounce timer.
    pub fn observe(&self, page: &HostPage, batch: &[MutationRecord]) -> bool {
        let Some(bursts) = &self.bursts else {
            return false;
        };
        if !self.relevance.is_relevant(page, batch) {
            engine_trace!("Ignoring {} irrelevant mutation record(s)", batch.len());
            return false;
        }
        bursts.send(Instant::now()).is_ok()
    }

    pub fn is_active(&self) -> bool {
        self.bursts.is_some()
    }

    /// Stops watching. No callback runs afterwards, pending or not.
    pub fn unsubscribe(&mut self) {
        if self.bursts.take().is_none() {
            return;
        }
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        engine_info!("Stopped watching for conversation changes");
    }
}

impl Drop for MutationWatcher {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

async fn debounce_loop<F>(
    mut bursts: mpsc::UnboundedReceiver<Instant>,
    cancel: CancellationToken,
    debounce: Duration,
    mut on_settled: F,
) where
    F: FnMut(),
{
    let mut deadline: Option<Instant> = None;
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = bursts.recv() => match received {
                Some(at) => {
                    deadline = Some(at + debounce);
                    engine_trace!("Relevant change; debounce re-armed");
                }
                None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                deadline = None;
                engine_debug!("Page settled; running change callback");
                on_settled();
            }
        }
    }
}
