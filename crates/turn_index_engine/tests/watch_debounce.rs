use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Instant};
use turn_index_engine::{ActivePlatform, HostPage, MutationWatcher, WatchSettings};

const LOCATION: &str = "https://chatgpt.com/c/1";
const CHAT: &str = r#"<body><main id="chat"></main></body>"#;
const DEBOUNCE: Duration = Duration::from_millis(500);

fn start() -> (HostPage, MutationWatcher, mpsc::UnboundedReceiver<Instant>) {
    let page = HostPage::new(LOCATION, CHAT);
    let platform = Arc::new(ActivePlatform::for_page(&page));
    let (fired_tx, fired_rx) = mpsc::unbounded_channel();
    let watcher = MutationWatcher::watch(platform, WatchSettings::default(), move || {
        let _ = fired_tx.send(Instant::now());
    })
    .unwrap();
    (page, watcher, fired_rx)
}

fn add_turn(page: &mut HostPage, watcher: &MutationWatcher, text: &str) -> bool {
    let main = page.find("#chat").unwrap();
    page.insert_html(
        main,
        &format!(r#"<div data-message-author-role="user">{text}</div>"#),
    )
    .unwrap();
    let batch = page.take_mutations();
    watcher.observe(page, &batch)
}

#[tokio::test(start_paused = true)]
async fn burst_of_changes_fires_once_after_quiet_period() {
    let (mut page, watcher, mut fired) = start();

    let mut last = None;
    for i in 0..5 {
        assert!(add_turn(&mut page, &watcher, &format!("message {i}")));
        last = Some(Instant::now());
        sleep(Duration::from_millis(200)).await;
    }

    let fired_at = fired.recv().await.unwrap();
    assert!(fired_at.duration_since(last.unwrap()) >= DEBOUNCE);
    assert!(timeout(Duration::from_secs(5), fired.recv()).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn irrelevant_batches_do_not_rearm_the_timer() {
    let (mut page, watcher, mut fired) = start();

    assert!(add_turn(&mut page, &watcher, "hello"));
    let armed = Instant::now();
    sleep(Duration::from_millis(300)).await;

    let main = page.find("#chat").unwrap();
    page.insert_html(main, "<span>typing...</span>").unwrap();
    let batch = page.take_mutations();
    assert!(!watcher.observe(&page, &batch));

    let fired_at = fired.recv().await.unwrap();
    let elapsed = fired_at.duration_since(armed);
    assert!(elapsed >= DEBOUNCE);
    assert!(elapsed < Duration::from_millis(800));
}

#[tokio::test(start_paused = true)]
async fn separate_quiet_periods_fire_separately() {
    let (mut page, watcher, mut fired) = start();

    assert!(add_turn(&mut page, &watcher, "first"));
    fired.recv().await.unwrap();
    assert!(add_turn(&mut page, &watcher, "second"));
    fired.recv().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn unsubscribe_cancels_pending_callback() {
    let (mut page, mut watcher, mut fired) = start();

    assert!(add_turn(&mut page, &watcher, "hello"));
    watcher.unsubscribe();

    assert!(!watcher.is_active());
    assert!(!add_turn(&mut page, &watcher, "ignored"));
    let outcome = timeout(Duration::from_secs(5), fired.recv()).await;
    assert!(!matches!(outcome, Ok(Some(_))));
}
