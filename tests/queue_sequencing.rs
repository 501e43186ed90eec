// tests/queue_sequencing.rs

use std::error::Error;
use std::time::Duration;

use serde_json::json;

use pagequeue::{Advance, Queue, QueueError, QueueState, Store, StoreData};
use pagequeue_test_utils::recorder::{Notification, Notifications, TaskLog};
use pagequeue_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn sync_and_async_tasks_run_in_fifo_order_without_overlap() -> TestResult {
    init_tracing();

    let log = TaskLog::new();
    let mut queue = Queue::new();
    let notes = Notifications::attach(&mut queue);

    log.record_async(&mut queue, "slow", Duration::from_millis(30));
    log.record(&mut queue, "sync");
    log.record_async(&mut queue, "fast", Duration::from_millis(1));
    log.record(&mut queue, "last");

    let advance = with_timeout(queue.next()).await;

    assert_eq!(advance, Advance::Drained);
    assert_eq!(
        log.entries(),
        vec!["slow:start", "slow:end", "sync", "fast:start", "fast:end", "last"]
    );
    assert_eq!(notes.ends(), 1);
    assert!(notes.errors().is_empty());
    Ok(())
}

#[tokio::test]
async fn page_scenario_dumps_expected_store() -> TestResult {
    init_tracing();

    let mut queue = Queue::new();
    let notes = Notifications::attach(&mut queue);

    queue.add_sync(|store: &mut Store| store.set("page.title", "Hello"));
    queue.add(|store| {
        Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.set("page.ready", true);
            Ok(())
        })
    });

    with_timeout(queue.next()).await;

    assert_eq!(
        notes.all(),
        vec![Notification::End(json!({"page": {"title": "Hello", "ready": true}}))]
    );
    Ok(())
}

#[tokio::test]
async fn failure_halts_remaining_tasks_and_reports_once() -> TestResult {
    init_tracing();

    let log = TaskLog::new();
    let mut queue = Queue::new();
    let notes = Notifications::attach(&mut queue);

    let not_found = QueueError::new(
        "Page not found",
        "The requested page was not found.",
        404,
    );

    log.record(&mut queue, "t1");
    log.record_failure(&mut queue, "t2", not_found.clone());
    log.record(&mut queue, "t3");
    log.record(&mut queue, "t4");

    with_timeout(queue.next()).await;
    // Further triggers neither resume nor re-report.
    with_timeout(queue.next()).await;
    with_timeout(queue.next()).await;

    assert_eq!(log.entries(), vec!["t1", "t2"]);
    assert_eq!(notes.errors(), vec![not_found]);
    assert_eq!(notes.ends(), 0);
    assert_eq!(queue.state(), QueueState::Failed);
    assert_eq!(queue.len(), 2);
    Ok(())
}

#[tokio::test]
async fn failing_last_task_lets_later_triggers_signal_end() -> TestResult {
    init_tracing();

    let mut queue = Queue::new();
    let notes = Notifications::attach(&mut queue);
    queue.add_sync(|_: &mut Store| Err::<(), _>(QueueError::internal("render failed")));

    let first = with_timeout(queue.next()).await;
    assert!(matches!(first, Advance::Failed(ref e) if e.message == "render failed"));
    assert_eq!(with_timeout(queue.next()).await, Advance::Drained);

    assert_eq!(notes.errors().len(), 1);
    assert_eq!(notes.ends(), 1);
    assert_eq!(queue.state(), QueueState::Failed);
    Ok(())
}

#[tokio::test]
async fn async_rejection_and_panic_share_the_failure_path() -> TestResult {
    init_tracing();

    let mut rejecting = Queue::new();
    let notes = Notifications::attach(&mut rejecting);
    rejecting.add(|_store| {
        Box::pin(async {
            tokio::task::yield_now().await;
            Err(QueueError::new("FS Error", "no such file", 500))
        })
    });
    with_timeout(rejecting.next()).await;
    assert_eq!(notes.errors()[0].title, "FS Error");

    let mut panicking = Queue::new();
    let notes = Notifications::attach(&mut panicking);
    panicking.add_sync(|store: &mut Store| {
        if store.get("page").is_none() {
            panic!("template missing");
        }
    });
    with_timeout(panicking.next()).await;

    let errors = notes.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "template missing");
    assert_eq!(errors[0].status_code, 500);
    Ok(())
}

#[tokio::test]
async fn drained_queue_re_signals_end_on_every_next() -> TestResult {
    init_tracing();

    let mut queue = Queue::new();
    let notes = Notifications::attach(&mut queue);
    queue.add_sync(|store: &mut Store| store.set("page.count", 1));

    for _ in 0..3 {
        assert_eq!(with_timeout(queue.next()).await, Advance::Drained);
    }

    assert_eq!(notes.ends(), 3);
    for note in notes.all() {
        assert_eq!(note, Notification::End(json!({"page": {"count": 1}})));
    }
    Ok(())
}

#[tokio::test]
async fn tasks_added_after_drain_run_on_the_next_trigger() -> TestResult {
    init_tracing();

    let log = TaskLog::new();
    let mut queue = Queue::new();
    let notes = Notifications::attach(&mut queue);

    with_timeout(queue.next()).await;
    assert_eq!(queue.state(), QueueState::Drained);

    log.record(&mut queue, "late");
    assert_eq!(queue.len(), 1);
    with_timeout(queue.next()).await;

    assert_eq!(log.entries(), vec!["late"]);
    assert_eq!(notes.ends(), 2);
    Ok(())
}

#[tokio::test]
async fn late_listeners_miss_earlier_notifications() -> TestResult {
    init_tracing();

    let mut queue = Queue::new();
    with_timeout(queue.next()).await;

    let notes = Notifications::attach(&mut queue);
    assert!(notes.all().is_empty());

    with_timeout(queue.next()).await;
    assert_eq!(notes.ends(), 1);
    Ok(())
}

#[tokio::test]
async fn initial_data_is_visible_to_tasks_and_run_returns_store() -> TestResult {
    init_tracing();

    let initial: StoreData = serde_json::from_value(json!({
        "meta": {"lang": "en"},
        "site": {"name": "Example"},
    }))?;
    let mut queue = Queue::with_initial(initial);

    queue.add_sync(|store: &mut Store| {
        let name = store.get_or("site.name", "unknown");
        store.set("page.heading", format!("Welcome to {}", name.as_str().unwrap_or("?")));
    });

    let store = with_timeout(queue.run()).await?;
    assert_eq!(store.get("page.heading"), Some(&json!("Welcome to Example")));
    assert_eq!(store.get("meta.lang"), Some(&json!("en")));
    Ok(())
}
