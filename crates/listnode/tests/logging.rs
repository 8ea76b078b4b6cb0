//! Structured log events emitted by the list.

#![allow(clippy::unwrap_used)]

use listnode::ScrollPosition;
use listnode_test::{numbered_items, ListHarness};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Clone)]
struct Captured {
    level: Level,
    message: String,
    fields: Vec<String>,
}

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<String>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push(field.name().to_string());
        }
    }
}

struct Capture {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<F: FnOnce()>(run: F) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        events: Arc::clone(&events),
    });
    tracing::subscriber::with_default(subscriber, || {
        tracing::callsite::rebuild_interest_cache();
        run();
    });
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [Captured], message: &str) -> Option<&'a Captured> {
    events.iter().find(|e| e.message == message)
}

#[test]
fn test_rejected_batch_is_logged_as_warning() {
    let mut harness = ListHarness::new(numbered_items(3));
    let events = capture(|| {
        let _ = harness.list_mut().perform_batch_with(|b| {
            b.delete(7, 1);
        });
    });

    let event = find(&events, "batch rejected").unwrap();
    assert_eq!(event.level, Level::WARN);
    assert!(event.fields.iter().any(|f| f == "err"));
}

#[test]
fn test_applied_batch_is_logged_with_counts() {
    let mut harness = ListHarness::new(numbered_items(3));
    let events = capture(|| {
        harness
            .list_mut()
            .perform_batch_with(|b| {
                b.insert(0, ["x".to_string()]).delete(1, 1);
            })
            .unwrap();
    });

    let event = find(&events, "performed batch").unwrap();
    assert_eq!(event.level, Level::DEBUG);
    for field in ["inserted", "deleted", "len", "generation"] {
        assert!(event.fields.iter().any(|f| f == field), "missing {field}");
    }
}

#[test]
fn test_stale_cell_drop_is_logged() {
    let mut harness = ListHarness::deferred(numbered_items(5));
    let events = capture(|| {
        harness.list_mut().set_items(numbered_items(4));
        harness.deliver_deferred();
    });
    assert!(find(&events, "dropping stale cell").is_some());
}

#[test]
fn test_scrolling_emits_no_warnings() {
    let mut harness = ListHarness::new(numbered_items(100));
    let events = capture(|| {
        harness
            .list_mut()
            .scroll_to_item_at_index(60, ScrollPosition::Middle, true)
            .unwrap();
        harness.scroll(10.0);
    });
    assert!(events.iter().all(|e| e.level != Level::WARN));
}

#[test]
fn test_fmt_subscriber_accepts_list_events() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::TRACE)
        .try_init();

    let mut harness = ListHarness::new(numbered_items(10));
    harness.scroll(20.0);
    harness.assert_visible(2, 10);
}
