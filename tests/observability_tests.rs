//! Checks the `tracing` events a map emits for each state change.

use forgetful_map::ForgetfulMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{subscriber, Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Debug, Clone, PartialEq)]
struct Captured {
    level: Level,
    message: String,
    key: Option<String>,
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    key: Option<String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "key" => self.key = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != "forgetful_map" {
            return;
        }
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            message: visitor.message,
            key: visitor.key,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let layer = CaptureLayer::default();
    let events = Arc::clone(&layer.events);
    subscriber::with_default(tracing_subscriber::registry().with(layer), f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn messages(events: &[Captured]) -> Vec<&str> {
    events.iter().map(|e| e.message.as_str()).collect()
}

#[test]
fn test_operations_emit_events() {
    let events = capture(|| {
        let map = ForgetfulMap::new(1).unwrap();
        map.add("a", 1);
        map.update("a", 2);
        map.delete(&"a");
    });

    assert_eq!(
        messages(&events),
        vec!["map created", "entry added", "entry updated", "entry deleted"]
    );
    assert_eq!(events[1].level, Level::INFO);
    assert_eq!(events[1].key.as_deref(), Some("\"a\""));
}

#[test]
fn test_eviction_emits_victim_key() {
    let events = capture(|| {
        let map = ForgetfulMap::new(1).unwrap();
        map.add("old", 1);
        map.add("new", 2);
    });

    let eviction = events
        .iter()
        .find(|e| e.message.contains("removing least used entry"))
        .expect("eviction event");
    assert_eq!(eviction.key.as_deref(), Some("\"old\""));
    assert_eq!(eviction.level, Level::INFO);
}

#[test]
fn test_update_overshoot_warns() {
    let events = capture(|| {
        let map = ForgetfulMap::new(1).unwrap();
        map.add(1u32, "one");
        map.update(2u32, "two");
    });

    assert!(events
        .iter()
        .any(|e| e.level == Level::WARN && e.message.contains("past capacity")));
}

#[test]
fn test_find_is_silent() {
    let map = ForgetfulMap::new(2).unwrap();
    map.add("a", 1);

    let events = capture(|| {
        let _ = map.find(&"a");
        let _ = map.find(&"b");
    });

    assert!(events.is_empty());
}
