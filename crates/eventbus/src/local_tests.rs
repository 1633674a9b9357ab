use super::*;
use parking_lot::Mutex as PlMutex;
use std::sync::Arc;

fn sample_event() -> Event {
    Event::AdapterConnected { at: 1 }
}

#[test]
fn unfiltered_subscriber_receives_every_event() {
    let bus = LocalSubscribers::new();
    let calls = Arc::new(PlMutex::new(0));
    let counted = calls.clone();
    bus.subscribe(None, false, move |_event| {
        *counted.lock() += 1;
    });
    bus.dispatch(&sample_event());
    bus.dispatch(&Event::AdapterDisconnected { reason: "x".into(), at: 2 });
    assert_eq!(*calls.lock(), 2);
}

#[test]
fn filtered_subscriber_ignores_non_matching_types() {
    let bus = LocalSubscribers::new();
    let calls = Arc::new(PlMutex::new(0));
    let counted = calls.clone();
    bus.subscribe(Some(vec!["adapter:connected".to_string()]), false, move |_event| {
        *counted.lock() += 1;
    });
    bus.dispatch(&Event::AdapterDisconnected { reason: "x".into(), at: 2 });
    assert_eq!(*calls.lock(), 0);
    bus.dispatch(&sample_event());
    assert_eq!(*calls.lock(), 1);
}

#[test]
fn one_shot_subscriber_is_removed_after_first_match() {
    let bus = LocalSubscribers::new();
    let calls = Arc::new(PlMutex::new(0));
    let counted = calls.clone();
    bus.subscribe(None, true, move |_event| {
        *counted.lock() += 1;
    });
    bus.dispatch(&sample_event());
    bus.dispatch(&sample_event());
    assert_eq!(*calls.lock(), 1);
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn unsubscribe_stops_future_dispatches() {
    let bus = LocalSubscribers::new();
    let calls = Arc::new(PlMutex::new(0));
    let counted = calls.clone();
    let id = bus.subscribe(None, false, move |_event| {
        *counted.lock() += 1;
    });
    bus.unsubscribe(id);
    bus.dispatch(&sample_event());
    assert_eq!(*calls.lock(), 0);
}

#[test]
fn panicking_handler_is_isolated_from_other_subscribers() {
    let bus = LocalSubscribers::new();
    let calls = Arc::new(PlMutex::new(0));
    let counted = calls.clone();
    bus.subscribe(None, false, |_event| panic!("boom"));
    bus.subscribe(None, false, move |_event| {
        *counted.lock() += 1;
    });
    bus.dispatch(&sample_event());
    assert_eq!(*calls.lock(), 1);
}
