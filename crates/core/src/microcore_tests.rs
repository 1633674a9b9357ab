use super::*;

#[test]
fn bounded_memory_evicts_oldest_past_capacity() {
    let mut memory = BoundedMemory::new(2);
    memory.push("a");
    memory.push("b");
    memory.push("c");
    assert_eq!(memory.snapshot(), vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn phase_clamps_to_1_through_6() {
    assert_eq!(Phase::new(0).get(), 1);
    assert_eq!(Phase::new(9).get(), 6);
    assert_eq!(Phase::new(3).get(), 3);
}

#[test]
fn inbox_event_constructors_set_expected_memory() {
    let event = InboxEvent::task("mine", Some("starting mining run".to_string()));
    assert_eq!(event.memory.as_deref(), Some("starting mining run"));
    assert!(matches!(event.kind, InboxEventKind::Task { .. }));

    let scan = InboxEvent::scan();
    assert_eq!(scan.memory, None);
}
