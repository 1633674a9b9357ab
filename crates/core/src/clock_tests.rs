use std::time::Duration;

use super::*;

#[test]
fn fake_clock_advances_both_instant_and_epoch() {
    let clock = FakeClock::new();
    clock.set_epoch_ms(1_000);
    let start = clock.now();

    clock.advance(Duration::from_millis(250));

    assert_eq!(clock.epoch_ms(), 1_250);
    assert_eq!(clock.now(), start + Duration::from_millis(250));
}

#[test]
fn fake_clock_set_overrides_instant_directly() {
    let clock = FakeClock::new();
    let target = clock.now() + Duration::from_secs(5);
    clock.set(target);
    assert_eq!(clock.now(), target);
}

#[test]
fn system_clock_epoch_ms_is_nonzero() {
    let clock = SystemClock;
    assert!(clock.epoch_ms() > 0);
}
