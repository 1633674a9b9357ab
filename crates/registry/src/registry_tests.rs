use fleet_core::FakeClock;
use tempfile::tempdir;

use super::*;

async fn new_registry(dir: &tempfile::TempDir) -> BotRegistry<FakeClock> {
    BotRegistry::open(dir.path().join("registry.json"), FakeClock::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn ensure_profile_generates_sanitized_counter_id() {
    let dir = tempdir().unwrap();
    let registry = new_registry(&dir).await;

    let bot = registry.ensure_profile(EnsureProfileOptions {
        name: "Miner Bot".to_string(),
        ..EnsureProfileOptions::default()
    });

    assert_eq!(bot.id.as_str(), "miner_bot_00");
}

#[tokio::test]
async fn ensure_profile_returns_existing_entry_for_same_name() {
    let dir = tempdir().unwrap();
    let registry = new_registry(&dir).await;

    let first = registry.ensure_profile(EnsureProfileOptions {
        name: "steve".to_string(),
        ..EnsureProfileOptions::default()
    });
    let second = registry.ensure_profile(EnsureProfileOptions {
        name: "steve".to_string(),
        ..EnsureProfileOptions::default()
    });

    assert_eq!(first.id, second.id);
    assert_eq!(registry.get_all().len(), 1);
}

#[tokio::test]
async fn ensure_profile_increments_counter_for_repeated_base() {
    let dir = tempdir().unwrap();
    let registry = new_registry(&dir).await;

    let a = registry.ensure_profile(EnsureProfileOptions {
        name: "miner".to_string(),
        ..EnsureProfileOptions::default()
    });
    let b = registry.ensure_profile(EnsureProfileOptions {
        name: "miner two".to_string(),
        ..EnsureProfileOptions::default()
    });

    assert_eq!(a.id.as_str(), "miner_00");
    assert_eq!(b.id.as_str(), "miner_two_00");
}

#[tokio::test]
async fn record_spawn_then_despawn_preserves_spawn_count() {
    let dir = tempdir().unwrap();
    let registry = new_registry(&dir).await;
    let bot = registry.ensure_profile(EnsureProfileOptions::default());

    registry.record_spawn(&bot.id, Position::new(1.0, 2.0, 3.0), true).unwrap();
    registry.record_despawn(&bot.id, Position::new(1.0, 2.0, 3.0)).unwrap();

    let after = registry.get(&bot.id).unwrap();
    assert_eq!(after.spawn_count, 1);
    assert_eq!(after.status, BotStatus::Inactive);

    registry.record_spawn(&bot.id, Position::new(4.0, 5.0, 6.0), false).unwrap();
    let after_no_increment = registry.get(&bot.id).unwrap();
    assert_eq!(after_no_increment.spawn_count, 1);
    assert_eq!(after_no_increment.status, BotStatus::Active);
}

#[tokio::test]
async fn spawn_limit_rejects_when_would_exceed_max() {
    let dir = tempdir().unwrap();
    let registry = new_registry(&dir).await;

    for i in 0..8 {
        let bot = registry.ensure_profile(EnsureProfileOptions {
            name: format!("bot{i}"),
            ..EnsureProfileOptions::default()
        });
        registry.record_spawn(&bot.id, Position::default(), true).unwrap();
    }

    let result = registry.check_spawn_limit(1, 8);
    assert!(matches!(result, Err(RegistryError::SpawnLimitExceeded { requested: 1, max: 8 })));
}

#[tokio::test]
async fn list_by_status_and_role_filter_correctly() {
    let dir = tempdir().unwrap();
    let registry = new_registry(&dir).await;

    let miner = registry.ensure_profile(EnsureProfileOptions {
        name: "miner_a".to_string(),
        role: BotRole::Miner,
        ..EnsureProfileOptions::default()
    });
    registry.ensure_profile(EnsureProfileOptions {
        name: "builder_a".to_string(),
        role: BotRole::Builder,
        ..EnsureProfileOptions::default()
    });
    registry.record_spawn(&miner.id, Position::default(), true).unwrap();

    assert_eq!(registry.list_active().len(), 1);
    assert_eq!(registry.list_by_role("miner").len(), 1);
    assert_eq!(registry.list_by_status(BotStatus::Idle).len(), 1);
}
