use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use fleet_adapter::{AdapterConfig, FakeConnector, FakeTransport, GameServerAdapter};
use fleet_core::{BotRole, BotStatus, FakeClock};
use fleet_learning::LearningStore;
use fleet_microcore::{MicrocoreConfig, MicrocoreManager};
use fleet_registry::BotRegistry;

use super::*;

type TestAdapter = GameServerAdapter<FakeConnector, FakeClock>;
type TestSupervisor = BotSupervisor<FakeConnector, FakeClock>;

fn fast_config() -> SupervisorConfig {
    SupervisorConfig {
        max_active: 8,
        max_retries: 2,
        retry_delay: Duration::from_millis(1),
    }
}

async fn new_supervisor(
    dir: &Path,
    connector: FakeConnector,
    config: SupervisorConfig,
) -> (TestSupervisor, TestAdapter) {
    let clock = FakeClock::new();
    let registry = Arc::new(
        BotRegistry::open(dir.join("registry.json"), clock.clone()).await.unwrap(),
    );
    let learning = Arc::new(
        LearningStore::open(dir.join("profiles.json"), dir.join("knowledge.json"), clock.clone())
            .await
            .unwrap(),
    );
    let adapter = GameServerAdapter::new(connector, clock.clone(), AdapterConfig::default(), Vec::new(), None);
    let microcore = Arc::new(MicrocoreManager::new(
        Arc::new(adapter.clone()),
        clock.clone(),
        MicrocoreConfig::default(),
    ));
    let supervisor = BotSupervisor::open(
        dir.join("dead_letters.json"),
        registry,
        learning,
        adapter.clone(),
        microcore,
        clock,
        config,
    )
    .await
    .unwrap();
    (supervisor, adapter)
}

#[tokio::test]
async fn spawn_dead_letters_when_the_adapter_never_connects() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let (supervisor, _adapter) = new_supervisor(dir.path(), connector, fast_config()).await;

    let outcome = supervisor
        .spawn(SpawnOptions { role: BotRole::Miner, ..Default::default() })
        .await
        .unwrap();

    match outcome {
        SpawnOutcome::DeadLettered(entry) => assert_eq!(entry.fail_count, 1),
        SpawnOutcome::Spawned(_) => panic!("expected a dead-lettered spawn"),
    }
    assert_eq!(supervisor.dead_letter_queue().len(), 1);
}

#[tokio::test]
async fn spawn_succeeds_once_the_adapter_is_connected() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let (supervisor, adapter) = new_supervisor(dir.path(), connector, fast_config()).await;
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let outcome = supervisor
        .spawn(SpawnOptions { role: BotRole::Guard, name: Some("sentinel".to_string()), ..Default::default() })
        .await
        .unwrap();

    let identity = match outcome {
        SpawnOutcome::Spawned(identity) => identity,
        SpawnOutcome::DeadLettered(entry) => panic!("unexpected dead letter: {}", entry.last_error),
    };
    assert_eq!(identity.status, BotStatus::Active);
    assert_eq!(identity.spawn_count, 1);
    handle.stop().await;
}

#[tokio::test]
async fn spawn_batch_rejects_when_the_aggregate_exceeds_the_limit() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let mut config = fast_config();
    config.max_active = 1;
    let (supervisor, _adapter) = new_supervisor(dir.path(), connector, config).await;

    let list = vec![
        SpawnOptions { role: BotRole::Miner, ..Default::default() },
        SpawnOptions { role: BotRole::Builder, ..Default::default() },
    ];
    let err = supervisor.spawn_batch(list).await.unwrap_err();
    assert!(matches!(err, SupervisorError::Registry(_)));
}

#[tokio::test]
async fn spawn_team_expands_the_balanced_preset_into_five_bots() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let (supervisor, adapter) = new_supervisor(dir.path(), connector, fast_config()).await;
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let outcomes = supervisor
        .spawn_team("balanced", SpawnTeamOptions::default())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 5);
    assert!(outcomes.iter().all(|o| matches!(o, SpawnOutcome::Spawned(_))));
    handle.stop().await;
}

#[tokio::test]
async fn unknown_team_preset_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let (supervisor, _adapter) = new_supervisor(dir.path(), connector, fast_config()).await;

    let err = supervisor.spawn_team("siege", SpawnTeamOptions::default()).await.unwrap_err();
    assert!(matches!(err, SupervisorError::UnknownPreset(_)));
}

#[tokio::test]
async fn despawn_marks_the_registry_entry_inactive() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let (supervisor, adapter) = new_supervisor(dir.path(), connector, fast_config()).await;
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let outcome = supervisor
        .spawn(SpawnOptions { role: BotRole::Farmer, ..Default::default() })
        .await
        .unwrap();
    let id = outcome.identity().id;

    supervisor.despawn(&id).await.unwrap();
    handle.stop().await;
}

#[tokio::test]
async fn retry_dead_letter_queue_recovers_once_the_adapter_connects() {
    let dir = tempfile::tempdir().unwrap();
    let connector = FakeConnector::new(FakeTransport::new());
    let (supervisor, adapter) = new_supervisor(dir.path(), connector.clone(), fast_config()).await;

    let first = supervisor
        .spawn(SpawnOptions { role: BotRole::Explorer, name: Some("scout".to_string()), ..Default::default() })
        .await
        .unwrap();
    assert!(matches!(first, SpawnOutcome::DeadLettered(_)));
    assert_eq!(supervisor.dead_letter_queue().len(), 1);

    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let drained = supervisor.retry_dead_letter_queue().await.unwrap();
    assert_eq!(drained.successes.len(), 1);
    assert!(drained.failures.is_empty());
    assert!(supervisor.dead_letter_queue().is_empty());
    handle.stop().await;
}
