use std::time::Duration;

use fleet_core::bot::{BotId, Position};
use fleet_core::FakeClock;

use super::*;
use crate::transport::fake::{FakeConnector, FakeTransport};

fn fast_config() -> AdapterConfig {
    AdapterConfig {
        max_commands_per_second: 200,
        heartbeat_interval: Duration::from_secs(30),
        snapshot_interval: Duration::from_secs(30),
        cleanup_interval: Duration::from_secs(30),
        reconnect_base_delay: Duration::from_millis(5),
        max_reconnect_delay: Duration::from_millis(20),
        post_spawn_delay: Duration::from_millis(10),
        snapshot_persistence_interval: None,
        ..AdapterConfig::default()
    }
}

type TestAdapter = GameServerAdapter<FakeConnector, FakeClock>;

fn new_adapter(transport: FakeTransport) -> (TestAdapter, FakeConnector) {
    let connector = FakeConnector::new(transport);
    let adapter = GameServerAdapter::new(connector.clone(), FakeClock::new(), fast_config(), Vec::new(), None);
    (adapter, connector)
}

#[tokio::test]
async fn unknown_template_is_rejected_without_requiring_a_connection() {
    let transport = FakeTransport::new();
    let (adapter, _connector) = new_adapter(transport);
    let result = adapter.execute_command_template("missing", &[]).await;
    assert!(matches!(result, Err(AdapterError::UnknownTemplate(name)) if name == "missing"));
}

#[tokio::test]
async fn send_command_without_a_connection_fails_fast() {
    let transport = FakeTransport::new();
    let (adapter, _connector) = new_adapter(transport);
    let result = adapter.send_command("ping").await;
    assert!(matches!(result, Err(AdapterError::Disconnected)));
}

#[tokio::test]
async fn connect_and_send_command_returns_transport_response() {
    let transport = FakeTransport::new();
    // The immediate first heartbeat tick consumes one response; push enough
    // identical responses so ordering between it and the test command
    // doesn't matter.
    for _ in 0..3 {
        transport.push_response("ack");
    }
    let (adapter, _connector) = new_adapter(transport);
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let result = adapter.send_command("status").await;
    assert_eq!(result.unwrap(), "ack");

    handle.stop().await;
}

#[tokio::test]
async fn combat_feedback_in_a_response_updates_combatant_state() {
    let transport = FakeTransport::new();
    transport.push_response("ack");
    let (adapter, _connector) = new_adapter(transport.clone());
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(30)).await;

    transport.push_response("Bot2 took 5 damage");
    adapter.send_command("check bot2").await.unwrap();

    let combatant = adapter.combatant("Bot2").expect("combat state recorded");
    assert_eq!(combatant.last_damage, Some(5.0));

    handle.stop().await;
}

#[tokio::test]
async fn reconnect_retries_after_a_refused_connect() {
    let transport = FakeTransport::new();
    transport.push_response("ack");
    let (adapter, connector) = new_adapter(transport);
    connector.fail_next_connects(2);
    let handle = adapter.spawn();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(adapter.connection_state().is_connected());
    assert!(adapter.get_metrics().reconnect_count >= 2);

    handle.stop().await;
}

#[tokio::test]
async fn register_and_execute_command_template_substitutes_positional_args() {
    let transport = FakeTransport::new();
    for _ in 0..3 {
        transport.push_response("ack");
    }
    let (adapter, _connector) = new_adapter(transport.clone());
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(30)).await;

    adapter.register_command_template("greet", "say hello {0}");
    adapter
        .execute_command_template("greet", &["Bot1".to_string()])
        .await
        .unwrap();

    assert!(transport.sent_commands().iter().any(|c| c == "say hello Bot1"));

    handle.stop().await;
}

#[tokio::test]
async fn spawn_entity_issues_post_spawn_commands_after_the_configured_delay() {
    let transport = FakeTransport::new();
    for _ in 0..4 {
        transport.push_response("ack");
    }
    let (adapter, _connector) = new_adapter(transport.clone());
    let handle = adapter.spawn();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let bot_id = BotId::new();
    adapter
        .spawn_entity(bot_id.as_str(), Position::new(1.0, 2.0, 3.0), vec!["equip sword".to_string()])
        .await
        .unwrap();

    let sent = transport.sent_commands();
    assert!(sent.iter().any(|c| c.starts_with("summon")));
    assert!(sent.iter().any(|c| c == "equip sword"));

    handle.stop().await;
}
