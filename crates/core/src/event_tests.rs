use super::*;

#[test]
fn known_variant_round_trips_through_json() {
    let event = Event::BotSpawned {
        id: BotId::from_string("bot-abc"),
        position: Position::new(1.0, 2.0, 3.0),
        at: 42,
    };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"supervisor:bot_spawned\""));

    let round_tripped: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(round_tripped, event);
}

#[test]
fn unrecognized_type_deserializes_as_custom() {
    let json = r#"{"type":"future:thing","foo":"bar"}"#;
    let event: Event = serde_json::from_str(json).unwrap();
    assert_eq!(event, Event::Custom);
}

#[test]
fn type_tag_matches_the_serialized_tag() {
    let event = Event::AdapterConnected { at: 1 };
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains(&format!("\"type\":\"{}\"", event.type_tag())));
}
