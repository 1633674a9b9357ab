use super::*;

#[test]
fn builder_produces_unique_ids() {
    let a = BotIdentity::builder().name("scout-a").build();
    let b = BotIdentity::builder().name("scout-b").build();
    assert_ne!(a.id, b.id);
    assert!(a.id.as_str().starts_with("bot-"));
}

#[test]
fn refresh_bundle_follows_personality_changes() {
    let mut bot = BotIdentity::builder()
        .personality(PersonalityVector {
            aggression: 0.9,
            empathy: 0.1,
            ..PersonalityVector::balanced()
        })
        .build();
    assert_eq!(bot.personality_bundle.archetype, crate::personality::Archetype::Aggressive);

    bot.personality = PersonalityVector::balanced();
    bot.refresh_bundle();
    assert_eq!(bot.personality_bundle.archetype, crate::personality::Archetype::Balanced);
}

#[test]
fn position_distance_is_euclidean() {
    let a = Position::new(0.0, 0.0, 0.0);
    let b = Position::new(3.0, 4.0, 0.0);
    assert_eq!(a.distance_to(&b), 5.0);
}

#[test]
fn role_display_matches_snake_case_names() {
    assert_eq!(BotRole::Miner.to_string(), "miner");
    assert_eq!(BotRole::Custom("alchemist".into()).to_string(), "alchemist");
}
