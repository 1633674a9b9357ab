use super::*;

#[test]
fn critical_hit_is_tried_before_attack_with_health() {
    let parsed = parse_line("Bot1 critically hit Bot2 for 12.5 damage", 1_000).unwrap();
    assert_eq!(parsed.event.kind, CombatEventKind::Attack);
    assert!(parsed.event.critical);
    assert_eq!(parsed.event.source.as_deref(), Some("Bot1"));
    assert_eq!(parsed.event.target.as_deref(), Some("Bot2"));
    assert_eq!(parsed.event.amount, Some(12.5));
    assert_eq!(parsed.explicit_health, None);
}

#[test]
fn attack_with_health_carries_explicit_health() {
    let parsed =
        parse_line("Bot1 hit Bot2 for 4 damage (Bot2 has 16 health left)", 1_000).unwrap();
    assert_eq!(parsed.event.kind, CombatEventKind::Attack);
    assert!(!parsed.event.critical);
    assert_eq!(parsed.event.amount, Some(4.0));
    assert_eq!(parsed.explicit_health, Some(16.0));
}

#[test]
fn dodge_block_parry_identify_defender_and_attacker() {
    let dodge = parse_line("Bot2 dodged Bot1's attack", 0).unwrap();
    assert_eq!(dodge.event.kind, CombatEventKind::Dodge);
    assert_eq!(dodge.event.target.as_deref(), Some("Bot2"));
    assert_eq!(dodge.event.source.as_deref(), Some("Bot1"));

    let block = parse_line("Bot2 blocked Bot1's attack", 0).unwrap();
    assert_eq!(block.event.kind, CombatEventKind::Block);

    let parry = parse_line("Bot2 parried Bot1's attack", 0).unwrap();
    assert_eq!(parry.event.kind, CombatEventKind::Parry);
}

#[test]
fn damage_taken_has_no_source() {
    let parsed = parse_line("Bot2 took 7 damage", 0).unwrap();
    assert_eq!(parsed.event.kind, CombatEventKind::Damage);
    assert_eq!(parsed.event.source, None);
    assert_eq!(parsed.event.amount, Some(7.0));
}

#[test]
fn health_status_reports_explicit_health() {
    let parsed = parse_line("Bot2 has 20 health", 0).unwrap();
    assert_eq!(parsed.event.kind, CombatEventKind::Health);
    assert_eq!(parsed.explicit_health, Some(20.0));
}

#[test]
fn defeated_by_and_was_defeated_both_yield_defeated_kind() {
    let by_source = parse_line("Bot2 was slain by Bot1", 0).unwrap();
    assert_eq!(by_source.event.kind, CombatEventKind::Defeated);
    assert_eq!(by_source.event.source.as_deref(), Some("Bot1"));

    let no_source = parse_line("Bot2 died", 0).unwrap();
    assert_eq!(no_source.event.kind, CombatEventKind::Defeated);
    assert_eq!(no_source.event.source, None);
}

#[test]
fn heal_matches_either_phrasing() {
    let healed_for = parse_line("Bot2 healed for 5", 0).unwrap();
    assert_eq!(healed_for.event.kind, CombatEventKind::Heal);
    assert_eq!(healed_for.event.amount, Some(5.0));

    let was_healed = parse_line("Bot2 was healed 5 health", 0).unwrap();
    assert_eq!(was_healed.event.kind, CombatEventKind::Heal);
}

#[test]
fn durability_captures_item_as_target() {
    let parsed = parse_line("Bot1's pickaxe durability: 3", 0).unwrap();
    assert_eq!(parsed.event.kind, CombatEventKind::Durability);
    assert_eq!(parsed.event.source.as_deref(), Some("Bot1"));
    assert_eq!(parsed.event.target.as_deref(), Some("pickaxe"));
    assert_eq!(parsed.event.amount, Some(3.0));
}

#[test]
fn unrecognized_line_returns_none() {
    assert!(parse_line("the weather is nice today", 0).is_none());
}

#[test]
fn raw_line_is_trimmed_before_storage() {
    let parsed = parse_line("  Bot2 died  \n", 0).unwrap();
    assert_eq!(parsed.event.raw_line, "Bot2 died");
}
