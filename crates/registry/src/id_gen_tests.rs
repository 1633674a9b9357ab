use super::*;

#[test]
fn sanitize_base_lowercases_and_collapses_separators() {
    assert_eq!(sanitize_base("Miner Bot!!"), "miner_bot");
    assert_eq!(sanitize_base("  leading"), "leading");
    assert_eq!(sanitize_base("trailing---"), "trailing");
}

#[test]
fn sanitize_base_falls_back_to_bot_when_empty() {
    assert_eq!(sanitize_base("###"), "bot");
}

#[test]
fn format_candidate_zero_pads_to_two_digits() {
    assert_eq!(format_candidate("miner", 3), "miner_03");
    assert_eq!(format_candidate("miner", 42), "miner_42");
}
