use fleet_core::FakeClock;
use tempfile::tempdir;

use super::*;

async fn new_store(dir: &tempfile::TempDir) -> LearningStore<FakeClock> {
    LearningStore::open(
        dir.path().join("profiles.json"),
        dir.path().join("knowledge.json"),
        FakeClock::new(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn record_outcome_updates_profile_and_aggregates() {
    let dir = tempdir().unwrap();
    let store = new_store(&dir).await;

    store.record_outcome("steve", "mine", true, 10.0, 1000, vec![], "overworld");
    store.record_outcome("steve", "mine", false, 0.0, 500, vec!["lava".to_string()], "overworld");

    let profile = store.profile("steve").unwrap();
    assert_eq!(profile.tasks_completed, 1);
    assert_eq!(profile.tasks_failed, 1);
    assert_eq!(profile.performance["mine"].attempts, 2);
}

#[tokio::test]
async fn success_rate_and_average_yield_are_derived_from_outcomes() {
    let dir = tempdir().unwrap();
    let store = new_store(&dir).await;

    store.record_outcome("steve", "mine", true, 20.0, 1000, vec![], "overworld");
    store.record_outcome("steve", "mine", true, 0.0, 1000, vec![], "overworld");
    store.record_outcome("steve", "mine", false, 0.0, 1000, vec![], "overworld");

    assert!((store.success_rate("mine") - (2.0 / 3.0)).abs() < 1e-9);
    assert!((store.average_yield("mine") - (20.0 / 3.0)).abs() < 1e-9);
}

#[tokio::test]
async fn hazard_frequency_counts_across_all_outcomes() {
    let dir = tempdir().unwrap();
    let store = new_store(&dir).await;

    store.record_outcome("steve", "mine", true, 0.0, 0, vec!["lava".to_string()], "overworld");
    store.record_outcome("steve", "mine", true, 0.0, 0, vec![], "overworld");

    assert_eq!(store.hazard_frequency("lava"), 0.5);
    assert_eq!(store.hazard_frequency("creeper"), 0.0);
}

#[tokio::test]
async fn dynamic_duration_estimate_matches_formula() {
    let dir = tempdir().unwrap();
    let store = new_store(&dir).await;

    // success_rate defaults to 0, average_yield defaults to 0 with no history.
    let estimate = store.dynamic_duration_estimate("mine", 1000.0);
    // modifier = max(0.5, 1.3 - 0) = 1.3; yieldBonus = min(0.9, 0/200) = 0
    assert_eq!(estimate, 1300.0);
}

#[tokio::test]
async fn recommended_supplies_ranks_top_five_hazards() {
    let dir = tempdir().unwrap();
    let store = new_store(&dir).await;

    for _ in 0..3 {
        store.record_outcome("steve", "mine", true, 0.0, 0, vec!["lava".to_string()], "overworld");
    }
    for _ in 0..2 {
        store.record_outcome("steve", "mine", true, 0.0, 0, vec!["creeper".to_string()], "overworld");
    }

    let supplies = store.recommended_supplies("mine");
    assert_eq!(supplies.first().map(String::as_str), Some("lava"));
}

#[tokio::test]
async fn update_skills_clamps_and_persists_in_memory() {
    let dir = tempdir().unwrap();
    let store = new_store(&dir).await;

    store.update_skills("steve", [("mining".to_string(), 150.0)]);
    let profile = store.profile("steve").unwrap();
    assert_eq!(profile.skills["mining"], 100.0);
}
