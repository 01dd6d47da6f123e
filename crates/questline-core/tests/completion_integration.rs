//! Integration tests for the completion lifecycle.
//!
//! These tests drive the public store API across multiple days and verify
//! that XP, levels, streaks, and achievements stay consistent end to end.

use chrono::{Duration, Utc};
use questline_core::{
    AchievementId, Difficulty, Domain, Event, LocalStore, NewTask, ScoringConfig, StreakKind, Tier,
};

fn store() -> LocalStore {
    LocalStore::new(ScoringConfig::default())
}

fn hard_task(store: &mut LocalStore, title: &str) -> String {
    let now = Utc::now();
    store
        .create_task(
            NewTask {
                title: title.to_string(),
                tier: Some(Tier::Three),
                difficulty: Some(Difficulty::Hard),
                due_at: Some(now + Duration::days(7)),
                ..Default::default()
            },
            now,
        )
        .0
}

#[test]
fn test_multi_day_completions_build_a_streak() {
    let mut s = store();
    let now = Utc::now();

    for day in (0..3).rev() {
        let (id, _) = s.create_task(
            NewTask {
                title: format!("Day {day}"),
                ..Default::default()
            },
            now - Duration::days(day),
        );
        s.complete_task(&id, now - Duration::days(day)).unwrap();
    }

    let profile = s.profile(Domain::Tasks);
    assert_eq!(profile.lifetime_completed, 3);
    assert_eq!(profile.streak(StreakKind::Daily).current, 3);
    assert_eq!(profile.streak(StreakKind::Daily).longest, 3);
}

#[test]
fn test_same_day_completions_do_not_inflate_the_streak() {
    let mut s = store();
    let now = Utc::now();

    for i in 0..4 {
        let (id, _) = s.create_task(
            NewTask {
                title: format!("Task {i}"),
                ..Default::default()
            },
            now,
        );
        s.complete_task(&id, now).unwrap();
    }

    assert_eq!(s.profile(Domain::Tasks).streak(StreakKind::Daily).current, 1);
    assert_eq!(s.profile(Domain::Tasks).lifetime_completed, 4);
}

#[test]
fn test_gap_resets_streak_but_keeps_longest() {
    let mut s = store();
    let now = Utc::now();

    // Three consecutive days, then a two-day gap, then one more.
    for day in [9, 8, 7, 4] {
        let (id, _) = s.create_task(
            NewTask {
                title: format!("Day -{day}"),
                ..Default::default()
            },
            now - Duration::days(day),
        );
        s.complete_task(&id, now - Duration::days(day)).unwrap();
    }

    let streak = s.profile(Domain::Tasks).streak(StreakKind::Daily);
    assert_eq!(streak.current, 1);
    assert_eq!(streak.longest, 3);
}

#[test]
fn test_crossing_a_threshold_emits_level_up() {
    let mut s = store();
    let now = Utc::now();

    // Two punctual tier-3 hard completions clear the 100 XP threshold.
    let a = hard_task(&mut s, "First");
    let b = hard_task(&mut s, "Second");
    s.complete_task(&a, now).unwrap();
    s.complete_task(&b, now).unwrap();

    let profile = s.profile(Domain::Tasks);
    assert!(profile.xp >= 100);
    assert_eq!(profile.level, 2);

    let events = s.drain_events();
    assert!(events.iter().any(|e| matches!(e, Event::LevelUp { .. })));
}

#[test]
fn test_uncompletion_reverses_xp_but_not_streaks() {
    let mut s = store();
    let now = Utc::now();

    let id = hard_task(&mut s, "Reversible");
    let (receipt, _) = s.complete_task(&id, now).unwrap();
    assert!(receipt.awarded_xp > 0);

    s.uncomplete_task(&id, now + Duration::minutes(1)).unwrap();

    let profile = s.profile(Domain::Tasks);
    assert_eq!(profile.xp, 0);
    assert_eq!(profile.level, 1);
    assert_eq!(profile.lifetime_completed, 0);
    // The streak day and the unlock survive the reversal.
    assert_eq!(profile.streak(StreakKind::Daily).current, 1);
    assert!(profile.is_unlocked(AchievementId::FirstSteps));
}

#[test]
fn test_recompletion_after_undo_awards_fresh_xp() {
    let mut s = store();
    let now = Utc::now();

    let (id, _) = s.create_task(
        NewTask {
            title: "Toggle".to_string(),
            due_at: Some(now + Duration::hours(1)),
            ..Default::default()
        },
        now,
    );

    let (first, _) = s.complete_task(&id, now).unwrap();
    s.uncomplete_task(&id, now).unwrap();

    // Re-completed after the due time: the punctuality bonus no longer
    // applies, so the fresh award is smaller than the first.
    let (second, _) = s
        .complete_task(&id, now + Duration::hours(2))
        .unwrap();
    assert!(second.awarded_xp < first.awarded_xp);
    assert_eq!(s.profile(Domain::Tasks).xp, second.awarded_xp);
}

#[test]
fn test_achievement_unlocks_accumulate_across_milestones() {
    let mut s = store();
    let now = Utc::now();

    let mut unlocked = Vec::new();
    for i in 0..10 {
        let (id, _) = s.create_task(
            NewTask {
                title: format!("Task {i}"),
                ..Default::default()
            },
            now,
        );
        let (receipt, _) = s.complete_task(&id, now).unwrap();
        unlocked.extend(receipt.newly_unlocked);
    }

    assert!(unlocked.contains(&AchievementId::FirstSteps));
    assert!(unlocked.contains(&AchievementId::Committed));
    // Each id appears at most once across the run.
    let mut deduped = unlocked.clone();
    deduped.sort_by_key(|id| format!("{id:?}"));
    deduped.dedup();
    assert_eq!(deduped.len(), unlocked.len());
}
