//! End-to-end governor behavior under sustained load changes.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::time::Duration;

use backdrop_quality::{
    BudgetChange, EntityBudget, FpsThresholds, ManualClock, QualityConfig, QualityGovernor,
    QualityLevel, SettingsWatcher, TierDirection,
};

fn ladder() -> Vec<QualityLevel> {
    vec![
        QualityLevel::new("low", 0.6, 60),
        QualityLevel::new("medium", 0.85, 120),
        QualityLevel::new("high", 1.0, 200),
    ]
}

fn governor() -> QualityGovernor<ManualClock> {
    QualityGovernor::with_clock(
        ManualClock::new(),
        ladder(),
        FpsThresholds::new(110.0, 50.0),
        5,
        5,
        2,
    )
    .unwrap()
}

/// Run one frame of `frame_time` through the begin/end hooks.
fn run_frame(gov: &mut QualityGovernor<ManualClock>, frame_time: Duration) -> bool {
    gov.begin_frame();
    gov.clock().advance(frame_time);
    gov.end_frame().is_some()
}

#[test]
fn slow_frames_then_fast_frames_round_trip_the_tier() {
    let mut gov = governor();
    assert_eq!(gov.settings().level, "high");

    for _ in 0..5 {
        run_frame(&mut gov, Duration::from_secs_f64(1.0 / 30.0));
    }
    let settings = gov.settings();
    assert_eq!(settings.level, "medium");
    assert_eq!(settings.resolution_scale, 0.85);
    assert_eq!(settings.max_entities, 120);

    // The window now holds only 200 FPS readings.
    for _ in 0..5 {
        run_frame(&mut gov, Duration::from_millis(5));
    }
    assert_eq!(gov.settings().level, "high");
    assert_eq!(gov.frame_count(), 10);
}

#[test]
fn sustained_collapse_walks_down_one_tier_per_evaluation() {
    let mut gov = governor();
    let mut changes = Vec::new();
    for _ in 0..20 {
        changes.extend(gov.record_frame(Duration::from_millis(100)));
    }
    let frames: Vec<u64> = changes.iter().map(|c| c.frame).collect();
    assert_eq!(frames, vec![5, 10]);
    assert!(changes.iter().all(|c| c.direction == TierDirection::Down));
    assert_eq!(gov.settings().level, "low");
}

#[test]
fn mixed_window_mean_inside_band_holds() {
    let mut gov = governor();
    // Mean of 30, 30, 200, 200, 200 is 132 > 110, but the tier is already top.
    for ms in [33, 33, 5, 5, 5] {
        gov.record_frame(Duration::from_millis(ms));
    }
    assert_eq!(gov.level_index(), 2);

    let mut gov = QualityGovernor::with_clock(
        ManualClock::new(),
        ladder(),
        FpsThresholds::new(110.0, 50.0),
        5,
        5,
        1,
    )
    .unwrap();
    // 80 FPS sits inside the band.
    for _ in 0..50 {
        gov.record_frame(Duration::from_micros(12_500));
    }
    assert_eq!(gov.settings().level, "medium");
}

#[test]
fn watcher_and_budget_follow_tier_changes() {
    let mut gov = governor();
    let mut watcher = SettingsWatcher::new(5);
    let mut budget = EntityBudget::default();
    let mut changes = Vec::new();

    for _ in 0..10 {
        gov.record_frame(Duration::from_millis(100));
        if let Some(settings) = watcher.tick(&gov) {
            changes.push(budget.sync(&settings));
        }
    }

    // First poll sees medium (the tier dropped on the same frame), second sees low.
    assert_eq!(changes, vec![BudgetChange::Grow(120), BudgetChange::Shrink(60)]);
    assert_eq!(budget.current(), 60);
}

#[test]
fn stock_configuration_starts_high_and_evaluates_every_ninety_frames() {
    let config = QualityConfig::default();
    let mut gov = QualityGovernor::from_config_with_clock(ManualClock::new(), &config).unwrap();
    assert_eq!(gov.settings().level, "high");
    assert_eq!(gov.mean_fps(), 90.0);

    for frame in 1..90 {
        assert!(gov.record_frame(Duration::from_millis(40)).is_none(), "frame {frame}");
    }
    let change = gov.record_frame(Duration::from_millis(40)).unwrap();
    assert_eq!(change.from, 2);
    assert_eq!(change.to, 1);
    assert!((change.mean_fps - 25.0).abs() < 1e-9);
}
