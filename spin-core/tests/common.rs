#![allow(dead_code)]

use chrono::NaiveDate;
use spin_core::{GameSession, GameSettings, MemoryStore, SegmentConfig, SpinDraws};
use spin_types::{Segment, SpinOutcome};

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

/// Draws that stop the wheel exactly `extra` turns past three full revolutions
pub fn draws_with_offset(extra: f64) -> SpinDraws {
    SpinDraws::new(0.0, extra, 0.0)
}

/// Creates a wheel with `n` plainly labelled segments
pub fn create_test_wheel(n: usize) -> SegmentConfig {
    let segments = (0..n)
        .map(|i| Segment::new(format!("Slot {}", i), "#4ECDC4"))
        .collect();
    SegmentConfig::from_segments(segments).unwrap()
}

/// Creates a session on an empty store as of `today`
pub fn create_test_session(today: NaiveDate) -> GameSession<MemoryStore> {
    GameSession::new_on(MemoryStore::new(), GameSettings::default(), today)
}

/// Runs one full spin and returns its outcome
pub fn spin_once(
    session: &mut GameSession<MemoryStore>,
    draws: SpinDraws,
    today: NaiveDate,
) -> SpinOutcome {
    session.begin_spin_with(draws, today).unwrap();
    session.finish_spin().unwrap()
}
