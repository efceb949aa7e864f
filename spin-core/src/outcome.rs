use rand::Rng;
use spin_types::{Segment, SpinError, SpinOutcome};
use std::f64::consts::TAU;
use uuid::Uuid;

use crate::rewards::RewardTable;
use crate::segments::MIN_SEGMENTS;

pub const MIN_FULL_TURNS: f64 = 3.0;
pub const EXTRA_TURNS: f64 = 3.0;
pub const MIN_DURATION_MS: f64 = 3000.0;
pub const DURATION_SPREAD_MS: f64 = 3000.0;

/// The three uniform draws in `[0, 1)` that fully determine a spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinDraws {
    pub turns: f64,
    pub offset: f64,
    pub duration: f64,
}

impl SpinDraws {
    pub fn new(turns: f64, offset: f64, duration: f64) -> Self {
        Self {
            turns,
            offset,
            duration,
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            turns: rng.r#gen::<f64>(),
            offset: rng.r#gen::<f64>(),
            duration: rng.r#gen::<f64>(),
        }
    }
}

/// Cubic ease-out: fast start, settles into the final angle
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// One wheel spin from a resting angle to the next.
///
/// Angles are kept in turns (1.0 == 2π) so the resting position after a
/// whole number of revolutions is exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub start_turns: f64,
    pub delta_turns: f64,
    pub duration_ms: f64,
}

impl SpinPlan {
    pub fn new(start_turns: f64, draws: SpinDraws) -> Self {
        Self {
            start_turns,
            delta_turns: MIN_FULL_TURNS + draws.turns * EXTRA_TURNS + draws.offset,
            duration_ms: MIN_DURATION_MS + draws.duration * DURATION_SPREAD_MS,
        }
    }

    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, elapsed_ms: f64) -> bool {
        self.progress(elapsed_ms) >= 1.0
    }

    pub fn turns_at(&self, elapsed_ms: f64) -> f64 {
        if self.is_finished(elapsed_ms) {
            return self.final_turns();
        }
        self.start_turns + self.delta_turns * ease_out_cubic(self.progress(elapsed_ms))
    }

    /// Wheel rotation in radians, for drawing
    pub fn rotation_at(&self, elapsed_ms: f64) -> f64 {
        self.turns_at(elapsed_ms) * TAU
    }

    /// Resting angle once the animation completes
    pub fn final_turns(&self) -> f64 {
        self.start_turns + self.delta_turns
    }

    pub fn final_rotation(&self) -> f64 {
        self.final_turns() * TAU
    }

    /// Segment under the pointer `elapsed_ms` into the animation
    pub fn segment_at(&self, elapsed_ms: f64, segment_count: usize) -> usize {
        pointer_index(self.turns_at(elapsed_ms), segment_count)
    }

    /// Number of segment boundaries the pointer passes between two instants.
    ///
    /// The pointer index changes just after the rotation passes `k / n`
    /// turns, so the count is the number of such `k` in `[from, to)`.
    pub fn boundaries_crossed(&self, from_ms: f64, to_ms: f64, segment_count: usize) -> u64 {
        if segment_count == 0 {
            return 0;
        }

        let n = segment_count as f64;
        let from = (self.turns_at(from_ms) * n).ceil();
        let to = (self.turns_at(to_ms) * n).ceil();
        (to - from).abs() as u64
    }
}

/// Frame-to-frame watcher for the segment under the pointer, used to play
/// a tick whenever the wheel moves onto a new segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerTicker {
    last: Option<usize>,
}

impl PointerTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the segment at this frame; true when it differs from the
    /// previous frame's. The first frame never ticks.
    pub fn tick(&mut self, plan: &SpinPlan, elapsed_ms: f64, segment_count: usize) -> bool {
        let current = plan.segment_at(elapsed_ms, segment_count);
        let changed = self.last.is_some_and(|last| last != current);
        self.last = Some(current);
        changed
    }

    pub fn last_segment(&self) -> Option<usize> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Index of the segment under the top pointer when the wheel is rotated by
/// `turns`. Segment `i` is drawn over `[i·a − π/2, (i+1)·a − π/2)` with
/// `a = 2π / segment_count`, so at zero rotation segment 0 starts under the
/// pointer.
pub fn pointer_index(turns: f64, segment_count: usize) -> usize {
    if segment_count == 0 {
        return 0;
    }

    let residual = turns.rem_euclid(1.0);
    let under_pointer = (1.0 - residual).rem_euclid(1.0);
    (under_pointer * segment_count as f64).floor() as usize % segment_count
}

/// Resolve the winning segment for a completed spin plan
pub fn resolve_spin(
    segments: &[Segment],
    rewards: &RewardTable,
    plan: &SpinPlan,
) -> Result<SpinOutcome, SpinError> {
    if segments.len() < MIN_SEGMENTS {
        return Err(SpinError::NotEnoughSegments {
            count: segments.len() as u32,
        });
    }

    let index = pointer_index(plan.final_turns(), segments.len());
    let segment = &segments[index];
    let reward = rewards.reward_for(&segment.label);

    Ok(SpinOutcome {
        spin_id: Uuid::new_v4(),
        segment_index: index as u32,
        label: segment.label.clone(),
        is_win: reward.is_win,
        amount: reward.amount,
        points: reward.points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::default_segments;
    use proptest::prelude::*;

    fn wheel(n: usize) -> Vec<Segment> {
        (0..n)
            .map(|i| Segment::new(format!("S{}", i), "#000000"))
            .collect()
    }

    #[test]
    fn test_minimal_draws_land_on_first_segment() {
        for n in 2..=12 {
            let plan = SpinPlan::new(0.0, SpinDraws::new(0.0, 0.0, 0.0));
            let outcome = resolve_spin(&wheel(n), &RewardTable::new(), &plan).unwrap();
            assert_eq!(outcome.segment_index, 0, "segment count {}", n);
        }
    }

    #[test]
    fn test_plan_bounds() {
        let min = SpinPlan::new(0.0, SpinDraws::new(0.0, 0.0, 0.0));
        assert_eq!(min.delta_turns, 3.0);
        assert_eq!(min.duration_ms, 3000.0);

        let near_max = SpinPlan::new(0.0, SpinDraws::new(0.999, 0.999, 0.999));
        assert!(near_max.delta_turns < 7.0);
        assert!(near_max.duration_ms < 6000.0);
    }

    #[test]
    fn test_pointer_index_direction() {
        // A small clockwise rotation brings the last segment under the pointer
        assert_eq!(pointer_index(0.01, 8), 7);
        // Half a turn on an 8-segment wheel
        assert_eq!(pointer_index(0.5, 8), 4);
        // A quarter turn brings segment 6 round to the pointer
        assert_eq!(pointer_index(0.25, 8), 6);
        assert_eq!(pointer_index(-0.125, 8), 1);
    }

    #[test]
    fn test_resolution_uses_resting_angle() {
        let plan = SpinPlan::new(0.0, SpinDraws::new(0.0, 0.5, 0.5));
        let midway = pointer_index(plan.turns_at(plan.duration_ms / 2.0), 8);
        let resting = pointer_index(plan.turns_at(plan.duration_ms), 8);

        assert_eq!(plan.turns_at(plan.duration_ms), plan.final_turns());
        assert_eq!(resting, 4);
        assert_ne!(midway, resting);
    }

    #[test]
    fn test_rotation_accumulates_from_start() {
        let plan = SpinPlan::new(0.25, SpinDraws::new(0.0, 0.0, 0.0));
        assert_eq!(plan.final_turns(), 3.25);
        assert_eq!(pointer_index(plan.final_turns(), 8), 6);
    }

    #[test]
    fn test_no_boundaries_crossed_at_start() {
        let plan = SpinPlan::new(0.4, SpinDraws::new(0.7, 0.2, 0.1));
        for n in 2..=12 {
            assert_eq!(plan.boundaries_crossed(0.0, 0.0, n), 0);
            assert_eq!(plan.segment_at(0.0, n), pointer_index(0.4, n));
        }
        assert_eq!(plan.boundaries_crossed(0.0, plan.duration_ms, 0), 0);
    }

    #[test]
    fn test_minimal_spin_crosses_every_boundary_three_times() {
        let plan = SpinPlan::new(0.0, SpinDraws::new(0.0, 0.0, 0.0));
        for n in 2..=12 {
            assert_eq!(
                plan.boundaries_crossed(0.0, plan.duration_ms, n),
                3 * n as u64
            );
        }
    }

    #[test]
    fn test_ticker_follows_frames() {
        let plan = SpinPlan::new(0.0, SpinDraws::new(0.0, 0.0, 0.0));
        let mut ticker = PointerTicker::new();
        let mut ticks = 0;

        // 16ms frames until well past the end of the animation
        for frame in 0..=200 {
            let elapsed = frame as f64 * 16.0;
            let ticked = ticker.tick(&plan, elapsed, 8);
            if frame == 0 {
                assert!(!ticked);
            }
            if elapsed > plan.duration_ms {
                assert!(!ticked);
            }
            if ticked {
                ticks += 1;
            }
        }

        assert_eq!(ticks, 24);
        assert_eq!(ticker.last_segment(), Some(0));

        ticker.reset();
        assert_eq!(ticker.last_segment(), None);
    }

    #[test]
    fn test_ease_out_cubic() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(0.5), 0.875);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        assert_eq!(ease_out_cubic(-1.0), 0.0);
    }

    #[test]
    fn test_rewards_attached_to_outcome() {
        let plan = SpinPlan::new(0.0, SpinDraws::new(0.0, 0.0, 0.0));
        let outcome = resolve_spin(&default_segments(), &RewardTable::standard(), &plan).unwrap();

        assert_eq!(outcome.label, "10 Points");
        assert!(outcome.is_win);
        assert_eq!(outcome.points, 10);
    }

    #[test]
    fn test_rejects_short_wheels() {
        let plan = SpinPlan::new(0.0, SpinDraws::new(0.3, 0.3, 0.3));
        assert_eq!(
            resolve_spin(&wheel(1), &RewardTable::new(), &plan).unwrap_err(),
            SpinError::NotEnoughSegments { count: 1 }
        );
        assert!(resolve_spin(&[], &RewardTable::new(), &plan).is_err());
    }

    proptest! {
        #[test]
        fn winning_index_in_range(
            n in 2usize..=12,
            start in 0.0f64..1000.0,
            turns in 0.0f64..1.0,
            offset in 0.0f64..1.0,
        ) {
            let plan = SpinPlan::new(start, SpinDraws::new(turns, offset, 0.0));
            let outcome = resolve_spin(&wheel(n), &RewardTable::new(), &plan).unwrap();
            prop_assert!((outcome.segment_index as usize) < n);
        }

        #[test]
        fn full_spin_crosses_at_least_three_turns(
            n in 2usize..=12,
            start in 0.0f64..1.0,
            turns in 0.0f64..1.0,
            offset in 0.0f64..1.0,
            duration in 0.0f64..1.0,
            split in 0.0f64..1.0,
        ) {
            let plan = SpinPlan::new(start, SpinDraws::new(turns, offset, duration));
            let total = plan.boundaries_crossed(0.0, plan.duration_ms, n);
            prop_assert!(total >= 3 * n as u64);
            prop_assert!(total <= 7 * n as u64 + 1);

            let mid = plan.duration_ms * split;
            prop_assert_eq!(
                plan.boundaries_crossed(0.0, mid, n) + plan.boundaries_crossed(mid, plan.duration_ms, n),
                total
            );
        }

        #[test]
        fn resolution_is_deterministic(
            n in 2usize..=12,
            turns in 0.0f64..1.0,
            offset in 0.0f64..1.0,
        ) {
            let plan = SpinPlan::new(0.0, SpinDraws::new(turns, offset, 0.5));
            let first = resolve_spin(&wheel(n), &RewardTable::new(), &plan).unwrap();
            let second = resolve_spin(&wheel(n), &RewardTable::new(), &plan).unwrap();
            prop_assert_eq!(first.segment_index, second.segment_index);
        }
    }
}
