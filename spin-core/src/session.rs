use chrono::NaiveDate;
use rand::Rng;
use spin_types::{LocalTotals, SpinError, SpinOutcome};

use crate::allowance::{AllowanceTracker, DEFAULT_DAILY_CAP, today};
use crate::outcome::{SpinDraws, SpinPlan, pointer_index, resolve_spin};
use crate::reconcile::{load_local_totals, record_local_spin, save_local_totals};
use crate::rewards::RewardTable;
use crate::segments::SegmentConfig;
use crate::storage::KeyValueStore;

#[derive(Debug, Clone)]
pub struct GameSettings {
    pub daily_cap: u32,
    pub rewards: RewardTable,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            daily_cap: DEFAULT_DAILY_CAP,
            rewards: RewardTable::standard(),
        }
    }
}

/// Client-side game state for one player on one device.
///
/// Spins are strictly sequential: `begin_spin` hands out the plan to
/// animate and `finish_spin` resolves it. While a plan is in flight every
/// other spin attempt is refused.
pub struct GameSession<S: KeyValueStore> {
    store: S,
    allowance: AllowanceTracker,
    segments: SegmentConfig,
    rewards: RewardTable,
    in_flight: Option<SpinPlan>,
    rotation_turns: f64,
    local_totals: LocalTotals,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn new(store: S, settings: GameSettings) -> Self {
        Self::new_on(store, settings, today())
    }

    pub fn new_on(mut store: S, settings: GameSettings, today: NaiveDate) -> Self {
        let allowance = AllowanceTracker::load_on(&mut store, settings.daily_cap, today);
        let segments = SegmentConfig::load(&store);
        let local_totals = load_local_totals(&store);

        tracing::info!(
            "Game session ready: {} spins left, {} segments",
            allowance.spins_left(),
            segments.len()
        );

        Self {
            store,
            allowance,
            segments,
            rewards: settings.rewards,
            in_flight: None,
            rotation_turns: 0.0,
            local_totals,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The plan currently being animated, if any
    pub fn current_plan(&self) -> Option<&SpinPlan> {
        self.in_flight.as_ref()
    }

    pub fn spins_left(&mut self) -> u32 {
        self.allowance.get_spins_left(&mut self.store)
    }

    pub fn spins_left_on(&mut self, today: NaiveDate) -> u32 {
        self.allowance.spins_left_on(&mut self.store, today)
    }

    /// Whether the spin button should be enabled
    pub fn can_spin(&mut self) -> bool {
        !self.is_spinning() && self.spins_left() > 0
    }

    pub fn begin_spin<R: Rng>(&mut self, rng: &mut R) -> Result<SpinPlan, SpinError> {
        self.begin_spin_with(SpinDraws::random(rng), today())
    }

    pub fn begin_spin_with(
        &mut self,
        draws: SpinDraws,
        today: NaiveDate,
    ) -> Result<SpinPlan, SpinError> {
        if self.is_spinning() {
            return Err(SpinError::SpinInProgress);
        }
        if self.allowance.spins_left_on(&mut self.store, today) == 0 {
            return Err(SpinError::NoSpinsLeft);
        }

        let plan = SpinPlan::new(self.rotation_turns, draws);
        self.in_flight = Some(plan);
        Ok(plan)
    }

    /// Resolve the in-flight spin at its resting angle, spend one spin and
    /// record the result in the local totals.
    pub fn finish_spin(&mut self) -> Result<SpinOutcome, SpinError> {
        let plan = self.in_flight.take().ok_or(SpinError::NoSpinInProgress)?;
        self.rotation_turns = plan.final_turns().rem_euclid(1.0);

        let outcome = resolve_spin(self.segments.segments(), &self.rewards, &plan)?;
        let remaining = self.allowance.consume_spin(&mut self.store);

        record_local_spin(&mut self.local_totals, &outcome);
        if let Err(e) = save_local_totals(&mut self.store, &self.local_totals) {
            tracing::warn!("Failed to persist local stats: {}", e);
        }

        tracing::info!(
            "Spin {} landed on '{}' (win: {}), {} spins left",
            outcome.spin_id,
            outcome.label,
            outcome.is_win,
            remaining
        );

        Ok(outcome)
    }

    /// Segment under the pointer, `elapsed_ms` into the current spin or at
    /// rest when no spin is running
    pub fn segment_under_pointer(&self, elapsed_ms: f64) -> usize {
        let count = self.segments.len();
        match &self.in_flight {
            Some(plan) => plan.segment_at(elapsed_ms, count),
            None => pointer_index(self.rotation_turns, count),
        }
    }

    /// Resting angle of the wheel in turns
    pub fn rotation_turns(&self) -> f64 {
        self.rotation_turns
    }

    pub fn local_totals(&self) -> &LocalTotals {
        &self.local_totals
    }

    pub fn segments(&self) -> &SegmentConfig {
        &self.segments
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    /// Replace the wheel and persist it. Refused mid-spin, since the
    /// resting angle would then map onto a different wheel.
    pub fn save_segments(&mut self, segments: SegmentConfig) -> Result<(), SpinError> {
        if self.is_spinning() {
            return Err(SpinError::SpinInProgress);
        }

        if let Err(e) = segments.save(&mut self.store) {
            tracing::warn!("Failed to persist wheel segments: {}", e);
        }
        self.segments = segments;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
