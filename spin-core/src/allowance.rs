use chrono::{Local, NaiveDate};

use crate::storage::{KeyValueStore, SPIN_DATE_KEY, SPINS_LEFT_KEY};

pub const DEFAULT_DAILY_CAP: u32 = 5;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Today's calendar day in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Tracks how many spins remain in the current calendar day.
///
/// The persisted pair (`spinDate`, `spinsLeft`) is the durable state; the
/// tracker keeps an in-memory copy that is written back on every change.
/// Read failures never surface: a missing or corrupt count reads as zero.
#[derive(Debug, Clone)]
pub struct AllowanceTracker {
    daily_cap: u32,
    date: Option<NaiveDate>,
    spins_left: u32,
}

impl AllowanceTracker {
    pub fn new(daily_cap: u32) -> Self {
        Self {
            daily_cap,
            date: None,
            spins_left: 0,
        }
    }

    /// Create a tracker and read the persisted allowance for today
    pub fn load<S: KeyValueStore>(store: &mut S, daily_cap: u32) -> Self {
        Self::load_on(store, daily_cap, today())
    }

    pub fn load_on<S: KeyValueStore>(store: &mut S, daily_cap: u32, today: NaiveDate) -> Self {
        let mut tracker = Self::new(daily_cap);
        tracker.spins_left_on(store, today);
        tracker
    }

    pub fn daily_cap(&self) -> u32 {
        self.daily_cap
    }

    /// The in-memory count as of the last read or consume
    pub fn spins_left(&self) -> u32 {
        self.spins_left
    }

    pub fn can_spin(&self) -> bool {
        self.spins_left > 0
    }

    pub fn get_spins_left<S: KeyValueStore>(&mut self, store: &mut S) -> u32 {
        self.spins_left_on(store, today())
    }

    /// Re-read the persisted allowance as of `today`, resetting it to the
    /// daily cap when the stored date belongs to another day.
    pub fn spins_left_on<S: KeyValueStore>(&mut self, store: &mut S, today: NaiveDate) -> u32 {
        let today_key = today.format(DATE_FORMAT).to_string();
        self.date = Some(today);

        if store.get(SPIN_DATE_KEY).as_deref() != Some(today_key.as_str()) {
            self.spins_left = self.daily_cap;
            persist(store, SPIN_DATE_KEY, today_key);
            persist(store, SPINS_LEFT_KEY, self.spins_left.to_string());
            return self.spins_left;
        }

        // Only whole non-negative numbers parse; "2.5" reads as 0, not 2
        self.spins_left = store
            .get(SPINS_LEFT_KEY)
            .and_then(|saved| saved.trim().parse::<u32>().ok())
            .unwrap_or(0)
            .min(self.daily_cap);
        self.spins_left
    }

    /// Spend one spin, floored at zero, and persist the new count
    pub fn consume_spin<S: KeyValueStore>(&mut self, store: &mut S) -> u32 {
        self.spins_left = self.spins_left.saturating_sub(1);
        persist(store, SPINS_LEFT_KEY, self.spins_left.to_string());

        if self.spins_left == 0 {
            tracing::debug!("Daily spin allowance exhausted for {:?}", self.date);
        }

        self.spins_left
    }
}

fn persist<S: KeyValueStore>(store: &mut S, key: &str, value: String) {
    if let Err(e) = store.set(key, value) {
        tracing::warn!("Failed to persist {}: {}", key, e);
    }
}
