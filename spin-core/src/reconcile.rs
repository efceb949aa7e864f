//! Two distinct ways of moving totals into the remote record:
//! a one-time max-merge of device totals, and a per-spin additive increment.

use spin_types::{LocalTotals, SpinOutcome, UserIdentity, UserStats};

use crate::storage::{KeyValueStore, LOCAL_STATS_KEY};

/// Fold device totals into the remote record, counter by counter, keeping
/// the larger value. Never sums, so running it again is a no-op.
pub fn merge_local_into_remote(
    identity: &UserIdentity,
    local: &LocalTotals,
    remote: Option<&UserStats>,
) -> UserStats {
    let Some(remote) = remote else {
        return UserStats {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            avatar_url: identity.avatar_url.clone(),
            total_spins: local.total_spins,
            total_wins: local.total_wins,
            total_usdc: local.total_winnings,
            total_points: local.total_points,
        };
    };

    UserStats {
        user_id: remote.user_id.clone(),
        username: prefer_non_empty(&identity.username, &remote.username),
        avatar_url: prefer_non_empty(&identity.avatar_url, &remote.avatar_url),
        total_spins: remote.total_spins.max(local.total_spins),
        total_wins: remote.total_wins.max(local.total_wins),
        total_usdc: remote.total_usdc.max(local.total_winnings),
        total_points: remote.total_points.max(local.total_points),
    }
}

/// Add exactly one resolved spin to a record
pub fn apply_increment(remote: &UserStats, outcome: &SpinOutcome) -> UserStats {
    UserStats {
        total_spins: remote.total_spins + 1,
        total_wins: remote.total_wins + i32::from(outcome.is_win),
        total_usdc: remote.total_usdc + outcome.amount,
        total_points: remote.total_points + outcome.points,
        ..remote.clone()
    }
}

/// Same increment rules, applied to the device totals
pub fn record_local_spin(totals: &mut LocalTotals, outcome: &SpinOutcome) {
    totals.total_spins += 1;
    totals.total_wins += i32::from(outcome.is_win);
    totals.total_winnings += outcome.amount;
    totals.total_points += outcome.points;
}

pub fn load_local_totals<S: KeyValueStore>(store: &S) -> LocalTotals {
    store
        .get(LOCAL_STATS_KEY)
        .and_then(|raw| match serde_json::from_str(&raw) {
            Ok(totals) => Some(totals),
            Err(e) => {
                tracing::warn!("Ignoring corrupt local stats: {}", e);
                None
            }
        })
        .unwrap_or_default()
}

pub fn save_local_totals<S: KeyValueStore>(
    store: &mut S,
    totals: &LocalTotals,
) -> anyhow::Result<()> {
    store.set(LOCAL_STATS_KEY, serde_json::to_string(totals)?)
}

fn prefer_non_empty(preferred: &str, fallback: &str) -> String {
    if preferred.is_empty() {
        fallback.to_string()
    } else {
        preferred.to_string()
    }
}
