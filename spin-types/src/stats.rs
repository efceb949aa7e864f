use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{ResultType, SpinId, UserId};

/// Running totals kept on the device, authoritative while offline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct LocalTotals {
    pub total_spins: i32,
    pub total_wins: i32,
    pub total_winnings: f64,
    pub total_points: i32,
}

/// Who the stats belong to, as reported by the host frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserIdentity {
    pub user_id: UserId,
    pub username: String,
    pub avatar_url: String,
}

impl UserIdentity {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}

/// Remote per-user aggregate, one row per user id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserStats {
    pub user_id: UserId,
    pub username: String,
    pub avatar_url: String,
    pub total_spins: i32,
    pub total_wins: i32,
    pub total_usdc: f64,
    pub total_points: i32,
}

impl UserStats {
    pub fn empty(identity: &UserIdentity) -> Self {
        Self {
            user_id: identity.user_id.clone(),
            username: identity.username.clone(),
            avatar_url: identity.avatar_url.clone(),
            total_spins: 0,
            total_wins: 0,
            total_usdc: 0.0,
            total_points: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpinHistoryEntry {
    pub spin_id: SpinId,
    pub user_id: UserId,
    pub result_type: ResultType,
    pub amount: f64,
    pub segment_name: String,
    pub points_earned: i32,
    pub created_at: String, // ISO 8601 string
}
