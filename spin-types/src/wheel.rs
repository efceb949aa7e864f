use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::SpinId;

/// One wedge of the wheel. Order in the segment list determines angular position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Segment {
    pub label: String,
    pub color: String, // "#rrggbb"
}

impl Segment {
    pub fn new(label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            color: color.into(),
        }
    }
}

/// What landing on a segment is worth
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Reward {
    pub is_win: bool,
    pub amount: f64,
    pub points: i32,
}

impl Reward {
    pub fn nothing() -> Self {
        Self {
            is_win: false,
            amount: 0.0,
            points: 0,
        }
    }

    pub fn points(points: i32) -> Self {
        Self {
            is_win: points > 0,
            amount: 0.0,
            points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SpinOutcome {
    pub spin_id: SpinId,
    pub segment_index: u32,
    pub label: String,
    pub is_win: bool,
    pub amount: f64,
    pub points: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ResultType {
    Win,
    Loss,
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Win => "win",
            ResultType::Loss => "loss",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "win" => Some(ResultType::Win),
            "loss" => Some(ResultType::Loss),
            _ => None,
        }
    }
}

impl From<&SpinOutcome> for ResultType {
    fn from(outcome: &SpinOutcome) -> Self {
        if outcome.is_win {
            ResultType::Win
        } else {
            ResultType::Loss
        }
    }
}
