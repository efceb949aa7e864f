use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SpinError {
    NoSpinsLeft,
    SpinInProgress,
    NoSpinInProgress,
    NotEnoughSegments { count: u32 },
    TooManySegments { count: u32 },
    SegmentNotFound { index: u32 },
    InvalidColor { color: String },
}

impl std::fmt::Display for SpinError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpinError::NoSpinsLeft => write!(f, "No spins left today"),
            SpinError::SpinInProgress => write!(f, "A spin is already in progress"),
            SpinError::NoSpinInProgress => write!(f, "No spin in progress"),
            SpinError::NotEnoughSegments { count } => {
                write!(f, "Wheel needs at least 2 segments, got {}", count)
            }
            SpinError::TooManySegments { count } => {
                write!(f, "Wheel allows at most 12 segments, got {}", count)
            }
            SpinError::SegmentNotFound { index } => write!(f, "Segment {} not found", index),
            SpinError::InvalidColor { color } => write!(f, "Invalid segment color: {}", color),
        }
    }
}

impl std::error::Error for SpinError {}
