use rand::Rng;
use regex::Regex;
use spin_types::{Segment, SpinError};
use std::sync::LazyLock;

use crate::storage::{KeyValueStore, SEGMENTS_KEY};

pub const MIN_SEGMENTS: usize = 2;
pub const MAX_SEGMENTS: usize = 12;
pub const NEW_SEGMENT_LABEL: &str = "New";

const DARK_TEXT: &str = "#1a1a24";
const LIGHT_TEXT: &str = "#ffffff";

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("static regex"));

pub fn default_segments() -> Vec<Segment> {
    vec![
        Segment::new("10 Points", "#FF6B6B"),
        Segment::new("25 Points", "#4ECDC4"),
        Segment::new("50 Points", "#FFE66D"),
        Segment::new("100 Points", "#95E1D3"),
        Segment::new("Empty", "#DFE6E9"),
        Segment::new("75 Points", "#A8E6CF"),
        Segment::new("200 Points", "#FF8B94"),
        Segment::new("5 Points", "#B8B5FF"),
    ]
}

pub fn is_valid_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}

/// Text colour that stays readable on top of `background`
pub fn contrast_color(background: &str) -> &'static str {
    if !is_valid_color(background) {
        return LIGHT_TEXT;
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&background[range], 16).unwrap_or(0) as f64
    };
    let luminance = (0.299 * channel(1..3) + 0.587 * channel(3..5) + 0.114 * channel(5..7)) / 255.0;

    if luminance > 0.5 { DARK_TEXT } else { LIGHT_TEXT }
}

/// The ordered wheel segments. Always holds between 2 and 12 entries.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConfig {
    segments: Vec<Segment>,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
        }
    }
}

impl SegmentConfig {
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self, SpinError> {
        check_count(segments.len())?;
        if let Some(bad) = segments.iter().find(|s| !is_valid_color(&s.color)) {
            return Err(SpinError::InvalidColor {
                color: bad.color.clone(),
            });
        }

        Ok(Self { segments })
    }

    /// Read `wheelSegments`, falling back to the default wheel when the
    /// value is missing, unparsable or violates the segment bounds.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        let Some(raw) = store.get(SEGMENTS_KEY) else {
            return Self::default();
        };

        let parsed = serde_json::from_str::<Vec<Segment>>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|segments| Self::from_segments(segments).map_err(|e| e.to_string()));

        match parsed {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Using default wheel, stored segments rejected: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> anyhow::Result<()> {
        store.set(SEGMENTS_KEY, serde_json::to_string(&self.segments)?)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Append a "New" segment with a random colour
    pub fn add_segment<R: Rng>(&mut self, rng: &mut R) -> Result<&Segment, SpinError> {
        check_count(self.segments.len() + 1)?;

        let color = format!("#{:06x}", rng.gen_range(0..0xFF_FFFFu32));
        self.segments.push(Segment::new(NEW_SEGMENT_LABEL, color));
        Ok(&self.segments[self.segments.len() - 1])
    }

    pub fn remove_segment(&mut self, index: usize) -> Result<Segment, SpinError> {
        self.check_index(index)?;
        check_count(self.segments.len() - 1)?;
        Ok(self.segments.remove(index))
    }

    pub fn set_label(&mut self, index: usize, label: impl Into<String>) -> Result<(), SpinError> {
        self.check_index(index)?;
        self.segments[index].label = label.into();
        Ok(())
    }

    pub fn set_color(&mut self, index: usize, color: impl Into<String>) -> Result<(), SpinError> {
        self.check_index(index)?;
        let color = color.into();
        if !is_valid_color(&color) {
            return Err(SpinError::InvalidColor { color });
        }
        self.segments[index].color = color;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), SpinError> {
        if index >= self.segments.len() {
            return Err(SpinError::SegmentNotFound {
                index: index as u32,
            });
        }
        Ok(())
    }
}

fn check_count(count: usize) -> Result<(), SpinError> {
    if count < MIN_SEGMENTS {
        return Err(SpinError::NotEnoughSegments {
            count: count as u32,
        });
    }
    if count > MAX_SEGMENTS {
        return Err(SpinError::TooManySegments {
            count: count as u32,
        });
    }
    Ok(())
}
