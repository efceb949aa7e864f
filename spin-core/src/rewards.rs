use spin_types::Reward;
use std::collections::HashMap;

/// Explicit label → reward mapping. Labels missing from the table land as a
/// loss worth nothing; the label text itself is never parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardTable {
    rewards: HashMap<String, Reward>,
}

impl RewardTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewards for the default wheel
    pub fn standard() -> Self {
        Self::new()
            .with_reward("5 Points", Reward::points(5))
            .with_reward("10 Points", Reward::points(10))
            .with_reward("25 Points", Reward::points(25))
            .with_reward("50 Points", Reward::points(50))
            .with_reward("75 Points", Reward::points(75))
            .with_reward("100 Points", Reward::points(100))
            .with_reward("200 Points", Reward::points(200))
            .with_reward("Empty", Reward::nothing())
    }

    pub fn with_reward(mut self, label: impl Into<String>, reward: Reward) -> Self {
        self.insert(label, reward);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, reward: Reward) {
        self.rewards.insert(label.into(), reward);
    }

    pub fn reward_for(&self, label: &str) -> Reward {
        self.rewards.get(label).cloned().unwrap_or_else(|| {
            tracing::debug!("No reward configured for segment '{}'", label);
            Reward::nothing()
        })
    }

    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }
}

impl FromIterator<(String, Reward)> for RewardTable {
    fn from_iter<I: IntoIterator<Item = (String, Reward)>>(iter: I) -> Self {
        Self {
            rewards: iter.into_iter().collect(),
        }
    }
}
