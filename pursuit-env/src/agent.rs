//! Identity and reward bookkeeping shared by both agents.
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two participants of the pursuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentRole {
    /// The pursuer.
    Chaser,

    /// The evader.
    Runner,
}

impl AgentRole {
    /// Both roles, in the order used for per-agent vectors in [`Step`](pursuit_core::Step).
    pub const ALL: [AgentRole; 2] = [AgentRole::Chaser, AgentRole::Runner];

    /// Index of the role in per-agent vectors.
    pub fn index(self) -> usize {
        match self {
            AgentRole::Chaser => 0,
            AgentRole::Runner => 1,
        }
    }

    /// The other participant.
    pub fn opponent(self) -> Self {
        match self {
            AgentRole::Chaser => AgentRole::Runner,
            AgentRole::Runner => AgentRole::Chaser,
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AgentRole::Chaser => write!(f, "Chaser"),
            AgentRole::Runner => write!(f, "Runner"),
        }
    }
}

/// Reward of the current decision step and of the whole episode.
///
/// `set` replaces the reward of the current step, so a terminal reward overrides
/// the shaping reward computed earlier in the same step.
#[derive(Debug, Clone, Default)]
pub(crate) struct RewardState {
    step: f32,
    cumulative: f32,
    episode_ended: bool,
}

impl RewardState {
    pub(crate) fn set(&mut self, reward: f32) {
        self.step = reward;
    }

    /// Returns the reward of the step and folds it into the episode return.
    pub(crate) fn take(&mut self) -> f32 {
        let r = self.step;
        self.cumulative += r;
        self.step = 0.0;
        r
    }

    /// Episode return including the pending step reward.
    pub(crate) fn cumulative(&self) -> f32 {
        self.cumulative + self.step
    }

    pub(crate) fn end_episode(&mut self) {
        self.episode_ended = true;
    }

    pub(crate) fn episode_ended(&self) -> bool {
        self.episode_ended
    }

    pub(crate) fn begin_episode(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overrides_and_take_accumulates() {
        let mut r = RewardState::default();
        r.set(1.5);
        r.set(-100.0);
        assert_eq!(r.cumulative(), -100.0);
        assert_eq!(r.take(), -100.0);
        r.set(2.0);
        assert_eq!(r.take(), 2.0);
        assert_eq!(r.cumulative(), -98.0);
        assert_eq!(r.take(), 0.0);
    }

    #[test]
    fn test_roles() {
        assert_eq!(AgentRole::Chaser.opponent(), AgentRole::Runner);
        assert_eq!(AgentRole::Runner.index(), 1);
        assert_eq!(AgentRole::Chaser.to_string(), "Chaser");
    }
}
