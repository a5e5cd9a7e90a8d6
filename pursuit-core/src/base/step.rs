//! Outcome of a decision step.
use super::Env;

/// Environment-specific data returned with every [`Step`].
pub trait Info {}

impl Info for () {}

/// What [`Env::step`] returns: the applied action, the next observation, and the
/// rewards and end-of-episode flags of every agent.
///
/// `reward`, `is_terminated` and `is_truncated` hold one entry per agent. A flag is
/// `1` when set.
pub struct Step<E: Env> {
    /// The applied action.
    pub act: E::Act,

    /// Observation after the step.
    pub obs: E::Obs,

    /// Reward of each agent.
    pub reward: Vec<f32>,

    /// The episode reached a terminal state.
    pub is_terminated: Vec<i8>,

    /// The episode was cut short, e.g. by a step limit.
    pub is_truncated: Vec<i8>,

    /// Environment-specific information.
    pub info: E::Info,

    /// Initial observation of the next episode.
    ///
    /// Set by [`Env::step_with_reset`] when the episode ended in this step.
    pub init_obs: Option<E::Obs>,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: Vec<f32>,
        is_terminated: Vec<i8>,
        is_truncated: Vec<i8>,
        info: E::Info,
        init_obs: Option<E::Obs>,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
            init_obs,
        }
    }

    #[inline]
    /// Terminated or truncated, for any agent.
    pub fn is_done(&self) -> bool {
        self.is_terminated.iter().any(|&t| t == 1) || self.is_truncated.iter().any(|&t| t == 1)
    }

    #[inline]
    /// Terminated, for any agent.
    pub fn is_terminal(&self) -> bool {
        self.is_terminated.iter().any(|&t| t == 1)
    }
}
