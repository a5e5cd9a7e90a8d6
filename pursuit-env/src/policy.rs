//! Policies driving the agents of [`PursuitEnv`].
//!
//! A policy for the whole environment is a [`PairPolicy`] of two [`AgentPolicy`]s,
//! one per agent. Besides the simple policies here, [`HeuristicPolicy`] maps a
//! [`ManualInput`] (two axes and a jump key) to actions for human testing.
use crate::{
    obs::AgentObs, physics::PhysicsWorld, AgentRole, PursuitAct, PursuitEnv, PursuitJointAct,
    PursuitObs,
};
use pursuit_core::{Configurable, Policy};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maps the observation of one agent to its action.
pub trait AgentPolicy {
    /// Chooses an action.
    fn act(&mut self, obs: &AgentObs) -> PursuitAct;
}

impl<P: AgentPolicy + ?Sized> AgentPolicy for Box<P> {
    fn act(&mut self, obs: &AgentObs) -> PursuitAct {
        (**self).act(obs)
    }
}

/// Never moves.
#[derive(Debug, Clone, Default)]
pub struct IdlePolicy;

impl AgentPolicy for IdlePolicy {
    fn act(&mut self, _obs: &AgentObs) -> PursuitAct {
        PursuitAct::idle()
    }
}

/// Configuration of [`RandomPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomPolicyConfig {
    /// Random seed.
    pub seed: u64,

    /// Probability of requesting a jump in a step.
    pub jump_probability: f32,
}

impl Default for RandomPolicyConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            jump_probability: 0.05,
        }
    }
}

/// Draws the control signals uniformly from `[-1, 1]`.
pub struct RandomPolicy {
    rng: fastrand::Rng,
    jump_probability: f32,
}

impl Configurable for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(config.seed),
            jump_probability: config.jump_probability,
        }
    }
}

impl AgentPolicy for RandomPolicy {
    fn act(&mut self, _obs: &AgentObs) -> PursuitAct {
        let x = 2.0 * self.rng.f32() - 1.0;
        let z = 2.0 * self.rng.f32() - 1.0;
        let jump = self.rng.f32() < self.jump_probability;
        PursuitAct::new(x, z, jump)
    }
}

/// Configuration of [`GreedyPolicy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreedyPolicyConfig {
    /// Role of the agent driven by the policy.
    pub role: AgentRole,
}

/// Runs straight at the opponent as the chaser, straight away from it as the runner.
///
/// Uses only the relative position in the observation.
pub struct GreedyPolicy {
    role: AgentRole,
}

impl GreedyPolicy {
    /// Constructs the policy for `role`.
    pub fn new(role: AgentRole) -> Self {
        Self { role }
    }
}

impl Configurable for GreedyPolicy {
    type Config = GreedyPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self::new(config.role)
    }
}

impl AgentPolicy for GreedyPolicy {
    fn act(&mut self, obs: &AgentObs) -> PursuitAct {
        let [x, _, z] = obs.relative_position();
        let norm = (x * x + z * z).sqrt();
        if norm == 0.0 {
            return PursuitAct::idle();
        }
        let sign = match self.role {
            AgentRole::Chaser => -1.0,
            AgentRole::Runner => 1.0,
        };
        PursuitAct::new(sign * x / norm, sign * z / norm, false)
    }
}

/// Source of manual control: two axes in `[-1, 1]` and the state of a jump key.
pub trait ManualInput {
    /// Horizontal axis, mapped to `move_x`.
    fn horizontal(&mut self) -> f32;

    /// Vertical axis, mapped to `move_z`.
    fn vertical(&mut self) -> f32;

    /// Whether the jump key is held.
    fn jump(&mut self) -> bool;

    /// Called once per decision step before the state is read.
    fn poll(&mut self) {}
}

/// Replays a fixed sequence of inputs, then stays idle.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<(f32, f32, bool)>,
    current: (f32, f32, bool),
}

impl ScriptedInput {
    /// Constructs the input from `(horizontal, vertical, jump)` frames.
    pub fn new(frames: impl IntoIterator<Item = (f32, f32, bool)>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            current: (0.0, 0.0, false),
        }
    }

    /// Number of frames not replayed yet.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl ManualInput for ScriptedInput {
    fn poll(&mut self) {
        self.current = self.frames.pop_front().unwrap_or((0.0, 0.0, false));
    }

    fn horizontal(&mut self) -> f32 {
        self.current.0
    }

    fn vertical(&mut self) -> f32 {
        self.current.1
    }

    fn jump(&mut self) -> bool {
        self.current.2
    }
}

/// Bypasses any trained policy and reads a [`ManualInput`].
pub struct HeuristicPolicy<I: ManualInput> {
    input: I,
}

impl<I: ManualInput> HeuristicPolicy<I> {
    /// Constructs the policy.
    pub fn new(input: I) -> Self {
        Self { input }
    }

    /// The underlying input.
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}

impl<I: ManualInput> AgentPolicy for HeuristicPolicy<I> {
    fn act(&mut self, _obs: &AgentObs) -> PursuitAct {
        self.input.poll();
        let continuous = [self.input.horizontal(), self.input.vertical()];
        let discrete = [self.input.jump() as i32];
        PursuitAct::from_buffers(&continuous, &discrete)
    }
}

/// Joins a policy for the chaser and one for the runner.
pub struct PairPolicy<C, R> {
    /// Policy of the chaser.
    pub chaser: C,

    /// Policy of the runner.
    pub runner: R,
}

impl<C: AgentPolicy, R: AgentPolicy> PairPolicy<C, R> {
    /// Constructs the joint policy.
    pub fn new(chaser: C, runner: R) -> Self {
        Self { chaser, runner }
    }

    /// Chooses the actions of both agents.
    pub fn act(&mut self, obs: &PursuitObs) -> PursuitJointAct {
        PursuitJointAct::new(self.chaser.act(&obs.chaser), self.runner.act(&obs.runner))
    }
}

impl<C, R, W> Policy<PursuitEnv<W>> for PairPolicy<C, R>
where
    C: AgentPolicy,
    R: AgentPolicy,
    W: PhysicsWorld,
{
    fn sample(&mut self, obs: &PursuitObs) -> PursuitJointAct {
        self.act(obs)
    }
}
