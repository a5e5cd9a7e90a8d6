//! Observations of [`PursuitEnv`](crate::PursuitEnv).
use crate::{
    coordinator::EpisodeCoordinator, perception::RayPerception, physics::PhysicsWorld, AgentRole,
};
use pursuit_core::Obs;

/// Observation vector of a single agent.
///
/// The layout is `[relative_position(3), own_velocity(3), opponent_velocity(3),
/// ray_perception(k), time_remaining(1)]`. The relative position is the position of
/// the agent minus the position of its opponent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentObs(Vec<f32>);

impl AgentObs {
    /// Number of values besides the ray perception.
    pub const BASE_WIDTH: usize = 10;

    /// Width of the observation for a ray perception of `k` values.
    pub fn width(k: usize) -> usize {
        Self::BASE_WIDTH + k
    }

    /// Assembles the observation of `role` from the current state.
    pub fn collect<W: PhysicsWorld>(
        role: AgentRole,
        world: &W,
        perception: &RayPerception,
        coordinator: &EpisodeCoordinator,
    ) -> Self {
        let own = world.body(role);
        let opponent = world.body(role.opponent());
        let mut v = Vec::with_capacity(Self::width(perception.width()));

        v.extend_from_slice(&(own.position - opponent.position).to_array());
        v.extend_from_slice(&own.velocity.to_array());
        v.extend_from_slice(&opponent.velocity.to_array());
        v.extend(perception.observe(world, role));
        v.push(coordinator.time_remaining());

        Self(v)
    }

    /// Position relative to the opponent.
    pub fn relative_position(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Velocity of the agent.
    pub fn own_velocity(&self) -> [f32; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    /// Velocity of the opponent.
    pub fn opponent_velocity(&self) -> [f32; 3] {
        [self.0[6], self.0[7], self.0[8]]
    }

    /// Values of the ray perception.
    pub fn ray_perception(&self) -> &[f32] {
        &self.0[9..self.0.len() - 1]
    }

    /// Remaining time of the episode.
    pub fn time_remaining(&self) -> f32 {
        self.0[self.0.len() - 1]
    }

    /// The whole vector.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector holds no values.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for AgentObs {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

impl From<AgentObs> for Vec<f32> {
    fn from(obs: AgentObs) -> Self {
        obs.0
    }
}

/// Observations of both agents.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitObs {
    /// Observation of the chaser.
    pub chaser: AgentObs,

    /// Observation of the runner.
    pub runner: AgentObs,
}

impl PursuitObs {
    /// Observation of the agent with the given role.
    pub fn of(&self, role: AgentRole) -> &AgentObs {
        match role {
            AgentRole::Chaser => &self.chaser,
            AgentRole::Runner => &self.runner,
        }
    }
}

impl Obs for PursuitObs {
    fn len(&self) -> usize {
        2
    }
}
