//! Interface to the physics simulation.
//!
//! The environment does not integrate rigid bodies itself. It reads and writes the
//! state of the two bodies through [`PhysicsWorld`], asks it to advance by one tick,
//! and consumes the contact events produced during that tick.
//! [`KinematicWorld`] is a minimal implementation used by default.
use crate::{config::ArenaConfig, AgentRole};
use anyhow::Result;
use glam::{Quat, Vec3};
mod kinematic;
pub use kinematic::KinematicWorld;

/// Position, velocity and facing of a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Position of the center of the body.
    pub position: Vec3,

    /// Linear velocity.
    pub velocity: Vec3,

    /// Facing. The identity faces `+z`.
    pub rotation: Quat,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Anything a body or a ray can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collider {
    /// The body of an agent.
    Agent(AgentRole),

    /// A wall of the arena.
    Wall,
}

/// A contact that started during the last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// The body receiving the event.
    pub body: AgentRole,

    /// What it touched.
    pub other: Collider,
}

impl Contact {
    /// Constructs a contact event.
    pub fn new(body: AgentRole, other: Collider) -> Self {
        Self { body, other }
    }
}

/// The closest hit of a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// What the ray hit.
    pub collider: Collider,

    /// Distance from the origin of the ray.
    pub distance: f32,
}

/// Physics collaborator of [`PursuitEnv`](crate::PursuitEnv).
pub trait PhysicsWorld {
    /// Builds the world.
    fn build(config: &ArenaConfig) -> Result<Self>
    where
        Self: Sized;

    /// State of the body of an agent.
    fn body(&self, role: AgentRole) -> &BodyState;

    /// Mutable state of the body of an agent.
    fn body_mut(&mut self, role: AgentRole) -> &mut BodyState;

    /// Applies an instantaneous impulse to a body.
    fn add_impulse(&mut self, role: AgentRole, impulse: Vec3);

    /// Returns `true` if a sphere at `center` overlaps the ground.
    fn check_ground_sphere(&self, center: Vec3, radius: f32) -> bool;

    /// Casts a ray and returns the closest hit within `max_distance`.
    ///
    /// The body of `ignore` is transparent to the ray.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: AgentRole,
    ) -> Option<RayHit>;

    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Takes the contact events produced since the last call.
    fn drain_contacts(&mut self) -> Vec<Contact>;

    /// Euclidean distance between the centers of the two bodies.
    fn distance(&self) -> f32 {
        self.body(AgentRole::Chaser)
            .position
            .distance(self.body(AgentRole::Runner).position)
    }

    /// Places a body at `position` at rest, facing `+z` like the spawn anchors.
    fn teleport(&mut self, role: AgentRole, position: Vec3) {
        let body = self.body_mut(role);
        body.position = position;
        body.velocity = Vec3::ZERO;
        body.rotation = Quat::IDENTITY;
    }
}
