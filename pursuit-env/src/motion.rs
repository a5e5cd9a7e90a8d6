//! Applying an action to the body of an agent.
use crate::{config::MotionConfig, physics::PhysicsWorld, AgentRole, PursuitAct};
use glam::{Quat, Vec3};

/// Turns actions into velocity, jumps and facing, identically for both agents.
#[derive(Debug, Clone)]
pub struct Locomotion {
    config: MotionConfig,
}

impl Locomotion {
    /// Constructs the locomotion of an agent.
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Applies `act` to the body of `role` for a tick of `dt` seconds.
    ///
    /// The horizontal velocity is replaced by the control signal times the speed while
    /// the vertical velocity is kept. A jump only happens when the ground probe below
    /// the body touches the ground.
    pub fn apply<W: PhysicsWorld>(&self, world: &mut W, role: AgentRole, act: &PursuitAct, dt: f32) {
        let c = &self.config;
        let control = Vec3::new(act.move_x, 0.0, act.move_z);

        let body = world.body_mut(role);
        body.velocity = Vec3::new(control.x * c.speed, body.velocity.y, control.z * c.speed);
        let probe = body.position - Vec3::Y * c.ground_probe_offset;

        if act.jump && world.check_ground_sphere(probe, c.ground_probe_radius) {
            world.add_impulse(role, Vec3::Y * c.jump_impulse);
        }

        if control.x != 0.0 || control.z != 0.0 {
            let body = world.body_mut(role);
            let t = (dt * c.turn_rate).clamp(0.0, 1.0);
            body.rotation = body.rotation.slerp(look_rotation(control), t);
        }
    }
}

/// Rotation that makes `+z` face the horizontal direction `dir`.
pub(crate) fn look_rotation(dir: Vec3) -> Quat {
    Quat::from_rotation_y(dir.x.atan2(dir.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ArenaConfig, KinematicWorld};

    fn setup() -> (KinematicWorld, Locomotion) {
        let mut world = KinematicWorld::build(&ArenaConfig::default()).unwrap();
        world.teleport(AgentRole::Chaser, Vec3::new(5.0, 0.5, -5.0));
        world.teleport(AgentRole::Runner, Vec3::new(15.0, 0.5, -5.0));
        (world, Locomotion::new(&MotionConfig::default()))
    }

    #[test]
    fn test_velocity_keeps_vertical_component() {
        let (mut world, loco) = setup();
        world.body_mut(AgentRole::Chaser).velocity = Vec3::new(0.0, -2.0, 0.0);
        loco.apply(&mut world, AgentRole::Chaser, &PursuitAct::new(1.0, -0.5, false), 0.02);
        assert_eq!(
            world.body(AgentRole::Chaser).velocity,
            Vec3::new(5.0, -2.0, -2.5)
        );
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let (mut world, loco) = setup();
        loco.apply(&mut world, AgentRole::Chaser, &PursuitAct::new(0.0, 0.0, true), 0.02);
        assert_eq!(world.body(AgentRole::Chaser).velocity.y, 5.0);

        world.body_mut(AgentRole::Runner).position.y = 2.0;
        loco.apply(&mut world, AgentRole::Runner, &PursuitAct::new(0.0, 0.0, true), 0.02);
        assert_eq!(world.body(AgentRole::Runner).velocity.y, 0.0);
    }

    #[test]
    fn test_facing_turns_toward_motion() {
        let (mut world, loco) = setup();
        let act = PursuitAct::new(1.0, 0.0, false);
        for _ in 0..100 {
            loco.apply(&mut world, AgentRole::Chaser, &act, 0.02);
        }
        let forward = world.body(AgentRole::Chaser).rotation * Vec3::Z;
        assert!((forward - Vec3::X).length() < 1e-3, "{:?}", forward);

        // No control signal, no turn.
        let before = world.body(AgentRole::Chaser).rotation;
        loco.apply(&mut world, AgentRole::Chaser, &PursuitAct::idle(), 0.02);
        assert_eq!(world.body(AgentRole::Chaser).rotation, before);
    }
}
