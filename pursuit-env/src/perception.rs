//! Ranged perception with a fan of horizontal rays.
use crate::{
    config::RayPerceptionConfig,
    physics::{Collider, PhysicsWorld},
    AgentRole,
};
use glam::{Quat, Vec3};

/// Number of values each ray contributes to an observation:
/// a one-hot tag (wall, opponent), a no-hit flag and the hit fraction.
pub const VALUES_PER_RAY: usize = 4;

/// Casts a fan of rays around the facing of an agent.
///
/// The center ray comes first, followed by pairs of rays at increasing angles on
/// alternating sides. For each ray the observation holds `[wall, opponent, no_hit,
/// fraction]`, where `fraction` is the hit distance divided by the ray length, or 1
/// when nothing was hit.
#[derive(Debug, Clone)]
pub struct RayPerception {
    ray_length: f32,
    angles: Vec<f32>,
}

impl RayPerception {
    /// Constructs the fan from its configuration.
    pub fn new(config: &RayPerceptionConfig) -> Self {
        let n = config.rays_per_direction;
        let delta = if n > 0 {
            config.max_ray_degrees.to_radians() / n as f32
        } else {
            0.0
        };
        let mut angles = vec![0.0];
        for i in 1..=n {
            angles.push(-delta * i as f32);
            angles.push(delta * i as f32);
        }

        Self {
            ray_length: config.ray_length,
            angles,
        }
    }

    /// Number of rays in the fan.
    pub fn n_rays(&self) -> usize {
        self.angles.len()
    }

    /// Number of values appended to an observation.
    pub fn width(&self) -> usize {
        self.n_rays() * VALUES_PER_RAY
    }

    /// Casts the rays from the body of `role`.
    pub fn observe<W: PhysicsWorld>(&self, world: &W, role: AgentRole) -> Vec<f32> {
        let body = world.body(role);
        let mut values = Vec::with_capacity(self.width());

        for &angle in self.angles.iter() {
            let dir = body.rotation * Quat::from_rotation_y(angle) * Vec3::Z;
            let dir = Vec3::new(dir.x, 0.0, dir.z);
            match world.raycast(body.position, dir, self.ray_length, role) {
                Some(hit) => {
                    let (wall, opponent) = match hit.collider {
                        Collider::Wall => (1.0, 0.0),
                        Collider::Agent(_) => (0.0, 1.0),
                    };
                    values.extend_from_slice(&[wall, opponent, 0.0, hit.distance / self.ray_length]);
                }
                None => values.extend_from_slice(&[0.0, 0.0, 1.0, 1.0]),
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ArenaConfig, KinematicWorld};

    #[test]
    fn test_width_and_center_ray() {
        let config = RayPerceptionConfig::default();
        let perception = RayPerception::new(&config);
        assert_eq!(perception.n_rays(), 7);
        assert_eq!(perception.width(), 28);

        let mut world = KinematicWorld::build(&ArenaConfig::default()).unwrap();
        world.teleport(AgentRole::Runner, Vec3::new(10.0, 0.5, -8.0));
        world.teleport(AgentRole::Chaser, Vec3::new(10.0, 0.5, -4.0));

        // The runner faces +z, toward the chaser 4 units away.
        let values = perception.observe(&world, AgentRole::Runner);
        assert_eq!(values.len(), 28);
        assert_eq!(&values[..3], &[0.0, 1.0, 0.0]);
        assert!((values[3] - 3.5 / 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_short_rays_see_nothing() {
        let config = RayPerceptionConfig {
            rays_per_direction: 0,
            max_ray_degrees: 0.0,
            ray_length: 1.0,
        };
        let perception = RayPerception::new(&config);
        let mut world = KinematicWorld::build(&ArenaConfig::default()).unwrap();
        world.teleport(AgentRole::Runner, Vec3::new(10.0, 0.5, -8.0));
        world.teleport(AgentRole::Chaser, Vec3::new(2.0, 0.5, -4.0));

        assert_eq!(
            perception.observe(&world, AgentRole::Runner),
            vec![0.0, 0.0, 1.0, 1.0]
        );
    }
}
