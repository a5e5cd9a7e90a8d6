//! A minimal physics world: two spheres on a flat ground inside four walls.
use super::{BodyState, Collider, Contact, PhysicsWorld, RayHit};
use crate::{config::ArenaConfig, AgentRole};
use anyhow::Result;
use glam::Vec3;
use log::trace;

/// Integrates the two bodies with explicit Euler steps.
///
/// Bodies fall under gravity, rest on the ground plane `y = 0` and are stopped by
/// the walls. A contact event is emitted when two bodies start to overlap or a body
/// starts to touch a wall, as an on-enter collision callback would.
pub struct KinematicWorld {
    config: ArenaConfig,
    bodies: [BodyState; 2],
    touching_wall: [bool; 2],
    touching_agents: bool,
    contacts: Vec<Contact>,
}

impl KinematicWorld {
    /// Queues a contact event as if it had been detected in the last tick.
    ///
    /// This is meant for harnesses that drive contacts from outside, and for tests.
    pub fn push_contact(&mut self, contact: Contact) {
        self.contacts.push(contact);
    }

    /// Arena of the world.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    fn integrate(&mut self, i: usize, dt: f32) -> bool {
        let c = &self.config;
        let r = c.body_radius;
        let b = &mut self.bodies[i];

        b.velocity.y -= c.gravity * dt;
        b.position += b.velocity * dt;

        if b.position.y < r {
            b.position.y = r;
            b.velocity.y = b.velocity.y.max(0.0);
        }

        let mut touching = false;
        if b.position.x < c.min_x + r {
            b.position.x = c.min_x + r;
            b.velocity.x = b.velocity.x.max(0.0);
            touching = true;
        } else if b.position.x > c.max_x - r {
            b.position.x = c.max_x - r;
            b.velocity.x = b.velocity.x.min(0.0);
            touching = true;
        }
        if b.position.z < c.min_z + r {
            b.position.z = c.min_z + r;
            b.velocity.z = b.velocity.z.max(0.0);
            touching = true;
        } else if b.position.z > c.max_z - r {
            b.position.z = c.max_z - r;
            b.velocity.z = b.velocity.z.min(0.0);
            touching = true;
        }
        touching
    }

    fn wall_distance(&self, origin: Vec3, dir: Vec3) -> f32 {
        let c = &self.config;
        let tx = if dir.x > 0.0 {
            (c.max_x - origin.x) / dir.x
        } else if dir.x < 0.0 {
            (c.min_x - origin.x) / dir.x
        } else {
            f32::INFINITY
        };
        let tz = if dir.z > 0.0 {
            (c.max_z - origin.z) / dir.z
        } else if dir.z < 0.0 {
            (c.min_z - origin.z) / dir.z
        } else {
            f32::INFINITY
        };
        tx.min(tz).max(0.0)
    }

    fn sphere_distance(&self, origin: Vec3, dir: Vec3, center: Vec3) -> Option<f32> {
        let r = self.config.body_radius;
        let oc = origin - center;
        let b = oc.dot(dir);
        let c = oc.length_squared() - r * r;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sq = disc.sqrt();
        let t = if -b - sq >= 0.0 { -b - sq } else { -b + sq };
        if t >= 0.0 {
            Some(t)
        } else {
            None
        }
    }
}

impl PhysicsWorld for KinematicWorld {
    fn build(config: &ArenaConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            bodies: [BodyState::default(); 2],
            touching_wall: [false; 2],
            touching_agents: false,
            contacts: vec![],
        })
    }

    fn body(&self, role: AgentRole) -> &BodyState {
        &self.bodies[role.index()]
    }

    fn body_mut(&mut self, role: AgentRole) -> &mut BodyState {
        &mut self.bodies[role.index()]
    }

    fn add_impulse(&mut self, role: AgentRole, impulse: Vec3) {
        let mass = self.config.body_mass;
        self.bodies[role.index()].velocity += impulse / mass;
    }

    fn check_ground_sphere(&self, center: Vec3, radius: f32) -> bool {
        center.y - radius <= 0.0
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        ignore: AgentRole,
    ) -> Option<RayHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }

        let mut best = RayHit {
            collider: Collider::Wall,
            distance: self.wall_distance(origin, dir),
        };
        for role in AgentRole::ALL {
            if role == ignore {
                continue;
            }
            if let Some(t) = self.sphere_distance(origin, dir, self.body(role).position) {
                if t < best.distance {
                    best = RayHit {
                        collider: Collider::Agent(role),
                        distance: t,
                    };
                }
            }
        }

        if best.distance <= max_distance {
            Some(best)
        } else {
            None
        }
    }

    fn step(&mut self, dt: f32) {
        for role in AgentRole::ALL {
            let i = role.index();
            let touching = self.integrate(i, dt);
            if touching && !self.touching_wall[i] {
                self.contacts.push(Contact::new(role, Collider::Wall));
            }
            self.touching_wall[i] = touching;
        }

        let touching = self.distance() <= 2.0 * self.config.body_radius;
        if touching && !self.touching_agents {
            trace!("Bodies started to overlap at distance {}", self.distance());
            self.contacts.push(Contact::new(
                AgentRole::Chaser,
                Collider::Agent(AgentRole::Runner),
            ));
            self.contacts.push(Contact::new(
                AgentRole::Runner,
                Collider::Agent(AgentRole::Chaser),
            ));
        }
        self.touching_agents = touching;
    }

    /// Places a body at rest. Contacts are tracked afresh from the new position, so
    /// a body placed touching the other one or a wall reports it on the next step.
    fn teleport(&mut self, role: AgentRole, position: Vec3) {
        let i = role.index();
        self.bodies[i] = BodyState {
            position,
            ..BodyState::default()
        };
        self.touching_wall[i] = false;
        self.touching_agents = false;
    }

    fn drain_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> KinematicWorld {
        KinematicWorld::build(&ArenaConfig::default()).unwrap()
    }

    #[test]
    fn test_body_rests_on_ground() {
        let mut w = world();
        w.teleport(AgentRole::Runner, Vec3::new(5.0, 3.0, -5.0));
        for _ in 0..200 {
            w.step(0.02);
        }
        let b = w.body(AgentRole::Runner);
        assert_eq!(b.position.y, 0.5);
        assert_eq!(b.velocity.y, 0.0);
        assert!(w.check_ground_sphere(b.position - Vec3::Y * 0.5, 0.1));
    }

    #[test]
    fn test_overlap_emits_contact_once() {
        let mut w = world();
        w.teleport(AgentRole::Chaser, Vec3::new(5.0, 0.5, -5.0));
        w.teleport(AgentRole::Runner, Vec3::new(5.8, 0.5, -5.0));
        w.step(0.02);
        let contacts = w.drain_contacts();
        assert!(contacts.contains(&Contact::new(
            AgentRole::Chaser,
            Collider::Agent(AgentRole::Runner)
        )));
        w.step(0.02);
        assert!(w.drain_contacts().is_empty());
    }

    #[test]
    fn test_teleport_into_overlap_emits_contact() {
        let mut w = world();
        w.teleport(AgentRole::Chaser, Vec3::new(5.0, 0.5, -5.0));
        w.teleport(AgentRole::Runner, Vec3::new(5.5, 0.5, -5.0));
        w.step(0.02);
        assert!(!w.drain_contacts().is_empty());
        w.step(0.02);
        assert!(w.drain_contacts().is_empty());

        // Placed overlapping again, as a reset with no minimum separation can do.
        w.teleport(AgentRole::Chaser, Vec3::new(3.0, 0.5, -3.0));
        w.teleport(AgentRole::Runner, Vec3::new(3.0, 0.5, -3.0));
        w.step(0.02);
        assert!(w.drain_contacts().contains(&Contact::new(
            AgentRole::Runner,
            Collider::Agent(AgentRole::Chaser)
        )));
    }

    #[test]
    fn test_wall_stops_body() {
        let mut w = world();
        w.teleport(AgentRole::Runner, Vec3::new(10.0, 0.5, -5.0));
        w.teleport(AgentRole::Chaser, Vec3::new(1.0, 0.5, -5.0));
        w.body_mut(AgentRole::Chaser).velocity = Vec3::new(-5.0, 0.0, 0.0);
        w.step(0.2);
        let b = w.body(AgentRole::Chaser);
        assert_eq!(b.position.x, 0.5);
        assert_eq!(b.velocity.x, 0.0);
        assert_eq!(
            w.drain_contacts(),
            vec![Contact::new(AgentRole::Chaser, Collider::Wall)]
        );
    }

    #[test]
    fn test_raycast_hits_opponent_before_wall() {
        let mut w = world();
        w.teleport(AgentRole::Chaser, Vec3::new(5.0, 0.5, -5.0));
        w.teleport(AgentRole::Runner, Vec3::new(10.0, 0.5, -5.0));

        let hit = w
            .raycast(Vec3::new(5.0, 0.5, -5.0), Vec3::X, 20.0, AgentRole::Chaser)
            .unwrap();
        assert_eq!(hit.collider, Collider::Agent(AgentRole::Runner));
        assert!((hit.distance - 4.5).abs() < 1e-4);

        let hit = w
            .raycast(Vec3::new(5.0, 0.5, -5.0), -Vec3::X, 20.0, AgentRole::Chaser)
            .unwrap();
        assert_eq!(hit.collider, Collider::Wall);
        assert!((hit.distance - 5.0).abs() < 1e-4);

        assert!(w
            .raycast(Vec3::new(5.0, 0.5, -5.0), -Vec3::X, 2.0, AgentRole::Chaser)
            .is_none());
    }
}
