//! Configuration of [`PursuitEnv`](crate::PursuitEnv).
//!
//! The defaults reproduce the reference scene: a 10 second episode, spawn points
//! drawn from `x ∈ [3, 18]`, `z ∈ [-8, -3]`, agents moving at 5 m/s with a jump
//! impulse of 5, and a ray fan of 7 rays covering ±70 degrees.
use crate::PursuitEnvError;
use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Rectangular region on the ground from which spawn points are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnBounds {
    /// Lower bound of the x coordinate.
    pub min_x: f32,

    /// Upper bound of the x coordinate.
    pub max_x: f32,

    /// Lower bound of the z coordinate.
    pub min_z: f32,

    /// Upper bound of the z coordinate.
    pub max_z: f32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        // The z bounds are given in reverse order on purpose, as in the reference
        // scene. They are normalized before use.
        Self::new(3.0, 18.0, -3.0, -8.0)
    }
}

impl SpawnBounds {
    /// Constructs bounds. The order of each pair is not checked here.
    pub fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Returns `true` if `min <= max` holds on both axes.
    pub fn is_ordered(&self) -> bool {
        self.min_x <= self.max_x && self.min_z <= self.max_z
    }

    /// Returns the bounds with each `(min, max)` pair swapped where needed.
    pub fn normalized(&self) -> Self {
        Self {
            min_x: self.min_x.min(self.max_x),
            max_x: self.min_x.max(self.max_x),
            min_z: self.min_z.min(self.max_z),
            max_z: self.min_z.max(self.max_z),
        }
    }

    /// Returns `true` if the point lies inside the (normalized) bounds.
    pub fn contains(&self, x: f32, z: f32) -> bool {
        let b = self.normalized();
        b.min_x <= x && x <= b.max_x && b.min_z <= z && z <= b.max_z
    }

    /// Draws a point uniformly at random.
    ///
    /// The bounds are expected to be normalized.
    pub fn sample(&self, rng: &mut fastrand::Rng) -> (f32, f32) {
        let x = (self.min_x + rng.f32() * (self.max_x - self.min_x)).min(self.max_x);
        let z = (self.min_z + rng.f32() * (self.max_z - self.min_z)).min(self.max_z);
        (x, z)
    }
}

/// Where and how the agents are placed at the start of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Region of the spawn points, shared by both agents.
    pub bounds: SpawnBounds,

    /// Height of the spawn anchors. Both agents spawn at this y coordinate.
    pub height: f32,

    /// Minimum horizontal distance between the two spawn points.
    ///
    /// Draws closer than this are rejected and drawn again, so that an episode
    /// never starts in contact. Zero disables the check.
    pub min_separation: f32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            bounds: SpawnBounds::default(),
            height: 0.5,
            min_separation: 2.0,
        }
    }
}

/// Locomotion parameters of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Horizontal speed at full control signal.
    pub speed: f32,

    /// Upward impulse applied by a jump.
    pub jump_impulse: f32,

    /// Rate of turning toward the direction of motion, multiplied by the tick duration.
    pub turn_rate: f32,

    /// Distance below the body center of the ground probe.
    pub ground_probe_offset: f32,

    /// Radius of the ground probe.
    pub ground_probe_radius: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            jump_impulse: 5.0,
            turn_rate: 10.0,
            ground_probe_offset: 0.5,
            ground_probe_radius: 0.1,
        }
    }
}

/// Reward parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Scale of the runner's shaping reward, `-scale * (previous - current)` distance.
    pub runner_shaping_scale: f32,

    /// Scale of the chaser's shaping reward, `scale * (previous - current)` distance.
    ///
    /// Zero disables shaping for the chaser.
    pub chaser_shaping_scale: f32,

    /// Magnitude of the terminal rewards of both agents.
    pub terminal_reward: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            runner_shaping_scale: 10.0,
            chaser_shaping_scale: 10.0,
            terminal_reward: 100.0,
        }
    }
}

/// Fan of horizontal rays cast from an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RayPerceptionConfig {
    /// Number of rays on each side of the center ray.
    pub rays_per_direction: usize,

    /// Angle between the center ray and the outermost rays, in degrees.
    pub max_ray_degrees: f32,

    /// Length of the rays.
    pub ray_length: f32,
}

impl Default for RayPerceptionConfig {
    fn default() -> Self {
        Self {
            rays_per_direction: 3,
            max_ray_degrees: 70.0,
            ray_length: 20.0,
        }
    }
}

/// Geometry of the built-in [`KinematicWorld`](crate::KinematicWorld).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Position of the wall on the negative x side.
    pub min_x: f32,

    /// Position of the wall on the positive x side.
    pub max_x: f32,

    /// Position of the wall on the negative z side.
    pub min_z: f32,

    /// Position of the wall on the positive z side.
    pub max_z: f32,

    /// Gravitational acceleration, positive downward.
    pub gravity: f32,

    /// Radius of the spherical bodies of the agents.
    pub body_radius: f32,

    /// Mass of the bodies, used to convert impulses into velocity changes.
    pub body_mass: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 21.0,
            min_z: -11.0,
            max_z: 0.0,
            gravity: 9.81,
            body_radius: 0.5,
            body_mass: 1.0,
        }
    }
}

/// Which display the environment reports to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayKind {
    /// Write display updates to the log.
    Log,

    /// Discard display updates.
    None,
}

/// Configuration of [`PursuitEnv`](crate::PursuitEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PursuitEnvConfig {
    /// Length of an episode in seconds.
    pub episode_duration: f32,

    /// Duration of a simulation tick in seconds. One decision step is one tick.
    pub dt: f32,

    /// Spawn configuration.
    pub spawn: SpawnConfig,

    /// Locomotion of the chaser.
    pub chaser_motion: MotionConfig,

    /// Locomotion of the runner.
    pub runner_motion: MotionConfig,

    /// Rewards.
    pub reward: RewardConfig,

    /// Ray perception of both agents.
    pub ray_perception: RayPerceptionConfig,

    /// Arena of the built-in physics.
    pub arena: ArenaConfig,

    /// If given, episodes are truncated after this number of steps.
    pub max_steps: Option<usize>,

    /// Display sink.
    pub display: DisplayKind,
}

impl Default for PursuitEnvConfig {
    fn default() -> Self {
        Self {
            episode_duration: 10.0,
            dt: 0.02,
            spawn: SpawnConfig::default(),
            chaser_motion: MotionConfig::default(),
            runner_motion: MotionConfig::default(),
            reward: RewardConfig::default(),
            ray_perception: RayPerceptionConfig::default(),
            arena: ArenaConfig::default(),
            max_steps: None,
            display: DisplayKind::Log,
        }
    }
}

impl PursuitEnvConfig {
    /// Sets the length of an episode in seconds.
    pub fn episode_duration(mut self, v: f32) -> Self {
        self.episode_duration = v;
        self
    }

    /// Sets the tick duration in seconds.
    pub fn dt(mut self, v: f32) -> Self {
        self.dt = v;
        self
    }

    /// Sets the spawn bounds.
    pub fn spawn_bounds(mut self, bounds: SpawnBounds) -> Self {
        self.spawn.bounds = bounds;
        self
    }

    /// Sets the minimum distance between spawn points.
    pub fn min_spawn_separation(mut self, v: f32) -> Self {
        self.spawn.min_separation = v;
        self
    }

    /// Sets the locomotion of both agents.
    pub fn motion(mut self, motion: MotionConfig) -> Self {
        self.chaser_motion = motion.clone();
        self.runner_motion = motion;
        self
    }

    /// Sets the reward parameters.
    pub fn reward(mut self, reward: RewardConfig) -> Self {
        self.reward = reward;
        self
    }

    /// Sets the ray perception.
    pub fn ray_perception(mut self, v: RayPerceptionConfig) -> Self {
        self.ray_perception = v;
        self
    }

    /// Sets the arena.
    pub fn arena(mut self, v: ArenaConfig) -> Self {
        self.arena = v;
        self
    }

    /// Sets the step limit of episodes.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the display sink.
    pub fn display(mut self, v: DisplayKind) -> Self {
        self.display = v;
        self
    }

    /// Checks the parameters and normalizes the spawn bounds.
    ///
    /// Reversed spawn bounds are accepted and swapped with a warning.
    pub fn validate(mut self) -> Result<Self, PursuitEnvError> {
        positive("episode_duration", self.episode_duration)?;
        positive("dt", self.dt)?;
        non_negative("spawn.min_separation", self.spawn.min_separation)?;
        for motion in [&self.chaser_motion, &self.runner_motion] {
            non_negative("speed", motion.speed)?;
            non_negative("jump_impulse", motion.jump_impulse)?;
            non_negative("turn_rate", motion.turn_rate)?;
            non_negative("ground_probe_radius", motion.ground_probe_radius)?;
        }
        positive("ray_length", self.ray_perception.ray_length)?;
        non_negative("max_ray_degrees", self.ray_perception.max_ray_degrees)?;
        positive("arena.body_radius", self.arena.body_radius)?;
        positive("arena.body_mass", self.arena.body_mass)?;
        non_negative("arena.gravity", self.arena.gravity)?;
        if self.max_steps == Some(0) {
            return Err(PursuitEnvError::ZeroMaxSteps);
        }

        if !self.spawn.bounds.is_ordered() {
            warn!(
                "Spawn bounds {:?} have min > max, swapping them",
                self.spawn.bounds
            );
            self.spawn.bounds = self.spawn.bounds.normalized();
        }

        let b = &self.spawn.bounds;
        let a = &self.arena;
        if b.min_x < a.min_x || b.max_x > a.max_x || b.min_z < a.min_z || b.max_z > a.max_z {
            return Err(PursuitEnvError::SpawnOutsideArena(*b));
        }

        Ok(self)
    }

    /// Constructs [`PursuitEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(config)
    }

    /// Saves [`PursuitEnvConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), PursuitEnvError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PursuitEnvError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), PursuitEnvError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(PursuitEnvError::Negative { name, value })
    }
}
