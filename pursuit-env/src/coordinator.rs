//! Episode lifecycle and cross-episode bookkeeping.
use crate::{
    config::{PursuitEnvConfig, SpawnConfig},
    display::{format_time, Display, DisplayField},
    physics::PhysicsWorld,
    AgentRole,
};
use glam::Vec3;
use log::{debug, info, warn};

const MAX_SPAWN_ATTEMPTS: usize = 100;

/// Counters that survive episode resets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    /// Number of finished episodes, by capture or by timeout.
    pub iteration_count: u32,

    /// Number of episodes the runner outlived.
    pub runner_score: u32,

    /// Number of captures.
    pub chaser_score: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Episode {
    remaining_time: f32,
    active: bool,
    // Set once the end of the episode has been accounted for.
    closed: bool,
}

/// Owns the countdown, the scores and the spawn randomization.
///
/// Both agents hold the coordinator by reference through the environment. It is the
/// only writer of the countdown and of [`Session`].
///
/// ```text
///  reset_episode          tick (remaining > 0)
/// ───────────────▶ active ──────────────────┐
///                    │  ▲                    │
///                    │  └────────────────────┘
///                    │ is_timed_out / on_captured / close_episode
///                    ▼
///                  closed ───▶ reset_episode
/// ```
pub struct EpisodeCoordinator {
    episode_duration: f32,
    spawn: SpawnConfig,
    rng: fastrand::Rng,
    episode: Episode,
    session: Session,
    display: Box<dyn Display + Send>,
}

impl EpisodeCoordinator {
    /// Constructs a coordinator. No episode is active until [`Self::reset_episode`].
    pub fn new(config: &PursuitEnvConfig, seed: u64, display: Box<dyn Display + Send>) -> Self {
        let mut spawn = config.spawn.clone();
        spawn.bounds = spawn.bounds.normalized();

        Self {
            episode_duration: config.episode_duration,
            spawn,
            rng: fastrand::Rng::with_seed(seed),
            episode: Episode::default(),
            session: Session::default(),
            display,
        }
    }

    /// Restarts the random sequence of spawn points.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = fastrand::Rng::with_seed(seed);
    }

    /// Starts a new episode.
    ///
    /// Draws an independent spawn point for each agent, places both bodies there at
    /// rest and restores the full episode duration.
    pub fn reset_episode<W: PhysicsWorld>(&mut self, world: &mut W) {
        let (chaser, runner) = self.draw_spawn_points();
        world.teleport(AgentRole::Chaser, chaser);
        world.teleport(AgentRole::Runner, runner);

        self.episode = Episode {
            remaining_time: self.episode_duration,
            active: true,
            closed: false,
        };

        self.display.update(
            DisplayField::Iteration,
            &self.session.iteration_count.to_string(),
        );
        self.display
            .update(DisplayField::Time, &format_time(self.episode.remaining_time));
        debug!(
            "Episode {} starts: chaser at {}, runner at {}",
            self.session.iteration_count, chaser, runner
        );
    }

    /// Resets unless an episode is already running.
    ///
    /// Both agents call this when their episode begins, so the reset happens once.
    /// Returns `true` if a reset took place.
    pub fn begin_episode<W: PhysicsWorld>(&mut self, world: &mut W) -> bool {
        if self.episode.active {
            false
        } else {
            self.reset_episode(world);
            true
        }
    }

    /// Advances the countdown by `dt` seconds. Does nothing between episodes.
    pub fn tick(&mut self, dt: f32) {
        if !self.episode.active || self.episode.remaining_time <= 0.0 {
            return;
        }
        self.episode.remaining_time = (self.episode.remaining_time - dt).max(0.0);
        self.display
            .update(DisplayField::Time, &format_time(self.episode.remaining_time));
    }

    /// Returns `true` once the countdown has reached zero.
    ///
    /// The first `true` of an episode closes it and scores it for the runner. Later
    /// calls keep returning `true` without scoring again.
    pub fn is_timed_out(&mut self) -> bool {
        if !self.has_started() || self.episode.remaining_time > 0.0 {
            return false;
        }
        if !self.episode.closed {
            info!("Runner survived! Game over");
            self.session.runner_score += 1;
            self.session.iteration_count += 1;
            self.display.update(
                DisplayField::RunnerScore,
                &self.session.runner_score.to_string(),
            );
            self.close_episode();
        }
        true
    }

    /// Scores a capture for the chaser and closes the episode.
    ///
    /// The countdown is left where it is. Returns `false` without scoring if the
    /// episode was already closed or none has started yet.
    pub fn on_captured(&mut self) -> bool {
        if !self.has_started() || self.episode.closed {
            return false;
        }
        info!("Chaser caught the runner! Game over");
        self.session.chaser_score += 1;
        self.session.iteration_count += 1;
        self.display.update(
            DisplayField::ChaserScore,
            &self.session.chaser_score.to_string(),
        );
        self.close_episode();
        true
    }

    /// Ends the episode without scoring it, e.g. on truncation.
    pub fn close_episode(&mut self) {
        self.episode.active = false;
        self.episode.closed = true;
    }

    /// Remaining time of the episode in seconds.
    pub fn time_remaining(&self) -> f32 {
        self.episode.remaining_time
    }

    /// Returns `true` while an episode is running.
    pub fn is_active(&self) -> bool {
        self.episode.active
    }

    /// Full length of an episode in seconds.
    pub fn episode_duration(&self) -> f32 {
        self.episode_duration
    }

    /// Scores and iteration count.
    pub fn session(&self) -> &Session {
        &self.session
    }

    // No episode has been started since construction.
    fn has_started(&self) -> bool {
        self.episode.active || self.episode.closed
    }

    fn draw_spawn_points(&mut self) -> (Vec3, Vec3) {
        let bounds = self.spawn.bounds;
        let min_sep = self.spawn.min_separation;
        let y = self.spawn.height;

        let mut draw = || {
            let (cx, cz) = bounds.sample(&mut self.rng);
            let (rx, rz) = bounds.sample(&mut self.rng);
            (Vec3::new(cx, y, cz), Vec3::new(rx, y, rz))
        };

        let mut points = draw();
        for _ in 1..MAX_SPAWN_ATTEMPTS {
            if points.0.distance(points.1) >= min_sep {
                return points;
            }
            points = draw();
        }
        if points.0.distance(points.1) < min_sep {
            warn!(
                "No spawn points {} apart found in {} attempts",
                min_sep, MAX_SPAWN_ATTEMPTS
            );
        }
        points
    }
}
