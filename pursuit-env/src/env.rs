//! The pursuit environment.
use crate::{
    chaser::PursuerAgent,
    config::{DisplayKind, PursuitEnvConfig},
    coordinator::{EpisodeCoordinator, Session},
    display::{Display, LogDisplay, NullDisplay},
    physics::{KinematicWorld, PhysicsWorld},
    runner::EvaderAgent,
    PursuitJointAct, PursuitObs,
};
use anyhow::Result;
use log::{debug, info};
use pursuit_core::{
    record::{Record, RecordValue},
    Env, Info, Step,
};
use std::fmt;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// The chaser made contact with the runner.
    Captured,

    /// The runner outlived the countdown.
    Escaped,

    /// The step limit was reached. Nobody scores.
    Truncated,
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeOutcome::Captured => write!(f, "captured"),
            EpisodeOutcome::Escaped => write!(f, "escaped"),
            EpisodeOutcome::Truncated => write!(f, "truncated"),
        }
    }
}

/// Information in a [`Step`] of [`PursuitEnv`].
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitInfo {
    /// Set on the last step of an episode.
    pub outcome: Option<EpisodeOutcome>,

    /// Distance between the agents after the step.
    pub distance: f32,

    /// Remaining time after the step.
    pub time_remaining: f32,
}

impl Info for PursuitInfo {}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Two-agent pursuit environment.
///
/// Per-agent vectors in [`Step`] are ordered `[chaser, runner]`. A decision step is
/// one simulation tick and proceeds as follows:
///
/// ```mermaid
/// graph TD
///     A[Both agents apply their actions] --> B[Physics advances by dt]
///     B --> C[Countdown decrements by dt]
///     C --> D[Both agents set their shaping rewards]
///     D --> E{Chaser touched runner?}
///     E -- yes --> F[Captured: +R chaser, -R runner]
///     E -- no --> G{Countdown at zero?}
///     G -- yes --> H[Escaped: -R chaser, +R runner]
///     G -- no --> I{Step limit reached?}
///     I -- yes --> J[Truncated]
///     I -- no --> K[Continue]
/// ```
///
/// A capture takes precedence over a timeout detected in the same tick. Terminal
/// rewards replace the shaping reward of the step.
///
/// Calling [`Env::step`] after an episode ended starts a new one first.
pub struct PursuitEnv<W: PhysicsWorld = KinematicWorld> {
    config: PursuitEnvConfig,
    seed: u64,
    world: W,
    coordinator: EpisodeCoordinator,
    chaser: PursuerAgent,
    runner: EvaderAgent,
    count_steps: usize,
}

impl<W: PhysicsWorld> PursuitEnv<W> {
    /// Builds the environment reporting to the given display.
    pub fn with_display(
        config: &PursuitEnvConfig,
        seed: i64,
        display: Box<dyn Display + Send>,
    ) -> Result<Self> {
        let config = config.clone().validate()?;
        let seed = seed as u64;
        let world = W::build(&config.arena)?;
        let coordinator = EpisodeCoordinator::new(&config, seed, display);
        let chaser = PursuerAgent::new(&config);
        let runner = EvaderAgent::new(&config);

        Ok(Self {
            config,
            seed,
            world,
            coordinator,
            chaser,
            runner,
            count_steps: 0,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &PursuitEnvConfig {
        &self.config
    }

    /// The physics world.
    pub fn world(&self) -> &W {
        &self.world
    }

    /// The physics world, e.g. to inject contacts.
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// The episode coordinator.
    pub fn coordinator(&self) -> &EpisodeCoordinator {
        &self.coordinator
    }

    /// The chaser.
    pub fn chaser(&self) -> &PursuerAgent {
        &self.chaser
    }

    /// The runner.
    pub fn runner(&self) -> &EvaderAgent {
        &self.runner
    }

    /// Scores and iteration count.
    pub fn session(&self) -> &Session {
        self.coordinator.session()
    }

    /// Number of steps in the current episode.
    pub fn count_steps(&self) -> usize {
        self.count_steps
    }

    fn observe(&self) -> PursuitObs {
        PursuitObs {
            chaser: self.chaser.collect_observations(&self.world, &self.coordinator),
            runner: self.runner.collect_observations(&self.world, &self.coordinator),
        }
    }

    fn begin_episode(&mut self) -> PursuitObs {
        if self.coordinator.is_active() {
            debug!("Abandoning the running episode");
            self.coordinator.close_episode();
        }
        self.chaser
            .on_episode_begin(&mut self.world, &mut self.coordinator);
        self.runner
            .on_episode_begin(&mut self.world, &mut self.coordinator);
        self.world.drain_contacts();
        self.count_steps = 0;
        self.observe()
    }

    fn episode_record(&self, outcome: EpisodeOutcome) -> Record {
        let session = self.coordinator.session();
        let captured = match outcome {
            EpisodeOutcome::Captured => 1.0,
            _ => 0.0,
        };
        Record::from_slice(&[
            ("episode_length", RecordValue::Scalar(self.count_steps as _)),
            ("outcome", RecordValue::String(outcome.to_string())),
            ("captured", RecordValue::Scalar(captured)),
            (
                "chaser_return",
                RecordValue::Scalar(self.chaser.cumulative_reward()),
            ),
            (
                "runner_return",
                RecordValue::Scalar(self.runner.cumulative_reward()),
            ),
            (
                "chaser_score",
                RecordValue::Scalar(session.chaser_score as _),
            ),
            (
                "runner_score",
                RecordValue::Scalar(session.runner_score as _),
            ),
            (
                "iteration",
                RecordValue::Scalar(session.iteration_count as _),
            ),
        ])
    }
}

impl<W: PhysicsWorld> Env for PursuitEnv<W> {
    type Config = PursuitEnvConfig;
    type Obs = PursuitObs;
    type Act = PursuitJointAct;
    type Info = PursuitInfo;

    /// Builds the environment. The display is chosen by [`PursuitEnvConfig::display`].
    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let display: Box<dyn Display + Send> = match config.display {
            DisplayKind::Log => Box::new(LogDisplay),
            DisplayKind::None => Box::new(NullDisplay),
        };
        Self::with_display(config, seed, display)
    }

    fn n_agents(&self) -> usize {
        2
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        if !self.coordinator.is_active() {
            debug!("Step called between episodes, starting a new one");
            self.begin_episode();
        }

        let dt = self.config.dt;
        self.chaser.on_action_received(&mut self.world, &a.chaser, dt);
        self.runner.on_action_received(&mut self.world, &a.runner, dt);
        self.world.step(dt);
        self.coordinator.tick(dt);
        self.count_steps += 1;

        self.chaser.shape_reward(&self.world);
        self.runner.shape_reward(&self.world);

        let contacts = self.world.drain_contacts();
        let outcome = if self
            .chaser
            .detect_capture(&contacts, &mut self.coordinator, &mut self.runner)
        {
            Some(EpisodeOutcome::Captured)
        } else if self
            .chaser
            .check_timeout(&mut self.coordinator, &mut self.runner)
        {
            Some(EpisodeOutcome::Escaped)
        } else if self.config.max_steps.map_or(false, |m| self.count_steps >= m) {
            self.coordinator.close_episode();
            Some(EpisodeOutcome::Truncated)
        } else {
            None
        };

        let reward = vec![self.chaser.take_reward(), self.runner.take_reward()];
        let (terminated, truncated) = match outcome {
            Some(EpisodeOutcome::Captured) | Some(EpisodeOutcome::Escaped) => (1, 0),
            Some(EpisodeOutcome::Truncated) => (0, 1),
            None => (0, 0),
        };

        let distance = self.world.distance();
        let time_remaining = self.coordinator.time_remaining();
        let mut record = Record::from_slice(&[
            ("distance", RecordValue::Scalar(distance)),
            ("time_remaining", RecordValue::Scalar(time_remaining)),
        ]);

        if let Some(outcome) = outcome {
            info!(
                "Episode ended ({}) after {} steps, returns = [{}, {}]",
                outcome,
                self.count_steps,
                self.chaser.cumulative_reward(),
                self.runner.cumulative_reward()
            );
            record.merge_inplace(self.episode_record(outcome));
        }

        let info = PursuitInfo {
            outcome,
            distance,
            time_remaining,
        };
        let step = Step::new(
            self.observe(),
            *a,
            reward,
            vec![terminated; 2],
            vec![truncated; 2],
            info,
            None,
        );

        (step, record)
    }

    /// Starts a new episode, abandoning the running one if any.
    fn reset(&mut self) -> Result<PursuitObs> {
        Ok(self.begin_episode())
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = Some(self.begin_episode());
        }
        (step, record)
    }

    /// Reseeds the spawn randomization with `seed + ix` and starts a new episode.
    fn reset_with_index(&mut self, ix: usize) -> Result<PursuitObs> {
        self.coordinator.reseed(self.seed.wrapping_add(ix as u64));
        self.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{display::TextBoard, AgentRole, PursuitAct};

    fn idle() -> PursuitJointAct {
        PursuitJointAct::default()
    }

    fn config() -> PursuitEnvConfig {
        PursuitEnvConfig::default()
            .episode_duration(1.0)
            .dt(0.25)
            .display(DisplayKind::None)
    }

    #[test]
    fn test_observation_widths() -> Result<()> {
        let mut env = PursuitEnv::<KinematicWorld>::build(&config(), 0)?;
        let obs = env.reset()?;
        assert_eq!(obs.chaser.len(), env.chaser().observation_width());
        assert_eq!(obs.runner.len(), env.runner().observation_width());
        assert_eq!(obs.runner.time_remaining(), 1.0);
        let [x, y, z] = obs.runner.relative_position();
        assert_eq!(obs.chaser.relative_position(), [-x, -y, -z]);
        Ok(())
    }

    #[test]
    fn test_reset_mid_episode_leaves_session_unscored() -> Result<()> {
        let mut env = PursuitEnv::<KinematicWorld>::build(&config(), 0)?;
        env.reset()?;
        for _ in 0..2 {
            let (step, _) = env.step(&idle());
            assert!(!step.is_done());
        }

        let obs = env.reset()?;
        assert_eq!(*env.session(), Session::default());
        assert_eq!(obs.runner.time_remaining(), 1.0);
        assert!(env.coordinator().is_active());
        Ok(())
    }

    #[test]
    fn test_step_with_reset_carries_next_observation() -> Result<()> {
        let mut env = PursuitEnv::<KinematicWorld>::build(&config(), 0)?;
        env.reset()?;
        for _ in 0..3 {
            let (step, _) = env.step_with_reset(&idle());
            assert!(!step.is_done());
            assert!(step.init_obs.is_none());
        }
        let (step, record) = env.step_with_reset(&idle());
        assert!(step.is_terminal());
        assert_eq!(step.info.outcome, Some(EpisodeOutcome::Escaped));
        assert_eq!(record.get_string("outcome")?, "escaped");
        let init_obs = step.init_obs.expect("initial observation of the next episode");
        assert_eq!(init_obs.runner.time_remaining(), 1.0);
        assert_eq!(env.count_steps(), 0);
        Ok(())
    }

    #[test]
    fn test_max_steps_truncates_without_score() -> Result<()> {
        let mut env = PursuitEnv::<KinematicWorld>::build(&config().max_steps(Some(2)), 0)?;
        env.reset()?;
        env.step(&idle());
        let (step, record) = env.step(&idle());
        assert!(step.is_done());
        assert!(!step.is_terminal());
        assert_eq!(step.is_truncated, vec![1, 1]);
        assert_eq!(step.info.outcome, Some(EpisodeOutcome::Truncated));
        assert_eq!(record.get_scalar("captured")?, 0.0);
        assert_eq!(*env.session(), Session::default());

        // The next step starts a fresh episode.
        let (step, _) = env.step(&idle());
        assert!(!step.is_done());
        assert_eq!(env.count_steps(), 1);
        Ok(())
    }

    #[test]
    fn test_reset_with_index_is_reproducible() -> Result<()> {
        let mut env = PursuitEnv::<KinematicWorld>::build(&config(), 3)?;
        let a = env.reset_with_index(1)?;
        env.reset_with_index(2)?;
        let b = env.reset_with_index(1)?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn test_display_receives_updates() -> Result<()> {
        let board = TextBoard::new();
        let mut env =
            PursuitEnv::<KinematicWorld>::with_display(&config(), 0, Box::new(board.clone()))?;
        env.reset()?;
        env.step(&idle());
        assert_eq!(
            board.text(crate::display::DisplayField::Time),
            Some("0.75 s".to_string())
        );
        Ok(())
    }

    #[test]
    fn test_runner_moving_away_earns_shaping() -> Result<()> {
        let mut env = PursuitEnv::<KinematicWorld>::build(&config().episode_duration(10.0), 0)?;
        env.reset()?;
        let chaser = env.world().body(AgentRole::Chaser).position;
        let runner = env.world().body(AgentRole::Runner).position;
        let away = (runner - chaser).normalize();
        let act = PursuitJointAct::new(PursuitAct::idle(), PursuitAct::new(away.x, away.z, false));
        let before = env.world().distance();
        let (step, _) = env.step(&act);
        let after = env.world().distance();
        assert!((step.reward[1] + 10.0 * (before - after)).abs() < 1e-4);
        assert!((step.reward[0] + step.reward[1]).abs() < 1e-4);
        Ok(())
    }
}
