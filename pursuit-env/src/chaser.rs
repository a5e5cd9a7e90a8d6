//! The pursuing agent.
use crate::{
    agent::RewardState,
    config::PursuitEnvConfig,
    coordinator::EpisodeCoordinator,
    motion::Locomotion,
    obs::AgentObs,
    perception::RayPerception,
    physics::{Collider, Contact, PhysicsWorld},
    runner::EvaderAgent,
    AgentRole, PursuitAct,
};
use log::info;

/// Where the chaser is in its episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChaserState {
    /// The episode is running.
    Running,

    /// The countdown ran out before a capture.
    TimedOut,

    /// The chaser made contact with the runner.
    Captured,
}

/// Decision-loop participant controlling the chaser.
///
/// The chaser mirrors the runner: it sees the same observation layout from its own
/// side, it is rewarded `scale * (previous_distance - current_distance)` for closing
/// in, and it receives `+terminal_reward` for a capture and `-terminal_reward` when
/// time runs out. It also drives both terminal events of the runner.
#[derive(Debug, Clone)]
pub struct PursuerAgent {
    locomotion: Locomotion,
    perception: RayPerception,
    shaping_scale: f32,
    terminal_reward: f32,
    reward: RewardState,
    previous_distance: f32,
    state: ChaserState,
}

impl PursuerAgent {
    /// Constructs the chaser.
    pub fn new(config: &PursuitEnvConfig) -> Self {
        Self {
            locomotion: Locomotion::new(&config.chaser_motion),
            perception: RayPerception::new(&config.ray_perception),
            shaping_scale: config.reward.chaser_shaping_scale,
            terminal_reward: config.reward.terminal_reward,
            reward: RewardState::default(),
            previous_distance: 0.0,
            state: ChaserState::Running,
        }
    }

    /// Requests a reset of the episode and records the shaping baseline.
    pub fn on_episode_begin<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        coordinator: &mut EpisodeCoordinator,
    ) {
        coordinator.begin_episode(world);
        self.previous_distance = world.distance();
        self.reward.begin_episode();
        self.state = ChaserState::Running;
    }

    /// Assembles the observation of the chaser.
    pub fn collect_observations<W: PhysicsWorld>(
        &self,
        world: &W,
        coordinator: &EpisodeCoordinator,
    ) -> AgentObs {
        AgentObs::collect(AgentRole::Chaser, world, &self.perception, coordinator)
    }

    /// Applies an action to the body of the chaser.
    pub fn on_action_received<W: PhysicsWorld>(&self, world: &mut W, act: &PursuitAct, dt: f32) {
        self.locomotion.apply(world, AgentRole::Chaser, act, dt);
    }

    /// Sets the shaping reward of the step and moves the baseline to the current
    /// distance.
    pub fn shape_reward<W: PhysicsWorld>(&mut self, world: &W) -> f32 {
        let current = world.distance();
        let r = self.shaping_scale * (self.previous_distance - current);
        self.reward.set(r);
        self.previous_distance = current;
        r
    }

    /// Looks for a contact between the chaser and the runner among the events of
    /// the last tick. On contact the capture is scored, both agents get their
    /// terminal rewards and the episode ends.
    pub fn detect_capture(
        &mut self,
        contacts: &[Contact],
        coordinator: &mut EpisodeCoordinator,
        runner: &mut EvaderAgent,
    ) -> bool {
        if self.reward.episode_ended() {
            return false;
        }
        let caught = contacts
            .iter()
            .any(|c| c.body == AgentRole::Chaser && c.other == Collider::Agent(AgentRole::Runner));
        if !caught {
            return false;
        }

        coordinator.on_captured();
        self.reward.set(self.terminal_reward);
        runner.get_caught();
        self.state = ChaserState::Captured;
        info!(
            "Runner caught! Chaser current reward: {}",
            self.reward.cumulative()
        );
        self.reward.end_episode();
        true
    }

    /// Ends the episode in favor of the runner if the countdown ran out.
    pub fn check_timeout(
        &mut self,
        coordinator: &mut EpisodeCoordinator,
        runner: &mut EvaderAgent,
    ) -> bool {
        if self.reward.episode_ended() || !coordinator.is_timed_out() {
            return false;
        }

        self.reward.set(-self.terminal_reward);
        runner.escape();
        self.state = ChaserState::TimedOut;
        info!(
            "Runner escaped! Chaser current reward: {}",
            self.reward.cumulative()
        );
        self.reward.end_episode();
        true
    }

    /// Current state.
    pub fn state(&self) -> ChaserState {
        self.state
    }

    /// Distance to the runner at the last shaping computation.
    pub fn previous_distance(&self) -> f32 {
        self.previous_distance
    }

    /// Return of the current episode so far.
    pub fn cumulative_reward(&self) -> f32 {
        self.reward.cumulative()
    }

    /// Returns `true` once a terminal event ended the episode.
    pub fn episode_ended(&self) -> bool {
        self.reward.episode_ended()
    }

    /// Width of the observation vector.
    pub fn observation_width(&self) -> usize {
        AgentObs::width(self.perception.width())
    }

    pub(crate) fn take_reward(&mut self) -> f32 {
        self.reward.take()
    }
}
