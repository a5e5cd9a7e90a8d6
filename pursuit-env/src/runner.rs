//! The evading agent.
use crate::{
    agent::RewardState, config::PursuitEnvConfig, coordinator::EpisodeCoordinator,
    motion::Locomotion, obs::AgentObs, perception::RayPerception, physics::PhysicsWorld,
    AgentRole, PursuitAct,
};
use log::info;

/// Where the runner is in its episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// The episode is running.
    Running,

    /// The chaser made contact.
    Caught,

    /// The countdown ran out.
    Escaped,
}

/// Decision-loop participant controlling the runner.
///
/// Every step it is rewarded for increasing its distance to the chaser:
/// `-scale * (previous_distance - current_distance)`. Summed over an episode the
/// shaping reward is `-scale * (initial_distance - final_distance)`, whatever path
/// the runner took.
#[derive(Debug, Clone)]
pub struct EvaderAgent {
    locomotion: Locomotion,
    perception: RayPerception,
    shaping_scale: f32,
    terminal_reward: f32,
    reward: RewardState,
    previous_distance: f32,
    state: RunnerState,
}

impl EvaderAgent {
    /// Constructs the runner.
    pub fn new(config: &PursuitEnvConfig) -> Self {
        Self {
            locomotion: Locomotion::new(&config.runner_motion),
            perception: RayPerception::new(&config.ray_perception),
            shaping_scale: config.reward.runner_shaping_scale,
            terminal_reward: config.reward.terminal_reward,
            reward: RewardState::default(),
            previous_distance: 0.0,
            state: RunnerState::Running,
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
        self.state = RunnerState::Running;
    }

    /// Assembles the observation of the runner.
    pub fn collect_observations<W: PhysicsWorld>(
        &self,
        world: &W,
        coordinator: &EpisodeCoordinator,
    ) -> AgentObs {
        AgentObs::collect(AgentRole::Runner, world, &self.perception, coordinator)
    }

    /// Applies an action to the body of the runner.
    pub fn on_action_received<W: PhysicsWorld>(&self, world: &mut W, act: &PursuitAct, dt: f32) {
        self.locomotion.apply(world, AgentRole::Runner, act, dt);
    }

    /// Sets the shaping reward of the step and moves the baseline to the current
    /// distance.
    pub fn shape_reward<W: PhysicsWorld>(&mut self, world: &W) -> f32 {
        let current = world.distance();
        let r = -self.shaping_scale * (self.previous_distance - current);
        self.reward.set(r);
        self.previous_distance = current;
        r
    }

    /// Terminal event fired by the chaser on contact.
    pub fn get_caught(&mut self) {
        self.reward.set(-self.terminal_reward);
        self.state = RunnerState::Caught;
        info!(
            "Runner caught! Runner current reward: {}",
            self.reward.cumulative()
        );
        self.reward.end_episode();
    }

    /// Terminal event fired by the chaser when the countdown runs out.
    pub fn escape(&mut self) {
        self.reward.set(self.terminal_reward);
        self.state = RunnerState::Escaped;
        info!(
            "Runner escaped! Runner current reward: {}",
            self.reward.cumulative()
        );
        self.reward.end_episode();
    }

    /// Current state.
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Distance to the chaser at the last shaping computation.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::ArenaConfig, display::NullDisplay, KinematicWorld};
    use glam::Vec3;

    fn setup() -> (EvaderAgent, EpisodeCoordinator, KinematicWorld) {
        let config = PursuitEnvConfig::default();
        let coordinator = EpisodeCoordinator::new(&config, 0, Box::new(NullDisplay));
        let world = KinematicWorld::build(&ArenaConfig::default()).unwrap();
        (EvaderAgent::new(&config), coordinator, world)
    }

    #[test]
    fn test_shaping_rewards_moving_away() {
        let (mut runner, mut coordinator, mut world) = setup();
        runner.on_episode_begin(&mut world, &mut coordinator);
        world.teleport(AgentRole::Chaser, Vec3::new(5.0, 0.5, -5.0));
        world.teleport(AgentRole::Runner, Vec3::new(8.0, 0.5, -5.0));
        runner.shape_reward(&world);

        world.body_mut(AgentRole::Runner).position.x = 9.0;
        assert!((runner.shape_reward(&world) - 10.0).abs() < 1e-5);
        world.body_mut(AgentRole::Runner).position.x = 7.0;
        assert!((runner.shape_reward(&world) + 20.0).abs() < 1e-5);
        assert_eq!(runner.previous_distance(), 2.0);
    }

    #[test]
    fn test_terminal_reward_overrides_shaping() {
        let (mut runner, mut coordinator, mut world) = setup();
        runner.on_episode_begin(&mut world, &mut coordinator);
        world.body_mut(AgentRole::Runner).position.x += 1.0;
        runner.shape_reward(&world);
        runner.get_caught();

        assert_eq!(runner.state(), RunnerState::Caught);
        assert!(runner.episode_ended());
        assert_eq!(runner.take_reward(), -100.0);

        runner.on_episode_begin(&mut world, &mut coordinator);
        assert_eq!(runner.state(), RunnerState::Running);
        runner.escape();
        assert_eq!(runner.cumulative_reward(), 100.0);
    }

    #[test]
    fn test_observation_layout() {
        let (mut runner, mut coordinator, mut world) = setup();
        runner.on_episode_begin(&mut world, &mut coordinator);
        world.teleport(AgentRole::Chaser, Vec3::new(5.0, 0.5, -5.0));
        world.teleport(AgentRole::Runner, Vec3::new(8.0, 0.5, -4.0));
        world.body_mut(AgentRole::Chaser).velocity = Vec3::new(1.0, 0.0, 0.0);

        let obs = runner.collect_observations(&world, &coordinator);
        assert_eq!(obs.len(), runner.observation_width());
        assert_eq!(obs.len(), 38);
        assert_eq!(obs.relative_position(), [3.0, 0.0, 1.0]);
        assert_eq!(obs.own_velocity(), [0.0; 3]);
        assert_eq!(obs.opponent_velocity(), [1.0, 0.0, 0.0]);
        assert_eq!(obs.ray_perception().len(), 28);
        assert_eq!(obs.time_remaining(), 10.0);
    }
}
