#![warn(missing_docs)]
//! A two-agent pursuit environment.
//!
//! A chaser tries to touch a runner before a countdown runs out. [`PursuitEnv`]
//! implements [`pursuit_core::Env`] with per-agent vectors ordered
//! `[chaser, runner]`:
//!
//! * [`EpisodeCoordinator`] owns the countdown, the scores, the iteration count and
//!   the spawn randomization. Both agents reach it through the environment.
//! * [`PursuerAgent`] drives the chaser, detects captures from the contact events of
//!   the physics and ends the episode on capture or timeout.
//! * [`EvaderAgent`] drives the runner and is rewarded for increasing its distance to
//!   the chaser.
//!
//! Rigid-body physics is behind the [`PhysicsWorld`] trait. [`KinematicWorld`] is a
//! small built-in implementation.
//!
//! ```no_run
//! use pursuit_core::Env;
//! use pursuit_env::{
//!     AgentRole, GreedyPolicy, PairPolicy, PursuitEnv, PursuitEnvConfig,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PursuitEnvConfig::default();
//! let mut env: PursuitEnv = PursuitEnv::build(&config, 42)?;
//! let mut policy = PairPolicy::new(
//!     GreedyPolicy::new(AgentRole::Chaser),
//!     GreedyPolicy::new(AgentRole::Runner),
//! );
//!
//! let mut obs = env.reset()?;
//! loop {
//!     let (step, _record) = env.step(&policy.act(&obs));
//!     if step.is_done() {
//!         println!("{:?}", step.info.outcome);
//!         break;
//!     }
//!     obs = step.obs;
//! }
//! # Ok(())
//! # }
//! ```
mod act;
mod agent;
mod chaser;
mod config;
mod coordinator;
pub mod display;
mod env;
mod error;
mod motion;
mod obs;
pub mod perception;
pub mod physics;
mod policy;
mod runner;

pub use act::{PursuitAct, PursuitJointAct};
pub use agent::AgentRole;
pub use chaser::{ChaserState, PursuerAgent};
pub use config::{
    ArenaConfig, DisplayKind, MotionConfig, PursuitEnvConfig, RayPerceptionConfig,
    RewardConfig, SpawnBounds, SpawnConfig,
};
pub use coordinator::{EpisodeCoordinator, Session};
pub use env::{EpisodeOutcome, PursuitEnv, PursuitInfo};
pub use error::PursuitEnvError;
pub use motion::Locomotion;
pub use obs::{AgentObs, PursuitObs};
pub use physics::{KinematicWorld, PhysicsWorld};
pub use policy::{
    AgentPolicy, GreedyPolicy, GreedyPolicyConfig, HeuristicPolicy, IdlePolicy, ManualInput,
    PairPolicy, RandomPolicy, RandomPolicyConfig, ScriptedInput,
};
pub use runner::{EvaderAgent, RunnerState};
