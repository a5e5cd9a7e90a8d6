//! A two-agent pursuit environment for reinforcement learning.
//!
//! The repository consists of the following crates:
//!
//! * [pursuit-core](pursuit_core) provides the traits shared by environments and
//!   policies ([`Env`](pursuit_core::Env), [`Policy`](pursuit_core::Policy),
//!   [`Step`](pursuit_core::Step)), key-value records with recorders, and the
//!   evaluation utilities.
//! * [pursuit-env](pursuit_env) implements the chase: an episode coordinator owning
//!   the countdown and the scores, a chaser and a runner agent, a seam to the physics
//!   with a built-in kinematic world, ray perception and simple policies.
//! * `pursuit` re-exports both and hosts the `run_pursuit` example.
pub use pursuit_core;
pub use pursuit_env;
