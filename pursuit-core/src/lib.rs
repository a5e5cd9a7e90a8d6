#![warn(missing_docs)]
//! Core traits and utilities of the pursuit environment.
//!
//! This crate knows nothing about chasers or runners. It defines how an environment,
//! its observations and actions, and a policy interact, how the outcome of each
//! interaction step is reported with [`Step`] and [`record::Record`], and how a
//! policy is evaluated over a number of episodes.
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Configurable, Env, Info, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

#[cfg(test)]
mod testing;
