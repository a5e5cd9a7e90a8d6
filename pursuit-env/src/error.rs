//! Errors of the pursuit environment.
use crate::config::SpawnBounds;
use thiserror::Error;

/// Errors raised while validating a [`PursuitEnvConfig`](crate::PursuitEnvConfig).
///
/// Episode outcomes are not errors; they are reported through
/// [`PursuitInfo`](crate::PursuitInfo).
#[derive(Error, Debug, PartialEq)]
pub enum PursuitEnvError {
    /// A parameter that must be strictly positive is not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Name of the parameter.
        name: &'static str,
        /// Given value.
        value: f32,
    },

    /// A parameter that must not be negative is.
    #[error("{name} must not be negative, got {value}")]
    Negative {
        /// Name of the parameter.
        name: &'static str,
        /// Given value.
        value: f32,
    },

    /// Spawn positions could land outside of the walls of the arena.
    #[error("Spawn bounds {0:?} are not inside the arena")]
    SpawnOutsideArena(SpawnBounds),

    /// `max_steps` was set to zero.
    #[error("max_steps must be positive when given")]
    ZeroMaxSteps,
}
