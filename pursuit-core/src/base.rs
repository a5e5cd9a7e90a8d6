//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::{Configurable, Policy};
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// In a multi-agent environment a single [`Obs`] carries the observations of all
/// agents, one vector per agent.
pub trait Obs: Clone + Debug {
    /// Returns the number of per-agent observations in the object.
    fn len(&self) -> usize;
}

/// An action applied to an environment.
///
/// As with [`Obs`], a single [`Act`] carries the actions of all agents.
pub trait Act: Clone + Debug {
    /// Returns the number of per-agent actions in the object.
    fn len(&self) -> usize;
}
