//! Environment.
use super::{Act, Info, Obs, Step};
use crate::record::Record;
use anyhow::Result;

/// An episodic environment driven by one or more agents.
///
/// An environment may host several agents acting simultaneously. They share the
/// episode: rewards are reported per agent in [`Step::reward`], while an episode ends
/// for all agents at once.
pub trait Env {
    /// Parameters the environment is built from.
    type Config: Clone;

    /// Observation of all agents.
    type Obs: Obs;

    /// Joint action of all agents.
    type Act: Act;

    /// Extra information attached to every [`Step`].
    type Info: Info;

    /// Builds the environment. `seed` initializes its random number generator.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Returns the number of agents acting in the environment.
    fn n_agents(&self) -> usize {
        1
    }

    /// Applies the actions of all agents for one decision step.
    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Starts a new episode and returns its initial observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Same as [`Env::step`], but starts the next episode when the current one ends.
    ///
    /// The initial observation of the next episode is stored in [`Step::init_obs`].
    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record)
    where
        Self: Sized;

    /// Starts a new episode determined by `ix`.
    ///
    /// Implementations typically derive a random seed from `ix`, so that the `ix`-th
    /// evaluation episode is the same on every run. [`DefaultEvaluator`] calls this for
    /// each episode it runs.
    ///
    /// [`DefaultEvaluator`]: crate::DefaultEvaluator
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs>;
}
