//! Default implementation of the [`Evaluator`] trait.
//!
//! This module provides a simple evaluator that runs a fixed number of episodes
//! and calculates the average return of every agent across all episodes.
use super::Evaluator;
use crate::{
    error::PursuitError,
    record::{Record, RecordStorage, RecordValue},
    Env, Policy,
};
use anyhow::Result;
use log::info;

/// A default implementation of the [`Evaluator`] trait.
///
/// The returned [`Record`] contains `Episode return {i}` for each agent `i`, averaged
/// over episodes, merged with the aggregation of the records the environment emitted
/// at the last step of each episode (see [`RecordStorage::aggregate`]). A scalar
/// `key` always appears as `key_min`, `key_max`, `key_mean` and `key_median`, even
/// for a single episode.
///
/// # Examples
///
/// ```ignore
/// let config = PursuitEnvConfig::default();
/// let mut evaluator = DefaultEvaluator::<PursuitEnv>::new(&config, 42, 10)?;
///
/// // Evaluate a policy
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Runner return: {}", record.get_scalar("Episode return 1")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    /// Runs the episodes and averages the return of each agent.
    ///
    /// Each episode is started with [`Env::reset_with_index`], so evaluation with the
    /// same seed and number of episodes is reproducible.
    fn evaluate<P>(&mut self, policy: &mut P) -> Result<Record>
    where
        P: Policy<E>,
    {
        let mut r_total = vec![0f32; self.env.n_agents()];
        let mut storage = RecordStorage::new();

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs);
                let (step, record) = self.env.step(&act);
                for (total, r) in r_total.iter_mut().zip(step.reward.iter()) {
                    *total += r;
                }
                if step.is_done() {
                    storage.store(record);
                    break;
                }
                prev_obs = step.obs;
            }
        }

        let n = self.n_episodes as f32;
        let mean_returns = r_total.iter().map(|r| r / n).collect::<Vec<_>>();
        info!(
            "Evaluated {} episodes, mean returns = {:?}",
            self.n_episodes, mean_returns
        );

        let returns = mean_returns
            .into_iter()
            .enumerate()
            .map(|(i, r)| (format!("Episode return {}", i), RecordValue::Scalar(r)))
            .collect::<Vec<_>>();

        Ok(Record::from_slice(&returns).merge(storage.aggregate()))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the environment
    /// * `seed` - Random seed for environment initialization
    /// * `n_episodes` - Number of episodes to run during evaluation
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        if n_episodes == 0 {
            return Err(PursuitError::NoEpisodes.into());
        }
        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }

    /// Returns a reference to the environment used for evaluation.
    pub fn env(&self) -> &E {
        &self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountdownEnv, ConstPolicy};

    #[test]
    fn test_average_returns() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<CountdownEnv>::new(&3, 0, 4)?;
        let record = evaluator.evaluate(&mut ConstPolicy(1.0))?;

        // 3 steps of +1 and -1 for the two agents.
        assert_eq!(record.get_scalar("Episode return 0")?, 3.0);
        assert_eq!(record.get_scalar("Episode return 1")?, -3.0);
        assert_eq!(record.get_scalar("episode_length_mean")?, 3.0);
        Ok(())
    }

    #[test]
    fn test_single_episode_keeps_summary_keys() -> Result<()> {
        let mut evaluator = DefaultEvaluator::<CountdownEnv>::new(&2, 0, 1)?;
        let record = evaluator.evaluate(&mut ConstPolicy(1.0))?;
        assert_eq!(record.get_scalar("episode_length_mean")?, 2.0);
        assert_eq!(record.get_scalar("episode_length_median")?, 2.0);
        Ok(())
    }

    #[test]
    fn test_zero_episodes_is_an_error() {
        assert!(DefaultEvaluator::<CountdownEnv>::new(&3, 0, 0).is_err());
    }
}
