//! Utilities for interaction of agents and environments.
use crate::{
    record::{RecordValue, Recorder},
    Env, Policy,
};
use anyhow::Result;
use log::info;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Run episodes with a policy and recorder, returning the return of every agent
/// in every episode.
///
/// The entities interact as illustrated in the following diagram:
///
/// ```mermaid
/// graph LR
///     Env --> Obs
///     Obs --> Policy
///     Policy --> Act
///     Act --> Env
/// ```
///
/// Each step writes the record emitted by the environment, extended with
/// `episode`, `step` and `reward {i}` for each agent `i`, to `recorder`.
pub fn eval_with_recorder<E, P, R>(
    env: &mut E,
    policy: &mut P,
    n_episodes: usize,
    recorder: &mut R,
) -> Result<Vec<Vec<f32>>>
where
    E: Env,
    P: Policy<E>,
    R: Recorder,
{
    let mut rs = Vec::new();

    for episode in 0..n_episodes {
        let mut prev_obs = env.reset()?;
        let mut count_step = 0;
        let mut r_total = vec![0f32; env.n_agents()];

        loop {
            let act = policy.sample(&prev_obs);
            let (step, mut record) = env.step(&act);
            for (i, r) in step.reward.iter().enumerate() {
                r_total[i] += r;
                record.insert(format!("reward {}", i), RecordValue::Scalar(*r));
            }
            record.insert("episode", RecordValue::Scalar(episode as _));
            record.insert("step", RecordValue::Scalar(count_step as _));
            recorder.write(record);

            if step.is_done() {
                break;
            }
            prev_obs = step.obs;
            count_step += 1;
        }

        info!(
            "Episode {:?}, {:?} steps, returns = {:?}",
            episode,
            count_step + 1,
            r_total
        );
        rs.push(r_total);
    }

    Ok(rs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        record::BufferedRecorder,
        testing::{ConstPolicy, CountdownEnv},
    };

    #[test]
    fn test_eval_with_recorder_writes_every_step() -> Result<()> {
        let mut env = CountdownEnv::build(&2, 0)?;
        let mut recorder = BufferedRecorder::new();
        let rs = eval_with_recorder(&mut env, &mut ConstPolicy(0.5), 3, &mut recorder)?;

        assert_eq!(rs, vec![vec![1.0, -1.0]; 3]);
        assert_eq!(recorder.len(), 6);
        let last = recorder.iter().last().unwrap();
        assert_eq!(last.get_scalar("episode")?, 2.0);
        assert_eq!(last.get_scalar("step")?, 1.0);
        assert_eq!(last.get_scalar("reward 1")?, -0.5);
        Ok(())
    }
}
