//! This module is used for tests.
use crate::{record::Record, Act, Env, Obs, Policy, Step};
use anyhow::Result;

#[derive(Clone, Debug)]
pub struct CountObs(pub usize);

impl Obs for CountObs {
    fn len(&self) -> usize {
        2
    }
}

#[derive(Clone, Debug)]
pub struct ScaleAct(pub f32);

impl Act for ScaleAct {
    fn len(&self) -> usize {
        2
    }
}

/// Two agents receiving `+a` and `-a` for `n` steps.
pub struct CountdownEnv {
    n: usize,
    count: usize,
}

impl Env for CountdownEnv {
    type Config = usize;
    type Obs = CountObs;
    type Act = ScaleAct;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            n: *config,
            count: 0,
        })
    }

    fn n_agents(&self) -> usize {
        2
    }

    fn step(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        self.count += 1;
        let done = (self.count >= self.n) as i8;
        let mut record = Record::empty();
        if done == 1 {
            record = Record::from_scalar("episode_length", self.count as f32);
        }
        let step = Step::new(
            CountObs(self.count),
            a.clone(),
            vec![a.0, -a.0],
            vec![done, done],
            vec![0, 0],
            (),
            None,
        );
        (step, record)
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.count = 0;
        Ok(CountObs(0))
    }

    fn step_with_reset(&mut self, a: &Self::Act) -> (Step<Self>, Record) {
        let (mut step, record) = self.step(a);
        if step.is_done() {
            step.init_obs = self.reset().ok();
        }
        (step, record)
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }
}

pub struct ConstPolicy(pub f32);

impl Policy<CountdownEnv> for ConstPolicy {
    fn sample(&mut self, _obs: &CountObs) -> ScaleAct {
        ScaleAct(self.0)
    }
}
