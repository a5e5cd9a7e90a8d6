use anyhow::Result;
use clap::{Parser, ValueEnum};
use csv::WriterBuilder;
use log::info;
use pursuit_core::{
    record::{BufferedRecorder, Record},
    util, Configurable, DefaultEvaluator, Env as _, Evaluator as _,
};
use pursuit_env::{
    AgentPolicy, AgentRole, GreedyPolicy, IdlePolicy, KinematicWorld, PairPolicy, PursuitEnv,
    PursuitEnvConfig, RandomPolicy, RandomPolicyConfig,
};
use serde::Serialize;
use std::{convert::TryFrom, fs::File, path::PathBuf};

type Env = PursuitEnv<KinematicWorld>;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyKind {
    Idle,
    Random,
    Greedy,
}

/// Run chaser/runner episodes with scripted policies
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Policy of the chaser
    #[arg(long, value_enum, default_value_t = PolicyKind::Greedy)]
    chaser: PolicyKind,

    /// Policy of the runner
    #[arg(long, value_enum, default_value_t = PolicyKind::Random)]
    runner: PolicyKind,

    /// Number of episodes
    #[arg(short, long, default_value_t = 5)]
    n_episodes: usize,

    /// Random seed
    #[arg(short, long, default_value_t = 42)]
    seed: i64,

    /// Environment configuration in YAML; the default configuration is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the record of every step to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct PursuitRecord {
    episode: usize,
    step: usize,
    distance: f32,
    time_remaining: f32,
    chaser_reward: f32,
    runner_reward: f32,
}

impl TryFrom<&Record> for PursuitRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("step")? as _,
            distance: record.get_scalar("distance")?,
            time_remaining: record.get_scalar("time_remaining")?,
            chaser_reward: record.get_scalar("reward 0")?,
            runner_reward: record.get_scalar("reward 1")?,
        })
    }
}

fn create_policy(kind: PolicyKind, role: AgentRole, seed: i64) -> Box<dyn AgentPolicy> {
    match kind {
        PolicyKind::Idle => Box::new(IdlePolicy),
        PolicyKind::Random => Box::new(RandomPolicy::build(RandomPolicyConfig {
            seed: (seed as u64).wrapping_add(role.index() as u64),
            ..Default::default()
        })),
        PolicyKind::Greedy => Box::new(GreedyPolicy::new(role)),
    }
}

fn env_config(args: &Args) -> Result<PursuitEnvConfig> {
    match &args.config {
        Some(path) => PursuitEnvConfig::load(path),
        None => Ok(PursuitEnvConfig::default()),
    }
}

fn run(args: &Args) -> Result<()> {
    let config = env_config(args)?;
    let mut env = Env::build(&config, args.seed)?;
    let mut policy = PairPolicy::new(
        create_policy(args.chaser, AgentRole::Chaser, args.seed),
        create_policy(args.runner, AgentRole::Runner, args.seed),
    );
    let mut recorder = BufferedRecorder::new();

    let returns = util::eval_with_recorder(&mut env, &mut policy, args.n_episodes, &mut recorder)?;
    info!("Returns [chaser, runner] per episode: {:?}", returns);
    info!("Session: {:?}", env.session());

    if let Some(path) = &args.csv {
        let mut wtr = WriterBuilder::new().from_writer(File::create(path)?);
        for record in recorder.iter() {
            wtr.serialize(PursuitRecord::try_from(record)?)?;
        }
        wtr.flush()?;
    }

    Ok(())
}

fn eval(args: &Args) -> Result<Record> {
    let config = env_config(args)?;
    let mut evaluator = DefaultEvaluator::<Env>::new(&config, args.seed, args.n_episodes)?;
    let mut policy = PairPolicy::new(
        create_policy(args.chaser, AgentRole::Chaser, args.seed),
        create_policy(args.runner, AgentRole::Runner, args.seed),
    );
    let record = evaluator.evaluate(&mut policy)?;
    info!(
        "Capture rate: {}, mean returns: chaser {}, runner {}",
        record.get_scalar("captured_mean")?,
        record.get_scalar("Episode return 0")?,
        record.get_scalar("Episode return 1")?
    );
    Ok(record)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run(&args)?;
    eval(&args)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{create_policy, eval, run, Args, PolicyKind};
    use anyhow::Result;
    use pursuit_env::{AgentObs, AgentPolicy, AgentRole, DisplayKind, PursuitEnvConfig};
    use tempdir::TempDir;

    #[test]
    fn test_run_pursuit() -> Result<()> {
        let tmp_dir = TempDir::new("run_pursuit")?;
        let config_path = tmp_dir.path().join("config.yaml");
        PursuitEnvConfig::default()
            .display(DisplayKind::None)
            .episode_duration(2.0)
            .save(&config_path)?;

        let args = Args {
            chaser: PolicyKind::Greedy,
            runner: PolicyKind::Random,
            n_episodes: 2,
            seed: 0,
            config: Some(config_path),
            csv: Some(tmp_dir.path().join("steps.csv")),
        };
        run(&args)?;
        assert!(tmp_dir.path().join("steps.csv").exists());

        let record = eval(&args)?;
        let rate = record.get_scalar("captured_mean")?;
        assert!((0.0..=1.0).contains(&rate));
        Ok(())
    }

    #[test]
    fn test_negative_seed() {
        let obs = AgentObs::from(vec![0.0; 38]);
        for role in [AgentRole::Chaser, AgentRole::Runner] {
            let mut policy = create_policy(PolicyKind::Random, role, -1);
            let act = policy.act(&obs);
            assert!((-1.0..=1.0).contains(&act.move_x));
        }
    }
}
