use anyhow::Result;
use glam::Vec3;
use pursuit_env::{
    AgentRole, EpisodeCoordinator, EvaderAgent, KinematicWorld, PhysicsWorld, PursuerAgent,
    PursuitEnvConfig,
};
use pursuit_env::display::NullDisplay;
use test_log::test;

fn random_point(rng: &mut fastrand::Rng) -> Vec3 {
    Vec3::new(1.0 + 19.0 * rng.f32(), 0.5, -10.0 + 9.0 * rng.f32())
}

// The shaping rewards of an episode without terminal event sum to
// `-10 * (initial distance - final distance)`, whatever the path.
#[test]
fn runner_shaping_telescopes() -> Result<()> {
    let config = PursuitEnvConfig::default();
    let mut rng = fastrand::Rng::with_seed(1234);

    for _ in 0..50 {
        let mut world = KinematicWorld::build(&config.arena)?;
        let mut coordinator = EpisodeCoordinator::new(&config, rng.u64(..), Box::new(NullDisplay));
        let mut runner = EvaderAgent::new(&config);
        runner.on_episode_begin(&mut world, &mut coordinator);
        let initial = world.distance();

        let mut total = 0.0f64;
        let n_waypoints = rng.usize(1..40);
        for _ in 0..n_waypoints {
            world.body_mut(AgentRole::Chaser).position = random_point(&mut rng);
            world.body_mut(AgentRole::Runner).position = random_point(&mut rng);
            total += runner.shape_reward(&world) as f64;
        }
        let expected = -10.0 * (initial - world.distance()) as f64;

        assert!(
            (total - expected).abs() < 1e-2,
            "sum {} != closed form {}",
            total,
            expected
        );
        assert!(!runner.episode_ended());
    }
    Ok(())
}

#[test]
fn chaser_shaping_is_the_mirror_of_runner_shaping() -> Result<()> {
    let config = PursuitEnvConfig::default();
    let mut rng = fastrand::Rng::with_seed(99);
    let mut world = KinematicWorld::build(&config.arena)?;
    let mut coordinator = EpisodeCoordinator::new(&config, 0, Box::new(NullDisplay));
    let mut chaser = PursuerAgent::new(&config);
    let mut runner = EvaderAgent::new(&config);
    chaser.on_episode_begin(&mut world, &mut coordinator);
    runner.on_episode_begin(&mut world, &mut coordinator);

    for _ in 0..20 {
        world.body_mut(AgentRole::Runner).position = random_point(&mut rng);
        let c = chaser.shape_reward(&world);
        let r = runner.shape_reward(&world);
        assert!((c + r).abs() < 1e-4);
    }
    Ok(())
}
