use genedots::{
    ga::{Agent, DeathCause, Genome, GoalScoring, Status},
    util::world::{Goal, Rect, World},
};
use glam::DVec2;
use rand::{SeedableRng, rngs::StdRng};

/// World large enough that its edges never interfere, goal 100 pixels right of the origin
fn open_world() -> World {
    World {
        origin: DVec2::splat(-1000.0),
        width: 2000.0,
        height: 2000.0,
        margin: 2.0,
        start: DVec2::ZERO,
        goal: Goal {
            position: DVec2::new(100.0, 0.0),
            radius: 20.0,
        },
        obstacles: vec![],
    }
}

fn genome(directions: &[DVec2]) -> Genome {
    Genome::from_directions(directions, &mut StdRng::seed_from_u64(0))
}

#[test]
fn three_gene_run_exhausts_before_goal() {
    let world = open_world();
    let mut agent = Agent::new(genome(&[DVec2::X; 3]), world.start);

    let expected = [(1.0, 1.0), (2.0, 3.0), (3.0, 6.0)];
    for (velocity, position) in expected {
        assert_eq!(agent.step(&world, 15.0), None);
        assert_eq!(agent.velocity(), DVec2::new(velocity, 0.0));
        assert_eq!(agent.position(), DVec2::new(position, 0.0));
        assert_eq!(agent.status(), Status::Active);
    }
    assert!(agent.genome().is_exhausted());
    assert_eq!(agent.genome().cursor(), 3);

    let transition = agent.step(&world, 15.0);
    assert_eq!(transition, Some(Status::Dead(DeathCause::OutOfMoves)));
    assert_eq!(agent.position(), DVec2::new(6.0, 0.0));
    assert_eq!(agent.velocity(), DVec2::new(3.0, 0.0));
    assert_eq!(agent.goal_step(), None);
}

#[test]
fn velocity_is_capped() {
    let world = open_world();
    let mut agent = Agent::new(genome(&[DVec2::Y; 5]), world.start);

    for _ in 0..5 {
        agent.step(&world, 2.5);
    }

    assert!((agent.velocity().length() - 2.5).abs() < 1e-12);
    assert!((agent.position().y - (1.0 + 2.0 + 2.5 + 2.5 + 2.5)).abs() < 1e-12);
}

#[test]
fn reaching_goal_records_step() {
    let world = open_world();
    // 1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 66, 78, 91: inside radius 20 at step 13
    let mut agent = Agent::new(genome(&[DVec2::X; 20]), world.start);

    let mut ticks = 0;
    while agent.is_active() {
        agent.step(&world, 15.0);
        ticks += 1;
    }

    assert_eq!(agent.status(), Status::ReachedGoal);
    assert_eq!(ticks, 13);
    assert_eq!(agent.goal_step(), Some(13));
    assert_eq!(agent.position(), DVec2::new(91.0, 0.0));

    let fitness = agent.compute_fitness(&world.goal, GoalScoring::default());
    assert!((fitness - (1.0 / 16.0 + 1000.0 / 169.0)).abs() < 1e-12);
}

#[test]
fn edge_check_wins_over_obstacle() {
    let mut world = open_world();
    world.origin = DVec2::ZERO;
    world.width = 100.0;
    world.height = 100.0;
    world.goal.position = DVec2::new(90.0, 90.0);
    world.obstacles = vec![Rect::new(-10.0, 40.0, 20.0, 20.0)];

    let mut agent =
        Agent::new(genome(&[DVec2::NEG_X; 4]), DVec2::new(1.0, 50.0)).with_velocity(DVec2::NEG_X);

    let transition = agent.step(&world, 15.0);

    assert_eq!(agent.position(), DVec2::new(-1.0, 50.0));
    assert!(world.obstacles[0].contains(agent.position()));
    assert_eq!(transition, Some(Status::Dead(DeathCause::OutOfBounds)));
}

#[test]
fn goal_check_wins_over_obstacle() {
    let mut world = open_world();
    world.goal = Goal {
        position: DVec2::new(1.0, 0.0),
        radius: 5.0,
    };
    world.obstacles = vec![Rect::new(-10.0, -10.0, 20.0, 20.0)];
    let mut agent = Agent::new(genome(&[DVec2::X]), world.start);

    assert_eq!(agent.step(&world, 15.0), Some(Status::ReachedGoal));
}

#[test]
fn obstacles_are_checked_in_order() {
    let mut world = open_world();
    world.obstacles = vec![
        Rect::new(50.0, 50.0, 10.0, 10.0),
        Rect::new(0.0, -5.0, 10.0, 10.0),
        Rect::new(0.0, -5.0, 20.0, 10.0),
    ];
    let mut agent = Agent::new(genome(&[DVec2::X]), world.start);

    assert_eq!(
        agent.step(&world, 15.0),
        Some(Status::Dead(DeathCause::Obstacle(1)))
    );
}

#[test]
fn terminal_agent_never_moves_again() {
    let world = open_world();
    let mut agent = Agent::new(genome(&[DVec2::Y; 10]), world.start);
    agent.step(&world, 15.0);
    assert_eq!(
        agent.kill(DeathCause::OutOfBudget),
        Some(Status::Dead(DeathCause::OutOfBudget))
    );

    let (position, velocity, cursor) = (agent.position(), agent.velocity(), agent.genome().cursor());
    for _ in 0..5 {
        assert_eq!(agent.step(&world, 15.0), None);
        assert_eq!(agent.kill(DeathCause::OutOfBounds), None);
    }

    assert_eq!(agent.position(), position);
    assert_eq!(agent.velocity(), velocity);
    assert_eq!(agent.genome().cursor(), cursor);
    assert_eq!(agent.status(), Status::Dead(DeathCause::OutOfBudget));
}

#[test]
fn fitness_falls_off_with_distance() {
    let world = open_world();
    let mut near = Agent::new(genome(&[DVec2::X]), DVec2::new(60.0, 0.0));
    let mut far = Agent::new(genome(&[DVec2::X]), DVec2::new(0.0, 0.0));

    assert!((near.compute_fitness(&world.goal, GoalScoring::default()) - 1.0 / 1600.0).abs() < 1e-15);
    assert!((far.compute_fitness(&world.goal, GoalScoring::default()) - 1.0 / 10000.0).abs() < 1e-15);
}

#[test]
fn fitness_at_goal_center_is_finite() {
    let world = open_world();
    let mut agent = Agent::new(genome(&[DVec2::X]), world.goal.position);

    let fitness = agent.compute_fitness(&world.goal, GoalScoring::default());

    assert!(fitness.is_finite());
    assert!(fitness > 0.0);
}

#[test]
fn reproduce_resets_state() {
    let world = open_world();
    let mut parent = Agent::new(genome(&[DVec2::X; 20]), world.start);
    while parent.is_active() {
        parent.step(&world, 15.0);
    }
    parent.compute_fitness(&world.goal, GoalScoring::default());

    let child = parent.reproduce(DVec2::new(5.0, 5.0));
    assert_eq!(child.position(), DVec2::new(5.0, 5.0));
    assert_eq!(child.velocity(), DVec2::ZERO);
    assert_eq!(child.acceleration(), DVec2::ZERO);
    assert_eq!(child.status(), Status::Active);
    assert_eq!(child.fitness, 0.0);
    assert_eq!(child.goal_step(), None);
    assert!(!child.is_elite());
    assert_eq!(child.genome().cursor(), 0);
    assert_eq!(child.genome().genes(), parent.genome().genes());

    assert!(parent.reproduce_elite(world.start).is_elite());
}
