//! End-to-end behavior of the channel simulation: quiescent states stay
//! put, enclosed nodes never move, and driven channels spin up toward a
//! steady sheared profile.

mod common;

use common::{channel_config, magnitude, resting_config};
use lbm2d::{Algorithm, Simulation};

const ALGORITHMS: [Algorithm; 4] = [
    Algorithm::TwoLattice,
    Algorithm::TwoStep,
    Algorithm::Swap,
    Algorithm::Shift,
];

#[test]
fn uniform_state_is_a_fixed_point() {
    for algorithm in ALGORITHMS {
        let mut config = resting_config(9, 9, 20);
        config.simulation.algorithm = algorithm;
        let simulation = Simulation::new(config).unwrap();
        let timeline = simulation.run().unwrap();
        for field in &timeline {
            for &node in simulation.geometry().fluid_nodes() {
                assert!(
                    (field.densities[node] - 1.0).abs() < 1e-12,
                    "{}: density drifted",
                    algorithm.name()
                );
                assert!(magnitude(field.velocities[node]) < 1e-12);
            }
        }
    }
}

#[test]
fn enclosed_node_keeps_its_state() {
    // A single fluid node at (2,2) of a 5x5 domain, walled in on all sides.
    let solids: Vec<(usize, usize)> = (1..4)
        .flat_map(|x| (1..4).map(move |y| (x, y)))
        .filter(|&cell| cell != (2, 2))
        .collect();

    for algorithm in ALGORITHMS {
        let mut config = resting_config(5, 5, 10);
        config.physics.tau = 1.0;
        config.domain.obstacles = solids.clone();
        config.simulation.algorithm = algorithm;

        let simulation = Simulation::new(config).unwrap();
        let grid = simulation.geometry().grid();
        let node = grid.node_index(2, 2);
        let timeline = simulation.run().unwrap();
        for field in &timeline {
            assert!(
                (field.densities[node] - 1.0).abs() < 1e-12,
                "{}: enclosed node density changed",
                algorithm.name()
            );
            assert!(magnitude(field.velocities[node]) < 1e-12);
        }
    }
}

#[test]
fn channel_spins_up_past_the_inflow_threshold() {
    let config = channel_config(9, 15, 100);
    let simulation = Simulation::new(config).unwrap();
    let grid = simulation.geometry().grid();
    let probe = grid.node_index(grid.width() / 2, grid.height() / 2);

    let timeline = simulation.run().unwrap();
    let history: Vec<f64> = timeline
        .iter()
        .map(|field| magnitude(field.velocities[probe]))
        .collect();

    // The mid-channel speed climbs and settles above 0.04.
    assert!(
        *history.last().unwrap() > 0.04,
        "mid-channel speed stalled at {}",
        history.last().unwrap()
    );
    // Coarse-grained monotone rise: compare ten-step averages.
    let windows: Vec<f64> = history
        .chunks(10)
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect();
    for pair in windows.windows(2) {
        assert!(pair[1] > pair[0] - 1e-3, "spin-up is not monotone: {pair:?}");
    }
    // Settled: the last ten steps barely move.
    let tail = &history[history.len() - 10..];
    let spread = tail.iter().cloned().fold(f64::MIN, f64::max)
        - tail.iter().cloned().fold(f64::MAX, f64::min);
    assert!(spread < 5e-3, "mid-channel speed still swinging by {spread}");
}

#[test]
fn developed_profile_is_sheared_and_symmetric() {
    let config = channel_config(9, 15, 300);
    let simulation = Simulation::new(config).unwrap();
    let grid = simulation.geometry().grid();

    let timeline = simulation.run().unwrap();
    let field = timeline.last().unwrap();
    let x = grid.width() / 2;
    let profile: Vec<f64> = (1..grid.height() - 1)
        .map(|y| field.velocities[grid.node_index(x, y)][0])
        .collect();

    // No-slip walls drag the near-wall flow well below the center line.
    let center = profile[profile.len() / 2];
    assert!(center > 1.2 * profile[0]);
    assert!(center > 1.2 * *profile.last().unwrap());
    // The setup is mirror-symmetric in y, so the profile must be too.
    for (a, b) in profile.iter().zip(profile.iter().rev()) {
        assert!((a - b).abs() < 1e-10);
    }
    // Monotone from each wall to the center.
    let mid = profile.len() / 2;
    for pair in profile[..=mid].windows(2) {
        assert!(pair[1] > pair[0] - 1e-9);
    }
}

#[test]
fn corrupt_configuration_is_rejected() {
    let mut config = channel_config(9, 15, 10);
    config.physics.tau = 0.4;
    assert!(Simulation::new(config).is_err());

    let mut config = channel_config(9, 15, 10);
    config.domain.obstacles = vec![(0, 0)];
    assert!(Simulation::new(config).is_err());

    let mut config = channel_config(9, 15, 10);
    config.simulation.iterations = 0;
    assert!(Simulation::new(config).is_err());
}
