//! Boundary machinery checked in isolation: exact bounce-back reflection
//! through ghost emplacement plus one streaming pull, and the three
//! inlet/outlet regimes.

mod common;

use common::{channel_config, magnitude};
use lbm2d::boundary::{self, BorderNode};
use lbm2d::layout::{CollisionLayout, Layout, node_values, set_node_values};
use lbm2d::{BoundaryRegime, D2Q9, Float, Geometry, Grid, Simulation};

/// A node with border directions {5, 7, 8} must see its outgoing
/// populations come back inverted, exactly.
#[test]
fn bounce_back_reflects_exactly() {
    let grid = Grid::new(5, 5).unwrap();
    // Walls to the right, above, and diagonally up-right of (2,2).
    let geometry = Geometry::channel_with_solids(grid, &[(3, 2), (2, 3), (3, 3)]).unwrap();
    let node = grid.node_index(2, 2);

    let bsi = boundary::border_swap_info(&geometry);
    let entry = bsi.iter().find(|entry| entry.node == node).unwrap();
    assert_eq!(
        *entry,
        BorderNode {
            node,
            directions: vec![5, 7, 8],
        }
    );
    assert_eq!(boundary::bounce_back_directions(entry), vec![3, 1, 0]);

    let layout = CollisionLayout;
    let mut values = vec![0.0; grid.node_count() * D2Q9::Q];
    let outgoing = [0.0, 0.0, 0.0, 0.0, 0.0, 0.11, 0.0, 0.13, 0.17];
    set_node_values(&mut values, node, &outgoing, layout);

    let adjacency = boundary::border_adjacency(&geometry);
    boundary::emplace_bounce_back(&adjacency, &mut values, layout, 0);

    // One streaming pull at the node.
    let mut streamed = [0.0; 9];
    for (direction, value) in streamed.iter_mut().enumerate() {
        let from = grid.neighbor(node, D2Q9::inverse(direction));
        *value = values[layout.index(from, direction)];
    }

    assert_eq!(streamed[3], 0.11); // reflected f5
    assert_eq!(streamed[1], 0.13); // reflected f7
    assert_eq!(streamed[0], 0.17); // reflected f8
}

fn run_regime(regime: BoundaryRegime) -> (Simulation, Vec<lbm2d::FlowField>) {
    let mut config = channel_config(9, 15, 60);
    config.physics.boundary_regime = regime;
    let simulation = Simulation::new(config).unwrap();
    let timeline = simulation.run().unwrap();
    (simulation, timeline)
}

#[test]
fn velocity_density_regime_pins_the_outlet_density() {
    let (simulation, timeline) = run_regime(BoundaryRegime::VelocityDensity);
    let grid = simulation.geometry().grid();
    let field = timeline.last().unwrap();
    // The fluid column next to the outlet relaxes toward the prescribed
    // outlet density.
    for y in 1..grid.height() - 1 {
        let node = grid.node_index(grid.width() - 2, y);
        assert!((field.densities[node] - 1.0).abs() < 0.05);
    }
    // And the inlet keeps driving the flow.
    let probe = grid.node_index(1, grid.height() / 2);
    assert!(field.velocities[probe][0] > 0.01);
}

#[test]
fn velocity_velocity_regime_drives_both_ends() {
    let (simulation, timeline) = run_regime(BoundaryRegime::VelocityVelocity);
    let grid = simulation.geometry().grid();
    let field = timeline.last().unwrap();
    let mid = grid.height() / 2;
    // The laminar inlet profile peaks at the center line.
    let center_in = field.velocities[grid.node_index(1, mid)][0];
    let edge_in = field.velocities[grid.node_index(1, 1)][0];
    assert!(center_in > edge_in);
    assert!(center_in > 0.03);
}

#[test]
fn density_density_regime_stays_at_rest_when_balanced() {
    // Equal densities at both ends and a resting inlet: no pressure
    // gradient, so nothing should start moving.
    let mut config = channel_config(9, 15, 40);
    config.physics.boundary_regime = BoundaryRegime::DensityDensity;
    config.physics.inlet_velocity = [0.0, 0.0];
    config.physics.outlet_velocity = [0.0, 0.0];
    let simulation = Simulation::new(config).unwrap();
    let timeline = simulation.run().unwrap();
    let field = timeline.last().unwrap();
    for &node in simulation.geometry().fluid_nodes() {
        assert!((field.densities[node] - 1.0).abs() < 1e-12);
        assert!(magnitude(field.velocities[node]) < 1e-12);
    }
}

#[test]
fn unbalanced_densities_push_flow_through() {
    let mut config = channel_config(9, 15, 120);
    config.physics.boundary_regime = BoundaryRegime::DensityDensity;
    config.physics.inlet_density = 1.05;
    config.physics.outlet_density = 1.0;
    let simulation = Simulation::new(config).unwrap();
    let grid = simulation.geometry().grid();
    let timeline = simulation.run().unwrap();
    let field = timeline.last().unwrap();
    let probe = grid.node_index(grid.width() / 2, grid.height() / 2);
    assert!(
        field.velocities[probe][0] > 0.0,
        "pressure gradient failed to drive flow: {:?}",
        field.velocities[probe]
    );
}

#[test]
fn ghost_refresh_never_touches_fluid_slots() {
    let geometry = Geometry::channel(Grid::new(7, 7).unwrap());
    let grid = geometry.grid();
    let layout = CollisionLayout;
    let physics = lbm2d::config::PhysicsConfig::default();
    let refresh = boundary::GhostRefresh::new(grid, &physics);

    let mut values: Vec<Float> = (0..grid.node_count() * D2Q9::Q)
        .map(|i| i as Float)
        .collect();
    let before = values.clone();
    refresh.apply(&mut values, layout, 0);

    for node in 0..grid.node_count() {
        let (x, _) = grid.coords(node);
        if x != 0 && x != grid.width() - 1 {
            assert_eq!(
                node_values(&values, node, layout),
                node_values(&before, node, layout),
                "refresh modified interior node {node}"
            );
        }
    }
}
