#![allow(dead_code)] // Shared across the integration suites; each uses a subset.

use lbm2d::config::{Config, DomainConfig, OutputConfig, PhysicsConfig, SimulationConfig};
use lbm2d::{Algorithm, Float, LayoutKind, Velocity};

pub fn channel_config(width: usize, height: usize, iterations: usize) -> Config {
    Config {
        domain: DomainConfig {
            width,
            height,
            obstacles: Vec::new(),
        },
        physics: PhysicsConfig::default(),
        simulation: SimulationConfig {
            iterations,
            algorithm: Algorithm::TwoLattice,
            layout: LayoutKind::Collision,
        },
        output: OutputConfig::default(),
    }
}

/// A quiescent configuration: walls, inlet and outlet all at rest with unit
/// density, so the uniform state is an exact fixed point.
pub fn resting_config(width: usize, height: usize, iterations: usize) -> Config {
    let mut config = channel_config(width, height, iterations);
    config.physics.inlet_velocity = [0.0, 0.0];
    config.physics.outlet_velocity = [0.0, 0.0];
    config
}

pub fn magnitude(u: Velocity) -> Float {
    (u[0] * u[0] + u[1] * u[1]).sqrt()
}

pub fn max_abs_diff(a: &[Float], b: &[Float]) -> Float {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, Float::max)
}
