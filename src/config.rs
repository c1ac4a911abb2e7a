use anyhow::ensure;
use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryRegime;
use crate::layout::LayoutKind;
use crate::stream::Algorithm;
use crate::{Float, Velocity};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub domain: DomainConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainConfig {
    pub width: usize,
    pub height: usize,
    /// Interior cells to mark solid, as `[x, y]` pairs.
    #[serde(default)]
    pub obstacles: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// BGK relaxation time; must stay above 0.5 for stability.
    pub tau: Float,
    pub inlet_velocity: Velocity,
    pub outlet_velocity: Velocity,
    pub inlet_density: Float,
    pub outlet_density: Float,
    pub boundary_regime: BoundaryRegime,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            tau: 1.4,
            inlet_velocity: [0.05, 0.0],
            outlet_velocity: [0.05, 0.0],
            inlet_density: 1.0,
            outlet_density: 1.0,
            boundary_regime: BoundaryRegime::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub iterations: usize,
    #[serde(default)]
    pub algorithm: Algorithm,
    #[serde(default)]
    pub layout: LayoutKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    /// Write a VTK snapshot every this many steps; 0 disables file output.
    pub frequency: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            frequency: 0,
        }
    }
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.domain.width >= 3 && self.domain.height >= 3,
            "domain must be at least 3x3, got {}x{}",
            self.domain.width,
            self.domain.height
        );
        ensure!(
            self.physics.tau > 0.5,
            "relaxation time tau must exceed 0.5 (BGK stability), got {}",
            self.physics.tau
        );
        ensure!(
            self.physics.inlet_velocity.iter().all(|v| v.is_finite())
                && self.physics.outlet_velocity.iter().all(|v| v.is_finite()),
            "boundary velocities must be finite"
        );
        ensure!(
            self.physics.inlet_density > 0.0 && self.physics.outlet_density > 0.0,
            "boundary densities must be positive"
        );
        ensure!(
            self.simulation.iterations > 0,
            "iteration count must be positive"
        );
        Ok(())
    }

    /// Relaxation rate `omega = 1 / tau`.
    pub fn omega(&self) -> Float {
        1.0 / self.physics.tau
    }
}
