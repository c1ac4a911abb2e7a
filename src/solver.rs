use anyhow::{Result, bail, ensure};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::boundary::{self, GhostRefresh};
use crate::config::Config;
use crate::geometry::{Geometry, Grid};
use crate::lattice;
use crate::layout::{BundleLayout, CollisionLayout, Layout, LayoutKind, StreamLayout, set_node_values};
use crate::stream::{Algorithm, shift, swap, two_lattice, two_step};
use crate::{Float, Velocity};

/// Macroscopic state of the whole lattice at one timestep. Non-fluid slots
/// hold sentinels: velocity `[0, 0]` and density `-1`.
#[derive(Debug, Clone)]
pub struct FlowField {
    pub velocities: Vec<Velocity>,
    pub densities: Vec<Float>,
}

impl FlowField {
    pub fn sentinel(node_count: usize) -> Self {
        Self {
            velocities: vec![[0.0, 0.0]; node_count],
            densities: vec![-1.0; node_count],
        }
    }

    #[inline]
    pub(crate) fn record(&mut self, node: usize, velocity: Velocity, density: Float) {
        self.velocities[node] = velocity;
        self.densities[node] = density;
    }
}

/// The run driver: owns the domain, the configuration and the initial
/// macroscopic state, advances the chosen algorithm for the configured
/// number of timesteps and records the per-step moment fields.
pub struct Simulation {
    config: Config,
    geometry: Geometry,
    initial_velocities: Vec<Velocity>,
    initial_densities: Vec<Float>,
}

impl Simulation {
    /// Builds a channel simulation from configuration alone. The initial
    /// state is at rest at the inlet density, with the inlet and outlet
    /// ghost columns primed with their prescribed values.
    pub fn new(config: Config) -> Result<Self> {
        let grid = Grid::new(config.domain.width, config.domain.height)?;
        let geometry = Geometry::channel_with_solids(grid, &config.domain.obstacles)?;
        Self::with_geometry(config, geometry)
    }

    /// Builds a simulation on an externally prepared domain.
    pub fn with_geometry(config: Config, geometry: Geometry) -> Result<Self> {
        config.validate()?;
        let grid = geometry.grid();
        ensure!(
            grid.width() == config.domain.width && grid.height() == config.domain.height,
            "geometry is {}x{} but the configuration says {}x{}",
            grid.width(),
            grid.height(),
            config.domain.width,
            config.domain.height
        );

        let node_count = grid.node_count();
        let mut initial_velocities = vec![[0.0, 0.0]; node_count];
        let mut initial_densities = vec![config.physics.inlet_density; node_count];
        for node in 0..node_count {
            if geometry.is_inlet(node) {
                initial_velocities[node] = config.physics.inlet_velocity;
            } else if geometry.is_outlet(node) {
                initial_velocities[node] = config.physics.outlet_velocity;
                initial_densities[node] = config.physics.outlet_density;
            }
        }

        Ok(Self {
            config,
            geometry,
            initial_velocities,
            initial_densities,
        })
    }

    /// Replaces the initial macroscopic state. One `(velocity, density)`
    /// pair per node; populations are prepared from these via equilibrium.
    pub fn with_initial_moments(
        mut self,
        velocities: Vec<Velocity>,
        densities: Vec<Float>,
    ) -> Result<Self> {
        let node_count = self.geometry.grid().node_count();
        ensure!(
            velocities.len() == node_count && densities.len() == node_count,
            "initial moments must cover all {node_count} nodes"
        );
        self.initial_velocities = velocities;
        self.initial_densities = densities;
        Ok(self)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the configured number of timesteps and returns the per-step
    /// moment fields, oldest first.
    pub fn run(&self) -> Result<Vec<FlowField>> {
        let algorithm = self.config.simulation.algorithm;
        let grid = self.geometry.grid();
        let buffer_nodes = match algorithm {
            Algorithm::Shift => shift::buffer_nodes(grid),
            _ => grid.node_count(),
        };

        info!(
            "running {} algorithm on {}x{} domain for {} iterations ({} layout, tau = {})",
            algorithm.name(),
            grid.width(),
            grid.height(),
            self.config.simulation.iterations,
            match self.config.simulation.layout {
                LayoutKind::Collision => "collision",
                LayoutKind::Stream => "stream",
                LayoutKind::Bundle => "bundle",
            },
            self.config.physics.tau,
        );

        match self.config.simulation.layout {
            LayoutKind::Collision => self.run_with(CollisionLayout, buffer_nodes),
            LayoutKind::Stream => self.run_with(StreamLayout::new(buffer_nodes), buffer_nodes),
            LayoutKind::Bundle => self.run_with(BundleLayout::new(buffer_nodes), buffer_nodes),
        }
    }

    fn run_with<L: Layout>(&self, layout: L, buffer_nodes: usize) -> Result<Vec<FlowField>> {
        let grid = self.geometry.grid();
        let algorithm = self.config.simulation.algorithm;
        let omega = self.config.omega();
        let iterations = self.config.simulation.iterations;
        let refresh = GhostRefresh::new(grid, &self.config.physics);

        // Populations start in equilibrium with the initial moments; the
        // shift buffer's extra window stays zero until first written.
        let mut values = vec![0.0; buffer_nodes * lattice::D2Q9::Q];
        for node in 0..grid.node_count() {
            let f = lattice::equilibrium(self.initial_velocities[node], self.initial_densities[node]);
            set_node_values(&mut values, node, &f, layout);
        }

        // Descriptors are built once and reused across all timesteps.
        let bsi = boundary::border_swap_info(&self.geometry);
        let adjacency = boundary::border_adjacency(&self.geometry);
        let swap_info = swap::swap_descriptor(&self.geometry);
        debug!("{} border nodes adjacent to walls", bsi.len());

        let mut ping_pong = match algorithm {
            Algorithm::TwoLattice => Some(values.clone()),
            _ => None,
        };

        let progress = ProgressBar::new(iterations as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .expect("static progress template is valid")
                .progress_chars("=> "),
        );

        let mut timeline = Vec::with_capacity(iterations);
        for iteration in 0..iterations {
            let field = match algorithm {
                Algorithm::TwoLattice => {
                    let destination = ping_pong.as_mut().expect("two-lattice owns a second buffer");
                    let field = two_lattice::step(
                        &self.geometry,
                        &bsi,
                        &refresh,
                        layout,
                        omega,
                        &values,
                        destination,
                    );
                    std::mem::swap(&mut values, destination);
                    field
                }
                Algorithm::TwoStep => two_step::step(
                    &self.geometry,
                    &adjacency,
                    &refresh,
                    layout,
                    omega,
                    &mut values,
                ),
                Algorithm::Swap => swap::step(
                    &self.geometry,
                    &swap_info,
                    &refresh,
                    layout,
                    omega,
                    &mut values,
                ),
                Algorithm::Shift => shift::step(
                    &self.geometry,
                    &adjacency,
                    &refresh,
                    layout,
                    omega,
                    &mut values,
                    iteration,
                ),
            };

            self.check_step(&field, iteration)?;
            timeline.push(field);
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!("completed {} iterations", iterations);
        Ok(timeline)
    }

    /// A corrupted step makes the whole run meaningless; abort naming the
    /// step and the first offending node.
    fn check_step(&self, field: &FlowField, iteration: usize) -> Result<()> {
        for &node in self.geometry.fluid_nodes() {
            let density = field.densities[node];
            let [ux, uy] = field.velocities[node];
            if !density.is_finite() || !ux.is_finite() || !uy.is_finite() {
                bail!(
                    "invariant violation at step {iteration}: non-finite state at node {node}"
                );
            }
            if density <= 0.0 {
                bail!(
                    "invariant violation at step {iteration}: non-positive density {density} at node {node}"
                );
            }
        }
        Ok(())
    }
}
