use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::geometry::{Geometry, Grid};
use crate::lattice::{self, D2Q9};
use crate::layout::{Layout, node_values, set_node_values};
use crate::{Float, Velocity};

/// One border-swap record: a fluid node together with the streaming
/// directions that point at a wall ghost (solid node or top/bottom ghost
/// row). Built once and reused every step so the hot loops never test phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderNode {
    pub node: usize,
    pub directions: Vec<usize>,
}

/// Border-swap information for the whole domain, in fluid-node order.
pub type BorderSwapInfo = Vec<BorderNode>;

/// Like [`BorderNode`], but with the ghost neighbor index stored alongside
/// each direction; saves the neighbor computation on the emplacement path.
#[derive(Debug, Clone)]
pub struct AdjacentBorderNode {
    pub node: usize,
    pub links: Vec<BorderLink>,
}

#[derive(Debug, Clone, Copy)]
pub struct BorderLink {
    pub direction: usize,
    pub ghost: usize,
}

pub type BorderAdjacency = Vec<AdjacentBorderNode>;

/// Collects, per fluid node, the streaming directions that point at wall
/// ghosts. Fluid nodes next to the top or bottom ghost row qualify
/// automatically; inlet and outlet ghosts are excluded because their
/// populations are rewritten by the ghost refresh anyway.
pub fn border_swap_info(geometry: &Geometry) -> BorderSwapInfo {
    let grid = geometry.grid();
    let mut result = Vec::new();
    for &node in geometry.fluid_nodes() {
        let directions: Vec<usize> = D2Q9::STREAMING
            .into_iter()
            .filter(|&direction| geometry.is_non_inout_ghost(grid.neighbor(node, direction)))
            .collect();
        if !directions.is_empty() {
            result.push(BorderNode { node, directions });
        }
    }
    result
}

/// The border-adjacency variant of [`border_swap_info`].
pub fn border_adjacency(geometry: &Geometry) -> BorderAdjacency {
    let grid = geometry.grid();
    let mut result = Vec::new();
    for &node in geometry.fluid_nodes() {
        let links: Vec<BorderLink> = D2Q9::STREAMING
            .into_iter()
            .filter_map(|direction| {
                let ghost = grid.neighbor(node, direction);
                geometry
                    .is_non_inout_ghost(ghost)
                    .then_some(BorderLink { direction, ghost })
            })
            .collect();
        if !links.is_empty() {
            result.push(AdjacentBorderNode { node, links });
        }
    }
    result
}

/// The directions whose incoming populations must come from reflection
/// rather than regular streaming: the inverses of the ghost-pointing ones.
pub fn bounce_back_directions(entry: &BorderNode) -> Vec<usize> {
    entry.directions.iter().map(|&d| D2Q9::inverse(d)).collect()
}

/// Halfway bounce-back, ghost-node realisation: every border node puts its
/// outgoing population into the wall neighbor's inverse slot, so a later
/// streaming pass pulls it back as the reflected value. Intended for the
/// two-step, swap and shift algorithms; runs before streaming.
///
/// `offset` shifts all node indices, for algorithms whose live window does
/// not start at node 0.
pub fn emplace_bounce_back<L: Layout>(
    adjacency: &BorderAdjacency,
    values: &mut [Float],
    layout: L,
    offset: usize,
) {
    for entry in adjacency {
        for link in &entry.links {
            values[layout.index(link.ghost + offset, D2Q9::inverse(link.direction))] =
                values[layout.index(entry.node + offset, link.direction)];
        }
    }
}

/// Which macroscopic quantities are prescribed at the inlet and outlet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRegime {
    /// Velocity profiles at both ends; ghost densities reflected from the
    /// adjacent fluid node.
    VelocityVelocity,
    /// Prescribed inlet velocity and density, prescribed outlet density with
    /// the outlet velocity copied from the adjacent fluid node.
    #[default]
    VelocityDensity,
    /// Prescribed densities at both ends; inlet at rest, outlet velocity
    /// copied from the adjacent fluid node.
    DensityDensity,
}

/// Discrete laminar (Poiseuille) profile across the channel: parabolic in y,
/// peaking at twice the mean velocity on the center line.
pub fn ideal_laminar(height: usize, mean: Velocity) -> Vec<Velocity> {
    let middle = height as Float / 2.0;
    let radius = (height - 2) as Float / 2.0;
    (0..height)
        .map(|y| {
            let offset = (y as Float + 0.5 - middle) / radius;
            [2.0 * mean[0] * (1.0 - offset * offset), 0.0]
        })
        .collect()
}

/// Discrete turbulent profile by the one-seventh power rule.
pub fn seventh_rule_turbulent(height: usize, mean: Velocity) -> Vec<Velocity> {
    let middle = height as Float / 2.0;
    let radius = (height - 2) as Float / 2.0;
    (0..height)
        .map(|y| {
            let offset = ((y as Float + 0.5 - middle) / radius).abs();
            [1.1 * mean[0] * (1.0 - offset.powi(7)), 0.0]
        })
        .collect()
}

/// Rewrites the inlet and outlet ghost columns after each step.
///
/// For every ghost node at x = 0 or x = W-1, y in [1, H-2], the regime
/// determines `(u, rho)` and the node's nine populations are set to the
/// corresponding equilibrium, ready to be streamed in next step.
#[derive(Debug, Clone)]
pub struct GhostRefresh {
    grid: Grid,
    regime: BoundaryRegime,
    inlet_velocity: Velocity,
    inlet_density: Float,
    outlet_density: Float,
    inlet_profile: Vec<Velocity>,
    outlet_profile: Vec<Velocity>,
}

impl GhostRefresh {
    pub fn new(grid: Grid, physics: &PhysicsConfig) -> Self {
        Self {
            grid,
            regime: physics.boundary_regime,
            inlet_velocity: physics.inlet_velocity,
            inlet_density: physics.inlet_density,
            outlet_density: physics.outlet_density,
            inlet_profile: ideal_laminar(grid.height(), physics.inlet_velocity),
            outlet_profile: seventh_rule_turbulent(grid.height(), physics.outlet_velocity),
        }
    }

    pub fn apply<L: Layout>(&self, values: &mut [Float], layout: L, offset: usize) {
        let grid = self.grid;
        for y in 1..grid.height() - 1 {
            let inlet = grid.node_index(0, y);
            let adjacent = node_values(values, grid.neighbor(inlet, 5) + offset, layout);
            let (u, rho) = match self.regime {
                BoundaryRegime::VelocityVelocity => (
                    self.inlet_profile[y],
                    2.0 * self.inlet_density - lattice::density(&adjacent),
                ),
                BoundaryRegime::VelocityDensity => (self.inlet_velocity, self.inlet_density),
                BoundaryRegime::DensityDensity => ([0.0, 0.0], self.inlet_density),
            };
            set_node_values(values, inlet + offset, &lattice::equilibrium(u, rho), layout);

            let outlet = grid.node_index(grid.width() - 1, y);
            let adjacent = node_values(values, grid.neighbor(outlet, 3) + offset, layout);
            let (u, rho) = match self.regime {
                BoundaryRegime::VelocityVelocity => (
                    self.outlet_profile[y],
                    2.0 * self.outlet_density - lattice::density(&adjacent),
                ),
                BoundaryRegime::VelocityDensity | BoundaryRegime::DensityDensity => {
                    (lattice::velocity(&adjacent), self.outlet_density)
                }
            };
            set_node_values(values, outlet + offset, &lattice::equilibrium(u, rho), layout);
        }
    }
}
