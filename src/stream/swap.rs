//! Swap streaming: a single population array where streaming is emulated by
//! exchanging populations between neighbor pairs along the four positive
//! directions {5,6,7,8}. Each pair is owned by its lower node, so an
//! ascending traversal swaps every pair exactly once; a per-node reorder
//! afterwards restores the canonical direction order.

use crate::Float;
use crate::boundary::{BorderNode, BorderSwapInfo, GhostRefresh};
use crate::collision::collide_bgk;
use crate::geometry::Geometry;
use crate::lattice::{self, D2Q9};
use crate::layout::{Layout, node_values, set_node_values};
use crate::solver::FlowField;

/// Builds the initialisation descriptor for the swap algorithm.
///
/// Ghost neighbors need pre-treatment in exactly two cases, both derived
/// from the phase field:
///
/// - a wall ghost in a *positive* direction: the init swap parks the
///   outgoing population in the ghost, the main pass swaps it straight back,
///   and the restore step lands it in the inverse slot, which is halfway
///   bounce-back. Wall ghosts in negative directions reflect without any
///   help because their pair is never visited.
/// - an inlet/outlet ghost in a *negative* direction: the ghost's
///   equilibrium populations can only enter the node through an init swap,
///   since the pair's owner is the ghost itself and is never visited. In
///   positive directions the main pass already pulls from the ghost.
pub fn swap_descriptor(geometry: &Geometry) -> BorderSwapInfo {
    let grid = geometry.grid();
    let mut result = Vec::new();
    for &node in geometry.fluid_nodes() {
        let directions: Vec<usize> = D2Q9::STREAMING
            .into_iter()
            .filter(|&direction| {
                let ghost = grid.neighbor(node, direction);
                if direction > D2Q9::REST {
                    geometry.is_non_inout_ghost(ghost)
                } else {
                    geometry.is_inlet(ghost) || geometry.is_outlet(ghost)
                }
            })
            .collect();
        if !directions.is_empty() {
            result.push(BorderNode { node, directions });
        }
    }
    result
}

/// Advances one timestep in place.
pub fn step<L: Layout>(
    geometry: &Geometry,
    descriptor: &BorderSwapInfo,
    refresh: &GhostRefresh,
    layout: L,
    omega: Float,
    values: &mut [Float],
) -> FlowField {
    let grid = geometry.grid();
    let mut field = FlowField::sentinel(grid.node_count());

    // Border initialisation: pre-swap with the ghost neighbors listed in the
    // descriptor.
    for entry in descriptor {
        for &direction in &entry.directions {
            let partner = grid.neighbor(entry.node, direction);
            values.swap(
                layout.index(entry.node, direction),
                layout.index(partner, D2Q9::inverse(direction)),
            );
        }
    }

    // Main pass, ascending. Restoring order and colliding fuse into the same
    // loop: later nodes only ever touch slots of higher-indexed neighbors.
    for &node in geometry.fluid_nodes() {
        for direction in [5, 6, 7, 8] {
            let partner = grid.neighbor(node, direction);
            values.swap(
                layout.index(node, direction),
                layout.index(partner, D2Q9::inverse(direction)),
            );
        }

        // Undo the inverted storage left behind by the swaps. This also
        // completes the wall reflection for untouched pairs.
        for direction in [0, 1, 2, 3] {
            values.swap(
                layout.index(node, direction),
                layout.index(node, D2Q9::inverse(direction)),
            );
        }

        let f = node_values(values, node, layout);
        let density = lattice::density(&f);
        let velocity = lattice::velocity(&f);
        field.record(node, velocity, density);

        let collided = collide_bgk(&f, velocity, density, omega);
        set_node_values(values, node, &collided, layout);
    }

    refresh.apply(values, layout, 0);
    field
}
