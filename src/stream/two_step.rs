//! Two-step streaming: a single population array, updated in place by a pure
//! streaming pass followed by a separate collision pass. The two phases
//! cannot fuse because streaming reads every neighbor of the same array.

use crate::Float;
use crate::boundary::{BorderAdjacency, GhostRefresh, emplace_bounce_back};
use crate::collision::collide_all;
use crate::geometry::Geometry;
use crate::lattice::{self, D2Q9};
use crate::layout::{Layout, node_values};
use crate::solver::FlowField;

/// Advances one timestep in place.
pub fn step<L: Layout>(
    geometry: &Geometry,
    adjacency: &BorderAdjacency,
    refresh: &GhostRefresh,
    layout: L,
    omega: Float,
    values: &mut [Float],
) -> FlowField {
    let grid = geometry.grid();
    let fluid_nodes = geometry.fluid_nodes();

    // Wall ghosts receive the reflected populations first, so the streaming
    // pass below can treat every neighbor alike.
    emplace_bounce_back(adjacency, values, layout, 0);

    // In-place pull streaming. A population in direction d only ever depends
    // on other slots of direction d, so the traversal order per direction
    // group is what keeps unread values alive: directions {0,1,2,3} pull
    // from higher-indexed neighbors and must walk the fluid nodes in
    // ascending order, directions {5,6,7,8} pull from lower-indexed
    // neighbors and must walk them in descending order.
    for &node in fluid_nodes {
        for direction in [0, 1, 2, 3] {
            let from = grid.neighbor(node, D2Q9::inverse(direction));
            values[layout.index(node, direction)] = values[layout.index(from, direction)];
        }
    }
    for &node in fluid_nodes.iter().rev() {
        for direction in [5, 6, 7, 8] {
            let from = grid.neighbor(node, D2Q9::inverse(direction));
            values[layout.index(node, direction)] = values[layout.index(from, direction)];
        }
    }

    let mut field = FlowField::sentinel(grid.node_count());
    for &node in fluid_nodes {
        let f = node_values(values, node, layout);
        field.record(node, lattice::velocity(&f), lattice::density(&f));
    }

    collide_all(
        fluid_nodes,
        values,
        &field.velocities,
        &field.densities,
        layout,
        omega,
    );

    refresh.apply(values, layout, 0);
    field
}
