//! Shift streaming: one buffer enlarged by `width + 1` nodes, holding two
//! overlapping windows. Each step reads the populations from one window and
//! writes them to the other, so node addresses translate uniformly by the
//! shift offset and the pass fuses streaming with collision like
//! two-lattice. The traversal direction alternates with the window roles so
//! destination writes never overtake pending source reads.

use crate::Float;
use crate::boundary::{BorderAdjacency, GhostRefresh, emplace_bounce_back};
use crate::collision::collide_bgk;
use crate::geometry::{Geometry, Grid};
use crate::lattice::{self, D2Q9};
use crate::layout::{Layout, set_node_values};
use crate::solver::FlowField;

/// Window displacement between even and odd steps. One full row plus one
/// node: exactly the largest forward neighbor distance, which is what makes
/// the in-buffer shift race-free.
pub fn shift_offset(grid: Grid) -> usize {
    grid.width() + 1
}

/// Number of node slots the shift buffer must hold.
pub fn buffer_nodes(grid: Grid) -> usize {
    grid.node_count() + shift_offset(grid)
}

/// Advances one timestep. Even iterations read window 0 and write the
/// shifted window; odd iterations do the reverse.
pub fn step<L: Layout>(
    geometry: &Geometry,
    adjacency: &BorderAdjacency,
    refresh: &GhostRefresh,
    layout: L,
    omega: Float,
    values: &mut [Float],
    iteration: usize,
) -> FlowField {
    let grid = geometry.grid();
    let offset = shift_offset(grid);
    let (read_offset, write_offset) = if iteration % 2 == 0 {
        (0, offset)
    } else {
        (offset, 0)
    };

    emplace_bounce_back(adjacency, values, layout, read_offset);

    let mut field = FlowField::sentinel(grid.node_count());
    if write_offset > read_offset {
        // Writes land ahead of the reads: walk backwards.
        for &node in geometry.fluid_nodes().iter().rev() {
            fused_node(grid, node, read_offset, write_offset, layout, omega, values, &mut field);
        }
    } else {
        for &node in geometry.fluid_nodes() {
            fused_node(grid, node, read_offset, write_offset, layout, omega, values, &mut field);
        }
    }

    refresh.apply(values, layout, write_offset);
    field
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn fused_node<L: Layout>(
    grid: Grid,
    node: usize,
    read_offset: usize,
    write_offset: usize,
    layout: L,
    omega: Float,
    values: &mut [Float],
    field: &mut FlowField,
) {
    let mut f = [0.0; 9];
    for (direction, value) in f.iter_mut().enumerate() {
        let from = grid.neighbor(node, D2Q9::inverse(direction));
        *value = values[layout.index(from + read_offset, direction)];
    }

    let density = lattice::density(&f);
    let velocity = lattice::velocity(&f);
    field.record(node, velocity, density);

    let collided = collide_bgk(&f, velocity, density, omega);
    set_node_values(values, node + write_offset, &collided, layout);
}
