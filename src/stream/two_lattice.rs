//! Two-lattice streaming: two population arrays alternate between source and
//! destination roles each timestep. Because reads and writes never alias,
//! streaming, moment computation and collision fuse into one pass per node.

use crate::Float;
use crate::boundary::{BorderSwapInfo, GhostRefresh};
use crate::collision::collide_bgk;
use crate::geometry::Geometry;
use crate::lattice::{self, D2Q9};
use crate::layout::{Layout, set_node_values};
use crate::solver::FlowField;

/// Advances one timestep, reading `source` and writing `destination`.
/// The caller swaps the two arrays afterwards.
pub fn step<L: Layout>(
    geometry: &Geometry,
    bsi: &BorderSwapInfo,
    refresh: &GhostRefresh,
    layout: L,
    omega: Float,
    source: &[Float],
    destination: &mut [Float],
) -> FlowField {
    let grid = geometry.grid();
    let mut field = FlowField::sentinel(grid.node_count());
    // Both lists ascend, so the border entries are consumed in step.
    let mut border = bsi.iter().peekable();

    for &node in geometry.fluid_nodes() {
        // Pull each population from the neighbor it streams in from.
        let mut f = [0.0; 9];
        for (direction, value) in f.iter_mut().enumerate() {
            let from = grid.neighbor(node, D2Q9::inverse(direction));
            *value = source[layout.index(from, direction)];
        }

        // Wall sides: the inverted-direction bounce-back realisation. The
        // reflected populations come from the node's own outgoing values of
        // the previous step instead of the ghost slots.
        if let Some(entry) = border.next_if(|entry| entry.node == node) {
            for &direction in &entry.directions {
                f[D2Q9::inverse(direction)] = source[layout.index(node, direction)];
            }
        }

        let density = lattice::density(&f);
        let velocity = lattice::velocity(&f);
        field.record(node, velocity, density);

        let collided = collide_bgk(&f, velocity, density, omega);
        set_node_values(destination, node, &collided, layout);
    }

    refresh.apply(destination, layout, 0);
    field
}
