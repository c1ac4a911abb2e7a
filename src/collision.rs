use crate::lattice::{self, D2Q9};
use crate::layout::{Layout, node_values, set_node_values};
use crate::{Float, Velocity};

/// BGK collision for one node: relax the populations toward the equilibrium
/// of the local macroscopic state, `f + omega * (f_eq - f)` with
/// `omega = 1 / tau`. Node-local; neighbors are never read.
pub fn collide_bgk(f: &[Float; 9], u: Velocity, density: Float, omega: Float) -> [Float; 9] {
    let f_eq = lattice::equilibrium(u, density);
    let mut result = *f;
    for d in 0..D2Q9::Q {
        result[d] += omega * (f_eq[d] - result[d]);
    }
    result
}

/// BGK collision over the whole fluid set, using moments recorded by an
/// earlier pass. The two-step algorithm needs this as a separate phase since
/// its in-place streaming cannot fuse with collision.
pub fn collide_all<L: Layout>(
    fluid_nodes: &[usize],
    values: &mut [Float],
    velocities: &[Velocity],
    densities: &[Float],
    layout: L,
    omega: Float,
) {
    for &node in fluid_nodes {
        let f = node_values(values, node, layout);
        let result = collide_bgk(&f, velocities[node], densities[node], omega);
        set_node_values(values, node, &result, layout);
    }
}
