use crate::{Float, Velocity};

/// D2Q9 Lattice-Boltzmann model constants.
///
/// Directions follow the Mattila ordering, which enumerates the stencil
/// row-major from the lower left:
///
/// ```text
///  6  7  8
///  3  4  5
///  0  1  2
/// ```
///
/// so that the inverse of direction `d` is always `8 - d`.
pub struct D2Q9;

impl D2Q9 {
    /// Number of discrete velocities
    pub const Q: usize = 9;

    /// Index of the rest direction
    pub const REST: usize = 4;

    /// Discrete velocities (9 directions in 2D)
    pub const VELOCITIES: [[i32; 2]; 9] = [
        // Lower row
        [-1, -1], [0, -1], [1, -1],
        // Middle row (includes rest)
        [-1, 0], [0, 0], [1, 0],
        // Upper row
        [-1, 1], [0, 1], [1, 1],
    ];

    /// Weights for each direction
    pub const WEIGHTS: [Float; 9] = [
        1.0 / 36.0, 1.0 / 9.0, 1.0 / 36.0,
        1.0 / 9.0,  4.0 / 9.0, 1.0 / 9.0,
        1.0 / 36.0, 1.0 / 9.0, 1.0 / 36.0,
    ];

    /// The eight directions whose populations actually move during streaming
    pub const STREAMING: [usize; 8] = [0, 1, 2, 3, 5, 6, 7, 8];

    /// Speed of sound squared
    pub const CS2: Float = 1.0 / 3.0;

    /// Opposite direction for bounce-back boundary conditions
    #[inline(always)]
    pub const fn inverse(direction: usize) -> usize {
        8 - direction
    }
}

/// Maxwell–Boltzmann equilibrium populations for macroscopic state `(u, rho)`.
///
/// Uses the canonical second-order expansion
/// `w_d * rho * (1 + 3(e_d*u) + 9/2 (e_d*u)^2 - 3/2 (u*u))`,
/// whose moments are exactly `rho` and `rho * u`.
pub fn equilibrium(u: Velocity, density: Float) -> [Float; 9] {
    let u_sq = u[0] * u[0] + u[1] * u[1];
    let mut f = [0.0; 9];
    for (direction, value) in f.iter_mut().enumerate() {
        let e = D2Q9::VELOCITIES[direction];
        let eu = e[0] as Float * u[0] + e[1] as Float * u[1];
        *value = D2Q9::WEIGHTS[direction]
            * density
            * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * u_sq);
    }
    f
}

/// Local density: the zeroth moment of the populations.
pub fn density(f: &[Float; 9]) -> Float {
    f.iter().sum()
}

/// Local momentum `rho * u`: the raw first moment of the populations.
pub fn momentum(f: &[Float; 9]) -> Velocity {
    let mut m = [0.0; 2];
    for (direction, value) in f.iter().enumerate() {
        let e = D2Q9::VELOCITIES[direction];
        m[0] += value * e[0] as Float;
        m[1] += value * e[1] as Float;
    }
    m
}

/// Local flow velocity: the first moment divided by the density.
pub fn velocity(f: &[Float; 9]) -> Velocity {
    let rho = density(f);
    let mut u = momentum(f);
    if rho.abs() > 1e-12 {
        u[0] /= rho;
        u[1] /= rho;
    }
    u
}
