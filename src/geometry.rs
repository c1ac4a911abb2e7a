use anyhow::{Result, bail, ensure};

use crate::lattice::D2Q9;

/// Rectangular lattice addressing. Nodes are enumerated row-major with the
/// origin at the lower left, `node = x + y * width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
}

impl Grid {
    /// Creates a grid. The outermost ring of nodes is reserved for ghost
    /// nodes, so both dimensions must be at least 3.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        ensure!(
            width >= 3 && height >= 3,
            "domain must be at least 3x3 to hold a ghost ring, got {width}x{height}"
        );
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn node_count(&self) -> usize {
        self.width * self.height
    }

    #[inline(always)]
    pub fn node_index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        x + y * self.width
    }

    #[inline(always)]
    pub fn coords(&self, node: usize) -> (usize, usize) {
        debug_assert!(node < self.node_count());
        (node % self.width, node / self.width)
    }

    /// Index of the neighbor of `node` along direction `direction`.
    ///
    /// Fluid nodes always have in-range neighbors in every streaming
    /// direction (the ghost ring guarantees it); calling this for an
    /// outward-pointing direction of a ghost-ring node is a bug.
    #[inline(always)]
    pub fn neighbor(&self, node: usize, direction: usize) -> usize {
        let e = D2Q9::VELOCITIES[direction];
        let (x, y) = self.coords(node);
        let nx = x as i64 + e[0] as i64;
        let ny = y as i64 + e[1] as i64;
        debug_assert!(
            nx >= 0 && nx < self.width as i64 && ny >= 0 && ny < self.height as i64,
            "neighbor of node {node} in direction {direction} leaves the lattice"
        );
        (nx + ny * self.width as i64) as usize
    }

    /// Whether the node lies on the outermost ring.
    #[inline]
    pub fn is_outer_ring(&self, node: usize) -> bool {
        let (x, y) = self.coords(node);
        x == 0 || x == self.width - 1 || y == 0 || y == self.height - 1
    }
}

/// The simulation domain: grid dimensions, the phase of every node
/// (solid or not) and the ascending list of fluid nodes.
///
/// The ghost ring convention: the left and right ghost columns act as inlet
/// and outlet, the top and bottom ghost rows are solid walls. Interior solid
/// nodes are obstacles; their populations are sentinel storage and are never
/// streamed or collided.
#[derive(Debug, Clone)]
pub struct Geometry {
    grid: Grid,
    phase: Vec<bool>,
    fluid_nodes: Vec<usize>,
}

impl Geometry {
    /// A plain channel: solid top and bottom ghost rows, inlet and outlet
    /// ghost columns, every interior node fluid.
    pub fn channel(grid: Grid) -> Self {
        Self::channel_with_solids(grid, &[]).expect("empty obstacle list is always valid")
    }

    /// A channel with solid obstacle cells at the given interior coordinates.
    pub fn channel_with_solids(grid: Grid, solids: &[(usize, usize)]) -> Result<Self> {
        let mut phase = vec![false; grid.node_count()];
        for x in 0..grid.width() {
            phase[grid.node_index(x, 0)] = true;
            phase[grid.node_index(x, grid.height() - 1)] = true;
        }
        for &(x, y) in solids {
            ensure!(
                x >= 1 && x < grid.width() - 1 && y >= 1 && y < grid.height() - 1,
                "obstacle ({x}, {y}) is not an interior node of a {}x{} domain",
                grid.width(),
                grid.height()
            );
            phase[grid.node_index(x, y)] = true;
        }

        let fluid_nodes = (0..grid.node_count())
            .filter(|&node| !grid.is_outer_ring(node) && !phase[node])
            .collect();
        Self::from_parts(grid, phase, fluid_nodes)
    }

    /// Assembles a domain from externally prepared phase information and
    /// fluid-node list, validating their consistency.
    pub fn from_parts(grid: Grid, phase: Vec<bool>, fluid_nodes: Vec<usize>) -> Result<Self> {
        ensure!(
            phase.len() == grid.node_count(),
            "phase information has {} entries, expected {}",
            phase.len(),
            grid.node_count()
        );
        ensure!(!fluid_nodes.is_empty(), "domain contains no fluid nodes");
        for window in fluid_nodes.windows(2) {
            ensure!(window[0] < window[1], "fluid nodes must be ascending and unique");
        }
        for &node in &fluid_nodes {
            if node >= grid.node_count() {
                bail!("fluid node {node} is outside the {}-node lattice", grid.node_count());
            }
            if grid.is_outer_ring(node) {
                bail!("fluid node {node} lies on the ghost ring");
            }
            if phase[node] {
                bail!("fluid node {node} is marked solid in the phase information");
            }
        }
        Ok(Self { grid, phase, fluid_nodes })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn phase(&self) -> &[bool] {
        &self.phase
    }

    pub fn fluid_nodes(&self) -> &[usize] {
        &self.fluid_nodes
    }

    #[inline]
    pub fn is_solid(&self, node: usize) -> bool {
        self.phase[node]
    }

    #[inline]
    pub fn is_fluid(&self, node: usize) -> bool {
        !self.phase[node] && !self.grid.is_outer_ring(node)
    }

    /// Ghost nodes carry boundary information: the whole outer ring plus
    /// every solid node.
    #[inline]
    pub fn is_ghost(&self, node: usize) -> bool {
        self.grid.is_outer_ring(node) || self.phase[node]
    }

    /// Ghost nodes that are walls rather than inlet/outlet: solid nodes and
    /// the top/bottom ghost rows (corners included).
    #[inline]
    pub fn is_non_inout_ghost(&self, node: usize) -> bool {
        let (_, y) = self.grid.coords(node);
        self.phase[node] || y == 0 || y == self.grid.height() - 1
    }

    /// Inlet ghost nodes: the left column, corners excluded.
    #[inline]
    pub fn is_inlet(&self, node: usize) -> bool {
        let (x, _) = self.grid.coords(node);
        x == 0 && !self.is_non_inout_ghost(node)
    }

    /// Outlet ghost nodes: the right column, corners excluded.
    #[inline]
    pub fn is_outlet(&self, node: usize) -> bool {
        let (x, _) = self.grid.coords(node);
        x == self.grid.width() - 1 && !self.is_non_inout_ghost(node)
    }
}
