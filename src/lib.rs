pub mod boundary;
pub mod cli;
pub mod collision;
pub mod config;
pub mod geometry;
pub mod lattice;
pub mod layout;
pub mod output;
pub mod solver;
pub mod stream;

pub use boundary::{BoundaryRegime, GhostRefresh};
pub use config::Config;
pub use geometry::{Geometry, Grid};
pub use lattice::D2Q9;
pub use layout::{BundleLayout, CollisionLayout, Layout, LayoutKind, StreamLayout};
pub use output::VTKWriter;
pub use solver::{FlowField, Simulation};
pub use stream::Algorithm;

pub type Float = f64;

/// A two-dimensional velocity (or momentum) vector.
pub type Velocity = [Float; 2];
