//! The four streaming strategies.
//!
//! All four advance the population field by one timestep and produce the same
//! physical result; they differ in memory discipline. Two-lattice ping-pongs
//! between two arrays and fuses streaming with collision. Two-step works in
//! place with a direction-split traversal order and a separate collision
//! pass. Swap emulates streaming by exchanging populations between neighbor
//! pairs. Shift slides the data between two overlapping windows of one
//! slightly enlarged buffer.
//!
//! The fixed order within a step is: emplace bounce-back, stream, collide,
//! refresh the inlet/outlet ghosts, with macroscopic moments recorded from
//! the post-stream populations.

pub mod shift;
pub mod swap;
pub mod two_lattice;
pub mod two_step;

use serde::{Deserialize, Serialize};

/// Streaming strategy selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    TwoLattice,
    TwoStep,
    Swap,
    Shift,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::TwoLattice => "two-lattice",
            Algorithm::TwoStep => "two-step",
            Algorithm::Swap => "swap",
            Algorithm::Shift => "shift",
        }
    }
}
