use anyhow::Result;
use lbm2d::{Algorithm, cli};

fn main() -> Result<()> {
    cli::run(Algorithm::TwoLattice)
}
