use anyhow::Result;
use log::info;
use std::env;

use crate::config::Config;
use crate::output::VTKWriter;
use crate::solver::Simulation;
use crate::stream::Algorithm;

/// Shared entry point for the per-algorithm binaries.
///
/// Usage: `<binary> <config.json> [debug]`. The `debug` flag raises the log
/// filter so the per-step tracing becomes visible.
pub fn run(algorithm: Algorithm) -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 || (args.len() == 3 && args[2] != "debug") {
        eprintln!("Usage: {} <config.json> [debug]", args[0]);
        eprintln!("  config.json - JSON file containing simulation parameters");
        eprintln!("  debug       - enable verbose per-step tracing");
        std::process::exit(1);
    }
    let debug = args.len() == 3;

    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    info!("Loading configuration from: {}", args[1]);
    let mut config = Config::from_file(&args[1])?;
    config.simulation.algorithm = algorithm;

    info!("Simulation parameters:");
    info!("  Domain: {}x{}", config.domain.width, config.domain.height);
    info!("  Algorithm: {}", algorithm.name());
    info!("  Tau (relaxation time): {}", config.physics.tau);
    info!("  Inlet velocity: {:?}", config.physics.inlet_velocity);
    info!("  Boundary regime: {:?}", config.physics.boundary_regime);
    info!("  Iterations: {}", config.simulation.iterations);

    let simulation = Simulation::new(config.clone())?;
    let timeline = simulation.run()?;

    if config.output.frequency > 0 {
        std::fs::create_dir_all(&config.output.directory)?;
        let mut writer = VTKWriter::new(simulation.geometry());
        for (iteration, field) in timeline.iter().enumerate() {
            if iteration % config.output.frequency == 0 || iteration == timeline.len() - 1 {
                let filename = format!(
                    "{}/{}_{:06}.vtk",
                    config.output.directory,
                    algorithm.name().replace('-', "_"),
                    iteration
                );
                writer.write(&filename, field, iteration)?;
            }
        }
        let collection = format!("{}/collection.pvd", config.output.directory);
        writer.write_collection(&collection)?;
        info!("Wrote {} VTK files to: {}", writer.file_count(), config.output.directory);
    }

    // A one-line summary of the final state at the channel center.
    if let Some(field) = timeline.last() {
        let grid = simulation.geometry().grid();
        let center = grid.node_index(grid.width() / 2, grid.height() / 2);
        let [ux, uy] = field.velocities[center];
        info!(
            "Final center-node state: u = ({:.6}, {:.6}), rho = {:.6}",
            ux, uy, field.densities[center]
        );
    }

    Ok(())
}
