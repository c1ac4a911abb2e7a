use anyhow::Result;
use std::fs::File;
use std::io::Write;

use crate::geometry::Geometry;
use crate::solver::FlowField;

/// Writes per-step macroscopic fields as legacy-format VTK structured grids,
/// plus a ParaView collection file tying the timesteps together.
pub struct VTKWriter {
    geometry: Geometry,
    collection_entries: Vec<(usize, String)>, // (iteration, filename)
}

impl VTKWriter {
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            geometry: geometry.clone(),
            collection_entries: Vec::new(),
        }
    }

    pub fn write(&mut self, filename: &str, field: &FlowField, iteration: usize) -> Result<()> {
        let grid = self.geometry.grid();
        let (nx, ny) = (grid.width(), grid.height());

        let mut file = File::create(filename)?;

        self.collection_entries.push((iteration, filename.to_string()));

        writeln!(file, "# vtk DataFile Version 3.0")?;
        writeln!(file, "LBM Solution - Iteration {}", iteration)?;
        writeln!(file, "ASCII")?;
        writeln!(file, "DATASET STRUCTURED_GRID")?;
        writeln!(file, "DIMENSIONS {} {} 1", nx, ny)?;

        writeln!(file, "POINTS {} float", nx * ny)?;
        for y in 0..ny {
            for x in 0..nx {
                writeln!(file, "{} {} 0", x, y)?;
            }
        }

        writeln!(file, "POINT_DATA {}", nx * ny)?;

        writeln!(file, "SCALARS Density float")?;
        writeln!(file, "LOOKUP_TABLE default")?;
        for density in &field.densities {
            writeln!(file, "{:.6}", density)?;
        }

        writeln!(file, "VECTORS Velocity float")?;
        for velocity in &field.velocities {
            writeln!(file, "{:.6} {:.6} 0", velocity[0], velocity[1])?;
        }

        writeln!(file, "SCALARS VelocityMagnitude float")?;
        writeln!(file, "LOOKUP_TABLE default")?;
        for velocity in &field.velocities {
            let magnitude = (velocity[0] * velocity[0] + velocity[1] * velocity[1]).sqrt();
            writeln!(file, "{:.6}", magnitude)?;
        }

        writeln!(file, "SCALARS NodeType float")?;
        writeln!(file, "LOOKUP_TABLE default")?;
        for node in 0..grid.node_count() {
            let node_type = if self.geometry.is_solid(node) {
                1.0
            } else if self.geometry.is_inlet(node) {
                2.0
            } else if self.geometry.is_outlet(node) {
                3.0
            } else if self.geometry.is_fluid(node) {
                0.0
            } else {
                4.0 // top/bottom ghost ring
            };
            writeln!(file, "{:.1}", node_type)?;
        }

        Ok(())
    }

    /// Write a ParaView collection file that groups all VTK files written so
    /// far, using the iteration number as the timestep.
    pub fn write_collection(&self, collection_filename: &str) -> Result<()> {
        let mut file = File::create(collection_filename)?;

        writeln!(file, "<?xml version=\"1.0\"?>")?;
        writeln!(file, "<VTKFile type=\"Collection\" version=\"0.1\">")?;
        writeln!(file, "  <Collection>")?;

        for (iteration, filename) in &self.collection_entries {
            let basename = std::path::Path::new(filename)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(filename);
            writeln!(
                file,
                "    <DataSet timestep=\"{}\" part=\"0\" file=\"{}\"/>",
                iteration, basename
            )?;
        }

        writeln!(file, "  </Collection>")?;
        writeln!(file, "</VTKFile>")?;

        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.collection_entries.len()
    }
}
