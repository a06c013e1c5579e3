//! Mesh export.

use buddycheck_core::StlFormat;
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::error::{ExportError, ExportResult};
use crate::solid::{Solid, Triangle};

/// Writes a finished solid somewhere.
pub trait SolidExporter {
    fn export(&self, solid: &Solid, path: &Path) -> ExportResult<()>;
}

/// STL writer, binary or ASCII.
#[derive(Debug, Clone, Copy, Default)]
pub struct StlExporter {
    pub format: StlFormat,
}

impl StlExporter {
    pub fn new(format: StlFormat) -> Self {
        Self { format }
    }

    fn to_stl(triangles: &[Triangle]) -> Vec<stl_io::Triangle> {
        triangles
            .iter()
            .map(|tri| {
                let normal = (tri[1] - tri[0]).cross(&(tri[2] - tri[0]));
                let normal = normal.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::zeros);
                let vertex = |i: usize| {
                    stl_io::Vertex::new([tri[i].x as f32, tri[i].y as f32, tri[i].z as f32])
                };
                stl_io::Triangle {
                    normal: stl_io::Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                    vertices: [vertex(0), vertex(1), vertex(2)],
                }
            })
            .collect()
    }

    fn write_ascii<W: Write>(writer: &mut W, name: &str, mesh: &[stl_io::Triangle]) -> std::io::Result<()> {
        writeln!(writer, "solid {}", name)?;
        for tri in mesh {
            let n = tri.normal;
            writeln!(writer, "  facet normal {:e} {:e} {:e}", n[0], n[1], n[2])?;
            writeln!(writer, "    outer loop")?;
            for v in &tri.vertices {
                writeln!(writer, "      vertex {:e} {:e} {:e}", v[0], v[1], v[2])?;
            }
            writeln!(writer, "    endloop")?;
            writeln!(writer, "  endfacet")?;
        }
        writeln!(writer, "endsolid {}", name)
    }
}

impl SolidExporter for StlExporter {
    fn export(&self, solid: &Solid, path: &Path) -> ExportResult<()> {
        let mesh = Self::to_stl(&solid.triangles());
        if mesh.is_empty() {
            return Err(ExportError::EmptyMesh(path.to_path_buf()));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::io(path, e))?;
        }
        let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        match self.format {
            StlFormat::Binary => stl_io::write_stl(&mut writer, mesh.iter()),
            StlFormat::Ascii => {
                let name = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("solid");
                Self::write_ascii(&mut writer, name, &mesh)
            }
        }
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::io(path, e))?;

        info!(
            "Exported {} ({} triangles, {})",
            path.display(),
            mesh.len(),
            self.format
        );
        Ok(())
    }
}
