//! OBJ export for extracted meshes.
//!
//! Writes a standard Wavefront OBJ file: header comments followed by the
//! mesh's [`ObjElements`](isosurf::ObjElements).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use isosurf::{Mesh, MeshStats};

use crate::error::{IoError, Result};

/// Configuration for OBJ export.
#[derive(Debug, Clone)]
pub struct ObjExportConfig {
    /// Write `vn` lines and `f v//vn` faces when the mesh has normals
    /// (default: true).
    pub include_normals: bool,
    /// Comment lines written at the top of the file.
    pub comments: Vec<String>,
}

impl Default for ObjExportConfig {
    fn default() -> Self {
        Self {
            include_normals: true,
            comments: vec!["isosurf OBJ export".to_string()],
        }
    }
}

impl ObjExportConfig {
    /// Add a header comment line.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }
}

/// Write `mesh` as OBJ to `writer`.
///
/// Returns statistics for the written mesh.
///
/// # Example
///
/// ```ignore
/// use isosurf_io::{write_obj, ObjExportConfig};
/// use std::fs::File;
///
/// let mut file = File::create("surface.obj")?;
/// write_obj(&mesh, &mut file, &ObjExportConfig::default())?;
/// ```
pub fn write_obj<W: Write>(
    mesh: &Mesh,
    writer: &mut W,
    config: &ObjExportConfig,
) -> Result<MeshStats> {
    let stats = mesh.stats();

    for comment in &config.comments {
        for line in comment.lines() {
            writeln!(writer, "# {}", line)?;
        }
    }
    write!(writer, "{}", mesh.obj_elements(config.include_normals))?;
    writer.flush()?;
    Ok(stats)
}

/// Write `mesh` as OBJ to a file, creating or truncating it.
pub fn export_obj_to_file<P: AsRef<Path>>(
    mesh: &Mesh,
    path: P,
    config: &ObjExportConfig,
) -> Result<MeshStats> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IoError::Output {
        path: path.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    let stats = write_obj(mesh, &mut writer, config)?;
    log::info!(
        "wrote {} triangles, {} vertices to {}",
        stats.triangle_count,
        stats.vertex_count,
        path.display()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isosurf::{ExtractConfig, Point3, Spacing, SurfaceExtractor, VoxelGrid};

    fn sphere_mesh(normals: bool) -> Mesh {
        let grid = VoxelGrid::from_fn([8, 8, 8], Spacing::uniform(0.25), |p| {
            (p - Point3::splat(0.875)).length() - 0.6
        })
        .unwrap();
        SurfaceExtractor::new(ExtractConfig::default().with_normals(normals))
            .extract(&grid, 0.0)
            .unwrap()
    }

    fn write_to_string(mesh: &Mesh, config: &ObjExportConfig) -> String {
        let mut output = Vec::new();
        write_obj(mesh, &mut output, config).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_write_obj_basic() {
        let mesh = sphere_mesh(false);
        let obj = write_to_string(&mesh, &ObjExportConfig::default());

        assert!(obj.starts_with("# isosurf OBJ export"));
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), mesh.vertex_count());
        assert_eq!(obj.lines().filter(|l| l.starts_with("f ")).count(), mesh.triangle_count());
        assert!(!obj.contains("vn "));
    }

    #[test]
    fn test_faces_are_one_indexed_and_follow_vertices() {
        let mesh = sphere_mesh(false);
        let obj = write_to_string(&mesh, &ObjExportConfig::default());

        let lines: Vec<&str> = obj.lines().collect();
        let last_v = lines.iter().rposition(|l| l.starts_with("v ")).unwrap();
        let first_f = lines.iter().position(|l| l.starts_with("f ")).unwrap();
        assert!(last_v < first_f);

        let mut max_index = 0;
        for line in obj.lines().filter(|l| l.starts_with("f ")) {
            for token in line.split_whitespace().skip(1) {
                let index: usize = token.parse().unwrap();
                assert!(index >= 1);
                max_index = max_index.max(index);
            }
        }
        assert_eq!(max_index, mesh.vertex_count());
    }

    #[test]
    fn test_write_obj_with_normals() {
        let mesh = sphere_mesh(true);
        let obj = write_to_string(&mesh, &ObjExportConfig::default());

        assert_eq!(obj.lines().filter(|l| l.starts_with("vn ")).count(), mesh.vertex_count());
        assert!(obj.contains("f 1//1 2//2 3//3"));

        let config = ObjExportConfig {
            include_normals: false,
            ..Default::default()
        };
        let obj = write_to_string(&mesh, &config);
        assert!(!obj.contains("vn "));
        assert!(obj.contains("f 1 2 3"));
    }

    #[test]
    fn test_export_empty_mesh() {
        let mut output = Vec::new();
        let stats = write_obj(&Mesh::default(), &mut output, &ObjExportConfig::default()).unwrap();

        assert_eq!(stats.vertex_count, 0);
        assert_eq!(stats.triangle_count, 0);
        let obj = String::from_utf8(output).unwrap();
        assert!(obj.starts_with("# isosurf OBJ export"));
        assert!(obj.contains("# 0 vertices, 0 triangles"));
        assert!(!obj.lines().any(|l| l.starts_with("v ") || l.starts_with("f ")));
    }

    #[test]
    fn test_matches_mesh_to_obj_string_without_comments() {
        let mesh = sphere_mesh(true);
        let config = ObjExportConfig {
            comments: Vec::new(),
            ..Default::default()
        };
        assert_eq!(write_to_string(&mesh, &config), isosurf::mesh_to_obj_string(&mesh));
    }

    #[test]
    fn test_comments_are_prefixed() {
        let config = ObjExportConfig::default().with_comment("isovalue 0.5\nnormalized");
        let obj = write_to_string(&Mesh::default(), &config);
        assert!(obj.contains("# isovalue 0.5\n# normalized\n"));
    }
}
