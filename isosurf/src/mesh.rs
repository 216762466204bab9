//! Indexed triangle meshes.

use std::fmt;

use hashbrown::HashMap;
use isosurf_core::Point3;

/// Indexed triangle mesh produced by extraction.
///
/// Triangles index into `positions` (0-based) and every index is valid.
/// When normals are present there is exactly one per position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    positions: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
    normals: Option<Vec<Point3>>,
}

impl Mesh {
    pub(crate) fn from_parts(
        positions: Vec<Point3>,
        triangles: Vec<[u32; 3]>,
        normals: Option<Vec<Point3>>,
    ) -> Self {
        debug_assert!(triangles
            .iter()
            .flatten()
            .all(|&i| (i as usize) < positions.len()));
        debug_assert!(normals.as_ref().map_or(true, |n| n.len() == positions.len()));
        Self {
            positions,
            triangles,
            normals,
        }
    }

    /// Vertex positions in physical coordinates.
    #[inline]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangle vertex indices.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Per-vertex unit normals, if they were computed.
    #[inline]
    pub fn normals(&self) -> Option<&[Point3]> {
        self.normals.as_deref()
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Positions of the three corners of triangle `index`.
    ///
    /// # Panics
    /// Panics if `index >= triangle_count()`.
    #[inline]
    pub fn triangle_positions(&self, index: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[index];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Iterate over triangles as position triples.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        (0..self.triangles.len()).map(move |i| self.triangle_positions(i))
    }

    /// How many triangles use each undirected edge.
    fn edge_uses(&self) -> HashMap<(u32, u32), usize> {
        let mut uses = HashMap::with_capacity(self.triangles.len() * 3 / 2);
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        uses
    }

    /// Number of edges used by exactly one triangle.
    ///
    /// Only meaningful for welded meshes; without welding no two triangles
    /// share a vertex index.
    pub fn boundary_edges(&self) -> usize {
        self.edge_uses().values().filter(|&&n| n == 1).count()
    }

    /// Whether every edge is shared by exactly two triangles.
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.edge_uses().values().all(|&n| n == 2)
    }

    /// Summary statistics.
    pub fn stats(&self) -> MeshStats {
        MeshStats::from_mesh(self)
    }
}

/// Mesh statistics after extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    /// Total number of triangles.
    pub triangle_count: usize,
    /// Number of stored vertices.
    pub vertex_count: usize,
    /// Sum of triangle areas in physical units.
    pub surface_area: f32,
    /// Bounding box minimum (origin for an empty mesh).
    pub bbox_min: Point3,
    /// Bounding box maximum (origin for an empty mesh).
    pub bbox_max: Point3,
}

impl MeshStats {
    /// Compute statistics for `mesh`.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut surface_area = 0.0;
        for [p0, p1, p2] in mesh.iter_triangles() {
            surface_area += (p1 - p0).cross(p2 - p0).length() * 0.5;
        }

        let (bbox_min, bbox_max) = match mesh.positions.split_first() {
            Some((&first, rest)) => rest
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
            None => (Point3::default(), Point3::default()),
        };

        Self {
            triangle_count: mesh.triangle_count(),
            vertex_count: mesh.vertex_count(),
            surface_area,
            bbox_min,
            bbox_max,
        }
    }
}

/// Wavefront OBJ elements of a mesh, rendered through [`fmt::Display`].
///
/// Writes a count comment, `v` lines, `vn` lines when normals are included,
/// then 1-indexed `f` lines (`f a//a b//b c//c` with normals). Header
/// comments are left to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ObjElements<'a> {
    mesh: &'a Mesh,
    normals: Option<&'a [Point3]>,
}

impl Mesh {
    /// OBJ elements of this mesh. Normals are written only when
    /// `include_normals` is set and the mesh has them.
    pub fn obj_elements(&self, include_normals: bool) -> ObjElements<'_> {
        ObjElements {
            mesh: self,
            normals: if include_normals { self.normals() } else { None },
        }
    }
}

impl fmt::Display for ObjElements<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            out,
            "# {} vertices, {} triangles",
            self.mesh.vertex_count(),
            self.mesh.triangle_count()
        )?;
        writeln!(out)?;

        for v in self.mesh.positions() {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }

        if let Some(normals) = self.normals {
            writeln!(out)?;
            for n in normals {
                writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
            }
        }

        writeln!(out)?;
        for &[a, b, c] in self.mesh.triangles() {
            // OBJ uses 1-based indexing
            let (a, b, c) = (u64::from(a) + 1, u64::from(b) + 1, u64::from(c) + 1);
            if self.normals.is_some() {
                writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(out, "f {a} {b} {c}")?;
            }
        }
        Ok(())
    }
}

/// Render a mesh as Wavefront OBJ text, including normals when present.
pub fn mesh_to_obj_string(mesh: &Mesh) -> String {
    mesh.obj_elements(true).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh {
        Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
            None,
        )
    }

    #[test]
    fn test_mesh_stats() {
        let mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            None,
        );

        let stats = mesh.stats();
        assert_eq!(stats.triangle_count, 2);
        assert_eq!(stats.vertex_count, 4);
        assert!((stats.surface_area - 1.0).abs() < 1e-6);
        assert_eq!(stats.bbox_min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(stats.bbox_max, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_empty_mesh_stats() {
        let stats = Mesh::default().stats();
        assert_eq!(stats.triangle_count, 0);
        assert_eq!(stats.surface_area, 0.0);
        assert_eq!(stats.bbox_min, Point3::default());
    }

    #[test]
    fn test_tetrahedron_is_closed() {
        let mesh = tetrahedron();
        assert!(mesh.is_closed());
        assert_eq!(mesh.boundary_edges(), 0);
    }

    #[test]
    fn test_open_mesh_has_boundary() {
        let mut mesh = tetrahedron();
        mesh.triangles.pop();
        assert!(!mesh.is_closed());
        assert_eq!(mesh.boundary_edges(), 3);
        assert!(!Mesh::default().is_closed());
    }

    #[test]
    fn test_mesh_to_obj_string() {
        let mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            None,
        );

        let obj = mesh_to_obj_string(&mesh);
        assert!(obj.contains("v 0 0 0"));
        assert!(obj.contains("v 1 0 0"));
        assert!(obj.contains("v 0 1 0"));
        assert!(obj.contains("f 1 2 3"));
        assert!(!obj.contains("vn"));
        assert!(obj.find("v 0 1 0").unwrap() < obj.find("f 1 2 3").unwrap());
    }

    #[test]
    fn test_mesh_to_obj_string_with_normals() {
        let up = Point3::new(0.0, 0.0, 1.0);
        let mesh = Mesh::from_parts(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            Some(vec![up; 3]),
        );

        let obj = mesh_to_obj_string(&mesh);
        assert_eq!(obj.matches("vn 0 0 1").count(), 3);
        assert!(obj.contains("f 1//1 2//2 3//3"));

        let obj = mesh.obj_elements(false).to_string();
        assert!(!obj.contains("vn"));
        assert!(obj.contains("f 1 2 3"));
    }
}
