//! Marching Cubes cell polygonisation.
//!
//! Turns one cell of a [`ScalarGrid`] into at most five triangles in
//! physical coordinates.

use crate::error::CoreError;
use crate::gradient::edge_normal;
use crate::traits::ScalarGrid;
use crate::types::Point3;

use super::classify::CubeCase;
use super::tables::{CORNER_OFFSETS, EDGE_VERTICES, MAX_TRIANGLES_PER_CELL};

/// Fraction along an edge where the field reaches `iso_value`.
///
/// Computes `(iso_value - v0) / (v1 - v0)` clamped to `[0, 1]`. A flat edge
/// (`v0 == v1`) or a non-finite quotient yields `0.5`.
#[inline]
pub fn edge_fraction(v0: f32, v1: f32, iso_value: f32) -> f32 {
    let denom = v1 - v0;
    if denom == 0.0 {
        return 0.5;
    }

    let t = (iso_value - v0) / denom;
    if !t.is_finite() {
        return 0.5;
    }

    t.clamp(0.0, 1.0)
}

/// Interpolate vertex position along an edge where the field crosses the iso-value.
///
/// # Arguments
/// * `p0` - Position of the first corner
/// * `p1` - Position of the second corner
/// * `v0` - Scalar value at the first corner
/// * `v1` - Scalar value at the second corner
/// * `iso_value` - The iso-surface value
///
/// # Returns
/// The interpolated position where the surface crosses the edge.
#[inline]
pub fn interpolate_vertex(p0: Point3, p1: Point3, v0: f32, v1: f32, iso_value: f32) -> Point3 {
    p0.lerp(p1, edge_fraction(v0, v1, iso_value))
}

/// Triangles produced by one cell, stored inline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellTriangles {
    case: CubeCase,
    positions: [[Point3; 3]; MAX_TRIANGLES_PER_CELL],
    normals: [[Point3; 3]; MAX_TRIANGLES_PER_CELL],
    count: usize,
    has_normals: bool,
}

impl CellTriangles {
    fn empty(case: CubeCase, has_normals: bool) -> Self {
        Self {
            case,
            positions: [[Point3::default(); 3]; MAX_TRIANGLES_PER_CELL],
            normals: [[Point3::default(); 3]; MAX_TRIANGLES_PER_CELL],
            count: 0,
            has_normals,
        }
    }

    /// The cell's cube case.
    #[inline]
    pub fn case(&self) -> CubeCase {
        self.case
    }

    /// Number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when the cell emitted nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Whether per-vertex normals were computed.
    #[inline]
    pub fn has_normals(&self) -> bool {
        self.has_normals
    }

    /// Triangle vertex positions, in table order.
    #[inline]
    pub fn triangles(&self) -> &[[Point3; 3]] {
        &self.positions[..self.count]
    }

    /// Per-vertex unit normals matching [`Self::triangles`]; empty when
    /// normals were not requested.
    #[inline]
    pub fn normals(&self) -> &[[Point3; 3]] {
        if self.has_normals {
            &self.normals[..self.count]
        } else {
            &[]
        }
    }
}

#[inline]
fn corner_index(x: usize, y: usize, z: usize, corner: usize) -> [usize; 3] {
    let (dx, dy, dz) = CORNER_OFFSETS[corner];
    [x + dx as usize, y + dy as usize, z + dz as usize]
}

/// Polygonise the cell whose minimum corner is `(x, y, z)`.
///
/// Reads the 8 corner samples, classifies the cell, interpolates every crossed
/// edge in physical coordinates and emits the case's triangles in table order.
/// With `with_normals`, each vertex also gets the normalised field gradient
/// interpolated along its edge.
///
/// # Errors
/// Returns [`CoreError::OutOfRange`] if the cell does not lie inside the grid.
pub fn process_cell_no_alloc<G: ScalarGrid + ?Sized>(
    grid: &G,
    x: usize,
    y: usize,
    z: usize,
    iso_value: f32,
    with_normals: bool,
) -> Result<CellTriangles, CoreError> {
    let values = grid.corner_values(x, y, z)?;
    let case = CubeCase::classify(&values, iso_value);
    let mut out = CellTriangles::empty(case, with_normals);

    if case.is_trivial() {
        return Ok(out);
    }

    let spacing = grid.spacing();
    let edge_flags = case.edge_mask();
    let mut edge_points = [Point3::default(); 12];
    let mut edge_normals = [Point3::default(); 12];

    for (edge, &(c0, c1)) in EDGE_VERTICES.iter().enumerate() {
        if edge_flags & (1 << edge) == 0 {
            continue;
        }

        let [x0, y0, z0] = corner_index(x, y, z, c0);
        let [x1, y1, z1] = corner_index(x, y, z, c1);
        let t = edge_fraction(values[c0], values[c1], iso_value);

        edge_points[edge] = interpolate_vertex(
            spacing.to_physical(x0, y0, z0),
            spacing.to_physical(x1, y1, z1),
            values[c0],
            values[c1],
            iso_value,
        );

        if with_normals {
            edge_normals[edge] = edge_normal(grid, [x0, y0, z0], [x1, y1, z1], t)?;
        }
    }

    for [e0, e1, e2] in case.triangles() {
        if out.count == MAX_TRIANGLES_PER_CELL {
            break;
        }
        out.positions[out.count] = [edge_points[e0], edge_points[e1], edge_points[e2]];
        out.normals[out.count] = [edge_normals[e0], edge_normals[e1], edge_normals[e2]];
        out.count += 1;
    }

    Ok(out)
}

/// Polygonise one cell and return its triangles as a vector.
///
/// Convenience wrapper over [`process_cell_no_alloc`] without normals.
#[cfg(any(feature = "std", feature = "alloc"))]
pub fn process_cell<G: ScalarGrid + ?Sized>(
    grid: &G,
    x: usize,
    y: usize,
    z: usize,
    iso_value: f32,
) -> Result<crate::alloc_prelude::Vec<[Point3; 3]>, CoreError> {
    let cell = process_cell_no_alloc(grid, x, y, z, iso_value, false)?;
    Ok(cell.triangles().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Spacing;

    /// 2x2x2 grid with explicit corner values in canonical order.
    struct SingleCell {
        values: [f32; 8],
    }

    impl ScalarGrid for SingleCell {
        fn dims(&self) -> [usize; 3] {
            [2, 2, 2]
        }

        fn spacing(&self) -> Spacing {
            Spacing::uniform(1.0)
        }

        fn value_at(&self, x: usize, y: usize, z: usize) -> Result<f32, CoreError> {
            self.check_bounds(x, y, z)?;
            let corner = crate::traits::index_from_corner((x as u32, y as u32, z as u32));
            Ok(self.values[corner])
        }
    }

    #[test]
    fn test_interpolate_vertex_midpoint() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 0.0, 0.0);

        let result = interpolate_vertex(p0, p1, -1.0, 1.0, 0.0);
        assert!((result.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_interpolate_vertex_at_corners() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 0.0, 0.0);

        let result = interpolate_vertex(p0, p1, 0.0, 1.0, 0.0);
        assert!((result.x - 0.0).abs() < 1e-6);

        let result = interpolate_vertex(p0, p1, -1.0, 0.0, 0.0);
        assert!((result.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_edge_is_midpoint() {
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(0.0, 2.0, 0.0);

        let result = interpolate_vertex(p0, p1, 0.5, 0.5, 0.5);
        assert!(result.is_finite());
        assert_eq!(result, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(edge_fraction(3.0, 3.0, 0.0), 0.5);
    }

    #[test]
    fn test_nearly_flat_edge_still_interpolates() {
        let t = edge_fraction(0.0, 4e-11, 1e-11);
        assert!((t - 0.25).abs() < 1e-5, "t = {}", t);

        let p = interpolate_vertex(Point3::splat(0.0), Point3::new(4.0, 0.0, 0.0), 0.0, 4e-11, 1e-11);
        assert!((p.x - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_edge_fraction_clamps() {
        assert_eq!(edge_fraction(0.0, 1.0, 2.0), 1.0);
        assert_eq!(edge_fraction(0.0, 1.0, -2.0), 0.0);
        assert_eq!(edge_fraction(f32::NAN, 1.0, 0.5), 0.5);
    }

    #[test]
    fn test_process_cell_all_below() {
        let grid = SingleCell { values: [0.0; 8] };
        let cell = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, false).unwrap();
        assert!(cell.is_empty());
        assert_eq!(cell.case(), CubeCase::EMPTY);
    }

    #[test]
    fn test_process_cell_single_corner() {
        let mut values = [0.0; 8];
        values[6] = 1.0;
        let grid = SingleCell { values };

        let cell = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, false).unwrap();
        assert_eq!(cell.len(), 1);

        // Corner 6 sits at (1,1,1); its three edges end at the midpoints.
        let tri = cell.triangles()[0];
        for v in tri {
            let halves = [v.x, v.y, v.z].iter().filter(|c| (**c - 0.5).abs() < 1e-6).count();
            let ones = [v.x, v.y, v.z].iter().filter(|c| (**c - 1.0).abs() < 1e-6).count();
            assert_eq!((halves, ones), (1, 2), "vertex {:?}", v);
        }
        assert_ne!(tri[0], tri[1]);
        assert_ne!(tri[1], tri[2]);
        assert_ne!(tri[0], tri[2]);
    }

    #[test]
    fn test_process_cell_out_of_range() {
        let grid = SingleCell { values: [0.0; 8] };
        let err = process_cell_no_alloc(&grid, 1, 0, 0, 0.5, false).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { x: 2, .. }));
    }

    #[test]
    fn test_normals_absent_unless_requested() {
        let mut values = [0.0; 8];
        values[0] = 1.0;
        let grid = SingleCell { values };

        let plain = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, false).unwrap();
        assert!(plain.normals().is_empty());

        let with = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, true).unwrap();
        assert_eq!(with.normals().len(), with.len());
        assert_eq!(plain.triangles(), with.triangles());
    }

    #[test]
    #[cfg(any(feature = "std", feature = "alloc"))]
    fn test_alloc_and_no_alloc_match() {
        let grid = SingleCell {
            values: [0.2, 0.9, 0.1, 0.7, 0.3, 0.6, 0.8, 0.0],
        };

        let alloc_triangles = process_cell(&grid, 0, 0, 0, 0.5).unwrap();
        let cell = process_cell_no_alloc(&grid, 0, 0, 0, 0.5, false).unwrap();

        assert_eq!(alloc_triangles.len(), cell.len());
        assert_eq!(&alloc_triangles[..], cell.triangles());
    }
}
