//! Finite-difference gradients of a sampled field.
//!
//! Interior nodes use central differences, boundary nodes one-sided
//! differences, all scaled by the grid spacing so gradients are in physical
//! units.

use crate::error::CoreError;
use crate::traits::ScalarGrid;
use crate::types::Point3;

/// Derivative of the field along one axis at a grid node.
#[inline]
fn axis_derivative<G: ScalarGrid + ?Sized>(
    grid: &G,
    node: [usize; 3],
    axis: usize,
    step: f32,
) -> Result<f32, CoreError> {
    let n = grid.dims()[axis];
    if n < 2 {
        return Ok(0.0);
    }

    let i = node[axis];
    let lo = i.saturating_sub(1);
    let hi = if i + 1 < n { i + 1 } else { n - 1 };

    let mut lo_node = node;
    let mut hi_node = node;
    lo_node[axis] = lo;
    hi_node[axis] = hi;

    let v_lo = grid.value_at(lo_node[0], lo_node[1], lo_node[2])?;
    let v_hi = grid.value_at(hi_node[0], hi_node[1], hi_node[2])?;

    Ok((v_hi - v_lo) / ((hi - lo) as f32 * step))
}

/// Gradient of the field at a grid node, in physical units.
///
/// # Errors
/// Returns [`CoreError::OutOfRange`] if `node` is outside the grid.
pub fn node_gradient<G: ScalarGrid + ?Sized>(
    grid: &G,
    node: [usize; 3],
) -> Result<Point3, CoreError> {
    grid.check_bounds(node[0], node[1], node[2])?;
    let spacing = grid.spacing();

    Ok(Point3::new(
        axis_derivative(grid, node, 0, spacing.x)?,
        axis_derivative(grid, node, 1, spacing.y)?,
        axis_derivative(grid, node, 2, spacing.z)?,
    ))
}

/// Unit normal at fraction `t` along the edge from node `a` to node `b`.
///
/// The node gradients are linearly interpolated and normalised, so the normal
/// points towards increasing field values. A vanishing gradient yields the
/// zero vector.
pub fn edge_normal<G: ScalarGrid + ?Sized>(
    grid: &G,
    a: [usize; 3],
    b: [usize; 3],
    t: f32,
) -> Result<Point3, CoreError> {
    let g0 = node_gradient(grid, a)?;
    let g1 = node_gradient(grid, b)?;
    Ok(g0.lerp(g1, t).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Spacing;

    /// Linear field 2x - y + 3z on a 4x4x4 grid with anisotropic spacing.
    struct Linear;

    impl ScalarGrid for Linear {
        fn dims(&self) -> [usize; 3] {
            [4, 4, 4]
        }

        fn spacing(&self) -> Spacing {
            Spacing::new(0.5, 1.0, 2.0)
        }

        fn value_at(&self, x: usize, y: usize, z: usize) -> Result<f32, CoreError> {
            self.check_bounds(x, y, z)?;
            let p = self.physical_position(x, y, z);
            Ok(2.0 * p.x - p.y + 3.0 * p.z)
        }
    }

    #[test]
    fn test_linear_gradient_interior() {
        let g = node_gradient(&Linear, [1, 2, 1]).unwrap();
        assert!((g.x - 2.0).abs() < 1e-5);
        assert!((g.y + 1.0).abs() < 1e-5);
        assert!((g.z - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_linear_gradient_boundary() {
        for node in [[0, 0, 0], [3, 3, 3], [0, 3, 2]] {
            let g = node_gradient(&Linear, node).unwrap();
            assert!((g.x - 2.0).abs() < 1e-5, "{:?}: {:?}", node, g);
            assert!((g.y + 1.0).abs() < 1e-5, "{:?}: {:?}", node, g);
            assert!((g.z - 3.0).abs() < 1e-5, "{:?}: {:?}", node, g);
        }
    }

    #[test]
    fn test_gradient_out_of_range() {
        assert!(node_gradient(&Linear, [4, 0, 0]).is_err());
    }

    #[test]
    fn test_edge_normal_is_unit() {
        let n = edge_normal(&Linear, [1, 1, 1], [2, 1, 1], 0.3).unwrap();
        assert!((n.length() - 1.0).abs() < 1e-5);
        let expected = Point3::new(2.0, -1.0, 3.0).normalize();
        assert!((n - expected).length() < 1e-5);
    }
}
