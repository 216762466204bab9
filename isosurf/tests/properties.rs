//! Property-based tests for whole-grid extraction.

use isosurf::{
    extract, ExtractConfig, Mesh, Spacing, SurfaceExtractor, VoxelGrid, WeldMode,
};
use proptest::prelude::*;

/// Random small grid with unit spacing and samples in `[-1, 1]`.
fn arb_grid() -> impl Strategy<Value = VoxelGrid> {
    (2usize..6, 2usize..6, 2usize..6).prop_flat_map(|(nx, ny, nz)| {
        proptest::collection::vec(-1.0f32..1.0, nx * ny * nz).prop_map(move |values| {
            VoxelGrid::new([nx, ny, nz], values, Spacing::uniform(1.0)).unwrap()
        })
    })
}

fn indices_valid(mesh: &Mesh) -> bool {
    mesh.triangles()
        .iter()
        .flatten()
        .all(|&i| (i as usize) < mesh.vertex_count())
}

fn is_integral(v: f32) -> bool {
    v == v.round()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every vertex lies on a grid edge inside the grid's extent, and no cell
    /// emits more than five triangles.
    #[test]
    fn vertices_lie_on_grid_edges(grid in arb_grid(), iso in -1.0f32..1.0) {
        let mesh = extract(&grid, iso).unwrap();
        let [nx, ny, nz] = isosurf::ScalarGrid::dims(&grid);
        let cells = (nx - 1) * (ny - 1) * (nz - 1);

        prop_assert!(indices_valid(&mesh));
        prop_assert!(mesh.triangle_count() <= 5 * cells);
        prop_assert_eq!(mesh.vertex_count(), 3 * mesh.triangle_count());

        for v in mesh.positions() {
            prop_assert!(v.is_finite());
            prop_assert!(v.x >= 0.0 && v.x <= (nx - 1) as f32);
            prop_assert!(v.y >= 0.0 && v.y <= (ny - 1) as f32);
            prop_assert!(v.z >= 0.0 && v.z <= (nz - 1) as f32);

            let on_lattice = [v.x, v.y, v.z].iter().filter(|c| is_integral(**c)).count();
            prop_assert!(on_lattice >= 2, "{:?} is not on a grid edge", v);
        }
    }

    /// An isovalue outside the sample range never produces geometry.
    #[test]
    fn out_of_range_isovalue_is_empty(grid in arb_grid(), margin in 0.0f32..10.0) {
        prop_assert!(extract(&grid, 1.0 + margin).unwrap().is_empty());
        prop_assert!(extract(&grid, -1.0 - margin).unwrap().is_empty());
    }

    /// Scheduling does not change the output.
    #[test]
    fn parallel_matches_sequential(grid in arb_grid(), iso in -1.0f32..1.0) {
        let config = ExtractConfig::default().with_normals(true);
        let sequential = SurfaceExtractor::new(config.clone().with_threads(1))
            .extract(&grid, iso)
            .unwrap();
        let parallel = SurfaceExtractor::new(config.with_threads(3))
            .extract(&grid, iso)
            .unwrap();
        prop_assert_eq!(sequential, parallel);
    }

    /// Welding never adds vertices or triangles and keeps indices valid.
    #[test]
    fn welding_only_shrinks(grid in arb_grid(), iso in -1.0f32..1.0) {
        let raw = extract(&grid, iso).unwrap();
        let welded = SurfaceExtractor::new(ExtractConfig::default().with_weld(WeldMode::Exact))
            .extract(&grid, iso)
            .unwrap();

        prop_assert!(indices_valid(&welded));
        prop_assert!(welded.vertex_count() <= raw.vertex_count());
        prop_assert!(welded.triangle_count() <= raw.triangle_count());
    }
}
