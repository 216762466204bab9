//! Marching cubes table invariants.
//!
//! These tests pin down the canonical cube: corner numbering, edge endpoints
//! and the 256-case triangle table. Every edge an emitted triangle touches
//! must actually be crossed by the surface.

use isosurf_core::marching_cubes::{
    CubeCase, CORNER_OFFSETS, EDGE_TABLE, EDGE_VERTICES, MAX_TRIANGLES_PER_CELL, TRI_TABLE,
};
use isosurf_core::{corner_from_index, interpolate_vertex, Point3};

// =============================================================================
// Table Size Invariants
// =============================================================================

#[test]
fn should_have_256_edge_table_entries() {
    assert_eq!(EDGE_TABLE.len(), 256);
}

#[test]
fn should_have_256_triangle_table_entries() {
    assert_eq!(TRI_TABLE.len(), 256);
}

#[test]
fn should_have_12_edges_and_8_corners() {
    assert_eq!(EDGE_VERTICES.len(), 12);
    assert_eq!(CORNER_OFFSETS.len(), 8);
}

// =============================================================================
// Edge Table Symmetry
// =============================================================================

#[test]
fn should_have_no_edges_for_trivial_cases() {
    assert_eq!(EDGE_TABLE[0x00], 0);
    assert_eq!(EDGE_TABLE[0xFF], 0);
}

#[test]
fn should_have_symmetric_edge_masks_for_complement_cases() {
    for i in 0..128 {
        assert_eq!(
            EDGE_TABLE[i],
            EDGE_TABLE[255 - i],
            "Asymmetry at cases {} and {}",
            i,
            255 - i
        );
    }
}

#[test]
fn should_match_edge_mask_to_triangle_edges() {
    for index in 0..=255u8 {
        let case = CubeCase::from_index(index);
        let mut mask = 0u16;
        for tri in case.triangles() {
            for e in tri {
                mask |= 1 << e;
            }
        }
        assert_eq!(mask, case.edge_mask(), "case {:#04x}", index);
    }
}

// =============================================================================
// Triangle Table Termination
// =============================================================================

#[test]
fn should_have_properly_terminated_triangle_entries() {
    for (i, entry) in TRI_TABLE.iter().enumerate() {
        let used = entry.iter().take_while(|&&e| e != -1).count();
        assert_eq!(used % 3, 0, "case {} has a partial triangle", i);
        assert!(used / 3 <= MAX_TRIANGLES_PER_CELL);
        assert!(
            entry[used..].iter().all(|&e| e == -1),
            "case {} has values after the -1 terminator",
            i
        );
        assert!(entry[..used].iter().all(|&e| (0..12).contains(&e)));
    }
}

#[test]
fn should_produce_one_triangle_for_single_corner_cases() {
    for corner in 0..8 {
        let above = CubeCase::from_index(1 << corner);
        let below = CubeCase::from_index(!(1u8 << corner));
        assert_eq!(above.triangle_count(), 1, "corner {} above", corner);
        assert_eq!(below.triangle_count(), 1, "corner {} below", corner);
    }
}

// =============================================================================
// Case-table Soundness
// =============================================================================

#[test]
fn should_only_reference_crossed_edges_in_every_case() {
    for index in 0..=255u8 {
        let case = CubeCase::from_index(index);
        for tri in case.triangles() {
            for edge in tri {
                let (a, b) = EDGE_VERTICES[edge];
                assert_ne!(
                    case.is_above(a),
                    case.is_above(b),
                    "case {:#04x} uses edge {} whose corners {} and {} agree",
                    index,
                    edge,
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn should_never_reuse_an_edge_within_one_triangle() {
    for index in 0..=255u8 {
        for [a, b, c] in CubeCase::from_index(index).triangles() {
            assert!(a != b && b != c && a != c, "case {:#04x}", index);
        }
    }
}

/// Every triangle faces the flagged corners: its geometric normal agrees with
/// the trilinear gradient of the 0/1 corner field at its centroid.
#[test]
fn should_wind_triangles_towards_flagged_corners() {
    for index in 1..255u8 {
        let case = CubeCase::from_index(index);
        let corner = |i: usize| {
            let (x, y, z) = CORNER_OFFSETS[i];
            Point3::new(x as f32, y as f32, z as f32)
        };
        let value = |i: usize| if case.is_above(i) { 1.0 } else { 0.0 };

        for tri in case.triangles() {
            let p: Vec<Point3> = tri
                .iter()
                .map(|&e| {
                    let (a, b) = EDGE_VERTICES[e];
                    interpolate_vertex(corner(a), corner(b), value(a), value(b), 0.5)
                })
                .collect();
            let normal = (p[1] - p[0]).cross(p[2] - p[0]);
            let c = (p[0] + p[1] + p[2]) / 3.0;

            let mut grad = Point3::default();
            for i in 0..8 {
                let o = corner(i);
                let wx = if o.x > 0.5 { c.x } else { 1.0 - c.x };
                let wy = if o.y > 0.5 { c.y } else { 1.0 - c.y };
                let wz = if o.z > 0.5 { c.z } else { 1.0 - c.z };
                let sx = if o.x > 0.5 { 1.0 } else { -1.0 };
                let sy = if o.y > 0.5 { 1.0 } else { -1.0 };
                let sz = if o.z > 0.5 { 1.0 } else { -1.0 };
                grad = grad + Point3::new(sx * wy * wz, wx * sy * wz, wx * wy * sz) * value(i);
            }

            assert!(
                normal.dot(grad) > 0.0,
                "case {:#04x} triangle {:?} faces away from flagged corners",
                index,
                tri
            );
        }
    }
}

// =============================================================================
// Edge and Corner Validity
// =============================================================================

#[test]
fn should_have_adjacent_corner_endpoints() {
    for (edge_idx, (v0, v1)) in EDGE_VERTICES.iter().enumerate() {
        let c0 = CORNER_OFFSETS[*v0];
        let c1 = CORNER_OFFSETS[*v1];

        let dx = (c0.0 as i32 - c1.0 as i32).abs();
        let dy = (c0.1 as i32 - c1.1 as i32).abs();
        let dz = (c0.2 as i32 - c1.2 as i32).abs();

        assert_eq!(
            dx + dy + dz,
            1,
            "Edge {} connects non-adjacent corners: {:?} and {:?}",
            edge_idx,
            c0,
            c1
        );
    }
}

#[test]
fn should_list_lower_corner_first_on_every_edge() {
    for (edge_idx, (v0, v1)) in EDGE_VERTICES.iter().enumerate() {
        let c0 = CORNER_OFFSETS[*v0];
        let c1 = CORNER_OFFSETS[*v1];
        assert!(
            c0.0 <= c1.0 && c0.1 <= c1.1 && c0.2 <= c1.2,
            "Edge {} runs from {:?} down to {:?}",
            edge_idx,
            c0,
            c1
        );
    }
}

#[test]
fn should_have_every_edge_distinct() {
    for i in 0..12 {
        for j in (i + 1)..12 {
            let (a, b) = EDGE_VERTICES[i];
            let (c, d) = EDGE_VERTICES[j];
            assert!(
                !((a == c && b == d) || (a == d && b == c)),
                "edges {} and {} coincide",
                i,
                j
            );
        }
    }
}

#[test]
fn should_have_corner_offsets_matching_trait_function() {
    for i in 0..8 {
        assert_eq!(corner_from_index(i), CORNER_OFFSETS[i]);
    }
}
