//! Cube case classification.

use super::tables::{EDGE_TABLE, EDGE_VERTICES, TRI_TABLE};

/// The 8-bit configuration of one cell.
///
/// Bit `i` is set when corner `i` samples at or above the isovalue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CubeCase(u8);

impl CubeCase {
    /// Every corner below the isovalue.
    pub const EMPTY: CubeCase = CubeCase(0x00);
    /// Every corner at or above the isovalue.
    pub const FULL: CubeCase = CubeCase(0xFF);

    /// Wrap a raw case index.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        Self(index)
    }

    /// Classify a cell from its corner samples in canonical corner order.
    ///
    /// NaN samples compare false and therefore count as below the isovalue.
    #[inline]
    pub fn classify(corner_values: &[f32; 8], iso_value: f32) -> Self {
        let mut index = 0u8;
        for (i, &val) in corner_values.iter().enumerate() {
            if val >= iso_value {
                index |= 1 << i;
            }
        }
        Self(index)
    }

    /// The raw 8-bit case index.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// True for the two cases without any surface (`0x00` and `0xFF`).
    #[inline]
    pub const fn is_trivial(self) -> bool {
        self.0 == 0x00 || self.0 == 0xFF
    }

    /// Whether `corner` is flagged (at or above the isovalue).
    #[inline]
    pub const fn is_above(self, corner: usize) -> bool {
        (self.0 >> (corner & 7)) & 1 == 1
    }

    /// Whether the surface crosses `edge`, i.e. its two corners disagree.
    #[inline]
    pub const fn crosses_edge(self, edge: usize) -> bool {
        let (a, b) = EDGE_VERTICES[edge];
        self.is_above(a) != self.is_above(b)
    }

    /// 12-bit mask of the edges referenced by this case's triangles.
    #[inline]
    pub const fn edge_mask(self) -> u16 {
        EDGE_TABLE[self.0 as usize]
    }

    /// Triangles for this case as triples of edge indices.
    #[inline]
    pub fn triangles(self) -> CaseTriangles {
        CaseTriangles {
            row: &TRI_TABLE[self.0 as usize],
            pos: 0,
        }
    }

    /// Number of triangles this case emits.
    #[inline]
    pub fn triangle_count(self) -> usize {
        TRI_TABLE[self.0 as usize]
            .iter()
            .take_while(|&&e| e != -1)
            .count()
            / 3
    }
}

/// Iterator over the edge triples of one row of the triangle table.
#[derive(Debug, Clone)]
pub struct CaseTriangles {
    row: &'static [i8; 16],
    pos: usize,
}

impl Iterator for CaseTriangles {
    type Item = [usize; 3];

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos + 2 >= self.row.len() || self.row[self.pos] == -1 {
            return None;
        }
        let tri = [
            self.row[self.pos] as usize,
            self.row[self.pos + 1] as usize,
            self.row[self.pos + 2] as usize,
        ];
        self.pos += 3;
        Some(tri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_extremes() {
        assert_eq!(CubeCase::classify(&[0.0; 8], 1.0), CubeCase::EMPTY);
        assert_eq!(CubeCase::classify(&[2.0; 8], 1.0), CubeCase::FULL);
        assert!(CubeCase::EMPTY.is_trivial());
        assert!(CubeCase::FULL.is_trivial());
    }

    #[test]
    fn test_classify_equal_counts_as_above() {
        let mut values = [0.0; 8];
        values[3] = 0.5;
        let case = CubeCase::classify(&values, 0.5);
        assert_eq!(case.index(), 0b0000_1000);
        assert!(case.is_above(3));
        assert!(!case.is_above(2));
    }

    #[test]
    fn test_classify_nan_is_below() {
        let mut values = [1.0; 8];
        values[0] = f32::NAN;
        assert_eq!(CubeCase::classify(&values, 0.5).index(), 0b1111_1110);
    }

    #[test]
    fn test_single_corner_triangle() {
        let case = CubeCase::from_index(0b0000_0001);
        let mut tris = case.triangles();
        assert_eq!(tris.next(), Some([0, 8, 3]));
        assert_eq!(tris.next(), None);
        assert_eq!(case.triangle_count(), 1);
    }

    #[test]
    fn test_trivial_cases_have_no_triangles() {
        assert_eq!(CubeCase::EMPTY.triangles().count(), 0);
        assert_eq!(CubeCase::FULL.triangles().count(), 0);
        assert_eq!(CubeCase::EMPTY.edge_mask(), 0);
    }

    #[test]
    fn test_crosses_edge_matches_edge_mask() {
        for index in 0..=255u8 {
            let case = CubeCase::from_index(index);
            for edge in 0..12 {
                let in_mask = case.edge_mask() & (1 << edge) != 0;
                assert_eq!(in_mask, case.crosses_edge(edge), "case {} edge {}", index, edge);
            }
        }
    }
}
