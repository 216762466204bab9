//! Mesh accumulation with optional vertex welding.
//!
//! Marching cubes emits each triangle as three free-standing positions. The
//! accumulator turns that stream into an indexed [`Mesh`], either keeping
//! every vertex (the default) or merging vertices that land on the same
//! position.

use hashbrown::HashMap;
use isosurf_core::Point3;

use crate::error::{IsosurfError, Result};
use crate::mesh::Mesh;

/// How the accumulator merges duplicate vertices.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum WeldMode {
    /// Every triangle gets three fresh vertices.
    #[default]
    None,
    /// Merge vertices with bit-identical coordinates.
    ///
    /// Neighbouring cells interpolate a shared edge in the same direction,
    /// so this is enough to join the whole surface.
    Exact,
    /// Merge vertices that quantize to the same cell of a lattice with
    /// spacing `tolerance`.
    SpatialHash {
        /// Lattice spacing in physical units. Must be finite and positive.
        tolerance: f32,
    },
}

impl WeldMode {
    /// Check the mode's parameters.
    ///
    /// # Errors
    /// Returns `InvalidTolerance` for a non-finite or non-positive tolerance.
    pub fn validate(&self) -> Result<()> {
        match *self {
            WeldMode::SpatialHash { tolerance } if !(tolerance.is_finite() && tolerance > 0.0) => {
                Err(IsosurfError::InvalidTolerance(tolerance))
            }
            _ => Ok(()),
        }
    }

    /// Whether vertices are merged at all.
    #[inline]
    pub fn is_welding(&self) -> bool {
        !matches!(self, WeldMode::None)
    }
}

/// Hash key for a welded vertex.
type VertexKey = [i64; 3];

/// Vertices addressable by `u32` triangle indices.
const MAX_VERTICES: usize = u32::MAX as usize;

/// Builds an indexed mesh from a stream of triangles.
///
/// # Example
///
/// ```ignore
/// use isosurf::{MeshAccumulator, WeldMode};
///
/// let mut acc = MeshAccumulator::with_weld(WeldMode::Exact)?;
/// acc.add_triangle(a, b, c)?;
/// acc.add_triangle(a, c, d)?;
/// let mesh = acc.finalize();
/// assert_eq!(mesh.vertex_count(), 4);
/// ```
#[derive(Debug)]
pub struct MeshAccumulator {
    weld: WeldMode,
    positions: Vec<Point3>,
    normals: Option<Vec<Point3>>,
    triangles: Vec<[u32; 3]>,
    lookup: HashMap<VertexKey, u32>,
    dropped: usize,
    vertex_limit: usize,
}

impl Default for MeshAccumulator {
    fn default() -> Self {
        Self {
            weld: WeldMode::default(),
            positions: Vec::new(),
            normals: None,
            triangles: Vec::new(),
            lookup: HashMap::new(),
            dropped: 0,
            vertex_limit: MAX_VERTICES,
        }
    }
}

impl MeshAccumulator {
    /// Create a non-welding accumulator without normals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator using `weld`.
    ///
    /// # Errors
    /// Returns `InvalidTolerance` if the weld mode is misconfigured.
    pub fn with_weld(weld: WeldMode) -> Result<Self> {
        weld.validate()?;
        Ok(Self {
            weld,
            ..Self::default()
        })
    }

    /// Record per-vertex normals in the output mesh.
    pub fn with_normals(mut self) -> Self {
        if self.normals.is_none() {
            self.normals = Some(Vec::with_capacity(self.positions.capacity()));
        }
        self
    }

    /// Reserve room for `additional` more triangles.
    pub fn reserve(&mut self, additional: usize) {
        self.triangles.reserve(additional);
        if !self.weld.is_welding() {
            self.positions.reserve(additional * 3);
            if let Some(normals) = &mut self.normals {
                normals.reserve(additional * 3);
            }
        }
    }

    /// The active weld mode.
    #[inline]
    pub fn weld_mode(&self) -> WeldMode {
        self.weld
    }

    /// Vertices stored so far.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangles stored so far.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Triangles discarded because welding collapsed two of their corners.
    #[inline]
    pub fn dropped_triangles(&self) -> usize {
        self.dropped
    }

    /// Append one triangle.
    ///
    /// When normals are enabled the new vertices get a zero normal.
    ///
    /// # Errors
    /// Returns `MeshTooLarge`, leaving the accumulator unchanged, when three
    /// more vertices would exceed what 32-bit indices can address.
    pub fn add_triangle(&mut self, p0: Point3, p1: Point3, p2: Point3) -> Result<()> {
        let zero = Point3::default();
        self.push_triangle([p0, p1, p2], [zero; 3])
    }

    /// Append one triangle with a normal for each corner.
    ///
    /// Normals are ignored unless enabled with [`Self::with_normals`]. A
    /// welded vertex keeps the normal it was first added with.
    pub fn add_triangle_with_normals(
        &mut self,
        positions: [Point3; 3],
        normals: [Point3; 3],
    ) -> Result<()> {
        self.push_triangle(positions, normals)
    }

    fn push_triangle(&mut self, positions: [Point3; 3], normals: [Point3; 3]) -> Result<()> {
        if self.positions.len() + 3 > self.vertex_limit {
            return Err(self.too_large());
        }

        let keys = match self.weld {
            WeldMode::None => None,
            WeldMode::Exact => Some(positions.map(exact_key)),
            WeldMode::SpatialHash { tolerance } => {
                Some(positions.map(|p| quantized_key(p, tolerance)))
            }
        };

        let mut indices = [0u32; 3];
        match keys {
            None => {
                for i in 0..3 {
                    indices[i] = self.insert(positions[i], normals[i])?;
                }
            }
            Some(keys) => {
                // Equal keys weld to one vertex; drop before inserting anything.
                if keys[0] == keys[1] || keys[1] == keys[2] || keys[0] == keys[2] {
                    self.dropped += 1;
                    return Ok(());
                }
                for i in 0..3 {
                    indices[i] = self.welded(keys[i], positions[i], normals[i])?;
                }
            }
        }

        self.triangles.push(indices);
        Ok(())
    }

    /// Index of the welded vertex for `key`, inserting it if needed.
    fn welded(&mut self, key: VertexKey, p: Point3, n: Point3) -> Result<u32> {
        if let Some(&index) = self.lookup.get(&key) {
            return Ok(index);
        }
        let index = self.insert(p, n)?;
        self.lookup.insert(key, index);
        Ok(index)
    }

    fn insert(&mut self, p: Point3, n: Point3) -> Result<u32> {
        let index = u32::try_from(self.positions.len()).map_err(|_| self.too_large())?;

        self.positions.push(p);
        if let Some(normals) = &mut self.normals {
            normals.push(n);
        }
        Ok(index)
    }

    fn too_large(&self) -> IsosurfError {
        IsosurfError::MeshTooLarge {
            limit: self.vertex_limit,
        }
    }

    /// Consume the accumulator and return the mesh.
    pub fn finalize(self) -> Mesh {
        if self.dropped > 0 {
            log::debug!("welding dropped {} collapsed triangles", self.dropped);
        }
        Mesh::from_parts(self.positions, self.triangles, self.normals)
    }
}

#[inline]
fn exact_key(p: Point3) -> VertexKey {
    // -0.0 and 0.0 are the same position.
    let bits = |v: f32| if v == 0.0 { 0 } else { v.to_bits() as i64 };
    [bits(p.x), bits(p.y), bits(p.z)]
}

#[inline]
fn quantized_key(p: Point3, tolerance: f32) -> VertexKey {
    let q = |v: f32| (v / tolerance).round() as i64;
    [q(p.x), q(p.y), q(p.z)]
}
