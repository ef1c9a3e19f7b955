use crate::math::{Point, Real, Vector};
use crate::ClumpError;
use na::Point3;

/// A dense 3D binary occupancy grid with cubic voxels.
///
/// The voxel with integer coordinates `(i, j, k)` has its center at
/// `origin + (i, j, k) * pitch` and spans `pitch` along each axis.
///
/// Voxels are stored in linear order: `i + j * nx + k * nx * ny`. This is also
/// the iteration order used whenever a deterministic "first" voxel is needed.
///
/// The sphere packer mutates a grid in place (voxels are only ever cleared).
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    origin: Point<Real>,
    pitch: Real,
    dims: Point3<u32>,
    occupancy: Vec<bool>,
}

impl VoxelGrid {
    /// Creates a grid where every voxel is empty.
    pub fn new(dims: Point3<u32>, pitch: Real, origin: Point<Real>) -> Result<Self, ClumpError> {
        let len = dims.iter().map(|e| *e as usize).product();
        Self::from_occupancy(dims, vec![false; len], pitch, origin)
    }

    /// Creates a grid from a pre-built occupancy image, in linear order
    /// (see the type-level documentation).
    pub fn from_occupancy(
        dims: Point3<u32>,
        occupancy: Vec<bool>,
        pitch: Real,
        origin: Point<Real>,
    ) -> Result<Self, ClumpError> {
        let len: usize = dims.iter().map(|e| *e as usize).product();

        if occupancy.len() != len {
            return Err(ClumpError::InvalidGeometry(
                "the occupancy buffer does not match the grid dimensions",
            ));
        }
        if !(pitch > 0.0) || !pitch.is_finite() {
            return Err(ClumpError::InvalidGeometry(
                "the voxel pitch must be finite and positive",
            ));
        }
        if origin.iter().any(|e| !e.is_finite()) {
            return Err(ClumpError::InvalidGeometry("the grid origin must be finite"));
        }

        Ok(VoxelGrid {
            origin,
            pitch,
            dims,
            occupancy,
        })
    }

    /// Creates a grid whose occupancy is given by a closure of the voxel coordinates.
    pub fn from_fn(
        dims: Point3<u32>,
        pitch: Real,
        origin: Point<Real>,
        mut occupied: impl FnMut(u32, u32, u32) -> bool,
    ) -> Result<Self, ClumpError> {
        let mut grid = Self::new(dims, pitch, origin)?;

        for k in 0..dims.z {
            for j in 0..dims.y {
                for i in 0..dims.x {
                    let id = grid.voxel_index(i, j, k);
                    grid.occupancy[id] = occupied(i, j, k);
                }
            }
        }

        Ok(grid)
    }

    /// The number of voxels along each axis.
    #[inline]
    pub fn dims(&self) -> Point3<u32> {
        self.dims
    }

    /// The edge length of a voxel.
    #[inline]
    pub fn pitch(&self) -> Real {
        self.pitch
    }

    /// The center of the voxel `(0, 0, 0)`.
    #[inline]
    pub fn origin(&self) -> Point<Real> {
        self.origin
    }

    /// The total number of voxels (occupied or not) of this grid.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupancy.len()
    }

    /// Does this grid have zero voxels?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty()
    }

    /// The occupancy of every voxel, in linear order.
    #[inline]
    pub fn occupancy(&self) -> &[bool] {
        &self.occupancy
    }

    /// The number of occupied voxels.
    pub fn num_occupied(&self) -> usize {
        self.occupancy.iter().filter(|v| **v).count()
    }

    /// The linear index of the voxel `(i, j, k)`.
    #[inline]
    pub fn voxel_index(&self, i: u32, j: u32, k: u32) -> usize {
        i as usize + j as usize * self.dims.x as usize
            + k as usize * self.dims.x as usize * self.dims.y as usize
    }

    /// The integer coordinates of the voxel with the given linear index.
    #[inline]
    pub fn voxel_coords(&self, index: usize) -> Point3<u32> {
        let nx = self.dims.x as usize;
        let ny = self.dims.y as usize;
        Point3::new(
            (index % nx) as u32,
            ((index / nx) % ny) as u32,
            (index / (nx * ny)) as u32,
        )
    }

    /// Is the voxel `(i, j, k)` occupied?
    ///
    /// Voxels outside of the grid are considered empty.
    #[inline]
    pub fn is_occupied(&self, i: u32, j: u32, k: u32) -> bool {
        i < self.dims.x
            && j < self.dims.y
            && k < self.dims.z
            && self.occupancy[self.voxel_index(i, j, k)]
    }

    /// Sets the occupancy of the voxel `(i, j, k)`.
    ///
    /// # Panics
    ///
    /// Panics if the voxel is outside of the grid.
    #[inline]
    pub fn set_occupied(&mut self, i: u32, j: u32, k: u32, occupied: bool) {
        assert!(i < self.dims.x && j < self.dims.y && k < self.dims.z);
        let id = self.voxel_index(i, j, k);
        self.occupancy[id] = occupied;
    }

    /// The world-space center of the voxel with the given integer coordinates.
    #[inline]
    pub fn voxel_center(&self, voxel: &Point3<u32>) -> Point<Real> {
        let ijk: Vector<Real> = voxel.coords.map(|e| e as Real);
        self.origin + ijk * self.pitch
    }

    /// The mean integer coordinates of the occupied voxels, or `None` if no
    /// voxel is occupied.
    ///
    /// This is expressed in voxel units, not in world-space.
    pub fn occupied_centroid(&self) -> Option<Point<Real>> {
        let mut sum = Vector::<Real>::zeros();
        let mut count = 0usize;

        for (id, _) in self.occupancy.iter().enumerate().filter(|(_, v)| **v) {
            let coords = self.voxel_coords(id);
            sum += coords.coords.map(|e| e as Real);
            count += 1;
        }

        if count == 0 {
            None
        } else {
            Some(Point::from(sum / count as Real))
        }
    }

    /// Clears every voxel whose center is at a distance smaller than, or equal
    /// to, `radius` (in voxel units) from the center of the voxel `center`.
    ///
    /// Returns the number of voxels that were occupied before this call and
    /// are now empty.
    pub fn carve_ball(&mut self, center: &Point3<u32>, radius: Real) -> usize {
        if !(radius >= 0.0) {
            return 0;
        }

        let reach = radius.floor() as i64;
        let sq_radius = radius * radius;
        let mut cleared = 0;

        let range = |c: u32, n: u32| {
            let lo = (c as i64 - reach).max(0);
            let hi = (c as i64 + reach).min(n as i64 - 1);
            lo..=hi
        };

        for k in range(center.z, self.dims.z) {
            let dk = k - center.z as i64;
            for j in range(center.y, self.dims.y) {
                let dj = j - center.y as i64;
                for i in range(center.x, self.dims.x) {
                    let di = i - center.x as i64;
                    let sq_dist = (di * di + dj * dj + dk * dk) as Real;

                    if sq_dist <= sq_radius {
                        let id = self.voxel_index(i as u32, j as u32, k as u32);
                        if self.occupancy[id] {
                            self.occupancy[id] = false;
                            cleared += 1;
                        }
                    }
                }
            }
        }

        cleared
    }

    /// Returns a copy of this grid with a ball carved out.
    ///
    /// See [`VoxelGrid::carve_ball`].
    pub fn carved(&self, center: &Point3<u32>, radius: Real) -> VoxelGrid {
        let mut result = self.clone();
        let _ = result.carve_ball(center, radius);
        result
    }
}
