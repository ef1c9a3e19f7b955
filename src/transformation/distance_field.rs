use crate::math::Real;
use crate::shape::VoxelGrid;
use na::Point3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The squared Euclidean distance transform of a voxel grid.
///
/// Each voxel stores the squared distance, in voxel units, from its center to
/// the center of the nearest empty voxel. Everything outside of the grid is
/// considered empty, so a fully occupied grid still has finite distances.
/// Empty voxels have a distance of zero.
///
/// Distances are computed exactly with the separable algorithm of Felzenszwalb
/// and Huttenlocher: one lower-envelope-of-parabolas pass per axis. Squared
/// distances are integers, so they are stored without rounding error.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceField {
    dims: Point3<u32>,
    sq_distances: Vec<Real>,
}

impl DistanceField {
    /// Computes the distance transform of the current occupancy of `grid`.
    pub fn new(grid: &VoxelGrid) -> Self {
        let dims = grid.dims();
        let [nx, ny, nz] = [dims.x as usize, dims.y as usize, dims.z as usize];
        // Larger than any squared distance reachable inside of the grid.
        let far = ((nx + ny + nz + 3) * (nx + ny + nz + 3)) as Real;

        let mut sq_distances: Vec<Real> = grid
            .occupancy()
            .iter()
            .map(|occupied| if *occupied { far } else { 0.0 })
            .collect();

        if !sq_distances.is_empty() {
            for axis in 0..3 {
                transform_axis(&mut sq_distances, [nx, ny, nz], axis);
            }
        }

        DistanceField { dims, sq_distances }
    }

    /// The number of voxels along each axis.
    #[inline]
    pub fn dims(&self) -> Point3<u32> {
        self.dims
    }

    /// The squared distances of every voxel, in the linear order of the grid.
    #[inline]
    pub fn squared_distances(&self) -> &[Real] {
        &self.sq_distances
    }

    /// The squared distance, in voxel units, of the voxel `(i, j, k)`.
    #[inline]
    pub fn squared_distance(&self, i: u32, j: u32, k: u32) -> Real {
        let id = i as usize
            + j as usize * self.dims.x as usize
            + k as usize * self.dims.x as usize * self.dims.y as usize;
        self.sq_distances[id]
    }

    /// The distance, in voxel units, of the voxel `(i, j, k)`.
    #[inline]
    pub fn distance(&self, i: u32, j: u32, k: u32) -> Real {
        self.squared_distance(i, j, k).sqrt()
    }

    /// The largest squared distance of this field, or zero if the grid is empty.
    pub fn max_squared_distance(&self) -> Real {
        self.sq_distances.iter().copied().fold(0.0, Real::max)
    }
}

/// Runs the one-dimensional transform on every grid line parallel to `axis`.
fn transform_axis(sq_distances: &mut [Real], dims: [usize; 3], axis: usize) {
    let [nx, ny, _] = dims;
    let n = dims[axis];

    if axis == 0 {
        // Lines along `x` are already contiguous.
        transform_lines(sq_distances, n);
        return;
    }

    let stride = if axis == 1 { nx } else { nx * ny };
    let first_voxel = |l: usize| {
        if axis == 1 {
            l % nx + (l / nx) * nx * ny
        } else {
            l
        }
    };

    let num_lines = sq_distances.len() / n;
    let mut lines = vec![0.0; sq_distances.len()];

    for l in 0..num_lines {
        let base = first_voxel(l);
        for p in 0..n {
            lines[l * n + p] = sq_distances[base + p * stride];
        }
    }

    transform_lines(&mut lines, n);

    for l in 0..num_lines {
        let base = first_voxel(l);
        for p in 0..n {
            sq_distances[base + p * stride] = lines[l * n + p];
        }
    }
}

fn transform_lines(lines: &mut [Real], line_len: usize) {
    #[cfg(feature = "parallel")]
    lines.par_chunks_mut(line_len).for_each_init(
        || LineWorkspace::new(line_len),
        |workspace, line| workspace.transform(line),
    );

    #[cfg(not(feature = "parallel"))]
    {
        let mut workspace = LineWorkspace::new(line_len);
        lines
            .chunks_mut(line_len)
            .for_each(|line| workspace.transform(line));
    }
}

/// Scratch buffers of the lower envelope computation, reused across lines.
struct LineWorkspace {
    // The sampled function, with one empty sentinel sample on each side.
    f: Vec<Real>,
    // Locations of the parabolas of the lower envelope.
    v: Vec<usize>,
    // Boundaries between consecutive parabolas of the lower envelope.
    z: Vec<Real>,
}

impl LineWorkspace {
    fn new(line_len: usize) -> Self {
        LineWorkspace {
            f: vec![0.0; line_len + 2],
            v: vec![0; line_len + 2],
            z: vec![0.0; line_len + 3],
        }
    }

    fn transform(&mut self, line: &mut [Real]) {
        let m = line.len() + 2;
        let f = &mut self.f;
        let v = &mut self.v;
        let z = &mut self.z;

        f[0] = 0.0;
        f[1..m - 1].copy_from_slice(line);
        f[m - 1] = 0.0;

        let mut k = 0;
        v[0] = 0;
        z[0] = -Real::INFINITY;
        z[1] = Real::INFINITY;

        for q in 1..m {
            let fq = f[q] + (q * q) as Real;

            let mut s;
            loop {
                let p = v[k];
                s = (fq - (f[p] + (p * p) as Real)) / (2 * (q - p)) as Real;

                if s <= z[k] && k > 0 {
                    k -= 1;
                } else {
                    break;
                }
            }

            k += 1;
            v[k] = q;
            z[k] = s;
            z[k + 1] = Real::INFINITY;
        }

        k = 0;
        for (q, out) in line.iter_mut().enumerate() {
            // Skip the leading sentinel.
            let q = q + 1;

            while z[k + 1] < q as Real {
                k += 1;
            }

            let dq = q.abs_diff(v[k]);
            *out = (dq * dq) as Real + f[v[k]];
        }
    }
}
