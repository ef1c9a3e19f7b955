use crate::math::{Point, Real, Vector};
use crate::shape::{Clump, SurfaceMesh};
use crate::transformation::{ReconstructionError, SurfaceReconstruction};
use crate::utils::{self, hashmap::HashMap};
use na::{Matrix3, RealField};
use std::collections::VecDeque;

// Relative tolerance on the squared ball radius when checking that a seed ball is empty.
const EMPTY_BALL_TOLERANCE: Real = 1.0e-4;

/// Reconstructs a surface by rolling a ball of fixed radius on a point cloud.
///
/// Three points form a triangle when a ball of radius [`BallPivoting::radius`]
/// touches all of them. Starting from a seed triangle whose ball contains no
/// other point, the ball pivots around each boundary edge until it touches
/// another point, which grows the mesh along the sampled surface.
///
/// Contrary to [`RadialHull`](super::RadialHull), this follows surfaces of any
/// genus. The mesh has holes where the samples are too sparse for the ball,
/// so the radius must be somewhat larger than the sample spacing, and smaller
/// than the features of the surface (e.g. the hole of a torus).
///
/// The ball only rolls on the outer side of the surface. That side is given by
/// the spheres of [`BallPivoting::guide`] when the points were sampled on their
/// boundary. Otherwise, it is estimated from the local shape of the point
/// cloud, oriented away from its centroid.
#[derive(Clone, Debug, PartialEq)]
pub struct BallPivoting {
    /// The radius of the pivoting ball.
    pub radius: Real,
    /// The spheres whose boundary the points were sampled from.
    pub guide: Option<Clump>,
}

impl BallPivoting {
    /// A ball pivoting with normals estimated from the point cloud.
    pub fn new(radius: Real) -> Self {
        BallPivoting {
            radius,
            guide: None,
        }
    }

    /// A ball pivoting on points sampled on the boundary of the union of the
    /// spheres of `guide`.
    pub fn with_guide(radius: Real, guide: Clump) -> Self {
        BallPivoting {
            radius,
            guide: Some(guide),
        }
    }

    fn normals(&self, points: &[Point<Real>], grid: &PointGrid) -> Vec<Vector<Real>> {
        match &self.guide {
            Some(clump) if !clump.is_empty() => {
                points.iter().map(|pt| guide_normal(clump, pt)).collect()
            }
            _ => estimate_normals(points, grid, 2.0 * self.radius),
        }
    }
}

impl SurfaceReconstruction for BallPivoting {
    fn reconstruct(&self, points: &[Point<Real>]) -> Result<SurfaceMesh, ReconstructionError> {
        if points.len() < 4 {
            return Err(ReconstructionError::TooFewPoints(points.len()));
        }
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(ReconstructionError::InvalidRadius);
        }

        let grid = PointGrid::new(points, 2.0 * self.radius);
        let normals = self.normals(points, &grid);
        let mut pivoter = Pivoter::new(points, normals, grid, self.radius);
        pivoter.run();

        let open_edges = pivoter.num_open_edges();
        let mut faces = pivoter.faces;

        if faces.is_empty() {
            return Err(ReconstructionError::EmptySurface);
        }

        log::debug!(
            "Ball pivoting produced {} triangles, with {} boundary edges left.",
            faces.len(),
            open_edges
        );

        let mut vertices = points.to_vec();
        utils::remove_unused_points(&mut vertices, &mut faces);
        Ok(SurfaceMesh::new(vertices, faces))
    }
}

/// The outward normal of the sphere of `clump` whose boundary is the closest to `pt`.
fn guide_normal(clump: &Clump, pt: &Point<Real>) -> Vector<Real> {
    let mut best = (Real::MAX, Vector::z());

    for sphere in clump.spheres() {
        let dir = pt - sphere.center();
        let dist = dir.norm();
        let gap = (dist - sphere.radius()).abs();

        if gap < best.0 && dist > 0.0 {
            best = (gap, dir / dist);
        }
    }

    best.1
}

/// Estimates normals as the direction of least variance of the neighbors
/// closer than `range`, oriented away from the centroid of the point cloud.
fn estimate_normals(points: &[Point<Real>], grid: &PointGrid, range: Real) -> Vec<Vector<Real>> {
    let centroid = utils::center(points);
    let mut candidates = Vec::new();
    let mut normals = Vec::with_capacity(points.len());

    for pt in points {
        grid.neighbors(pt, &mut candidates);
        let near: Vec<_> = candidates
            .iter()
            .map(|i| points[*i as usize])
            .filter(|other| na::distance_squared(pt, other) <= range * range)
            .collect();
        let outward = pt - centroid;

        let mut normal = if near.len() >= 3 {
            let mean = near.iter().map(|p| p.coords).sum::<Vector<Real>>() / near.len() as Real;
            let mut covariance = Matrix3::zeros();

            for p in &near {
                let delta = p.coords - mean;
                covariance += delta * delta.transpose();
            }

            let eigen = covariance.symmetric_eigen();
            eigen.eigenvectors.column(eigen.eigenvalues.imin()).into_owned()
        } else {
            outward
        };

        if normal.dot(&outward) < 0.0 {
            normal = -normal;
        }

        normals.push(normal.try_normalize(0.0).unwrap_or_else(Vector::z));
    }

    normals
}

/// The center of the ball of radius `radius` touching `a`, `b` and `c`, on the
/// side pointed to by the normal `(b - a) × (c - a)`.
///
/// Returns `None` if the triangle is degenerate or if its circumradius is
/// larger than `radius`.
fn ball_center(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    radius: Real,
) -> Option<Point<Real>> {
    let ab = b - a;
    let ac = c - a;
    let normal = ab.cross(&ac);
    let normal_sq = normal.norm_squared();

    if normal_sq <= Real::EPSILON * ab.norm_squared() * ac.norm_squared() {
        return None;
    }

    let to_circumcenter = (normal.cross(&ab) * ac.norm_squared()
        + ac.cross(&normal) * ab.norm_squared())
        / (2.0 * normal_sq);
    let height_sq = radius * radius - to_circumcenter.norm_squared();

    if height_sq < 0.0 {
        return None;
    }

    Some(a + to_circumcenter + normal * (height_sq / normal_sq).sqrt())
}

/// Point indices bucketed in cubic cells.
struct PointGrid {
    cells: HashMap<[i32; 3], Vec<u32>>,
    cell_size: Real,
}

impl PointGrid {
    fn new(points: &[Point<Real>], cell_size: Real) -> Self {
        let mut cells: HashMap<[i32; 3], Vec<u32>> = HashMap::default();

        for (i, pt) in points.iter().enumerate() {
            cells
                .entry(Self::cell(pt, cell_size))
                .or_default()
                .push(i as u32);
        }

        PointGrid { cells, cell_size }
    }

    fn cell(pt: &Point<Real>, cell_size: Real) -> [i32; 3] {
        [
            (pt.x / cell_size).floor() as i32,
            (pt.y / cell_size).floor() as i32,
            (pt.z / cell_size).floor() as i32,
        ]
    }

    /// Collects in `out` the points of the cells adjacent to the cell of `pt`.
    ///
    /// This includes every point closer to `pt` than the cell size.
    fn neighbors(&self, pt: &Point<Real>, out: &mut Vec<u32>) {
        out.clear();
        let [i, j, k] = Self::cell(pt, self.cell_size);

        for di in -1..=1 {
            for dj in -1..=1 {
                for dk in -1..=1 {
                    if let Some(ids) = self.cells.get(&[i + di, j + dj, k + dk]) {
                        out.extend_from_slice(ids);
                    }
                }
            }
        }
    }
}

struct Pivoter<'a> {
    points: &'a [Point<Real>],
    normals: Vec<Vector<Real>>,
    grid: PointGrid,
    radius: Real,
    /// Every directed edge of the mesh, with the opposite vertex of its
    /// triangle and the center of the ball resting on that triangle.
    half_edges: HashMap<(u32, u32), (u32, Point<Real>)>,
    /// Edges to pivot around.
    front: VecDeque<(u32, u32)>,
    /// The number of edges without twin touching each vertex.
    open_degree: Vec<u32>,
    used: Vec<bool>,
    faces: Vec<[u32; 3]>,
    candidates: Vec<u32>,
}

impl<'a> Pivoter<'a> {
    fn new(
        points: &'a [Point<Real>],
        normals: Vec<Vector<Real>>,
        grid: PointGrid,
        radius: Real,
    ) -> Self {
        Pivoter {
            points,
            normals,
            grid,
            radius,
            half_edges: HashMap::default(),
            front: VecDeque::new(),
            open_degree: vec![0; points.len()],
            used: vec![false; points.len()],
            faces: Vec::new(),
            candidates: Vec::new(),
        }
    }

    fn run(&mut self) {
        let mut next_seed = 0;

        loop {
            while let Some((a, b)) = self.front.pop_front() {
                if self.half_edges.contains_key(&(b, a)) {
                    // Already glued to another triangle.
                    continue;
                }

                if let Some((x, center)) = self.pivot(a, b) {
                    if self.can_attach(x) {
                        let _ = self.add_triangle([b, a, x], center);
                    }
                }
            }

            match self.find_seed(&mut next_seed) {
                Some((triangle, center)) => {
                    let _ = self.add_triangle(triangle, center);
                }
                None => break,
            }
        }
    }

    fn num_open_edges(&self) -> usize {
        self.half_edges
            .keys()
            .filter(|(a, b)| !self.half_edges.contains_key(&(*b, *a)))
            .count()
    }

    fn point(&self, i: u32) -> Point<Real> {
        self.points[i as usize]
    }

    fn triangle_normal(&self, [a, b, c]: [u32; 3]) -> Vector<Real> {
        let (pa, pb, pc) = (self.point(a), self.point(b), self.point(c));
        (pb - pa).cross(&(pc - pa))
    }

    /// Rotates the ball resting on the triangle of the edge `(a, b)` around
    /// that edge, and returns the first point it touches with the center of
    /// the ball at that moment.
    fn pivot(&mut self, a: u32, b: u32) -> Option<(u32, Point<Real>)> {
        let (c, old_center) = *self.half_edges.get(&(a, b))?;
        let (pa, pb) = (self.point(a), self.point(b));
        let mid = na::center(&pa, &pb);
        let axis = (pb - pa).try_normalize(0.0)?;
        let from = old_center - mid;

        self.grid.neighbors(&mid, &mut self.candidates);
        let mut best: Option<(Real, u32, Point<Real>)> = None;

        for &x in &self.candidates {
            if x == a || x == b || x == c {
                continue;
            }

            let Some(center) = ball_center(&pb, &pa, &self.point(x), self.radius) else {
                continue;
            };

            // The new triangle must face the same side as its vertex normals.
            let normal_sum: Vector<Real> = [a, b, x]
                .iter()
                .map(|i| self.normals[*i as usize])
                .sum();
            if self.triangle_normal([b, a, x]).dot(&normal_sum) <= 0.0 {
                continue;
            }

            let to = center - mid;
            let mut angle = axis.dot(&from.cross(&to)).atan2(from.dot(&to));
            if angle < 0.0 {
                angle += Real::two_pi();
            }

            match best {
                Some((best_angle, ..)) if best_angle <= angle => {}
                _ => best = Some((angle, x, center)),
            }
        }

        best.map(|(_, x, center)| (x, center))
    }

    /// Can a new triangle be attached to `x` without making it an interior
    /// vertex of two separate fans?
    fn can_attach(&self, x: u32) -> bool {
        !self.used[x as usize] || self.open_degree[x as usize] > 0
    }

    /// Adds a triangle unless one of its directed edges is already part of the mesh.
    fn add_triangle(&mut self, triangle: [u32; 3], center: Point<Real>) -> bool {
        let [a, b, c] = triangle;
        let edges = [(a, b), (b, c), (c, a)];

        if edges.iter().any(|e| self.half_edges.contains_key(e)) {
            return false;
        }

        for (k, &(u, v)) in edges.iter().enumerate() {
            let _ = self
                .half_edges
                .insert((u, v), (triangle[(k + 2) % 3], center));

            if self.half_edges.contains_key(&(v, u)) {
                self.open_degree[u as usize] -= 1;
                self.open_degree[v as usize] -= 1;
            } else {
                self.open_degree[u as usize] += 1;
                self.open_degree[v as usize] += 1;
                self.front.push_back((u, v));
            }
        }

        for i in triangle {
            self.used[i as usize] = true;
        }

        self.faces.push(triangle);
        true
    }

    /// Finds three unused points touched by an empty ball, starting the
    /// search at the point `*start`.
    fn find_seed(&mut self, start: &mut usize) -> Option<([u32; 3], Point<Real>)> {
        let diameter_sq = 4.0 * self.radius * self.radius;

        while *start < self.points.len() {
            let i = *start as u32;
            *start += 1;

            if self.used[i as usize] {
                continue;
            }

            let pi = self.point(i);
            self.grid.neighbors(&pi, &mut self.candidates);

            let mut near: Vec<_> = self
                .candidates
                .iter()
                .copied()
                .filter(|j| {
                    *j != i
                        && !self.used[*j as usize]
                        && na::distance_squared(&pi, &self.point(*j)) <= diameter_sq
                })
                .collect();
            near.sort_by(|j, k| {
                na::distance_squared(&pi, &self.point(*j))
                    .total_cmp(&na::distance_squared(&pi, &self.point(*k)))
            });

            for (n, &j) in near.iter().enumerate() {
                for &k in &near[n + 1..] {
                    let triangle = if self
                        .triangle_normal([i, j, k])
                        .dot(&self.normals[i as usize])
                        >= 0.0
                    {
                        [i, j, k]
                    } else {
                        [i, k, j]
                    };

                    let normal = self.triangle_normal(triangle);
                    if triangle
                        .iter()
                        .any(|v| normal.dot(&self.normals[*v as usize]) <= 0.0)
                    {
                        continue;
                    }

                    let [p0, p1, p2] = triangle.map(|v| self.point(v));
                    let Some(center) = ball_center(&p0, &p1, &p2, self.radius) else {
                        continue;
                    };

                    if self.ball_is_empty(&center, triangle) {
                        return Some((triangle, center));
                    }
                }
            }
        }

        None
    }

    fn ball_is_empty(&mut self, center: &Point<Real>, triangle: [u32; 3]) -> bool {
        let limit = self.radius * self.radius * (1.0 - EMPTY_BALL_TOLERANCE);
        self.grid.neighbors(center, &mut self.candidates);
        self.candidates.iter().all(|x| {
            triangle.contains(x) || na::distance_squared(center, &self.point(*x)) >= limit
        })
    }
}

#[cfg(test)]
mod test {
    use super::{ball_center, BallPivoting};
    use crate::math::{Point, Real};
    use crate::shape::Sphere;
    use crate::transformation::{ReconstructionError, SurfaceReconstruction};
    use crate::utils::hashmap::HashMap;

    #[test]
    fn ball_center_lies_on_the_normal_side() {
        let a = Point::new(0.0, 0.0, 0.0);
        let b = Point::new(1.0, 0.0, 0.0);
        let c = Point::new(0.0, 1.0, 0.0);

        let center = ball_center(&a, &b, &c, 1.0).unwrap();
        assert_relative_eq!(center, Point::new(0.5, 0.5, 0.5f64.sqrt() as Real), epsilon = 1.0e-5);
        assert!(ball_center(&a, &c, &b, 1.0).unwrap().z < 0.0);

        // The circumradius is larger than the ball.
        assert!(ball_center(&a, &b, &c, 0.5).is_none());
    }

    #[test]
    fn sphere_samples_are_triangulated_outward() {
        let radius = 0.3;
        let points = Sphere::new(Point::new(0.5, 1.0, -2.0), 1.0)
            .unwrap()
            .surface_points(300);
        let mesh = BallPivoting::new(radius).reconstruct(&points).unwrap();

        assert!(mesh.faces.len() > points.len());

        let mut directed = HashMap::default();

        for face in &mesh.faces {
            let [a, b, c] = face.map(|i| mesh.vertices[i as usize]);
            let normal = (b - a).cross(&(c - a));
            assert!(normal.dot(&(a - Point::new(0.5, 1.0, -2.0))) > 0.0);

            for (p, q) in [(a, b), (b, c), (c, a)] {
                assert!(na::distance(&p, &q) <= 2.0 * radius + 1.0e-4);
            }

            for k in 0..3 {
                // Each directed edge belongs to a single triangle.
                assert!(directed.insert((face[k], face[(k + 1) % 3]), ()).is_none());
            }
        }
    }

    #[test]
    fn sparse_or_invalid_inputs_are_rejected() {
        let corners = [
            Point::new(0.0, 0.0, 0.0),
            Point::new(10.0, 0.0, 0.0),
            Point::new(0.0, 10.0, 0.0),
            Point::new(0.0, 0.0, 10.0),
        ];

        assert_eq!(
            BallPivoting::new(0.1).reconstruct(&corners),
            Err(ReconstructionError::EmptySurface)
        );
        assert_eq!(
            BallPivoting::new(0.0).reconstruct(&corners),
            Err(ReconstructionError::InvalidRadius)
        );
        assert_eq!(
            BallPivoting::new(1.0).reconstruct(&corners[..2]),
            Err(ReconstructionError::TooFewPoints(2))
        );
    }
}
