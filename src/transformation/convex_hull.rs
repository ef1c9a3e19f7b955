use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::utils::{self, hashmap::HashMap};

/// Errors that can occur during convex hull computation.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConvexHullError {
    /// Less than four points were given.
    #[error("at least four points are needed to compute a 3D convex hull")]
    IncompleteInput,
    /// At least one point has a NaN or infinite coordinate.
    #[error("the input contains a NaN or infinite coordinate")]
    InvalidCoordinates,
    /// All the points are coplanar, collinear, or identical.
    #[error("the input points are coplanar or collinear")]
    Degenerate,
}

// Visibility threshold, relative to the normalized point cloud.
const VISIBILITY_EPS: Real = DEFAULT_EPSILON * 100.0;

struct Facet {
    pts: [u32; 3],
    normal: Vector<Real>,
    valid: bool,
}

impl Facet {
    fn new(pts: [u32; 3], points: &[Point<Real>]) -> Self {
        let [a, b, c] = pts.map(|i| points[i as usize]);
        // A degenerate facet gets a zero normal: no point will ever see it.
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(0.0)
            .unwrap_or_else(Vector::zeros);

        Facet {
            pts,
            normal,
            valid: true,
        }
    }

    fn distance_to_point(&self, point: &Point<Real>, points: &[Point<Real>]) -> Real {
        self.normal.dot(&(point - points[self.pts[0] as usize]))
    }

    fn edges(&self) -> [(u32, u32); 3] {
        let [a, b, c] = self.pts;
        [(a, b), (b, c), (c, a)]
    }
}

/// Computes the convex hull of a set of 3D points.
///
/// Returns the hull vertices and its triangles, oriented counter-clockwise
/// when seen from outside. Points that are not vertices of the hull are removed.
pub fn try_convex_hull(
    points: &[Point<Real>],
) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), ConvexHullError> {
    let mut idx = convex_hull_idx(points)?;
    let mut vertices = points.to_vec();
    utils::remove_unused_points(&mut vertices, &mut idx);
    Ok((vertices, idx))
}

/// Computes the triangles of the convex hull of a set of 3D points, as
/// indices into `points`.
///
/// The result is always a closed, consistently oriented (outward),
/// triangulation with the topology of a sphere. Points that are inside of the
/// hull, or that lie on it within a small tolerance, are not referenced.
pub fn convex_hull_idx(points: &[Point<Real>]) -> Result<Vec<[u32; 3]>, ConvexHullError> {
    if points.len() < 4 {
        return Err(ConvexHullError::IncompleteInput);
    }
    if points.iter().any(|p| p.iter().any(|e| !e.is_finite())) {
        return Err(ConvexHullError::InvalidCoordinates);
    }

    let normalized = normalize(points).ok_or(ConvexHullError::Degenerate)?;
    let simplex = initial_simplex(&normalized)?;
    let mut hull = HullBuilder::new(&normalized, simplex);

    // Points with a pinched horizon get a second chance once every other
    // point has been added.
    let deferred: Vec<_> = (0..normalized.len() as u32)
        .filter(|id| !simplex.contains(id) && !hull.add_point(*id))
        .collect();
    let skipped = deferred.into_iter().filter(|id| !hull.add_point(*id)).count();

    if skipped > 0 {
        log::warn!(
            "{} hull points skipped because their visible region is not a topological disk.",
            skipped
        );
    }

    Ok(hull.into_triangles())
}

struct HullBuilder<'a> {
    points: &'a [Point<Real>],
    facets: Vec<Facet>,
    edge_to_facet: HashMap<(u32, u32), usize>,
    live: Vec<usize>,
    visible: Vec<usize>,
    horizon: Vec<(u32, u32)>,
}

impl<'a> HullBuilder<'a> {
    fn new(points: &'a [Point<Real>], simplex: [u32; 4]) -> Self {
        let mut hull = HullBuilder {
            points,
            facets: Vec::new(),
            edge_to_facet: HashMap::default(),
            live: Vec::new(),
            visible: Vec::new(),
            horizon: Vec::new(),
        };

        let inner = utils::center(&simplex.map(|i| points[i as usize]));
        let [a, b, c, d] = simplex;

        for [p1, p2, p3] in [[a, b, c], [a, c, d], [a, d, b], [b, d, c]] {
            let mut facet = Facet::new([p1, p2, p3], points);

            if facet.distance_to_point(&inner, points) > 0.0 {
                facet = Facet::new([p1, p3, p2], points);
            }

            hull.push_facet(facet);
        }

        hull
    }

    /// Adds a point to the hull.
    ///
    /// Returns `false` if the point is outside of the hull but could not be
    /// attached without breaking its topology.
    fn add_point(&mut self, id: u32) -> bool {
        let point = self.points[id as usize];
        let most_visible = self
            .live
            .iter()
            .map(|f| (*f, self.facets[*f].distance_to_point(&point, self.points)))
            .filter(|(_, dist)| *dist > VISIBILITY_EPS)
            .max_by(|a, b| a.1.total_cmp(&b.1));

        let Some((seed, _)) = most_visible else {
            // The point is inside of the current hull.
            return true;
        };

        // Only the visible facets connected to the most visible one are
        // replaced, so the removed region is a single patch.
        self.visible.clear();
        self.visible.push(seed);
        let mut curr = 0;

        while curr < self.visible.len() {
            let f = self.visible[curr];
            curr += 1;

            for (u, v) in self.facets[f].edges() {
                if let Some(&adj) = self.edge_to_facet.get(&(v, u)) {
                    if !self.visible.contains(&adj)
                        && self.facets[adj].distance_to_point(&point, self.points) > VISIBILITY_EPS
                    {
                        self.visible.push(adj);
                    }
                }
            }
        }

        if !compute_horizon(
            &self.visible,
            &self.facets,
            &self.edge_to_facet,
            &mut self.horizon,
        ) {
            return false;
        }

        for &f in &self.visible {
            self.facets[f].valid = false;
            for edge in self.facets[f].edges() {
                let _ = self.edge_to_facet.remove(&edge);
            }
        }

        let facets = &self.facets;
        self.live.retain(|f| facets[*f].valid);

        for i in 0..self.horizon.len() {
            let (u, v) = self.horizon[i];
            let facet = Facet::new([u, v, id], self.points);
            self.push_facet(facet);
        }

        true
    }

    fn push_facet(&mut self, facet: Facet) {
        for edge in facet.edges() {
            let _ = self.edge_to_facet.insert(edge, self.facets.len());
        }
        self.live.push(self.facets.len());
        self.facets.push(facet);
    }

    fn into_triangles(self) -> Vec<[u32; 3]> {
        self.facets
            .into_iter()
            .filter(|f| f.valid)
            .map(|f| f.pts)
            .collect()
    }
}

/// Collects, in `horizon`, the directed edges of the visible facets that are
/// adjacent to a non-visible facet.
///
/// Returns `false` if these edges don't form a single simple loop, in which
/// case replacing the visible facets would break the hull topology.
fn compute_horizon(
    visible: &[usize],
    facets: &[Facet],
    edge_to_facet: &HashMap<(u32, u32), usize>,
    horizon: &mut Vec<(u32, u32)>,
) -> bool {
    horizon.clear();

    for &f in visible {
        for (u, v) in facets[f].edges() {
            match edge_to_facet.get(&(v, u)) {
                Some(twin) if visible.contains(twin) => {}
                Some(_) => horizon.push((u, v)),
                None => return false,
            }
        }
    }

    if horizon.is_empty() {
        return false;
    }

    let mut next = HashMap::default();
    for &(u, v) in horizon.iter() {
        if next.insert(u, v).is_some() {
            // Pinched loop: the same vertex starts two horizon edges.
            return false;
        }
    }

    let start = horizon[0].0;
    let mut curr = horizon[0].1;
    let mut len = 1;

    while curr != start {
        match next.get(&curr) {
            Some(v) if len < horizon.len() => {
                curr = *v;
                len += 1;
            }
            _ => return false,
        }
    }

    len == horizon.len()
}

/// Finds four affinely independent points, as far from each other as possible.
fn initial_simplex(points: &[Point<Real>]) -> Result<[u32; 4], ConvexHullError> {
    let farthest = |score: &dyn Fn(&Point<Real>) -> Real| {
        let mut best = (0, -Real::MAX);
        for (i, pt) in points.iter().enumerate() {
            let s = score(pt);
            if s > best.1 {
                best = (i, s);
            }
        }
        best
    };

    let (p0, _) = farthest(&|p| -p.x);
    let (p1, d1) = farthest(&|p| na::distance_squared(p, &points[p0]));

    if d1 <= VISIBILITY_EPS * VISIBILITY_EPS {
        return Err(ConvexHullError::Degenerate);
    }

    let dir = (points[p1] - points[p0]).normalize();
    let (p2, d2) = farthest(&|p| (p - points[p0]).cross(&dir).norm_squared());

    if d2 <= VISIBILITY_EPS * VISIBILITY_EPS {
        return Err(ConvexHullError::Degenerate);
    }

    let normal = (points[p1] - points[p0])
        .cross(&(points[p2] - points[p0]))
        .normalize();
    let (p3, d3) = farthest(&|p| normal.dot(&(p - points[p0])).abs());

    if d3 <= VISIBILITY_EPS || relative_eq!(d3, 0.0) {
        return Err(ConvexHullError::Degenerate);
    }

    Ok([p0 as u32, p1 as u32, p2 as u32, p3 as u32])
}

/// Centers the points on their AABB center and scales them so that the AABB
/// diagonal has a length of 1.
fn normalize(points: &[Point<Real>]) -> Option<Vec<Point<Real>>> {
    let mut mins = points[0];
    let mut maxs = points[0];

    for pt in points {
        mins = mins.inf(pt);
        maxs = maxs.sup(pt);
    }

    let diag = na::distance(&mins, &maxs);

    if diag == 0.0 {
        return None;
    }

    let center = na::center(&mins, &maxs);
    Some(points.iter().map(|p| Point::from((p - center) / diag)).collect())
}

#[cfg(test)]
mod test {
    use super::{convex_hull_idx, try_convex_hull, ConvexHullError};
    use crate::math::{Point, Real};
    use crate::shape::{Sphere, SurfaceMesh};

    fn cube() -> Vec<Point<Real>> {
        let mut pts = Vec::new();
        for i in 0..8 {
            pts.push(Point::new(
                (i & 1) as Real,
                ((i >> 1) & 1) as Real,
                ((i >> 2) & 1) as Real,
            ));
        }
        // An interior point that must not be referenced.
        pts.push(Point::new(0.5, 0.5, 0.5));
        pts
    }

    #[test]
    fn cube_hull_is_closed() {
        let (vertices, faces) = try_convex_hull(&cube()).unwrap();
        assert_eq!(vertices.len(), 8);
        assert_eq!(faces.len(), 12);

        let mesh = SurfaceMesh::new(vertices, faces);
        assert!(mesh.is_closed_manifold());
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn hull_faces_point_outward() {
        let points = cube();
        let faces = convex_hull_idx(&points).unwrap();
        let inner = Point::new(0.5, 0.5, 0.5);

        for f in faces {
            let [a, b, c] = f.map(|i| points[i as usize]);
            let normal = (b - a).cross(&(c - a));
            assert!(normal.dot(&(a - inner)) > 0.0);
        }
    }

    #[test]
    fn no_sphere_sample_is_dropped() {
        let sphere = Sphere::new(Point::new(1.0, -2.0, 0.5), 2.0).unwrap();
        let points = sphere.surface_points(500);
        let (vertices, faces) = try_convex_hull(&points).unwrap();

        assert_eq!(vertices.len(), 500);
        assert_eq!(faces.len(), 2 * 500 - 4);

        let mesh = SurfaceMesh::new(vertices, faces);
        assert!(mesh.is_closed_manifold());
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn degenerate_inputs_are_rejected() {
        let three = [Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)];
        assert_eq!(
            convex_hull_idx(&three),
            Err(ConvexHullError::IncompleteInput)
        );

        let coplanar: Vec<_> = (0..10)
            .map(|i| Point::new(i as Real, (i * i) as Real, 0.0))
            .collect();
        assert_eq!(convex_hull_idx(&coplanar), Err(ConvexHullError::Degenerate));

        let mut nan = cube();
        nan[3].y = Real::NAN;
        assert_eq!(
            convex_hull_idx(&nan),
            Err(ConvexHullError::InvalidCoordinates)
        );
    }
}
