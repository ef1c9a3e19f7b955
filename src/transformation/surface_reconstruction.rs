use crate::math::{Point, Real};
use crate::shape::SurfaceMesh;
use crate::transformation::{convex_hull_idx, ConvexHullError};
use crate::utils;
use ordered_float::OrderedFloat;

/// Errors that can occur while reconstructing a surface from a point cloud.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ReconstructionError {
    /// Less than four distinct points were given.
    #[error("at least four distinct points are needed, got {0}")]
    TooFewPoints(usize),
    /// The points are degenerate (e.g. coplanar) or invalid.
    #[error(transparent)]
    Hull(#[from] ConvexHullError),
    /// The reconstruction center is not surrounded by the point cloud.
    #[error("the point cloud does not surround the reconstruction center")]
    CenterNotEnclosed,
    /// The radius of the pivoting ball is not a positive number.
    #[error("the pivoting ball radius must be a positive number")]
    InvalidRadius,
    /// No triangle could be formed, e.g., because the points are too sparse.
    #[error("no triangle could be formed from the point cloud")]
    EmptySurface,
}

/// An algorithm computing a triangle mesh from points sampled on a closed surface.
pub trait SurfaceReconstruction {
    /// Triangulates `points`.
    ///
    /// The resulting mesh only contains points of the input, and its triangles
    /// are oriented counter-clockwise when seen from outside.
    fn reconstruct(&self, points: &[Point<Real>]) -> Result<SurfaceMesh, ReconstructionError>;
}

/// Reconstructs surfaces that are star-shaped with respect to a center point.
///
/// Every point is projected on the unit sphere around the center, and the
/// convex hull of these directions (which is their spherical Delaunay
/// triangulation) gives the connectivity of the output mesh. The result is
/// always a closed mesh with the topology of a sphere.
///
/// This gives a meaningful surface only if every ray from the center crosses
/// the sampled surface once.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RadialHull {
    /// The center of the projection. Defaults to the centroid of the point cloud.
    pub center: Option<Point<Real>>,
}

impl RadialHull {
    /// A reconstruction centered on the centroid of the point cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reconstruction centered on `center`.
    pub fn with_center(center: Point<Real>) -> Self {
        RadialHull {
            center: Some(center),
        }
    }
}

impl SurfaceReconstruction for RadialHull {
    fn reconstruct(&self, points: &[Point<Real>]) -> Result<SurfaceMesh, ReconstructionError> {
        if points.len() < 4 {
            return Err(ReconstructionError::TooFewPoints(points.len()));
        }

        let center = self.center.unwrap_or_else(|| utils::center(points));
        let directions = points
            .iter()
            .map(|pt| {
                (pt - center)
                    .try_normalize(0.0)
                    .map(Point::from)
                    .ok_or(ReconstructionError::CenterNotEnclosed)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut faces = convex_hull_idx(&directions)?;

        // If the center is outside of the hull of the directions, the faces
        // facing it are inverted when seen from the center.
        for face in &faces {
            let [a, b, c] = face.map(|i| directions[i as usize].coords);
            if a.dot(&b.cross(&c)) <= 0.0 {
                return Err(ReconstructionError::CenterNotEnclosed);
            }
        }

        let mut vertices = points.to_vec();
        utils::remove_unused_points(&mut vertices, &mut faces);
        Ok(SurfaceMesh::new(vertices, faces))
    }
}

/// Removes duplicate points (with exactly equal coordinates).
///
/// The result is sorted lexicographically.
pub fn dedup_points(points: &[Point<Real>]) -> Vec<Point<Real>> {
    let mut result = points.to_vec();
    result.sort_by_key(sort_key);
    result.dedup_by_key(|pt| sort_key(pt));
    result
}

fn sort_key(pt: &Point<Real>) -> [OrderedFloat<Real>; 3] {
    [OrderedFloat(pt.x), OrderedFloat(pt.y), OrderedFloat(pt.z)]
}

/// Removes the duplicate points of a point cloud and computes a surface
/// passing through them.
pub fn reconstruct_surface(
    points: &[Point<Real>],
    reconstruction: &impl SurfaceReconstruction,
) -> Result<SurfaceMesh, ReconstructionError> {
    let unique = dedup_points(points);

    log::debug!(
        "Reconstructing a surface from {} distinct points ({} duplicates).",
        unique.len(),
        points.len() - unique.len()
    );

    reconstruction.reconstruct(&unique)
}
