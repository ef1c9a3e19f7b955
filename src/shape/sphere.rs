use crate::math::{Point, Real};
use crate::query::{self, BoundaryPolicy, ContactPolicy};
use crate::ClumpError;

/// A sphere of a clump.
///
/// A sphere is immutable: its center is finite and its radius is a finite
/// strictly positive number. These invariants are checked by [`Sphere::new`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize))]
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Sphere {
    center: Point<Real>,
    radius: Real,
}

impl Sphere {
    /// Creates a new sphere, checking that `center` is finite and `radius` is
    /// a finite, strictly positive, number.
    pub fn new(center: Point<Real>, radius: Real) -> Result<Sphere, ClumpError> {
        Self::validated(0, center, radius)
    }

    /// Creates a new sphere from a `[x, y, z, r]` row.
    pub fn from_row(row: [Real; 4]) -> Result<Sphere, ClumpError> {
        Self::new(Point::new(row[0], row[1], row[2]), row[3])
    }

    pub(crate) fn validated(
        index: usize,
        center: Point<Real>,
        radius: Real,
    ) -> Result<Sphere, ClumpError> {
        let valid_center = center.iter().all(|e| e.is_finite());
        // NOTE: written so that a NaN radius fails the test.
        let valid_radius = radius > 0.0 && radius.is_finite();

        if valid_center && valid_radius {
            Ok(Sphere { center, radius })
        } else {
            Err(ClumpError::InvalidSphere {
                index,
                center: center.coords.into(),
                radius,
            })
        }
    }

    /// The center of this sphere.
    #[inline]
    pub fn center(&self) -> &Point<Real> {
        &self.center
    }

    /// The radius of this sphere.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// This sphere as a `[x, y, z, r]` row.
    #[inline]
    pub fn to_row(&self) -> [Real; 4] {
        [self.center.x, self.center.y, self.center.z, self.radius]
    }

    /// The volume of this sphere.
    pub fn volume(&self) -> Real {
        let pi = na::convert::<f64, Real>(core::f64::consts::PI);
        pi * self.radius * self.radius * self.radius * 4.0 / 3.0
    }

    /// Tests if `point` lies inside of this sphere.
    ///
    /// Whether points exactly on the boundary of the sphere count as inside
    /// is controlled by `policy`.
    #[inline]
    pub fn contains_point(&self, point: &Point<Real>, policy: BoundaryPolicy) -> bool {
        query::sphere_contains_point(self, point, policy)
    }

    /// Tests if the boundaries of `self` and `other` intersect.
    #[inline]
    pub fn contacts(&self, other: &Sphere, policy: ContactPolicy) -> bool {
        query::sphere_contact(self, other, policy)
    }
}
