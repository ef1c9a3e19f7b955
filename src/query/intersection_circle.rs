use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::Sphere;
use na::{RealField, Unit};

/// The circle along which the boundaries of two intersecting spheres meet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntersectionCircle {
    /// The center of the circle. It lies on the segment joining both sphere centers.
    pub center: Point<Real>,
    /// The unit normal of the circle's plane, pointing from the first sphere
    /// center toward the second one.
    pub normal: UnitVector<Real>,
    /// The radius of the circle.
    pub radius: Real,
    /// The height of the spherical cap of the first sphere cut by the circle's plane.
    pub cap_height: Real,
    /// Two unit vectors spanning the plane of the circle. Together with
    /// `normal`, they form a right-handed orthonormal basis.
    pub basis: [UnitVector<Real>; 2],
}

impl IntersectionCircle {
    /// Computes the intersection circle of the boundaries of `s1` and `s2`.
    ///
    /// Returns `None` if the spheres are concentric, or if their boundaries
    /// do not intersect (disjoint or nested spheres).
    pub fn new(s1: &Sphere, s2: &Sphere) -> Option<Self> {
        let n = s2.center() - s1.center();
        let d = n.norm();

        if d == 0.0 {
            return None;
        }

        let r1 = s1.radius();
        let r2 = s2.radius();
        let normal = Unit::new_unchecked(n / d);

        // Law of cosines on the triangle (center1, center2, any circle point).
        let adjacent = r1 * r1 + d * d - r2 * r2;
        let discriminant = (2.0 * r1 * d) * (2.0 * r1 * d) - adjacent * adjacent;

        if discriminant < 0.0 {
            return None;
        }

        let radius = discriminant.sqrt() / (2.0 * d);
        let cos_alpha = (adjacent / (2.0 * r1 * d)).clamp(-1.0, 1.0);
        let cap_height = r1 * (1.0 - cos_alpha);
        let center = s1.center() + *normal * (r1 - cap_height);

        Some(IntersectionCircle {
            center,
            normal,
            radius,
            cap_height,
            basis: in_plane_basis(&normal),
        })
    }

    /// Samples `resolution` points evenly spaced on this circle.
    ///
    /// The first point has the angle `-π` in the `basis` frame.
    pub fn sample(&self, resolution: usize) -> Vec<Point<Real>> {
        let step = Real::two_pi() / resolution as Real;
        let [n1, n2] = &self.basis;

        (0..resolution)
            .map(|k| {
                let (sin, cos) = (-Real::pi() + step * k as Real).sin_cos();
                self.center + (n1.into_inner() * cos + n2.into_inner() * sin) * self.radius
            })
            .collect()
    }
}

/// Two unit vectors orthogonal to `n` and to each other.
///
/// The first is `(n.z, 0, -n.x)` when that vector is not zero, and `(n.y, 0, -n.x)`
/// when `n` is aligned with the `y` axis.
pub fn in_plane_basis(n: &UnitVector<Real>) -> [UnitVector<Real>; 2] {
    let mut n1 = Vector::new(n.z, 0.0, -n.x);

    if n1.norm_squared() == 0.0 {
        n1 = Vector::new(n.y, 0.0, -n.x);
    }

    let n1 = Unit::new_normalize(n1);
    let n2 = Unit::new_normalize(n.cross(&n1));
    [n1, n2]
}
