use crate::math::{Point, Real, Vector};
use crate::shape::Sphere;
use crate::transformation::{convex_hull_idx, ConvexHullError};
use crate::utils;
use na::RealField;

/// Distributes `n` points quasi-uniformly on the boundary of `sphere`.
///
/// This is a Fibonacci spiral: the `y` coordinates of the points are evenly
/// spaced in `(-r, r)` and consecutive points are rotated by the golden angle
/// around the `y` axis. The result is deterministic.
pub fn sphere_surface_points(sphere: &Sphere, n: usize) -> Vec<Point<Real>> {
    let increment = Real::pi() * (3.0 - na::convert::<f64, Real>(5.0).sqrt());
    let offset = 2.0 / n as Real;

    (0..n)
        .map(|k| {
            let y = k as Real * offset - 1.0 + offset / 2.0;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let (sin, cos) = (k as Real * increment).sin_cos();
            sphere.center() + Vector::new(cos * r, y, sin * r) * sphere.radius()
        })
        .collect()
}

impl Sphere {
    /// Samples `n` points on the boundary of this sphere.
    ///
    /// See [`sphere_surface_points`].
    pub fn surface_points(&self, n: usize) -> Vec<Point<Real>> {
        sphere_surface_points(self, n)
    }

    /// Discretizes the boundary of this sphere as a triangle mesh with `n` vertices.
    ///
    /// The vertices are the points of [`Sphere::surface_points`], triangulated by
    /// their convex hull. Every triangle is oriented counter-clockwise when seen
    /// from outside of the sphere.
    pub fn to_trimesh(
        &self,
        n: usize,
    ) -> Result<(Vec<Point<Real>>, Vec<[u32; 3]>), ConvexHullError> {
        let mut vertices = self.surface_points(n);
        let mut indices = convex_hull_idx(&vertices)?;
        utils::remove_unused_points(&mut vertices, &mut indices);

        let hull_center = utils::center(&vertices);

        for idx in &mut indices {
            let [a, b, c] = idx.map(|i| vertices[i as usize]);
            let normal = (b - a).cross(&(c - a));
            let face_center = utils::center(&[a, b, c]);

            if normal.dot(&(face_center - hull_center)) < 0.0 {
                idx.swap(1, 2);
            }
        }

        Ok((vertices, indices))
    }
}
