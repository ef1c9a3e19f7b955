use crate::math::{Point, Real};
use crate::shape::Sphere;
use crate::ClumpError;

/// A rigid set of possibly-overlapping spheres approximating a solid.
///
/// The aggregates of a clump ([`Clump::min_radius`], [`Clump::max_radius`],
/// [`Clump::num_spheres`]) are always recomputed from its sphere sequence, so
/// they can never be out of sync with it.
#[cfg_attr(feature = "serde-serialize", derive(Serialize))]
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Clump {
    spheres: Vec<Sphere>,
}

impl Clump {
    /// Creates a clump from an ordered sequence of spheres.
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Clump { spheres }
    }

    /// Creates a clump from `[x, y, z, r]` rows.
    ///
    /// Fails with [`ClumpError::InvalidSphere`] (carrying the row index) if
    /// any row does not describe a valid sphere.
    pub fn from_rows(rows: &[[Real; 4]]) -> Result<Self, ClumpError> {
        let spheres = rows
            .iter()
            .enumerate()
            .map(|(i, row)| Sphere::validated(i, Point::new(row[0], row[1], row[2]), row[3]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Clump { spheres })
    }

    /// The spheres of this clump, in generation order.
    #[inline]
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The number of spheres of this clump.
    #[inline]
    pub fn num_spheres(&self) -> usize {
        self.spheres.len()
    }

    /// Does this clump contain no sphere?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// The radius of the smallest sphere, or `None` if the clump is empty.
    pub fn min_radius(&self) -> Option<Real> {
        self.spheres.iter().map(|s| s.radius()).reduce(Real::min)
    }

    /// The radius of the largest sphere, or `None` if the clump is empty.
    pub fn max_radius(&self) -> Option<Real> {
        self.spheres.iter().map(|s| s.radius()).reduce(Real::max)
    }

    /// The centers of the spheres, in generation order.
    pub fn positions(&self) -> Vec<Point<Real>> {
        self.spheres.iter().map(|s| *s.center()).collect()
    }

    /// The radii of the spheres, in generation order.
    pub fn radii(&self) -> Vec<Real> {
        self.spheres.iter().map(|s| s.radius()).collect()
    }

    /// The sum of the volumes of the spheres.
    ///
    /// This is an upper bound of the clump's volume since spheres may overlap.
    pub fn volume_upper_bound(&self) -> Real {
        self.spheres.iter().map(|s| s.volume()).sum()
    }

    pub(crate) fn push(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }
}

impl From<Clump> for Vec<Sphere> {
    fn from(clump: Clump) -> Self {
        clump.spheres
    }
}

#[cfg(test)]
mod test {
    use super::Clump;
    use crate::ClumpError;

    #[test]
    fn clump_aggregates_follow_spheres() {
        let clump = Clump::from_rows(&[
            [1.0, 0.0, 0.0, 1.1],
            [2.0, 1.0, 0.0, 1.1],
            [3.0, 0.0, 0.0, 1.2],
        ])
        .unwrap();

        assert_eq!(clump.num_spheres(), 3);
        assert_eq!(clump.min_radius(), Some(1.1));
        assert_eq!(clump.max_radius(), Some(1.2));
        assert_eq!(clump.radii(), vec![1.1, 1.1, 1.2]);
    }

    #[test]
    fn empty_clump_has_no_radius() {
        let clump = Clump::default();
        assert!(clump.is_empty());
        assert_eq!(clump.min_radius(), None);
        assert_eq!(clump.max_radius(), None);
    }

    #[test]
    fn invalid_row_reports_its_index() {
        let err = Clump::from_rows(&[[0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0, -2.0]]).unwrap_err();
        assert!(matches!(err, ClumpError::InvalidSphere { index: 1, .. }));
    }
}
