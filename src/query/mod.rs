//! Non-persistent geometric queries between spheres, points and voxels.

pub use self::intersection_circle::{in_plane_basis, IntersectionCircle};
pub use self::intersection_test_cube_triangle::intersection_test_cube_triangle;
pub use self::sphere_contact::{
    detect_contacts, sphere_contact, sphere_contains_point, BoundaryPolicy, ContactPair,
    ContactPolicy,
};

mod intersection_circle;
mod intersection_test_cube_triangle;
mod sphere_contact;
