use crate::math::{Point, Real};
use crate::utils::hashmap::{Entry, HashMap};
use crate::utils::SortedPair;

/// A triangulated surface: a vertex buffer and a buffer of index triples.
///
/// Faces are oriented counter-clockwise when seen from outside of the surface.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceMesh {
    /// The vertex buffer.
    pub vertices: Vec<Point<Real>>,
    /// The index buffer. Each element refers to three elements of `vertices`.
    pub faces: Vec<[u32; 3]>,
}

impl SurfaceMesh {
    /// Creates a new surface mesh from its vertex and index buffers.
    pub fn new(vertices: Vec<Point<Real>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// The number of distinct (undirected) edges of this mesh.
    pub fn num_edges(&self) -> usize {
        self.edge_face_counts().len()
    }

    /// The Euler characteristic `V - E + F` of this mesh.
    ///
    /// Only vertices referenced by at least one face are counted, and indices
    /// out of the vertex buffer are ignored. A closed surface with the
    /// topology of a sphere has an Euler characteristic of 2.
    pub fn euler_characteristic(&self) -> i64 {
        let mut used = vec![false; self.vertices.len()];
        for i in self.faces.iter().flatten() {
            if let Some(used) = used.get_mut(*i as usize) {
                *used = true;
            }
        }
        let num_vertices = used.iter().filter(|u| **u).count();

        num_vertices as i64 - self.num_edges() as i64 + self.faces.len() as i64
    }

    /// Checks that this mesh is a closed, consistently oriented, 2-manifold.
    ///
    /// Every edge must be shared by exactly two faces which traverse it in
    /// opposite directions, and no face may be degenerate (repeated index).
    pub fn is_closed_manifold(&self) -> bool {
        if self.faces.is_empty() {
            return false;
        }

        let mut directed = HashMap::default();

        for face in &self.faces {
            if face[0] == face[1] || face[1] == face[2] || face[2] == face[0] {
                return false;
            }

            for i in 0..3 {
                let edge = (face[i], face[(i + 1) % 3]);
                match directed.entry(edge) {
                    Entry::Vacant(e) => {
                        let _ = e.insert(());
                    }
                    // The same directed edge twice: inconsistent orientation or t-junction.
                    Entry::Occupied(_) => return false,
                }
            }
        }

        directed.keys().all(|(a, b)| directed.contains_key(&(*b, *a)))
    }

    fn edge_face_counts(&self) -> HashMap<SortedPair<u32>, usize> {
        let mut edges = HashMap::default();

        for face in &self.faces {
            for i in 0..3 {
                *edges
                    .entry(SortedPair::new(face[i], face[(i + 1) % 3]))
                    .or_insert(0) += 1;
            }
        }

        edges
    }
}

#[cfg(test)]
mod test {
    use super::SurfaceMesh;
    use crate::math::Point;

    fn tetrahedron() -> SurfaceMesh {
        SurfaceMesh::new(
            vec![
                Point::new(0.0, 0.0, 0.0),
                Point::new(1.0, 0.0, 0.0),
                Point::new(0.0, 1.0, 0.0),
                Point::new(0.0, 0.0, 1.0),
            ],
            vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]],
        )
    }

    #[test]
    fn tetrahedron_is_closed() {
        let mesh = tetrahedron();
        assert!(mesh.is_closed_manifold());
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn out_of_range_indices_are_not_counted() {
        let mut mesh = tetrahedron();
        mesh.faces.push([1, 2, 7]);

        // 4 vertices, 8 edges, 5 faces.
        assert_eq!(mesh.euler_characteristic(), 1);
        assert!(!mesh.is_closed_manifold());
    }

    #[test]
    fn open_or_flipped_meshes_are_detected() {
        let mut open = tetrahedron();
        let _ = open.faces.pop();
        assert!(!open.is_closed_manifold());

        let mut flipped = tetrahedron();
        flipped.faces[0] = [0, 1, 2];
        assert!(!flipped.is_closed_manifold());
    }
}
