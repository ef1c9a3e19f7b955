use crate::shape::SurfaceMesh;
use obj::{Group, IndexTuple, ObjData, ObjError, Object, SimplePolygon};
use std::path::Path;

impl SurfaceMesh {
    /// Converts this mesh into a single-object Wavefront data set.
    ///
    /// This function is enabled by the `wavefront` feature flag.
    pub fn to_obj_data(&self, name: &str) -> ObjData {
        ObjData {
            #[allow(clippy::unnecessary_cast)]
            position: self
                .vertices
                .iter()
                .map(|v| [v.x as f32, v.y as f32, v.z as f32])
                .collect(),
            objects: vec![Object {
                groups: vec![Group {
                    polys: self
                        .faces
                        .iter()
                        .map(|face| {
                            SimplePolygon(
                                face.iter()
                                    .map(|i| IndexTuple(*i as usize, None, None))
                                    .collect(),
                            )
                        })
                        .collect(),
                    name: name.to_string(),
                    index: 0,
                    material: None,
                }],
                name: name.to_string(),
            }],
            ..Default::default()
        }
    }

    /// Outputs a Wavefront (`.obj`) file at the given path.
    ///
    /// This function is enabled by the `wavefront` feature flag.
    pub fn to_obj_file(&self, path: impl AsRef<Path>) -> Result<(), ObjError> {
        let mut file = std::fs::File::create(path).map_err(ObjError::Io)?;
        self.to_obj_data("clump").write_to_buf(&mut file)
    }
}
