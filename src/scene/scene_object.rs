use crate::core::math::transform::TransformFactory;
use crate::core::pipeline::{FragmentShader, VertexShader};
use crate::pipeline::shaders::basic::{EmptyFragmentShader, EmptyVertexShader};
use crate::scene::mesh::Geometry;
use nalgebra::{Matrix4, Vector3};
use std::fmt;
use std::sync::Arc;

pub use crate::core::rasterizer::{CullMode, FillStrategy, RenderMode, RenderOptions};

/// An instance of drawable content placed in the world.
///
/// The shaders are shared handles so the same shader can serve many objects
/// and a scene can be moved to a render thread.
#[derive(Clone)]
pub struct SceneObject {
    pub geometries: Vec<Geometry>,
    pub scaling: Vector3<f32>,
    pub rotation_axis: Vector3<f32>,
    /// Clockwise-positive, in degrees.
    pub rotation_degrees: f32,
    pub position: Vector3<f32>,
    /// Runs after the reference transform.
    pub vertex_shader: Arc<dyn VertexShader>,
    /// Runs after the reference fragment stage.
    pub fragment_shader: Arc<dyn FragmentShader>,
    pub options: RenderOptions,
}

impl SceneObject {
    pub fn new(geometries: Vec<Geometry>) -> Self {
        Self {
            geometries,
            scaling: Vector3::new(1.0, 1.0, 1.0),
            rotation_axis: Vector3::y(),
            rotation_degrees: 0.0,
            position: Vector3::zeros(),
            vertex_shader: Arc::new(EmptyVertexShader),
            fragment_shader: Arc::new(EmptyFragmentShader),
            options: RenderOptions::default(),
        }
    }

    /// `translate * scale * rotate`.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        TransformFactory::model(
            &TransformFactory::scaling(&self.scaling),
            &TransformFactory::rotation(&self.rotation_axis, self.rotation_degrees),
            &TransformFactory::translation(&self.position),
        )
    }
}

impl fmt::Debug for SceneObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneObject")
            .field("geometries", &self.geometries.len())
            .field("scaling", &self.scaling)
            .field("rotation_axis", &self.rotation_axis)
            .field("rotation_degrees", &self.rotation_degrees)
            .field("position", &self.position)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matrix_scales_before_translating() {
        let mut object = SceneObject::new(Vec::new());
        object.scaling = Vector3::new(2.0, 2.0, 2.0);
        object.position = Vector3::new(0.0, 0.0, 5.0);

        let p = object.model_matrix() * Vector3::new(1.0, 0.0, 0.0).push(1.0);
        assert!((p.xyz() - Vector3::new(2.0, 0.0, 5.0)).norm() < 1e-5);
    }
}
