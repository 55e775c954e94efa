use crate::core::geometry::WorkingVertex;
use crate::scene::light::Light;
use crate::scene::material::Material;
use nalgebra::{Matrix3, Matrix4, Vector2, Vector3};

/// Everything a vertex shader may read or write for one vertex.
///
/// The shader writes `vertex.clip_pos` and `vertex.varying.view_pos`; it may
/// also mutate any other attribute (e.g. displacement along the normal).
pub struct VertexShaderPayload<'a> {
    pub vertex: &'a mut WorkingVertex,
    pub model: &'a Matrix4<f32>,
    pub view: &'a Matrix4<f32>,
    pub model_view: &'a Matrix4<f32>,
    pub projection: &'a Matrix4<f32>,
    /// Inverse-transpose of the model-view 3x3 block.
    pub normal_matrix: &'a Matrix3<f32>,
}

/// Everything a fragment shader may read for one fragment.
///
/// `color` is both input (interpolated vertex color) and output.
/// Lights are already expressed in view space.
pub struct FragmentShaderPayload<'a> {
    pub view_pos: Vector3<f32>,
    pub color: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
    pub lights: &'a [Light],
    pub material: &'a Material,
}

/// Vertex stage hook.
///
/// Implementations must be `Send + Sync` so a scene can be drawn on a
/// background thread.
pub trait VertexShader: Send + Sync {
    fn shade(&self, payload: &mut VertexShaderPayload);
}

/// Fragment stage hook. Writes the final color back into `payload.color`.
pub trait FragmentShader: Send + Sync {
    fn shade(&self, payload: &mut FragmentShaderPayload);
}

/// Adapts an arbitrary closure into a `VertexShader`.
pub struct VertexFn<F>(pub F);

impl<F> VertexFn<F>
where
    F: Fn(&mut VertexShaderPayload) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> VertexShader for VertexFn<F>
where
    F: Fn(&mut VertexShaderPayload) + Send + Sync,
{
    fn shade(&self, payload: &mut VertexShaderPayload) {
        (self.0)(payload)
    }
}

/// Adapts an arbitrary closure into a `FragmentShader`.
pub struct FragmentFn<F>(pub F);

impl<F> FragmentFn<F>
where
    F: Fn(&mut FragmentShaderPayload) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> FragmentShader for FragmentFn<F>
where
    F: Fn(&mut FragmentShaderPayload) + Send + Sync,
{
    fn shade(&self, payload: &mut FragmentShaderPayload) {
        (self.0)(payload)
    }
}
