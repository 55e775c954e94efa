use crate::core::pipeline::{
    FragmentShader, FragmentShaderPayload, VertexShader, VertexShaderPayload,
};

/// Reference vertex transform: object space -> view space -> clip space.
///
/// Also carries the normal into view space with the normal matrix so that
/// lighting happens in one space.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicVertexShader;

impl VertexShader for BasicVertexShader {
    fn shade(&self, payload: &mut VertexShaderPayload) {
        let view_pos = payload.model_view * payload.vertex.position;
        let vertex = &mut *payload.vertex;

        vertex.varying.view_pos = view_pos.xyz();
        vertex.clip_pos = payload.projection * view_pos;

        if let Some(n) = (payload.normal_matrix * vertex.varying.normal).try_normalize(1e-12) {
            vertex.varying.normal = n;
        }
    }
}

/// Leaves the vertex exactly as the reference transform produced it.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyVertexShader;

impl VertexShader for EmptyVertexShader {
    fn shade(&self, _payload: &mut VertexShaderPayload) {}
}

/// Reference fragment stage; keeps the interpolated vertex color.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicFragmentShader;

impl FragmentShader for BasicFragmentShader {
    fn shade(&self, _payload: &mut FragmentShaderPayload) {}
}

/// User-slot no-op: the fragment keeps its interpolated color.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyFragmentShader;

impl FragmentShader for EmptyFragmentShader {
    fn shade(&self, _payload: &mut FragmentShaderPayload) {}
}
