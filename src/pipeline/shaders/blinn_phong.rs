use crate::core::pipeline::{FragmentShader, FragmentShaderPayload};
use nalgebra::Vector3;

/// Ambient term added once per light, per channel.
pub const AMBIENT_INTENSITY: f32 = 0.005;

/// Blinn-Phong lighting in view space.
///
/// For every light at distance `r`:
///   ambient  = ka * AMBIENT_INTENSITY
///   diffuse  = kd * I / r^2 * max(0, cos(n, l))
///   specular = ks * I / r^2 * max(0, cos(n, h))^ns,  h = l/|l| + v/|v|
/// The sum is scaled to the 0..255 range. With a diffuse texture, `kd` is the
/// texture sample divided by 255. Without lights the color is left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlinnPhongFragmentShader;

impl FragmentShader for BlinnPhongFragmentShader {
    fn shade(&self, payload: &mut FragmentShaderPayload) {
        if payload.lights.is_empty() {
            return;
        }

        let material = payload.material;
        let kd = if material.diffuse_texture.is_empty() {
            material.kd
        } else {
            material
                .diffuse_texture
                .sample(payload.uv.x, payload.uv.y)
                / 255.0
        };

        let ambient_intensity = Vector3::repeat(AMBIENT_INTENSITY);
        let n = payload.normal;
        let v = -payload.view_pos;

        let mut la = Vector3::zeros();
        let mut ld = Vector3::zeros();
        let mut ls = Vector3::zeros();

        for light in payload.lights {
            let l = light.position - payload.view_pos;
            let h = l.normalize() + v.normalize();
            let falloff = light.intensity / l.norm_squared();

            // NaN (zero-length vectors) collapses to 0 through f32::max.
            let cos_nl = (n.dot(&l) / (n.norm() * l.norm())).max(0.0);
            let cos_nh = (n.dot(&h) / (n.norm() * h.norm())).max(0.0);

            la += material.ka.component_mul(&ambient_intensity);
            ld += kd.component_mul(&falloff) * cos_nl;
            ls += material.ks.component_mul(&falloff) * cos_nh.powf(material.ns);
        }

        payload.color = (la + ld + ls) * 255.0;
    }
}
