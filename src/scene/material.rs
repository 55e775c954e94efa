use crate::scene::texture::Texture;
use nalgebra::Vector3;

/// Blinn-Phong surface description.
#[derive(Debug, Clone)]
pub struct Material {
    /// Ambient color coefficient.
    pub ka: Vector3<f32>,
    /// Diffuse color coefficient; replaced by the texture sample when one is present.
    pub kd: Vector3<f32>,
    /// Specular color coefficient.
    pub ks: Vector3<f32>,
    /// Specular exponent.
    pub ns: f32,
    pub diffuse_texture: Texture,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ka: Vector3::new(1.0, 1.0, 1.0),
            kd: Vector3::new(0.5, 0.5, 0.5),
            ks: Vector3::new(0.5, 0.5, 0.5),
            ns: 32.0,
            diffuse_texture: Texture::empty(),
        }
    }
}
