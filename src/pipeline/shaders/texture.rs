use crate::core::pipeline::{FragmentShader, FragmentShaderPayload};

/// Replaces the fragment color with the diffuse texture sample at the
/// interpolated UV. Without a texture the fragment turns neutral gray.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextureFragmentShader;

impl FragmentShader for TextureFragmentShader {
    fn shade(&self, payload: &mut FragmentShaderPayload) {
        payload.color = payload
            .material
            .diffuse_texture
            .sample(payload.uv.x, payload.uv.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::material::Material;
    use crate::scene::texture::Texture;
    use image::{Rgb, RgbImage};
    use nalgebra::{Vector2, Vector3};

    fn payload(material: &Material) -> FragmentShaderPayload<'_> {
        FragmentShaderPayload {
            view_pos: Vector3::new(0.0, 0.0, 5.0),
            color: Vector3::new(1.0, 2.0, 3.0),
            normal: Vector3::new(0.0, 0.0, -1.0),
            uv: Vector2::new(1.0, 1.0),
            lights: &[],
            material,
        }
    }

    #[test]
    fn test_samples_diffuse_texture() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([10, 20, 30]));
        let material = Material {
            diffuse_texture: Texture::from_image(img),
            ..Material::default()
        };

        let mut p = payload(&material);
        TextureFragmentShader.shade(&mut p);
        assert_eq!(p.color, Vector3::new(10.0, 20.0, 30.0));
    }

    #[test]
    fn test_empty_texture_is_gray() {
        let material = Material::default();
        let mut p = payload(&material);
        TextureFragmentShader.shade(&mut p);
        assert_eq!(p.color, Vector3::new(128.0, 128.0, 128.0));
    }
}
