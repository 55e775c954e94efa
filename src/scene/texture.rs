use image::RgbImage;
use log::info;
use nalgebra::Vector3;
use std::path::Path;
use std::sync::Arc;

/// Color returned when sampling a texture that holds no pixels.
pub const NEUTRAL_GRAY: f32 = 128.0;

/// Represents a 2D texture map of RGB samples.
///
/// An empty texture is a valid state ("no texture"), distinct from a black one.
/// Pixel data is shared, so cloning a material never copies the image.
#[derive(Debug, Clone, Default)]
pub struct Texture {
    image: Option<Arc<RgbImage>>,
}

impl Texture {
    pub fn empty() -> Self {
        Self { image: None }
    }

    pub fn from_image(image: RgbImage) -> Self {
        if image.width() == 0 || image.height() == 0 {
            return Self::empty();
        }
        Self {
            image: Some(Arc::new(image)),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path_ref = path.as_ref();
        let img = image::open(path_ref)
            .map_err(|e| format!("Failed to load texture {:?}: {}", path_ref, e))?
            .to_rgb8();

        info!(
            "Loaded texture: {:?} ({}x{})",
            path_ref,
            img.width(),
            img.height()
        );

        Ok(Self::from_image(img))
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// Nearest-neighbor lookup with UV clamped to [0, 1].
    ///
    /// `v = 1` is the top row of the image. Returns channels in 0..255;
    /// an empty texture yields neutral gray.
    pub fn sample(&self, u: f32, v: f32) -> Vector3<f32> {
        let Some(img) = &self.image else {
            return Vector3::new(NEUTRAL_GRAY, NEUTRAL_GRAY, NEUTRAL_GRAY);
        };

        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };

        let col = (u * (img.width() - 1) as f32) as u32;
        let row = ((1.0 - v) * (img.height() - 1) as f32) as u32;

        let pixel = img.get_pixel(col, row);
        Vector3::new(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn two_by_two() -> Texture {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0])); // top-left
        img.put_pixel(1, 0, Rgb([0, 255, 0])); // top-right
        img.put_pixel(0, 1, Rgb([0, 0, 255])); // bottom-left
        img.put_pixel(1, 1, Rgb([255, 255, 255])); // bottom-right
        Texture::from_image(img)
    }

    #[test]
    fn test_empty_texture_is_gray() {
        let tex = Texture::empty();
        assert!(tex.is_empty());
        assert_eq!(tex.sample(0.3, 0.7), Vector3::new(128.0, 128.0, 128.0));
    }

    #[test]
    fn test_sample_corners() {
        let tex = two_by_two();
        assert_eq!(tex.sample(0.0, 1.0), Vector3::new(255.0, 0.0, 0.0));
        assert_eq!(tex.sample(1.0, 1.0), Vector3::new(0.0, 255.0, 0.0));
        assert_eq!(tex.sample(0.0, 0.0), Vector3::new(0.0, 0.0, 255.0));
        assert_eq!(tex.sample(1.0, 0.0), Vector3::new(255.0, 255.0, 255.0));
    }

    #[test]
    fn test_sample_clamps_uv() {
        let tex = two_by_two();
        assert_eq!(tex.sample(-3.0, 7.0), tex.sample(0.0, 1.0));
        assert_eq!(tex.sample(4.0, -1.0), tex.sample(1.0, 0.0));
    }

    #[test]
    fn test_zero_sized_image_is_empty() {
        assert!(Texture::from_image(RgbImage::new(0, 4)).is_empty());
    }
}
