use crate::core::framebuffer::ScreenBuffer;
use image::RgbImage;
use log::info;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::path::Path;

#[inline]
fn to_u8(channel: f32) -> u8 {
    channel.clamp(0.0, 255.0) as u8
}

#[inline]
fn pack_0rgb(color: &Vector3<f32>) -> u32 {
    ((to_u8(color.x) as u32) << 16) | ((to_u8(color.y) as u32) << 8) | to_u8(color.z) as u32
}

/// Converts the bottom-left-origin color buffer into a top-left-origin image
/// with channels clamped to 0..255.
pub fn to_rgb_image(screen: &ScreenBuffer) -> RgbImage {
    let (width, height) = (screen.width, screen.height);
    let colors = screen.color_buffer();
    let mut img = RgbImage::new(width as u32, height as u32);

    if width > 0 {
        img.par_chunks_mut(width * 3)
            .enumerate()
            .for_each(|(row, out)| {
                let src = &colors[(height - 1 - row) * width..(height - row) * width];
                for (pixel, color) in out.chunks_exact_mut(3).zip(src) {
                    pixel[0] = to_u8(color.x);
                    pixel[1] = to_u8(color.y);
                    pixel[2] = to_u8(color.z);
                }
            });
    }

    img
}

/// Packs the color buffer as 0RGB `u32`s, top row first, for window
/// surfaces that take that layout.
pub fn post_process_to_buffer(screen: &ScreenBuffer, buffer: &mut Vec<u32>) {
    let (width, height) = (screen.width, screen.height);
    let colors = screen.color_buffer();
    buffer.resize(width * height, 0);

    if width == 0 {
        return;
    }
    buffer
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, out)| {
            let src = &colors[(height - 1 - row) * width..(height - row) * width];
            for (pixel, color) in out.iter_mut().zip(src) {
                *pixel = pack_0rgb(color);
            }
        });
}

/// Saves the color buffer as an image; the format follows the extension.
pub fn save_screen_buffer<P: AsRef<Path>>(screen: &ScreenBuffer, path: P) -> Result<(), String> {
    let path = path.as_ref();
    to_rgb_image(screen)
        .save(path)
        .map_err(|e| format!("Failed to save image to {:?}: {}", path, e))?;
    info!("Image saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_flipped_and_clamped() {
        let mut screen = ScreenBuffer::new(2, 2);
        screen.set_color(0, 0, Vector3::new(300.0, -5.0, 10.0)); // bottom-left
        screen.set_color(1, 1, Vector3::new(0.0, 255.0, 0.0)); // top-right

        let img = to_rgb_image(&screen);
        assert_eq!(img.get_pixel(0, 1).0, [255, 0, 10]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 255, 0]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_post_process_packs_0rgb() {
        let mut screen = ScreenBuffer::new(2, 2);
        screen.set_color(0, 0, Vector3::new(1.0, 2.0, 3.0));

        let mut buffer = Vec::new();
        post_process_to_buffer(&screen, &mut buffer);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer[2], 0x0001_0203);
        assert_eq!(buffer[0], 0);
    }
}
