use nalgebra::Vector3;

/// Far sentinel of the depth buffer; screen-space depth lives in `[0, MAX_DEPTH]`.
pub const MAX_DEPTH: f32 = 50.0;

/// Color + depth store for one render target.
///
/// Addressed with a bottom-left origin: row 0 of the flat buffers is the
/// visually bottom row, so `(x, y)` maps to `y * width + x`.
/// Colors are kept as floats in the 0..255 channel range.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    pub width: usize,
    pub height: usize,
    color_buffer: Vec<Vector3<f32>>,
    depth_buffer: Vec<f32>,
}

impl ScreenBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            color_buffer: vec![Vector3::zeros(); size],
            depth_buffer: vec![MAX_DEPTH; size],
        }
    }

    /// Resets color to black and depth to the far sentinel.
    pub fn clear(&mut self) {
        self.clear_with(Vector3::zeros());
    }

    pub fn clear_with(&mut self, color: Vector3<f32>) {
        self.color_buffer.fill(color);
        self.depth_buffer.fill(MAX_DEPTH);
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Flat index of a pixel, `None` when outside the buffer.
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    pub fn color(&self, x: i32, y: i32) -> Option<Vector3<f32>> {
        self.index(x, y).map(|i| self.color_buffer[i])
    }

    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth_buffer[i])
    }

    /// Writes a color; out-of-range coordinates are ignored.
    #[inline]
    pub fn set_color(&mut self, x: i32, y: i32, color: Vector3<f32>) {
        if let Some(i) = self.index(x, y) {
            self.color_buffer[i] = color;
        }
    }

    /// Writes a depth; out-of-range coordinates are ignored.
    #[inline]
    pub fn set_depth(&mut self, x: i32, y: i32, depth: f32) {
        if let Some(i) = self.index(x, y) {
            self.depth_buffer[i] = depth;
        }
    }

    /// Depth test: passes when `depth` is strictly nearer than the stored value.
    /// Out-of-range pixels never pass.
    #[inline]
    pub fn depth_test(&self, x: i32, y: i32, depth: f32) -> bool {
        match self.index(x, y) {
            Some(i) => depth < self.depth_buffer[i],
            None => false,
        }
    }

    /// Flat color buffer, addressable as `row_from_bottom * width + col`.
    pub fn color_buffer(&self) -> &[Vector3<f32>] {
        &self.color_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_cleared() {
        let buf = ScreenBuffer::new(4, 3);
        assert_eq!(buf.color_buffer().len(), 12);
        assert!(buf.depth_buffer().iter().all(|&d| d == MAX_DEPTH));
        assert_eq!(buf.color(0, 0), Some(Vector3::zeros()));
    }

    #[test]
    fn test_bottom_left_addressing() {
        let mut buf = ScreenBuffer::new(4, 3);
        buf.set_color(1, 2, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(buf.index(1, 2), Some(9));
        assert_eq!(buf.color_buffer()[2 * 4 + 1], Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        let mut buf = ScreenBuffer::new(2, 2);
        buf.set_color(-1, 0, Vector3::new(9.0, 9.0, 9.0));
        buf.set_depth(2, 0, 0.0);
        assert_eq!(buf.color(-1, 0), None);
        assert!(!buf.depth_test(5, 5, 0.0));
        assert!(buf.color_buffer().iter().all(|c| *c == Vector3::zeros()));
    }

    #[test]
    fn test_depth_test_is_strict() {
        let mut buf = ScreenBuffer::new(2, 2);
        buf.set_depth(0, 0, 10.0);
        assert!(buf.depth_test(0, 0, 9.99));
        assert!(!buf.depth_test(0, 0, 10.0));
    }

    #[test]
    fn test_clear_resets_depth() {
        let mut buf = ScreenBuffer::new(2, 2);
        buf.set_depth(1, 1, 3.0);
        buf.set_color(1, 1, Vector3::new(255.0, 0.0, 0.0));
        buf.clear();
        assert_eq!(buf.depth(1, 1), Some(MAX_DEPTH));
        assert_eq!(buf.color(1, 1), Some(Vector3::zeros()));
    }
}
