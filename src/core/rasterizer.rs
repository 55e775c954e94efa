use crate::core::framebuffer::{MAX_DEPTH, ScreenBuffer};
use crate::core::geometry::{WorkingVertex, blend3};
use crate::core::math::interpolation::{
    barycentric_coordinates, is_finite_barycentric, is_inside_triangle,
    perspective_correct_barycentric,
};
use crate::core::pipeline::{FragmentShader, FragmentShaderPayload};
use crate::scene::light::Light;
use crate::scene::material::Material;
use nalgebra::{Point2, Vector3};

/// Clip-space w below which a rasterized vertex is considered broken.
const MIN_W: f32 = 1e-6;

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum CullMode {
    #[default]
    Back,
    Front,
    None,
}

#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum RenderMode {
    /// Filled triangles.
    #[default]
    Default,
    /// Edges only.
    LineOnly,
}

/// How filled triangles are scan-converted. Both produce the same pixels up
/// to boundary tie-breaking.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub enum FillStrategy {
    #[default]
    BoundingBox,
    Scanline,
}

/// Immutable per-draw options, handed by reference to every stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub z_write: bool,
    pub z_test: bool,
    pub culling: CullMode,
    pub mode: RenderMode,
    pub fill: FillStrategy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            z_write: true,
            z_test: true,
            culling: CullMode::Back,
            mode: RenderMode::Default,
            fill: FillStrategy::BoundingBox,
        }
    }
}

/// Turns screen-space triangles into fragment writes.
///
/// Bound to one target, one material and one fragment shader chain for the
/// duration of a geometry draw. The chain runs in order on every fragment
/// that passes the depth test.
pub struct Rasterizer<'a> {
    screen: &'a mut ScreenBuffer,
    material: &'a Material,
    lights: &'a [Light],
    fragment_shaders: &'a [&'a dyn FragmentShader],
    options: &'a RenderOptions,
}

impl<'a> Rasterizer<'a> {
    pub fn new(
        screen: &'a mut ScreenBuffer,
        material: &'a Material,
        lights: &'a [Light],
        fragment_shaders: &'a [&'a dyn FragmentShader],
        options: &'a RenderOptions,
    ) -> Self {
        Self {
            screen,
            material,
            lights,
            fragment_shaders,
            options,
        }
    }

    /// Rasterizes one triangle whose `screen_pos` is final, in the mode the
    /// options ask for.
    pub fn rasterize_triangle(&mut self, triangle: &[WorkingVertex; 3]) {
        debug_assert!(
            triangle.iter().all(|v| v.clip_pos.w > MIN_W),
            "rasterized vertex with w <= 0 escaped the near-plane clip"
        );

        match (self.options.mode, self.options.fill) {
            (RenderMode::LineOnly, _) => self.rasterize_triangle_lines(triangle),
            (RenderMode::Default, FillStrategy::BoundingBox) => self.fill_bounding_box(triangle),
            (RenderMode::Default, FillStrategy::Scanline) => self.fill_scanline(triangle),
        }
    }

    fn fill_bounding_box(&mut self, triangle: &[WorkingVertex; 3]) {
        let points = screen_points(triangle);
        let (left, bottom, right, top) = self.compute_bounding_box(&points);

        for y in bottom..=top {
            for x in left..=right {
                let center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if !is_inside_triangle(center, &points) {
                    continue;
                }
                self.draw_screen_space_point(center.x, center.y, triangle);
            }
        }
    }

    /// Edge-walk fill: the triangle is split at its middle vertex into a
    /// flat-bottom and a flat-top half, and each row spans from the long edge
    /// to the current short edge.
    fn fill_scanline(&mut self, triangle: &[WorkingVertex; 3]) {
        let mut sorted = screen_points(triangle);
        sorted.sort_by(|a, b| a.y.total_cmp(&b.y));
        let [low, mid, high] = sorted;

        if high.y - low.y <= f32::EPSILON {
            return;
        }

        let points = screen_points(triangle);
        let (_, bottom, _, top) = self.compute_bounding_box(&points);
        let max_x = self.screen.width as i32 - 1;

        for y in bottom..=top {
            let cy = y as f32 + 0.5;
            if cy < low.y || cy > high.y {
                continue;
            }

            let long_x = edge_x_at(low, high, cy);
            let short_x = if (cy < mid.y && mid.y - low.y > f32::EPSILON)
                || high.y - mid.y <= f32::EPSILON
            {
                edge_x_at(low, mid, cy)
            } else {
                edge_x_at(mid, high, cy)
            };

            // Widen by half a pixel, then pull both ends back in while the
            // pixel center is outside. Hides leakage from rounding in edge_x_at.
            let mut start = ((long_x.min(short_x) - 0.5).floor() as i32).max(0);
            let mut end = ((long_x.max(short_x) + 0.5).floor() as i32).min(max_x);

            while start <= end && !is_inside_triangle(Point2::new(start as f32 + 0.5, cy), &points) {
                start += 1;
            }
            while end >= start && !is_inside_triangle(Point2::new(end as f32 + 0.5, cy), &points) {
                end -= 1;
            }

            for x in start..=end {
                self.draw_screen_space_point(x as f32 + 0.5, cy, triangle);
            }
        }
    }

    /// Draws the three edges with a DDA walk along each edge's major axis,
    /// one pixel per integer step, always from the lower to the higher end.
    pub fn rasterize_triangle_lines(&mut self, triangle: &[WorkingVertex; 3]) {
        for i in 0..3 {
            let mut p1 = triangle[i].screen_pos.xy();
            let mut p2 = triangle[(i + 1) % 3].screen_pos.xy();
            let delta = p2 - p1;

            let (mut x, mut y, dx, dy, steps) = if delta.y.abs() < delta.x.abs() {
                if p1.x > p2.x {
                    std::mem::swap(&mut p1, &mut p2);
                }
                let slope = (p2.y - p1.y) / (p2.x - p1.x);
                let x = p1.x.round() + 0.5;
                let y = p1.y + (x - p1.x) * slope;
                let steps = p2.x.round() as i32 - p1.x.round() as i32 + 1;
                (x, y, 1.0, slope, steps)
            } else {
                if p1.y > p2.y {
                    std::mem::swap(&mut p1, &mut p2);
                }
                if p2.y - p1.y <= f32::EPSILON {
                    // Zero-length edge.
                    continue;
                }
                let slope = (p2.x - p1.x) / (p2.y - p1.y);
                let y = p1.y.round() + 0.5;
                let x = p1.x + (y - p1.y) * slope;
                let steps = p2.y.round() as i32 - p1.y.round() as i32 + 1;
                (x, y, slope, 1.0, steps)
            };

            for _ in 0..steps {
                self.draw_screen_space_point(x, y, triangle);
                x += dx;
                y += dy;
            }
        }
    }

    /// Per-candidate-pixel work for the point `(x, y)` in screen space.
    ///
    /// Silently skips the pixel when it is off-screen, the triangle is
    /// degenerate, the depth is out of range or the depth test fails.
    pub fn draw_screen_space_point(&mut self, x: f32, y: f32, triangle: &[WorkingVertex; 3]) {
        let (px, py) = (x.floor() as i32, y.floor() as i32);
        if !self.screen.in_bounds(px, py) {
            return;
        }

        let [a, b, c] = screen_points(triangle);
        let bary = barycentric_coordinates(Point2::new(x, y), a, b, c);
        if !is_finite_barycentric(&bary) {
            return;
        }

        // NDC z is affine in screen space, so depth uses the raw weights.
        let depth = blend3(
            [
                triangle[0].screen_pos.z,
                triangle[1].screen_pos.z,
                triangle[2].screen_pos.z,
            ],
            &bary,
        );
        if !(0.0..=MAX_DEPTH).contains(&depth) {
            return;
        }
        if self.options.z_test && !self.screen.depth_test(px, py, depth) {
            return;
        }
        if self.options.z_write {
            self.screen.set_depth(px, py, depth);
        }

        let corrected = perspective_correct_barycentric(
            &bary,
            triangle[0].clip_pos.w,
            triangle[1].clip_pos.w,
            triangle[2].clip_pos.w,
        );
        let varying = blend3(
            [triangle[0].varying, triangle[1].varying, triangle[2].varying],
            &corrected,
        );

        let mut payload = FragmentShaderPayload {
            view_pos: varying.view_pos,
            color: varying.color,
            normal: varying.normal,
            uv: varying.uv,
            lights: self.lights,
            material: self.material,
        };
        for shader in self.fragment_shaders {
            shader.shade(&mut payload);
        }

        self.screen.set_color(px, py, payload.color);
    }

    /// Inclusive pixel bounds `(left, bottom, right, top)` clamped to the
    /// screen; empty when `left > right` or `bottom > top`.
    fn compute_bounding_box(&self, points: &[Point2<f32>; 3]) -> (i32, i32, i32, i32) {
        let min_x = points[0].x.min(points[1].x).min(points[2].x).floor() as i32;
        let min_y = points[0].y.min(points[1].y).min(points[2].y).floor() as i32;
        let max_x = points[0].x.max(points[1].x).max(points[2].x).floor() as i32;
        let max_y = points[0].y.max(points[1].y).max(points[2].y).floor() as i32;
        (
            min_x.max(0),
            min_y.max(0),
            max_x.min(self.screen.width as i32 - 1),
            max_y.min(self.screen.height as i32 - 1),
        )
    }
}

fn screen_points(triangle: &[WorkingVertex; 3]) -> [Point2<f32>; 3] {
    triangle.map(|v| Point2::new(v.screen_pos.x, v.screen_pos.y))
}

/// x where the edge `a -> b` crosses the horizontal line at `y`.
fn edge_x_at(a: Point2<f32>, b: Point2<f32>, y: f32) -> f32 {
    let dy = b.y - a.y;
    if dy.abs() <= f32::EPSILON {
        return a.x.min(b.x);
    }
    let t = ((y - a.y) / dy).clamp(0.0, 1.0);
    a.x + (b.x - a.x) * t
}
