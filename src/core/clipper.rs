use crate::core::geometry::WorkingVertex;
use nalgebra::Vector4;

/// Tolerance band around each plane. Vertices with a signed distance of at
/// least `-CLIP_EPSILON` count as inside, which keeps coincident points from
/// spawning zero-length intersection edges.
pub const CLIP_EPSILON: f32 = 1e-5;

/// One of the six canonical frustum planes in homogeneous clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipPlane {
    Near,
    Far,
    Left,
    Right,
    Bottom,
    Top,
}

impl ClipPlane {
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::Near,
        ClipPlane::Far,
        ClipPlane::Left,
        ClipPlane::Right,
        ClipPlane::Bottom,
        ClipPlane::Top,
    ];

    /// Plane coefficients; `dot(clip_pos, coeff) >= 0` is inside.
    pub fn coefficients(self) -> Vector4<f32> {
        match self {
            ClipPlane::Near => Vector4::new(0.0, 0.0, 1.0, 1.0),  // z >= -w
            ClipPlane::Far => Vector4::new(0.0, 0.0, -1.0, 1.0),  // z <=  w
            ClipPlane::Left => Vector4::new(1.0, 0.0, 0.0, 1.0),  // x >= -w
            ClipPlane::Right => Vector4::new(-1.0, 0.0, 0.0, 1.0), // x <=  w
            ClipPlane::Bottom => Vector4::new(0.0, 1.0, 0.0, 1.0), // y >= -w
            ClipPlane::Top => Vector4::new(0.0, -1.0, 0.0, 1.0),  // y <=  w
        }
    }

    #[inline]
    pub fn signed_distance(self, clip_pos: &Vector4<f32>) -> f32 {
        clip_pos.dot(&self.coefficients())
    }
}

/// Result of clipping one triangle.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOutcome {
    /// All vertices are inside every plane: render the original triangle as is.
    Inside,
    /// Nothing survives: do not render.
    Culled,
    /// The convex polygon left after clipping, at least three vertices,
    /// to be fan-triangulated from vertex 0.
    Clipped(Vec<WorkingVertex>),
}

impl ClipOutcome {
    /// Number of triangles the caller will rasterize for this outcome.
    pub fn triangle_count(&self) -> usize {
        match self {
            ClipOutcome::Inside => 1,
            ClipOutcome::Culled => 0,
            ClipOutcome::Clipped(polygon) => polygon.len().saturating_sub(2),
        }
    }
}

/// Sutherland-Hodgman clipper against the canonical view volume.
///
/// Holds two scratch polygons that are swapped between passes so a pass never
/// reads the buffer it is writing to.
#[derive(Debug, Default)]
pub struct FrustumClipper {
    current: Vec<WorkingVertex>,
    scratch: Vec<WorkingVertex>,
}

impl FrustumClipper {
    pub fn new() -> Self {
        Self {
            // A triangle clipped by six planes has at most nine vertices.
            current: Vec::with_capacity(16),
            scratch: Vec::with_capacity(16),
        }
    }

    /// Clips a triangle given in clip space (only `clip_pos` decides inside/outside).
    pub fn clip_triangle(&mut self, triangle: &[WorkingVertex; 3]) -> ClipOutcome {
        // 1. Trivial accept: every vertex inside every plane.
        if Self::is_fully_inside(triangle) {
            return ClipOutcome::Inside;
        }

        // 2. Trivial reject: all three vertices behind the same plane.
        if ClipPlane::ALL.iter().any(|plane| {
            triangle
                .iter()
                .all(|v| plane.signed_distance(&v.clip_pos) < 0.0)
        }) {
            return ClipOutcome::Culled;
        }

        // 3. One pass per plane.
        self.current.clear();
        self.current.extend_from_slice(triangle);

        for plane in ClipPlane::ALL {
            Self::clip_polygon_against_plane(&self.current, &mut self.scratch, plane);
            std::mem::swap(&mut self.current, &mut self.scratch);

            if self.current.len() < 3 {
                return ClipOutcome::Culled;
            }
        }

        ClipOutcome::Clipped(self.current.clone())
    }

    /// True when the triangle lies inside all six planes (within tolerance).
    pub fn is_fully_inside(triangle: &[WorkingVertex; 3]) -> bool {
        triangle.iter().all(|v| {
            ClipPlane::ALL
                .iter()
                .all(|plane| plane.signed_distance(&v.clip_pos) >= -CLIP_EPSILON)
        })
    }

    /// Clips a polygon against a single plane.
    ///
    /// - `input`: Source vertices.
    /// - `output`: Destination buffer (cleared before writing).
    fn clip_polygon_against_plane(
        input: &[WorkingVertex],
        output: &mut Vec<WorkingVertex>,
        plane: ClipPlane,
    ) {
        output.clear();

        let Some(last) = input.last() else {
            return;
        };

        let mut prev = last;
        let mut prev_d = plane.signed_distance(&prev.clip_pos);

        for curr in input {
            let curr_d = plane.signed_distance(&curr.clip_pos);
            let prev_inside = prev_d >= -CLIP_EPSILON;
            let curr_inside = curr_d >= -CLIP_EPSILON;

            if prev_inside != curr_inside {
                // Opposite sides, so the denominator is at least CLIP_EPSILON.
                let t = prev_d.abs() / (prev_d.abs() + curr_d.abs());
                output.push(WorkingVertex::lerp(prev, curr, t));
            }
            if curr_inside {
                output.push(*curr);
            }

            prev = curr;
            prev_d = curr_d;
        }
    }
}
