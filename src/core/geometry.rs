use nalgebra::{Vector2, Vector3, Vector4};
use std::ops::{Add, Mul, Sub};

/// Attribute types that can be linearly interpolated across a triangle or
/// along a clipped edge.
pub trait Interpolatable:
    Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self>
{
}

impl Interpolatable for f32 {}
impl Interpolatable for Vector2<f32> {}
impl Interpolatable for Vector3<f32> {}
impl Interpolatable for Vector4<f32> {}

/// Represents a single mesh vertex in object space.
///
/// This is the immutable template stored in a `Mesh`; every draw call copies
/// it into a `WorkingVertex` before any stage touches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Homogeneous position in local object space (w = 1 for points).
    pub position: Vector4<f32>,
    /// Vertex color in the 0..255 channel range.
    pub color: Vector3<f32>,
    /// Texture coordinates (UV).
    pub texcoord: Vector2<f32>,
    /// Normal vector for lighting calculations.
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(
        position: Vector4<f32>,
        color: Vector3<f32>,
        texcoord: Vector2<f32>,
        normal: Vector3<f32>,
    ) -> Self {
        Self {
            position,
            color,
            texcoord,
            normal,
        }
    }

    /// Shorthand for a point-vertex (w = 1).
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector4::new(x, y, z, 1.0),
            color: Vector3::new(128.0, 128.0, 128.0),
            texcoord: Vector2::zeros(),
            normal: Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

/// Per-vertex attributes that are carried through clipping and interpolated
/// across a triangle's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Varying {
    /// Position in view (camera) space.
    pub view_pos: Vector3<f32>,
    pub color: Vector3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Vector2<f32>,
}

impl Varying {
    /// Returns a copy with a unit-length normal (zero normals are left alone).
    pub fn with_normalized_normal(mut self) -> Self {
        if let Some(n) = self.normal.try_normalize(1e-12) {
            self.normal = n;
        }
        self
    }
}

impl Add for Varying {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            view_pos: self.view_pos + rhs.view_pos,
            color: self.color + rhs.color,
            normal: self.normal + rhs.normal,
            uv: self.uv + rhs.uv,
        }
    }
}

impl Sub for Varying {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            view_pos: self.view_pos - rhs.view_pos,
            color: self.color - rhs.color,
            normal: self.normal - rhs.normal,
            uv: self.uv - rhs.uv,
        }
    }
}

impl Mul<f32> for Varying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            view_pos: self.view_pos * scalar,
            color: self.color * scalar,
            normal: self.normal * scalar,
            uv: self.uv * scalar,
        }
    }
}

impl Interpolatable for Varying {}

/// A vertex as it flows through one `render_geometry` call.
///
/// Owned exclusively by the renderer's working arena; never read across two
/// draw calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingVertex {
    /// Object-space position copied from the mesh.
    pub position: Vector4<f32>,
    /// Homogeneous clip-space position (pre perspective divide).
    pub clip_pos: Vector4<f32>,
    /// Normalized device coordinates (after the divide).
    pub ndc_pos: Vector3<f32>,
    /// Pixel coordinates plus depth in `[0, MAX_DEPTH]`.
    pub screen_pos: Vector3<f32>,
    pub varying: Varying,
    /// Set when the vertex belongs to a triangle that reaches the rasterizer.
    pub enabled: bool,
}

impl WorkingVertex {
    /// Linear interpolation between two working vertices with weight `t`
    /// (0 => `a`, 1 => `b`). The normal is re-normalized afterwards.
    pub fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            position: lerp(a.position, b.position, t),
            clip_pos: lerp(a.clip_pos, b.clip_pos, t),
            ndc_pos: lerp(a.ndc_pos, b.ndc_pos, t),
            screen_pos: lerp(a.screen_pos, b.screen_pos, t),
            varying: lerp(a.varying, b.varying, t).with_normalized_normal(),
            enabled: a.enabled || b.enabled,
        }
    }
}

impl From<&Vertex> for WorkingVertex {
    fn from(vertex: &Vertex) -> Self {
        Self {
            position: vertex.position,
            clip_pos: vertex.position,
            ndc_pos: Vector3::zeros(),
            screen_pos: Vector3::zeros(),
            varying: Varying {
                view_pos: vertex.position.xyz(),
                color: vertex.color,
                normal: vertex.normal,
                uv: vertex.texcoord,
            },
            enabled: false,
        }
    }
}

/// The single interpolation primitive used by the clipper: `a + (b - a) * t`.
#[inline]
pub fn lerp<T: Interpolatable>(a: T, b: T, t: f32) -> T {
    a + (b - a) * t
}

/// Blends three values with barycentric weights, relative to the first one.
///
/// Weights are assumed to sum to one. Attributes equal at all three vertices
/// come back bit-for-bit unchanged.
#[inline]
pub fn blend3<T: Interpolatable>(values: [T; 3], weights: &Vector3<f32>) -> T {
    values[0] + (values[1] - values[0]) * weights.y + (values[2] - values[0]) * weights.z
}
