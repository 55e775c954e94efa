use crate::core::framebuffer::MAX_DEPTH;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

//=================================
// Transform Matrix Factory
//=================================

/// Factory for creating the pipeline's transformation matrices.
///
/// Manually implemented to keep the coordinate system under local control:
/// view space has +X right, +Y up and +Z pointing where the camera looks,
/// and clip-space `w` equals view-space `z`.
pub struct TransformFactory;

#[rustfmt::skip]
impl TransformFactory {
    /// Composes the model matrix: `translation * scaling * rotation`.
    pub fn model(
        scaling: &Matrix4<f32>,
        rotation: &Matrix4<f32>,
        translation: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        translation * scaling * rotation
    }

    /// Creates a rotation matrix around an arbitrary axis using Rodrigues' rotation formula.
    /// The angle is in degrees, clockwise-positive when looking down the axis.
    pub fn rotation(axis: &Vector3<f32>, angle_deg: f32) -> Matrix4<f32> {
        let axis_unit = axis.try_normalize(1e-12).unwrap_or_else(Vector3::y);
        let x = axis_unit.x;
        let y = axis_unit.y;
        let z = axis_unit.z;
        let angle_rad = angle_deg.to_radians();
        let c = angle_rad.cos();
        let s = angle_rad.sin();
        let t = 1.0 - c;

        Matrix4::new(
            t * x * x + c,     t * x * y - z * s, t * x * z + y * s, 0.0,
            t * x * y + z * s, t * y * y + c,     t * y * z - x * s, 0.0,
            t * x * z - y * s, t * y * z + x * s, t * z * z + c,     0.0,
            0.0,               0.0,               0.0,               1.0,
        )
    }

    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, translation.x,
            0.0, 1.0, 0.0, translation.y,
            0.0, 0.0, 1.0, translation.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Creates a non-uniform scaling matrix.
    pub fn scaling(scale: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new(
            scale.x, 0.0,     0.0,     0.0,
            0.0,     scale.y, 0.0,     0.0,
            0.0,     0.0,     scale.z, 0.0,
            0.0,     0.0,     0.0,     1.0,
        )
    }

    /// Creates the view matrix from a camera position and its orthonormal
    /// `toward`/`top` axes.
    ///
    /// The world is first moved so the camera sits at the origin, then rotated
    /// by the basis (right = top x toward, top, toward) written as rows. That is
    /// the transpose of the basis-to-world rotation, valid only because the
    /// basis is orthonormal; callers keep it that way.
    pub fn view(position: &Point3<f32>, toward: &Vector3<f32>, top: &Vector3<f32>) -> Matrix4<f32> {
        let right = top.cross(toward);

        let rotation = Matrix4::new(
            right.x,  right.y,  right.z,  0.0,
            top.x,    top.y,    top.z,    0.0,
            toward.x, toward.y, toward.z, 0.0,
            0.0,      0.0,      0.0,      1.0,
        );

        rotation * Self::translation(&-position.coords)
    }

    /// Inverse of [`TransformFactory::view`] for the same orthonormal basis.
    pub fn inverse_view(position: &Point3<f32>, toward: &Vector3<f32>, top: &Vector3<f32>) -> Matrix4<f32> {
        let right = top.cross(toward);

        let rotation = Matrix4::new(
            right.x, top.x, toward.x, 0.0,
            right.y, top.y, toward.y, 0.0,
            right.z, top.z, toward.z, 0.0,
            0.0,     0.0,   0.0,      1.0,
        );

        Self::translation(&position.coords) * rotation
    }

    /// Creates the perspective projection for a symmetric frustum.
    ///
    /// `fov_deg` is the vertical field of view. A view-space point on the near
    /// plane maps to `z = -near * w`, one on the far plane to `z = far * w`,
    /// with `w = z_view`.
    pub fn perspective(fov_deg: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4<f32> {
        let top = (near * (fov_deg.to_radians() / 2.0).tan()).abs();
        let right = top * aspect_ratio;

        Matrix4::new(
            near / right, 0.0,        0.0,                         0.0,
            0.0,          near / top, 0.0,                         0.0,
            0.0,          0.0,        (far + near) / (far - near), -2.0 * far * near / (far - near),
            0.0,          0.0,        1.0,                         0.0,
        )
    }

    /// Normal matrix for a model-view transform: inverse-transpose of its 3x3 block.
    /// Falls back to the plain block when it is singular (e.g. zero scaling).
    pub fn normal_matrix(model_view: &Matrix4<f32>) -> Matrix3<f32> {
        let linear: Matrix3<f32> = model_view.fixed_view::<3, 3>(0, 0).into_owned();
        linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear)
    }
}

//=================================
// Core Transformation Functions
//=================================

/// Performs perspective division: Clip Space -> NDC.
///
/// The near-plane clip guarantees `w > 0` for everything that reaches this
/// point; a vanishing `w` is a pipeline defect.
#[inline]
pub fn apply_perspective_division(clip: &Vector4<f32>) -> Vector3<f32> {
    debug_assert!(clip.w.abs() > 1e-6, "perspective divide with w = {}", clip.w);
    Vector3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w)
}

/// Viewport transform: NDC `[-1, 1]^3` -> pixels (bottom-left origin) and
/// depth `[0, MAX_DEPTH]`.
#[inline]
pub fn ndc_to_screen(ndc: &Vector3<f32>, width: f32, height: f32) -> Vector3<f32> {
    Vector3::new(
        0.5 * width * (ndc.x + 1.0),
        0.5 * height * (ndc.y + 1.0),
        0.5 * MAX_DEPTH * (ndc.z + 1.0),
    )
}
