use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// A perspective camera described by its position and an orthonormal
/// `toward`/`top` pair.
///
/// The pair must stay unit-length and mutually orthogonal; the view matrix
/// relies on it. `rotate` preserves it, direct field writes must too.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Viewing direction.
    pub toward: Vector3<f32>,
    /// Screen-up direction.
    pub top: Vector3<f32>,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, -15.0),
            Vector3::z(),
            Vector3::y(),
            45.0,
            1.0,
            1.0,
            50.0,
        )
    }
}

impl Camera {
    /// Creates a camera; `toward` and `top` are normalized here but must
    /// already be orthogonal.
    pub fn new(
        position: Point3<f32>,
        toward: Vector3<f32>,
        top: Vector3<f32>,
        fov: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        debug_assert!(0.0 < near && near < far, "camera needs 0 < near < far");
        Self {
            position,
            toward: toward.normalize(),
            top: top.normalize(),
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera-space +X axis (`top x toward`).
    pub fn right(&self) -> Vector3<f32> {
        self.top.cross(&self.toward)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        TransformFactory::view(&self.position, &self.toward, &self.top)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        TransformFactory::perspective(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Rotates both axes with the same matrix and re-normalizes them, so the
    /// basis survives long sequences of small rotations.
    pub fn rotate(&mut self, axis: &Vector3<f32>, angle_deg: f32) {
        let rotation = TransformFactory::rotation(axis, angle_deg);
        self.toward = (rotation * self.toward.push(0.0)).xyz().normalize();
        self.top = (rotation * self.top.push(0.0)).xyz().normalize();
    }

    pub fn move_forward(&mut self, delta: f32) {
        self.position += self.toward * delta;
    }

    pub fn move_right(&mut self, delta: f32) {
        self.position += self.right() * delta;
    }

    pub fn move_up(&mut self, delta: f32) {
        self.position += self.top * delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_full_turn_in_steps_restores_basis() {
        let mut camera = Camera::default();
        let (toward, top) = (camera.toward, camera.top);
        let axis = Vector3::new(1.0, 1.0, 0.0);

        for _ in 0..36 {
            camera.rotate(&axis, 10.0);
            assert!((camera.toward.norm() - 1.0).abs() < EPS);
            assert!((camera.top.norm() - 1.0).abs() < EPS);
            assert!(camera.toward.dot(&camera.top).abs() < EPS);
        }

        assert!((camera.toward - toward).norm() < EPS);
        assert!((camera.top - top).norm() < EPS);
    }

    #[test]
    fn test_moves_follow_basis() {
        let mut camera = Camera::new(
            Point3::origin(),
            Vector3::z(),
            Vector3::y(),
            90.0,
            1.0,
            1.0,
            10.0,
        );
        camera.move_forward(2.0);
        camera.move_right(1.0);
        camera.move_up(-3.0);
        assert!((camera.position - Point3::new(1.0, -3.0, 2.0)).norm() < EPS);
    }

    #[test]
    fn test_right_axis() {
        let camera = Camera::default();
        assert!((camera.right() - Vector3::x()).norm() < EPS);
    }
}
