use nalgebra::{Matrix4, Vector3};

/// A point light.
///
/// `intensity` is radiant-intensity-like and falls off with the squared
/// distance in the Blinn-Phong shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vector3<f32>,
    pub intensity: Vector3<f32>,
}

impl Light {
    pub fn new(position: Vector3<f32>, intensity: Vector3<f32>) -> Self {
        Self {
            position,
            intensity,
        }
    }

    /// Returns this light with its position carried through `matrix`
    /// (used to move lights into view space once per draw).
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Self {
        let pos = matrix * self.position.push(1.0);
        Self {
            position: pos.xyz(),
            intensity: self.intensity,
        }
    }
}
