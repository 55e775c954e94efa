use crate::core::geometry::Vertex;
use crate::scene::material::Material;
use nalgebra::{Vector2, Vector3, Vector4};

/// A collection of vertices and indices representing a 3D object.
///
/// Every three indices form a triangle; front faces wind counter-clockwise
/// as seen by the camera.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        debug_assert!(indices.len() % 3 == 0, "indices must come in triples");
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Creates a single triangle in the z = 0 plane, facing -Z.
    pub fn create_test_triangle() -> Self {
        let normal = Vector3::new(0.0, 0.0, -1.0);
        let color = Vector3::new(128.0, 128.0, 128.0);
        let vertices = vec![
            Vertex::new(Vector4::new(0.0, 0.5, 0.0, 1.0), color, Vector2::new(0.5, 1.0), normal),
            Vertex::new(Vector4::new(-0.5, -0.5, 0.0, 1.0), color, Vector2::new(0.0, 0.0), normal),
            Vertex::new(Vector4::new(0.5, -0.5, 0.0, 1.0), color, Vector2::new(1.0, 0.0), normal),
        ];

        Self::new(vertices, vec![0, 1, 2])
    }

    /// Creates an axis-aligned cube of edge length `size` centered at the origin,
    /// with per-face normals and UVs.
    pub fn create_cube(size: f32) -> Self {
        let h = size * 0.5;
        // (outward normal, in-plane "up"); "right" is normal x up so each face
        // winds counter-clockwise when seen from outside.
        let faces = [
            (Vector3::x(), Vector3::y()),
            (-Vector3::x(), Vector3::y()),
            (Vector3::y(), Vector3::z()),
            (-Vector3::y(), Vector3::z()),
            (Vector3::z(), Vector3::y()),
            (-Vector3::z(), Vector3::y()),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, up) in faces {
            let right = normal.cross(&up);
            let base = vertices.len() as u32;
            for (su, sv) in corners {
                let p = (normal + right * su + up * sv) * h;
                vertices.push(Vertex::new(
                    p.push(1.0),
                    Vector3::new(128.0, 128.0, 128.0),
                    Vector2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5),
                    normal,
                ));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(vertices, indices)
    }
}

/// The unit of drawable content: a mesh and the material it is shaded with.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub mesh: Mesh,
    pub material: Material,
}

impl Geometry {
    pub fn new(mesh: Mesh, material: Material) -> Self {
        Self { mesh, material }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = Mesh::create_cube(2.0);
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.vertices.iter().all(|v| v.position.xyz().amax() == 1.0));
    }

    #[test]
    fn test_cube_faces_wind_outward() {
        let cube = Mesh::create_cube(2.0);
        for tri in cube.indices.chunks(3) {
            let p: Vec<Vector3<f32>> = tri
                .iter()
                .map(|&i| cube.vertices[i as usize].position.xyz())
                .collect();
            let n = cube.vertices[tri[0] as usize].normal;
            let geometric = (p[1] - p[0]).cross(&(p[2] - p[0]));
            // Counter-clockwise from outside: the raw cross product points inward
            // in the left-handed view convention.
            assert!(geometric.dot(&n) < 0.0);
        }
    }
}
