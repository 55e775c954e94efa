use crate::core::geometry::Vertex;
use crate::scene::material::Material;
use crate::scene::mesh::{Geometry, Mesh};
use crate::scene::texture::Texture;
use log::{info, warn};
use nalgebra::{Vector2, Vector3, Vector4};
use std::path::Path;

/// Color given to every loaded vertex.
const VERTEX_GRAY: f32 = 128.0;

/// Loads an OBJ file into one `Geometry` per model.
///
/// Positions and normals have their X axis negated to move from the file's
/// right-handed convention into the renderer's. Materials come from the
/// referenced MTL file; textures resolve relative to the OBJ's directory and
/// a texture that fails to load leaves the material untextured.
///
/// # Returns
/// * `Result<Vec<Geometry>, String>` - The loaded geometries or an error message.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Vec<Geometry>, String> {
    let path_obj = path.as_ref();
    if !path_obj.exists() {
        return Err(format!("File not found: {:?}", path_obj));
    }

    info!("Loading OBJ file: {:?}", path_obj);

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true, // one index stream for position, normal and UV
        ..Default::default()
    };

    let (models, materials) = tobj::load_obj(path_obj, &load_options)
        .map_err(|e| format!("Failed to load OBJ {:?}: {}", path_obj, e))?;

    let materials = materials.unwrap_or_else(|e| {
        warn!("No usable MTL for {:?}: {}. Using default material.", path_obj, e);
        Vec::new()
    });
    let base_dir = path_obj.parent().unwrap_or_else(|| Path::new(""));

    let mut geometries = Vec::with_capacity(models.len());
    for model in models {
        let mesh = &model.mesh;
        let num_vertices = mesh.positions.len() / 3;
        let has_normals = mesh.normals.len() >= num_vertices * 3;
        let has_texcoords = mesh.texcoords.len() >= num_vertices * 2;

        if !has_normals {
            warn!("Mesh '{}' is missing normals. Using default (0, 0, -1).", model.name);
        }

        let vertices = (0..num_vertices)
            .map(|i| {
                let position = Vector4::new(
                    -mesh.positions[i * 3],
                    mesh.positions[i * 3 + 1],
                    mesh.positions[i * 3 + 2],
                    1.0,
                );
                let normal = if has_normals {
                    Vector3::new(
                        -mesh.normals[i * 3],
                        mesh.normals[i * 3 + 1],
                        mesh.normals[i * 3 + 2],
                    )
                } else {
                    Vector3::new(0.0, 0.0, -1.0)
                };
                let texcoord = if has_texcoords {
                    Vector2::new(mesh.texcoords[i * 2], mesh.texcoords[i * 2 + 1])
                } else {
                    Vector2::zeros()
                };

                Vertex::new(position, Vector3::repeat(VERTEX_GRAY), texcoord, normal)
            })
            .collect();

        let material = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .map(|mtl| convert_material(mtl, base_dir))
            .unwrap_or_default();

        info!(
            "Mesh '{}': {} vertices, {} triangles",
            model.name,
            num_vertices,
            mesh.indices.len() / 3
        );
        geometries.push(Geometry::new(
            Mesh::new(vertices, mesh.indices.clone()),
            material,
        ));
    }

    Ok(geometries)
}

fn convert_material(mtl: &tobj::Material, base_dir: &Path) -> Material {
    let defaults = Material::default();
    let vec3 = |v: Option<[f32; 3]>, fallback: Vector3<f32>| v.map(Vector3::from).unwrap_or(fallback);

    let diffuse_texture = match &mtl.diffuse_texture {
        Some(name) if !name.is_empty() => Texture::load(base_dir.join(name)).unwrap_or_else(|e| {
            warn!("{}. Material '{}' stays untextured.", e, mtl.name);
            Texture::empty()
        }),
        _ => Texture::empty(),
    };

    Material {
        ka: vec3(mtl.ambient, defaults.ka),
        kd: vec3(mtl.diffuse, defaults.kd),
        ks: vec3(mtl.specular, defaults.ks),
        ns: mtl.shininess.unwrap_or(defaults.ns),
        diffuse_texture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("software-rasterizer-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_obj("does/not/exist.obj").is_err());
    }

    #[test]
    fn test_loads_triangle_with_material() {
        let dir = temp_dir("obj");
        fs::write(
            dir.join("tri.mtl"),
            "newmtl red\nKa 0.1 0.1 0.1\nKd 1.0 0.0 0.0\nKs 0.2 0.2 0.2\nNs 10\nmap_Kd missing.png\n",
        )
        .unwrap();
        fs::write(
            dir.join("tri.obj"),
            "mtllib tri.mtl\no tri\nv 1 0 0\nv 0 1 0\nv 0 0 1\nvn 1 0 0\nusemtl red\nf 1//1 2//1 3//1\n",
        )
        .unwrap();

        let geometries = load_obj(dir.join("tri.obj")).unwrap();
        assert_eq!(geometries.len(), 1);

        let geometry = &geometries[0];
        assert_eq!(geometry.mesh.triangle_count(), 1);
        assert!(geometry
            .mesh
            .vertices
            .iter()
            .any(|v| v.position.x == -1.0 && v.normal.x == -1.0));
        assert!(geometry.mesh.vertices.iter().all(|v| v.color == Vector3::repeat(128.0)));
        assert_eq!(geometry.material.kd, Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(geometry.material.ns, 10.0);
        assert!(geometry.material.diffuse_texture.is_empty());

        fs::remove_dir_all(dir).ok();
    }
}
