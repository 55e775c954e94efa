use crate::io::config::{CameraConfig, Config, ObjectConfig};
use crate::io::obj_loader::load_obj;
use crate::pipeline::shaders::ShaderKind;
use crate::scene::camera::Camera;
use crate::scene::context::Scene;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::mesh::{Geometry, Mesh};
use crate::scene::scene_object::{CullMode, FillStrategy, RenderMode, SceneObject};
use log::{error, info, warn};
use nalgebra::{Point3, Vector3};

/// Builds a drawable scene from configuration.
///
/// Unknown option strings fall back to their defaults with a warning; an
/// object whose OBJ cannot be loaded is left out.
pub fn build_scene(config: &Config) -> Scene {
    let aspect_ratio = if config.render.height > 0 {
        config.render.width as f32 / config.render.height as f32
    } else {
        1.0
    };

    let mut scene = Scene::new(build_camera(&config.camera, aspect_ratio));
    scene.lights = config
        .lights
        .iter()
        .map(|l| Light::new(Vector3::from(l.position), Vector3::from(l.intensity)))
        .collect();

    let fill = parse_fill(&config.render.fill);
    for (i, object_config) in config.objects.iter().enumerate() {
        match build_object(object_config) {
            Ok(mut object) => {
                object.options.fill = fill;
                scene.objects.push(object);
            }
            Err(e) => error!("Skipping object #{}: {}", i, e),
        }
    }

    info!(
        "Scene built: {} objects, {} lights",
        scene.objects.len(),
        scene.lights.len()
    );
    scene
}

fn build_camera(config: &CameraConfig, aspect_ratio: f32) -> Camera {
    let defaults = CameraConfig::default();

    let toward = Vector3::from(config.toward).try_normalize(1e-6).unwrap_or_else(|| {
        warn!("Camera 'toward' is zero. Using {:?}.", defaults.toward);
        Vector3::from(defaults.toward)
    });

    // Keep the basis orthonormal even when the file is slightly off.
    let top = Vector3::from(config.top);
    let top = (top - toward * top.dot(&toward))
        .try_normalize(1e-6)
        .unwrap_or_else(|| {
            warn!("Camera 'top' is parallel to 'toward'. Picking a perpendicular axis.");
            let helper = if toward.y.abs() < 0.9 { Vector3::y() } else { Vector3::z() };
            (helper - toward * helper.dot(&toward)).normalize()
        });
    if Vector3::from(config.top).normalize().dot(&toward).abs() > 1e-4 {
        warn!("Camera 'top' was not orthogonal to 'toward'. Re-orthogonalized.");
    }

    let (near, far) = if 0.0 < config.near && config.near < config.far {
        (config.near, config.far)
    } else {
        warn!(
            "Invalid camera range near={} far={}. Using {}..{}.",
            config.near, config.far, defaults.near, defaults.far
        );
        (defaults.near, defaults.far)
    };

    Camera::new(
        Point3::from(config.position),
        toward,
        top,
        config.fov,
        aspect_ratio,
        near,
        far,
    )
}

fn build_object(config: &ObjectConfig) -> Result<SceneObject, String> {
    let geometries = match (&config.path, config.primitive.as_deref()) {
        (Some(path), _) => load_obj(path)?,
        (None, Some(name)) => vec![Geometry::new(build_primitive(name)?, Material::default())],
        (None, None) => return Err("neither 'path' nor 'primitive' is set".to_string()),
    };

    let mut object = SceneObject::new(geometries);
    object.position = Vector3::from(config.position);
    object.scaling = Vector3::from(config.scaling);
    object.rotation_axis = Vector3::from(config.rotation_axis);
    object.rotation_degrees = config.rotation_degrees;

    let shader = ShaderKind::from_name(&config.fragment_shader).unwrap_or_else(|| {
        warn!("Unknown fragment shader '{}'. Using Blinn-Phong.", config.fragment_shader);
        ShaderKind::default()
    });
    object.fragment_shader = shader.build();

    object.options.culling = parse_cull_mode(&config.cull_mode);
    object.options.mode = parse_render_mode(&config.render_mode);
    object.options.z_test = config.z_test;
    object.options.z_write = config.z_write;
    Ok(object)
}

fn build_primitive(name: &str) -> Result<Mesh, String> {
    match name.to_ascii_lowercase().as_str() {
        "triangle" => Ok(Mesh::create_test_triangle()),
        "cube" => Ok(Mesh::create_cube(1.0)),
        other => Err(format!("unknown primitive '{}'", other)),
    }
}

fn parse_cull_mode(name: &str) -> CullMode {
    match name.to_ascii_lowercase().as_str() {
        "back" => CullMode::Back,
        "front" => CullMode::Front,
        "none" => CullMode::None,
        _ => {
            warn!("Unknown cull mode '{}'. Using back-face culling.", name);
            CullMode::Back
        }
    }
}

fn parse_render_mode(name: &str) -> RenderMode {
    match name.to_ascii_lowercase().as_str() {
        "default" | "fill" => RenderMode::Default,
        "line_only" | "wireframe" => RenderMode::LineOnly,
        _ => {
            warn!("Unknown render mode '{}'. Using filled triangles.", name);
            RenderMode::Default
        }
    }
}

fn parse_fill(name: &str) -> FillStrategy {
    match name.to_ascii_lowercase().as_str() {
        "bounding_box" | "bbox" => FillStrategy::BoundingBox,
        "scanline" => FillStrategy::Scanline,
        _ => {
            warn!("Unknown fill strategy '{}'. Using bounding box.", name);
            FillStrategy::BoundingBox
        }
    }
}
