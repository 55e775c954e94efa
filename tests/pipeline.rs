use nalgebra::{Point3, Vector3};
use software_rasterizer::core::clipper::{ClipOutcome, FrustumClipper};
use software_rasterizer::core::framebuffer::{MAX_DEPTH, ScreenBuffer};
use software_rasterizer::core::geometry::{Vertex, WorkingVertex};
use software_rasterizer::core::math::transform::{
    TransformFactory, apply_perspective_division, ndc_to_screen,
};
use software_rasterizer::core::pipeline::{FragmentFn, VertexFn};
use software_rasterizer::io::config::Config;
use software_rasterizer::pipeline::renderer::{RenderPayload, Renderer, Transforms};
use software_rasterizer::pipeline::shaders::basic::{EmptyFragmentShader, EmptyVertexShader};
use software_rasterizer::scene::camera::Camera;
use software_rasterizer::scene::context::Scene;
use software_rasterizer::scene::loader::build_scene;
use software_rasterizer::scene::material::Material;
use software_rasterizer::scene::mesh::{Geometry, Mesh};
use software_rasterizer::scene::scene_object::{CullMode, FillStrategy, RenderOptions, SceneObject};
use std::sync::Arc;

fn test_camera() -> Camera {
    Camera::new(Point3::origin(), Vector3::z(), Vector3::y(), 90.0, 1.0, 1.0, 10.0)
}

#[test]
fn test_point_on_axis_projects_to_center_pixel() {
    let camera = test_camera();
    let clip = camera.projection_matrix() * camera.view_matrix() * Vector3::new(0.0, 0.0, 5.0).push(1.0);
    let screen = ndc_to_screen(&apply_perspective_division(&clip), 101.0, 101.0);

    assert!((screen.x - 50.5).abs() < 1e-4);
    assert!((screen.y - 50.5).abs() < 1e-4);
    assert!(screen.z > 0.0 && screen.z < MAX_DEPTH);
}

#[test]
fn test_small_triangle_covers_center_pixel() {
    let mesh = Mesh::new(
        vec![
            Vertex::at(0.0, 0.1, 5.0),
            Vertex::at(-0.1, -0.1, 5.0),
            Vertex::at(0.1, -0.1, 5.0),
        ],
        vec![0, 1, 2],
    );
    let mut scene = Scene::new(test_camera());
    scene.objects.push(SceneObject::new(vec![Geometry::new(mesh, Material::default())]));

    let mut screen = ScreenBuffer::new(101, 101);
    let stats = scene.draw(&mut screen);

    assert_eq!(stats.rasterized, 1);
    assert!(screen.color(50, 50).unwrap().norm() > 0.0);
    assert_eq!(screen.color(0, 0), Some(Vector3::zeros()));
}

#[test]
fn test_near_plane_straddle_with_two_vertices_out_gives_one_triangle() {
    let projection = TransformFactory::perspective(90.0, 1.0, 1.0, 10.0);
    let vertex = |x: f32, y: f32, z: f32| {
        let mut v = WorkingVertex::from(&Vertex::at(x, y, z));
        v.varying.view_pos = Vector3::new(x, y, z);
        v.clip_pos = projection * Vector3::new(x, y, z).push(1.0);
        v
    };

    let mut clipper = FrustumClipper::new();
    let outcome = clipper.clip_triangle(&[
        vertex(0.0, 0.0, 5.0),
        vertex(-0.3, -0.3, 0.5),
        vertex(0.3, -0.3, 0.5),
    ]);

    assert_eq!(outcome.triangle_count(), 1);
    let ClipOutcome::Clipped(polygon) = outcome else {
        panic!("expected a clipped polygon");
    };
    assert!(polygon.iter().all(|v| v.varying.view_pos.z >= 1.0 - 1e-4));
}

#[test]
fn test_near_plane_straddle_with_one_vertex_out_stays_in_front() {
    let camera = test_camera();
    let projection = camera.projection_matrix();
    let vertex = |x: f32, y: f32, z: f32| {
        let mut v = WorkingVertex::from(&Vertex::at(x, y, z));
        v.varying.view_pos = Vector3::new(x, y, z);
        v.clip_pos = projection * Vector3::new(x, y, z).push(1.0);
        v
    };

    let mut clipper = FrustumClipper::new();
    let outcome = clipper.clip_triangle(&[
        vertex(0.0, 0.0, 0.5),
        vertex(-1.0, -1.0, 5.0),
        vertex(1.0, -1.0, 5.0),
    ]);

    // The near plane cuts off one corner, leaving a quad fanned into two.
    assert_eq!(outcome.triangle_count(), 2);
    let ClipOutcome::Clipped(polygon) = outcome else {
        panic!("expected a clipped polygon");
    };
    assert!(polygon.iter().all(|v| v.varying.view_pos.z >= camera.near - 1e-4));
}

#[test]
fn test_rotated_camera_keeps_projecting_forward_point_to_center() {
    let mut camera = test_camera();
    camera.rotate(&Vector3::new(0.3, 1.0, 0.2), 47.0);
    camera.move_forward(1.5);

    let target = camera.position + camera.toward * 5.0;
    let clip = camera.projection_matrix() * camera.view_matrix() * target.to_homogeneous();
    let screen = ndc_to_screen(&apply_perspective_division(&clip), 101.0, 101.0);

    assert!((screen.x - 50.5).abs() < 1e-3);
    assert!((screen.y - 50.5).abs() < 1e-3);
}

#[test]
fn test_constant_attribute_survives_interpolation() {
    // A tilted quad spanning depths 2..8: every fragment keeps the exact
    // vertex color.
    let color = Vector3::new(10.0, 200.0, 30.0);
    let mut vertices = vec![
        Vertex::at(-1.0, -1.0, 2.0),
        Vertex::at(1.0, -1.0, 2.0),
        Vertex::at(4.0, 4.0, 8.0),
        Vertex::at(-4.0, 4.0, 8.0),
    ];
    for v in &mut vertices {
        v.color = color;
    }
    let geometry = Geometry::new(Mesh::new(vertices, vec![0, 1, 2, 0, 2, 3]), Material::default());

    let camera = test_camera();
    let transforms = Transforms {
        view: camera.view_matrix(),
        projection: camera.projection_matrix(),
        ..Transforms::default()
    };
    let options = RenderOptions {
        culling: CullMode::None,
        ..RenderOptions::default()
    };

    let mut screen = ScreenBuffer::new(80, 80);
    Renderer::new().render_geometry(
        &mut screen,
        &RenderPayload {
            geometry: &geometry,
            vertex_shader: &EmptyVertexShader,
            fragment_shader: &EmptyFragmentShader,
            lights: &[],
            transforms: &transforms,
            options: &options,
        },
    );

    let painted: Vec<_> = screen
        .color_buffer()
        .iter()
        .filter(|c| **c != Vector3::zeros())
        .collect();
    assert!(!painted.is_empty());
    assert!(painted.iter().all(|c| **c == color));
}

#[test]
fn test_closure_shaders_run_after_reference_stages() {
    let mut scene = Scene::new(test_camera());
    let mut object = SceneObject::new(vec![Geometry::new(
        Mesh::create_test_triangle(),
        Material::default(),
    )]);
    object.position = Vector3::new(0.0, 0.0, 4.0);
    // Push the triangle two units further away after the reference transform.
    object.vertex_shader = Arc::new(VertexFn::new(|payload| {
        let projection = *payload.projection;
        let vertex = &mut *payload.vertex;
        vertex.varying.view_pos.z += 2.0;
        vertex.clip_pos = projection * vertex.varying.view_pos.push(1.0);
    }));
    object.fragment_shader = Arc::new(FragmentFn::new(|payload| {
        payload.color = Vector3::new(0.0, 255.0, 0.0);
    }));
    scene.objects.push(object);

    let mut screen = ScreenBuffer::new(101, 101);
    scene.draw(&mut screen);

    assert_eq!(screen.color(50, 50), Some(Vector3::new(0.0, 255.0, 0.0)));
    // Triangle top at y = 0.5, depth 6: NDC y = 0.5 / 6.
    let top_row = (0.5 * 101.0 * (0.5 / 6.0 + 1.0)) as i32;
    assert_eq!(screen.color(50, top_row + 2), Some(Vector3::zeros()));
}

#[test]
fn test_fill_strategies_agree_on_config_scene() {
    let config = Config::parse(
        r#"
        [render]
        width = 96
        height = 96

        [[objects]]
        primitive = "cube"
        scaling = [4.0, 4.0, 4.0]
        rotation_axis = [1.0, 1.0, 0.0]
        rotation_degrees = 30.0
        fragment_shader = "empty"
        "#,
    )
    .unwrap();

    let mut scene = build_scene(&config);
    let mut bounding_box = ScreenBuffer::new(96, 96);
    scene.draw(&mut bounding_box);

    scene.objects[0].options.fill = FillStrategy::Scanline;
    let mut scanline = ScreenBuffer::new(96, 96);
    scene.draw(&mut scanline);

    let filled = bounding_box
        .color_buffer()
        .iter()
        .filter(|c| **c != Vector3::zeros())
        .count();
    let mismatched = bounding_box
        .color_buffer()
        .iter()
        .zip(scanline.color_buffer())
        .filter(|(a, b)| (**a - **b).norm() > 1e-3)
        .count();
    assert!(filled > 0);
    assert!(mismatched <= filled / 10, "{mismatched} of {filled}");
}
