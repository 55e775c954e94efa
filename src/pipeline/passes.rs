use crate::core::framebuffer::ScreenBuffer;
use crate::pipeline::renderer::{DrawStats, RenderPayload, Renderer, Transforms};
use crate::scene::context::Scene;
use log::debug;

/// Draws every object of `scene` into `screen`, in list order.
///
/// The screen is cleared once; view and projection are derived once from the
/// camera and the model matrix once per object.
pub fn draw_scene(scene: &Scene, renderer: &mut Renderer, screen: &mut ScreenBuffer) -> DrawStats {
    screen.clear();

    let mut transforms = Transforms {
        view: scene.camera.view_matrix(),
        projection: scene.camera.projection_matrix(),
        ..Transforms::default()
    };
    let mut stats = DrawStats::default();

    for object in &scene.objects {
        transforms.model = object.model_matrix();

        for geometry in &object.geometries {
            stats += renderer.render_geometry(
                screen,
                &RenderPayload {
                    geometry,
                    vertex_shader: object.vertex_shader.as_ref(),
                    fragment_shader: object.fragment_shader.as_ref(),
                    lights: &scene.lights,
                    transforms: &transforms,
                    options: &object.options,
                },
            );
        }
    }

    debug!(
        "Scene drawn: {} objects, {} of {} triangles rasterized",
        scene.objects.len(),
        stats.rasterized,
        stats.triangles
    );
    stats
}
