use crate::core::framebuffer::ScreenBuffer;
use crate::pipeline::passes::draw_scene;
use crate::pipeline::renderer::{DrawStats, Renderer};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::scene_object::SceneObject;

/// A camera, world-space lights and an ordered list of objects.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub objects: Vec<SceneObject>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            lights: Vec::new(),
            objects: Vec::new(),
        }
    }

    /// Clears `screen` and draws the whole scene into it.
    pub fn draw(&self, screen: &mut ScreenBuffer) -> DrawStats {
        let mut renderer = Renderer::new();
        draw_scene(self, &mut renderer, screen)
    }
}
