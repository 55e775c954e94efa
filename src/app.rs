use crate::core::framebuffer::ScreenBuffer;
use crate::io::config::Config;
use crate::io::image::save_screen_buffer;
use crate::pipeline::passes::draw_scene;
use crate::pipeline::renderer::Renderer;
use crate::scene::loader::build_scene;
use crate::scene::scene_object::RenderMode;
use log::info;
use std::time::Instant;

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub output: Option<String>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub scanline: bool,
    pub wireframe: bool,
}

impl Overrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.render.output = output.clone();
        }
        if let Some(width) = self.width {
            config.render.width = width;
        }
        if let Some(height) = self.height {
            config.render.height = height;
        }
        if self.scanline {
            config.render.fill = "scanline".to_string();
        }
    }
}

/// Renders one frame headlessly and writes it to `config.render.output`.
pub fn run_cli(mut config: Config, overrides: &Overrides) -> Result<(), String> {
    overrides.apply(&mut config);
    let (width, height) = (config.render.width, config.render.height);
    if width == 0 || height == 0 {
        return Err(format!("Invalid resolution {}x{}", width, height));
    }

    info!("Starting CLI mode ({}x{})...", width, height);
    let mut scene = build_scene(&config);
    if overrides.wireframe {
        for object in &mut scene.objects {
            object.options.mode = RenderMode::LineOnly;
        }
    }

    let start_time = Instant::now();
    let mut screen = ScreenBuffer::new(width, height);
    let mut renderer = Renderer::new();
    let stats = draw_scene(&scene, &mut renderer, &mut screen);
    info!(
        "Render completed in {:.2?}: {} triangles, {} culled, {} clipped away, {} rasterized",
        start_time.elapsed(),
        stats.triangles,
        stats.culled,
        stats.clipped_away,
        stats.rasterized
    );

    info!("Saving output to '{}'...", config.render.output);
    save_screen_buffer(&screen, &config.render.output)?;
    info!("Done.");
    Ok(())
}
