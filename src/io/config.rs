use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default = "default_lights")]
    pub lights: Vec<LightConfig>,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: CameraConfig::default(),
            lights: default_lights(),
            objects: default_objects(),
        }
    }
}

fn default_lights() -> Vec<LightConfig> {
    vec![LightConfig::default()]
}

fn default_objects() -> Vec<ObjectConfig> {
    vec![ObjectConfig {
        primitive: Some("cube".to_string()),
        scaling: [4.0, 4.0, 4.0],
        rotation_axis: [1.0, 1.0, 0.0],
        rotation_degrees: 30.0,
        ..ObjectConfig::default()
    }]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_fill")]
    pub fill: String, // "bounding_box", "scanline"
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output: default_output(),
            fill: default_fill(),
        }
    }
}

fn default_width() -> usize {
    700
}
fn default_height() -> usize {
    700
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_fill() -> String {
    "bounding_box".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    #[serde(default = "default_toward")]
    pub toward: [f32; 3],
    #[serde(default = "default_top")]
    pub top: [f32; 3],
    #[serde(default = "default_fov")]
    pub fov: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            toward: default_toward(),
            top: default_top(),
            fov: default_fov(),
            near: default_near(),
            far: default_far(),
        }
    }
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 0.0, -15.0]
}
fn default_toward() -> [f32; 3] {
    [0.0, 0.0, 1.0]
}
fn default_top() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fov() -> f32 {
    45.0
}
fn default_near() -> f32 {
    1.0
}
fn default_far() -> f32 {
    50.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_light_position")]
    pub position: [f32; 3],
    #[serde(default = "default_light_intensity")]
    pub intensity: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: default_light_position(),
            intensity: default_light_intensity(),
        }
    }
}

fn default_light_position() -> [f32; 3] {
    [20.0, 0.0, -20.0]
}
fn default_light_intensity() -> [f32; 3] {
    [500.0, 500.0, 500.0]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectConfig {
    /// OBJ file; takes precedence over `primitive`.
    #[serde(default)]
    pub path: Option<String>,
    /// Built-in mesh: "triangle" or "cube".
    #[serde(default)]
    pub primitive: Option<String>,

    // --- Transform ---
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_scaling")]
    pub scaling: [f32; 3],
    #[serde(default = "default_rotation_axis")]
    pub rotation_axis: [f32; 3],
    #[serde(default)]
    pub rotation_degrees: f32,

    // --- Pipeline ---
    #[serde(default = "default_fragment_shader")]
    pub fragment_shader: String, // "blinn_phong", "texture", "empty"
    #[serde(default = "default_cull_mode")]
    pub cull_mode: String, // "back", "front", "none"
    #[serde(default = "default_render_mode")]
    pub render_mode: String, // "default", "line_only"
    #[serde(default = "default_true")]
    pub z_test: bool,
    #[serde(default = "default_true")]
    pub z_write: bool,
}

impl Default for ObjectConfig {
    fn default() -> Self {
        Self {
            path: None,
            primitive: None,
            position: [0.0, 0.0, 0.0],
            scaling: default_scaling(),
            rotation_axis: default_rotation_axis(),
            rotation_degrees: 0.0,
            fragment_shader: default_fragment_shader(),
            cull_mode: default_cull_mode(),
            render_mode: default_render_mode(),
            z_test: true,
            z_write: true,
        }
    }
}

fn default_scaling() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}
fn default_rotation_axis() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}
fn default_fragment_shader() -> String {
    "blinn_phong".to_string()
}
fn default_cull_mode() -> String {
    "back".to_string()
}
fn default_render_mode() -> String {
    "default".to_string()
}
fn default_true() -> bool {
    true
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_reference_scene() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.render.width, 700);
        assert_eq!(config.camera.position, [0.0, 0.0, -15.0]);
        assert_eq!(config.lights.len(), 1);
        assert_eq!(config.lights[0].intensity, [500.0, 500.0, 500.0]);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::parse(
            r#"
            [render]
            width = 320
            fill = "scanline"

            [camera]
            fov = 60.0

            [[objects]]
            primitive = "triangle"
            position = [0.0, 0.0, 5.0]
            cull_mode = "none"
            "#,
        )
        .unwrap();

        assert_eq!(config.render.width, 320);
        assert_eq!(config.render.height, 700);
        assert_eq!(config.render.fill, "scanline");
        assert_eq!(config.camera.fov, 60.0);
        assert_eq!(config.camera.near, 1.0);
        assert_eq!(config.objects.len(), 1);
        assert_eq!(config.objects[0].primitive.as_deref(), Some("triangle"));
        assert_eq!(config.objects[0].scaling, [1.0, 1.0, 1.0]);
        assert!(config.objects[0].z_test);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(Config::parse("[render\nwidth = 1").is_err());
        assert!(Config::load("no/such/scene.toml").is_err());
    }
}
