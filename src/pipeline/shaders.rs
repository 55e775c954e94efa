pub mod basic;
pub mod blinn_phong;
pub mod texture;

use crate::core::pipeline::FragmentShader;
use basic::EmptyFragmentShader;
use blinn_phong::BlinnPhongFragmentShader;
use std::sync::Arc;
use texture::TextureFragmentShader;

/// Built-in fragment shaders selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderKind {
    #[default]
    BlinnPhong,
    Texture,
    Empty,
}

impl ShaderKind {
    /// Parses a configuration name ("blinn_phong", "texture", "empty").
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "blinn_phong" | "blinnphong" | "phong" => Some(Self::BlinnPhong),
            "texture" => Some(Self::Texture),
            "empty" | "none" => Some(Self::Empty),
            _ => None,
        }
    }

    pub fn build(self) -> Arc<dyn FragmentShader> {
        match self {
            Self::BlinnPhong => Arc::new(BlinnPhongFragmentShader),
            Self::Texture => Arc::new(TextureFragmentShader),
            Self::Empty => Arc::new(EmptyFragmentShader),
        }
    }
}
