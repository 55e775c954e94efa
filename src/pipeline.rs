pub mod passes;
pub mod renderer;
pub mod service;
pub mod shaders;
