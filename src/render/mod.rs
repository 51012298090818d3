pub mod common;
pub mod grid_pass;
pub mod imgui_renderer;
pub mod instance;
pub mod mesh;
pub mod pass;
pub mod renderer;
pub mod scene_pass;
pub mod scene_uniform;
pub mod texture;

pub use renderer::WgpuRenderer;
