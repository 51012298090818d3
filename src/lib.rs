pub mod backend;
pub mod camera;
pub mod config;
pub mod frame;
pub mod render;
pub mod scene_graph;
pub mod session;
pub mod ui;
pub mod viewport;
pub mod window;
