use crate::render::scene_uniform::SceneUniform;

/// Resources shared by every pass.
pub struct RenderCommon {
    pub output_format: wgpu::TextureFormat,
    pub scene_uniform: SceneUniform,
    pub clear_color: wgpu::Color,
}

impl RenderCommon {
    pub fn new(device: &wgpu::Device, output_format: wgpu::TextureFormat, clear_color: [f32; 3]) -> Self {
        let [r, g, b] = clear_color.map(|channel| srgb_to_linear(channel) as f64);

        Self {
            output_format,
            scene_uniform: SceneUniform::new(device),
            clear_color: wgpu::Color { r, g, b, a: 1.0 },
        }
    }
}

fn srgb_to_linear(channel: f32) -> f32 {
    channel.powf(2.2)
}
