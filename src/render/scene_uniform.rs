use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::backend::FrameView;
use crate::scene_graph::{rgb_hex, Appearance};

pub const MAX_POINT_LIGHTS: usize = 8;

const SKY_COLOR: u32 = 0xaaaaee;
const GROUND_COLOR: u32 = 0x222222;
const HEMISPHERE_INTENSITY: f32 = 0.6;
const SUN_COLOR: u32 = 0xffffff;
const SUN_INTENSITY: f32 = 0.8;
const SUN_POSITION: Vec3 = Vec3::new(5.0, 10.0, 7.0);

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
pub struct PointLightData {
    /// xyz position, w range
    pub position: [f32; 4],
    /// rgb color, w intensity
    pub color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniformData {
    pub view_proj: Mat4,
    pub eye: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    pub light_count: [u32; 4],
    pub point_lights: [PointLightData; MAX_POINT_LIGHTS],
}

impl SceneUniformData {
    pub fn from_frame(frame: &FrameView<'_>) -> Self {
        let mut point_lights = [PointLightData::default(); MAX_POINT_LIGHTS];
        let mut count = 0;

        for (_, entity) in frame.registry.iter() {
            let Appearance::PointLight {
                color,
                intensity,
                range,
            } = entity.appearance
            else {
                continue;
            };

            if count == MAX_POINT_LIGHTS {
                log::debug!("More than {MAX_POINT_LIGHTS} point lights, extras are not shaded");
                break;
            }

            point_lights[count] = PointLightData {
                position: entity.transform.translation().extend(range).to_array(),
                color: color.extend(intensity).to_array(),
            };
            count += 1;
        }

        Self {
            view_proj: frame.camera.view_projection(),
            eye: frame.camera.eye.extend(1.0).to_array(),
            sky_color: rgb_hex(SKY_COLOR).extend(HEMISPHERE_INTENSITY).to_array(),
            ground_color: rgb_hex(GROUND_COLOR).extend(0.0).to_array(),
            sun_direction: SUN_POSITION.normalize().extend(0.0).to_array(),
            sun_color: rgb_hex(SUN_COLOR).extend(SUN_INTENSITY).to_array(),
            light_count: [count as u32, 0, 0, 0],
            point_lights,
        }
    }
}

pub struct SceneUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl SceneUniform {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene uniform buffer"),
            contents: bytemuck::cast_slice(&[SceneUniformData::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, data: &SceneUniformData) {
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[*data]));
    }
}
