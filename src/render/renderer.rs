use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use glam::Vec4;
use wgpu::CommandEncoderDescriptor;
use winit::window::Window;

use crate::{
    backend::{FrameOutcome, FrameView, SceneRenderer},
    config::RenderConfig,
    render::{
        common::RenderCommon,
        grid_pass::{GridPass, GridTextureViews},
        imgui_renderer::ImguiRendererState,
        instance::{Instance, InstanceBuffer},
        mesh::{MeshData, RenderMesh},
        pass::Pass,
        scene_pass::{ScenePass, SceneTextureViews},
        scene_uniform::SceneUniformData,
        texture::DepthTexture,
    },
    scene_graph::EntityId,
    viewport::Viewport,
};

/// A frame whose scene has been submitted but that still waits for the UI overlay.
struct PendingFrame {
    output: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

pub struct WgpuRenderer {
    pub window: Arc<Window>,
    pub size: Viewport,

    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: RenderCommon,
    depth_texture: DepthTexture,

    scene_pass: ScenePass,
    grid_pass: Option<GridPass>,
    imgui: ImguiRendererState,

    meshes: HashMap<EntityId, RenderMesh>,
    instances: InstanceBuffer,
    pending: Option<PendingFrame>,
}

impl WgpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        config: &RenderConfig,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<WgpuRenderer> {
        let size = Viewport::from(window.inner_size());

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No compatible GPU adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no texture formats")?;

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let common = RenderCommon::new(&device, surface_format, config.clear_color);
        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");

        let scene_pass = ScenePass::create(&device, &common)?;
        let grid_pass = if config.show_grid {
            let mut grid_pass = GridPass::create(&device, &common)?;
            grid_pass.rebuild_grid(&device, config.grid_size, config.grid_divisions);
            Some(grid_pass)
        } else {
            None
        };

        let imgui = ImguiRendererState::new(&device, &queue, surface_format, imgui_context);
        let instances = InstanceBuffer::new(&device);

        log::info!(
            "Renderer ready: {:?} ({}x{})",
            surface_format,
            size.width,
            size.height
        );

        Ok(Self {
            window,
            size,
            surface,
            surface_config,
            device,
            queue,
            common,
            depth_texture,
            scene_pass,
            grid_pass,
            imgui,
            meshes: HashMap::new(),
            instances,
            pending: None,
        })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.surface_config);
    }

    /// Creates GPU meshes for entities the renderer has not drawn before.
    fn sync_meshes(&mut self, frame: &FrameView<'_>) {
        for (id, entity) in frame.registry.iter() {
            let Some(shape) = entity.mesh_shape() else {
                continue;
            };

            self.meshes.entry(id).or_insert_with(|| {
                log::debug!("Creating mesh for {} #{}", entity.name, id.index());
                let name = format!("{} #{}", entity.name, id.index());
                RenderMesh::new(&self.device, &name, &MeshData::from_shape(shape))
            });
        }
    }

    /// Draws the UI overlay on top of the pending frame and presents it.
    /// Always closes the imgui frame, even when no scene was rendered.
    pub fn finish_frame(&mut self, imgui_context: &mut imgui::Context) -> anyhow::Result<()> {
        let draw_data = imgui_context.render();

        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        self.imgui.render(
            &pending.view,
            draw_data,
            &self.device,
            &self.queue,
            &mut encoder,
        )?;

        self.queue.submit([encoder.finish()]);
        pending.output.present();

        Ok(())
    }
}

impl SceneRenderer for WgpuRenderer {
    fn resize_target(&mut self, viewport: Viewport) {
        if viewport.is_degenerate() {
            return;
        }

        self.size = viewport;
        self.surface_config.width = viewport.width;
        self.surface_config.height = viewport.height;
        self.reconfigure();
        self.depth_texture.resize(&self.device, viewport);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> anyhow::Result<FrameOutcome> {
        if let Some(stale) = self.pending.take() {
            stale.output.present();
        }

        self.sync_meshes(frame);

        let mut draw_list = Vec::new();
        let mut instances = Vec::new();
        for (id, entity) in frame.registry.iter() {
            if !self.meshes.contains_key(&id) {
                continue;
            }

            let highlight = if frame.selected == Some(id) { 1.0 } else { 0.0 };
            instances.push(Instance {
                model: *entity.transform.get_local_matrix(),
                color: Vec4::from((entity.appearance.color(), highlight)),
            });
            draw_list.push(id);
        }

        self.instances.write(&self.device, &self.queue, &instances);
        self.common
            .scene_uniform
            .update(&self.queue, &SceneUniformData::from_frame(frame));

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
                return Ok(FrameOutcome::Skipped);
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context("Failed to acquire surface texture"));
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.scene_pass.render(
            &SceneTextureViews {
                color: view.clone(),
                depth: self.depth_texture.view().clone(),
            },
            &mut encoder,
            &self.common,
            |render_pass| {
                self.instances.bind(render_pass);
                for (index, id) in draw_list.iter().enumerate() {
                    if let Some(mesh) = self.meshes.get(id) {
                        mesh.draw(render_pass, index as u32);
                    }
                }
            },
        );

        if let Some(grid_pass) = &self.grid_pass {
            grid_pass.render(
                &GridTextureViews {
                    color: view.clone(),
                    depth: self.depth_texture.view().clone(),
                },
                &mut encoder,
                &self.common,
                |_| {},
            );
        }

        self.queue.submit([encoder.finish()]);
        self.pending = Some(PendingFrame { output, view });

        Ok(FrameOutcome::Drawn)
    }
}
