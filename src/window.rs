use std::{sync::Arc, time::Instant};

use anyhow::Context;
use glam::Vec2;
use imgui::{FontConfig, FontSource};
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    config::SessionConfig,
    frame::FrameScheduler,
    render::renderer::WgpuRenderer,
    session::SceneSession,
    ui::EditorUi,
    viewport::Viewport,
};

// Pixel deltas from touchpads, expressed in wheel lines.
const PIXELS_PER_LINE: f32 = 50.0;

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
}

#[derive(Default)]
struct PointerState {
    dragging: bool,
    position: Option<Vec2>,
}

struct App {
    config: SessionConfig,
    session: SceneSession,
    editor: EditorUi,
    scheduler: FrameScheduler,
    renderer: Option<WgpuRenderer>,
    imgui: Option<ImguiState>,
    pointer: PointerState,
}

impl App {
    fn new(config: SessionConfig) -> Self {
        let mut session = SceneSession::new(&config);
        if config.editor.starter_scene {
            session.populate_starter_scene();
        }

        let mut editor = EditorUi::new(config.editor.console_capacity);
        editor.consume(session.drain_events());

        Self {
            config,
            session,
            editor,
            scheduler: FrameScheduler::new(),
            renderer: None,
            imgui: None,
            pointer: PointerState::default(),
        }
    }

    fn setup_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let font_size = 14.0;
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: font_size,
                ..Default::default()
            }),
        }]);

        // Disable INI support because it's broken in the published version of imgui
        context.set_ini_filename(None);

        ImguiState { context, platform }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to create window")?,
        );

        let mut imgui = Self::setup_imgui(&window);
        let mut renderer = pollster::block_on(WgpuRenderer::new(
            window.clone(),
            &self.config.render,
            &mut imgui.context,
        ))?;

        self.session
            .resize(Viewport::from(window.inner_size()), &mut renderer);
        self.scheduler.start(Instant::now());
        window.request_redraw();

        self.imgui = Some(imgui);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        let (Some(imgui), Some(renderer)) = (self.imgui.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };

        let Some(delta) = self.scheduler.advance(Instant::now()) else {
            return Ok(());
        };

        imgui.context.io_mut().update_delta_time(delta);
        imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
            .context("Failed to prepare Imgui frame")?;

        let ui = imgui.context.new_frame();
        let commands = self.editor.draw(ui);
        imgui.platform.prepare_render(ui, &renderer.window);

        for command in commands {
            self.session.apply(command);
        }

        let report = self.session.tick(delta, renderer);
        if let Some(fps) = report.fps {
            log::trace!("frame {} fps {fps}", self.scheduler.frame_index());
        }
        self.editor.consume(self.session.drain_events());

        renderer.finish_frame(&mut imgui.context)?;

        if self.scheduler.is_running() {
            renderer.window.request_redraw();
        }

        Ok(())
    }

    fn handle_pointer(&mut self, event: &WindowEvent) {
        let ui_wants_mouse = self
            .imgui
            .as_ref()
            .is_some_and(|imgui| imgui.context.io().want_capture_mouse);
        let viewport_height = self
            .session
            .viewport()
            .map_or(0.0, |viewport| viewport.height as f32);

        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.pointer.dragging = *state == ElementState::Pressed && !ui_wants_mouse;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                if let Some(previous) = self.pointer.position {
                    if self.pointer.dragging {
                        self.session
                            .controls_mut()
                            .rotate(position - previous, viewport_height);
                    }
                }
                self.pointer.position = Some(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer.position = None;
                self.pointer.dragging = false;
            }
            WindowEvent::MouseWheel { delta, .. } if !ui_wants_mouse => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                self.session.controls_mut().zoom(steps);
            }
            _ => (),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(err) = self.init(event_loop) {
            log::error!("Failed to start: {err:?}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                self.scheduler.stop();
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    self.session.resize(Viewport::from(*new_size), renderer);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    log::error!("Frame failed: {err:?}");
                    self.scheduler.stop();
                    event_loop.exit();
                }
            }
            _ => self.handle_pointer(&event),
        }

        if let (Some(imgui), Some(renderer)) = (self.imgui.as_mut(), self.renderer.as_ref()) {
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                &renderer.window,
                &Event::WindowEvent { window_id, event },
            );
        }
    }
}

pub async fn run(config: SessionConfig) -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
