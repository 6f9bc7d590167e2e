//! Interactive viewer.
//!
//! | Input | Action |
//! |-------|--------|
//! | Space, Enter, right click | Toggle scattered / formed |
//! | Left drag | Orbit |
//! | Mouse wheel | Zoom |
//! | P | Pause animation |
//! | Escape | Quit |

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::color::PaletteConfig;
use crate::config::MorphConfig;
use crate::error::RunError;
use crate::gpu::GpuState;
use crate::morph::MorphController;
use crate::time::Time;

const WINDOW_TITLE: &str = "Shardmorph";

/// Open a window and run the morph until it is closed.
///
/// With `seed` set the particle table is reproducible between runs.
pub fn run(config: MorphConfig, seed: Option<u64>) -> Result<(), RunError> {
    let palette = config.palette.clone();
    let morph = match seed {
        Some(seed) => MorphController::with_seed(config, seed)?,
        None => MorphController::new(config)?,
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(morph, palette);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    morph: MorphController,
    palette: PaletteConfig,
    time: Time,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    /// First fatal error; reported once the event loop has stopped.
    error: Option<RunError>,
}

impl App {
    fn new(morph: MorphController, palette: PaletteConfig) -> Self {
        Self {
            window: None,
            gpu_state: None,
            morph,
            palette,
            time: Time::new(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn title(&self) -> String {
        let mode = self.morph.mode();
        let paused = if self.time.is_paused() { " [paused]" } else { "" };
        format!(
            "{} - [{}] {}{}",
            WINDOW_TITLE,
            mode.action_label(),
            mode.status_label(),
            paused
        )
    }

    fn refresh_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.title());
        }
    }

    fn toggle(&mut self) {
        self.morph.toggle_mode();
        log::info!("{}", self.morph.mode().status_label());
        self.refresh_title();
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RunError) {
        log::error!("{}", error);
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        match event.physical_key {
            PhysicalKey::Code(KeyCode::Space | KeyCode::Enter) => self.toggle(),
            PhysicalKey::Code(KeyCode::KeyP) => {
                self.time.toggle_pause();
                self.refresh_title();
            }
            PhysicalKey::Code(KeyCode::Escape) => event_loop.exit(),
            _ => {}
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (elapsed, delta) = self.time.update();
        self.morph.frame(elapsed, delta);

        if let Some(gpu_state) = &mut self.gpu_state {
            gpu_state.camera.update(delta);
            gpu_state.upload_transforms(self.morph.instance_transforms());

            match gpu_state.render() {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu_state.resize(winit::dpi::PhysicalSize {
                        width: gpu_state.config.width,
                        height: gpu_state.config.height,
                    })
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("render error: {:?}", e),
            }
        }

        if self.time.frame() % 600 == 0 {
            log::debug!(
                "{:.1} fps, progress {:.3}",
                self.time.fps(),
                self.morph.progress()
            );
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        let gpu_state = pollster::block_on(GpuState::new(
            window,
            self.morph.instance_transforms(),
            self.morph.instance_colors(),
            &self.palette,
        ));

        match gpu_state {
            Ok(state) => self.gpu_state = Some(state),
            Err(e) => self.fail(event_loop, e.into()),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, event),
            WindowEvent::MouseInput { state, button, .. } => match button {
                MouseButton::Left => {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
                MouseButton::Right if state == ElementState::Pressed => self.toggle(),
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;

                        if let Some(gpu_state) = &mut self.gpu_state {
                            gpu_state.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
