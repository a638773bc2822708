//! Simulation builder and window host.
//!
//! ```ignore
//! Simulation::new()
//!     .with_config(FieldConfig::default().with_pointer_radius(200.0))
//!     .with_style(Style::default().with_glow(6.0))
//!     .with_title("Particles")
//!     .run()?;
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::{FieldConfig, Style};
use crate::error::SimulationError;
use crate::field::ParticleField;
use crate::gpu::GpuSurface;
use crate::input::pointer_transition;
use crate::scheduler::{EventSink, FieldEvent, FrameScheduler, FrameStatus, StopToken};

/// A particle field window builder.
///
/// Use method chaining to configure, then call `.run()` to start.
pub struct Simulation {
    config: FieldConfig,
    style: Style,
    title: String,
    window_size: (u32, u32),
    stop: StopToken,
}

impl Simulation {
    /// Create a new simulation with default settings.
    pub fn new() -> Self {
        Self {
            config: FieldConfig::default(),
            style: Style::default(),
            title: "Ambient Particles".to_string(),
            window_size: (1280, 720),
            stop: StopToken::new(),
        }
    }

    pub fn with_config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Token that closes the window when cancelled, from any thread.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Run the simulation. This blocks until the window is closed.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;
        self.style.validate()?;

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything that only exists once the window does.
struct Running {
    window: Arc<Window>,
    surface: GpuSurface,
    scheduler: FrameScheduler,
    sink: EventSink,
}

struct App {
    settings: Simulation,
    running: Option<Running>,
    failure: Option<SimulationError>,
}

impl App {
    fn new(settings: Simulation) -> Self {
        Self {
            settings,
            running: None,
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<Running, SimulationError> {
        let (width, height) = self.settings.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let surface = pollster::block_on(GpuSurface::new(
            window.clone(),
            self.settings.style.background,
        ))?;

        let size = window.inner_size();
        info!(width = size.width, height = size.height, "window created");

        let field = ParticleField::new(
            self.settings.config.clone(),
            self.settings.style,
            size.width,
            size.height,
        )?;
        let scheduler = FrameScheduler::with_stop_token(field, self.settings.stop.clone());
        let sink = scheduler.sink();

        Ok(Running {
            window,
            surface,
            scheduler,
            sink,
        })
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        match self.start(event_loop) {
            Ok(running) => {
                running.window.request_redraw();
                self.running = Some(running);
            }
            Err(err) => {
                error!(error = %err, "failed to start simulation");
                self.failure = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(running) = &mut self.running else {
            return;
        };

        if let Some(pointer) = pointer_transition(&event) {
            running.sink.send(pointer.into());
            return;
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.settings.stop.cancel();
                running.window.request_redraw();
            }
            WindowEvent::Resized(physical_size) => {
                running.sink.send(FieldEvent::Resized {
                    width: physical_size.width,
                    height: physical_size.height,
                });
            }
            WindowEvent::RedrawRequested => {
                if running.scheduler.frame(&mut running.surface) == FrameStatus::Stopped {
                    info!(frames = running.scheduler.frames(), "frame loop stopped");
                    event_loop.exit();
                    return;
                }

                match running.surface.present() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        warn!("surface lost, reconfiguring");
                        running.surface.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        self.settings.stop.cancel();
                    }
                    Err(e) => warn!(error = ?e, "render error"),
                }

                running.window.request_redraw();
            }
            _ => {}
        }
    }
}
