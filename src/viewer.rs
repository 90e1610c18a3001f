//! Live window for watching an animation draw itself.
//!
//! Every `RedrawRequested` event is one frame slot: the animation ticks onto
//! the raster [`Canvas`], the canvas is uploaded to the GPU and presented,
//! and another redraw is requested while the animation is still running.
//! Closing the window cancels the run.

use std::sync::Arc;

use tracing::{info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::animation::{Animation, AnimationState, RunSummary};
use crate::error::ViewerError;
use crate::gpu::Presenter;
use crate::raster::Canvas;

const WINDOW_TITLE: &str = "Pendulograph";

struct Viewer {
    animation: Animation,
    canvas: Canvas,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    failure: Option<ViewerError>,
    closed_early: bool,
}

impl Viewer {
    fn new(animation: Animation) -> Self {
        let (width, height) = animation.environment().geometry.pixel_size();
        let canvas = Canvas::new(width, height);
        Self {
            animation,
            canvas,
            window: None,
            presenter: None,
            failure: None,
            closed_early: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        self.failure = Some(error);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let (width, height) = self.canvas.dimensions();
        let window_attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(960, 960));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let presenter = pollster::block_on(Presenter::new(window.clone(), width, height))?;

        self.animation.start(&mut self.canvas);
        presenter.upload(self.canvas.image());

        window.request_redraw();
        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(presenter) = &mut self.presenter else {
            return;
        };

        let state = match self.animation.tick(&mut self.canvas) {
            Ok(state) => state,
            Err(e) => {
                self.failure = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        presenter.upload(self.canvas.image());

        match presenter.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = winit::dpi::PhysicalSize::new(presenter.config.width, presenter.config.height);
                presenter.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                event_loop.exit();
                return;
            }
            Err(e) => warn!(error = ?e, "render error"),
        }

        if let Some(window) = &self.window {
            let elapsed = self.animation.frame().elapsed;
            match state {
                AnimationState::Finished => {
                    window.set_title(&format!("{WINDOW_TITLE} (done, t = {elapsed:.2})"));
                }
                _ => {
                    window.set_title(&format!("{WINDOW_TITLE} (t = {elapsed:.2})"));
                    window.request_redraw();
                }
            }
        }
    }
}

impl ApplicationHandler for Viewer {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.closed_early = self.animation.state() != AnimationState::Finished;
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open a window and draw `animation` into it until the time horizon is
/// reached and the window is closed, or until the window is closed early.
pub fn run(animation: Animation) -> Result<RunSummary, ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut viewer = Viewer::new(animation);
    event_loop.run_app(&mut viewer)?;

    if let Some(e) = viewer.failure {
        return Err(e);
    }

    let summary = viewer.animation.summary(viewer.closed_early);
    info!(
        frames = summary.frames,
        elapsed = summary.elapsed,
        cancelled = summary.cancelled,
        "viewer closed"
    );
    Ok(summary)
}
