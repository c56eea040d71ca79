//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which owns the window, its GL
//! context and the event pump, and keeps the frame clock.

use std::sync::Arc;

use glow::HasContext;
use sdl2::{event::Event, event::WindowEvent, keyboard::Keycode};

use super::{DebugMessage, DiagnosticSink, FrameClock};
use crate::config::{RenderConfig, WindowConfig};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("SDL initialisation failed: {0}")]
    Sdl(String),
    #[error("window creation failed: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),
    #[error("GL context creation failed: {0}")]
    GlContext(String),
}

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
    clock: FrameClock,
    close_requested: bool,
    pending_resize: Option<(u32, u32)>,
}

impl App {
    /// Creates the window, makes its GL context current and applies the
    /// default render state. GL debug output is routed to `sink` when the
    /// driver supports it.
    pub fn new(
        window_config: &WindowConfig,
        render_config: &RenderConfig,
        sink: impl DiagnosticSink + 'static,
    ) -> Result<Self, ContextError> {
        let sdl = sdl2::init().map_err(ContextError::Sdl)?;
        let video_subsystem = sdl.video().map_err(ContextError::Sdl)?;

        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        let [major, minor] = window_config.gl_version;
        gl_attr.set_context_version(major, minor);
        gl_attr.set_depth_size(24);
        gl_attr.set_context_flags().debug().set();

        let mut builder = video_subsystem.window(
            &window_config.title,
            window_config.width,
            window_config.height,
        );
        builder.opengl().resizable();
        if window_config.hidden {
            builder.hidden();
        }
        let window = builder.build()?;

        let gl_context = window
            .gl_create_context()
            .map_err(ContextError::GlContext)?;
        window
            .gl_make_current(&gl_context)
            .map_err(ContextError::GlContext)?;

        let interval = if window_config.vsync {
            sdl2::video::SwapInterval::VSync
        } else {
            sdl2::video::SwapInterval::Immediate
        };
        if let Err(e) = video_subsystem.gl_set_swap_interval(interval) {
            log::warn!("Could not set swap interval: {e}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };

        unsafe {
            log::info!("OpenGL version: {}", gl.get_parameter_string(glow::VERSION));
            log::info!("Renderer: {}", gl.get_parameter_string(glow::RENDERER));
            log::info!("Vendor: {}", gl.get_parameter_string(glow::VENDOR));
            log::info!(
                "GLSL: {}",
                gl.get_parameter_string(glow::SHADING_LANGUAGE_VERSION)
            );

            if gl.supports_debug() {
                gl.enable(glow::DEBUG_OUTPUT);
                gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
                gl.debug_message_callback(move |source, kind, id, severity, text| {
                    sink.report(&DebugMessage {
                        source,
                        kind,
                        id,
                        severity,
                        text,
                    });
                });
                gl.debug_message_control(
                    glow::DONT_CARE,
                    glow::DONT_CARE,
                    glow::DONT_CARE,
                    &[],
                    true,
                );
            } else {
                log::warn!("GL debug output unavailable, driver errors will not be reported");
            }

            gl.enable(glow::CULL_FACE);
            gl.cull_face(glow::BACK);
            gl.front_face(glow::CCW);

            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LEQUAL);

            let [r, g, b, a] = render_config.clear_color;
            gl.clear_color(r, g, b, a);
        }

        let event_pump = sdl.event_pump().map_err(ContextError::Sdl)?;

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
            clock: FrameClock::new(),
            close_requested: false,
            pending_resize: None,
        })
    }

    /// Pumps window events and presents the frame drawn since the last tick.
    pub fn tick(&mut self) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => self.close_requested = true,
                Event::Window {
                    win_event: WindowEvent::Resized(..),
                    ..
                } => {
                    // pixels, which differ from window units on HiDPI displays
                    let (width, height) = self.window.drawable_size();
                    unsafe {
                        self.gl.viewport(0, 0, width as i32, height as i32);
                    }
                    self.pending_resize = Some((width, height));
                }
                _ => {}
            }
        }

        self.window.gl_swap_window();
    }

    /// Clears the colour and depth buffers.
    pub fn clear(&self) {
        unsafe {
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    /// Whether the user asked to close the window.
    pub fn should_close(&self) -> bool {
        self.close_requested
    }

    /// Makes [`App::should_close`] return `true` from now on.
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Seconds since the app started or since the last [`App::reset_time`].
    pub fn time(&self) -> f32 {
        self.clock.time()
    }

    pub fn reset_time(&mut self, value: f32) {
        self.clock.reset(value);
    }

    /// Returns the new drawable size in pixels if the window was resized since
    /// the last call.
    pub fn take_resize(&mut self) -> Option<(u32, u32)> {
        self.pending_resize.take()
    }

    /// Width over height of the window's drawable area.
    pub fn aspect_ratio(&self) -> f32 {
        let (width, height) = self.window.drawable_size();
        width as f32 / height.max(1) as f32
    }

    /// Destroys the window and shuts SDL down.
    pub fn term(self) {
        log::info!("Closing window '{}'", self.window.title());
    }
}
