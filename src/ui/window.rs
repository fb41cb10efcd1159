use crate::logging::UI_NAMESPACE;
use femtovg::{renderer::OpenGl, Canvas};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextAttributesBuilder, PossiblyCurrentContext},
    display::GetGlDisplay,
    prelude::*,
    surface::{SurfaceAttributesBuilder, WindowSurface},
};
use glutin_winit::DisplayBuilder;
use log::{debug, info, warn};
use raw_window_handle::HasRawWindowHandle;
use std::ffi::CString;
use std::num::NonZeroU32;
use std::sync::Arc;
use thiserror::Error;
use winit::{
    dpi::PhysicalSize,
    event_loop::EventLoopWindowTarget,
    window::{Window, WindowBuilder},
};

const WINDOW_TITLE: &str = "Pulse";
const WINDOW_SIZE: (u32, u32) = (1024, 720);

const FONT_CANDIDATES: [&str; 8] = [
    "assets/fonts/Inter-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("failed to create display: {0}")]
    Display(String),

    #[error("display was created without a window")]
    NoWindow,

    #[error("failed to create GL context: {0}")]
    Context(glutin::error::Error),

    #[error("failed to create window surface: {0}")]
    Surface(glutin::error::Error),

    #[error("failed to make GL context current: {0}")]
    MakeCurrent(glutin::error::Error),

    #[error("failed to create renderer: {0:?}")]
    Renderer(femtovg::ErrorKind),

    #[error("window has zero size")]
    ZeroSize,
}

pub struct AppWindow {
    pub window: Arc<Window>,
    pub gl_config: glutin::config::Config,
}

impl AppWindow {
    pub fn new<T>(event_loop: &EventLoopWindowTarget<T>) -> Result<Self, WindowError> {
        let window_builder = WindowBuilder::new()
            .with_title(WINDOW_TITLE)
            .with_inner_size(PhysicalSize::new(WINDOW_SIZE.0, WINDOW_SIZE.1))
            .with_resizable(true);

        let template = ConfigTemplateBuilder::new()
            .with_alpha_size(8)
            .with_stencil_size(8)
            .with_transparency(false);

        debug!(target: UI_NAMESPACE, "Building display...");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                // Prefer the config with the most samples for smoother arcs
                configs
                    .reduce(|best, config| {
                        if config.num_samples() > best.num_samples() { config } else { best }
                    })
                    .expect("glutin always offers at least one config")
            })
            .map_err(|e| WindowError::Display(e.to_string()))?;

        let window = window.ok_or(WindowError::NoWindow)?;
        let size = window.inner_size();
        info!(target: UI_NAMESPACE, "Window created with size: {}x{}", size.width, size.height);

        Ok(Self {
            window: Arc::new(window),
            gl_config,
        })
    }
}

pub struct FemtovgContext {
    pub canvas: Canvas<OpenGl>,
    pub surface: glutin::surface::Surface<WindowSurface>,
    pub gl_context: PossiblyCurrentContext,
}

pub fn create_femtovg_context(app_window: &AppWindow) -> Result<FemtovgContext, WindowError> {
    let raw_window_handle = app_window.window.raw_window_handle();
    let display = app_window.gl_config.display();

    let gl_version = glutin::context::Version::new(3, 3);
    let context_attributes = ContextAttributesBuilder::new()
        .with_profile(glutin::context::GlProfile::Core)
        .with_context_api(glutin::context::ContextApi::OpenGl(Some(gl_version)))
        .build(Some(raw_window_handle));

    let not_current_context = unsafe {
        display
            .create_context(&app_window.gl_config, &context_attributes)
            .map_err(WindowError::Context)?
    };

    let size = app_window.window.inner_size();
    let width = NonZeroU32::new(size.width).ok_or(WindowError::ZeroSize)?;
    let height = NonZeroU32::new(size.height).ok_or(WindowError::ZeroSize)?;
    let attrs = SurfaceAttributesBuilder::<WindowSurface>::new()
        .with_srgb(Some(true))
        .build(raw_window_handle, width, height);

    let surface = unsafe {
        display
            .create_window_surface(&app_window.gl_config, &attrs)
            .map_err(WindowError::Surface)?
    };

    let gl_context = not_current_context
        .make_current(&surface)
        .map_err(WindowError::MakeCurrent)?;

    unsafe {
        gl::load_with(|s| match CString::new(s) {
            Ok(symbol) => display.get_proc_address(&symbol).cast(),
            Err(_) => std::ptr::null(),
        });
        gl::Viewport(0, 0, size.width as i32, size.height as i32);
    }

    let renderer = unsafe {
        OpenGl::new_from_function_cstr(|s| display.get_proc_address(s).cast())
            .map_err(WindowError::Renderer)?
    };

    let mut canvas = Canvas::new(renderer).map_err(WindowError::Renderer)?;
    canvas.set_size(size.width, size.height, app_window.window.scale_factor() as f32);

    let font_loaded = FONT_CANDIDATES.iter().any(|path| {
        std::fs::read(path)
            .ok()
            .map(|font_data| canvas.add_font_mem(&font_data).is_ok())
            .inspect(|loaded| {
                if *loaded {
                    info!(target: UI_NAMESPACE, "Loaded font from: {}", path);
                }
            })
            .unwrap_or(false)
    });
    if !font_loaded {
        warn!(target: UI_NAMESPACE, "No font could be loaded. Text will not render.");
    }

    Ok(FemtovgContext {
        canvas,
        surface,
        gl_context,
    })
}
