mod render;
pub mod widgets;
mod window;

pub use window::WindowError;

use crate::logging::UI_NAMESPACE;
use crate::readings::SharedDashboardState;
use glutin::surface::GlSurface;
use log::{debug, info, warn};
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

/// Wake-ups sent to the event loop from other threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    ThemeChanged,
}

pub fn run_ui(
    event_loop: EventLoop<UiEvent>,
    state: SharedDashboardState,
) -> Result<(), WindowError> {
    info!(target: UI_NAMESPACE, "Creating application window...");
    let app_window = window::AppWindow::new(&event_loop)?;
    let mut femto_ctx = window::create_femtovg_context(&app_window)?;

    // Build the render state from one consistent view of the dashboard, and
    // redraw right away when another thread switches the theme
    let proxy = event_loop.create_proxy();
    let (mut dashboard, subscription) = {
        let mut state = state.blocking_lock();
        let subscription = state.theme.subscribe(Box::new(move |_, _| {
            let _ = proxy.send_event(UiEvent::ThemeChanged);
        }));
        (render::Dashboard::new(&state), subscription)
    };

    let mut last_frame = Instant::now();
    let frame_interval = Duration::from_millis(16); // ~60 FPS

    info!(target: UI_NAMESPACE, "Starting event loop...");
    event_loop.run(move |event, _, control_flow| {
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!(target: UI_NAMESPACE, "Window close requested");
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    debug!(target: UI_NAMESPACE, "Window resized: {}x{}", size.width, size.height);
                    let width = NonZeroU32::new(size.width);
                    let height = NonZeroU32::new(size.height);
                    if let (Some(width), Some(height)) = (width, height) {
                        femto_ctx.surface.resize(&femto_ctx.gl_context, width, height);
                        let scale = app_window.window.scale_factor() as f32;
                        femto_ctx.canvas.set_size(width.get(), height.get(), scale);
                    }
                    app_window.window.request_redraw();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match key {
                    VirtualKeyCode::T => {
                        debug!(target: UI_NAMESPACE, "Theme toggle requested");
                        dashboard.request_theme_toggle();
                        app_window.window.request_redraw();
                    }
                    VirtualKeyCode::Escape => *control_flow = ControlFlow::Exit,
                    _ => (),
                },
                _ => (),
            },
            Event::UserEvent(UiEvent::ThemeChanged) => {
                app_window.window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame);
                if dt >= frame_interval {
                    render::render_ui(&mut femto_ctx.canvas, &mut dashboard, &state, dt);

                    if let Err(e) = femto_ctx.surface.swap_buffers(&femto_ctx.gl_context) {
                        warn!(target: UI_NAMESPACE, "Failed to swap buffers: {:?}", e);
                    }

                    last_frame = now;
                }

                *control_flow = ControlFlow::WaitUntil(last_frame + frame_interval);
            }
            Event::MainEventsCleared => {
                if Instant::now().duration_since(last_frame) >= frame_interval {
                    app_window.window.request_redraw();
                }
            }
            Event::LoopDestroyed => {
                state.blocking_lock().theme.unsubscribe(subscription);
                info!(target: UI_NAMESPACE, "Event loop stopped");
            }
            _ => (),
        }
    });
}
