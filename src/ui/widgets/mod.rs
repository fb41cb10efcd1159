use crate::theme::{ColorRole, Palette};
use femtovg::{Align, Baseline, Canvas, Color, Paint, Path, renderer::Renderer};
use std::time::Duration;

pub mod bar_chart;
pub mod bell_curve;
pub mod progress_ring;

/// Defines the position and size of a widget
#[derive(Debug, Clone, Copy)]
pub struct WidgetGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WidgetGeometry {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink by `margin` on every side.
    pub fn inset(&self, margin: f32) -> Self {
        let margin = margin.min(self.width / 2.0).min(self.height / 2.0).max(0.0);
        Self::new(
            self.x + margin,
            self.y + margin,
            self.width - 2.0 * margin,
            self.height - 2.0 * margin,
        )
    }
}

/// Information about the current layout context
#[derive(Debug, Clone)]
pub struct LayoutContext {
    pub window_width: f32,
    pub window_height: f32,
}

/// Base trait for all dashboard widgets
pub trait Widget {
    /// Render the widget inside the given rectangle with the frame's palette.
    fn render<R: Renderer>(&self, canvas: &mut Canvas<R>, rect: WidgetGeometry, palette: &Palette);

    /// Called every frame to advance animations.
    fn update(&mut self, dt: Duration);

    /// Widgets can suggest their preferred size for layout.
    fn preferred_size(&self, ctx: &LayoutContext) -> WidgetGeometry;
}

/// Ease-out reveal from 0 to 1 over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Reveal {
    elapsed: f32,
    duration: f32,
}

impl Reveal {
    pub fn new(duration: Duration) -> Self {
        Self { elapsed: 0.0, duration: duration.as_secs_f32().max(f32::EPSILON) }
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt.as_secs_f32()).min(self.duration);
    }

    /// Eased progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        1.0 - (1.0 - t).powi(3)
    }
}

pub(crate) fn text_paint(color: Color, size: f32, align: Align) -> Paint {
    let mut paint = Paint::color(color);
    paint.set_font_size(size);
    paint.set_text_align(align);
    paint.set_text_baseline(Baseline::Middle);
    paint.set_anti_alias(true);
    paint
}

/// Rounded card behind each widget.
pub(crate) fn draw_card<R: Renderer>(
    canvas: &mut Canvas<R>,
    rect: WidgetGeometry,
    palette: &Palette,
) {
    let mut path = Path::new();
    path.rounded_rect(rect.x, rect.y, rect.width, rect.height, 16.0);
    canvas.fill_path(&path, &Paint::color(palette.get(ColorRole::CardBackground).to_femtovg()));
    let mut border = Paint::color(palette.get(ColorRole::Border).to_femtovg());
    border.set_line_width(1.0);
    canvas.stroke_path(&path, &border);
}
