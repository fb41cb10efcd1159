use crate::chart::{bell_curve_points, percentile, GeometryError};
use crate::format::format_percent;
use crate::theme::{with_opacity, ColorRole, Palette};
use crate::ui::widgets::{
    draw_card, text_paint, LayoutContext, Reveal, Widget, WidgetGeometry,
};
use femtovg::{Align, Canvas, Paint, Path, renderer::Renderer};
use std::time::Duration;

const CURVE_POINTS: usize = 64;
const REVEAL_DURATION: Duration = Duration::from_millis(800);

/// Population distribution with a marker where the user's value lands.
pub struct BellCurve {
    pub label: String,
    pub value: f64,
    pub population: Vec<f64>,
    pub role: ColorRole,
    reveal: Reveal,
}

impl BellCurve {
    pub fn new(label: &str, value: f64, population: Vec<f64>, role: ColorRole) -> Self {
        Self {
            label: label.to_string(),
            value,
            population,
            role,
            reveal: Reveal::new(REVEAL_DURATION),
        }
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    /// Share of the population above the value, as a fraction.
    pub fn top_share(&self) -> Result<f64, GeometryError> {
        Ok(1.0 - percentile(self.value, &self.population)? / 100.0)
    }
}

impl Widget for BellCurve {
    fn render<R: Renderer>(&self, canvas: &mut Canvas<R>, rect: WidgetGeometry, palette: &Palette) {
        draw_card(canvas, rect, palette);
        let plot = rect.inset(14.0);
        let muted = palette.get(ColorRole::MutedForeground).to_femtovg();
        let foreground = palette.get(ColorRole::Foreground).to_femtovg();

        let label_paint = text_paint(muted, 15.0, Align::Left);
        let _ = canvas.fill_text(plot.x, plot.y + 8.0, &self.label, &label_paint);

        let curve_top = plot.y + 40.0;
        let curve_height = (plot.height - 64.0).max(0.0) * self.reveal.progress();
        let baseline = curve_top + (plot.height - 64.0).max(0.0);

        let points = bell_curve_points(CURVE_POINTS, plot.width as f64, curve_height as f64);
        let marker = percentile(self.value, &self.population);
        let (points, position) = match (points, marker) {
            (Ok(points), Ok(position)) => (points, position),
            (Err(e), _) | (_, Err(e)) => {
                crate::ui_log!(log::Level::Debug, "{}: {}", self.label, e);
                let placeholder = text_paint(muted, 24.0, Align::Center);
                let _ = canvas.fill_text(plot.center_x(), plot.center_y(), "--", &placeholder);
                return;
            }
        };

        let y_offset = baseline - curve_height;
        let mut outline = Path::new();
        let mut area = Path::new();
        area.move_to(plot.x, baseline);
        for (i, (x, y)) in points.iter().enumerate() {
            let px = plot.x + *x as f32;
            let py = y_offset + *y as f32;
            if i == 0 {
                outline.move_to(px, py);
            } else {
                outline.line_to(px, py);
            }
            area.line_to(px, py);
        }
        area.line_to(plot.x + plot.width, baseline);
        area.close();

        let base = palette.get(self.role);
        canvas.fill_path(&area, &Paint::color(with_opacity(base, 0.18).to_femtovg()));
        let mut outline_paint = Paint::color(base.to_femtovg());
        outline_paint.set_line_width(2.0);
        outline_paint.set_anti_alias(true);
        canvas.stroke_path(&outline, &outline_paint);

        // Marker at the value's percentile along the x-axis
        let marker_x = plot.x + plot.width * (position / 100.0) as f32;
        let mut marker_path = Path::new();
        marker_path.move_to(marker_x, curve_top);
        marker_path.line_to(marker_x, baseline);
        let mut marker_paint = Paint::color(foreground);
        marker_paint.set_line_width(2.0);
        canvas.stroke_path(&marker_path, &marker_paint);

        let mut dot = Path::new();
        dot.circle(marker_x, curve_top, 5.0);
        canvas.fill_path(&dot, &Paint::color(base.to_femtovg()));

        let top = format_percent(1.0 - position / 100.0);
        let summary = format!("{:.1}  ·  Top {}", self.value, top);
        let summary_paint = text_paint(foreground, 16.0, Align::Center);
        let _ = canvas.fill_text(plot.center_x(), baseline + 16.0, &summary, &summary_paint);
    }

    fn update(&mut self, dt: Duration) {
        self.reveal.advance(dt);
    }

    fn preferred_size(&self, ctx: &LayoutContext) -> WidgetGeometry {
        WidgetGeometry::new(0.0, 0.0, ctx.window_width * 0.5, 240.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_share_from_population() {
        let population = vec![30.0, 40.0, 45.0, 50.0];
        let curve = BellCurve::new("VO2 Max", 47.0, population, ColorRole::Vo2Max);
        assert_eq!(curve.top_share(), Ok(0.25));
    }

    #[test]
    fn empty_population_is_insufficient_data() {
        let curve = BellCurve::new("VO2 Max", 47.0, Vec::new(), ColorRole::Vo2Max);
        assert_eq!(curve.top_share(), Err(GeometryError::InsufficientData));
    }
}
