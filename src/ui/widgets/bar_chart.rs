use crate::chart::{bar_heights, ChartSeries};
use crate::theme::{with_opacity, ColorRole, Palette};
use crate::ui::widgets::{
    draw_card, text_paint, LayoutContext, Reveal, Widget, WidgetGeometry,
};
use femtovg::{Align, Canvas, Paint, Path, renderer::Renderer};
use std::time::Duration;

const REVEAL_DURATION: Duration = Duration::from_millis(800);
const HEADER_HEIGHT: f32 = 36.0;
const FOOTER_HEIGHT: f32 = 22.0;
const BAR_GAP_RATIO: f32 = 0.35;

/// Vertical bars over an index axis: hourly heart rate, daily steps.
pub struct BarChart {
    pub label: String,
    pub series: ChartSeries,
    pub reference_max: Option<f64>,
    pub role: ColorRole,
    pub axis_labels: Vec<String>,
    // Last bar drawn at full strength, the rest faded
    pub highlight_last: bool,
    reveal: Reveal,
}

impl BarChart {
    pub fn new(label: &str, series: ChartSeries, role: ColorRole) -> Self {
        Self {
            label: label.to_string(),
            series,
            reference_max: None,
            role,
            axis_labels: Vec::new(),
            highlight_last: false,
            reveal: Reveal::new(REVEAL_DURATION),
        }
    }

    pub fn with_reference_max(mut self, reference_max: f64) -> Self {
        self.reference_max = Some(reference_max);
        self
    }

    pub fn with_axis_labels(mut self, labels: &[&str]) -> Self {
        self.axis_labels = labels.iter().map(|label| label.to_string()).collect();
        self
    }

    pub fn highlight_last(mut self) -> Self {
        self.highlight_last = true;
        self
    }

    pub fn set_series(&mut self, series: ChartSeries) {
        self.series = series;
    }
}

impl Widget for BarChart {
    fn render<R: Renderer>(&self, canvas: &mut Canvas<R>, rect: WidgetGeometry, palette: &Palette) {
        draw_card(canvas, rect, palette);
        let plot = rect.inset(14.0);
        let plot_top = plot.y + HEADER_HEIGHT;
        let plot_height = (plot.height - HEADER_HEIGHT - FOOTER_HEIGHT).max(0.0);
        let baseline = plot_top + plot_height;

        let muted = palette.get(ColorRole::MutedForeground).to_femtovg();
        let label_paint = text_paint(muted, 15.0, Align::Left);
        let _ = canvas.fill_text(plot.x, plot.y + 8.0, &self.label, &label_paint);

        // Grid line at half height
        let mut grid = Path::new();
        grid.move_to(plot.x, plot_top + plot_height / 2.0);
        grid.line_to(plot.x + plot.width, plot_top + plot_height / 2.0);
        let mut grid_paint = Paint::color(palette.get(ColorRole::ChartGrid).to_femtovg());
        grid_paint.set_line_width(1.0);
        canvas.stroke_path(&grid, &grid_paint);

        let heights = match bar_heights(&self.series, plot_height as f64, self.reference_max) {
            Ok(heights) => heights,
            Err(e) => {
                crate::ui_log!(log::Level::Debug, "{}: {}", self.label, e);
                let placeholder = text_paint(muted, 24.0, Align::Center);
                let middle = plot_top + plot_height / 2.0;
                let _ = canvas.fill_text(plot.center_x(), middle, "--", &placeholder);
                return;
            }
        };

        let count = heights.len() as f32;
        let slot = plot.width / count;
        let bar_width = slot * (1.0 - BAR_GAP_RATIO);
        let progress = self.reveal.progress();
        let base = palette.get(self.role);
        let faded = with_opacity(base, 0.45);

        for (i, height) in heights.iter().enumerate() {
            let height = *height as f32 * progress;
            let x = plot.x + slot * i as f32 + (slot - bar_width) / 2.0;
            let is_last = i + 1 == heights.len();
            let color = if self.highlight_last && !is_last { faded } else { base };

            if height > 0.0 {
                let mut bar = Path::new();
                let corner = (bar_width / 2.0).min(4.0);
                bar.rounded_rect(x, baseline - height, bar_width, height, corner);
                canvas.fill_path(&bar, &Paint::color(color.to_femtovg()));
            }

            if let Some(label) = self.axis_labels.get(i) {
                let axis_paint = text_paint(muted, 11.0, Align::Center);
                let (label_x, label_y) = (x + bar_width / 2.0, baseline + FOOTER_HEIGHT / 2.0);
                let _ = canvas.fill_text(label_x, label_y, label, &axis_paint);
            }
        }
    }

    fn update(&mut self, dt: Duration) {
        self.reveal.advance(dt);
    }

    fn preferred_size(&self, ctx: &LayoutContext) -> WidgetGeometry {
        WidgetGeometry::new(0.0, 0.0, ctx.window_width * 0.5, 220.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week() -> ChartSeries {
        ChartSeries::new(vec![4_000.0, 12_000.0, 8_000.0]).unwrap()
    }

    #[test]
    fn builders_configure_the_chart() {
        let chart = BarChart::new("Steps", week(), ColorRole::Movement)
            .with_reference_max(10_000.0)
            .with_axis_labels(&["M", "T", "W"])
            .highlight_last();
        assert_eq!(chart.reference_max, Some(10_000.0));
        assert_eq!(chart.axis_labels, vec!["M", "T", "W"]);
        assert!(chart.highlight_last);
    }

    #[test]
    fn reference_caps_bars_that_exceed_it() {
        let chart =
            BarChart::new("Steps", week(), ColorRole::Movement).with_reference_max(10_000.0);
        let heights = bar_heights(&chart.series, 100.0, chart.reference_max).unwrap();
        assert_eq!(heights, vec![40.0, 100.0, 80.0]);
    }

    #[test]
    fn set_series_replaces_data() {
        let mut chart = BarChart::new("Heart rate", week(), ColorRole::HeartRate);
        chart.set_series(ChartSeries::new(vec![60.0]).unwrap());
        assert_eq!(chart.series.samples(), &[60.0]);
    }
}
