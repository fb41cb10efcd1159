use crate::chart::{ring_fraction, ArcLayout, GeometryError};
use crate::theme::{score_gradient, ColorRole, Palette};
use crate::ui::widgets::{
    draw_card, text_paint, LayoutContext, Reveal, Widget, WidgetGeometry,
};
use femtovg::{Align, Canvas, LineCap, Paint, Path, Solidity, renderer::Renderer};
use std::time::Duration;

// Font sizes below are designed for this width and scaled with the widget.
const RING_DESIGN_REFERENCE_WIDTH: f32 = 200.0;
const REVEAL_DURATION: Duration = Duration::from_millis(800);

/// How the filled arc is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RingFill {
    Role(ColorRole),
    /// Hue follows the value as a 0-100 score.
    ScoreHue,
}

pub struct ProgressRingProps {
    pub label: String,
    pub unit: String,
    pub goal: f64,
    pub fill: RingFill,
    pub arc: ArcLayout,
    pub thickness_ratio: f32, // Stroke width as a fraction of the radius
    pub radius_ratio: f32,    // Fraction of the half-min-dimension used for the radius
    pub value_decimals: u8,
}

/// Circular progress indicator, e.g. steps toward a daily goal.
pub struct ProgressRing {
    pub props: ProgressRingProps,
    pub value: f64,
    // Shown next to the value instead of the raw number when set
    pub caption: Option<String>,
    reveal: Reveal,
}

impl ProgressRing {
    pub fn new(props: ProgressRingProps) -> Self {
        Self {
            props,
            value: 0.0,
            caption: None,
            reveal: Reveal::new(REVEAL_DURATION),
        }
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value;
    }

    pub fn set_caption(&mut self, caption: Option<String>) {
        self.caption = caption;
    }

    /// Filled part of the ring for the current frame, including the reveal animation.
    pub fn displayed_fraction(&self) -> Result<f64, GeometryError> {
        Ok(ring_fraction(self.value, self.props.goal)? * self.reveal.progress() as f64)
    }

    /// Gradient stops for the filled arc. Role fills use a flat color.
    fn fill_stops(&self, palette: &Palette) -> [femtovg::Color; 2] {
        match self.props.fill {
            RingFill::Role(role) => {
                let color = palette.get(role).to_femtovg();
                [color, color]
            }
            RingFill::ScoreHue => match score_gradient(self.value.round() as i32) {
                Ok([start, end]) => [start.to_femtovg(), end.to_femtovg()],
                Err(e) => {
                    crate::ui_log!(log::Level::Debug, "{}: {}, using primary", self.props.label, e);
                    let primary = palette.get(ColorRole::Primary).to_femtovg();
                    [primary, primary]
                }
            },
        }
    }
}

impl Widget for ProgressRing {
    fn render<R: Renderer>(&self, canvas: &mut Canvas<R>, rect: WidgetGeometry, palette: &Palette) {
        let props = &self.props;
        draw_card(canvas, rect, palette);

        let center_x = rect.center_x();
        let center_y = rect.center_y();
        let radius = rect.width.min(rect.height) * 0.5 * props.radius_ratio;
        let line_width = radius * props.thickness_ratio;
        let font_scale = rect.width / RING_DESIGN_REFERENCE_WIDTH;

        let start = props.arc.start_angle as f32;
        let end = props.arc.angle_at(1.0) as f32;

        // --- TRACK ---
        let mut track_path = Path::new();
        if (end - start).abs() >= std::f32::consts::TAU - 1e-4 {
            track_path.circle(center_x, center_y, radius);
        } else {
            let (a0, a1) = if props.arc.clockwise { (start, end) } else { (end, start) };
            track_path.arc(center_x, center_y, radius, a0, a1, Solidity::Hole);
        }
        let mut track_paint = Paint::color(palette.get(ColorRole::RingTrack).to_femtovg());
        track_paint.set_line_width(line_width);
        track_paint.set_line_cap(LineCap::Round);
        track_paint.set_anti_alias(true);
        canvas.stroke_path(&track_path, &track_paint);

        let foreground = palette.get(ColorRole::Foreground).to_femtovg();
        let muted = palette.get(ColorRole::MutedForeground).to_femtovg();

        // --- FILL ---
        let value_text = match self.displayed_fraction() {
            Ok(fraction) => {
                if fraction > 0.0 {
                    let fill_end = props.arc.angle_at(fraction) as f32;
                    let (a0, a1) =
                        if props.arc.clockwise { (start, fill_end) } else { (fill_end, start) };
                    let mut fill_path = Path::new();
                    fill_path.arc(center_x, center_y, radius, a0, a1, Solidity::Hole);
                    let [from, to] = self.fill_stops(palette);
                    let mut fill_paint = Paint::linear_gradient(
                        center_x - radius,
                        center_y + radius,
                        center_x + radius,
                        center_y - radius,
                        from,
                        to,
                    );
                    fill_paint.set_line_width(line_width);
                    fill_paint.set_line_cap(LineCap::Round);
                    fill_paint.set_anti_alias(true);
                    canvas.stroke_path(&fill_path, &fill_paint);
                }
                match &self.caption {
                    Some(caption) => caption.clone(),
                    None => format!("{:.*}", props.value_decimals as usize, self.value),
                }
            }
            Err(e) => {
                crate::ui_log!(log::Level::Debug, "{}: {}", props.label, e);
                "--".to_string()
            }
        };

        // --- TEXT ---
        let value_paint = text_paint(foreground, 30.0 * font_scale, Align::Center);
        let _ = canvas.fill_text(center_x, center_y - 6.0 * font_scale, &value_text, &value_paint);

        let unit_paint = text_paint(muted, 13.0 * font_scale, Align::Center);
        let _ = canvas.fill_text(center_x, center_y + 20.0 * font_scale, &props.unit, &unit_paint);

        let label_paint = text_paint(muted, 15.0 * font_scale, Align::Left);
        let label_y = rect.y + 18.0 * font_scale;
        let _ = canvas.fill_text(rect.x + 14.0, label_y, &props.label, &label_paint);
    }

    fn update(&mut self, dt: Duration) {
        self.reveal.advance(dt);
    }

    /// A third of the window across, and tall enough for the text at the design size.
    fn preferred_size(&self, ctx: &LayoutContext) -> WidgetGeometry {
        let height = (ctx.window_height * 0.36).max(RING_DESIGN_REFERENCE_WIDTH * 0.6);
        WidgetGeometry::new(0.0, 0.0, ctx.window_width / 3.0, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{resolve, score_color, ThemeMode};

    fn steps_ring(goal: f64) -> ProgressRing {
        ProgressRing::new(ProgressRingProps {
            label: "Steps".to_string(),
            unit: "steps".to_string(),
            goal,
            fill: RingFill::Role(ColorRole::Steps),
            arc: ArcLayout::full_ring(),
            thickness_ratio: 0.14,
            radius_ratio: 0.7,
            value_decimals: 0,
        })
    }

    #[test]
    fn reveal_scales_the_fraction() {
        let mut ring = steps_ring(10_000.0);
        ring.set_value(5_000.0);
        assert_eq!(ring.displayed_fraction(), Ok(0.0));
        ring.update(Duration::from_secs(2));
        assert_eq!(ring.displayed_fraction(), Ok(0.5));
    }

    #[test]
    fn preferred_height_tracks_the_window() {
        let ring = steps_ring(10_000.0);
        let small = LayoutContext { window_width: 600.0, window_height: 200.0 };
        let tall = LayoutContext { window_width: 600.0, window_height: 1_000.0 };
        assert_eq!(ring.preferred_size(&small).height, 120.0);
        assert!((ring.preferred_size(&tall).height - 360.0).abs() < 1e-3);
        assert_eq!(ring.preferred_size(&tall).width, 200.0);
    }

    #[test]
    fn invalid_goal_surfaces_as_error() {
        let mut ring = steps_ring(0.0);
        ring.set_value(10.0);
        assert_eq!(ring.displayed_fraction(), Err(GeometryError::InvalidGoal(0.0)));
    }

    #[test]
    fn score_fill_falls_back_to_primary_out_of_range() {
        let palette = resolve(ThemeMode::Dark);
        let mut ring = steps_ring(100.0);
        ring.props.fill = RingFill::ScoreHue;
        ring.set_value(140.0);
        let primary = palette.get(ColorRole::Primary).to_femtovg();
        assert_eq!(ring.fill_stops(&palette), [primary, primary]);
        ring.set_value(40.0);
        assert_eq!(ring.fill_stops(&palette)[0], score_color(40).unwrap().to_femtovg());
        ring.props.fill = RingFill::Role(ColorRole::Sleep);
        let sleep = palette.get(ColorRole::Sleep).to_femtovg();
        assert_eq!(ring.fill_stops(&palette), [sleep, sleep]);
    }
}
