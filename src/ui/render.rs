use crate::chart::ArcLayout;
use crate::format::{format_delta, format_duration, format_thousands};
use crate::readings::{DashboardState, SharedDashboardState};
use crate::theme::{ColorRole, Palette, ThemeSnapshot};
use crate::ui::widgets::bar_chart::BarChart;
use crate::ui::widgets::bell_curve::BellCurve;
use crate::ui::widgets::progress_ring::{ProgressRing, ProgressRingProps, RingFill};
use crate::ui::widgets::{text_paint, LayoutContext, Widget, WidgetGeometry};
use femtovg::{Align, Canvas, renderer::Renderer};
use std::f64::consts::PI;
use std::sync::Arc;
use std::time::Duration;

const THEME_TRANSITION: Duration = Duration::from_millis(300);
const MARGIN: f32 = 20.0;

/// Palette blend in progress after a mode switch.
#[derive(Debug, Clone)]
pub struct ThemeTransition {
    pub from: Arc<Palette>,
    pub to: Arc<Palette>,
    pub elapsed: Duration,
}

impl ThemeTransition {
    pub fn progress(&self) -> f32 {
        (self.elapsed.as_secs_f32() / THEME_TRANSITION.as_secs_f32()).min(1.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= THEME_TRANSITION
    }
}

/// Render-side state: the widgets plus the palette the last frame was drawn with.
pub struct Dashboard {
    steps_ring: ProgressRing,
    recovery_ring: ProgressRing,
    sleep_ring: ProgressRing,
    heart_chart: BarChart,
    steps_chart: BarChart,
    vo2_curve: BellCurve,
    palette: Arc<Palette>,
    revision: u64,
    transition: Option<ThemeTransition>,
    // Survives frames where the state lock is busy
    theme_toggle_pending: bool,
    live_heart_rate: u32,
    heart_rate_delta: i64,
}

fn ring(label: &str, unit: &str, goal: f64, fill: RingFill, arc: ArcLayout) -> ProgressRing {
    ProgressRing::new(ProgressRingProps {
        label: label.to_string(),
        unit: unit.to_string(),
        goal,
        fill,
        arc,
        thickness_ratio: 0.14,
        radius_ratio: 0.62,
        value_decimals: 0,
    })
}

impl Dashboard {
    pub fn new(state: &DashboardState) -> Self {
        let snapshot = state.theme.snapshot();
        let readings = state.readings;
        let gauge_arc = ArcLayout {
            start_angle: 3.0 * PI / 4.0,
            end_angle: PI / 4.0,
            clockwise: true,
        };

        let step_goal = readings.step_goal as f64;
        let steps_fill = RingFill::Role(ColorRole::Steps);
        let sleep_fill = RingFill::Role(ColorRole::Sleep);
        let mut steps_ring = ring("Steps", "steps", step_goal, steps_fill, ArcLayout::full_ring());
        let mut recovery_ring = ring("Recovery", "%", 100.0, RingFill::ScoreHue, gauge_arc);
        let mut sleep_ring = ring("Sleep", "of 8h goal", 480.0, sleep_fill, ArcLayout::full_ring());
        steps_ring.set_value(readings.steps as f64);
        recovery_ring.set_value(readings.recovery_score as f64);
        sleep_ring.set_value(readings.sleep_minutes as f64);

        let hours: Vec<&str> = (0..24)
            .map(|hour| match hour {
                0 => "0",
                6 => "6",
                12 => "12",
                18 => "18",
                _ => "",
            })
            .collect();
        let heart_series = state.hourly_heart_rate.clone();
        let heart_chart = BarChart::new("Heart rate · 24h", heart_series, ColorRole::HeartRate)
            .with_axis_labels(&hours);
        let steps_series = state.weekly_steps.clone();
        let steps_chart = BarChart::new("Steps · 7 days", steps_series, ColorRole::Movement)
            .with_reference_max(step_goal * 1.25)
            .with_axis_labels(&["M", "T", "W", "T", "F", "S", "S"])
            .highlight_last();
        let population = state.vo2_population.clone();
        let vo2_curve = BellCurve::new("VO2 Max", readings.vo2_max, population, ColorRole::Vo2Max);

        Self {
            steps_ring,
            recovery_ring,
            sleep_ring,
            heart_chart,
            steps_chart,
            vo2_curve,
            palette: snapshot.palette,
            revision: snapshot.revision,
            transition: None,
            theme_toggle_pending: false,
            live_heart_rate: readings.heart_rate_bpm,
            heart_rate_delta: 0,
        }
    }

    /// Queue a mode switch for the next frame that gets the state lock.
    /// Two presses before that frame cancel out.
    pub fn request_theme_toggle(&mut self) {
        self.theme_toggle_pending = !self.theme_toggle_pending;
    }

    /// Apply a queued toggle and pick up state changes, if the lock is free.
    /// Returns `false` when the state was busy and nothing was read.
    pub fn poll_state(&mut self, state: &SharedDashboardState) -> bool {
        match state.try_lock() {
            Ok(mut state) => {
                if std::mem::take(&mut self.theme_toggle_pending) {
                    state.theme.toggle_mode();
                }
                self.sync(&state);
                true
            }
            Err(_) => {
                crate::ui_log!(log::Level::Trace, "State busy, drawing last known values");
                false
            }
        }
    }

    /// Pick up state changes. Called with the lock held, once per frame.
    pub fn sync(&mut self, state: &DashboardState) {
        self.observe_theme(state.theme.snapshot());

        let readings = state.readings;
        self.steps_ring.set_value(readings.steps as f64);
        self.steps_ring.set_caption(Some(format_thousands(readings.steps as u64)));
        self.recovery_ring.set_value(readings.recovery_score as f64);
        self.sleep_ring.set_value(readings.sleep_minutes as f64);
        self.sleep_ring.set_caption(Some(format_duration(readings.sleep_minutes)));
        self.vo2_curve.set_value(readings.vo2_max);
        self.steps_chart.set_series(state.weekly_steps.clone());
        if readings.heart_rate_bpm != self.live_heart_rate {
            self.heart_rate_delta = readings.heart_rate_bpm as i64 - self.live_heart_rate as i64;
            self.live_heart_rate = readings.heart_rate_bpm;
        }
    }

    /// Start a palette transition when a newer theme revision shows up.
    pub fn observe_theme(&mut self, snapshot: ThemeSnapshot) {
        if snapshot.revision == self.revision {
            return;
        }
        crate::ui_log!(
            log::Level::Debug,
            "Theme revision {} -> {} ({:?})",
            self.revision,
            snapshot.revision,
            snapshot.palette.mode()
        );
        let from = Arc::new(self.current_palette());
        self.transition = Some(ThemeTransition {
            from,
            to: Arc::clone(&snapshot.palette),
            elapsed: Duration::ZERO,
        });
        self.palette = snapshot.palette;
        self.revision = snapshot.revision;
    }

    /// Palette for this frame: the committed one, or the blend while transitioning.
    pub fn current_palette(&self) -> Palette {
        match &self.transition {
            Some(transition) => {
                Palette::interpolate(&transition.from, &transition.to, transition.progress())
            }
            None => (*self.palette).clone(),
        }
    }

    /// Header text for the live heart rate, e.g. `"74 bpm  +2"`.
    pub fn heart_rate_label(&self) -> String {
        format!("{} bpm  {}", self.live_heart_rate, format_delta(self.heart_rate_delta))
    }

    pub fn update(&mut self, dt: Duration) {
        if let Some(transition) = self.transition.as_mut() {
            transition.elapsed += dt;
            if transition.is_done() {
                self.transition = None;
            }
        }
        self.steps_ring.update(dt);
        self.recovery_ring.update(dt);
        self.sleep_ring.update(dt);
        self.heart_chart.update(dt);
        self.steps_chart.update(dt);
        self.vo2_curve.update(dt);
    }

    pub fn render<R: Renderer>(&self, canvas: &mut Canvas<R>) {
        let palette = self.current_palette();
        let width = canvas.width() as f32;
        let height = canvas.height() as f32;
        let ctx = LayoutContext { window_width: width, window_height: height };

        let background = palette.get(ColorRole::Background).to_femtovg();
        canvas.clear_rect(0, 0, canvas.width() as u32, canvas.height() as u32, background);

        let foreground = palette.get(ColorRole::Foreground).to_femtovg();
        let title_paint = text_paint(foreground, 28.0, Align::Left);
        let _ = canvas.fill_text(MARGIN, 36.0, "Today", &title_paint);
        let heart = palette.get(ColorRole::HeartRate).to_femtovg();
        let live_paint = text_paint(heart, 20.0, Align::Right);
        let _ = canvas.fill_text(width - MARGIN, 36.0, &self.heart_rate_label(), &live_paint);

        // Row of three rings
        let top = 64.0;
        let ring_width = (width - 4.0 * MARGIN) / 3.0;
        let ring_height = self.steps_ring.preferred_size(&ctx).height;
        let rings = [&self.steps_ring, &self.recovery_ring, &self.sleep_ring];
        for (i, ring) in rings.into_iter().enumerate() {
            let x = MARGIN + i as f32 * (ring_width + MARGIN);
            ring.render(canvas, WidgetGeometry::new(x, top, ring_width, ring_height), &palette);
        }

        // Charts below, two columns
        let row_top = top + ring_height + MARGIN;
        let column_width = (width - 3.0 * MARGIN) / 2.0;
        let min_chart_height = self.heart_chart.preferred_size(&ctx).height * 0.5;
        let chart_height = ((height - row_top - 2.0 * MARGIN) / 2.0).max(min_chart_height);
        let heart_rect = WidgetGeometry::new(MARGIN, row_top, column_width, chart_height);
        self.heart_chart.render(canvas, heart_rect, &palette);
        let steps_top = row_top + chart_height + MARGIN;
        let steps_rect = WidgetGeometry::new(MARGIN, steps_top, column_width, chart_height);
        self.steps_chart.render(canvas, steps_rect, &palette);
        let curve_x = 2.0 * MARGIN + column_width;
        let curve_height = 2.0 * chart_height + MARGIN;
        let curve_rect = WidgetGeometry::new(curve_x, row_top, column_width, curve_height);
        self.vo2_curve.render(canvas, curve_rect, &palette);

        canvas.flush();
    }
}

/// Draw one frame. Queued theme toggles are applied first, then a single
/// snapshot of the state feeds every widget.
pub fn render_ui<R: Renderer>(
    canvas: &mut Canvas<R>,
    dashboard: &mut Dashboard,
    state: &SharedDashboardState,
    dt: Duration,
) {
    dashboard.poll_state(state);
    dashboard.update(dt);
    dashboard.render(canvas);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{resolve, ThemeController, ThemeMode};
    use tokio::sync::Mutex;

    fn state(mode: ThemeMode) -> DashboardState {
        DashboardState::new(ThemeController::new(mode), 10_000).unwrap()
    }

    #[test]
    fn theme_switch_blends_then_settles() {
        let mut state = state(ThemeMode::Light);
        let mut dashboard = Dashboard::new(&state);
        assert_eq!(dashboard.current_palette(), resolve(ThemeMode::Light));

        state.theme.toggle_mode();
        dashboard.sync(&state);
        assert_eq!(dashboard.current_palette(), resolve(ThemeMode::Light));

        dashboard.update(THEME_TRANSITION / 2);
        let midway = dashboard.current_palette();
        assert_ne!(midway, resolve(ThemeMode::Light));
        assert_ne!(midway, resolve(ThemeMode::Dark));

        dashboard.update(THEME_TRANSITION);
        assert_eq!(dashboard.current_palette(), resolve(ThemeMode::Dark));
    }

    #[test]
    fn unchanged_revision_does_not_restart_transition() {
        let state = state(ThemeMode::Dark);
        let mut dashboard = Dashboard::new(&state);
        dashboard.sync(&state);
        assert!(dashboard.transition.is_none());
        assert_eq!(dashboard.current_palette(), resolve(ThemeMode::Dark));
    }

    #[test]
    fn busy_state_keeps_toggle_queued() {
        let shared = Arc::new(Mutex::new(state(ThemeMode::Light)));
        let mut dashboard = Dashboard::new(&shared.try_lock().unwrap());
        dashboard.request_theme_toggle();

        let guard = shared.try_lock().unwrap();
        assert!(!dashboard.poll_state(&shared));
        drop(guard);
        assert_eq!(shared.try_lock().unwrap().theme.mode(), ThemeMode::Light);

        assert!(dashboard.poll_state(&shared));
        assert_eq!(shared.try_lock().unwrap().theme.mode(), ThemeMode::Dark);
        assert!(dashboard.poll_state(&shared));
        assert_eq!(shared.try_lock().unwrap().theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn double_press_before_a_frame_cancels() {
        let shared = Arc::new(Mutex::new(state(ThemeMode::Dark)));
        let mut dashboard = Dashboard::new(&shared.try_lock().unwrap());
        dashboard.request_theme_toggle();
        dashboard.request_theme_toggle();
        assert!(dashboard.poll_state(&shared));
        assert_eq!(shared.try_lock().unwrap().theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn heart_rate_label_shows_change_since_last_reading() {
        let mut state = state(ThemeMode::Light);
        let mut dashboard = Dashboard::new(&state);
        assert_eq!(dashboard.heart_rate_label(), "72 bpm  0");

        state.readings.heart_rate_bpm = 70;
        dashboard.sync(&state);
        assert_eq!(dashboard.heart_rate_label(), "70 bpm  -2");
        // Unchanged readings keep the last delta
        dashboard.sync(&state);
        assert_eq!(dashboard.heart_rate_label(), "70 bpm  -2");
    }
}
