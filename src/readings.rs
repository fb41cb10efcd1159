use crate::chart::{ChartSeries, GeometryError};
use crate::theme::ThemeController;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const HEART_RATE_RANGE: (u32, u32) = (55, 110);

/// Values shown as "live" on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveReadings {
    pub heart_rate_bpm: u32,
    pub steps: u32,
    pub step_goal: u32,
    /// 0..=100
    pub recovery_score: i32,
    pub sleep_minutes: u32,
    pub vo2_max: f64,
}

impl Default for LiveReadings {
    fn default() -> Self {
        Self {
            heart_rate_bpm: 72,
            steps: 6_842,
            step_goal: 10_000,
            recovery_score: 68,
            sleep_minutes: 452,
            vo2_max: 47.3,
        }
    }
}

/// Where the next reading comes from. Swappable so tests stay deterministic.
pub trait ReadingSource: Send {
    fn next_reading(&mut self, current: &LiveReadings) -> LiveReadings;
}

/// Always hands back the same reading.
#[derive(Debug, Clone)]
pub struct FixedReadings(pub LiveReadings);

impl ReadingSource for FixedReadings {
    fn next_reading(&mut self, _current: &LiveReadings) -> LiveReadings {
        self.0
    }
}

/// Random walk around the current values, like a wrist sensor ticking over.
pub struct MockReadings {
    rng: SmallRng,
}

impl MockReadings {
    pub fn new() -> Self {
        Self { rng: SmallRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: SmallRng::seed_from_u64(seed) }
    }
}

impl Default for MockReadings {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadingSource for MockReadings {
    fn next_reading(&mut self, current: &LiveReadings) -> LiveReadings {
        let (low, high) = HEART_RATE_RANGE;
        let nudge: i64 = self.rng.gen_range(-2..=2);
        let heart_rate =
            (current.heart_rate_bpm as i64 + nudge).clamp(low as i64, high as i64) as u32;
        let steps = current.steps.saturating_add(self.rng.gen_range(0..=12));
        LiveReadings {
            heart_rate_bpm: heart_rate,
            steps,
            ..*current
        }
    }
}

/// Everything the dashboard renders from, behind one lock.
pub struct DashboardState {
    pub theme: ThemeController,
    pub readings: LiveReadings,
    pub hourly_heart_rate: ChartSeries,
    pub weekly_steps: ChartSeries,
    /// Reference VO2 max values for the population curve.
    pub vo2_population: Vec<f64>,
}

impl DashboardState {
    pub fn new(theme: ThemeController, step_goal: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            theme,
            readings: LiveReadings { step_goal, ..LiveReadings::default() },
            hourly_heart_rate: ChartSeries::new(vec![
                58.0, 56.0, 55.0, 55.0, 57.0, 60.0, 68.0, 82.0, 95.0, 88.0, 76.0, 74.0,
                79.0, 72.0, 70.0, 73.0, 118.0, 132.0, 104.0, 86.0, 78.0, 70.0, 64.0, 60.0,
            ])?,
            weekly_steps: ChartSeries::new(vec![
                8_421.0, 11_203.0, 6_534.0, 9_876.0, 12_450.0, 4_210.0, 6_842.0,
            ])?,
            vo2_population: vec![
                31.0, 33.5, 35.0, 36.2, 37.8, 38.5, 39.1, 40.0, 40.8, 41.5, 42.2, 43.0,
                43.6, 44.1, 45.0, 46.2, 47.0, 48.5, 50.1, 52.3,
            ],
        })
    }

    /// Advance the live readings. Today's bar in the weekly chart follows the step count.
    pub fn apply(&mut self, source: &mut dyn ReadingSource) {
        self.readings = source.next_reading(&self.readings);
        let mut week = self.weekly_steps.samples().to_vec();
        if let Some(today) = week.last_mut() {
            *today = self.readings.steps as f64;
        }
        if let Ok(series) = ChartSeries::new(week) {
            self.weekly_steps = series;
        }
    }
}

pub type SharedDashboardState = Arc<Mutex<DashboardState>>;

#[cfg(feature = "mock_readings")]
pub mod mock;

#[cfg(feature = "mock_readings")]
pub async fn maybe_start_mock_readings(state: SharedDashboardState) {
    mock::start_mock_readings(state).await;
}

#[cfg(not(feature = "mock_readings"))]
pub async fn maybe_start_mock_readings(_state: SharedDashboardState) {
    // Static readings only
}
