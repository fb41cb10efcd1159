use crate::readings::{MockReadings, SharedDashboardState};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::sleep;

/// Nudge the live readings every 1-2 seconds.
pub async fn start_mock_readings(state: SharedDashboardState) {
    tokio::spawn(async move {
        let mut source = MockReadings::new();
        let mut rng = SmallRng::from_entropy();
        crate::readings_log!(log::Level::Info, "Mock readings started");
        loop {
            {
                let mut state = state.lock().await;
                state.apply(&mut source);
                crate::readings_log!(
                    log::Level::Trace,
                    "hr={} steps={}",
                    state.readings.heart_rate_bpm,
                    state.readings.steps
                );
            }
            sleep(Duration::from_millis(rng.gen_range(1_000..=2_000))).await;
        }
    });
}
