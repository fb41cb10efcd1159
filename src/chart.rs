//! Geometry for the dashboard charts.
//!
//! Everything here is a pure function of its inputs. Out-of-domain input
//! (non-positive goals, empty data, NaN) is rejected with a [`GeometryError`]
//! so it can never reach the canvas as garbage coordinates.

use std::f64::consts::PI;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("goal must be positive, got {0}")]
    InvalidGoal(f64),

    #[error("percentile needs at least one reference sample")]
    InsufficientData,

    #[error("chart series is empty")]
    EmptySeries,

    #[error("{name} is not a finite number")]
    NonFinite { name: &'static str },

    #[error("sample {index} is negative ({value})")]
    NegativeSample { index: usize, value: f64 },

    #[error("max height must be non-negative, got {0}")]
    InvalidHeight(f64),

    #[error("reference max must be positive, got {0}")]
    InvalidReference(f64),

    #[error("x must lie in [0, 1], got {0}")]
    OutOfUnitRange(f64),

    #[error("a curve needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

fn finite(name: &'static str, value: f64) -> Result<f64, GeometryError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(GeometryError::NonFinite { name })
    }
}

/// Ordered samples with an implicit index x-axis. Never empty, never NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    samples: Vec<f64>,
}

impl ChartSeries {
    pub fn new(samples: Vec<f64>) -> Result<Self, GeometryError> {
        if samples.is_empty() {
            return Err(GeometryError::EmptySeries);
        }
        for sample in &samples {
            finite("sample", *sample)?;
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn max(&self) -> f64 {
        self.samples.iter().copied().fold(f64::MIN, f64::max)
    }
}

impl TryFrom<&[f64]> for ChartSeries {
    type Error = GeometryError;

    fn try_from(samples: &[f64]) -> Result<Self, Self::Error> {
        ChartSeries::new(samples.to_vec())
    }
}

/// Filled share of a progress ring: `min(value / goal, 1)`, floored at 0.
pub fn ring_fraction(value: f64, goal: f64) -> Result<f64, GeometryError> {
    let goal = finite("goal", goal)?;
    let value = finite("value", value)?;
    if goal <= 0.0 {
        return Err(GeometryError::InvalidGoal(goal));
    }
    Ok((value / goal).clamp(0.0, 1.0))
}

/// Scale every sample linearly into `[0, max_height]`.
///
/// The denominator is `reference_max` when given, otherwise the largest
/// sample. Samples above a supplied reference are capped at `max_height`.
/// A series of zeros maps to zero-height bars.
pub fn bar_heights(
    series: &ChartSeries,
    max_height: f64,
    reference_max: Option<f64>,
) -> Result<Vec<f64>, GeometryError> {
    let max_height = finite("max_height", max_height)?;
    if max_height < 0.0 {
        return Err(GeometryError::InvalidHeight(max_height));
    }
    if let Some((index, &value)) = series.samples().iter().enumerate().find(|(_, v)| **v < 0.0) {
        return Err(GeometryError::NegativeSample { index, value });
    }

    let denominator = match reference_max {
        Some(reference) => {
            let reference = finite("reference_max", reference)?;
            if reference <= 0.0 {
                return Err(GeometryError::InvalidReference(reference));
            }
            reference
        }
        None => series.max(),
    };

    if denominator == 0.0 {
        return Ok(vec![0.0; series.len()]);
    }

    Ok(series
        .samples()
        .iter()
        // Ratio capped before scaling so a huge sample over a tiny reference stays finite
        .map(|sample| ((sample / denominator).min(1.0) * max_height).clamp(0.0, max_height))
        .collect())
}

/// Decorative population curve, peaking at 1.0 for `x = 0.5`.
pub fn bell_curve_y(x: f64) -> Result<f64, GeometryError> {
    let x = finite("x", x)?;
    if !(0.0..=1.0).contains(&x) {
        return Err(GeometryError::OutOfUnitRange(x));
    }
    let z = (x - 0.5) * 4.0;
    Ok((-(z * z) / 2.0).exp())
}

/// `count` evenly spaced points of the bell curve laid into a `width` x
/// `height` box with y growing downward (peak at y = 0).
pub fn bell_curve_points(
    count: usize,
    width: f64,
    height: f64,
) -> Result<Vec<(f64, f64)>, GeometryError> {
    if count < 2 {
        return Err(GeometryError::TooFewPoints(count));
    }
    let width = finite("width", width)?;
    let height = finite("height", height)?;
    let last = (count - 1) as f64;
    (0..count)
        .map(|i| {
            let x = i as f64 / last;
            bell_curve_y(x).map(|y| (x * width, (1.0 - y) * height))
        })
        .collect()
}

/// Share of `samples` strictly below `value`, in percent.
pub fn percentile(value: f64, samples: &[f64]) -> Result<f64, GeometryError> {
    if samples.is_empty() {
        return Err(GeometryError::InsufficientData);
    }
    let value = finite("value", value)?;
    let mut below = 0usize;
    for sample in samples {
        if finite("sample", *sample)? < value {
            below += 1;
        }
    }
    Ok(below as f64 * 100.0 / samples.len() as f64)
}

/// Angular layout of a circular gauge.
///
/// Angles are radians, 0 at 3 o'clock. With a y-down canvas, a positive
/// angle moves clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcLayout {
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

impl ArcLayout {
    /// Full ring starting at 12 o'clock.
    pub fn full_ring() -> Self {
        Self {
            start_angle: -PI / 2.0,
            end_angle: -PI / 2.0,
            clockwise: true,
        }
    }

    /// Signed sweep from start to end: positive when progressing clockwise,
    /// negative counter-clockwise. Equal angles sweep a whole turn.
    pub fn sweep(&self) -> f64 {
        let mut sweep = self.end_angle - self.start_angle;
        if self.clockwise {
            if sweep <= 0.0 {
                sweep += 2.0 * PI;
            }
        } else if sweep >= 0.0 {
            sweep -= 2.0 * PI;
        }
        sweep
    }

    /// Angle reached after filling `fraction` (clamped to `[0, 1]`) of the sweep.
    pub fn angle_at(&self, fraction: f64) -> f64 {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.start_angle + fraction * self.sweep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn series(samples: &[f64]) -> ChartSeries {
        ChartSeries::try_from(samples).unwrap()
    }

    #[test]
    fn ring_fraction_boundaries() {
        assert_eq!(ring_fraction(0.0, 100.0), Ok(0.0));
        assert_eq!(ring_fraction(100.0, 100.0), Ok(1.0));
        assert_eq!(ring_fraction(150.0, 100.0), Ok(1.0));
        assert_eq!(ring_fraction(50.0, 100.0), Ok(0.5));
        assert_eq!(ring_fraction(-20.0, 100.0), Ok(0.0));
    }

    #[test]
    fn ring_fraction_rejects_non_positive_goal() {
        assert_eq!(ring_fraction(10.0, 0.0), Err(GeometryError::InvalidGoal(0.0)));
        assert_eq!(ring_fraction(10.0, -5.0), Err(GeometryError::InvalidGoal(-5.0)));
        assert_eq!(
            ring_fraction(f64::NAN, 10.0),
            Err(GeometryError::NonFinite { name: "value" })
        );
        assert_eq!(
            ring_fraction(1.0, f64::INFINITY),
            Err(GeometryError::NonFinite { name: "goal" })
        );
    }

    #[test]
    fn ring_fraction_huge_ratio_clamps_to_one() {
        assert_eq!(ring_fraction(1e308, 1e-300), Ok(1.0));
    }

    #[test]
    fn bar_heights_preserve_order() {
        let heights = bar_heights(&series(&[10.0, 50.0, 30.0]), 100.0, None).unwrap();
        assert!(heights[0] < heights[2] && heights[2] < heights[1]);
        assert_eq!(heights[1], 100.0);
        assert!((heights[0] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn bar_heights_with_reference_cap_at_max() {
        let heights = bar_heights(&series(&[5_000.0, 12_000.0]), 80.0, Some(10_000.0)).unwrap();
        assert_eq!(heights, vec![40.0, 80.0]);
    }

    #[test]
    fn bar_heights_all_zero_series() {
        assert_eq!(bar_heights(&series(&[0.0, 0.0]), 50.0, None), Ok(vec![0.0, 0.0]));
    }

    #[test]
    fn bar_heights_rejects_bad_input() {
        assert_eq!(
            bar_heights(&series(&[1.0, -2.0]), 10.0, None),
            Err(GeometryError::NegativeSample { index: 1, value: -2.0 })
        );
        assert_eq!(
            bar_heights(&series(&[1.0]), -1.0, None),
            Err(GeometryError::InvalidHeight(-1.0))
        );
        assert_eq!(
            bar_heights(&series(&[1.0]), 10.0, Some(0.0)),
            Err(GeometryError::InvalidReference(0.0))
        );
        assert_eq!(
            bar_heights(&series(&[1.0]), 10.0, Some(f64::NAN)),
            Err(GeometryError::NonFinite { name: "reference_max" })
        );
    }

    #[test]
    fn bar_heights_stay_finite_for_huge_ratios() {
        let huge = series(&[1e300, 0.0]);
        assert_eq!(bar_heights(&huge, 0.0, Some(1e-10)), Ok(vec![0.0, 0.0]));
        assert_eq!(bar_heights(&huge, 50.0, Some(1e-10)), Ok(vec![50.0, 0.0]));
    }

    #[test]
    fn series_rejects_empty_and_nan() {
        assert_eq!(ChartSeries::new(vec![]), Err(GeometryError::EmptySeries));
        assert_eq!(
            ChartSeries::new(vec![1.0, f64::NAN]),
            Err(GeometryError::NonFinite { name: "sample" })
        );
    }

    #[test]
    fn bell_curve_is_symmetric_and_peaks_in_the_middle() {
        let peak = bell_curve_y(0.5).unwrap();
        assert_eq!(peak, 1.0);
        assert!((bell_curve_y(0.3).unwrap() - bell_curve_y(0.7).unwrap()).abs() < 1e-12);
        for i in 0..=100 {
            assert!(bell_curve_y(i as f64 / 100.0).unwrap() <= peak);
        }
        assert_eq!(bell_curve_y(1.2), Err(GeometryError::OutOfUnitRange(1.2)));
    }

    #[test]
    fn bell_curve_points_span_the_box() {
        let points = bell_curve_points(5, 200.0, 50.0).unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0].0, 0.0);
        assert_eq!(points[4].0, 200.0);
        assert_eq!(points[2], (100.0, 0.0));
        assert!(points[0].1 > 40.0 && points[0].1 < 50.0);
        assert_eq!(bell_curve_points(1, 10.0, 10.0), Err(GeometryError::TooFewPoints(1)));
    }

    #[test]
    fn percentile_counts_samples_below() {
        let samples = [30.0, 35.0, 40.0, 45.0, 50.0];
        assert_eq!(percentile(42.0, &samples), Ok(60.0));
        assert_eq!(percentile(10.0, &samples), Ok(0.0));
        assert_eq!(percentile(99.0, &samples), Ok(100.0));
        assert_eq!(percentile(30.0, &samples), Ok(0.0));
    }

    #[test]
    fn percentile_on_empty_set_fails() {
        assert_eq!(percentile(42.0, &[]), Err(GeometryError::InsufficientData));
    }

    #[test]
    fn arc_sweep_direction() {
        let ring = ArcLayout::full_ring();
        assert!((ring.sweep() - 2.0 * PI).abs() < 1e-12);
        assert!((ring.angle_at(0.25) - 0.0).abs() < 1e-12);

        let ccw = ArcLayout { start_angle: 0.0, end_angle: PI, clockwise: false };
        assert!((ccw.sweep() + PI).abs() < 1e-12);
        assert_eq!(ccw.angle_at(2.0), ccw.start_angle + ccw.sweep());
    }

    #[test]
    fn clockwise_gauge_wraps_through_the_bottom() {
        let gauge = ArcLayout { start_angle: 3.0 * PI / 4.0, end_angle: PI / 4.0, clockwise: true };
        assert!((gauge.sweep() - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((gauge.angle_at(1.0) - 9.0 * PI / 4.0).abs() < 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_bar_heights_bounded_and_monotonic(
            samples in prop::collection::vec(0.0f64..10_000.0, 1..48),
            max_height in 0.0f64..500.0,
        ) {
            let heights = bar_heights(&series(&samples), max_height, None).unwrap();
            prop_assert_eq!(heights.len(), samples.len());
            for h in &heights {
                prop_assert!(*h >= 0.0 && *h <= max_height);
            }
            for i in 0..samples.len() {
                for j in 0..samples.len() {
                    if samples[i] < samples[j] {
                        prop_assert!(heights[i] <= heights[j]);
                    }
                }
            }
        }

        #[test]
        fn prop_ring_fraction_in_unit_range(value in -1e6f64..1e6, goal in 0.001f64..1e6) {
            let f = ring_fraction(value, goal).unwrap();
            prop_assert!((0.0..=1.0).contains(&f));
        }

        #[test]
        fn prop_bell_curve_symmetric(x in 0.0f64..=0.5) {
            let left = bell_curve_y(x).unwrap();
            let right = bell_curve_y(1.0 - x).unwrap();
            prop_assert!((left - right).abs() < 1e-12);
            prop_assert!(left > 0.0 && left <= 1.0);
        }

        #[test]
        fn prop_percentile_in_range(
            value in -100.0f64..200.0,
            samples in prop::collection::vec(0.0f64..100.0, 1..64),
        ) {
            let p = percentile(value, &samples).unwrap();
            prop_assert!((0.0..=100.0).contains(&p));
        }
    }
}
