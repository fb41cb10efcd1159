use super::{Color, PaletteError};

pub const SCORE_SATURATION: f32 = 0.55;
pub const SCORE_BRIGHTNESS: f32 = 0.7;
const GRADIENT_END_BRIGHTNESS: f32 = 0.9;
const GRADIENT_END_OPACITY: f32 = 0.6;

fn score_hue(score: i32) -> Result<f32, PaletteError> {
    if !(0..=100).contains(&score) {
        return Err(PaletteError::ScoreOutOfRange(score));
    }
    Ok(score as f32 * 1.2 / 360.0)
}

/// Hue-mapped color for a 0-100 score: red at 0, green at 100.
pub fn score_color(score: i32) -> Result<Color, PaletteError> {
    let hue = score_hue(score)?;
    Ok(Color::from_hsv(hue, SCORE_SATURATION, SCORE_BRIGHTNESS))
}

/// Two gradient stops for a score ring: the score color, then a lighter,
/// translucent stop of the same hue.
pub fn score_gradient(score: i32) -> Result<[Color; 2], PaletteError> {
    let start = score_color(score)?;
    let hue = score_hue(score)?;
    let end = Color::from_hsv(hue, SCORE_SATURATION, GRADIENT_END_BRIGHTNESS)
        .with_opacity(GRADIENT_END_OPACITY);
    Ok([start, end])
}
