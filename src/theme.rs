pub mod controller;
pub mod palette;
pub mod score;

use serde::{Deserialize, Serialize};

pub use controller::{ThemeController, ThemeSnapshot, ThemeStore};
pub use palette::{resolve, ColorRole, Palette, PaletteError};
pub use score::{score_color, score_gradient};

/// Light or dark display mode. One per process, owned by the [`ThemeController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }
}

/// Returns the other mode.
pub fn toggle(mode: ThemeMode) -> ThemeMode {
    mode.toggled()
}

impl std::str::FromStr for ThemeMode {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Light" | "light" => Ok(ThemeMode::Light),
            "Dark" | "dark" => Ok(ThemeMode::Dark),
            other => Err(PaletteError::InvalidScheme(other.to_string())),
        }
    }
}

/// RGBA color, every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Builds an opaque color from hue, saturation and value, all in `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Self { r, g, b, a: 1.0 }
    }

    /// HSV hue in `[0, 1)`. Greys report a hue of 0.
    #[cfg(test)]
    pub fn hue(&self) -> f32 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;
        if delta <= f32::EPSILON {
            return 0.0;
        }
        let sixths = if max == self.r {
            ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };
        (sixths / 6.0).rem_euclid(1.0)
    }

    pub fn with_opacity(self, alpha: f32) -> Self {
        with_opacity(self, alpha)
    }

    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        fn lerp(a: f32, b: f32, t: f32) -> f32 {
            a * (1.0 - t) + b * t
        }
        let t = t.clamp(0.0, 1.0);
        Color {
            r: lerp(a.r, b.r, t),
            g: lerp(a.g, b.g, t),
            b: lerp(a.b, b.b, t),
            a: lerp(a.a, b.a, t),
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| c.is_finite() && (0.0..=1.0).contains(c))
    }

    /// `#rrggbbaa`, each channel rounded to 8 bits.
    pub fn to_hex(&self) -> String {
        let byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b), byte(self.a))
    }

    pub fn to_femtovg(self) -> femtovg::Color {
        femtovg::Color::rgbaf(self.r, self.g, self.b, self.a)
    }
}

/// Copy of `color` with a new alpha channel. Alpha is clamped to `[0, 1]`;
/// NaN yields a fully transparent color.
pub fn with_opacity(color: Color, alpha: f32) -> Color {
    let a = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    Color { a, ..color }
}
