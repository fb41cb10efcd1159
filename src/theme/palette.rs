use super::{with_opacity, Color, ThemeMode};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaletteError {
    #[error("unknown color role: {0}")]
    UnknownRole(String),

    #[error("score must lie in 0..=100, got {0}")]
    ScoreOutOfRange(i32),

    #[error("invalid scheme: {0}")]
    InvalidScheme(String),
}

/// Semantic color slot. Every role has exactly one definition per [`ThemeMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorRole {
    Background,
    CardBackground,
    SecondaryBackground,
    Foreground,
    MutedForeground,
    Border,
    Primary,
    PrimaryForeground,
    Accent,
    Movement,
    Stress,
    Recovery,
    Sleep,
    Workout,
    HeartRate,
    Zone,
    Strain,
    Steps,
    Vo2Max,
    Success,
    Warning,
    Error,
    ChartGrid,
    Overlay,
    RingTrack,
}

impl ColorRole {
    pub const COUNT: usize = 25;

    /// Every role, in index order.
    pub const ALL: [ColorRole; ColorRole::COUNT] = [
        ColorRole::Background,
        ColorRole::CardBackground,
        ColorRole::SecondaryBackground,
        ColorRole::Foreground,
        ColorRole::MutedForeground,
        ColorRole::Border,
        ColorRole::Primary,
        ColorRole::PrimaryForeground,
        ColorRole::Accent,
        ColorRole::Movement,
        ColorRole::Stress,
        ColorRole::Recovery,
        ColorRole::Sleep,
        ColorRole::Workout,
        ColorRole::HeartRate,
        ColorRole::Zone,
        ColorRole::Strain,
        ColorRole::Steps,
        ColorRole::Vo2Max,
        ColorRole::Success,
        ColorRole::Warning,
        ColorRole::Error,
        ColorRole::ChartGrid,
        ColorRole::Overlay,
        ColorRole::RingTrack,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorRole::Background => "background",
            ColorRole::CardBackground => "cardBackground",
            ColorRole::SecondaryBackground => "secondaryBackground",
            ColorRole::Foreground => "foreground",
            ColorRole::MutedForeground => "mutedForeground",
            ColorRole::Border => "border",
            ColorRole::Primary => "primary",
            ColorRole::PrimaryForeground => "primaryForeground",
            ColorRole::Accent => "accent",
            ColorRole::Movement => "movement",
            ColorRole::Stress => "stress",
            ColorRole::Recovery => "recovery",
            ColorRole::Sleep => "sleep",
            ColorRole::Workout => "workout",
            ColorRole::HeartRate => "heartRate",
            ColorRole::Zone => "zone",
            ColorRole::Strain => "strain",
            ColorRole::Steps => "steps",
            ColorRole::Vo2Max => "vo2Max",
            ColorRole::Success => "success",
            ColorRole::Warning => "warning",
            ColorRole::Error => "error",
            ColorRole::ChartGrid => "chartGrid",
            ColorRole::Overlay => "overlay",
            ColorRole::RingTrack => "ringTrack",
        }
    }

    fn definition(self, mode: ThemeMode) -> RoleValue {
        let pick = |light: Color, dark: Color| match mode {
            ThemeMode::Light => RoleValue::Solid(light),
            ThemeMode::Dark => RoleValue::Solid(dark),
        };
        let derive = |base: ColorRole, light: f32, dark: f32| RoleValue::Derived {
            base,
            opacity: if mode.is_dark() { dark } else { light },
        };

        match self {
            ColorRole::Background => pick(Color::rgb8(245, 245, 247), Color::rgb8(0, 0, 0)),
            ColorRole::CardBackground => pick(Color::rgb8(255, 255, 255), Color::rgb8(28, 28, 30)),
            ColorRole::SecondaryBackground => pick(
                Color::rgb8(235, 235, 240),
                Color::rgb8(44, 44, 46),
            ),
            ColorRole::Foreground => pick(Color::rgb8(17, 17, 17), Color::rgb8(245, 245, 247)),
            ColorRole::MutedForeground => pick(
                Color::rgb8(110, 110, 115),
                Color::rgb8(152, 152, 157),
            ),
            ColorRole::Border => pick(Color::rgb8(220, 220, 225), Color::rgb8(56, 56, 58)),
            ColorRole::Primary => pick(Color::rgb8(0, 122, 255), Color::rgb8(10, 132, 255)),
            ColorRole::PrimaryForeground => pick(
                Color::rgb8(255, 255, 255),
                Color::rgb8(255, 255, 255),
            ),
            ColorRole::Accent => pick(Color::rgb8(255, 149, 0), Color::rgb8(255, 159, 10)),
            ColorRole::Movement => pick(Color::rgb8(52, 199, 89), Color::rgb8(48, 209, 88)),
            ColorRole::Stress => pick(Color::rgb8(255, 107, 53), Color::rgb8(255, 128, 82)),
            ColorRole::Recovery => pick(Color::rgb8(0, 184, 148), Color::rgb8(22, 219, 170)),
            ColorRole::Sleep => pick(Color::rgb8(88, 86, 214), Color::rgb8(94, 92, 230)),
            ColorRole::Workout => pick(Color::rgb8(255, 159, 10), Color::rgb8(255, 179, 64)),
            ColorRole::HeartRate => pick(Color::rgb8(255, 45, 85), Color::rgb8(255, 55, 95)),
            ColorRole::Zone => pick(Color::rgb8(255, 204, 0), Color::rgb8(255, 214, 10)),
            ColorRole::Strain => pick(Color::rgb8(0, 113, 227), Color::rgb8(64, 156, 255)),
            ColorRole::Steps => pick(Color::rgb8(50, 173, 230), Color::rgb8(100, 210, 255)),
            ColorRole::Vo2Max => pick(Color::rgb8(175, 82, 222), Color::rgb8(191, 90, 242)),
            ColorRole::Success => pick(Color::rgb8(52, 199, 89), Color::rgb8(48, 209, 88)),
            ColorRole::Warning => pick(Color::rgb8(255, 149, 0), Color::rgb8(255, 159, 10)),
            ColorRole::Error => pick(Color::rgb8(255, 59, 48), Color::rgb8(255, 69, 58)),
            ColorRole::ChartGrid => derive(ColorRole::MutedForeground, 0.2, 0.25),
            ColorRole::Overlay => derive(ColorRole::Foreground, 0.05, 0.08),
            ColorRole::RingTrack => derive(ColorRole::Primary, 0.15, 0.25),
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorRole {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|role| role.name() == s)
            .ok_or_else(|| PaletteError::UnknownRole(s.to_string()))
    }
}

enum RoleValue {
    Solid(Color),
    // Derived roles must point at a solid role
    Derived { base: ColorRole, opacity: f32 },
}

/// Complete role-to-color mapping for one mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    mode: ThemeMode,
    colors: [Color; ColorRole::COUNT],
}

impl Palette {
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn get(&self, role: ColorRole) -> Color {
        self.colors[role.index()]
    }

    pub fn lookup(&self, name: &str) -> Result<Color, PaletteError> {
        Ok(self.get(name.parse()?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColorRole, Color)> + '_ {
        ColorRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    /// Blend two palettes, `t = 0` giving `a` and `t = 1` giving `b`.
    /// The resulting mode flips halfway.
    pub fn interpolate(a: &Palette, b: &Palette, t: f32) -> Palette {
        let t = t.clamp(0.0, 1.0);
        let mut colors = a.colors;
        for (slot, target) in colors.iter_mut().zip(b.colors.iter()) {
            *slot = Color::lerp(*slot, *target, t);
        }
        Palette {
            mode: if t < 0.5 { a.mode } else { b.mode },
            colors,
        }
    }
}

/// Build the full palette for `mode`.
pub fn resolve(mode: ThemeMode) -> Palette {
    let mut colors = [Color::rgb8(0, 0, 0); ColorRole::COUNT];
    for role in ColorRole::ALL {
        colors[role.index()] = resolve_role(role, mode);
    }
    debug_assert!(colors.iter().all(Color::is_valid), "{mode:?} palette has an invalid color");
    Palette { mode, colors }
}

fn resolve_role(role: ColorRole, mode: ThemeMode) -> Color {
    match role.definition(mode) {
        RoleValue::Solid(color) => color,
        RoleValue::Derived { base, opacity } => with_opacity(resolve_role(base, mode), opacity),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn any_mode() -> impl Strategy<Value = ThemeMode> {
        prop_oneof![Just(ThemeMode::Light), Just(ThemeMode::Dark)]
    }

    fn any_role() -> impl Strategy<Value = ColorRole> {
        (0..ColorRole::COUNT).prop_map(|i| ColorRole::ALL[i])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_every_role_resolves_to_valid_color(mode in any_mode(), role in any_role()) {
            let palette = resolve(mode);
            prop_assert!(palette.get(role).is_valid());
            prop_assert_eq!(palette.lookup(role.name()), Ok(palette.get(role)));
        }

        #[test]
        fn prop_resolve_is_deterministic(mode in any_mode()) {
            prop_assert_eq!(resolve(mode), resolve(mode));
        }

        #[test]
        fn prop_interpolate_stays_valid(t in -1.0f32..2.0f32) {
            let (light, dark) = (resolve(ThemeMode::Light), resolve(ThemeMode::Dark));
            let blended = Palette::interpolate(&light, &dark, t);
            for (_, color) in blended.iter() {
                prop_assert!(color.is_valid());
            }
        }
    }

    #[test]
    fn all_is_in_index_order() {
        for (i, role) in ColorRole::ALL.iter().enumerate() {
            assert_eq!(role.index(), i);
        }
    }

    #[test]
    fn names_round_trip_and_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for role in ColorRole::ALL {
            assert_eq!(role.name().parse::<ColorRole>(), Ok(role));
            assert!(seen.insert(role.name()));
        }
    }

    #[test]
    fn unknown_role_name_is_an_error() {
        let palette = resolve(ThemeMode::Light);
        assert_eq!(
            palette.lookup("chartBackground"),
            Err(PaletteError::UnknownRole("chartBackground".to_string()))
        );
        assert!("HeartRate".parse::<ColorRole>().is_err());
    }

    #[test]
    fn modes_differ_where_it_matters() {
        let light = resolve(ThemeMode::Light);
        let dark = resolve(ThemeMode::Dark);
        assert_ne!(light.get(ColorRole::Background), dark.get(ColorRole::Background));
        assert_ne!(light.get(ColorRole::Foreground), dark.get(ColorRole::Foreground));
        assert_eq!(light.mode(), ThemeMode::Light);
        assert_eq!(dark.mode(), ThemeMode::Dark);
    }

    #[test]
    fn derived_roles_follow_their_base() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let palette = resolve(mode);
            let primary = palette.get(ColorRole::Primary);
            let track = palette.get(ColorRole::RingTrack);
            assert_eq!((track.r, track.g, track.b), (primary.r, primary.g, primary.b));
            assert!(track.a < 1.0);
            assert!(palette.get(ColorRole::Overlay).a < 0.1);
        }
    }

    #[test]
    fn interpolate_endpoints_match_inputs() {
        let light = resolve(ThemeMode::Light);
        let dark = resolve(ThemeMode::Dark);
        assert_eq!(Palette::interpolate(&light, &dark, 0.0), light);
        assert_eq!(Palette::interpolate(&light, &dark, 1.0), dark);
        assert_eq!(Palette::interpolate(&light, &dark, 0.4).mode(), ThemeMode::Light);
        assert_eq!(Palette::interpolate(&light, &dark, 0.6).mode(), ThemeMode::Dark);
    }
}
