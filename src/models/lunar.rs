use serde::{Deserialize, Serialize};
use std::fmt;

/// Lunar phase buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhaseName {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl LunarPhaseName {
    /// Bucket a phase fraction (0 new, 0.5 full) into a named phase.
    /// Thresholds are tuned for human-readable buckets, not astronomy.
    pub fn from_fraction(frac: f64) -> Self {
        let p = frac.rem_euclid(1.0);
        if p < 0.03 || p >= 0.97 {
            LunarPhaseName::NewMoon
        } else if p < 0.22 {
            LunarPhaseName::WaxingCrescent
        } else if p < 0.28 {
            LunarPhaseName::FirstQuarter
        } else if p < 0.47 {
            LunarPhaseName::WaxingGibbous
        } else if p < 0.53 {
            LunarPhaseName::FullMoon
        } else if p < 0.72 {
            LunarPhaseName::WaningGibbous
        } else if p < 0.78 {
            LunarPhaseName::LastQuarter
        } else {
            LunarPhaseName::WaningCrescent
        }
    }

    /// Whether the Moon is gaining light
    pub fn is_waxing(&self) -> bool {
        matches!(
            self,
            LunarPhaseName::NewMoon
                | LunarPhaseName::WaxingCrescent
                | LunarPhaseName::FirstQuarter
                | LunarPhaseName::WaxingGibbous
        )
    }
}

impl fmt::Display for LunarPhaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LunarPhaseName::NewMoon => "Luna nueva",
            LunarPhaseName::WaxingCrescent => "Creciente",
            LunarPhaseName::FirstQuarter => "Cuarto creciente",
            LunarPhaseName::WaxingGibbous => "Gibosa creciente",
            LunarPhaseName::FullMoon => "Luna llena",
            LunarPhaseName::WaningGibbous => "Gibosa menguante",
            LunarPhaseName::LastQuarter => "Cuarto menguante",
            LunarPhaseName::WaningCrescent => "Menguante",
        };
        write!(f, "{}", name)
    }
}

/// Current lunar phase, derived from the Sun-Moon elongation
#[derive(Debug, Clone, Serialize)]
pub struct LunarPhase {
    pub name: LunarPhaseName,
    /// Human-readable phase label (Spanish)
    pub label: String,
    /// 0.0 new .. 0.5 full .. 1.0 new again
    pub frac: f64,
    /// Illuminated fraction of the disc, 0.0-1.0
    pub illumination: f64,
    pub moon_sign: String,
    pub sun_sign: String,
}

impl LunarPhase {
    /// Build the phase block from transiting Sun and Moon longitudes.
    pub fn from_longitudes(sun_lon: f64, moon_lon: f64) -> Self {
        let angle = (moon_lon - sun_lon).rem_euclid(360.0);
        let frac = angle / 360.0;
        let name = LunarPhaseName::from_fraction(frac);
        Self {
            name,
            label: name.to_string(),
            frac: (frac * 10000.0).round() / 10000.0,
            illumination: (illumination_from_angle(angle) * 10000.0).round() / 10000.0,
            moon_sign: super::ZodiacSign::from_longitude(moon_lon).to_string(),
            sun_sign: super::ZodiacSign::from_longitude(sun_lon).to_string(),
        }
    }
}

/// Illuminated fraction from the Sun-Moon elongation angle
pub fn illumination_from_angle(angle: f64) -> f64 {
    let radians = angle.rem_euclid(360.0).to_radians();
    (1.0 - radians.cos()) / 2.0
}
