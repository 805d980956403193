use serde::{Deserialize, Serialize};
use std::fmt;

/// Zodiac signs in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// Get sign from ecliptic longitude (0-360 degrees)
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        let sign_index = (normalized / 30.0).floor() as usize;
        Self::from_index(sign_index)
    }

    /// Get sign from index (0 = Aries, 11 = Pisces)
    pub fn from_index(index: usize) -> Self {
        match index % 12 {
            0 => ZodiacSign::Aries,
            1 => ZodiacSign::Taurus,
            2 => ZodiacSign::Gemini,
            3 => ZodiacSign::Cancer,
            4 => ZodiacSign::Leo,
            5 => ZodiacSign::Virgo,
            6 => ZodiacSign::Libra,
            7 => ZodiacSign::Scorpio,
            8 => ZodiacSign::Sagittarius,
            9 => ZodiacSign::Capricorn,
            10 => ZodiacSign::Aquarius,
            11 => ZodiacSign::Pisces,
            _ => unreachable!(),
        }
    }
}

impl fmt::Display for ZodiacSign {
    /// Spanish sign names; all reader-facing copy in the service is Spanish.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Tauro",
            ZodiacSign::Gemini => "Géminis",
            ZodiacSign::Cancer => "Cáncer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Escorpio",
            ZodiacSign::Sagittarius => "Sagitario",
            ZodiacSign::Capricorn => "Capricornio",
            ZodiacSign::Aquarius => "Acuario",
            ZodiacSign::Pisces => "Piscis",
        };
        write!(f, "{}", name)
    }
}

/// The ten bodies the service reports on, in traditional order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl Planet {
    /// Get all bodies for iteration
    pub fn all() -> &'static [Planet] {
        &[
            Planet::Sun,
            Planet::Moon,
            Planet::Mercury,
            Planet::Venus,
            Planet::Mars,
            Planet::Jupiter,
            Planet::Saturn,
            Planet::Uranus,
            Planet::Neptune,
            Planet::Pluto,
        ]
    }

    /// Get Swiss Ephemeris body ID
    pub fn swe_id(&self) -> i32 {
        match self {
            Planet::Sun => 0,     // SE_SUN
            Planet::Moon => 1,    // SE_MOON
            Planet::Mercury => 2, // SE_MERCURY
            Planet::Venus => 3,   // SE_VENUS
            Planet::Mars => 4,    // SE_MARS
            Planet::Jupiter => 5, // SE_JUPITER
            Planet::Saturn => 6,  // SE_SATURN
            Planet::Uranus => 7,  // SE_URANUS
            Planet::Neptune => 8, // SE_NEPTUNE
            Planet::Pluto => 9,   // SE_PLUTO
        }
    }

    /// Maximum orb this body is granted as the transiting party.
    /// The luminaries get wide orbs, the outer bodies tight ones.
    pub fn orb_allowance(&self) -> f64 {
        match self {
            Planet::Moon => 8.0,
            Planet::Sun => 6.0,
            Planet::Mercury | Planet::Venus => 4.0,
            Planet::Mars => 4.5,
            Planet::Jupiter | Planet::Saturn => 3.5,
            Planet::Uranus | Planet::Neptune | Planet::Pluto => 3.0,
        }
    }

    /// Ordering among events with equal orb; lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            Planet::Moon => 0,
            Planet::Sun => 1,
            Planet::Mercury | Planet::Venus | Planet::Mars => 2,
            Planet::Jupiter | Planet::Saturn => 3,
            Planet::Uranus | Planet::Neptune | Planet::Pluto => 4,
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Planet::Sun => "Sun",
            Planet::Moon => "Moon",
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        };
        write!(f, "{}", name)
    }
}

/// Shortest angular distance between two ecliptic longitudes, in [0, 180]
pub fn delta_deg(a: f64, b: f64) -> f64 {
    let d = (a.rem_euclid(360.0) - b.rem_euclid(360.0)).abs();
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_from_longitude() {
        assert_eq!(ZodiacSign::from_longitude(280.0), ZodiacSign::Capricorn);
        assert_eq!(ZodiacSign::from_longitude(45.0), ZodiacSign::Taurus);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(-10.0), ZodiacSign::Pisces);
    }

    #[test]
    fn spanish_display() {
        assert_eq!(ZodiacSign::Scorpio.to_string(), "Escorpio");
        assert_eq!(ZodiacSign::Capricorn.to_string(), "Capricornio");
    }

    #[test]
    fn ten_bodies() {
        assert_eq!(Planet::all().len(), 10);
    }

    #[test]
    fn orb_allowance_favors_luminaries() {
        assert!(Planet::Moon.orb_allowance() > Planet::Sun.orb_allowance());
        assert!(Planet::Sun.orb_allowance() > Planet::Pluto.orb_allowance());
    }

    #[test]
    fn priority_moon_first() {
        assert_eq!(Planet::Moon.priority(), 0);
        assert_eq!(Planet::Sun.priority(), 1);
        assert!(Planet::Neptune.priority() > Planet::Mars.priority());
    }

    #[test]
    fn delta_is_shortest_arc() {
        assert!((delta_deg(10.0, 350.0) - 20.0).abs() < 1e-9);
        assert!((delta_deg(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((delta_deg(0.0, 180.0) - 180.0).abs() < 1e-9);
    }
}
