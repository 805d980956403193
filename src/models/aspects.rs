use serde::{Deserialize, Serialize};
use std::fmt;

use super::{delta_deg, Planet};

/// The five major aspects the transit scan matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectType {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectType {
    /// Get the exact angle for this aspect
    pub fn angle(&self) -> f64 {
        match self {
            AspectType::Conjunction => 0.0,
            AspectType::Sextile => 60.0,
            AspectType::Square => 90.0,
            AspectType::Trine => 120.0,
            AspectType::Opposition => 180.0,
        }
    }

    /// Per-aspect orb cap. Sextile is held tighter than the rest.
    pub fn orb_cap(&self) -> f64 {
        match self {
            AspectType::Conjunction => 6.0,
            AspectType::Sextile => 4.0,
            AspectType::Square => 5.0,
            AspectType::Trine => 5.0,
            AspectType::Opposition => 6.0,
        }
    }

    /// One-word tone marker carried into the response
    pub fn vibe(&self) -> &'static str {
        match self {
            AspectType::Conjunction => "intensifica",
            AspectType::Sextile => "abre puertas",
            AspectType::Square => "tensa",
            AspectType::Trine => "fluye",
            AspectType::Opposition => "espeja",
        }
    }

    pub fn all() -> &'static [AspectType] {
        &[
            AspectType::Conjunction,
            AspectType::Sextile,
            AspectType::Square,
            AspectType::Trine,
            AspectType::Opposition,
        ]
    }
}

impl fmt::Display for AspectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AspectType::Conjunction => "Conjunción",
            AspectType::Sextile => "Sextil",
            AspectType::Square => "Cuadratura",
            AspectType::Trine => "Trígono",
            AspectType::Opposition => "Oposición",
        };
        write!(f, "{}", name)
    }
}

/// A raw aspect match before it is dressed up as an event
#[derive(Debug, Clone, Copy)]
pub struct AspectHit {
    pub aspect: AspectType,
    /// Absolute offset from the exact aspect angle, in degrees
    pub orb: f64,
}

/// Find the closest aspect between a transiting body and a natal longitude.
///
/// The tolerance for each aspect is `min(aspect cap, body allowance)`: the
/// transiting body's identity widens or narrows every aspect uniformly,
/// while the per-aspect cap keeps sextiles tighter than conjunctions.
/// Among aspects within tolerance the smallest offset wins.
pub fn best_aspect(transit_lon: f64, natal_lon: f64, transiting: Planet) -> Option<AspectHit> {
    let allowance = transiting.orb_allowance();
    let d = delta_deg(transit_lon, natal_lon);

    let mut best: Option<AspectHit> = None;
    for aspect in AspectType::all() {
        let tolerance = aspect.orb_cap().min(allowance);
        let off = (d - aspect.angle()).abs();
        if off <= tolerance && best.map_or(true, |b| off < b.orb) {
            best = Some(AspectHit {
                aspect: *aspect,
                orb: off,
            });
        }
    }
    best
}

/// A matched transit-to-natal aspect, as serialized in `/astro/fullpro`
#[derive(Debug, Clone, Serialize)]
pub struct AspectEvent {
    /// Transiting body name ("Moon", "Sun", ...)
    pub tp: String,
    /// Natal point label ("Sun", "Asc", "MC", ...)
    pub natal: String,
    /// Aspect name in Spanish ("Cuadratura", ...)
    pub aspect: String,
    pub aspect_deg: f64,
    /// Offset from exact, rounded to 2 decimals
    pub orb: f64,
    /// True when the orb is shrinking over the next 6 hours
    pub applying: bool,
    pub vibe: String,
    /// House the natal point occupies, when cusps are known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
}

/// Sort events by orb ascending, breaking ties with the transiting body's
/// priority (Moon first), and keep only the `limit` closest.
pub fn rank_events(mut events: Vec<(Planet, AspectEvent)>, limit: usize) -> Vec<AspectEvent> {
    events.sort_by(|(pa, a), (pb, b)| {
        a.orb
            .partial_cmp(&b.orb)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(pa.priority().cmp(&pb.priority()))
    });
    events.truncate(limit);
    events.into_iter().map(|(_, e)| e).collect()
}
