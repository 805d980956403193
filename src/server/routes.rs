//! Request handlers for the ephemeris service.
//!
//! Handlers are stateless: each request resolves a timestamp, snapshots the
//! ephemeris, optionally derives a natal chart, and serializes a response.
//! Ephemeris failures degrade to sentinels; the only hard failure is the 401.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::ephemeris::{
    datetime_to_julian_day, house_of, houses_or_zero, resolve_now, snapshot_all, BodySnapshot,
    HousePositions,
};
use crate::models::{
    best_aspect, rank_events, AspectEvent, LunarPhase, NatalInput, NatalPoint, Planet,
};
use crate::server::{advice, auth::require_key, AppState};

const ENGINE: &str = "swiss_ephemeris";
/// Events beyond the 16 closest are noise for the reading
const MAX_EVENTS: usize = 16;
/// Applying/separating is judged 6 hours ahead
const LOOKAHEAD_DAYS: f64 = 0.25;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitsRequest {
    pub now_iso: Option<String>,
    // Accepted for forward compatibility; positions are geocentric and do
    // not depend on the observer here.
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FullproRequest {
    pub now_iso: Option<String>,
    pub natal: Option<NatalInput>,
}

#[derive(Debug, Serialize)]
pub struct PlanetOut {
    pub lon: f64,
    pub retro: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DebugOut {
    pub speed_lon: f64,
}

#[derive(Debug, Serialize)]
pub struct TransitsResponse {
    pub ok: bool,
    pub engine: &'static str,
    pub now_utc: String,
    pub jd_ut: f64,
    pub planets: BTreeMap<String, PlanetOut>,
    #[serde(rename = "_debug")]
    pub debug: BTreeMap<String, DebugOut>,
}

#[derive(Debug, Serialize)]
pub struct HousesOut {
    pub system: &'static str,
    pub cusps: [f64; 12],
    pub asc: f64,
    pub mc: f64,
    /// House the transiting Moon occupies in the natal wheel
    pub moon_house: u8,
    pub sun_house: u8,
}

#[derive(Debug, Serialize)]
pub struct Hints {
    pub top: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vibe: Option<String>,
    pub money_whisper: String,
}

#[derive(Debug, Serialize)]
pub struct FullproResponse {
    pub ok: bool,
    pub engine: &'static str,
    pub now_utc: String,
    pub jd_ut: f64,
    pub phase: LunarPhase,
    pub houses: Option<HousesOut>,
    pub events: Vec<AspectEvent>,
    pub headline: Option<AspectEvent>,
    pub hints: Hints,
    pub planets: BTreeMap<String, PlanetOut>,
    #[serde(rename = "_debug")]
    pub debug: BTreeMap<String, DebugOut>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

pub async fn astro_transits(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<TransitsRequest>>,
) -> Response {
    if let Err(resp) = require_key(&state.config, &headers) {
        return resp;
    }
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let now = resolve_now(req.now_iso.as_deref());
    let jd = datetime_to_julian_day(now);
    let snapshot = snapshot_all(jd);

    tracing::info!(jd_ut = jd, "transits computed");

    Json(TransitsResponse {
        ok: true,
        engine: ENGINE,
        now_utc: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        jd_ut: jd,
        planets: planets_out(&snapshot),
        debug: debug_out(&snapshot),
    })
    .into_response()
}

pub async fn astro_fullpro(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<FullproRequest>>,
) -> Response {
    if let Err(resp) = require_key(&state.config, &headers) {
        return resp;
    }
    let req = body.map(|Json(r)| r).unwrap_or_default();

    let now = resolve_now(req.now_iso.as_deref());
    let jd = datetime_to_julian_day(now);
    let snapshot = snapshot_all(jd);

    let sun_lon = snapshot[&Planet::Sun].lon;
    let moon_lon = snapshot[&Planet::Moon].lon;
    let phase = LunarPhase::from_longitudes(sun_lon, moon_lon);

    // Natal derivation; anything missing degrades to "no natal"
    let natal = req.natal.and_then(|n| derive_natal(&n));

    let mut houses_out = None;
    let mut events: Vec<AspectEvent> = Vec::new();

    if let Some(chart) = &natal {
        houses_out = Some(HousesOut {
            system: "Placidus",
            cusps: chart.houses.cusps,
            asc: chart.houses.ascendant,
            mc: chart.houses.midheaven,
            moon_house: house_of(moon_lon, &chart.houses.cusps),
            sun_house: house_of(sun_lon, &chart.houses.cusps),
        });

        // One lookahead snapshot decides applying/separating for everything
        let future = snapshot_all(jd + LOOKAHEAD_DAYS);
        events = scan_aspects(&snapshot, &future, chart);
    }

    let headline = events.first().cloned();
    let hints = Hints {
        top: advice::top_line(
            &phase.moon_sign,
            &phase.sun_sign,
            houses_out.as_ref().map(|h| h.moon_house),
            houses_out.as_ref().map(|h| h.sun_house),
            headline.as_ref(),
        ),
        vibe: headline.as_ref().and_then(advice::vibe_hint),
        money_whisper: advice::money_whisper(phase.name, headline.as_ref().and_then(|h| h.house)),
    };

    tracing::info!(
        jd_ut = jd,
        events = events.len(),
        has_natal = natal.is_some(),
        "fullpro computed"
    );

    Json(FullproResponse {
        ok: true,
        engine: ENGINE,
        now_utc: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        jd_ut: jd,
        phase,
        houses: houses_out,
        events,
        headline,
        hints,
        planets: planets_out(&snapshot),
        debug: debug_out(&snapshot),
    })
    .into_response()
}

// ---------------------------------------------------------------------------
// Natal chart derivation
// ---------------------------------------------------------------------------

struct NatalChart {
    points: Vec<NatalPoint>,
    houses: HousePositions,
}

/// Compute the natal wheel from the request's birth data. Returns `None`
/// when the birth moment or coordinates cannot be resolved; house failures
/// inside a valid chart degrade to zeroed cusps instead.
fn derive_natal(input: &NatalInput) -> Option<NatalChart> {
    let meta = input.meta.as_ref()?;
    let birth = meta.birth_utc()?;
    let (lat, lon) = meta.coords()?;

    let jd = datetime_to_julian_day(birth);
    let houses = houses_or_zero(jd, lat, lon);

    let mut points = Vec::with_capacity(12);
    for (planet, snap) in snapshot_all(jd) {
        // A degraded natal body would sit at 0° Aries and fabricate aspects
        if snap.error.is_none() {
            points.push(NatalPoint {
                label: planet.to_string(),
                lon: snap.lon,
            });
        }
    }
    points.push(NatalPoint {
        label: "Asc".to_string(),
        lon: houses.ascendant,
    });
    points.push(NatalPoint {
        label: "MC".to_string(),
        lon: houses.midheaven,
    });

    Some(NatalChart { points, houses })
}

// ---------------------------------------------------------------------------
// Aspect scan
// ---------------------------------------------------------------------------

/// Match every error-free transiting body against every natal point, keep
/// the closest aspect per pair, and rank the result.
fn scan_aspects(
    snapshot: &BTreeMap<Planet, BodySnapshot>,
    future: &BTreeMap<Planet, BodySnapshot>,
    chart: &NatalChart,
) -> Vec<AspectEvent> {
    let mut hits = Vec::new();

    for (planet, snap) in snapshot {
        if snap.error.is_some() {
            continue;
        }
        for point in &chart.points {
            let Some(hit) = best_aspect(snap.lon, point.lon, *planet) else {
                continue;
            };

            // Applying when the orb to the same natal point shrinks
            let applying = future
                .get(planet)
                .filter(|f| f.error.is_none())
                .map(|f| {
                    let future_orb =
                        (crate::models::delta_deg(f.lon, point.lon) - hit.aspect.angle()).abs();
                    future_orb < hit.orb
                })
                .unwrap_or(false);

            hits.push((
                *planet,
                AspectEvent {
                    tp: planet.to_string(),
                    natal: point.label.clone(),
                    aspect: hit.aspect.to_string(),
                    aspect_deg: hit.aspect.angle(),
                    orb: (hit.orb * 100.0).round() / 100.0,
                    applying,
                    vibe: hit.aspect.vibe().to_string(),
                    house: Some(house_of(point.lon, &chart.houses.cusps)),
                },
            ));
        }
    }

    rank_events(hits, MAX_EVENTS)
}

// ---------------------------------------------------------------------------
// Serialization helpers
// ---------------------------------------------------------------------------

fn planets_out(snapshot: &BTreeMap<Planet, BodySnapshot>) -> BTreeMap<String, PlanetOut> {
    snapshot
        .iter()
        .map(|(p, s)| {
            (
                p.to_string(),
                PlanetOut {
                    lon: s.lon,
                    retro: s.retro,
                    error: s.error.clone(),
                },
            )
        })
        .collect()
}

fn debug_out(snapshot: &BTreeMap<Planet, BodySnapshot>) -> BTreeMap<String, DebugOut> {
    snapshot
        .iter()
        .map(|(p, s)| (p.to_string(), DebugOut { speed_lon: s.speed_lon }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NatalMeta;

    fn natal_input() -> NatalInput {
        NatalInput {
            meta: Some(NatalMeta {
                birth_local: Some("1990-06-15T10:30".into()),
                tz_offset_min: Some(-300),
                tz_name: None,
                lat: Some(8.98),
                lon: Some(-79.52),
            }),
        }
    }

    #[test]
    fn natal_derivation_yields_twelve_points() {
        crate::ephemeris::init_ephemeris(None);
        let chart = derive_natal(&natal_input()).unwrap();
        assert_eq!(chart.points.len(), 12);
        assert!(chart.points.iter().any(|p| p.label == "Asc"));
        assert!(chart.points.iter().any(|p| p.label == "MC"));
    }

    #[test]
    fn natal_without_meta_is_none() {
        assert!(derive_natal(&NatalInput { meta: None }).is_none());
    }

    #[test]
    fn natal_with_bad_birth_is_none() {
        let mut input = natal_input();
        input.meta.as_mut().unwrap().birth_local = Some("ayer".into());
        assert!(derive_natal(&input).is_none());
    }

    #[test]
    fn aspect_scan_is_bounded_and_sorted() {
        crate::ephemeris::init_ephemeris(None);
        let chart = derive_natal(&natal_input()).unwrap();
        let jd = 2460500.0;
        let snapshot = snapshot_all(jd);
        let future = snapshot_all(jd + LOOKAHEAD_DAYS);
        let events = scan_aspects(&snapshot, &future, &chart);

        assert!(events.len() <= MAX_EVENTS);
        for pair in events.windows(2) {
            assert!(pair[0].orb <= pair[1].orb);
        }
    }
}
