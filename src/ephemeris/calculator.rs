//! Swiss Ephemeris wrapper for planetary calculations
//!
//! Safe Rust wrappers around the libswisseph-sys FFI bindings. Every call
//! site is guarded: a body the library cannot compute degrades to a sentinel
//! entry instead of failing the whole snapshot.

use chrono::{DateTime, Datelike, Timelike, Utc};
use std::collections::BTreeMap;
use std::ffi::CString;
use std::sync::Once;

use crate::models::Planet;

// Swiss Ephemeris constants
const SE_GREG_CAL: i32 = 1;
const SEFLG_SWIEPH: i32 = 2; // Compressed Swiss Ephemeris files
const SEFLG_MOSEPH: i32 = 4; // Moshier analytical fallback, no files needed
const SEFLG_SPEED: i32 = 256; // Include speed in calculations

static INIT: Once = Once::new();

/// Initialize Swiss Ephemeris (call once at startup).
///
/// Without an ephemeris path the library falls back to the Moshier
/// analytical ephemeris, which needs no data files.
pub fn init_ephemeris(ephe_path: Option<&str>) {
    INIT.call_once(|| {
        let c_path = ephe_path.and_then(|p| CString::new(p).ok());
        unsafe {
            match c_path {
                Some(p) => libswisseph_sys::swe_set_ephe_path(p.as_ptr() as *mut _),
                None => libswisseph_sys::swe_set_ephe_path(std::ptr::null_mut()),
            }
        }
    });
}

/// Per-body result of a snapshot. `error` is set (and the numbers zeroed)
/// when the library failed in both precision modes.
#[derive(Debug, Clone)]
pub struct BodySnapshot {
    /// Ecliptic longitude (0-360 degrees)
    pub lon: f64,
    /// Speed in longitude (degrees per day, negative = retrograde)
    pub speed_lon: f64,
    /// True when the longitudinal speed is negative
    pub retro: bool,
    pub error: Option<String>,
}

impl BodySnapshot {
    fn degraded(msg: String) -> Self {
        Self {
            lon: 0.0,
            speed_lon: 0.0,
            retro: false,
            error: Some(msg),
        }
    }
}

/// Convert a UTC instant to Julian Day (UT)
pub fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour = dt.hour() as f64
        + dt.minute() as f64 / 60.0
        + dt.second() as f64 / 3600.0
        + dt.nanosecond() as f64 / 3.6e12;

    unsafe {
        libswisseph_sys::swe_julday(dt.year(), dt.month() as i32, dt.day() as i32, hour, SE_GREG_CAL)
    }
}

/// Resolve the request timestamp.
///
/// Accepts RFC 3339 with `Z` or an explicit offset. Absence or a parse
/// failure silently falls back to the current wall clock; availability
/// beats strictness here.
pub fn resolve_now(now_iso: Option<&str>) -> DateTime<Utc> {
    match now_iso {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(err) => {
                tracing::debug!(%raw, %err, "unparseable now_iso, using wall clock");
                Utc::now()
            }
        },
        None => Utc::now(),
    }
}

fn calc_body(julian_day: f64, planet: Planet, flags: i32) -> Result<(f64, f64), String> {
    let mut xx: [f64; 6] = [0.0; 6];
    let mut serr: [i8; 256] = [0; 256];

    let ret = unsafe {
        libswisseph_sys::swe_calc_ut(
            julian_day,
            planet.swe_id(),
            flags,
            xx.as_mut_ptr(),
            serr.as_mut_ptr(),
        )
    };

    if ret < 0 {
        let error_msg = unsafe {
            let c_str = std::ffi::CStr::from_ptr(serr.as_ptr());
            c_str.to_string_lossy().to_string()
        };
        return Err(format!("Swiss Ephemeris error: {}", error_msg));
    }

    Ok((xx[0], xx[3]))
}

/// Compute one body with the SWIEPH → MOSEPH precision fallback.
pub fn snapshot_body(julian_day: f64, planet: Planet) -> BodySnapshot {
    init_ephemeris(None);

    let mut last_err = String::new();
    for flags in [SEFLG_SWIEPH | SEFLG_SPEED, SEFLG_MOSEPH | SEFLG_SPEED] {
        match calc_body(julian_day, planet, flags) {
            Ok((lon, speed_lon)) => {
                return BodySnapshot {
                    lon,
                    speed_lon,
                    retro: speed_lon < 0.0,
                    error: None,
                }
            }
            Err(err) => last_err = err,
        }
    }
    tracing::warn!(planet = %planet, error = %last_err, "body degraded to sentinel");
    BodySnapshot::degraded(last_err)
}

/// Snapshot all ten bodies at a Julian Day. Never fails: a body the library
/// rejects in both modes appears as a zeroed, error-tagged entry.
pub fn snapshot_all(julian_day: f64) -> BTreeMap<Planet, BodySnapshot> {
    Planet::all()
        .iter()
        .map(|p| (*p, snapshot_body(julian_day, *p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn julian_day_at_j2000() {
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let jd = datetime_to_julian_day(dt);
        // J2000.0 epoch is Julian Day 2451545.0 (noon); midnight is .5 earlier
        assert!((jd - 2451544.5).abs() < 0.01);
    }

    #[test]
    fn julian_day_monotone_in_wall_clock() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap();
        let c = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let (ja, jb, jc) = (
            datetime_to_julian_day(a),
            datetime_to_julian_day(b),
            datetime_to_julian_day(c),
        );
        assert!(ja < jb && jb < jc);
        assert!((jc - ja - 1.0).abs() < 1e-9);
    }

    #[test]
    fn resolve_now_accepts_z_and_offset() {
        let z = resolve_now(Some("2024-06-01T12:00:00Z"));
        let off = resolve_now(Some("2024-06-01T07:00:00-05:00"));
        assert_eq!(z, off);
    }

    #[test]
    fn resolve_now_falls_back_silently() {
        let before = Utc::now();
        let got = resolve_now(Some("not a timestamp"));
        let after = Utc::now();
        assert!(got >= before && got <= after);

        let got = resolve_now(None);
        assert!(got >= before);
    }

    #[test]
    fn snapshot_has_all_bodies() {
        init_ephemeris(None);
        let dt = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let snap = snapshot_all(datetime_to_julian_day(dt));
        assert_eq!(snap.len(), 10);

        // Sun around 280° (Capricorn) on Jan 1, 2000
        let sun = &snap[&Planet::Sun];
        assert!(sun.error.is_none());
        assert!(sun.lon > 270.0 && sun.lon < 290.0);
    }
}
