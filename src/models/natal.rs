use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

/// Natal block of a `/astro/fullpro` request. Everything is optional;
/// anything missing or malformed downgrades the request to "no natal".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NatalInput {
    pub meta: Option<NatalMeta>,
}

/// Birth data carried under `natal.meta`
#[derive(Debug, Clone, Deserialize)]
pub struct NatalMeta {
    /// Local birth datetime, `YYYY-MM-DDTHH:MM` or with seconds
    pub birth_local: Option<String>,
    /// Minutes east of UTC
    pub tz_offset_min: Option<i32>,
    /// IANA timezone name; preferred over the raw offset when it parses
    pub tz_name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl NatalMeta {
    /// Resolve the birth moment to UTC.
    ///
    /// An IANA timezone name wins when present and valid; otherwise the
    /// minute offset applies; otherwise the local time is taken as UTC.
    /// Returns `None` only when `birth_local` is absent or unparseable.
    pub fn birth_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.birth_local.as_deref()?;
        let local = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
            .ok()?;

        if let Some(tz) = self.tz_name.as_deref().and_then(|n| n.parse::<Tz>().ok()) {
            if let Some(dt) = tz.from_local_datetime(&local).single() {
                return Some(dt.with_timezone(&Utc));
            }
        }

        let offset_min = self.tz_offset_min.unwrap_or(0);
        let offset = offset_min.checked_mul(60).and_then(FixedOffset::east_opt)?;
        offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Birth coordinates, when both are present
    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lon?))
    }
}

/// A fixed reference longitude in the natal chart: a body, the Ascendant
/// or the Midheaven.
#[derive(Debug, Clone)]
pub struct NatalPoint {
    pub label: String,
    pub lon: f64,
}
