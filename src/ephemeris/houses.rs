//! House system calculations using Swiss Ephemeris

// Placidus is the only system the service exposes
pub const HOUSE_PLACIDUS: i8 = b'P' as i8;

/// Result of house calculation
#[derive(Debug, Clone)]
pub struct HousePositions {
    /// Ascendant (1st house cusp)
    pub ascendant: f64,
    /// Midheaven (10th house cusp)
    pub midheaven: f64,
    /// House cusps (12 houses, index 0 = 1st house)
    pub cusps: [f64; 12],
}

impl HousePositions {
    fn zeroed() -> Self {
        Self {
            ascendant: 0.0,
            midheaven: 0.0,
            cusps: [0.0; 12],
        }
    }
}

/// Calculate Placidus house positions for a given time and location
pub fn calc_houses(julian_day: f64, latitude: f64, longitude: f64) -> Result<HousePositions, String> {
    super::calculator::init_ephemeris(None);

    // Swiss Ephemeris uses a 13-element array for cusps (index 1-12)
    // and a 10-element array for special points
    let mut cusps: [f64; 13] = [0.0; 13];
    let mut ascmc: [f64; 10] = [0.0; 10];

    let ret = unsafe {
        libswisseph_sys::swe_houses(
            julian_day,
            latitude,
            longitude,
            HOUSE_PLACIDUS as i32,
            cusps.as_mut_ptr(),
            ascmc.as_mut_ptr(),
        )
    };

    if ret < 0 {
        return Err("Failed to calculate houses".to_string());
    }

    let mut house_cusps: [f64; 12] = [0.0; 12];
    house_cusps.copy_from_slice(&cusps[1..13]);

    Ok(HousePositions {
        ascendant: ascmc[0],
        midheaven: ascmc[1],
        cusps: house_cusps,
    })
}

/// Degrade-don't-abort variant: a failed house calculation yields all-zero
/// cusps and angles so the rest of the response can still be assembled.
pub fn houses_or_zero(julian_day: f64, latitude: f64, longitude: f64) -> HousePositions {
    match calc_houses(julian_day, latitude, longitude) {
        Ok(h) => h,
        Err(err) => {
            tracing::warn!(%err, latitude, longitude, "house calculation degraded to zeros");
            HousePositions::zeroed()
        }
    }
}

/// Determine which house (1-12) a longitude falls in. A point is in a house
/// when it sits between that house's cusp and the next, with wrap-around at
/// 0°/360°.
pub fn house_of(point_longitude: f64, house_cusps: &[f64; 12]) -> u8 {
    let lon = point_longitude.rem_euclid(360.0);

    for i in 0..12 {
        let cusp_start = house_cusps[i];
        let cusp_end = house_cusps[(i + 1) % 12];

        let in_house = if cusp_start <= cusp_end {
            lon >= cusp_start && lon < cusp_end
        } else {
            lon >= cusp_start || lon < cusp_end
        };

        if in_house {
            return (i + 1) as u8;
        }
    }

    1
}
