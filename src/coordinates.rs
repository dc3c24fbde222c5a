//! Frame conversions between ephemeris-native coordinates and scene space.
//!
//! Every axis swap in the crate lives here. Ephemeris routines produce
//! right-handed, ecliptic-plane (heliocentric) or equatorial (Earth-centred)
//! kilometres; the renderer wants scene units with "north" along +Y. Callers
//! must never re-derive these mappings locally.

use chrono::{DateTime, Datelike, Timelike, Utc};
use glam::DVec3;

use crate::scale::{EARTH_RADIUS_KM, to_scene_units};

/// Compute the Julian Date (UTC) for a given timestamp.
/// Uses the standard Gregorian calendar to JD conversion.
pub fn julian_date_utc(t: DateTime<Utc>) -> f64 {
    let mut y = t.year();
    let mut m = t.month() as i32;
    let d = t.day() as i32;

    // Convert time of day to fraction of day
    let hour = t.hour() as f64;
    let minute = t.minute() as f64;
    let sec = t.second() as f64 + (t.nanosecond() as f64) * 1e-9_f64;
    let day_fraction = (hour + (minute + sec / 60.0) / 60.0) / 24.0;

    if m <= 2 {
        y -= 1;
        m += 12;
    }

    let a = (y as f64 / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    let jd0 = (365.25 * (y as f64 + 4716.0)).floor()
        + (30.6001 * ((m + 1) as f64)).floor()
        + d as f64
        + b
        - 1524.5;

    jd0 + day_fraction
}

/// Days elapsed since the J2000.0 epoch (2000-01-01 12:00 UTC).
pub fn days_since_j2000(t: DateTime<Utc>) -> f64 {
    julian_date_utc(t) - 2451545.0
}

/// Greenwich Mean Sidereal Time (radians) using the IAU 1982 polynomial.
/// Assumes UT1 ~= UTC, which is good enough for visualization.
pub fn gmst_rad(t: DateTime<Utc>) -> f64 {
    let t_cent = days_since_j2000(t) / 36525.0;

    // GMST in seconds (IAU 1982 with update terms). See Vallado.
    let gmst_sec =
        67310.54841 + (876600.0 * 3600.0 + 8640184.812866) * t_cent + 0.093104 * t_cent * t_cent
            - 6.2e-6 * t_cent * t_cent * t_cent;

    let sec_in_day = 86400.0_f64;
    let mut s = gmst_sec % sec_in_day;
    if s < 0.0 {
        s += sec_in_day;
    }

    s * (std::f64::consts::TAU / sec_in_day)
}

/// Rotate ECI (TEME) -> ECEF using a simple GMST rotation about Z.
/// The standard transformation rotates by -GMST (clockwise viewed from +Z).
pub fn eci_to_ecef_km(eci: DVec3, gmst: f64) -> DVec3 {
    let (s, c) = gmst.sin_cos();
    let x = c * eci.x + s * eci.y;
    let y = -s * eci.x + c * eci.y;
    DVec3::new(x, y, eci.z)
}

/// Map heliocentric ecliptic kilometres into scene units.
///
/// The ecliptic frame is right-handed with +Z toward ecliptic north; the
/// scene wants north along +Y, so Y and Z swap here and nowhere else.
pub fn ecliptic_to_scene(helio_km: DVec3) -> DVec3 {
    DVec3::new(
        to_scene_units(helio_km.x),
        to_scene_units(helio_km.z),
        to_scene_units(helio_km.y),
    )
}

/// Map ECEF kilometres into scene units.
///
/// Scene (x, y, z) = (ECEF.y, ECEF.z, ECEF.x): the polar axis becomes scene
/// +Y and the prime meridian faces scene +Z.
pub fn ecef_to_scene(ecef_km: DVec3) -> DVec3 {
    DVec3::new(
        to_scene_units(ecef_km.y),
        to_scene_units(ecef_km.z),
        to_scene_units(ecef_km.x),
    )
}

/// Sub-satellite point: geocentric latitude/longitude under an ECEF position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubPoint {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl SubPoint {
    /// Geocentric subpoint directly below an ECEF position.
    pub fn from_ecef(ecef_km: DVec3) -> Self {
        let r = ecef_km.length();
        if r == 0.0 {
            return Self {
                lat_deg: 0.0,
                lon_deg: 0.0,
            };
        }
        SubPoint {
            lat_deg: (ecef_km.z / r).asin().to_degrees(),
            lon_deg: ecef_km.y.atan2(ecef_km.x).to_degrees(),
        }
    }

    /// Project this subpoint onto a globe of the given scene-unit radius.
    pub fn point_on_globe(&self, radius_scene: f64) -> DVec3 {
        let lat = self.lat_deg.to_radians();
        let lon = self.lon_deg.to_radians();
        let z = lat.sin();
        let mut r = lat.cos();
        // Clamp residual radius near the poles to avoid artifacts from
        // quantization of 90 degrees.
        if (std::f64::consts::FRAC_PI_2 - lat.abs()).abs() < 1e-9 {
            r = 0.0;
        }
        let ecef_unit = DVec3::new(lon.cos() * r, lon.sin() * r, z);
        // Reuse the ECEF axis remap; scale is applied to the unit vector.
        let scene_unit = DVec3::new(ecef_unit.y, ecef_unit.z, ecef_unit.x);
        scene_unit * radius_scene
    }
}

/// Globe radius of the satellite-tracker scene, in scene units.
pub fn globe_radius_scene() -> f64 {
    to_scene_units(EARTH_RADIUS_KM)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_julian_date_j2000_noon() {
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let jd = julian_date_utc(t);
        assert!((jd - 2451545.0).abs() < 1e-9, "jd = {}", jd);
    }

    #[test]
    fn test_julian_date_leap_day() {
        let feb_28 = Utc.with_ymd_and_hms(2000, 2, 28, 12, 0, 0).unwrap();
        let mar_01 = Utc.with_ymd_and_hms(2000, 3, 1, 12, 0, 0).unwrap();
        let diff = julian_date_utc(mar_01) - julian_date_utc(feb_28);
        assert!((diff - 2.0).abs() < 1e-9, "2000 is a leap year: {}", diff);
    }

    #[test]
    fn test_gmst_rad_j2000_known_value() {
        // GMST at J2000.0 is 280.46061837 degrees.
        let t = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let deg = gmst_rad(t).to_degrees();
        let diff = (deg - 280.46061837_f64).abs();
        assert!(diff < 0.05, "gmst deg diff too large: {} deg", diff);
    }

    #[test]
    fn test_eci_to_ecef_km() {
        let eci = DVec3::new(1000.0, 0.0, 0.0);
        let ecef = eci_to_ecef_km(eci, 0.0);
        assert!((ecef.x - 1000.0).abs() < 1e-10);
        assert!(ecef.y.abs() < 1e-10);

        let ecef_90 = eci_to_ecef_km(eci, std::f64::consts::FRAC_PI_2);
        assert!(ecef_90.x.abs() < 1e-10);
        assert!((ecef_90.y + 1000.0).abs() < 1e-10);
        assert!(ecef_90.z.abs() < 1e-10);
    }

    #[test]
    fn test_eci_to_ecef_preserves_length() {
        let eci = DVec3::new(6371.0, 1000.0, 500.0);
        for gmst in [0.0, 1.0, 2.5, std::f64::consts::PI] {
            let ecef = eci_to_ecef_km(eci, gmst);
            assert!((ecef.length() - eci.length()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_ecliptic_axis_swap() {
        let v = ecliptic_to_scene(DVec3::new(0.0, 0.0, crate::scale::KM_PER_AU));
        // Ecliptic north ends up along scene +Y.
        assert!((v.y - crate::scale::SCENE_UNITS_PER_AU).abs() < 1e-9);
        assert!(v.x.abs() < 1e-12);
        assert!(v.z.abs() < 1e-12);
    }

    #[test]
    fn test_ecef_axis_swap() {
        let v = ecef_to_scene(DVec3::new(1000.0, 0.0, 0.0));
        assert!(v.x.abs() < 1e-12);
        assert!(v.y.abs() < 1e-12);
        assert!((v.z - to_scene_units(1000.0)).abs() < 1e-12);

        let polar = ecef_to_scene(DVec3::new(0.0, 0.0, 1000.0));
        assert!((polar.y - to_scene_units(1000.0)).abs() < 1e-12);
    }

    #[test]
    fn test_subpoint_equator_prime_meridian() {
        let sp = SubPoint::from_ecef(DVec3::new(7000.0, 0.0, 0.0));
        assert!(sp.lat_deg.abs() < 1e-9);
        assert!(sp.lon_deg.abs() < 1e-9);

        let p = sp.point_on_globe(1.0);
        assert!((p.length() - 1.0).abs() < 1e-12);
        assert!((p.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_subpoint_north_pole() {
        let sp = SubPoint::from_ecef(DVec3::new(0.0, 0.0, 7000.0));
        assert!((sp.lat_deg - 90.0).abs() < 1e-9);

        let p = sp.point_on_globe(2.0);
        assert!((p.y - 2.0).abs() < 1e-9);
        assert!(p.x.abs() < 1e-9);
        assert!(p.z.abs() < 1e-9);
    }

    #[test]
    fn test_subpoint_altitude_independent() {
        let low = SubPoint::from_ecef(DVec3::new(4000.0, 3000.0, 2000.0));
        let high = SubPoint::from_ecef(DVec3::new(8000.0, 6000.0, 4000.0));
        assert!((low.lat_deg - high.lat_deg).abs() < 1e-9);
        assert!((low.lon_deg - high.lon_deg).abs() < 1e-9);
    }

    #[test]
    fn test_subpoint_degenerate_origin() {
        let sp = SubPoint::from_ecef(DVec3::ZERO);
        assert_eq!(sp.lat_deg, 0.0);
        assert_eq!(sp.lon_deg, 0.0);
    }
}
