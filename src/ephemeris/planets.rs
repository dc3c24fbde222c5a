//! Planet and moon positioning from Keplerian elements.

use chrono::{DateTime, Utc};
use glam::DVec3;

use crate::bodies::Elements;
use crate::ephemeris::kepler;

/// Heliocentric ecliptic position of a planet, km.
pub fn planet_km(elements: &Elements, time: DateTime<Utc>) -> DVec3 {
    kepler::position_at(elements, time)
}

/// Heliocentric ecliptic position of a moon, km: the parent planet's
/// position plus the moon's parent-relative ellipse.
pub fn moon_km(parent: &Elements, elements: &Elements, time: DateTime<Utc>) -> DVec3 {
    kepler::position_at(parent, time) + kepler::position_at(elements, time)
}
