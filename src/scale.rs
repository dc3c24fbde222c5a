//! Scene scale and unit conversions.
//!
//! `SCENE_UNITS_PER_AU` is the single conversion anchor for the whole crate:
//! every other distance constant is derived from it so independently-built
//! scenes cannot drift apart in scale.

use crate::bodies::BodyClass;

/// Scene units per astronomical unit. The sole scale anchor.
pub const SCENE_UNITS_PER_AU: f64 = 100.0;

/// Kilometres per astronomical unit (IAU 2012 definition).
pub const KM_PER_AU: f64 = 149_597_870.7;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Radial lift applied to ground-track points so they sit just above the
/// globe mesh instead of z-fighting with it.
pub const GROUND_TRACK_LIFT: f64 = 1.002;

/// Convert kilometres to scene units.
pub fn to_scene_units(km: f64) -> f64 {
    km / KM_PER_AU * SCENE_UNITS_PER_AU
}

/// Convert astronomical units to scene units.
pub fn from_au(au: f64) -> f64 {
    au * SCENE_UNITS_PER_AU
}

/// Display radius in scene units for a body class.
///
/// These are visibility overrides, not physical radii: a true-to-scale planet
/// is sub-pixel at solar-system distances, so each class gets a fixed radius
/// that reads well in its scene.
pub fn display_radius(class: BodyClass) -> f64 {
    match class {
        BodyClass::Planet => from_au(0.008),
        BodyClass::Moon => from_au(0.003),
        BodyClass::Probe => from_au(0.002),
        BodyClass::Comet => from_au(0.0025),
        // Satellites live in the globe scene; match a ~150 km marker sphere.
        BodyClass::Satellite => to_scene_units(150.0),
    }
}

/// Camera offset magnitude used when framing a focused body (or the whole
/// system for `None`), in scene units.
pub fn framing_distance(class: Option<BodyClass>) -> f64 {
    match class {
        None => from_au(45.0),
        Some(BodyClass::Planet) => from_au(0.35),
        Some(BodyClass::Moon) => from_au(0.08),
        Some(BodyClass::Probe) => from_au(0.15),
        Some(BodyClass::Comet) => from_au(0.25),
        Some(BodyClass::Satellite) => to_scene_units(5000.0),
    }
}
