//! Kepler's equation and element-to-position conversion.

use chrono::{DateTime, Utc};
use glam::DVec3;
use std::f64::consts::TAU;

use crate::bodies::Elements;
use crate::scale::KM_PER_AU;

/// Iteration cap for the Newton solve. Convergence is quadratic; anything
/// still moving after this many steps is numerically hopeless input.
pub const MAX_ITERATIONS: usize = 50;

/// Convergence tolerance in radians.
pub const TOLERANCE: f64 = 1e-6;

/// Result of solving Kepler's equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly, radians.
    pub eccentric_anomaly: f64,
    /// Newton iterations taken to converge.
    pub iterations: usize,
}

/// Solve Kepler's equation M = E - e*sin(E) for E by Newton iteration.
///
/// Always returns a value: if the iteration cap is reached the current
/// estimate is used, which degrades accuracy rather than erroring.
pub fn solve(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    let m = mean_anomaly.rem_euclid(TAU);
    // High-eccentricity orbits converge poorly from E0 = M; start mid-orbit.
    let mut e_anom = if eccentricity > 0.8 { std::f64::consts::PI } else { m };
    let mut iterations = 0;

    while iterations < MAX_ITERATIONS {
        let delta =
            (e_anom - eccentricity * e_anom.sin() - m) / (1.0 - eccentricity * e_anom.cos());
        e_anom -= delta;
        iterations += 1;
        if delta.abs() < TOLERANCE {
            break;
        }
    }

    KeplerSolution {
        eccentric_anomaly: e_anom,
        iterations,
    }
}

/// True anomaly from eccentric anomaly.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin())
        .atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// Mean anomaly (radians) at a timestamp, advanced linearly from the epoch
/// value by the stated period.
pub fn mean_anomaly_at(elements: &Elements, time: DateTime<Utc>) -> f64 {
    let delta = time - elements.epoch;
    let days = delta.num_seconds() as f64 / 86400.0 + delta.subsec_nanos() as f64 / 86400.0e9;
    let m0 = elements.mean_anomaly_epoch_deg.to_radians();
    (m0 + TAU * days / elements.period_days).rem_euclid(TAU)
}

/// Position on the osculating ellipse at a given mean anomaly, in the
/// body-centred ecliptic frame (km). This is the sampling primitive; the
/// path sampler steps mean anomaly directly so perihelion passages stay
/// well-represented.
pub fn position_at_mean_anomaly(elements: &Elements, mean_anomaly: f64) -> DVec3 {
    let e = elements.eccentricity;
    let solution = solve(mean_anomaly, e);
    let ta = true_anomaly(solution.eccentric_anomaly, e);

    let r_au = elements.semi_major_axis_au * (1.0 - e * solution.eccentric_anomaly.cos());
    let xp = r_au * ta.cos();
    let yp = r_au * ta.sin();

    let (sin_lan, cos_lan) = elements.ascending_node_deg.to_radians().sin_cos();
    let (sin_argp, cos_argp) = elements.arg_periapsis_deg.to_radians().sin_cos();
    let (sin_inc, cos_inc) = elements.inclination_deg.to_radians().sin_cos();

    let x = xp * (cos_lan * cos_argp - sin_lan * sin_argp * cos_inc)
        - yp * (cos_lan * sin_argp + sin_lan * cos_argp * cos_inc);
    let y = xp * (sin_lan * cos_argp + cos_lan * sin_argp * cos_inc)
        - yp * (sin_lan * sin_argp - cos_lan * cos_argp * cos_inc);
    let z = xp * (sin_argp * sin_inc) + yp * (cos_argp * sin_inc);

    DVec3::new(x, y, z) * KM_PER_AU
}

/// Position on the osculating ellipse at a timestamp, ecliptic km.
pub fn position_at(elements: &Elements, time: DateTime<Utc>) -> DVec3 {
    position_at_mean_anomaly(elements, mean_anomaly_at(elements, time))
}
