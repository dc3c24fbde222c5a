//! Path sampling: orbit ellipses, probe trails, and ground tracks.
//!
//! Samples are cached per body inside the owning scene context and only
//! recomputed when simulated time drifts past a class-specific threshold.
//! Recomputing every animation frame is a performance bug, not a tuning
//! knob.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use glam::DVec3;

use crate::bodies::{Body, BodyClass, BodyId, BodyModel};
use crate::coordinates::{ecliptic_to_scene, globe_radius_scene};
use crate::ephemeris::{Ephemeris, kepler};
use crate::scale::GROUND_TRACK_LIFT;

/// Orbit paths are stable over an hour of simulated time.
pub const ORBIT_REFRESH_SIM_SECS: i64 = 3600;

/// Ground tracks march with the clock; refresh at most once per wall second.
pub const GROUND_TRACK_REFRESH_WALL_SECS: f64 = 1.0;

/// Ground-track window half-width, simulated minutes.
pub const GROUND_TRACK_HALF_WINDOW_MIN: i64 = 45;

/// What kind of geometry a path sample describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Full revolution; first and last points coincide.
    ClosedOrbit,
    /// Open arc from mission start to the current instant.
    Trajectory,
    /// Recent + look-ahead track on the globe surface.
    GroundTrack,
}

/// An ordered, time-monotonic sequence of scene-space points.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSample {
    pub kind: PathKind,
    pub points: Vec<DVec3>,
    /// Simulated time window the sample covers.
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Sample a body's path around the given instant.
///
/// Closed orbits step mean anomaly, not time, so fast perihelion passages
/// get as many vertices as the slow aphelion arc. The window is centred on
/// `time`, putting the body's current position mid-array.
pub fn sample_path(
    eph: &Ephemeris,
    body: &Body,
    time: DateTime<Utc>,
    sample_count: usize,
) -> PathSample {
    match &body.model {
        BodyModel::Planet { elements } | BodyModel::Comet { elements } => {
            closed_orbit(elements, DVec3::ZERO, time, sample_count)
        }
        BodyModel::Moon { parent, elements } => {
            // The moon's ellipse rides on the parent position frozen at `time`.
            let parent_body = eph.expect_body(parent);
            let parent_km = match &parent_body.model {
                BodyModel::Planet { elements } => kepler::position_at(elements, time),
                _ => unreachable!("moon parent validated as planet"),
            };
            closed_orbit(elements, parent_km, time, sample_count)
        }
        BodyModel::Probe { trajectory } => {
            let start = trajectory.mission_start();
            let mut points = Vec::new();
            if time > start {
                let sample_count = sample_count.max(2);
                points.reserve(sample_count);
                let total = seconds_between(start, time);
                for i in 0..sample_count {
                    let f = i as f64 / (sample_count - 1) as f64;
                    let t = start + Duration::nanoseconds((total * f * 1e9) as i64);
                    let (km, _) = crate::ephemeris::probes::position_km(trajectory, t);
                    points.push(ecliptic_to_scene(km));
                }
            }
            PathSample {
                kind: PathKind::Trajectory,
                points,
                start,
                end: time,
            }
        }
        BodyModel::Satellite { .. } => {
            let model = eph
                .sat_model(&body.id)
                .unwrap_or_else(|| panic!("no propagator for satellite {}", body.id));
            let radius = globe_radius_scene() * GROUND_TRACK_LIFT;
            let start = time - Duration::minutes(GROUND_TRACK_HALF_WINDOW_MIN);
            let end = time + Duration::minutes(GROUND_TRACK_HALF_WINDOW_MIN);
            let points = (0..=2 * GROUND_TRACK_HALF_WINDOW_MIN)
                .map(|i| {
                    let t = start + Duration::minutes(i);
                    model.subpoint(t).point_on_globe(radius)
                })
                .collect();
            PathSample {
                kind: PathKind::GroundTrack,
                points,
                start,
                end,
            }
        }
    }
}

fn closed_orbit(
    elements: &crate::bodies::Elements,
    offset_km: DVec3,
    time: DateTime<Utc>,
    sample_count: usize,
) -> PathSample {
    let sample_count = sample_count.max(2);
    let m_center = kepler::mean_anomaly_at(elements, time);
    let half_period = Duration::seconds((elements.period_days * 86400.0 / 2.0) as i64);
    let mut points = Vec::with_capacity(sample_count + 1);
    for i in 0..=sample_count {
        let m = m_center - std::f64::consts::PI
            + std::f64::consts::TAU * i as f64 / sample_count as f64;
        let km = offset_km + kepler::position_at_mean_anomaly(elements, m);
        points.push(ecliptic_to_scene(km));
    }
    PathSample {
        kind: PathKind::ClosedOrbit,
        points,
        start: time - half_period,
        end: time + half_period,
    }
}

fn seconds_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let delta = b - a;
    delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9
}

struct CacheEntry {
    sample: PathSample,
    sim_time: DateTime<Utc>,
    wall: f64,
    count: usize,
}

/// Per-scene path cache. Lives inside the scene context and dies with it.
#[derive(Default)]
pub struct PathCache {
    entries: HashMap<BodyId, CacheEntry>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached path for a body, recomputed only when stale.
    pub fn path(
        &mut self,
        eph: &Ephemeris,
        body: &Body,
        time: DateTime<Utc>,
        wall_now: f64,
        sample_count: usize,
    ) -> &PathSample {
        let stale = match self.entries.get(&body.id) {
            None => true,
            Some(entry) => {
                entry.count != sample_count
                    || match body.class() {
                        BodyClass::Satellite => {
                            wall_now - entry.wall >= GROUND_TRACK_REFRESH_WALL_SECS
                        }
                        _ => {
                            (time - entry.sim_time).num_seconds().abs() >= ORBIT_REFRESH_SIM_SECS
                        }
                    }
            }
        };
        if stale {
            let sample = sample_path(eph, body, time, sample_count);
            self.entries.insert(
                body.id.clone(),
                CacheEntry {
                    sample,
                    sim_time: time,
                    wall: wall_now,
                    count: sample_count,
                },
            );
        }
        &self.entries[&body.id].sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::{BodyCatalog, TrajectorySample, TrajectoryTable, catalog};
    use chrono::TimeZone;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn full_ephemeris() -> Ephemeris {
        let mut bodies: Vec<Body> = catalog::builtin().iter().cloned().collect();
        let t0 = Utc.with_ymd_and_hms(1977, 9, 5, 0, 0, 0).unwrap();
        let samples = (0..4i64)
            .map(|i| TrajectorySample {
                time: t0 + Duration::days(400 * i),
                position_km: DVec3::new(1.0e8 + 5.0e7 * i as f64, 3.0e7 * i as f64, 0.0),
            })
            .collect();
        bodies.push(Body {
            id: BodyId::new("voyager-1"),
            name: "Voyager 1".to_string(),
            color: [0.9, 0.9, 0.9],
            display_radius: None,
            model: BodyModel::Probe {
                trajectory: TrajectoryTable::new(samples).unwrap(),
            },
        });
        bodies.push(
            Body::satellite("iss", "ISS (ZARYA)", [1.0, 1.0, 1.0], ISS_LINE1, ISS_LINE2)
                .unwrap(),
        );
        Ephemeris::new(BodyCatalog::from_bodies(bodies).unwrap()).unwrap()
    }

    #[test]
    fn test_closed_orbit_endpoints_coincide() {
        let eph = full_ephemeris();
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        for id in ["earth", "halley", "moon"] {
            let body = eph.expect_body(&BodyId::new(id));
            let path = sample_path(&eph, body, t, 256);
            assert_eq!(path.kind, PathKind::ClosedOrbit);
            assert_eq!(path.points.len(), 257);
            let gap = (path.points[0] - path.points[path.points.len() - 1]).length();
            assert!(gap < 1e-6, "{} closed path gap {}", id, gap);
        }
    }

    #[test]
    fn test_current_position_lies_mid_array() {
        let eph = full_ephemeris();
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let body = eph.expect_body(&BodyId::new("earth"));
        let path = sample_path(&eph, body, t, 128);
        let current = eph.position(body, t).scene;
        let mid = path.points[64];
        assert!(
            (current - mid).length() < 1e-9,
            "mid-array point is {} scene units from the body",
            (current - mid).length()
        );
    }

    #[test]
    fn test_probe_trail_never_extends_beyond_now() {
        let eph = full_ephemeris();
        let body = eph.expect_body(&BodyId::new("voyager-1"));
        let t = Utc.with_ymd_and_hms(1980, 1, 1, 0, 0, 0).unwrap();
        let path = sample_path(&eph, body, t, 64);
        assert_eq!(path.kind, PathKind::Trajectory);
        assert_eq!(path.points.len(), 64);
        assert_eq!(path.end, t);
        // The last trail point is the probe's current position.
        let current = eph.position(body, t).scene;
        assert!((path.points[63] - current).length() < 1e-9);
    }

    #[test]
    fn test_probe_trail_empty_before_launch() {
        let eph = full_ephemeris();
        let body = eph.expect_body(&BodyId::new("voyager-1"));
        let t = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();
        let path = sample_path(&eph, body, t, 64);
        assert!(path.points.is_empty());
    }

    #[test]
    fn test_ground_track_geometry() {
        let eph = full_ephemeris();
        let body = eph.expect_body(&BodyId::new("iss"));
        let t = Utc.with_ymd_and_hms(2008, 9, 20, 13, 0, 0).unwrap();
        let path = sample_path(&eph, body, t, 0);
        assert_eq!(path.kind, PathKind::GroundTrack);
        // One point per simulated minute over +/- 45 minutes.
        assert_eq!(path.points.len(), 91);
        let radius = globe_radius_scene() * GROUND_TRACK_LIFT;
        for p in &path.points {
            assert!((p.length() - radius).abs() < 1e-9, "off-globe point");
        }
        assert_eq!(path.end - path.start, Duration::minutes(90));
    }

    #[test]
    fn test_cache_holds_within_threshold() {
        let eph = full_ephemeris();
        let mut cache = PathCache::new();
        let body = eph.expect_body(&BodyId::new("earth"));
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let first_start = cache.path(&eph, body, t, 0.0, 128).start;
        // Half an hour of simulated drift: cache holds.
        let later = t + Duration::minutes(30);
        assert_eq!(cache.path(&eph, body, later, 0.3, 128).start, first_start);
        // Two hours: recomputed around the new time.
        let much_later = t + Duration::hours(2);
        assert_ne!(
            cache.path(&eph, body, much_later, 0.6, 128).start,
            first_start
        );
    }

    #[test]
    fn test_cache_ground_track_refreshes_on_wall_clock() {
        let eph = full_ephemeris();
        let mut cache = PathCache::new();
        let body = eph.expect_body(&BodyId::new("iss"));
        let t = Utc.with_ymd_and_hms(2008, 9, 20, 13, 0, 0).unwrap();

        let first = cache.path(&eph, body, t, 0.0, 0).start;
        // Simulated time moved but less than a wall second passed: held.
        let t2 = t + Duration::minutes(5);
        assert_eq!(cache.path(&eph, body, t2, 0.5, 0).start, first);
        // A wall second later the track re-centres.
        assert_ne!(cache.path(&eph, body, t2, 1.5, 0).start, first);
    }

    #[test]
    fn test_cache_invalidates_on_sample_count_change() {
        let eph = full_ephemeris();
        let mut cache = PathCache::new();
        let body = eph.expect_body(&BodyId::new("earth"));
        let t = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(cache.path(&eph, body, t, 0.0, 64).points.len(), 65);
        assert_eq!(cache.path(&eph, body, t, 0.0, 256).points.len(), 257);
    }
}
