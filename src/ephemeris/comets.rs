//! Comet positioning and tail geometry.

use chrono::{DateTime, Utc};
use glam::DVec3;

use crate::bodies::Elements;
use crate::coordinates::ecliptic_to_scene;
use crate::ephemeris::{Tail, kepler};
use crate::scale::{KM_PER_AU, from_au};

/// Heliocentric distance beyond which no tail is rendered, AU.
pub const TAIL_VISIBLE_AU: f64 = 5.0;

/// Tail length clamp, AU.
pub const TAIL_MAX_AU: f64 = 3.0;

/// Scene position, scene distance from the Sun, and tail geometry for a
/// comet at the given time.
pub fn comet_state(elements: &Elements, time: DateTime<Utc>) -> (DVec3, f64, Option<Tail>) {
    let helio_km = kepler::position_at(elements, time);
    let scene = ecliptic_to_scene(helio_km);
    let distance = scene.length();

    let dist_au = helio_km.length() / KM_PER_AU;
    let tail = tail_for(scene, dist_au);

    (scene, distance, tail)
}

/// Tails point away from the Sun; length falls off as 5/sqrt(r), clamped,
/// and disappears entirely outside the visibility radius.
fn tail_for(scene: DVec3, dist_au: f64) -> Option<Tail> {
    if dist_au > TAIL_VISIBLE_AU || dist_au <= 0.0 {
        return None;
    }
    let direction = scene.try_normalize()?;
    let length_au = (5.0 / dist_au.sqrt()).min(TAIL_MAX_AU);
    Some(Tail {
        direction,
        length: from_au(length_au),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn halley_elements() -> Elements {
        Elements {
            semi_major_axis_au: 17.834,
            eccentricity: 0.96714,
            inclination_deg: 162.262,
            ascending_node_deg: 58.42,
            arg_periapsis_deg: 111.33,
            mean_anomaly_epoch_deg: 0.0,
            epoch: Utc.with_ymd_and_hms(1986, 2, 9, 0, 0, 0).unwrap(),
            period_days: 27510.0,
        }
    }

    #[test]
    fn test_tail_present_at_perihelion() {
        let elements = halley_elements();
        // Epoch is the 1986 perihelion: r = a(1 - e) ~ 0.586 AU.
        let (scene, distance, tail) = comet_state(&elements, elements.epoch);
        assert!(distance > 0.0);
        let tail = tail.expect("tail must be visible near perihelion");

        // Direction is the unit Sun->comet vector.
        assert!((tail.direction.length() - 1.0).abs() < 1e-9);
        assert!(tail.direction.dot(scene) > 0.0);

        // 5/sqrt(0.586) > 3, so the clamp applies.
        assert!((tail.length - from_au(TAIL_MAX_AU)).abs() < 1e-9);
    }

    #[test]
    fn test_no_tail_far_from_sun() {
        let elements = halley_elements();
        // Half a period past perihelion is aphelion, ~35 AU out.
        let aphelion =
            elements.epoch + chrono::Duration::days((elements.period_days / 2.0) as i64);
        let (_, _, tail) = comet_state(&elements, aphelion);
        assert!(tail.is_none());
    }

    #[test]
    fn test_tail_length_falls_off_with_distance() {
        let mut near = Elements {
            eccentricity: 0.0,
            semi_major_axis_au: 3.0,
            ..halley_elements()
        };
        near.inclination_deg = 0.0;
        let far = Elements {
            semi_major_axis_au: 4.5,
            ..near
        };
        let (_, _, tail_near) = comet_state(&near, near.epoch);
        let (_, _, tail_far) = comet_state(&far, far.epoch);
        let tail_near = tail_near.unwrap();
        let tail_far = tail_far.unwrap();
        assert!(
            tail_near.length > tail_far.length,
            "{} vs {}",
            tail_near.length,
            tail_far.length
        );
        // Unclamped regime: length = 5/sqrt(r).
        assert!((tail_near.length - from_au(5.0 / 3.0_f64.sqrt())).abs() < 1e-9);
    }
}
