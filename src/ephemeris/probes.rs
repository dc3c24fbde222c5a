//! Deep-space probe positioning from fitted trajectory tables.

use chrono::{DateTime, Utc};
use glam::DVec3;
use tracing::debug;

use crate::bodies::TrajectoryTable;

/// Heliocentric ecliptic position of a probe, km, plus whether the value
/// was extrapolated beyond the recorded trajectory.
///
/// Inside the table the position is linearly interpolated between the
/// bracketing samples. Before mission start or after the last data point the
/// nearest segment is extended linearly; the position is still returned so
/// the probe never vanishes, but it is flagged so callers can suppress
/// trail rendering past the data.
pub fn position_km(table: &TrajectoryTable, time: DateTime<Utc>) -> (DVec3, bool) {
    let samples = table.samples();
    let idx = samples.partition_point(|s| s.time <= time);

    // Clamp to the first/last segment; out-of-range times extrapolate it.
    let seg = idx.clamp(1, samples.len() - 1);
    let (s0, s1) = (&samples[seg - 1], &samples[seg]);

    let span = seconds_between(s0.time, s1.time);
    let offset = seconds_between(s0.time, time);
    let t = offset / span;

    let position = s0.position_km + (s1.position_km - s0.position_km) * t;
    let extrapolated = time < table.mission_start() || time > table.mission_end();
    if extrapolated {
        debug!(
            "probe position at {} extrapolated beyond trajectory data ({} .. {})",
            time,
            table.mission_start(),
            table.mission_end()
        );
    }
    (position, extrapolated)
}

fn seconds_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    let delta = b - a;
    delta.num_seconds() as f64 + delta.subsec_nanos() as f64 * 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::TrajectorySample;
    use chrono::TimeZone;

    fn table() -> TrajectoryTable {
        let t0 = Utc.with_ymd_and_hms(1977, 9, 5, 0, 0, 0).unwrap();
        let day = chrono::Duration::days(100);
        TrajectoryTable::new(vec![
            TrajectorySample {
                time: t0,
                position_km: DVec3::new(0.0, 0.0, 0.0),
            },
            TrajectorySample {
                time: t0 + day,
                position_km: DVec3::new(1000.0, 0.0, 0.0),
            },
            TrajectorySample {
                time: t0 + day * 2,
                position_km: DVec3::new(2000.0, 1000.0, 0.0),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_interpolates_between_samples() {
        let table = table();
        let t = table.mission_start() + chrono::Duration::days(50);
        let (pos, extrapolated) = position_km(&table, t);
        assert!(!extrapolated);
        assert!((pos - DVec3::new(500.0, 0.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_exact_sample_times() {
        let table = table();
        let (pos, extrapolated) = position_km(&table, table.mission_start());
        assert!(!extrapolated);
        assert!(pos.length() < 1e-9);

        let (pos, extrapolated) = position_km(&table, table.mission_end());
        assert!(!extrapolated);
        assert!((pos - DVec3::new(2000.0, 1000.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn test_extrapolates_past_last_sample() {
        let table = table();
        let t = table.mission_end() + chrono::Duration::days(100);
        let (pos, extrapolated) = position_km(&table, t);
        assert!(extrapolated);
        // Last segment continues linearly: +1000 x, +1000 y per 100 days.
        assert!((pos - DVec3::new(3000.0, 2000.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_extrapolates_before_mission_start() {
        let table = table();
        let t = table.mission_start() - chrono::Duration::days(50);
        let (pos, extrapolated) = position_km(&table, t);
        assert!(extrapolated);
        assert!((pos - DVec3::new(-500.0, 0.0, 0.0)).length() < 1e-6);
    }
}
