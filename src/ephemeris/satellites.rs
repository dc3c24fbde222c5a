//! Earth-orbiting object propagation via SGP4.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use glam::DVec3;
use tracing::warn;

use crate::coordinates::{SubPoint, eci_to_ecef_km, gmst_rad};
use crate::tle::TleRecord;

/// Element sets older or newer than this relative to the requested time are
/// outside SGP4's accuracy envelope (~14 days).
pub const STALE_EPOCH_MINUTES: f64 = 14.0 * 24.0 * 60.0;

/// Calculate minutes since epoch for SGP4 propagation
pub fn minutes_since_epoch(sim_utc: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    let delta = sim_utc - epoch;
    delta.num_seconds() as f64 / 60.0 + (delta.subsec_nanos() as f64) / 60.0 / 1.0e9
}

/// A compiled SGP4 propagator for one satellite.
pub struct SatModel {
    constants: sgp4::Constants,
    epoch_utc: DateTime<Utc>,
}

impl SatModel {
    /// Build the propagator from a TLE record (sgp4 2.x: parse TLE ->
    /// Elements -> Constants), failing fast on element sets the model
    /// rejects. A throwaway epoch propagation validates the constants so
    /// later per-frame calls have a known-good fallback.
    pub fn compile(record: &TleRecord) -> anyhow::Result<Self> {
        let elements = sgp4::Elements::from_tle(
            record.name.clone(),
            record.line1.as_bytes(),
            record.line2.as_bytes(),
        )
        .map_err(|e| anyhow!("TLE elements: {}", e))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| anyhow!("SGP4 constants: {}", e))?;
        constants
            .propagate(sgp4::MinutesSinceEpoch(0.0))
            .map_err(|e| anyhow!("SGP4 epoch propagation: {}", e))?;
        Ok(Self {
            constants,
            epoch_utc: record.epoch_utc,
        })
    }

    pub fn epoch_utc(&self) -> DateTime<Utc> {
        self.epoch_utc
    }

    /// Propagate to the given time and rotate TEME -> ECEF, km.
    ///
    /// Total over any timestamp: far-from-epoch times degrade accuracy
    /// silently (one warning), and a propagation failure falls back to the
    /// epoch state so the object keeps rendering instead of vanishing.
    pub fn ecef_km(&self, time: DateTime<Utc>) -> DVec3 {
        let mins = minutes_since_epoch(time, self.epoch_utc);
        if mins.abs() > STALE_EPOCH_MINUTES {
            warn!(
                "propagating {:.1} days from TLE epoch; accuracy not guaranteed",
                mins / (24.0 * 60.0)
            );
        }
        let state = match self.constants.propagate(sgp4::MinutesSinceEpoch(mins)) {
            Ok(state) => state,
            Err(e) => {
                warn!("SGP4 propagation failed ({}); reusing epoch state", e);
                self.constants
                    .propagate(sgp4::MinutesSinceEpoch(0.0))
                    .expect("epoch propagation validated in compile()")
            }
        };
        let pos = state.position; // [f64; 3] in km (TEME)
        let eci = DVec3::new(pos[0], pos[1], pos[2]);
        eci_to_ecef_km(eci, gmst_rad(time))
    }

    /// Sub-satellite point at the given time.
    pub fn subpoint(&self, time: DateTime<Utc>) -> SubPoint {
        SubPoint::from_ecef(self.ecef_km(time))
    }
}
