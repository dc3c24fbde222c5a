//! Body descriptors.
//!
//! A [`Body`] is an immutable description of one object a scene can show:
//! identity, display hints, and the class-specific parameters its ephemeris
//! routine needs. Bodies are defined once at load time and never mutated.

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::tle::TleRecord;

pub mod catalog;

pub use catalog::BodyCatalog;

/// Stable identifier for a body, unique within a catalog.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub String);

impl BodyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BodyId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Body classification, which selects the propagation routine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyClass {
    Planet,
    Moon,
    Probe,
    Comet,
    Satellite,
}

/// Keplerian orbital elements at a stated epoch.
///
/// Angles are degrees, the semi-major axis is in astronomical units, and the
/// period is carried explicitly so mean motion never depends on a
/// gravitational parameter lookup.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Elements {
    pub semi_major_axis_au: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub ascending_node_deg: f64,
    pub arg_periapsis_deg: f64,
    /// Mean anomaly at `epoch`, degrees.
    pub mean_anomaly_epoch_deg: f64,
    pub epoch: DateTime<Utc>,
    pub period_days: f64,
}

/// One tabulated trajectory point for a probe, heliocentric ecliptic km.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub time: DateTime<Utc>,
    pub position_km: DVec3,
}

/// A time-ordered table of fitted trajectory samples for a deep-space probe.
/// Serialized as a bare sample list; loading re-runs the ordering checks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TrajectorySample>", into = "Vec<TrajectorySample>")]
pub struct TrajectoryTable {
    samples: Vec<TrajectorySample>,
}

impl TryFrom<Vec<TrajectorySample>> for TrajectoryTable {
    type Error = anyhow::Error;

    fn try_from(samples: Vec<TrajectorySample>) -> Result<Self, Self::Error> {
        Self::new(samples)
    }
}

impl From<TrajectoryTable> for Vec<TrajectorySample> {
    fn from(table: TrajectoryTable) -> Self {
        table.samples
    }
}

impl TrajectoryTable {
    /// Build a table, validating that at least two samples exist and that
    /// timestamps strictly increase.
    pub fn new(samples: Vec<TrajectorySample>) -> anyhow::Result<Self> {
        if samples.len() < 2 {
            bail!("trajectory table needs at least 2 samples, got {}", samples.len());
        }
        for pair in samples.windows(2) {
            if pair[1].time <= pair[0].time {
                bail!("trajectory samples must be strictly time-ordered at {}", pair[1].time);
            }
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Mission start: the first recorded sample time.
    pub fn mission_start(&self) -> DateTime<Utc> {
        self.samples[0].time
    }

    /// Last known data point.
    pub fn mission_end(&self) -> DateTime<Utc> {
        self.samples[self.samples.len() - 1].time
    }
}

/// Class-specific orbital parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "lowercase")]
pub enum BodyModel {
    Planet { elements: Elements },
    Moon { parent: BodyId, elements: Elements },
    Probe { trajectory: TrajectoryTable },
    Comet { elements: Elements },
    Satellite { tle: TleRecord },
}

/// An immutable body descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    /// Display color, linear RGB in [0, 1].
    pub color: [f32; 3],
    /// Scene-unit display radius override; `None` uses the class default.
    #[serde(default)]
    pub display_radius: Option<f64>,
    #[serde(flatten)]
    pub model: BodyModel,
}

impl Body {
    pub fn class(&self) -> BodyClass {
        match self.model {
            BodyModel::Planet { .. } => BodyClass::Planet,
            BodyModel::Moon { .. } => BodyClass::Moon,
            BodyModel::Probe { .. } => BodyClass::Probe,
            BodyModel::Comet { .. } => BodyClass::Comet,
            BodyModel::Satellite { .. } => BodyClass::Satellite,
        }
    }

    /// Display radius in scene units, falling back to the class default.
    pub fn display_radius(&self) -> f64 {
        self.display_radius
            .unwrap_or_else(|| crate::scale::display_radius(self.class()))
    }

    /// Whether this body's path is a closed ellipse (one full revolution)
    /// rather than an open arc or ground track.
    pub fn has_closed_orbit(&self) -> bool {
        matches!(
            self.model,
            BodyModel::Planet { .. } | BodyModel::Moon { .. } | BodyModel::Comet { .. }
        )
    }

    /// Build a satellite body from a raw TLE record pair, failing fast on
    /// malformed lines.
    pub fn satellite(
        id: impl Into<String>,
        name: impl Into<String>,
        color: [f32; 3],
        line1: &str,
        line2: &str,
    ) -> anyhow::Result<Self> {
        let id = BodyId::new(id);
        let name = name.into();
        let tle = TleRecord::parse(Some(name.clone()), line1, line2)
            .with_context(|| format!("satellite {}", id))?;
        Ok(Self {
            id,
            name,
            color,
            display_radius: None,
            model: BodyModel::Satellite { tle },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(t: DateTime<Utc>, x: f64) -> TrajectorySample {
        TrajectorySample {
            time: t,
            position_km: DVec3::new(x, 0.0, 0.0),
        }
    }

    #[test]
    fn test_trajectory_table_rejects_short_input() {
        let t0 = Utc.with_ymd_and_hms(1977, 9, 5, 0, 0, 0).unwrap();
        assert!(TrajectoryTable::new(vec![sample(t0, 1.0)]).is_err());
        assert!(TrajectoryTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_trajectory_table_rejects_unordered_samples() {
        let t0 = Utc.with_ymd_and_hms(1977, 9, 5, 0, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::days(30);
        assert!(TrajectoryTable::new(vec![sample(t1, 2.0), sample(t0, 1.0)]).is_err());
        // Duplicate timestamps are also invalid.
        assert!(TrajectoryTable::new(vec![sample(t0, 1.0), sample(t0, 2.0)]).is_err());
    }

    #[test]
    fn test_trajectory_table_bounds() {
        let t0 = Utc.with_ymd_and_hms(1977, 9, 5, 0, 0, 0).unwrap();
        let t1 = t0 + chrono::Duration::days(30);
        let table = TrajectoryTable::new(vec![sample(t0, 1.0), sample(t1, 2.0)]).unwrap();
        assert_eq!(table.mission_start(), t0);
        assert_eq!(table.mission_end(), t1);
    }

    #[test]
    fn test_body_class_matches_model() {
        let elements = Elements {
            semi_major_axis_au: 1.0,
            eccentricity: 0.0167,
            inclination_deg: 0.0,
            ascending_node_deg: 0.0,
            arg_periapsis_deg: 102.9,
            mean_anomaly_epoch_deg: 357.5,
            epoch: Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap(),
            period_days: 365.256,
        };
        let body = Body {
            id: BodyId::new("earth"),
            name: "Earth".to_string(),
            color: [0.2, 0.4, 1.0],
            display_radius: None,
            model: BodyModel::Planet { elements },
        };
        assert_eq!(body.class(), BodyClass::Planet);
        assert!(body.has_closed_orbit());
        assert!(body.display_radius() > 0.0);
    }

    #[test]
    fn test_satellite_body_rejects_malformed_tle() {
        let result = Body::satellite("iss", "ISS", [1.0, 1.0, 1.0], "garbage", "lines");
        assert!(result.is_err());
    }
}
