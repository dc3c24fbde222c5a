//! Body catalog: the load-time definition of everything a scene can show.

use std::collections::HashMap;

use anyhow::{Context, bail};
use chrono::{DateTime, TimeZone, Utc};

use super::{Body, BodyId, BodyModel, Elements};

/// An id-keyed, insertion-ordered collection of immutable bodies.
pub struct BodyCatalog {
    bodies: Vec<Body>,
    index: HashMap<BodyId, usize>,
}

impl BodyCatalog {
    /// Build a catalog from a list of bodies, rejecting duplicate ids.
    pub fn from_bodies(bodies: Vec<Body>) -> anyhow::Result<Self> {
        let mut index = HashMap::with_capacity(bodies.len());
        for (i, body) in bodies.iter().enumerate() {
            if index.insert(body.id.clone(), i).is_some() {
                bail!("duplicate body id: {}", body.id);
            }
        }
        Ok(Self { bodies, index })
    }

    /// Load a catalog from its JSON representation.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let bodies: Vec<Body> =
            serde_json::from_str(json).context("parsing body catalog JSON")?;
        Self::from_bodies(bodies)
    }

    pub fn get(&self, id: &BodyId) -> Option<&Body> {
        self.index.get(id).map(|&i| &self.bodies[i])
    }

    /// Look up a body that callers assert exists. An unknown id is a
    /// data-catalog bug, not a runtime condition, so this panics rather than
    /// returning something indistinguishable from a body at the origin.
    pub fn expect(&self, id: &BodyId) -> &Body {
        self.get(id)
            .unwrap_or_else(|| panic!("unknown body id: {}", id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
}

/// Builtin planet entries: (id, name, a, e, i, lan, argp, M0, period_days, color).
/// J2000 osculating elements; angles in degrees, semi-major axis in AU.
#[rustfmt::skip]
const PLANETS: [(&str, &str, f64, f64, f64, f64, f64, f64, f64, [f32; 3]); 8] = [
    ("mercury", "Mercury",  0.38709893, 0.20563069, 7.00487,  48.33167,  29.12478, 174.79439,    87.969, [0.60, 0.58, 0.55]),
    ("venus",   "Venus",    0.72333199, 0.00677323, 3.39471,  76.68069,  54.85229,  50.44675,   224.701, [0.90, 0.80, 0.55]),
    ("earth",   "Earth",    1.00000011, 0.01671022, 0.00005, -11.26064, 114.20783, 357.51716,   365.256, [0.25, 0.45, 0.95]),
    ("mars",    "Mars",     1.52366231, 0.09341233, 1.85061,  49.57854, 286.46230,  19.41248,   686.980, [0.85, 0.40, 0.25]),
    ("jupiter", "Jupiter",  5.20336301, 0.04839266, 1.30530, 100.55615, 274.19770,  19.65053,  4332.589, [0.80, 0.70, 0.55]),
    ("saturn",  "Saturn",   9.53707032, 0.05415060, 2.48446, 113.71504, 338.71690, 317.51238, 10759.220, [0.88, 0.80, 0.60]),
    ("uranus",  "Uranus",  19.19126393, 0.04716771, 0.76986,  74.22988,  96.73436, 142.26794, 30685.400, [0.55, 0.80, 0.85]),
    ("neptune", "Neptune", 30.06896348, 0.00858587, 1.76917, 131.72169, 273.24966, 259.90868, 60189.000, [0.35, 0.45, 0.90]),
];

/// Builtin comet entries, epoch pinned at a perihelion passage so the mean
/// anomaly at epoch is zero: (id, name, a, e, i, lan, argp, perihelion UTC
/// date, period_days, color).
#[rustfmt::skip]
const COMETS: [(&str, &str, f64, f64, f64, f64, f64, (i32, u32, u32), f64, [f32; 3]); 2] = [
    ("halley", "1P/Halley", 17.834, 0.96714, 162.262,  58.42, 111.33, (1986, 2,  9), 27510.0, [0.75, 0.85, 0.95]),
    ("encke",  "2P/Encke",   2.215, 0.84830,  11.780, 334.57, 186.54, (2000, 9,  9),  1204.2, [0.70, 0.75, 0.80]),
];

/// The builtin solar-system catalog backing the orrery and comet scenes:
/// eight planets, the Moon, and two periodic comets. Probe and satellite
/// bodies are data-driven and loaded separately.
pub fn builtin() -> BodyCatalog {
    let mut bodies = Vec::with_capacity(PLANETS.len() + COMETS.len() + 1);

    for (id, name, a, e, i, lan, argp, m0, period, color) in PLANETS {
        bodies.push(Body {
            id: BodyId::new(id),
            name: name.to_string(),
            color,
            display_radius: None,
            model: BodyModel::Planet {
                elements: Elements {
                    semi_major_axis_au: a,
                    eccentricity: e,
                    inclination_deg: i,
                    ascending_node_deg: lan,
                    arg_periapsis_deg: argp,
                    mean_anomaly_epoch_deg: m0,
                    epoch: j2000(),
                    period_days: period,
                },
            },
        });
    }

    // Earth's moon, parent-relative elements in the ecliptic frame.
    bodies.push(Body {
        id: BodyId::new("moon"),
        name: "Moon".to_string(),
        color: [0.75, 0.75, 0.75],
        display_radius: None,
        model: BodyModel::Moon {
            parent: BodyId::new("earth"),
            elements: Elements {
                semi_major_axis_au: 0.00257,
                eccentricity: 0.0549,
                inclination_deg: 5.145,
                ascending_node_deg: 125.08,
                arg_periapsis_deg: 318.15,
                mean_anomaly_epoch_deg: 135.27,
                epoch: j2000(),
                period_days: 27.321582,
            },
        },
    });

    for (id, name, a, e, i, lan, argp, (py, pm, pd), period, color) in COMETS {
        bodies.push(Body {
            id: BodyId::new(id),
            name: name.to_string(),
            color,
            display_radius: None,
            model: BodyModel::Comet {
                elements: Elements {
                    semi_major_axis_au: a,
                    eccentricity: e,
                    inclination_deg: i,
                    ascending_node_deg: lan,
                    arg_periapsis_deg: argp,
                    mean_anomaly_epoch_deg: 0.0,
                    epoch: Utc.with_ymd_and_hms(py, pm, pd, 0, 0, 0).unwrap(),
                    period_days: period,
                },
            },
        });
    }

    BodyCatalog::from_bodies(bodies).expect("builtin catalog ids are unique")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bodies::BodyClass;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 11);
        assert!(catalog.get(&BodyId::new("earth")).is_some());
        assert!(catalog.get(&BodyId::new("halley")).is_some());
        assert!(catalog.get(&BodyId::new("vulcan")).is_none());

        let moon = catalog.expect(&BodyId::new("moon"));
        assert_eq!(moon.class(), BodyClass::Moon);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let catalog = builtin();
        let mut bodies: Vec<Body> = catalog.iter().cloned().collect();
        bodies.push(bodies[0].clone());
        assert!(BodyCatalog::from_bodies(bodies).is_err());
    }

    #[test]
    #[should_panic(expected = "unknown body id")]
    fn test_expect_unknown_id_panics() {
        builtin().expect(&BodyId::new("planet-x"));
    }

    #[test]
    fn test_json_round_trip() {
        let catalog = builtin();
        let bodies: Vec<Body> = catalog.iter().cloned().collect();
        let json = serde_json::to_string(&bodies).unwrap();
        let reloaded = BodyCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded.len(), catalog.len());
        assert_eq!(
            reloaded.expect(&BodyId::new("earth")),
            catalog.expect(&BodyId::new("earth"))
        );
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(BodyCatalog::from_json("not json").is_err());
        assert!(BodyCatalog::from_json("{\"id\": \"lonely\"}").is_err());
    }
}
