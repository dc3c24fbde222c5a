//! Ephemeris adapter: one uniform position function over every body class.
//!
//! `Ephemeris::position` is total over any representable timestamp and
//! deterministic: identical inputs produce bit-identical output, which the
//! path sampler and the tests both rely on. Times far from an element set's
//! epoch degrade in accuracy but never error.

use std::collections::HashMap;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use glam::DVec3;

use crate::bodies::{Body, BodyCatalog, BodyId, BodyModel, Elements};
use crate::coordinates::{ecef_to_scene, ecliptic_to_scene};
use crate::tle::TleRecord;

pub mod comets;
pub mod kepler;
pub mod planets;
pub mod probes;
pub mod satellites;

pub use satellites::SatModel;

/// Comet tail geometry: unit direction away from the Sun and a scene-unit
/// length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tail {
    pub direction: DVec3,
    pub length: f64,
}

/// A derived, ephemeral position in scene space. Valid only for the
/// `(body, time)` pair that produced it; never cache one keyed on body alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub scene: DVec3,
    /// Distance from the scene origin (Sun or Earth centre), scene units.
    pub distance_from_origin: f64,
    /// Tail geometry for tailed bodies near the Sun.
    pub tail: Option<Tail>,
    /// True when the value was extrapolated beyond recorded trajectory data.
    pub extrapolated: bool,
}

impl Position {
    fn plain(scene: DVec3) -> Self {
        Self {
            scene,
            distance_from_origin: scene.length(),
            tail: None,
            extrapolated: false,
        }
    }
}

/// The ephemeris adapter. Owns the immutable body catalog plus the compiled
/// SGP4 propagators, which are rebuilt whenever the data layer hands over a
/// refreshed element set.
pub struct Ephemeris {
    catalog: BodyCatalog,
    sat_models: HashMap<BodyId, SatModel>,
}

impl Ephemeris {
    /// Compile per-satellite propagators and validate moon parent links.
    /// Catalog defects (malformed TLEs, dangling parents) fail here, at load
    /// time, rather than mid-frame.
    pub fn new(catalog: BodyCatalog) -> anyhow::Result<Self> {
        let mut sat_models = HashMap::new();
        for body in catalog.iter() {
            match &body.model {
                BodyModel::Satellite { tle } => {
                    let model = SatModel::compile(tle)
                        .with_context(|| format!("satellite {}", body.id))?;
                    sat_models.insert(body.id.clone(), model);
                }
                BodyModel::Moon { parent, .. } => match catalog.get(parent) {
                    Some(p) if matches!(p.model, BodyModel::Planet { .. }) => {}
                    Some(_) => bail!("moon {} parent {} is not a planet", body.id, parent),
                    None => bail!("moon {} references unknown parent {}", body.id, parent),
                },
                _ => {}
            }
        }
        Ok(Self {
            catalog,
            sat_models,
        })
    }

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    pub fn body(&self, id: &BodyId) -> Option<&Body> {
        self.catalog.get(id)
    }

    /// Catalog lookup that panics on unknown ids (a data-catalog bug must
    /// never render as a body sitting at the origin).
    pub fn expect_body(&self, id: &BodyId) -> &Body {
        self.catalog.expect(id)
    }

    /// Replace a satellite's element set with a freshly fetched record.
    /// This is the refresh boundary for the excluded data layer; until it is
    /// called, the previous (stale) propagator stays in service.
    pub fn update_elements(&mut self, id: &BodyId, record: &TleRecord) -> anyhow::Result<()> {
        let body = self.expect_body(id);
        if !matches!(body.model, BodyModel::Satellite { .. }) {
            bail!("{} is not a satellite", id);
        }
        let model =
            SatModel::compile(record).with_context(|| format!("refreshing {}", id))?;
        self.sat_models.insert(id.clone(), model);
        Ok(())
    }

    /// Apply every matching record from a refreshed element store. Returns
    /// how many satellites were updated; bodies the store has no record for
    /// keep their previous propagator.
    pub fn refresh_from_store(&mut self, store: &crate::tle::TleStore) -> anyhow::Result<usize> {
        let ids: Vec<BodyId> = self
            .catalog
            .iter()
            .filter(|b| matches!(b.model, BodyModel::Satellite { .. }))
            .map(|b| b.id.clone())
            .collect();
        let mut refreshed = 0;
        for id in ids {
            if let Some(record) = store.get(&id) {
                self.update_elements(&id, record)?;
                refreshed += 1;
            }
        }
        Ok(refreshed)
    }

    /// Scene-space position of a body at a time.
    pub fn position(&self, body: &Body, time: DateTime<Utc>) -> Position {
        match &body.model {
            BodyModel::Planet { elements } => {
                Position::plain(ecliptic_to_scene(planets::planet_km(elements, time)))
            }
            BodyModel::Moon { parent, elements } => {
                let parent_elements = self.planet_elements(parent);
                Position::plain(ecliptic_to_scene(planets::moon_km(
                    parent_elements,
                    elements,
                    time,
                )))
            }
            BodyModel::Probe { trajectory } => {
                let (km, extrapolated) = probes::position_km(trajectory, time);
                Position {
                    extrapolated,
                    ..Position::plain(ecliptic_to_scene(km))
                }
            }
            BodyModel::Comet { elements } => {
                let (scene, distance, tail) = comets::comet_state(elements, time);
                Position {
                    scene,
                    distance_from_origin: distance,
                    tail,
                    extrapolated: false,
                }
            }
            BodyModel::Satellite { .. } => {
                let model = &self.sat_models[&body.id];
                Position::plain(ecef_to_scene(model.ecef_km(time)))
            }
        }
    }

    /// Position by id; unknown ids panic.
    pub fn position_of(&self, id: &BodyId, time: DateTime<Utc>) -> Position {
        self.position(self.expect_body(id), time)
    }

    /// Compiled propagator for a satellite body, if it is one.
    pub fn sat_model(&self, id: &BodyId) -> Option<&SatModel> {
        self.sat_models.get(id)
    }

    fn planet_elements(&self, id: &BodyId) -> &Elements {
        match &self.catalog.expect(id).model {
            BodyModel::Planet { elements } => elements,
            // Parent links are validated in new().
            _ => unreachable!("moon parent {} validated as planet", id),
        }
    }
}
