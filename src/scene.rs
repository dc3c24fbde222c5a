//! Per-scene context: the mount-scoped owner of every mutable piece.
//!
//! A `SceneContext` is created when a scene mounts and dropped when it
//! unmounts; the clock, path cache, and focus state all live inside it, so
//! navigation away structurally cancels all per-frame work. Nothing here
//! touches a scene graph; the renderer consumes the plain values in
//! [`FrameSnapshot`] and rebuilds its drawables from them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::bodies::{BodyCatalog, BodyId};
use crate::camera::{CameraController, CameraPose};
use crate::clock::SimulationClock;
use crate::ephemeris::{Ephemeris, Position};
use crate::paths::{PathCache, PathSample};
use crate::tle::TleRecord;

/// One body's render state for a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    pub position: Position,
    pub is_selected: bool,
}

/// Everything the renderer needs for one frame, derived from a single
/// sample of the simulation clock.
pub struct FrameSnapshot {
    /// The one simulated instant every body in this frame was computed at.
    pub time: DateTime<Utc>,
    pub bodies: HashMap<BodyId, BodyFrame>,
    /// Camera pose to apply this frame; `None` outside focus transitions.
    pub camera: Option<CameraPose>,
}

/// Mount-scoped simulation state for one scene.
pub struct SceneContext {
    ephemeris: Ephemeris,
    clock: SimulationClock,
    paths: PathCache,
    camera: CameraController,
    /// Renderer toggle: draw orbit/trajectory paths.
    pub show_orbits: bool,
    /// Renderer toggle: draw body labels.
    pub show_labels: bool,
    last_time: DateTime<Utc>,
}

impl SceneContext {
    /// Build a scene over a body catalog, starting paused at `start`.
    /// Catalog defects fail here, before the first frame.
    pub fn new(catalog: BodyCatalog, start: DateTime<Utc>) -> anyhow::Result<Self> {
        let ephemeris = Ephemeris::new(catalog)?;
        debug!(
            "scene context created with {} bodies",
            ephemeris.catalog().len()
        );
        Ok(Self {
            ephemeris,
            clock: SimulationClock::new(start),
            paths: PathCache::new(),
            camera: CameraController::new(),
            show_orbits: true,
            show_labels: true,
            last_time: start,
        })
    }

    /// Advance one frame. Samples the clock exactly once and computes every
    /// body's position from that same instant, so the frame is internally
    /// consistent no matter how fast time is running.
    pub fn advance(&mut self, wall_now_s: f64) -> FrameSnapshot {
        let time = self.clock.tick(wall_now_s);
        self.last_time = time;

        let mut bodies = HashMap::with_capacity(self.ephemeris.catalog().len());
        for body in self.ephemeris.catalog().iter() {
            bodies.insert(
                body.id.clone(),
                BodyFrame {
                    position: self.ephemeris.position(body, time),
                    is_selected: self.camera.focus().is_selected(&body.id),
                },
            );
        }

        FrameSnapshot {
            time,
            bodies,
            camera: self.camera.tick(wall_now_s * 1000.0),
        }
    }

    /// User clicked a body (or empty space, for `None`). The focus body's
    /// position at the most recent frame time anchors the transition;
    /// unknown ids are a catalog bug and panic.
    pub fn select(&mut self, id: Option<BodyId>, renderer_pose: CameraPose, wall_now_s: f64) {
        let (class, focus_position) = match &id {
            Some(id) => {
                let body = self.ephemeris.expect_body(id);
                let position = self.ephemeris.position(body, self.last_time);
                (Some(body.class()), position.scene)
            }
            None => (None, glam::DVec3::ZERO),
        };
        self.camera
            .select(id, class, focus_position, renderer_pose, wall_now_s * 1000.0);
    }

    /// Cached path sample for a body at the most recent frame time.
    pub fn path(&mut self, id: &BodyId, sample_count: usize, wall_now_s: f64) -> &PathSample {
        let body = self.ephemeris.expect_body(id);
        self.paths
            .path(&self.ephemeris, body, self.last_time, wall_now_s, sample_count)
    }

    /// Hand a refreshed element set to the adapter (data-layer boundary).
    pub fn update_elements(&mut self, id: &BodyId, record: &TleRecord) -> anyhow::Result<()> {
        self.ephemeris.update_elements(id, record)
    }

    /// Apply a whole refreshed element store at once.
    pub fn refresh_tles(&mut self, store: &crate::tle::TleStore) -> anyhow::Result<usize> {
        self.ephemeris.refresh_from_store(store)
    }

    // Imperative playback controls, wired to UI buttons/sliders.

    pub fn play(&mut self, wall_now_s: f64) {
        self.clock.play(wall_now_s);
    }

    pub fn pause(&mut self, wall_now_s: f64) {
        self.clock.pause(wall_now_s);
    }

    pub fn set_rate(&mut self, rate: f64, wall_now_s: f64) {
        self.clock.set_rate(rate, wall_now_s);
    }

    pub fn seek(&mut self, time: DateTime<Utc>, wall_now_s: f64) {
        self.clock.seek(time, wall_now_s);
    }

    pub fn reset_to_now(&mut self, wall_now_s: f64) {
        self.clock.reset_to_now(wall_now_s);
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn ephemeris(&self) -> &Ephemeris {
        &self.ephemeris
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }
}
