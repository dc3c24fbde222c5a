//! Time-driven orbital simulation core for interactive astronomy scenes.
//!
//! For an arbitrary simulated instant (scrubbed, fast-forwarded, or run in
//! reverse) this crate produces consistent scene-space positions for
//! planets, moons, deep-space probes, comets, and Earth-orbiting objects,
//! samples their orbit paths and ground tracks, and drives eased camera
//! transitions between focused bodies. Rendering is someone else's job: the
//! per-frame output is plain data ([`scene::FrameSnapshot`]) and the only
//! inputs are user selections, playback controls, and wall-clock seconds.

pub mod bodies;
pub mod camera;
pub mod clock;
pub mod coordinates;
pub mod ephemeris;
pub mod paths;
pub mod scale;
pub mod scene;
pub mod tle;

pub use bodies::{Body, BodyCatalog, BodyClass, BodyId};
pub use camera::{CameraAnimation, CameraController, CameraPose, FocusSelection};
pub use clock::SimulationClock;
pub use ephemeris::{Ephemeris, Position, Tail};
pub use paths::{PathCache, PathKind, PathSample, sample_path};
pub use scene::{BodyFrame, FrameSnapshot, SceneContext};
pub use tle::{TleRecord, TleStore};
