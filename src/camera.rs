//! Focus selection and camera transition animation.
//!
//! The camera controller only ever acts during a focus transition: it owns a
//! one-shot animation from the pose at transition start to a framing of the
//! new focus, and while no animation is in flight it returns nothing so the
//! renderer's own orbit/pan/zoom controls are never fought.

use glam::DVec3;

use crate::bodies::{BodyClass, BodyId};
use crate::scale::framing_distance;

/// Camera transition duration, milliseconds.
pub const ANIMATION_DURATION_MS: f64 = 1000.0;

/// Cubic ease-out: fast start, gentle arrival.
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// A camera pose: eye position and look-at target, scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: DVec3,
    pub target: DVec3,
}

impl CameraPose {
    fn lerp(a: CameraPose, b: CameraPose, f: f64) -> CameraPose {
        CameraPose {
            position: a.position.lerp(b.position, f),
            target: a.target.lerp(b.target, f),
        }
    }
}

/// Which body (if any) a scene has focused, plus the previous selection so
/// transitions can be detected. Holds no camera state itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusSelection {
    current: Option<BodyId>,
    previous: Option<BodyId>,
}

impl FocusSelection {
    /// Record a selection. Returns true when this is a transition.
    pub fn select(&mut self, id: Option<BodyId>) -> bool {
        if self.current == id {
            return false;
        }
        self.previous = self.current.take();
        self.current = id;
        true
    }

    pub fn current(&self) -> Option<&BodyId> {
        self.current.as_ref()
    }

    pub fn previous(&self) -> Option<&BodyId> {
        self.previous.as_ref()
    }

    pub fn is_selected(&self, id: &BodyId) -> bool {
        self.current.as_ref() == Some(id)
    }
}

/// The explicit transition state machine: either idle, or one in-flight
/// animation. Created on a focus change, self-terminating after the fixed
/// duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraAnimation {
    Idle,
    Animating {
        start: CameraPose,
        end: CameraPose,
        start_ms: f64,
    },
}

impl CameraAnimation {
    pub fn is_active(&self) -> bool {
        matches!(self, CameraAnimation::Animating { .. })
    }

    /// Pose at `now_ms` without advancing the machine. `None` while idle.
    pub fn pose_at(&self, now_ms: f64) -> Option<CameraPose> {
        match *self {
            CameraAnimation::Idle => None,
            CameraAnimation::Animating {
                start,
                end,
                start_ms,
            } => {
                let t = ((now_ms - start_ms) / ANIMATION_DURATION_MS).clamp(0.0, 1.0);
                Some(CameraPose::lerp(start, end, ease_out_cubic(t)))
            }
        }
    }

    /// Advance to `now_ms`, returning the pose to apply this frame, or
    /// `None` once idle. The final frame returns the exact end pose and the
    /// machine discards itself.
    pub fn tick(&mut self, now_ms: f64) -> Option<CameraPose> {
        let pose = self.pose_at(now_ms)?;
        if let CameraAnimation::Animating { end, start_ms, .. } = *self {
            if now_ms - start_ms >= ANIMATION_DURATION_MS {
                *self = CameraAnimation::Idle;
                return Some(end);
            }
        }
        Some(pose)
    }
}

/// Selection state plus the transition animation driving it.
pub struct CameraController {
    focus: FocusSelection,
    animation: CameraAnimation,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            focus: FocusSelection::default(),
            animation: CameraAnimation::Idle,
        }
    }

    pub fn focus(&self) -> &FocusSelection {
        &self.focus
    }

    pub fn animation(&self) -> &CameraAnimation {
        &self.animation
    }

    /// Handle a focus change. `focus_position` is the new focus body's scene
    /// position at this instant (the origin for a `None` focus); it is
    /// frozen as the look-at for the whole transition rather than re-tracked
    /// so a moving body cannot cause overshoot. `renderer_pose` is the
    /// camera as the renderer currently has it; if an animation is already
    /// in flight the transition continues from the in-flight pose, replacing
    /// the old animation outright.
    pub fn select(
        &mut self,
        id: Option<BodyId>,
        class: Option<BodyClass>,
        focus_position: DVec3,
        renderer_pose: CameraPose,
        now_ms: f64,
    ) {
        if !self.focus.select(id) {
            return;
        }
        let start = self.animation.pose_at(now_ms).unwrap_or(renderer_pose);
        let offset_dir = (start.position - focus_position)
            .try_normalize()
            .unwrap_or(DVec3::new(0.0, 0.3, 1.0).normalize());
        let end = CameraPose {
            position: focus_position + offset_dir * framing_distance(class),
            target: focus_position,
        };
        self.animation = CameraAnimation::Animating {
            start,
            end,
            start_ms: now_ms,
        };
    }

    /// Advance the transition. `None` while idle: the camera is then wholly
    /// owned by the renderer's user controls.
    pub fn tick(&mut self, now_ms: f64) -> Option<CameraPose> {
        self.animation.tick(now_ms)
    }
}
