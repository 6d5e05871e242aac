use std::cell::Cell;
use std::rc::Rc;

use foundation::geo::CameraPose;
use foundation::time::Millis;
use tracing::debug;

use crate::chapter::MapAnimation;
use crate::surface::{MapSurface, RotateOptions};

/// Bearing swept by a chapter's slow rotation.
pub const ROTATION_DEGREES: f64 = 90.0;
/// Time the rotation takes, at constant angular speed.
pub const ROTATION_DURATION: Millis = Millis(24_000);

/// Handle on a rotation waiting for the camera to settle.
///
/// Stale once another camera move has been issued.
#[derive(Debug, Clone)]
pub struct RotationToken {
    issued: u64,
    current: Rc<Cell<u64>>,
}

impl RotationToken {
    pub fn is_current(&self) -> bool {
        self.issued == self.current.get()
    }
}

/// Moves the camera to chapter poses and runs the optional slow rotation.
#[derive(Debug, Default)]
pub struct CameraController {
    moves: Rc<Cell<u64>>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the transition to `pose`, superseding any pending rotation.
    pub fn move_to<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        pose: &CameraPose,
        animation: MapAnimation,
    ) {
        self.moves.set(self.moves.get().wrapping_add(1));
        match animation {
            MapAnimation::FlyTo => map.fly_to(pose),
            MapAnimation::EaseTo => map.ease_to(pose),
            MapAnimation::JumpTo => map.jump_to(pose),
        }
    }

    /// Token for the move most recently issued.
    pub fn token(&self) -> RotationToken {
        RotationToken {
            issued: self.moves.get(),
            current: Rc::clone(&self.moves),
        }
    }

    /// Arms a rotation that begins when the current movement ends, unless a
    /// newer move has been issued by then.
    pub fn rotate_after_move<M: MapSurface + ?Sized>(&self, map: &mut M) -> RotationToken {
        let token = self.token();
        let pending = token.clone();
        map.once_move_end(Box::new(move |map: &mut dyn MapSurface| {
            if pending.is_current() {
                Self::start_rotation(map);
            } else {
                debug!(move_index = pending.issued, "rotation superseded by a newer move");
            }
        }));
        token
    }

    /// Turns the camera [`ROTATION_DEGREES`] from its current bearing over
    /// [`ROTATION_DURATION`] with linear easing. Returns the target bearing.
    pub fn start_rotation<M: MapSurface + ?Sized>(map: &mut M) -> f64 {
        let target = map.bearing() + ROTATION_DEGREES;
        map.rotate_to(target, RotateOptions::linear(ROTATION_DURATION));
        debug!(bearing = target, "rotation started");
        target
    }
}
