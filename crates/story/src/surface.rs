//! Seams to the page: the map, its marker, the chapter cards and the scroll
//! step tracker. The browser build binds these to mapbox-gl and scrollama;
//! [`crate::recording`] has in-memory versions.

use foundation::geo::{CameraPose, LngLat};
use foundation::time::{Easing, Millis};
use layers::{PaintSurface, StyleLayer};
use serde::{Deserialize, Serialize};

/// One-shot callback for the map's next "movement ended" signal.
pub type MoveEndHandler = Box<dyn FnOnce(&mut dyn MapSurface)>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotateOptions {
    pub duration: Millis,
    pub easing: Easing,
}

impl RotateOptions {
    pub const fn linear(duration: Millis) -> Self {
        Self {
            duration,
            easing: Easing::Linear,
        }
    }
}

/// Camera and style operations the story needs from a map instance.
///
/// Issuing any camera command interrupts one still in flight.
pub trait MapSurface: PaintSurface {
    fn fly_to(&mut self, pose: &CameraPose);
    fn ease_to(&mut self, pose: &CameraPose);
    fn jump_to(&mut self, pose: &CameraPose);
    fn rotate_to(&mut self, bearing: f64, options: RotateOptions);

    /// Current camera bearing in degrees.
    fn bearing(&self) -> f64;

    /// Layers of the loaded style (`getStyle().layers`).
    fn style_layers(&self) -> Vec<StyleLayer>;

    /// Runs `handler` once, the next time camera movement ends.
    fn once_move_end(&mut self, handler: MoveEndHandler);
}

pub trait Marker {
    fn set_lng_lat(&mut self, at: LngLat);
}

/// The chapter cards; only their "active" marking is driven from here.
pub trait StepElements {
    fn set_active(&mut self, id: &str, active: bool);
}

/// Scroll-position watcher that reports steps entering and leaving.
pub trait StepTracker {
    /// Recompute step boundaries after a layout change.
    fn resize(&mut self);
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Enter,
    Exit,
}

/// A step tracker report for one chapter card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEvent {
    pub kind: StepKind,
    pub element_id: String,
    pub direction: Direction,
}

impl StepEvent {
    pub fn enter(element_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            kind: StepKind::Enter,
            element_id: element_id.into(),
            direction,
        }
    }

    pub fn exit(element_id: impl Into<String>, direction: Direction) -> Self {
        Self {
            kind: StepKind::Exit,
            element_id: element_id.into(),
            direction,
        }
    }
}

/// How the step tracker watches the cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepTrackerOptions {
    /// Selector for the chapter card elements.
    pub step: String,
    /// Trigger line as a fraction of viewport height from the top.
    pub offset: f64,
    pub progress: bool,
}

impl Default for StepTrackerOptions {
    fn default() -> Self {
        Self {
            step: ".step".to_string(),
            offset: 0.5,
            progress: true,
        }
    }
}
