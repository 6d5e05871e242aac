use foundation::time::Millis;
use serde::{Deserialize, Serialize};

/// Suffix mapbox styles use for a paint property's transition options.
pub const TRANSITION_SUFFIX: &str = "-transition";

/// Timing applied to subsequent changes of a paint property.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintTransition {
    pub duration: Millis,
    pub delay: Millis,
}

impl PaintTransition {
    pub const fn over(duration: Millis) -> Self {
        Self {
            duration,
            delay: Millis::ZERO,
        }
    }
}

/// Value handed to `setPaintProperty`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintValue {
    Number(f64),
    Transition(PaintTransition),
}

pub fn transition_property(property: &str) -> String {
    format!("{property}{TRANSITION_SUFFIX}")
}
