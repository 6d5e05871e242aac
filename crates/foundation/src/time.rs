use serde::{Deserialize, Serialize};

/// Wall-clock duration in milliseconds, as animation APIs take it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);
}

/// Progress curve of a timed animation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Easing {
    /// Whatever curve the map applies when none is given.
    #[default]
    Default,
    /// Constant rate, `t -> t`.
    Linear,
}
