//! Scroll-driven map storytelling.
//!
//! A story is an ordered list of chapters. As the reader scrolls, a step
//! tracker reports chapter cards entering and leaving the viewport; the
//! [`Synchronizer`] turns those reports into camera moves, layer fades and
//! the "active" marking of the card.

pub mod callbacks;
pub mod camera;
pub mod chapter;
pub mod config;
pub mod error;
pub mod journal;
pub mod recording;
pub mod registry;
pub mod surface;
pub mod sync;

pub use callbacks::*;
pub use camera::*;
pub use chapter::*;
pub use config::*;
pub use error::*;
pub use journal::*;
pub use registry::*;
pub use surface::*;
pub use sync::*;
