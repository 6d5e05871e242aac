pub mod error;
pub mod layer;
pub mod opacity;
pub mod symbology;

pub use error::*;
pub use layer::*;
pub use opacity::*;
pub use symbology::*;
