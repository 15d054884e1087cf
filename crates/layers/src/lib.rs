//! Impact-footprint overlays on a 2D map surface.
//!
//! One overlay generation at a time: every draw tears down the previous
//! generation (layers, sources and the impact-point pulse) before adding the
//! next.

pub mod footprint;
pub mod layer;
pub mod overlay;
pub mod pulse;
pub mod surface;
pub mod symbology;

pub use footprint::*;
pub use layer::*;
pub use overlay::*;
pub use pulse::*;
pub use surface::*;
pub use symbology::*;
