//! Heliocentric orbit preview for a catalog object.

pub mod backend;
pub mod camera;
pub mod elements;
pub mod memory;
pub mod summary;
pub mod visualizer;

pub use backend::*;
pub use camera::*;
pub use elements::*;
pub use memory::MemoryScene;
pub use summary::*;
pub use visualizer::*;
