pub mod handles;
pub mod ids;
pub mod math;
pub mod text;
pub mod time;

// Foundation crate: pure, well-tested primitives only. No I/O.
pub use handles::*;
pub use ids::*;
pub use text::*;
pub use time::*;
