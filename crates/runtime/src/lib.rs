pub mod event_bus;
pub mod frame;
pub mod lease;

pub use event_bus::*;
pub use frame::*;
pub use lease::*;
