pub mod energy;
pub mod geodesy;
pub mod vec;
pub mod zoom;

pub use energy::*;
pub use geodesy::*;
pub use vec::*;
pub use zoom::*;
