pub mod calculator;
pub mod houses;

pub use calculator::*;
pub use houses::*;
