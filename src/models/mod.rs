pub mod aspects;
pub mod lunar;
pub mod natal;
pub mod zodiac;

pub use aspects::*;
pub use lunar::*;
pub use natal::*;
pub use zodiac::*;
