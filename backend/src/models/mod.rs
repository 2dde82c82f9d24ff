//! Core value types shared by the calculators and the HTTP layer.

pub mod birth;
pub mod time;
pub mod zodiac;

pub use birth::*;
pub use time::*;
pub use zodiac::*;
