//! Cazimi - Swiss Ephemeris transit service
//!
//! An HTTP service computing planetary positions, lunar phase, houses and
//! transit-to-natal aspects with the Swiss Ephemeris library, plus a small
//! standalone parser for the "hero" scripting mini-language.

pub mod config;
pub mod ephemeris;
pub mod models;
pub mod script;
pub mod server;

pub use config::Config;
pub use server::{build_router, serve};
