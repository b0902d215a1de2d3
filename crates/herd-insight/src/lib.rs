//! Milk-yield estimation and health-risk classification for dairy herds.
//!
//! The [`predictions`] module hosts the scoring engine together with the intake guard,
//! repository contract, service facade, and HTTP router that surround it.

pub mod config;
pub mod error;
pub mod predictions;
pub mod telemetry;
