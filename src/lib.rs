//! Marquee - theater screening calendar and seat inventory core
//!
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod services;
pub mod store;
