//! Infrastructure: seed configuration and fixture loading

pub mod config;
pub mod seed;

pub use config::SeedConfig;
pub use seed::load_seed;
