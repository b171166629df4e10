//! Seed-file loading from TOML
//!
//! The binary picks the path with its `--config` flag (default
//! `config/demo.toml`); a missing or malformed file falls back to an
//! empty seed.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct TheaterSeed {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieSeed {
    pub title: String,
    pub hours: i64,
    #[serde(default)]
    pub minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShowroomSeed {
    /// Single letter, unique across the seed file
    pub letter: char,
    pub rows: u16,
    pub seats_per_row: u16,
    /// Name of the owning theater, if any
    #[serde(default)]
    pub theater: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningSeed {
    pub movie: String,
    pub showroom: char,
    /// Start time, `%Y-%m-%dT%H:%M`
    pub start: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub email: String,
    /// Role kinds to grant ("customer", "moderator", "admin", "admin_trainee")
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Declarative seed data applied through the `Cinema` facade at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub theaters: Vec<TheaterSeed>,
    #[serde(default)]
    pub movies: Vec<MovieSeed>,
    #[serde(default)]
    pub showrooms: Vec<ShowroomSeed>,
    #[serde(default)]
    pub screenings: Vec<ScreeningSeed>,
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

impl SeedConfig {
    /// Load seed data from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse seed file {}", path.display()))
    }

    /// Load from path, falling back to an empty seed when the file is missing
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "seed_file_unreadable_using_empty"
                );
                Self::default()
            }
        }
    }
}
