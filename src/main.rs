//! Marquee - screening calendar and seat inventory demo binary
//!
//! Loads a TOML seed file, schedules its screenings, and prints the
//! resulting calendar with per-screening seat availability.
//!
//! Module structure:
//! - `domain/` - Core types (entities, ids, errors)
//! - `store/` - Entity graph store with transactional units of work
//! - `services/` - Business logic (Scheduler, Ledger, Cascade, Cinema facade)
//! - `infra/` - Infrastructure (seed config, fixture loading)

use clap::Parser;
use marquee::infra::{load_seed, SeedConfig};
use marquee::services::Cinema;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// Marquee - theater screening calendar and seat inventory
#[derive(Parser, Debug)]
#[command(name = "marquee", version, about)]
struct Args {
    /// Path to TOML seed file
    #[arg(short, long, default_value = "config/demo.toml")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Structured logging, level configurable via RUST_LOG (default: INFO)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .init();

    info!("marquee starting");

    let args = Args::parse();
    let config = SeedConfig::load_from_path(&args.config);

    info!(
        config_file = %args.config,
        theaters = %config.theaters.len(),
        movies = %config.movies.len(),
        showrooms = %config.showrooms.len(),
        screenings = %config.screenings.len(),
        "config_loaded"
    );

    let cinema = Cinema::new();
    load_seed(&cinema, &config)?;

    // Print the calendar per showroom
    for showroom in &config.showrooms {
        let Some(showroom_id) = cinema.showroom_by_letter(showroom.letter)? else {
            continue;
        };
        for screening_id in cinema.screenings_by_showroom(showroom_id)? {
            let summary = cinema.screening_summary(screening_id)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    info!("marquee done");
    Ok(())
}
