//! Applies a seed file to a `Cinema` through the same facade operations the
//! presentation layer uses. Seeding adds no invariants of its own; any
//! unresolved reference fails fast with context.

use crate::domain::types::Runtime;
use crate::infra::config::SeedConfig;
use crate::services::Cinema;
use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use tracing::info;

const START_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn load_seed(cinema: &Cinema, config: &SeedConfig) -> anyhow::Result<()> {
    let mut theater_ids = std::collections::HashMap::new();
    for theater in &config.theaters {
        let id = cinema
            .add_theater(&theater.name)
            .with_context(|| format!("seeding theater {}", theater.name))?;
        theater_ids.insert(theater.name.clone(), id);
    }

    for movie in &config.movies {
        cinema
            .add_movie(&movie.title, Runtime::new(movie.hours, movie.minutes))
            .with_context(|| format!("seeding movie {}", movie.title))?;
    }

    for showroom in &config.showrooms {
        let theater = match &showroom.theater {
            Some(name) => Some(
                *theater_ids
                    .get(name)
                    .with_context(|| format!("showroom {} references unknown theater {name}", showroom.letter))?,
            ),
            None => None,
        };
        cinema
            .add_showroom(theater, showroom.letter, showroom.rows, showroom.seats_per_row)
            .with_context(|| format!("seeding showroom {}", showroom.letter))?;
    }

    for screening in &config.screenings {
        let movie = cinema
            .movie_by_title(&screening.movie)?
            .with_context(|| format!("screening references unknown movie {}", screening.movie))?;
        let showroom = cinema
            .showroom_by_letter(screening.showroom)?
            .with_context(|| format!("screening references unknown showroom {}", screening.showroom))?;
        let start = NaiveDateTime::parse_from_str(&screening.start, START_FORMAT)
            .with_context(|| format!("invalid screening start {}", screening.start))?;
        cinema
            .schedule_screening(movie, showroom, start)
            .with_context(|| format!("seeding screening of {} at {}", screening.movie, screening.start))?;
    }

    for user in &config.users {
        let user_id = cinema
            .register_user(&user.email)
            .with_context(|| format!("seeding user {}", user.email))?;
        for role in &user.roles {
            let kind = match role.parse() {
                Ok(kind) => kind,
                Err(err) => bail!("user {}: {err}", user.email),
            };
            cinema
                .grant_role(user_id, kind)
                .with_context(|| format!("granting {role} to {}", user.email))?;
        }
    }

    info!(
        theaters = %config.theaters.len(),
        movies = %config.movies.len(),
        showrooms = %config.showrooms.len(),
        screenings = %config.screenings.len(),
        users = %config.users.len(),
        "seed_loaded"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_applies_through_facade() {
        let config: SeedConfig = toml::from_str(
            r#"
[[theaters]]
name = "Downtown"

[[movies]]
title = "Dune"
hours = 2
minutes = 35

[[showrooms]]
letter = "A"
rows = 4
seats_per_row = 25
theater = "Downtown"

[[screenings]]
movie = "Dune"
showroom = "A"
start = "2026-09-01T18:00"
"#,
        )
        .unwrap();

        let cinema = Cinema::new();
        load_seed(&cinema, &config).unwrap();

        let movie = cinema.movie_by_title("Dune").unwrap().unwrap();
        let screenings = cinema.screenings_by_movie(movie).unwrap();
        assert_eq!(screenings.len(), 1);
        assert_eq!(cinema.seat_map(screenings[0]).unwrap().total_seats(), 100);
    }

    #[test]
    fn test_seed_fails_on_unknown_movie() {
        let config: SeedConfig = toml::from_str(
            r#"
[[showrooms]]
letter = "A"
rows = 1
seats_per_row = 1

[[screenings]]
movie = "Missing"
showroom = "A"
start = "2026-09-01T18:00"
"#,
        )
        .unwrap();

        let cinema = Cinema::new();
        assert!(load_seed(&cinema, &config).is_err());
    }
}
