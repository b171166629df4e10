//! Showroom inventory: theaters, movies, and the physical seat layout
//!
//! A showroom's seats are materialized once, when the showroom is created:
//! `rows` lettered rows with `seats_per_row` numbered seats each. Every
//! screening scheduled into the showroom later mirrors this layout.

use crate::domain::entities::{Movie, Showroom, ShowroomSeat, Theater};
use crate::domain::types::{MovieId, Runtime, ShowroomId, ShowroomSeatId, TheaterId};
use crate::domain::{CoreError, CoreResult};
use crate::store::Graph;
use tracing::{debug, info};

/// Rows are lettered A..Z, so a showroom holds at most 26 of them.
const MAX_ROWS: u16 = 26;

pub fn add_theater(graph: &mut Graph, name: &str) -> TheaterId {
    let id = TheaterId(graph.fresh_id());
    graph.theaters.insert(id, Theater::new(id, name));
    info!(theater_id = %id, name = %name, "theater_added");
    id
}

pub fn add_movie(graph: &mut Graph, title: &str, runtime: Runtime) -> MovieId {
    let id = MovieId(graph.fresh_id());
    graph.movies.insert(id, Movie::new(id, title, runtime));
    info!(movie_id = %id, title = %title, runtime = %runtime, "movie_added");
    id
}

/// Create a showroom and materialize its physical seats.
pub fn add_showroom(
    graph: &mut Graph,
    theater: Option<TheaterId>,
    letter: char,
    rows: u16,
    seats_per_row: u16,
) -> CoreResult<ShowroomId> {
    if graph.showrooms.values().any(|room| room.letter == letter) {
        return Err(CoreError::AlreadyExists(format!("showroom {letter}")));
    }
    if rows == 0 || rows > MAX_ROWS {
        return Err(CoreError::InvalidState(format!(
            "showroom rows must be between 1 and {MAX_ROWS}, got {rows}"
        )));
    }

    let id = ShowroomId(graph.fresh_id());
    let mut showroom = Showroom::new(id, letter);

    if let Some(theater_id) = theater {
        graph.theater_mut(theater_id)?.showrooms.insert(id);
        showroom.theater = Some(theater_id);
    }

    for row_index in 0..rows {
        let row = (b'A' + row_index as u8) as char;
        for number in 1..=seats_per_row {
            let seat_id = ShowroomSeatId(graph.fresh_id());
            graph
                .showroom_seats
                .insert(seat_id, ShowroomSeat::new(seat_id, id, row, number));
            showroom.seats.insert(seat_id);
        }
    }

    debug!(
        showroom_id = %id,
        letter = %letter,
        seats = %showroom.seats.len(),
        "showroom_seats_materialized"
    );

    graph.showrooms.insert(id, showroom);
    info!(showroom_id = %id, letter = %letter, rows = %rows, seats_per_row = %seats_per_row, "showroom_added");
    Ok(id)
}

/// Indexed lookup: movie by title (case-insensitive).
pub fn find_movie_by_title(graph: &Graph, title: &str) -> Option<MovieId> {
    graph
        .movies
        .values()
        .find(|movie| movie.title.eq_ignore_ascii_case(title))
        .map(|movie| movie.id)
}

/// Indexed lookup: showroom by its unique letter.
pub fn find_showroom_by_letter(graph: &Graph, letter: char) -> Option<ShowroomId> {
    graph
        .showrooms
        .values()
        .find(|room| room.letter == letter)
        .map(|room| room.id)
}
