//! Screening scheduler
//!
//! Places a movie into a showroom's calendar, rejecting any interval that
//! overlaps an existing screening in the same room, then materializes one
//! screening seat per physical seat of the showroom. The screening and its
//! seat set are written in the same unit of work: a screening is never
//! observable without its full seat set.

use crate::domain::entities::{Screening, ScreeningSeat};
use crate::domain::types::{MovieId, ScreeningId, ScreeningSeatId, ShowroomId, ShowroomSeatId};
use crate::domain::{CoreError, CoreResult};
use crate::store::Graph;
use chrono::NaiveDateTime;
use tracing::{debug, info};

/// Boundary-inclusive interval overlap, as the calendar has always applied
/// it: a screening ending exactly when another starts still clashes, so
/// back-to-back screenings are rejected.
pub fn intervals_overlap(
    start_a: NaiveDateTime,
    end_a: NaiveDateTime,
    start_b: NaiveDateTime,
    end_b: NaiveDateTime,
) -> bool {
    !(start_a > end_b) && !(start_b > end_a)
}

/// Schedule a screening of `movie` in `showroom` starting at `start`.
///
/// The end time is derived from the movie's runtime. On conflict nothing is
/// written and the clashing interval is reported back.
pub fn schedule(
    graph: &mut Graph,
    movie_id: MovieId,
    showroom_id: ShowroomId,
    start: NaiveDateTime,
) -> CoreResult<ScreeningId> {
    let movie = graph.movie(movie_id)?;
    let end = start + movie.runtime.to_duration();

    let showroom = graph.showroom(showroom_id)?;
    let letter = showroom.letter;
    for existing_id in &showroom.screenings {
        let existing = graph.screening(*existing_id)?;
        if intervals_overlap(start, end, existing.start, existing.end) {
            debug!(
                showroom = %letter,
                requested_start = %start,
                conflict_id = %existing_id,
                "screening_conflict"
            );
            return Err(CoreError::ScheduleConflict {
                showroom_letter: letter,
                conflict_start: existing.start,
                conflict_end: existing.end,
            });
        }
    }

    let screening_id = ScreeningId(graph.fresh_id());
    let mut screening = Screening {
        id: screening_id,
        movie: Some(movie_id),
        showroom: Some(showroom_id),
        start,
        end,
        seats: Default::default(),
    };
    graph.movie_mut(movie_id)?.screenings.insert(screening_id);
    graph.showroom_mut(showroom_id)?.screenings.insert(screening_id);

    // One screening seat per physical seat, initially unbound.
    let showroom_seat_ids: Vec<ShowroomSeatId> =
        graph.showroom(showroom_id)?.seats.iter().copied().collect();
    for showroom_seat_id in showroom_seat_ids {
        let seat_id = ScreeningSeatId(graph.fresh_id());
        graph.screening_seats.insert(
            seat_id,
            ScreeningSeat {
                id: seat_id,
                screening: Some(screening_id),
                showroom_seat: Some(showroom_seat_id),
                ticket: None,
            },
        );
        screening.seats.insert(seat_id);
        graph
            .showroom_seat_mut(showroom_seat_id)?
            .screening_seats
            .insert(seat_id);
    }

    let seat_count = screening.seats.len();
    graph.screenings.insert(screening_id, screening);

    info!(
        screening_id = %screening_id,
        movie_id = %movie_id,
        showroom = %letter,
        start = %start,
        end = %end,
        seats = %seat_count,
        "screening_scheduled"
    );
    Ok(screening_id)
}

/// All screenings of a movie, ordered by start time.
pub fn screenings_by_movie(graph: &Graph, movie_id: MovieId) -> CoreResult<Vec<ScreeningId>> {
    let movie = graph.movie(movie_id)?;
    let mut ids: Vec<ScreeningId> = movie.screenings.iter().copied().collect();
    ids.sort_by_key(|id| graph.screenings.get(id).map(|s| s.start));
    Ok(ids)
}

/// All screenings held in a showroom, ordered by start time.
pub fn screenings_by_showroom(
    graph: &Graph,
    showroom_id: ShowroomId,
) -> CoreResult<Vec<ScreeningId>> {
    let showroom = graph.showroom(showroom_id)?;
    let mut ids: Vec<ScreeningId> = showroom.screenings.iter().copied().collect();
    ids.sort_by_key(|id| graph.screenings.get(id).map(|s| s.start));
    Ok(ids)
}

/// Screenings starting at or after the given instant, across all showrooms.
pub fn screenings_starting_at_or_after(graph: &Graph, instant: NaiveDateTime) -> Vec<ScreeningId> {
    let mut ids: Vec<ScreeningId> = graph
        .screenings
        .values()
        .filter(|s| s.start >= instant)
        .map(|s| s.id)
        .collect();
    ids.sort_by_key(|id| graph.screenings[id].start);
    ids
}

/// Screenings starting at or before the given instant, across all showrooms.
pub fn screenings_starting_at_or_before(graph: &Graph, instant: NaiveDateTime) -> Vec<ScreeningId> {
    let mut ids: Vec<ScreeningId> = graph
        .screenings
        .values()
        .filter(|s| s.start <= instant)
        .map(|s| s.id)
        .collect();
    ids.sort_by_key(|id| graph.screenings[id].start);
    ids
}
