//! `Cinema` facade: the surface the presentation layer talks to
//!
//! One store transaction per call. Reads run under the same lock, so every
//! operation observes a fully-committed graph; failed operations leave no
//! partial writes behind.

use crate::domain::types::{
    CouponId, EntityKind, MovieId, PaymentCardId, ReviewId, RoleId, RoleKind, Runtime,
    ScreeningId, ScreeningSeatId, ShowroomId, TheaterId, TicketId, UserId,
};
use crate::domain::{CoreError, CoreResult};
use crate::services::ledger::{SeatMap, TicketDetails};
use crate::services::{accounts, cascade, inventory, ledger, scheduler};
use crate::store::Store;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Summary of one screening, as rendered in listings.
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningSummary {
    pub screening_id: ScreeningId,
    pub movie_title: String,
    pub showroom_letter: char,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub seats_booked: usize,
    pub seats_available: usize,
    pub seats_total: usize,
}

#[derive(Debug, Default)]
pub struct Cinema {
    store: Store,
}

impl Cinema {
    pub fn new() -> Self {
        Self::default()
    }

    // --- inventory ---

    pub fn add_theater(&self, name: &str) -> CoreResult<TheaterId> {
        self.store.transact(|graph| Ok(inventory::add_theater(graph, name)))
    }

    pub fn add_movie(&self, title: &str, runtime: Runtime) -> CoreResult<MovieId> {
        self.store
            .transact(|graph| Ok(inventory::add_movie(graph, title, runtime)))
    }

    pub fn add_showroom(
        &self,
        theater: Option<TheaterId>,
        letter: char,
        rows: u16,
        seats_per_row: u16,
    ) -> CoreResult<ShowroomId> {
        self.store
            .transact(|graph| inventory::add_showroom(graph, theater, letter, rows, seats_per_row))
    }

    pub fn movie_by_title(&self, title: &str) -> CoreResult<Option<MovieId>> {
        self.store.read(|graph| Ok(inventory::find_movie_by_title(graph, title)))
    }

    pub fn showroom_by_letter(&self, letter: char) -> CoreResult<Option<ShowroomId>> {
        self.store
            .read(|graph| Ok(inventory::find_showroom_by_letter(graph, letter)))
    }

    // --- scheduling ---

    pub fn schedule_screening(
        &self,
        movie: MovieId,
        showroom: ShowroomId,
        start: NaiveDateTime,
    ) -> CoreResult<ScreeningId> {
        self.store
            .transact(|graph| scheduler::schedule(graph, movie, showroom, start))
    }

    pub fn screenings_by_movie(&self, movie: MovieId) -> CoreResult<Vec<ScreeningId>> {
        self.store.read(|graph| scheduler::screenings_by_movie(graph, movie))
    }

    pub fn screenings_by_showroom(&self, showroom: ShowroomId) -> CoreResult<Vec<ScreeningId>> {
        self.store
            .read(|graph| scheduler::screenings_by_showroom(graph, showroom))
    }

    pub fn screenings_starting_at_or_after(
        &self,
        instant: NaiveDateTime,
    ) -> CoreResult<Vec<ScreeningId>> {
        self.store
            .read(|graph| Ok(scheduler::screenings_starting_at_or_after(graph, instant)))
    }

    pub fn screenings_starting_at_or_before(
        &self,
        instant: NaiveDateTime,
    ) -> CoreResult<Vec<ScreeningId>> {
        self.store
            .read(|graph| Ok(scheduler::screenings_starting_at_or_before(graph, instant)))
    }

    pub fn screening_summary(&self, screening_id: ScreeningId) -> CoreResult<ScreeningSummary> {
        self.store.read(|graph| {
            let screening = graph.screening(screening_id)?;
            let movie_title = match screening.movie {
                Some(movie_id) => graph.movie(movie_id)?.title.clone(),
                None => {
                    return Err(CoreError::InvalidState(format!(
                        "screening {screening_id} has no movie"
                    )))
                }
            };
            let showroom_letter = match screening.showroom {
                Some(showroom_id) => graph.showroom(showroom_id)?.letter,
                None => {
                    return Err(CoreError::InvalidState(format!(
                        "screening {screening_id} has no showroom"
                    )))
                }
            };
            let (booked, available, total) = ledger::occupancy(graph, screening_id)?;
            Ok(ScreeningSummary {
                screening_id,
                movie_title,
                showroom_letter,
                start: screening.start,
                end: screening.end,
                seats_booked: booked,
                seats_available: available,
                seats_total: total,
            })
        })
    }

    // --- seat ledger ---

    pub fn seat_map(&self, screening: ScreeningId) -> CoreResult<SeatMap> {
        self.store.read(|graph| ledger::seat_map(graph, screening))
    }

    pub fn book_seat(&self, seat: ScreeningSeatId, details: TicketDetails) -> CoreResult<TicketId> {
        self.store.transact(|graph| ledger::book_seat(graph, seat, &details))
    }

    pub fn release_seat(&self, seat: ScreeningSeatId) -> CoreResult<()> {
        self.store.transact(|graph| ledger::release(graph, seat))
    }

    /// Cancel a ticket: deletes it through its cascade hook, which clears
    /// the seat binding and the owner's reference.
    pub fn cancel_ticket(&self, ticket: TicketId) -> CoreResult<()> {
        self.store
            .transact(|graph| cascade::delete(graph, EntityKind::Ticket, ticket.0))
    }

    pub fn seat_by_ticket(&self, ticket: TicketId) -> CoreResult<ScreeningSeatId> {
        self.store.read(|graph| ledger::seat_by_ticket(graph, ticket))
    }

    // --- accounts ---

    pub fn register_user(&self, email: &str) -> CoreResult<UserId> {
        self.store.transact(|graph| accounts::register_user(graph, email))
    }

    pub fn grant_role(&self, user: UserId, kind: RoleKind) -> CoreResult<RoleId> {
        self.store.transact(|graph| accounts::grant_role(graph, user, kind))
    }

    pub fn write_review(
        &self,
        writer: RoleId,
        movie: MovieId,
        rating: u8,
        text: &str,
    ) -> CoreResult<ReviewId> {
        self.store
            .transact(|graph| accounts::write_review(graph, writer, movie, rating, text))
    }

    pub fn add_payment_card(
        &self,
        owner: RoleId,
        last_four: &str,
        expiry: &str,
        billing: accounts::AddressDetails,
    ) -> CoreResult<PaymentCardId> {
        self.store
            .transact(|graph| accounts::add_payment_card(graph, owner, last_four, expiry, billing))
    }

    pub fn issue_coupon(&self, owner: RoleId, description: &str) -> CoreResult<CouponId> {
        self.store
            .transact(|graph| accounts::issue_coupon(graph, owner, description))
    }

    pub fn censor_review(&self, moderator: RoleId, review: ReviewId) -> CoreResult<()> {
        self.store
            .transact(|graph| accounts::censor_review(graph, moderator, review))
    }

    pub fn censor_user(&self, moderator: RoleId, user: UserId) -> CoreResult<()> {
        self.store
            .transact(|graph| accounts::censor_user(graph, moderator, user))
    }

    pub fn assign_mentor(&self, admin: RoleId, trainee: RoleId) -> CoreResult<()> {
        self.store
            .transact(|graph| accounts::assign_mentor(graph, admin, trainee))
    }

    pub fn assign_theater(&self, admin: RoleId, theater: TheaterId) -> CoreResult<()> {
        self.store
            .transact(|graph| accounts::assign_theater(graph, admin, theater))
    }

    // --- deletion ---

    /// Delete any entity through the cascade protocol.
    pub fn delete(&self, kind: EntityKind, id: u64) -> CoreResult<()> {
        self.store.transact(|graph| cascade::delete(graph, kind, id))
    }

    /// Delete every entity of a kind through the cascade protocol.
    pub fn delete_all(&self, kind: EntityKind) -> CoreResult<()> {
        self.store.transact(|graph| cascade::delete_all(graph, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn showtime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn demo_cinema() -> (Cinema, ScreeningId, RoleId) {
        let cinema = Cinema::new();
        let movie = cinema.add_movie("Dune", Runtime::new(2, 35)).unwrap();
        let showroom = cinema.add_showroom(None, 'A', 4, 25).unwrap();
        let screening = cinema.schedule_screening(movie, showroom, showtime()).unwrap();
        let user = cinema.register_user("ada@example.com").unwrap();
        let customer = cinema.grant_role(user, RoleKind::Customer).unwrap();
        (cinema, screening, customer)
    }

    #[test]
    fn test_schedule_and_summary() {
        let (cinema, screening, _) = demo_cinema();

        let summary = cinema.screening_summary(screening).unwrap();
        assert_eq!(summary.movie_title, "Dune");
        assert_eq!(summary.showroom_letter, 'A');
        assert_eq!(summary.seats_total, 100);
        assert_eq!(summary.seats_available, 100);
    }

    #[test]
    fn test_time_window_listing() {
        let (cinema, early, _) = demo_cinema();
        let movie = cinema.movie_by_title("Dune").unwrap().unwrap();
        let showroom = cinema.showroom_by_letter('A').unwrap().unwrap();
        let late_start = showtime() + chrono::Duration::hours(4);
        let late = cinema.schedule_screening(movie, showroom, late_start).unwrap();

        let cutoff = showtime() + chrono::Duration::hours(1);
        assert_eq!(cinema.screenings_starting_at_or_after(cutoff).unwrap(), vec![late]);
        assert_eq!(cinema.screenings_starting_at_or_before(cutoff).unwrap(), vec![early]);
    }

    #[test]
    fn test_cancel_ticket_roundtrip() {
        let (cinema, screening, customer) = demo_cinema();
        let seat = cinema.seat_map(screening).unwrap().rows[0].seats[0].seat_id;

        let ticket = cinema
            .book_seat(seat, TicketDetails { customer, payment_card: None })
            .unwrap();
        assert_eq!(cinema.seat_by_ticket(ticket).unwrap(), seat);
        assert_eq!(cinema.screening_summary(screening).unwrap().seats_booked, 1);

        cinema.cancel_ticket(ticket).unwrap();
        assert_eq!(cinema.screening_summary(screening).unwrap().seats_booked, 0);

        let err = cinema.cancel_ticket(ticket).unwrap_err();
        assert_eq!(err, CoreError::not_found(EntityKind::Ticket, ticket.0));
    }

    #[test]
    fn test_concurrent_booking_single_winner() {
        let (cinema, screening, customer) = demo_cinema();
        let seat = cinema.seat_map(screening).unwrap().rows[0].seats[0].seat_id;
        let cinema = Arc::new(cinema);

        let mut handles = Vec::new();
        for _ in 0..2 {
            let cinema = Arc::clone(&cinema);
            handles.push(std::thread::spawn(move || {
                cinema.book_seat(seat, TicketDetails { customer, payment_card: None })
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        let losses = results
            .iter()
            .filter(|r| matches!(r, Err(CoreError::AlreadyBooked { .. })))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(losses, 1);
    }

    #[test]
    fn test_concurrent_scheduling_serialized() {
        let cinema = Arc::new(Cinema::new());
        let movie = cinema.add_movie("Dune", Runtime::new(2, 35)).unwrap();
        let showroom = cinema.add_showroom(None, 'A', 1, 1).unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cinema = Arc::clone(&cinema);
            handles.push(std::thread::spawn(move || {
                cinema.schedule_screening(movie, showroom, showtime())
            }));
        }
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let accepted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(CoreError::ScheduleConflict { .. }))));
    }

    #[test]
    fn test_delete_all_of_kind_via_facade() {
        let (cinema, screening, customer) = demo_cinema();
        let seat = cinema.seat_map(screening).unwrap().rows[0].seats[0].seat_id;
        cinema
            .book_seat(seat, TicketDetails { customer, payment_card: None })
            .unwrap();

        cinema.delete_all(EntityKind::Showroom).unwrap();

        assert!(cinema.seat_map(screening).is_err());
        assert!(cinema.showroom_by_letter('A').unwrap().is_none());
    }
}
