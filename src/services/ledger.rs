//! Seat reservation ledger
//!
//! Per-screening view of the showroom's seats with booked/available status,
//! and the booking/release operations that bind a ticket to a seat. The
//! seat↔ticket references are kept mutually consistent: the seat points at
//! the ticket iff the ticket points at the seat.

use crate::domain::entities::{RoleData, Ticket};
use crate::domain::types::{
    PaymentCardId, RoleId, ScreeningId, ScreeningSeatId, TicketId, TicketStatus,
};
use crate::domain::{CoreError, CoreResult};
use crate::store::Graph;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// One bookable seat as rendered in the seat map.
#[derive(Debug, Clone, Serialize)]
pub struct SeatView {
    pub seat_id: ScreeningSeatId,
    pub number: u16,
    pub booked: bool,
}

/// One lettered row of the seat map, seats ordered by number.
#[derive(Debug, Clone, Serialize)]
pub struct SeatMapRow {
    pub row: char,
    pub seats: Vec<SeatView>,
}

/// Row-ordered, seat-number-ordered view of a screening's seats.
#[derive(Debug, Clone, Serialize)]
pub struct SeatMap {
    pub screening_id: ScreeningId,
    pub rows: Vec<SeatMapRow>,
}

impl SeatMap {
    pub fn total_seats(&self) -> usize {
        self.rows.iter().map(|row| row.seats.len()).sum()
    }

    pub fn booked_seats(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| &row.seats)
            .filter(|seat| seat.booked)
            .count()
    }

    pub fn available_seats(&self) -> usize {
        self.total_seats() - self.booked_seats()
    }
}

/// Booking details supplied by the caller: who is buying, and with what.
#[derive(Debug, Clone)]
pub struct TicketDetails {
    /// Customer role assignment buying the ticket
    pub customer: RoleId,
    pub payment_card: Option<PaymentCardId>,
}

/// Build the deterministic seat map for a screening: rows grouped by letter
/// ascending, seats within a row ordered by number ascending.
pub fn seat_map(graph: &Graph, screening_id: ScreeningId) -> CoreResult<SeatMap> {
    let screening = graph.screening(screening_id)?;

    let mut by_row: BTreeMap<char, BTreeMap<u16, SeatView>> = BTreeMap::new();
    for seat_id in &screening.seats {
        let seat = graph.screening_seat(*seat_id)?;
        let physical_id = seat.showroom_seat.ok_or_else(|| {
            CoreError::InvalidState(format!("screening seat {seat_id} has no showroom seat"))
        })?;
        let physical = graph.showroom_seat(physical_id)?;
        by_row.entry(physical.row).or_default().insert(
            physical.number,
            SeatView {
                seat_id: *seat_id,
                number: physical.number,
                booked: seat.ticket.is_some(),
            },
        );
    }

    Ok(SeatMap {
        screening_id,
        rows: by_row
            .into_iter()
            .map(|(row, seats)| SeatMapRow {
                row,
                seats: seats.into_values().collect(),
            })
            .collect(),
    })
}

/// Book a screening seat, creating the ticket and binding both references.
///
/// Exactly one of two concurrent attempts on the same seat wins; the loser
/// gets `AlreadyBooked`.
pub fn book_seat(
    graph: &mut Graph,
    seat_id: ScreeningSeatId,
    details: &TicketDetails,
) -> CoreResult<TicketId> {
    let seat = graph.screening_seat(seat_id)?;
    if seat.ticket.is_some() {
        return Err(CoreError::AlreadyBooked { seat: seat_id });
    }

    let role = graph.role(details.customer)?;
    if !matches!(role.data, RoleData::Customer { .. }) {
        return Err(CoreError::InvalidState(format!(
            "role {} is not a customer role",
            details.customer
        )));
    }
    if let Some(card_id) = details.payment_card {
        graph.payment_card(card_id)?;
    }

    let ticket_id = TicketId(graph.fresh_id());
    graph.tickets.insert(
        ticket_id,
        Ticket {
            id: ticket_id,
            owner: Some(details.customer),
            seat: Some(seat_id),
            payment_card: details.payment_card,
            status: TicketStatus::Valid,
        },
    );
    graph.screening_seat_mut(seat_id)?.ticket = Some(ticket_id);
    if let RoleData::Customer { tickets, .. } = &mut graph.role_mut(details.customer)?.data {
        tickets.insert(ticket_id);
    }
    if let Some(card_id) = details.payment_card {
        graph.payment_card_mut(card_id)?.tickets.insert(ticket_id);
    }

    info!(ticket_id = %ticket_id, seat_id = %seat_id, customer = %details.customer, "seat_booked");
    Ok(ticket_id)
}

/// Clear the seat↔ticket binding. No-op when the seat is already unbound;
/// the detached ticket survives.
pub fn release(graph: &mut Graph, seat_id: ScreeningSeatId) -> CoreResult<()> {
    let seat = graph.screening_seat_mut(seat_id)?;
    let Some(ticket_id) = seat.ticket.take() else {
        return Ok(());
    };
    graph.ticket_mut(ticket_id)?.seat = None;
    debug!(seat_id = %seat_id, ticket_id = %ticket_id, "seat_released");
    Ok(())
}

/// Reverse lookup: the screening seat a ticket is bound to.
pub fn seat_by_ticket(graph: &Graph, ticket_id: TicketId) -> CoreResult<ScreeningSeatId> {
    let ticket = graph.ticket(ticket_id)?;
    let seat_id = ticket.seat.ok_or_else(|| {
        CoreError::InvalidState(format!("ticket {ticket_id} is not bound to a seat"))
    })?;
    // bidirectional consistency check
    let seat = graph.screening_seat(seat_id)?;
    if seat.ticket != Some(ticket_id) {
        return Err(CoreError::InvalidState(format!(
            "seat {seat_id} does not point back at ticket {ticket_id}"
        )));
    }
    Ok(seat_id)
}

/// Booked / available / total seat counts for a screening.
pub fn occupancy(graph: &Graph, screening_id: ScreeningId) -> CoreResult<(usize, usize, usize)> {
    let screening = graph.screening(screening_id)?;
    let total = screening.seats.len();
    let mut booked = 0;
    for seat_id in &screening.seats {
        if graph.screening_seat(*seat_id)?.ticket.is_some() {
            booked += 1;
        }
    }
    Ok((booked, total - booked, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{EntityKind, RoleKind, Runtime};
    use crate::services::{accounts, inventory, scheduler};
    use chrono::{NaiveDate, NaiveDateTime};

    fn showtime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 9, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn booked_screening_setup(graph: &mut Graph) -> (ScreeningId, RoleId) {
        let movie = inventory::add_movie(graph, "Dune", Runtime::new(2, 35));
        let showroom = inventory::add_showroom(graph, None, 'A', 4, 25).unwrap();
        let screening = scheduler::schedule(graph, movie, showroom, showtime()).unwrap();
        let user = accounts::register_user(graph, "ada@example.com").unwrap();
        let customer = accounts::grant_role(graph, user, RoleKind::Customer).unwrap();
        (screening, customer)
    }

    fn first_seat(graph: &Graph, screening: ScreeningId) -> ScreeningSeatId {
        seat_map(graph, screening).unwrap().rows[0].seats[0].seat_id
    }

    #[test]
    fn test_seat_map_ordering() {
        let mut graph = Graph::default();
        let (screening, _) = booked_screening_setup(&mut graph);

        let map = seat_map(&graph, screening).unwrap();
        assert_eq!(map.rows.len(), 4);
        assert_eq!(
            map.rows.iter().map(|r| r.row).collect::<Vec<_>>(),
            vec!['A', 'B', 'C', 'D']
        );
        for row in &map.rows {
            let numbers: Vec<u16> = row.seats.iter().map(|s| s.number).collect();
            assert_eq!(numbers, (1..=25).collect::<Vec<u16>>());
        }
        assert_eq!(map.total_seats(), 100);
        assert_eq!(map.available_seats(), 100);
    }

    #[test]
    fn test_book_and_double_book() {
        let mut graph = Graph::default();
        let (screening, customer) = booked_screening_setup(&mut graph);
        let seat = first_seat(&graph, screening);
        let details = TicketDetails { customer, payment_card: None };

        let ticket = book_seat(&mut graph, seat, &details).unwrap();
        assert_eq!(graph.screening_seat(seat).unwrap().ticket, Some(ticket));
        assert_eq!(seat_by_ticket(&graph, ticket).unwrap(), seat);

        let err = book_seat(&mut graph, seat, &details).unwrap_err();
        assert_eq!(err, CoreError::AlreadyBooked { seat });

        assert_eq!(occupancy(&graph, screening).unwrap(), (1, 99, 100));
    }

    #[test]
    fn test_booking_requires_customer_role() {
        let mut graph = Graph::default();
        let (screening, _) = booked_screening_setup(&mut graph);
        let seat = first_seat(&graph, screening);

        let user = accounts::register_user(&mut graph, "mod@example.com").unwrap();
        let moderator = accounts::grant_role(&mut graph, user, RoleKind::Moderator).unwrap();

        let err = book_seat(
            &mut graph,
            seat,
            &TicketDetails { customer: moderator, payment_card: None },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidState(_)));
    }

    #[test]
    fn test_booking_with_unknown_card() {
        let mut graph = Graph::default();
        let (screening, customer) = booked_screening_setup(&mut graph);
        let seat = first_seat(&graph, screening);

        let err = book_seat(
            &mut graph,
            seat,
            &TicketDetails { customer, payment_card: Some(crate::domain::types::PaymentCardId(404)) },
        )
        .unwrap_err();
        assert_eq!(err, CoreError::not_found(EntityKind::PaymentCard, 404));
        // nothing was bound
        assert!(graph.screening_seat(seat).unwrap().ticket.is_none());
        assert!(graph.tickets.is_empty());
    }

    #[test]
    fn test_release_is_idempotent() {
        let mut graph = Graph::default();
        let (screening, customer) = booked_screening_setup(&mut graph);
        let seat = first_seat(&graph, screening);

        release(&mut graph, seat).unwrap();

        let ticket = book_seat(
            &mut graph,
            seat,
            &TicketDetails { customer, payment_card: None },
        )
        .unwrap();
        release(&mut graph, seat).unwrap();

        assert!(graph.screening_seat(seat).unwrap().ticket.is_none());
        assert_eq!(graph.ticket(ticket).unwrap().seat, None);

        release(&mut graph, seat).unwrap();
    }
}
