//! Cascading referential-integrity manager
//!
//! Every deletion routes through the per-kind hook here; nothing else in the
//! crate removes a record from an arena. Each hook walks the entity's direct
//! relationships before the record is dropped:
//!
//! - references from entities that survive are *detached*: the far side's
//!   collection loses this id and its back-reference is cleared;
//! - owned entities are *cascaded*: recursively deleted through their own
//!   hook, completing fully before the parent record disappears.
//!
//! Owned collections are iterated over a snapshot copy, because each child
//! deletion removes itself from the very collection being walked. After the
//! hook finishes, no surviving record references the deleted id.

use crate::domain::entities::RoleData;
use crate::domain::types::{
    AddressId, CouponId, EntityKind, MovieId, PaymentCardId, ReviewId, RoleId, ScreeningId,
    ScreeningSeatId, ShowroomId, ShowroomSeatId, TheaterId, TicketId, UserId,
};
use crate::domain::CoreResult;
use crate::store::Graph;
use tracing::{debug, info};

/// Delete one entity of the given kind, detaching and cascading first.
/// A second delete of the same id fails with `NotFound`.
pub fn delete(graph: &mut Graph, kind: EntityKind, id: u64) -> CoreResult<()> {
    match kind {
        EntityKind::Theater => delete_theater(graph, TheaterId(id)),
        EntityKind::Showroom => delete_showroom(graph, ShowroomId(id)),
        EntityKind::ShowroomSeat => delete_showroom_seat(graph, ShowroomSeatId(id)),
        EntityKind::Movie => delete_movie(graph, MovieId(id)),
        EntityKind::Screening => delete_screening(graph, ScreeningId(id)),
        EntityKind::ScreeningSeat => delete_screening_seat(graph, ScreeningSeatId(id)),
        EntityKind::Ticket => delete_ticket(graph, TicketId(id)),
        EntityKind::User => delete_user(graph, UserId(id)),
        EntityKind::Role => delete_role(graph, RoleId(id)),
        EntityKind::Review => delete_review(graph, ReviewId(id)),
        EntityKind::PaymentCard => delete_payment_card(graph, PaymentCardId(id)),
        EntityKind::Coupon => delete_coupon(graph, CouponId(id)),
        EntityKind::Address => delete_address(graph, AddressId(id)),
    }
}

/// Delete every record of a kind: run the hook for each surviving record,
/// skipping ids a sibling's cascade already removed, until the arena is empty.
pub fn delete_all(graph: &mut Graph, kind: EntityKind) -> CoreResult<()> {
    let ids = raw_ids(graph, kind);
    for id in ids {
        if exists(graph, kind, id) {
            delete(graph, kind, id)?;
        }
    }
    info!(kind = %kind, "all_deleted");
    Ok(())
}

fn raw_ids(graph: &Graph, kind: EntityKind) -> Vec<u64> {
    match kind {
        EntityKind::Theater => graph.theaters.keys().map(|id| id.0).collect(),
        EntityKind::Showroom => graph.showrooms.keys().map(|id| id.0).collect(),
        EntityKind::ShowroomSeat => graph.showroom_seats.keys().map(|id| id.0).collect(),
        EntityKind::Movie => graph.movies.keys().map(|id| id.0).collect(),
        EntityKind::Screening => graph.screenings.keys().map(|id| id.0).collect(),
        EntityKind::ScreeningSeat => graph.screening_seats.keys().map(|id| id.0).collect(),
        EntityKind::Ticket => graph.tickets.keys().map(|id| id.0).collect(),
        EntityKind::User => graph.users.keys().map(|id| id.0).collect(),
        EntityKind::Role => graph.roles.keys().map(|id| id.0).collect(),
        EntityKind::Review => graph.reviews.keys().map(|id| id.0).collect(),
        EntityKind::PaymentCard => graph.payment_cards.keys().map(|id| id.0).collect(),
        EntityKind::Coupon => graph.coupons.keys().map(|id| id.0).collect(),
        EntityKind::Address => graph.addresses.keys().map(|id| id.0).collect(),
    }
}

fn exists(graph: &Graph, kind: EntityKind, id: u64) -> bool {
    match kind {
        EntityKind::Theater => graph.theaters.contains_key(&TheaterId(id)),
        EntityKind::Showroom => graph.showrooms.contains_key(&ShowroomId(id)),
        EntityKind::ShowroomSeat => graph.showroom_seats.contains_key(&ShowroomSeatId(id)),
        EntityKind::Movie => graph.movies.contains_key(&MovieId(id)),
        EntityKind::Screening => graph.screenings.contains_key(&ScreeningId(id)),
        EntityKind::ScreeningSeat => graph.screening_seats.contains_key(&ScreeningSeatId(id)),
        EntityKind::Ticket => graph.tickets.contains_key(&TicketId(id)),
        EntityKind::User => graph.users.contains_key(&UserId(id)),
        EntityKind::Role => graph.roles.contains_key(&RoleId(id)),
        EntityKind::Review => graph.reviews.contains_key(&ReviewId(id)),
        EntityKind::PaymentCard => graph.payment_cards.contains_key(&PaymentCardId(id)),
        EntityKind::Coupon => graph.coupons.contains_key(&CouponId(id)),
        EntityKind::Address => graph.addresses.contains_key(&AddressId(id)),
    }
}

fn delete_theater(graph: &mut Graph, id: TheaterId) -> CoreResult<()> {
    graph.theater(id)?;
    // detach managing admins
    let admins: Vec<RoleId> = graph.theater(id)?.admins.iter().copied().collect();
    for admin in admins {
        if let RoleData::Admin { theaters, .. } = &mut graph.role_mut(admin)?.data {
            theaters.remove(&id);
        }
    }
    // cascade showrooms
    let showrooms: Vec<ShowroomId> = graph.theater(id)?.showrooms.iter().copied().collect();
    for showroom in showrooms {
        delete_showroom(graph, showroom)?;
    }
    graph.theaters.remove(&id);
    debug!(theater_id = %id, "theater_deleted");
    Ok(())
}

fn delete_showroom(graph: &mut Graph, id: ShowroomId) -> CoreResult<()> {
    // detach theater
    if let Some(theater_id) = graph.showroom(id)?.theater {
        graph.theater_mut(theater_id)?.showrooms.remove(&id);
        graph.showroom_mut(id)?.theater = None;
    }
    // cascade showroom seats
    let seats: Vec<ShowroomSeatId> = graph.showroom(id)?.seats.iter().copied().collect();
    for seat in seats {
        delete_showroom_seat(graph, seat)?;
    }
    // cascade screenings
    let screenings: Vec<ScreeningId> = graph.showroom(id)?.screenings.iter().copied().collect();
    for screening in screenings {
        delete_screening(graph, screening)?;
    }
    graph.showrooms.remove(&id);
    debug!(showroom_id = %id, "showroom_deleted");
    Ok(())
}

fn delete_showroom_seat(graph: &mut Graph, id: ShowroomSeatId) -> CoreResult<()> {
    // detach showroom
    if let Some(showroom_id) = graph.showroom_seat(id)?.showroom {
        graph.showroom_mut(showroom_id)?.seats.remove(&id);
        graph.showroom_seat_mut(id)?.showroom = None;
    }
    // cascade screening seats
    let screening_seats: Vec<ScreeningSeatId> =
        graph.showroom_seat(id)?.screening_seats.iter().copied().collect();
    for seat in screening_seats {
        delete_screening_seat(graph, seat)?;
    }
    graph.showroom_seats.remove(&id);
    Ok(())
}

fn delete_movie(graph: &mut Graph, id: MovieId) -> CoreResult<()> {
    // cascade reviews
    let reviews: Vec<ReviewId> = graph.movie(id)?.reviews.iter().copied().collect();
    for review in reviews {
        delete_review(graph, review)?;
    }
    // cascade screenings
    let screenings: Vec<ScreeningId> = graph.movie(id)?.screenings.iter().copied().collect();
    for screening in screenings {
        delete_screening(graph, screening)?;
    }
    graph.movies.remove(&id);
    debug!(movie_id = %id, "movie_deleted");
    Ok(())
}

fn delete_screening(graph: &mut Graph, id: ScreeningId) -> CoreResult<()> {
    // detach movie
    if let Some(movie_id) = graph.screening(id)?.movie {
        graph.movie_mut(movie_id)?.screenings.remove(&id);
        graph.screening_mut(id)?.movie = None;
    }
    // detach showroom
    if let Some(showroom_id) = graph.screening(id)?.showroom {
        graph.showroom_mut(showroom_id)?.screenings.remove(&id);
        graph.screening_mut(id)?.showroom = None;
    }
    // cascade screening seats
    let seats: Vec<ScreeningSeatId> = graph.screening(id)?.seats.iter().copied().collect();
    for seat in seats {
        delete_screening_seat(graph, seat)?;
    }
    graph.screenings.remove(&id);
    debug!(screening_id = %id, "screening_deleted");
    Ok(())
}

fn delete_screening_seat(graph: &mut Graph, id: ScreeningSeatId) -> CoreResult<()> {
    // cascade bound ticket, clearing both references first
    if let Some(ticket_id) = graph.screening_seat(id)?.ticket {
        graph.screening_seat_mut(id)?.ticket = None;
        graph.ticket_mut(ticket_id)?.seat = None;
        delete_ticket(graph, ticket_id)?;
    }
    // detach screening
    if let Some(screening_id) = graph.screening_seat(id)?.screening {
        graph.screening_mut(screening_id)?.seats.remove(&id);
        graph.screening_seat_mut(id)?.screening = None;
    }
    // detach showroom seat
    if let Some(showroom_seat_id) = graph.screening_seat(id)?.showroom_seat {
        graph
            .showroom_seat_mut(showroom_seat_id)?
            .screening_seats
            .remove(&id);
        graph.screening_seat_mut(id)?.showroom_seat = None;
    }
    graph.screening_seats.remove(&id);
    Ok(())
}

fn delete_ticket(graph: &mut Graph, id: TicketId) -> CoreResult<()> {
    // detach owning customer role
    if let Some(owner) = graph.ticket(id)?.owner {
        if let RoleData::Customer { tickets, .. } = &mut graph.role_mut(owner)?.data {
            tickets.remove(&id);
        }
        graph.ticket_mut(id)?.owner = None;
    }
    // detach screening seat
    if let Some(seat_id) = graph.ticket(id)?.seat {
        graph.screening_seat_mut(seat_id)?.ticket = None;
        graph.ticket_mut(id)?.seat = None;
    }
    // detach payment card
    if let Some(card_id) = graph.ticket(id)?.payment_card {
        graph.payment_card_mut(card_id)?.tickets.remove(&id);
        graph.ticket_mut(id)?.payment_card = None;
    }
    graph.tickets.remove(&id);
    debug!(ticket_id = %id, "ticket_deleted");
    Ok(())
}

fn delete_user(graph: &mut Graph, id: UserId) -> CoreResult<()> {
    // detach censoring moderator
    if let Some(moderator) = graph.user(id)?.censored_by {
        if let RoleData::Moderator { censored_users, .. } = &mut graph.role_mut(moderator)?.data {
            censored_users.remove(&id);
        }
        graph.user_mut(id)?.censored_by = None;
    }
    // cascade all role assignments
    let roles: Vec<RoleId> = graph.user(id)?.roles.values().copied().collect();
    for role in roles {
        delete_role(graph, role)?;
    }
    graph.users.remove(&id);
    debug!(user_id = %id, "user_deleted");
    Ok(())
}

fn delete_role(graph: &mut Graph, id: RoleId) -> CoreResult<()> {
    // detach user
    if let Some(user_id) = graph.role(id)?.user {
        let kind = graph.role(id)?.kind();
        graph.user_mut(user_id)?.roles.remove(&kind);
        graph.role_mut(id)?.user = None;
    }
    match graph.role(id)?.data.clone() {
        RoleData::Customer {
            reviews,
            tickets,
            payment_cards,
            coupons,
        } => {
            // everything created under the customer role is owned: cascade
            for review in reviews {
                delete_review(graph, review)?;
            }
            for ticket in tickets {
                delete_ticket(graph, ticket)?;
            }
            for card in payment_cards {
                delete_payment_card(graph, card)?;
            }
            for coupon in coupons {
                delete_coupon(graph, coupon)?;
            }
        }
        RoleData::Moderator {
            censored_reviews,
            censored_users,
        } => {
            // censored records survive the moderator: detach only
            for review in censored_reviews {
                graph.review_mut(review)?.censored_by = None;
            }
            for user in censored_users {
                graph.user_mut(user)?.censored_by = None;
            }
        }
        RoleData::Admin { theaters, trainees } => {
            for theater in theaters {
                graph.theater_mut(theater)?.admins.remove(&id);
            }
            for trainee in trainees {
                if let RoleData::AdminTrainee { mentor } = &mut graph.role_mut(trainee)?.data {
                    *mentor = None;
                }
            }
        }
        RoleData::AdminTrainee { mentor } => {
            if let Some(admin) = mentor {
                if let RoleData::Admin { trainees, .. } = &mut graph.role_mut(admin)?.data {
                    trainees.remove(&id);
                }
            }
        }
    }
    graph.roles.remove(&id);
    debug!(role_id = %id, "role_deleted");
    Ok(())
}

fn delete_review(graph: &mut Graph, id: ReviewId) -> CoreResult<()> {
    // detach writing customer role
    if let Some(writer) = graph.review(id)?.writer {
        if let RoleData::Customer { reviews, .. } = &mut graph.role_mut(writer)?.data {
            reviews.remove(&id);
        }
        graph.review_mut(id)?.writer = None;
    }
    // detach movie
    if let Some(movie_id) = graph.review(id)?.movie {
        graph.movie_mut(movie_id)?.reviews.remove(&id);
        graph.review_mut(id)?.movie = None;
    }
    // detach censoring moderator
    if let Some(moderator) = graph.review(id)?.censored_by {
        if let RoleData::Moderator { censored_reviews, .. } = &mut graph.role_mut(moderator)?.data {
            censored_reviews.remove(&id);
        }
        graph.review_mut(id)?.censored_by = None;
    }
    graph.reviews.remove(&id);
    Ok(())
}

fn delete_payment_card(graph: &mut Graph, id: PaymentCardId) -> CoreResult<()> {
    // detach owning customer role
    if let Some(owner) = graph.payment_card(id)?.owner {
        if let RoleData::Customer { payment_cards, .. } = &mut graph.role_mut(owner)?.data {
            payment_cards.remove(&id);
        }
        graph.payment_card_mut(id)?.owner = None;
    }
    // detach tickets paid with this card; the tickets survive
    let tickets: Vec<TicketId> = graph.payment_card(id)?.tickets.iter().copied().collect();
    for ticket in tickets {
        graph.ticket_mut(ticket)?.payment_card = None;
    }
    // cascade owned billing address
    if let Some(address) = graph.payment_card(id)?.address {
        graph.payment_card_mut(id)?.address = None;
        graph.address_mut(address)?.card = None;
        delete_address(graph, address)?;
    }
    graph.payment_cards.remove(&id);
    Ok(())
}

fn delete_coupon(graph: &mut Graph, id: CouponId) -> CoreResult<()> {
    if let Some(owner) = graph.coupon(id)?.owner {
        if let RoleData::Customer { coupons, .. } = &mut graph.role_mut(owner)?.data {
            coupons.remove(&id);
        }
        graph.coupon_mut(id)?.owner = None;
    }
    graph.coupons.remove(&id);
    Ok(())
}

fn delete_address(graph: &mut Graph, id: AddressId) -> CoreResult<()> {
    if let Some(card_id) = graph.address(id)?.card {
        graph.payment_card_mut(card_id)?.address = None;
        graph.address_mut(id)?.card = None;
    }
    graph.addresses.remove(&id);
    Ok(())
}
