//! Entity graph store
//!
//! An id-keyed arena per entity kind plus a shared id sequence. The `Store`
//! wraps the graph in a mutex and runs every unit of work under
//! [`Store::transact`], which restores a snapshot of the graph when the
//! closure fails. That gives the two guarantees the services rely on:
//! units of work are serialized against each other, and a failed operation
//! leaves no partial writes behind (a screening is never observable without
//! its seats, a cascade never stops half-detached).

use crate::domain::entities::{
    Address, Coupon, Movie, PaymentCard, Review, RoleAssignment, Screening, ScreeningSeat,
    Showroom, ShowroomSeat, Theater, Ticket, User,
};
use crate::domain::types::{
    AddressId, CouponId, EntityKind, MovieId, PaymentCardId, ReviewId, RoleId, ScreeningId,
    ScreeningSeatId, ShowroomId, ShowroomSeatId, TheaterId, TicketId, UserId,
};
use crate::domain::{CoreError, CoreResult};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// The whole entity graph. Cloneable so a transaction can snapshot it.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub theaters: FxHashMap<TheaterId, Theater>,
    pub showrooms: FxHashMap<ShowroomId, Showroom>,
    pub showroom_seats: FxHashMap<ShowroomSeatId, ShowroomSeat>,
    pub movies: FxHashMap<MovieId, Movie>,
    pub screenings: FxHashMap<ScreeningId, Screening>,
    pub screening_seats: FxHashMap<ScreeningSeatId, ScreeningSeat>,
    pub tickets: FxHashMap<TicketId, Ticket>,
    pub users: FxHashMap<UserId, User>,
    pub roles: FxHashMap<RoleId, RoleAssignment>,
    pub reviews: FxHashMap<ReviewId, Review>,
    pub payment_cards: FxHashMap<PaymentCardId, PaymentCard>,
    pub coupons: FxHashMap<CouponId, Coupon>,
    pub addresses: FxHashMap<AddressId, Address>,
    next_id: u64,
}

macro_rules! arena_access {
    ($field:ident, $entity:ty, $id:ty, $kind:expr, $get:ident, $get_mut:ident) => {
        pub fn $get(&self, id: $id) -> CoreResult<&$entity> {
            self.$field
                .get(&id)
                .ok_or(CoreError::not_found($kind, id.0))
        }

        pub fn $get_mut(&mut self, id: $id) -> CoreResult<&mut $entity> {
            self.$field
                .get_mut(&id)
                .ok_or(CoreError::not_found($kind, id.0))
        }
    };
}

impl Graph {
    /// Next value of the shared id sequence.
    pub fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    arena_access!(theaters, Theater, TheaterId, EntityKind::Theater, theater, theater_mut);
    arena_access!(showrooms, Showroom, ShowroomId, EntityKind::Showroom, showroom, showroom_mut);
    arena_access!(
        showroom_seats,
        ShowroomSeat,
        ShowroomSeatId,
        EntityKind::ShowroomSeat,
        showroom_seat,
        showroom_seat_mut
    );
    arena_access!(movies, Movie, MovieId, EntityKind::Movie, movie, movie_mut);
    arena_access!(screenings, Screening, ScreeningId, EntityKind::Screening, screening, screening_mut);
    arena_access!(
        screening_seats,
        ScreeningSeat,
        ScreeningSeatId,
        EntityKind::ScreeningSeat,
        screening_seat,
        screening_seat_mut
    );
    arena_access!(tickets, Ticket, TicketId, EntityKind::Ticket, ticket, ticket_mut);
    arena_access!(users, User, UserId, EntityKind::User, user, user_mut);
    arena_access!(roles, RoleAssignment, RoleId, EntityKind::Role, role, role_mut);
    arena_access!(reviews, Review, ReviewId, EntityKind::Review, review, review_mut);
    arena_access!(
        payment_cards,
        PaymentCard,
        PaymentCardId,
        EntityKind::PaymentCard,
        payment_card,
        payment_card_mut
    );
    arena_access!(coupons, Coupon, CouponId, EntityKind::Coupon, coupon, coupon_mut);
    arena_access!(addresses, Address, AddressId, EntityKind::Address, address, address_mut);
}

/// Serialized, all-or-nothing access to the entity graph.
#[derive(Debug, Default)]
pub struct Store {
    graph: Mutex<Graph>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one unit of work. On `Err` the graph is restored to its state
    /// before the closure ran, so callers never observe partial writes.
    pub fn transact<T>(&self, f: impl FnOnce(&mut Graph) -> CoreResult<T>) -> CoreResult<T> {
        let mut graph = self.graph.lock();
        let snapshot = graph.clone();
        match f(&mut graph) {
            Ok(value) => Ok(value),
            Err(err) => {
                *graph = snapshot;
                Err(err)
            }
        }
    }

    /// Run a read-only query under the same lock as mutations.
    pub fn read<T>(&self, f: impl FnOnce(&Graph) -> CoreResult<T>) -> CoreResult<T> {
        let graph = self.graph.lock();
        f(&graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Movie;
    use crate::domain::types::Runtime;

    #[test]
    fn test_fresh_ids_are_unique() {
        let mut graph = Graph::default();
        let a = graph.fresh_id();
        let b = graph.fresh_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_transact_commits_on_ok() {
        let store = Store::new();
        store
            .transact(|graph| {
                let id = MovieId(graph.fresh_id());
                graph.movies.insert(id, Movie::new(id, "Dune", Runtime::new(2, 35)));
                Ok(())
            })
            .unwrap();

        store
            .read(|graph| {
                assert_eq!(graph.movies.len(), 1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_transact_rolls_back_on_err() {
        let store = Store::new();
        let result: CoreResult<()> = store.transact(|graph| {
            let id = MovieId(graph.fresh_id());
            graph.movies.insert(id, Movie::new(id, "Dune", Runtime::new(2, 35)));
            Err(CoreError::InvalidState("boom".into()))
        });
        assert!(result.is_err());

        store
            .read(|graph| {
                assert!(graph.movies.is_empty());
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_missing_lookup_is_not_found() {
        let graph = Graph::default();
        let err = graph.movie(MovieId(99)).unwrap_err();
        assert_eq!(
            err,
            CoreError::not_found(EntityKind::Movie, 99)
        );
    }
}
