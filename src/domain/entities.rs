//! Entity records held in the graph store.
//!
//! Cross-references are typed ids and ordered id-sets, never shared pointers.
//! Both sides of every relationship are stored explicitly; the services are
//! responsible for keeping the two directions consistent, and the cascade
//! hooks for tearing them down.

use crate::domain::types::{
    AddressId, CouponId, MovieId, PaymentCardId, ReviewId, RoleId, RoleKind, Runtime, ScreeningId,
    ScreeningSeatId, ShowroomId, ShowroomSeatId, TheaterId, TicketId, TicketStatus, UserId,
};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct Theater {
    pub id: TheaterId,
    pub name: String,
    pub showrooms: BTreeSet<ShowroomId>,
    /// Admin role assignments managing this theater
    pub admins: BTreeSet<RoleId>,
}

impl Theater {
    pub fn new(id: TheaterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            showrooms: BTreeSet::new(),
            admins: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Showroom {
    pub id: ShowroomId,
    /// Single letter, unique across the theater ("A", "B", ...)
    pub letter: char,
    pub theater: Option<TheaterId>,
    pub seats: BTreeSet<ShowroomSeatId>,
    pub screenings: BTreeSet<ScreeningId>,
}

impl Showroom {
    pub fn new(id: ShowroomId, letter: char) -> Self {
        Self {
            id,
            letter,
            theater: None,
            seats: BTreeSet::new(),
            screenings: BTreeSet::new(),
        }
    }
}

/// A physical seat location, reused across every screening in its showroom.
#[derive(Debug, Clone)]
pub struct ShowroomSeat {
    pub id: ShowroomSeatId,
    pub showroom: Option<ShowroomId>,
    pub row: char,
    pub number: u16,
    /// One screening seat per screening ever scheduled in the showroom
    pub screening_seats: BTreeSet<ScreeningSeatId>,
}

impl ShowroomSeat {
    pub fn new(id: ShowroomSeatId, showroom: ShowroomId, row: char, number: u16) -> Self {
        Self {
            id,
            showroom: Some(showroom),
            row,
            number,
            screening_seats: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub runtime: Runtime,
    pub screenings: BTreeSet<ScreeningId>,
    pub reviews: BTreeSet<ReviewId>,
}

impl Movie {
    pub fn new(id: MovieId, title: impl Into<String>, runtime: Runtime) -> Self {
        Self {
            id,
            title: title.into(),
            runtime,
            screenings: BTreeSet::new(),
            reviews: BTreeSet::new(),
        }
    }
}

/// One scheduled showing of a movie in a showroom over a time interval.
#[derive(Debug, Clone)]
pub struct Screening {
    pub id: ScreeningId,
    pub movie: Option<MovieId>,
    pub showroom: Option<ShowroomId>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub seats: BTreeSet<ScreeningSeatId>,
}

/// The bookable unit: a per-screening slot mirroring one physical seat.
#[derive(Debug, Clone)]
pub struct ScreeningSeat {
    pub id: ScreeningSeatId,
    pub screening: Option<ScreeningId>,
    pub showroom_seat: Option<ShowroomSeatId>,
    pub ticket: Option<TicketId>,
}

#[derive(Debug, Clone)]
pub struct Ticket {
    pub id: TicketId,
    /// Customer role assignment that bought the ticket
    pub owner: Option<RoleId>,
    pub seat: Option<ScreeningSeatId>,
    pub payment_card: Option<PaymentCardId>,
    pub status: TicketStatus,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// At most one role assignment per kind
    pub roles: BTreeMap<RoleKind, RoleId>,
    /// Moderator role that censored this user, if any
    pub censored_by: Option<RoleId>,
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            roles: BTreeMap::new(),
            censored_by: None,
        }
    }
}

/// A role assignment and the domain objects created under it. Cascade
/// behavior is dispatched on the variant.
#[derive(Debug, Clone)]
pub enum RoleData {
    Customer {
        reviews: BTreeSet<ReviewId>,
        tickets: BTreeSet<TicketId>,
        payment_cards: BTreeSet<PaymentCardId>,
        coupons: BTreeSet<CouponId>,
    },
    Moderator {
        censored_reviews: BTreeSet<ReviewId>,
        censored_users: BTreeSet<UserId>,
    },
    Admin {
        theaters: BTreeSet<TheaterId>,
        trainees: BTreeSet<RoleId>,
    },
    AdminTrainee {
        mentor: Option<RoleId>,
    },
}

impl RoleData {
    pub fn kind(&self) -> RoleKind {
        match self {
            RoleData::Customer { .. } => RoleKind::Customer,
            RoleData::Moderator { .. } => RoleKind::Moderator,
            RoleData::Admin { .. } => RoleKind::Admin,
            RoleData::AdminTrainee { .. } => RoleKind::AdminTrainee,
        }
    }

    pub fn empty(kind: RoleKind) -> Self {
        match kind {
            RoleKind::Customer => RoleData::Customer {
                reviews: BTreeSet::new(),
                tickets: BTreeSet::new(),
                payment_cards: BTreeSet::new(),
                coupons: BTreeSet::new(),
            },
            RoleKind::Moderator => RoleData::Moderator {
                censored_reviews: BTreeSet::new(),
                censored_users: BTreeSet::new(),
            },
            RoleKind::Admin => RoleData::Admin {
                theaters: BTreeSet::new(),
                trainees: BTreeSet::new(),
            },
            RoleKind::AdminTrainee => RoleData::AdminTrainee { mentor: None },
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoleAssignment {
    pub id: RoleId,
    pub user: Option<UserId>,
    pub data: RoleData,
}

impl RoleAssignment {
    pub fn kind(&self) -> RoleKind {
        self.data.kind()
    }
}

#[derive(Debug, Clone)]
pub struct Review {
    pub id: ReviewId,
    /// Customer role that wrote the review
    pub writer: Option<RoleId>,
    pub movie: Option<MovieId>,
    pub rating: u8,
    pub text: String,
    pub censored: bool,
    /// Moderator role that censored this review, if any
    pub censored_by: Option<RoleId>,
}

#[derive(Debug, Clone)]
pub struct PaymentCard {
    pub id: PaymentCardId,
    pub owner: Option<RoleId>,
    /// Billing address, owned by this card
    pub address: Option<AddressId>,
    pub last_four: String,
    pub expiry: String,
    /// Tickets paid with this card
    pub tickets: BTreeSet<TicketId>,
}

#[derive(Debug, Clone)]
pub struct Coupon {
    pub id: CouponId,
    pub owner: Option<RoleId>,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    /// Payment card this billing address belongs to
    pub card: Option<PaymentCardId>,
    pub street: String,
    pub city: String,
    pub us_state: String,
    pub zipcode: String,
}
