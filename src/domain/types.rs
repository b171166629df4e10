//! Shared types for the screening-calendar core

use chrono::Duration;
use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($name:ident) => {
        /// Newtype id to keep cross-entity references type safe
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[repr(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(TheaterId);
entity_id!(ShowroomId);
entity_id!(ShowroomSeatId);
entity_id!(MovieId);
entity_id!(ScreeningId);
entity_id!(ScreeningSeatId);
entity_id!(TicketId);
entity_id!(UserId);
entity_id!(RoleId);
entity_id!(ReviewId);
entity_id!(PaymentCardId);
entity_id!(CouponId);
entity_id!(AddressId);

/// Every entity kind held in the graph store. Deletion always routes through
/// the cascade hook registered for the kind, never a raw arena removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Theater,
    Showroom,
    ShowroomSeat,
    Movie,
    Screening,
    ScreeningSeat,
    Ticket,
    User,
    Role,
    Review,
    PaymentCard,
    Coupon,
    Address,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Theater => "theater",
            EntityKind::Showroom => "showroom",
            EntityKind::ShowroomSeat => "showroom_seat",
            EntityKind::Movie => "movie",
            EntityKind::Screening => "screening",
            EntityKind::ScreeningSeat => "screening_seat",
            EntityKind::Ticket => "ticket",
            EntityKind::User => "user",
            EntityKind::Role => "role",
            EntityKind::Review => "review",
            EntityKind::PaymentCard => "payment_card",
            EntityKind::Coupon => "coupon",
            EntityKind::Address => "address",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four role-assignment kinds a user can hold, at most one of each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Customer,
    Moderator,
    Admin,
    AdminTrainee,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Customer => "customer",
            RoleKind::Moderator => "moderator",
            RoleKind::Admin => "admin",
            RoleKind::AdminTrainee => "admin_trainee",
        }
    }
}

impl std::str::FromStr for RoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(RoleKind::Customer),
            "moderator" => Ok(RoleKind::Moderator),
            "admin" => Ok(RoleKind::Admin),
            "admin_trainee" => Ok(RoleKind::AdminTrainee),
            other => Err(format!("unknown role kind: {other}")),
        }
    }
}

/// Movie runtime as hours + minutes, matching how listings print it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub hours: i64,
    pub minutes: i64,
}

impl Runtime {
    pub fn new(hours: i64, minutes: i64) -> Self {
        Self { hours, minutes }
    }

    pub fn to_duration(self) -> Duration {
        Duration::hours(self.hours) + Duration::minutes(self.minutes)
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h{:02}m", self.hours, self.minutes)
    }
}

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Valid,
    Refunded,
    Used,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Valid => "valid",
            TicketStatus::Refunded => "refunded",
            TicketStatus::Used => "used",
        }
    }
}
