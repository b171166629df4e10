//! Services - business logic over the entity graph
//!
//! - `inventory` - theaters, movies, showrooms and their physical seats
//! - `scheduler` - overlap-checked screening creation
//! - `ledger` - per-screening seat map, booking, release
//! - `accounts` - users, role assignments, and role-owned records
//! - `cascade` - the on-delete protocol every deletion routes through
//! - `cinema` - the facade the presentation layer calls

pub mod accounts;
pub mod cascade;
pub mod cinema;
pub mod inventory;
pub mod ledger;
pub mod scheduler;

pub use cinema::{Cinema, ScreeningSummary};
pub use ledger::{SeatMap, SeatMapRow, SeatView, TicketDetails};
