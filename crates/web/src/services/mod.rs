//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Signup and password login
//! - `reservations` - Reservation lifecycle behind the customer role gate
//!
//! Both are generic over their storage trait ([`crate::db::UserStore`],
//! [`crate::db::ReservationStore`]) so the rules can be exercised without a
//! database.

pub mod auth;
pub mod reservations;
