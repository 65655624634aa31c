//! Core types for Venue Verge.
//!
//! Type-safe wrappers for the identifiers and closed enumerations that flow
//! between the web layer and the database.

pub mod email;
pub mod id;
pub mod role;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use role::{Role, RoleError};
pub use status::{ReservationStatus, StatusError};
