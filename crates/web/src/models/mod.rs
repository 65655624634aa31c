//! Domain models for the web layer.
//!
//! These are the shapes handlers and templates work with. Read models derive
//! `sqlx::FromRow` and are decoded straight from the queries in [`crate::db`].

pub mod reservation;
pub mod review;
pub mod session;
pub mod user;
pub mod venue;
