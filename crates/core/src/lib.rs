//! Domain logic shared by the catalog database and API layers.
//!
//! Nothing in this crate performs I/O, so every rule here is unit tested in
//! place.

pub mod association;
pub mod cast_member;
pub mod error;
pub mod listing;
pub mod types;
pub mod validation;
pub mod video;
