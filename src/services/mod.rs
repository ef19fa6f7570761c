//! Core services for traversal, hashing, inspection, and node storage

pub mod digest;
pub mod inspect;
pub mod store;
pub mod traverse;
