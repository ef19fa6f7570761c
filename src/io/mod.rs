//! Reading catalogued nodes back out of a database

pub mod query;
