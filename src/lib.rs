//! Query construction and execution engine for small variant filtration.
//!
//! The crate builds parameterized SQL from structured filter criteria
//! ([`query::schema::CaseQuery`]) and runs it against a case database,
//! decoding the rows into [`query::output::ResultRecord`] values.  Entry
//! points are [`query::run_query`] and [`query::run_count`].

pub mod common;
pub mod ped;
pub mod query;
