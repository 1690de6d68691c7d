//! Job Source Client: search, normalization, salary parsing, and caching.

pub mod cache;
pub mod client;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod salary;
