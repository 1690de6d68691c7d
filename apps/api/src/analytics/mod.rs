//! Insights and CSV export over ranked matches.

pub mod export;
pub mod handlers;
pub mod insights;
