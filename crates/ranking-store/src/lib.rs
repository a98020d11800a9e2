//! SQLite persistence for stock rankings.
//!
//! `RankingDb` reads the stock universe and group performance tables and
//! writes scores back with batched, symbol-keyed upserts.

pub mod db;
pub mod error;
pub mod groups;
pub mod sink;
pub mod source;

#[cfg(test)]
mod tests;

pub use db::RankingDb;
pub use error::{StoreError, StoreResult};
