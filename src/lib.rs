//! Scrapes a quarterly-revenue table from a public financial page,
//! cleans it into typed `(Date, Value)` records, appends them to a local
//! SQLite file and renders summary charts.
//!
//! The stages run strictly in sequence; each hands its output to the next
//! by value. See the `main` binary for the wiring.

pub mod clean;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod report;
pub mod store;

pub use error::{Error, Result};
