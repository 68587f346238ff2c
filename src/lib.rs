//! Route summary PDF generator.
//!
//! Resolves a Google Maps API key from the OS credential store or a Keeper
//! vault, fetches directions between two places, and writes the distance,
//! travel time and estimated cost to a one-page PDF.
//!
//! ## Modules
//! - `cli` — Argument parsing and the report pipeline
//! - `core` — Secret resolution, directions, static map, PDF rendering
//! - `models` — Data structures
//! - `util` — Child-process, filesystem, JPEG, and logging helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod util;
