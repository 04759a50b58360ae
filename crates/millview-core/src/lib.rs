//! # MillView Core
//!
//! Shared error types and display formatting used by the compiler,
//! settings and front-end crates.

pub mod error;
pub mod units;

pub use error::{Error, GcodeError, Result};
pub use units::{format_coordinate, format_distance, format_duration, format_feed_rate};
