//! Utility functions for formatting identifiers in logs and output.

pub mod formatting;

pub use formatting::truncate_id;
