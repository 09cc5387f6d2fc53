//! Common utilities for the Trellis markup toolkit.
//!
//! This crate provides shared infrastructure used by the markup parser and the
//! selector engine:
//! - **Scanner** - a code point reader with one-step pushback and line/column tracking
//! - **Warning System** - colored, deduplicated terminal output for recoverable oddities

pub mod scanner;
pub mod warning;

pub use scanner::{Position, ScanError, Scanner};
