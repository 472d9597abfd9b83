//! Generic utility primitives with zero domain knowledge.
//!
//! - `io` - File I/O with consistent error handling
//! - `walk` - Recursive PHP source file discovery

pub mod io;
pub mod walk;
