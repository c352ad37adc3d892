//! hx-core: shared foundation for heatloop.
//!
//! Contains:
//! - units (uom SI types + constructors, plus °C helpers)
//! - numeric (finiteness and positivity checks)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{HxError, HxResult};
pub use numeric::*;
pub use units::*;
