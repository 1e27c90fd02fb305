//! Market price analytics.
//!
//! Pure derivations over stored price observations; no state of its own.

pub mod changes;

pub use changes::{compute_changes, CurrentPrice};
