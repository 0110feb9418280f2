//! Revision-history analysis: temporal activity, editor diversity, edit
//! sizes, and cross-subject comparison.
//!
//! Every function here is a pure transformation from an immutable
//! [`wikipulse_core::RevisionTable`] to a new derived structure — no I/O,
//! no shared state — so callers can run them in any order, or across two
//! subjects at once, and always get the same output for the same input.

pub mod comments;
pub mod compare;
pub mod diversity;
pub mod sizes;
pub mod temporal;
