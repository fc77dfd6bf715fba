//! codestroke-core
//!
//! Pure domain types and the stateless clinical math: treatment-window
//! classification, weight-based dosing, and the milestone registry.
//! No storage or rendering dependency. This is the shared vocabulary of
//! the Code Stroke engine.

pub mod clock;
pub mod dosing;
pub mod error;
pub mod milestones;
pub mod models;
pub mod session_keys;
pub mod window;
