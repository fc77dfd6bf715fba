//! codestroke-workflow
//!
//! The encounter state machine. [`service::WorkflowService`] owns the
//! encounter, runs the stage gates in [`transition`], writes the session
//! after every mutation, and notifies observers. [`ticker::Ticker`]
//! drives the live elapsed-time display.

pub mod config;
pub mod error;
pub mod event;
pub mod intent;
pub mod service;
pub mod ticker;
pub mod transition;
