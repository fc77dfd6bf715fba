//! codestroke-export
//!
//! Handoff note generation. Builds a plain-text view of the encounter
//! and renders it through a Tera template. Output is copy- and
//! print-ready text; no binary formats.

pub mod error;
pub mod format;
pub mod note;
pub mod render;
