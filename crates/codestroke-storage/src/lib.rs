//! codestroke-storage
//!
//! Session-scoped persistence. A minimal key/value port plus a typed,
//! expiring snapshot layer on top of it. Nothing here is durable; a lost
//! record means a fresh encounter.

pub mod error;
pub mod kv;
pub mod session;
