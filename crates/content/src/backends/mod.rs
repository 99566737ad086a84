//! Storage backend implementations.
//!
//! | Backend | Description |
//! |---------|-------------|
//! | [`memory`] | Process-local store; the reference implementation and default quota source |
//!
//! A persistent backend implements the same traits from [`crate::core`] and
//! can reuse the in-memory backend's locking discipline.

pub mod memory;
