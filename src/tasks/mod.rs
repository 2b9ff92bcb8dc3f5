//! Background Tasks Module
//!
//! # Tasks
//! - Cache cleanup: sweeps expired entries from a shared cache on an interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;
