//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Garbage collection: runs a two-phase sweep at the configured interval

mod gc;

pub use gc::spawn_gc_task;
