//! Adapter implementations of the task storage ports.

pub mod memory;
pub mod postgres;
