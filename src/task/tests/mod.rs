//! Unit tests for the task storage module.
