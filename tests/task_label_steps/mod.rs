//! Step definitions for task label behaviour scenarios.
