//! Identifier types for the task domain.
//!
//! All identifiers are assigned by the relational store (`BIGSERIAL` keys),
//! so the domain only wraps them and never generates them.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! store_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a store-assigned key.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the wrapped key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

store_id!(
    /// Identifier of a task row.
    TaskId
);

store_id!(
    /// Identifier of a user row.
    UserId
);

store_id!(
    /// Identifier of a label row.
    LabelId
);
