//! Integer identifier newtypes for the five id domains.
//!
//! Each domain gets its own type so a `PressureId` cannot be used where a
//! `StateId` is expected. The raw value 0 is reserved as the wildcard
//! (see [`crate::constants::WILDCARD_ID`]).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::WILDCARD_ID;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// The reserved wildcard id.
            pub const WILDCARD: Self = Self(WILDCARD_ID);

            /// Create a new ID from its raw value.
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw value.
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// True for the reserved wildcard id 0.
            pub const fn is_wildcard(self) -> bool {
                self.0 == WILDCARD_ID
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Policy measure identifier.
    MeasureId
);

define_id!(
    /// Human activity identifier. 0 in a link means "direct to pressure".
    ActivityId
);

define_id!(
    /// Environmental pressure identifier.
    PressureId
);

define_id!(
    /// Ecological state identifier. 0 in a link means "no state".
    StateId
);

define_id!(
    /// Marine area identifier.
    AreaId
);
