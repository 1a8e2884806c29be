//! Strongly typed identifier wrappers.
//!
//! Store identifiers are signed 64-bit integers.  Negative values are free
//! for request-scoped artificial nodes and edges, so a store id and an
//! artificial id can never collide as long as the store only hands out
//! non-negative ids.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[derive(serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }

            /// `true` for ids in the request-scoped (negative) range.
            #[inline(always)]
            pub fn is_artificial(self) -> bool {
                self.0 < 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }

        impl From<$name> for $inner {
            #[inline(always)]
            fn from(id: $name) -> $inner {
                id.0
            }
        }
    };
}

typed_id! {
    /// Identity of a network edge.  The antijoin between spliced and wide
    /// edges is keyed on this value.
    pub struct EdgeId(i64);
}

typed_id! {
    /// Identity of a network vertex.
    pub struct NodeId(i64);
}

typed_id! {
    /// Scenario selector.  `0` conventionally means "no scenario".
    pub struct ScenarioId(i64);
}
