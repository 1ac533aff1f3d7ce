//! Arena ids for the road graph.
//!
//! A map keeps its nodes, legs and ways in three flat vectors; every
//! reference between them is a `u32` position wrapped in one of these ids.
//! Positions are only meaningful for the map that issued them, and a
//! compaction renumbers them all.
//!
//! OpenStreetMap ids are a separate `i64` and never converted to these.

use std::fmt;

macro_rules! typed_id {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for an unmapped slot during renumbering.
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the owning arena.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Id for arena position `index`; `None` past `u32::MAX - 1`.
            pub fn from_index(index: usize) -> Option<$name> {
                u32::try_from(index).ok().map($name).filter(|id| id.is_valid())
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != $name::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($label, " #{}"), self.0)
                } else {
                    f.write_str(concat!($label, " #invalid"))
                }
            }
        }
    };
}

typed_id!(
    /// Position of a node in `Map`'s node arena.
    NodeId, "node"
);

typed_id!(
    /// Position of a directed leg; legs are stored in way order.
    LegId, "leg"
);

typed_id!(WayId, "way");
