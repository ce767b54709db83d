//! Identifier newtypes.
//!
//! Link ids are the external ids of the road data (sparse, never an index).
//! Node ids are dense and handed out by the network builder.  Path ids key
//! the ground-truth set.

use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "no id".
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype! {
    /// A directed road link.  `0` is the padding token, so real links are
    /// positive.
    LinkId
}

id_newtype! {
    /// An intersection; indexes the builder's node table.
    NodeId
}

id_newtype! {
    /// A ground-truth trajectory.
    PathId
}

impl LinkId {
    /// Padding (`0`) or [`LinkId::INVALID`].
    #[inline]
    pub fn is_reserved(self) -> bool {
        self.0 == 0 || self == Self::INVALID
    }
}
