//! Strongly typed string identifier wrappers.
//!
//! Road networks in this stack come from external map data where entities
//! carry string keys ("n-cross-12", "ring-road-east"), so identifiers wrap
//! `String` rather than a dense integer index.  All IDs are `Ord + Hash` so
//! they can serve as `BTreeMap` keys; the ascending `Ord` order doubles as
//! the deterministic tie-break order for search and nearest-node queries.

use std::fmt;

/// Generate a typed ID wrapper around an owned string key.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

typed_id! {
    /// Key of a road-network node (intersection or point of interest).
    pub struct NodeId;
}

typed_id! {
    /// Key of a directed road segment.
    pub struct SegmentId;
}

typed_id! {
    /// Key of a tracked pedestrian.
    pub struct PedestrianId;
}

impl SegmentId {
    /// Key of the synthesized reverse segment of a bidirectional road:
    /// the forward key with a `-rev` suffix.
    pub fn reversed(&self) -> SegmentId {
        SegmentId(format!("{}-rev", self.0))
    }
}
