//! `ArcId` / `NodeId`: strong, zero-cost handles for stream arcs and nodes
//!
//! Arc and node identifiers arrive from the vector-extraction step as plain
//! integers. Wrapping them in distinct newtypes keeps an arc id from ever
//! being joined against a node id by accident. Nodes are never materialized:
//! a `NodeId` exists purely as a join key between arcs.
//!
//! "No arc" (an outlet's downstream, a headwater's upstream) is expressed as
//! `Option<ArcId>::None` in memory; writers map it to `-1` on disk.

use std::fmt;

/// Identifier of one stream arc, stable for one network-construction pass.
///
/// # Memory layout
/// `repr(transparent)` over `i64`, so slices of ids can be handed to
/// columnar writers without conversion.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct ArcId(i64);

impl ArcId {
    /// Creates an `ArcId` from the raw integer assigned upstream.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use stream_sieve::topology::ids::ArcId;
    /// let a = ArcId::new(17);
    /// assert_eq!(a.get(), 17);
    /// ```
    #[inline]
    pub const fn new(raw: i64) -> Self {
        ArcId(raw)
    }

    /// Returns the raw integer.
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Identifier of a topological junction shared by arcs.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[repr(transparent)]
pub struct NodeId(i64);

impl NodeId {
    #[inline]
    pub const fn new(raw: i64) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

// -----------------------------------------------------------------------------
// Formatting traits
// -----------------------------------------------------------------------------

impl fmt::Debug for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArcId").field(&self.get()).finish()
    }
}

/// Prints only the raw integer.
impl fmt::Display for ArcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.get()).finish()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl From<i64> for ArcId {
    fn from(raw: i64) -> Self {
        ArcId::new(raw)
    }
}

impl From<i64> for NodeId {
    fn from(raw: i64) -> Self {
        NodeId::new(raw)
    }
}

/// Raw on-disk form of an optional arc link: `-1` for "no arc".
#[inline]
pub fn raw_or_none(id: Option<ArcId>) -> i64 {
    id.map_or(-1, ArcId::get)
}



#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let a = ArcId::new(123);
        let s = serde_json::to_string(&a).unwrap();
        assert_eq!(s, "123");
        let back: ArcId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn bincode_roundtrip() {
        let n = NodeId::new(456);
        let bytes = bincode::serialize(&n).unwrap();
        let back: NodeId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, n);
    }
}
