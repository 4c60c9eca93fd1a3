use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Index of a node in the [`Bdd`][crate::bdd::Bdd] arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The terminal node. `Ref::positive(TERMINAL)` is ONE, its complement is ZERO.
    pub const TERMINAL: NodeId = NodeId(0);

    /// Largest representable id (one bit of the `Ref` is taken by the complement flag).
    pub const MAX: NodeId = NodeId(0x7FFF_FFFF);

    pub const fn new(index: u32) -> Self {
        assert!(index <= Self::MAX.0, "Node id does not fit into 31 bits");
        NodeId(index)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the id as a `usize` for arena indexing.
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// A reference to a BDD node, potentially complemented.
///
/// The least significant bit is the complement flag, the remaining bits store the [`NodeId`].
/// References are plain values: copy them freely and use them as map keys.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Ref(u32);

impl Ref {
    pub const fn new(id: NodeId, negated: bool) -> Self {
        Self((id.raw() << 1) | (negated as u32))
    }

    pub const fn positive(id: NodeId) -> Self {
        Self::new(id, false)
    }

    pub const fn negative(id: NodeId) -> Self {
        Self::new(id, true)
    }

    #[inline]
    pub const fn id(self) -> NodeId {
        NodeId(self.0 >> 1)
    }

    #[inline]
    pub const fn is_negated(self) -> bool {
        (self.0 & 1) != 0
    }

    /// Returns `-self` if `cond` holds, `self` otherwise.
    #[inline]
    pub const fn negate_if(self, cond: bool) -> Self {
        Self(self.0 ^ (cond as u32))
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            write!(f, "~{}", self.id())
        } else {
            write!(f, "{}", self.id())
        }
    }
}
