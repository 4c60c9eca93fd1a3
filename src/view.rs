//! The boundary between the counters and a decision diagram engine.
//!
//! The counters only ever read a diagram through [`DiagramView`], and [`build_cube`][crate::cube::build_cube]
//! only ever extends one through [`DiagramBuilder`]. Node handles are plain `Copy` values: the engine
//! owns every node, and the handles need no release calls from the caller.

use std::fmt::Display;
use std::hash::Hash;

use crate::bdd::Bdd;
use crate::reference::Ref;

/// Read-only traversal over an already built, reduced, ordered diagram.
pub trait DiagramView {
    type Node: Copy + Eq + Hash + Display;

    fn is_zero(&self, node: Self::Node) -> bool;
    fn is_one(&self, node: Self::Node) -> bool;

    fn is_terminal(&self, node: Self::Node) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    /// Position of the tested variable in the global order. Only defined for internal nodes.
    fn variable(&self, node: Self::Node) -> u32;

    /// The "then" child, with complement edges already resolved.
    fn high_node(&self, node: Self::Node) -> Self::Node;
    /// The "else" child, with complement edges already resolved.
    fn low_node(&self, node: Self::Node) -> Self::Node;
}

/// The engine operations needed to assemble cubes and their disjunctions.
pub trait DiagramBuilder: DiagramView {
    fn zero(&self) -> Self::Node;
    fn one(&self) -> Self::Node;
    fn mk_var(&self, v: u32) -> Self::Node;
    fn apply_not(&self, f: Self::Node) -> Self::Node;
    fn apply_and(&self, f: Self::Node, g: Self::Node) -> Self::Node;
    fn apply_or(&self, f: Self::Node, g: Self::Node) -> Self::Node;
}

impl DiagramView for Bdd {
    type Node = Ref;

    fn is_zero(&self, node: Ref) -> bool {
        Bdd::is_zero(self, node)
    }
    fn is_one(&self, node: Ref) -> bool {
        Bdd::is_one(self, node)
    }
    fn is_terminal(&self, node: Ref) -> bool {
        Bdd::is_terminal(self, node)
    }
    fn variable(&self, node: Ref) -> u32 {
        Bdd::variable(self, node.id())
    }
    fn high_node(&self, node: Ref) -> Ref {
        Bdd::high_node(self, node)
    }
    fn low_node(&self, node: Ref) -> Ref {
        Bdd::low_node(self, node)
    }
}

impl DiagramBuilder for Bdd {
    fn zero(&self) -> Ref {
        Bdd::ZERO
    }
    fn one(&self) -> Ref {
        Bdd::ONE
    }
    fn mk_var(&self, v: u32) -> Ref {
        Bdd::mk_var(self, v)
    }
    fn apply_not(&self, f: Ref) -> Ref {
        Bdd::apply_not(self, f)
    }
    fn apply_and(&self, f: Ref, g: Ref) -> Ref {
        Bdd::apply_and(self, f, g)
    }
    fn apply_or(&self, f: Ref, g: Ref) -> Ref {
        Bdd::apply_or(self, f, g)
    }
}
